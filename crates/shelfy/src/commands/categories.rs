//! Category command handlers.

use tabled::Tabled;

use shelfy_core::{Categories, Category, Context, CoreError, DeleteFlow, FormContext, FormController};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            description: output::truncate(&c.description, 50),
        }
    }
}

fn category_detail(c: &Category, color: bool) -> String {
    output::detail(
        &[
            ("ID", c.id.to_string()),
            ("Name", c.name.clone()),
            ("Description", c.description.clone()),
            (
                "Created",
                c.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ),
        ],
        color,
    )
}

async fn fetch_category(ctx: &Context, id: u64) -> Result<Category, CliError> {
    let token = ctx.token()?;
    let category = ctx
        .api()
        .get_category(&token, id)
        .await
        .map_err(|e| CliError::from(CoreError::from(e)).for_resource("categories", id))?;
    Ok(Category::from(category))
}

pub async fn handle(
    ctx: &Context,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List(page) => {
            let categories = util::load_page::<Categories>(ctx, &page, (), global).await?;
            let out = output::render_list(
                &global.output,
                &categories,
                |c| CategoryRow::from(c),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Get { id } => {
            let category =
                util::with_spinner("Loading category", global, fetch_category(ctx, id)).await?;
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &category,
                |c| category_detail(c, color),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Create { name, description } => {
            let mut form = FormController::<Categories>::create(ctx.clone(), &FormContext::default());
            form.set_field("name", &name)?;
            form.set_field("description", &description)?;
            util::with_spinner("Saving category", global, form.submit()).await?;
            output::notice(&format!("Category '{name}' created"), global.quiet);
            Ok(())
        }

        CategoriesCommand::Update {
            id,
            name,
            description,
        } => {
            let category = fetch_category(ctx, id).await?;
            let mut form = FormController::<Categories>::edit(ctx.clone(), category);
            if let Some(ref name) = name {
                form.set_field("name", name)?;
            }
            if let Some(ref description) = description {
                form.set_field("description", description)?;
            }
            util::with_spinner("Saving category", global, form.submit())
                .await
                .map_err(|e| CliError::from(e).for_resource("categories", id))?;
            output::notice(&format!("Category {id} updated"), global.quiet);
            Ok(())
        }

        CategoriesCommand::Delete { id } => {
            let category = fetch_category(ctx, id).await?;
            if !util::confirm(
                &format!("Delete category '{}'?", category.name),
                "categories delete",
                global,
            )? {
                return Err(CliError::Cancelled);
            }
            let mut flow = DeleteFlow::<Categories>::new(ctx.clone());
            flow.request_delete();
            util::with_spinner("Deleting category", global, flow.delete(&category)).await?;
            output::notice(&format!("Category '{}' deleted", category.name), global.quiet);
            Ok(())
        }
    }
}
