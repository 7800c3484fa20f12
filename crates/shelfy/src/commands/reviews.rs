//! Review command handlers.

use tabled::Tabled;

use shelfy_core::{
    Context, DeleteFlow, EntityId, FormContext, FormController, Review, ReviewFilter, Reviews,
};

use crate::cli::{GlobalOpts, ReviewsArgs, ReviewsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReviewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Review")]
    text: String,
}

impl From<&Review> for ReviewRow {
    fn from(r: &Review) -> Self {
        Self {
            id: r.id.to_string(),
            book: r.book_title(),
            category: r.category_label().to_owned(),
            text: output::truncate(&r.ulasan, 50),
        }
    }
}

pub async fn handle(ctx: &Context, args: ReviewsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ReviewsCommand::List { book, page } => {
            let filter = ReviewFilter {
                book: book.map(EntityId::new),
            };
            let reviews = util::load_page::<Reviews>(ctx, &page, filter, global)
                .await
                .map_err(|e| match book {
                    Some(id) => e.for_resource("books", id),
                    None => e,
                })?;
            let out = output::render_list(
                &global.output,
                &reviews,
                |r| ReviewRow::from(r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReviewsCommand::Create { book, text } => {
            let form_ctx = FormContext {
                options: Vec::new(),
                filter: ReviewFilter::book(EntityId::new(book)),
            };
            let mut form = FormController::<Reviews>::create(ctx.clone(), &form_ctx);
            form.set_field("ulasan", &text)?;
            util::with_spinner("Posting review", global, form.submit())
                .await
                .map_err(|e| CliError::from(e).for_resource("books", book))?;
            output::notice(&format!("Review of book {book} posted"), global.quiet);
            Ok(())
        }

        ReviewsCommand::Update { id, book, text } => {
            let review = util::find_review(ctx, id).await?;
            let mut form = FormController::<Reviews>::edit(ctx.clone(), review);
            if let Some(book) = book {
                form.set_field("bookId", &book.to_string())?;
            }
            if let Some(ref text) = text {
                form.set_field("ulasan", text)?;
            }
            util::with_spinner("Saving review", global, form.submit())
                .await
                .map_err(|e| CliError::from(e).for_resource("reviews", id))?;
            output::notice(&format!("Review {id} updated"), global.quiet);
            Ok(())
        }

        ReviewsCommand::Delete { id } => {
            let review = util::find_review(ctx, id).await?;
            if !util::confirm(
                &format!("Delete your review of '{}'?", review.book_title()),
                "reviews delete",
                global,
            )? {
                return Err(CliError::Cancelled);
            }
            let mut flow = DeleteFlow::<Reviews>::new(ctx.clone());
            flow.request_delete();
            util::with_spinner("Deleting review", global, flow.delete(&review)).await?;
            output::notice(&format!("Review {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
