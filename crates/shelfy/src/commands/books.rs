//! Book command handlers.

use serde::Serialize;
use tabled::Tabled;

use shelfy_core::{
    Book, BookReviewPage, Books, Context, CoreError, DeleteFlow, EntityId, FormContext,
    FormController, Resource, Review,
};

use crate::cli::{BooksArgs, BooksCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&Book> for BookRow {
    fn from(b: &Book) -> Self {
        Self {
            id: b.id.to_string(),
            title: b.title.clone(),
            author: b.author.clone(),
            category: b.category_label().to_owned(),
        }
    }
}

#[derive(Tabled)]
struct BookReviewRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Review")]
    text: String,
    #[tabled(rename = "Posted")]
    posted: String,
}

impl From<&Review> for BookReviewRow {
    fn from(r: &Review) -> Self {
        Self {
            id: r.id.to_string(),
            text: output::truncate(&r.ulasan, 60),
            posted: r
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

fn book_detail(b: &Book, color: bool) -> String {
    let updated = if b.was_updated() {
        b.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default()
    } else {
        String::new()
    };
    output::detail(
        &[
            ("ID", b.id.to_string()),
            ("Title", b.title.clone()),
            ("Author", b.author.clone()),
            ("Category", b.category_label().to_owned()),
            ("Image", b.image_url.clone().unwrap_or_default()),
            ("Description", b.description.clone().unwrap_or_default()),
            (
                "Created",
                b.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            ),
            ("Updated", updated),
        ],
        color,
    )
}

#[derive(Serialize)]
struct BookWithReviews<'a> {
    book: &'a Book,
    reviews: &'a [Review],
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn fetch_book(ctx: &Context, id: u64) -> Result<Book, CliError> {
    let token = ctx.token()?;
    let book = ctx
        .api()
        .get_book(&token, id)
        .await
        .map_err(|e| CliError::from(CoreError::from(e)).for_resource("books", id))?;
    Ok(Book::from(book))
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(ctx: &Context, args: BooksArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        BooksCommand::List(page) => {
            let books = util::load_page::<Books>(ctx, &page, (), global).await?;
            let out = output::render_list(
                &global.output,
                &books,
                |b| BookRow::from(b),
                |b| b.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BooksCommand::Get { id } => {
            let book = util::with_spinner("Loading book", global, fetch_book(ctx, id)).await?;
            let out = output::render_single(
                &global.output,
                &book,
                |b| book_detail(b, color),
                |b| b.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BooksCommand::Create {
            title,
            author,
            category,
            image_url,
        } => {
            let form_ctx = if category.is_some() {
                FormContext::default()
            } else {
                let token = ctx.token()?;
                FormContext {
                    options: Books::options(ctx.api(), &token).await?,
                    filter: (),
                }
            };
            let mut form = FormController::<Books>::create(ctx.clone(), &form_ctx);
            form.set_field("title", &title)?;
            form.set_field("author", &author)?;
            if let Some(category) = category {
                form.set_field("categoryId", &category.to_string())?;
            }
            if let Some(ref url) = image_url {
                form.set_field("imageUrl", url)?;
            }
            util::with_spinner("Saving book", global, form.submit()).await?;
            output::notice(&format!("Book '{title}' created"), global.quiet);
            Ok(())
        }

        BooksCommand::Update {
            id,
            title,
            author,
            category,
            image_url,
        } => {
            let book = fetch_book(ctx, id).await?;
            let mut form = FormController::<Books>::edit(ctx.clone(), book);
            if let Some(ref title) = title {
                form.set_field("title", title)?;
            }
            if let Some(ref author) = author {
                form.set_field("author", author)?;
            }
            if let Some(category) = category {
                form.set_field("categoryId", &category.to_string())?;
            }
            if let Some(ref url) = image_url {
                form.set_field("imageUrl", url)?;
            }
            util::with_spinner("Saving book", global, form.submit())
                .await
                .map_err(|e| CliError::from(e).for_resource("books", id))?;
            output::notice(&format!("Book {id} updated"), global.quiet);
            Ok(())
        }

        BooksCommand::Delete { id } => {
            let book = fetch_book(ctx, id).await?;
            if !util::confirm(
                &format!("Delete book '{}'?", book.title),
                "books delete",
                global,
            )? {
                return Err(CliError::Cancelled);
            }
            let mut flow = DeleteFlow::<Books>::new(ctx.clone());
            flow.request_delete();
            util::with_spinner("Deleting book", global, flow.delete(&book)).await?;
            output::notice(&format!("Book '{}' deleted", book.title), global.quiet);
            Ok(())
        }

        BooksCommand::Reviews { id, add } => {
            let mut page = BookReviewPage::new(ctx.clone(), EntityId::new(id));
            util::with_spinner("Loading book", global, page.load())
                .await
                .map_err(|e| CliError::from(e).for_resource("books", id))?;

            if let Some(text) = add {
                page.set_review_text(&text);
                util::with_spinner("Posting review", global, page.add_review()).await?;
                output::notice("Review posted", global.quiet);
            }

            let book = page
                .book()
                .ok_or_else(|| CliError::Internal("book missing after load".into()))?;
            let payload = BookWithReviews {
                book,
                reviews: page.reviews(),
            };
            let out = output::render_single(
                &global.output,
                &payload,
                |p| {
                    let rows: Vec<BookReviewRow> = p.reviews.iter().map(BookReviewRow::from).collect();
                    let table = if rows.is_empty() {
                        "No reviews yet.".to_owned()
                    } else {
                        tabled::Table::new(rows)
                            .with(tabled::settings::Style::rounded())
                            .to_string()
                    };
                    format!("{}\n\n{table}", book_detail(p.book, color))
                },
                |p| {
                    p.reviews
                        .iter()
                        .map(|r| r.id.to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
