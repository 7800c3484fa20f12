//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use shelfy_core::{Context, CoreError, EntityId, ListController, Resource, Review};

use crate::cli::{GlobalOpts, PageArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of blocking.
pub fn confirm(message: &str, action: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Run `work` behind a stderr spinner (hidden when quiet or piped).
pub async fn with_spinner<T>(
    message: &str,
    global: &GlobalOpts,
    work: impl Future<Output = T>,
) -> T {
    let bar = if global.quiet || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    };
    let out = work.await;
    bar.finish_and_clear();
    out
}

/// Load one page of `R` through the list controller.
pub async fn load_page<R: Resource>(
    ctx: &Context,
    page: &PageArgs,
    filter: R::Filter,
    global: &GlobalOpts,
) -> Result<Vec<R::Entity>, CliError> {
    let ctx = page.limit.map_or_else(|| ctx.clone(), |limit| ctx.with_page_size(limit));
    let mut list = ListController::<R>::new(ctx);
    list.set_filter(filter);
    list.change_page(i64::from(page.page) - 1);

    let label = format!("Loading {}", R::KIND.plural().to_lowercase());
    with_spinner(&label, global, list.load()).await?;
    Ok(list.items().to_vec())
}

/// Find one of the current user's reviews by id. The server has no
/// single-review endpoint, so this scans the full review list.
pub async fn find_review(ctx: &Context, id: u64) -> Result<Review, CliError> {
    let token = ctx.token()?;
    let reviews = ctx
        .api()
        .list_reviews(&token, None)
        .await
        .map_err(CoreError::from)?;
    reviews
        .into_iter()
        .map(Review::from)
        .find(|r| r.id == EntityId::new(id))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "review".into(),
            identifier: id.to_string(),
            list_command: "reviews list".into(),
        })
}
