//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod auth;
pub mod books;
pub mod categories;
pub mod config_cmd;
pub mod reviews;
pub mod util;

use shelfy_core::{Context, RouteDecision, RouteKind};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
///
/// Resource commands are private: without a session they fail before
/// any request is sent.
pub async fn dispatch(
    cmd: Command,
    ctx: &Context,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = match cmd {
        Command::Books(_) | Command::Categories(_) | Command::Reviews(_) => RouteKind::Private,
        _ => RouteKind::Public,
    };
    if kind == RouteKind::Private && ctx.session().guard(kind) == RouteDecision::RedirectToLogin {
        return Err(CliError::NotLoggedIn {
            profile: profile_name.into(),
        });
    }

    match cmd {
        Command::Login(args) => auth::login(ctx, profile_name, args, global).await,
        Command::Register(args) => auth::register(ctx, args, global).await,
        Command::Status => auth::status(ctx, profile_name, global),
        Command::Books(args) => books::handle(ctx, args, global).await,
        Command::Categories(args) => categories::handle(ctx, args, global).await,
        Command::Reviews(args) => reviews::handle(ctx, args, global).await,
        Command::Logout | Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a server connection".into(),
        )),
    }
}
