//! Session commands: login, register, logout, status.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::warn;

use shelfy_core::Context;

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

fn require_tty(what: &str) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: what.into(),
            reason: format!("no terminal to prompt on; pass --{what}"),
        })
    }
}

fn read_password(given: Option<String>) -> Result<SecretString, CliError> {
    let password = match given {
        Some(p) => p,
        None => {
            require_tty("password")?;
            rpassword::prompt_password("Password: ").map_err(prompt_err)?
        }
    };
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

/// Persist `token` for `profile_name`: keyring first, plaintext config
/// field when the keyring is unavailable.
fn persist_login(
    ctx: &Context,
    profile_name: &str,
    email: &str,
    token: &SecretString,
) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let server = ctx.api().base_url().as_str().trim_end_matches('/').to_owned();
    let profile = cfg
        .profiles
        .entry(profile_name.to_owned())
        .or_insert_with(|| Profile::new(server.clone()));
    profile.server = server;
    profile.email = Some(email.to_owned());

    match config::store_token(profile_name, token) {
        Ok(()) => profile.token = None,
        Err(e) => {
            warn!(error = %e, "keyring unavailable, storing token in config file");
            eprintln!("warning: keyring unavailable; token saved in plaintext config");
            profile.token = Some(token.expose_secret().to_owned());
        }
    }

    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.to_owned());
    }
    config::save_config(&cfg)?;
    Ok(())
}

pub async fn login(
    ctx: &Context,
    profile_name: &str,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => {
            require_tty("email")?;
            let stored = config::load_config_or_default()
                .profiles
                .get(profile_name)
                .and_then(|p| p.email.clone());
            let mut input = Input::<String>::new().with_prompt("Email");
            if let Some(stored) = stored {
                input = input.default(stored);
            }
            input.interact_text().map_err(prompt_err)?
        }
    };
    let password = read_password(args.password)?;

    let token = super::util::with_spinner("Logging in", global, ctx.login(&email, &password)).await?;
    persist_login(ctx, profile_name, &email, &token)?;
    output::notice(
        &format!("✓ Logged in as {email} (profile '{profile_name}')"),
        global.quiet,
    );
    Ok(())
}

pub async fn register(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = read_password(args.password)?;
    super::util::with_spinner(
        "Creating account",
        global,
        ctx.register(&args.name, &args.email, &password),
    )
    .await?;
    output::notice(
        &format!("✓ Account created for {}. Run: shelfy login", args.email),
        global.quiet,
    );
    Ok(())
}

/// Forget the stored token. Works offline; the server keeps no session.
pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    if let Err(e) = config::clear_token(&profile_name) {
        warn!(error = %e, "could not clear keyring entry");
    }
    if let Some(profile) = cfg.profiles.get_mut(&profile_name) {
        if profile.token.take().is_some() {
            config::save_config(&cfg)?;
        }
    }
    output::notice(&format!("✓ Logged out of profile '{profile_name}'"), global.quiet);
    Ok(())
}

#[derive(Serialize)]
struct Status {
    profile: String,
    server: String,
    email: Option<String>,
    logged_in: bool,
}

/// Report the resolved profile and whether a token is available. No
/// request is sent.
pub fn status(ctx: &Context, profile_name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let status = Status {
        profile: profile_name.to_owned(),
        server: ctx.api().base_url().to_string(),
        email: cfg.profiles.get(profile_name).and_then(|p| p.email.clone()),
        logged_in: ctx.session().is_authenticated(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            output::detail(
                &[
                    ("Profile", s.profile.clone()),
                    ("Server", s.server.clone()),
                    ("Email", s.email.clone().unwrap_or_default()),
                    (
                        "Session",
                        if s.logged_in { "logged in" } else { "not logged in" }.to_owned(),
                    ),
                ],
                color,
            )
        },
        |s| s.profile.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
