//! CLI configuration: thin wrapper around `shelfy_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--server`, `--token`, `--timeout`, `--insecure`).

use secrecy::SecretString;
use tracing::debug;

use shelfy_core::{Context, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use shelfy_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, profile_to_client_config,
    save_config, store_token, clear_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// The profile to connect with, after applying flag overrides.
///
/// Falls back to an ad-hoc profile when `--server` is given for a
/// profile that does not exist yet.
pub fn effective_profile(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
) -> Result<Profile, CliError> {
    let mut profile = match (cfg.profiles.get(profile_name), &global.server) {
        (Some(p), _) => p.clone(),
        (None, Some(server)) => Profile::new(server.clone()),
        (None, None) => {
            return Err(if global.profile.is_some() {
                shelfy_config::ConfigError::UnknownProfile {
                    name: profile_name.into(),
                }
                .into()
            } else {
                CliError::NoConfig {
                    path: config_path().display().to_string(),
                }
            });
        }
    };

    if let Some(ref server) = global.server {
        profile.server.clone_from(server);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok(profile)
}

/// Build the controller context for the active profile.
///
/// The session starts logged in when `--token` is given or a stored token
/// resolves; otherwise it is anonymous and private commands fail with
/// "not logged in" before any request is sent.
pub fn build_context(global: &GlobalOpts) -> Result<(Context, String), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = effective_profile(global, &cfg, &profile_name)?;

    let client_config = profile_to_client_config(&profile, &cfg.defaults)?;
    let session = match global.token {
        Some(ref token) => Session::with_token(SecretString::from(token.clone())),
        None => shelfy_config::session_for(&profile, &profile_name),
    };
    debug!(
        profile = %profile_name,
        server = %client_config.base_url,
        authenticated = session.is_authenticated(),
        "resolved context"
    );

    let ctx = Context::new(&client_config, session)?;
    Ok((ctx, profile_name))
}
