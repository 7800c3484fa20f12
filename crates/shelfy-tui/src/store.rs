//! Credential persistence for logins made inside the TUI.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use shelfy_config::{ConfigError, Profile};

/// Where a login's token ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStore {
    Keyring,
    /// The keyring was unavailable; the token sits in the config file.
    Plaintext,
}

/// Record `email` and `token` for `profile_name`, keyring first.
pub fn persist_login(
    profile_name: &str,
    server: &str,
    email: &str,
    token: &SecretString,
) -> Result<TokenStore, ConfigError> {
    let mut cfg = shelfy_config::load_config_or_default();
    let profile = cfg
        .profiles
        .entry(profile_name.to_owned())
        .or_insert_with(|| Profile::new(server));
    profile.server = server.to_owned();
    profile.email = Some(email.to_owned());

    let store = match shelfy_config::store_token(profile_name, token) {
        Ok(()) => {
            profile.token = None;
            TokenStore::Keyring
        }
        Err(err) => {
            warn!(error = %err, "keyring unavailable, storing token in config file");
            profile.token = Some(token.expose_secret().to_owned());
            TokenStore::Plaintext
        }
    };

    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.to_owned());
    }
    let path = shelfy_config::save_config(&cfg)?;
    info!(profile = profile_name, path = %path.display(), "login saved");
    Ok(store)
}

/// Forget the stored token of `profile_name`.
pub fn forget_login(profile_name: &str) -> Result<(), ConfigError> {
    if let Err(err) = shelfy_config::clear_token(profile_name) {
        warn!(error = %err, "failed to clear keyring entry");
    }
    let mut cfg = shelfy_config::load_config_or_default();
    let had_plaintext = cfg
        .profiles
        .get_mut(profile_name)
        .is_some_and(|p| p.token.take().is_some());
    if had_plaintext {
        shelfy_config::save_config(&cfg)?;
    }
    Ok(())
}
