//! All possible UI actions. Actions are the sole mechanism for state
//! mutation; spawned requests report back as actions too.

use secrecy::SecretString;

use shelfy_core::{
    Books, Categories, CoreError, DeleteOutcome, LoadOutcome, OptionsOutcome, Resource, Reviews,
    SubmitOutcome,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast shown in the status bar until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// A finished request of one resource screen.
#[derive(Debug)]
pub enum ResourceMsg<R: Resource> {
    Loaded(LoadOutcome<R>),
    Saved(SubmitOutcome),
    Deleted(DeleteOutcome),
    Options(OptionsOutcome),
}

impl<R: Resource> Clone for ResourceMsg<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Loaded(o) => Self::Loaded(o.clone()),
            Self::Saved(o) => Self::Saved(o.clone()),
            Self::Deleted(o) => Self::Deleted(o.clone()),
            Self::Options(o) => Self::Options(o.clone()),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Session ───────────────────────────────────────────────────
    /// A login request finished. `Ok` carries the token to persist.
    LoginFinished {
        email: String,
        result: Result<SecretString, CoreError>,
    },
    /// The session token was installed or cleared.
    SessionChanged { authenticated: bool },
    Logout,

    // ── Resource results ──────────────────────────────────────────
    Books(ResourceMsg<Books>),
    Categories(ResourceMsg<Categories>),
    Reviews(ResourceMsg<Reviews>),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

impl Action {
    /// The screen a request result belongs to, regardless of which
    /// screen is active.
    pub fn target(&self) -> Option<ScreenId> {
        match self {
            Self::Books(_) => Some(ScreenId::Books),
            Self::Categories(_) => Some(ScreenId::Categories),
            Self::Reviews(_) => Some(ScreenId::Reviews),
            Self::LoginFinished { .. } => Some(ScreenId::Login),
            _ => None,
        }
    }
}
