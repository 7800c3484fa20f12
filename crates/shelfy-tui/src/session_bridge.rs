//! Session bridge: turns session token changes into TUI actions.
//!
//! Runs as a background task watching the shared [`Session`]. Every login
//! or logout, wherever it originated, arrives at the app as
//! [`Action::SessionChanged`] so the route guard can re-run.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use shelfy_core::Session;

use crate::action::Action;

pub async fn run_session_bridge(
    session: Session,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut rx = session.subscribe();
    let mut authenticated = rx.borrow_and_update().is_some();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = rx.borrow_and_update().is_some();
                if now == authenticated {
                    continue;
                }
                authenticated = now;
                debug!(authenticated, "session changed");
                if action_tx.send(Action::SessionChanged { authenticated }).is_err() {
                    break;
                }
            }
        }
    }
    debug!("session bridge stopped");
}
