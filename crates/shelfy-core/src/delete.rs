// ── Delete confirmation flow ──
//
// Idle → Confirming → Deleting → (Idle). The DELETE request is only
// issued from `Confirming`; dismissing the prompt goes straight back to
// `Idle`. A failure leaves the detail view open with an inline error.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;
use shelfy_api::ShelfClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::Context;
use crate::error::CoreError;
use crate::model::{EntityId, HasId};
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePhase {
    #[default]
    Idle,
    /// The confirmation prompt is showing.
    Confirming,
    /// The DELETE request is in flight.
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteEvent {
    Deleted,
    Failed,
    Ignored,
}

pub struct DeleteTicket<R: Resource> {
    generation: u64,
    id: EntityId,
    token: SecretString,
    api: Arc<ShelfClient>,
    cancel: CancellationToken,
    _resource: std::marker::PhantomData<fn() -> R>,
}

impl<R: Resource> DeleteTicket<R> {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub async fn run(self) -> DeleteOutcome {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = R::delete(&self.api, &self.token, self.id) => result,
        };
        DeleteOutcome {
            generation: self.generation,
            id: self.id,
            result,
        }
    }
}

impl<R: Resource> fmt::Debug for DeleteTicket<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteTicket")
            .field("resource", &R::KIND)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    generation: u64,
    pub id: EntityId,
    pub result: Result<(), CoreError>,
}

pub struct DeleteFlow<R: Resource> {
    ctx: Context,
    phase: DeletePhase,
    error: Option<String>,
    generation: u64,
    lifetime: CancellationToken,
    _resource: std::marker::PhantomData<fn() -> R>,
}

impl<R: Resource> DeleteFlow<R> {
    pub fn new(ctx: Context) -> Self {
        Self::with_lifetime(ctx, CancellationToken::new())
    }

    pub fn with_lifetime(ctx: Context, lifetime: CancellationToken) -> Self {
        Self {
            ctx,
            phase: DeletePhase::Idle,
            error: None,
            generation: 0,
            lifetime,
            _resource: std::marker::PhantomData,
        }
    }

    pub fn phase(&self) -> DeletePhase {
        self.phase
    }

    pub fn is_confirming(&self) -> bool {
        self.phase == DeletePhase::Confirming
    }

    pub fn is_deleting(&self) -> bool {
        self.phase == DeletePhase::Deleting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show the confirmation prompt. Ignored while a delete is in flight.
    pub fn request_delete(&mut self) {
        if self.phase == DeletePhase::Idle {
            self.phase = DeletePhase::Confirming;
        }
    }

    /// Dismiss the prompt without deleting anything.
    pub fn cancel_delete(&mut self) {
        if self.phase == DeletePhase::Confirming {
            self.phase = DeletePhase::Idle;
        }
    }

    /// The user confirmed: issue the DELETE for `entity`.
    pub fn confirm_delete(&mut self, entity: &R::Entity) -> Result<DeleteTicket<R>, CoreError> {
        if self.lifetime.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        match self.phase {
            DeletePhase::Confirming => {}
            DeletePhase::Deleting => {
                return Err(CoreError::InProgress {
                    operation: format!("deleting {}", R::KIND),
                });
            }
            DeletePhase::Idle => return Err(CoreError::NotConfirmed),
        }
        let token = match self.ctx.token() {
            Ok(token) => token,
            Err(err) => {
                self.phase = DeletePhase::Idle;
                self.error = Some(err.user_message(R::DELETE_FAILED));
                return Err(err);
            }
        };

        self.phase = DeletePhase::Deleting;
        self.error = None;
        self.generation += 1;

        Ok(DeleteTicket {
            generation: self.generation,
            id: entity.id(),
            token,
            api: self.ctx.api_handle(),
            cancel: self.lifetime.child_token(),
            _resource: std::marker::PhantomData,
        })
    }

    pub fn finish_delete(&mut self, outcome: DeleteOutcome) -> DeleteEvent {
        if self.lifetime.is_cancelled() || outcome.generation != self.generation {
            return DeleteEvent::Ignored;
        }
        self.phase = DeletePhase::Idle;

        match outcome.result {
            Ok(()) => {
                info!(resource = %R::KIND, id = %outcome.id, "deleted");
                DeleteEvent::Deleted
            }
            Err(err) => {
                warn!(resource = %R::KIND, id = %outcome.id, error = %err, "delete failed");
                self.error = Some(err.user_message(R::DELETE_FAILED));
                DeleteEvent::Failed
            }
        }
    }

    /// Clear the prompt and any error, e.g. when the detail view closes.
    /// Has no effect while the request is in flight.
    pub fn reset(&mut self) {
        if self.phase != DeletePhase::Deleting {
            self.phase = DeletePhase::Idle;
            self.error = None;
        }
    }

    /// Confirm and run the delete to completion.
    pub async fn delete(&mut self, entity: &R::Entity) -> Result<(), CoreError> {
        let outcome = self.confirm_delete(entity)?.run().await;
        let result = outcome.result.clone();
        match (self.finish_delete(outcome), result) {
            (DeleteEvent::Deleted, _) => Ok(()),
            (DeleteEvent::Failed, Err(err)) => Err(err),
            _ => Err(CoreError::Cancelled),
        }
    }

    pub fn dispose(&self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use shelfy_api::TransportConfig;

    use super::*;
    use crate::model::Category;
    use crate::resource::Categories;
    use crate::session::Session;

    fn flow() -> DeleteFlow<Categories> {
        let transport = TransportConfig::default().with_timeout(Duration::from_secs(1));
        let api = ShelfClient::new("http://127.0.0.1:9", &transport).unwrap();
        let session = Session::with_token(SecretString::from("t".to_owned()));
        DeleteFlow::new(Context::from_client(api, session, 10))
    }

    fn category() -> Category {
        Category {
            id: EntityId::new(3),
            name: "Poetry".into(),
            description: String::new(),
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut flow = flow();
        assert_eq!(
            flow.confirm_delete(&category()).unwrap_err(),
            CoreError::NotConfirmed
        );
        assert_eq!(flow.phase(), DeletePhase::Idle);
    }

    #[test]
    fn dismissing_prompt_returns_to_idle() {
        let mut flow = flow();
        flow.request_delete();
        assert!(flow.is_confirming());
        flow.cancel_delete();
        assert_eq!(flow.phase(), DeletePhase::Idle);
    }

    #[test]
    fn failure_surfaces_server_message() {
        let mut flow = flow();
        flow.request_delete();
        let ticket = flow.confirm_delete(&category()).unwrap();
        assert!(flow.is_deleting());
        assert_eq!(ticket.id(), EntityId::new(3));

        let event = flow.finish_delete(DeleteOutcome {
            generation: ticket.generation,
            id: ticket.id,
            result: Err(CoreError::Api {
                status: Some(409),
                message: Some("Category in use".into()),
            }),
        });
        assert_eq!(event, DeleteEvent::Failed);
        assert_eq!(flow.error(), Some("Category in use"));
        assert_eq!(flow.phase(), DeletePhase::Idle);
    }

    #[test]
    fn reset_is_ignored_mid_request() {
        let mut flow = flow();
        flow.request_delete();
        let _ticket = flow.confirm_delete(&category()).unwrap();
        flow.reset();
        assert!(flow.is_deleting());
        assert!(matches!(
            flow.confirm_delete(&category()).unwrap_err(),
            CoreError::InProgress { .. }
        ));
    }
}
