// ── Resource form controller ──
//
// Holds the draft behind a create or edit form. Submitting validates the
// draft, then issues POST (create) or PUT (update) with the whole draft.
// A failed save keeps the form open and populated, with the server's
// message (or the resource's generic one) as the inline error.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;
use shelfy_api::ShelfClient;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::Context;
use crate::error::CoreError;
use crate::model::{EntityId, HasId};
use crate::resource::{Draft, FormContext, Resource};

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<E> {
    Create,
    /// The record being edited.
    Edit(E),
}

/// What [`FormController::finish_submit`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// The server accepted the draft; the caller should close the form
    /// and refresh its list.
    Saved,
    /// The save failed; the form shows the error and stays open.
    Failed,
    /// Superseded or the form was disposed.
    Ignored,
}

// ── Tickets ──────────────────────────────────────────────────────────

pub struct SubmitTicket<R: Resource> {
    generation: u64,
    target: Option<EntityId>,
    draft: R::Draft,
    token: SecretString,
    api: Arc<ShelfClient>,
    cancel: CancellationToken,
}

impl<R: Resource> SubmitTicket<R> {
    /// `None` for a create, the record id for an update.
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub async fn run(self) -> SubmitOutcome {
        let save = async {
            match self.target {
                Some(id) => R::update(&self.api, &self.token, id, &self.draft).await,
                None => R::create(&self.api, &self.token, &self.draft).await,
            }
        };
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = save => result,
        };
        SubmitOutcome {
            generation: self.generation,
            result,
        }
    }
}

impl<R: Resource> fmt::Debug for SubmitTicket<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitTicket")
            .field("resource", &R::KIND)
            .field("target", &self.target)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    generation: u64,
    pub result: Result<(), CoreError>,
}

// ── Controller ───────────────────────────────────────────────────────

pub struct FormController<R: Resource> {
    ctx: Context,
    mode: FormMode<R::Entity>,
    draft: R::Draft,
    submitting: bool,
    error: Option<String>,
    generation: u64,
    lifetime: CancellationToken,
}

impl<R: Resource> FormController<R> {
    /// Create-mode form seeded with the resource defaults.
    pub fn create(ctx: Context, form_ctx: &FormContext<R::Filter>) -> Self {
        Self::with_mode(ctx, FormMode::Create, R::default_draft(form_ctx))
    }

    /// Edit-mode form pre-populated from `entity`.
    pub fn edit(ctx: Context, entity: R::Entity) -> Self {
        let draft = R::draft_from(&entity);
        Self::with_mode(ctx, FormMode::Edit(entity), draft)
    }

    fn with_mode(ctx: Context, mode: FormMode<R::Entity>, draft: R::Draft) -> Self {
        Self {
            ctx,
            mode,
            draft,
            submitting: false,
            error: None,
            generation: 0,
            lifetime: CancellationToken::new(),
        }
    }

    /// Tie in-flight saves to an outer lifetime.
    pub fn with_lifetime(mut self, lifetime: CancellationToken) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn mode(&self) -> &FormMode<R::Entity> {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    /// The record being edited, if any.
    pub fn backing(&self) -> Option<&R::Entity> {
        match &self.mode {
            FormMode::Edit(entity) => Some(entity),
            FormMode::Create => None,
        }
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        self.draft.set_field(name, value)
    }

    /// Validate and issue a save ticket.
    ///
    /// Refused while a save is already in flight. Validation and session
    /// failures are also recorded as the inline error.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<R>, CoreError> {
        if self.lifetime.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        if self.submitting {
            return Err(CoreError::InProgress {
                operation: format!("saving {}", R::KIND),
            });
        }
        if let Err(err) = self.draft.validate() {
            self.error = Some(err.user_message(R::SAVE_FAILED));
            return Err(err);
        }
        let token = match self.ctx.token() {
            Ok(token) => token,
            Err(err) => {
                self.error = Some(err.user_message(R::SAVE_FAILED));
                return Err(err);
            }
        };

        self.submitting = true;
        self.error = None;
        self.generation += 1;

        Ok(SubmitTicket {
            generation: self.generation,
            target: self.backing().map(HasId::id),
            draft: self.draft.clone(),
            token,
            api: self.ctx.api_handle(),
            cancel: self.lifetime.child_token(),
        })
    }

    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> FormEvent {
        if self.lifetime.is_cancelled() || outcome.generation != self.generation {
            return FormEvent::Ignored;
        }
        self.submitting = false;

        match outcome.result {
            Ok(()) => {
                info!(resource = %R::KIND, edit = self.is_edit(), "saved");
                FormEvent::Saved
            }
            Err(err) => {
                warn!(resource = %R::KIND, error = %err, "save failed");
                self.error = Some(err.user_message(R::SAVE_FAILED));
                FormEvent::Failed
            }
        }
    }

    /// Validate, save, and apply the outcome.
    pub async fn submit(&mut self) -> Result<(), CoreError> {
        let outcome = self.begin_submit()?.run().await;
        let result = outcome.result.clone();
        match (self.finish_submit(outcome), result) {
            (FormEvent::Saved, _) => Ok(()),
            (FormEvent::Failed, Err(err)) => Err(err),
            _ => Err(CoreError::Cancelled),
        }
    }

    /// Abandon the form; a save still in flight is cancelled.
    pub fn dispose(&self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;
    use shelfy_api::TransportConfig;

    use super::*;
    use crate::model::Category;
    use crate::resource::{Categories, CategoryDraft};
    use crate::session::Session;

    fn ctx() -> Context {
        let transport = TransportConfig::default().with_timeout(Duration::from_secs(1));
        let api = ShelfClient::new("http://127.0.0.1:9", &transport).unwrap();
        Context::from_client(api, Session::with_token(SecretString::from("t".to_owned())), 10)
    }

    fn category() -> Category {
        Category {
            id: EntityId::new(7),
            name: "Poetry".into(),
            description: "Verse".into(),
            user_id: Some(EntityId::new(1)),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn edit_mode_has_backing_entity_and_prefilled_draft() {
        let form = FormController::<Categories>::edit(ctx(), category());
        assert!(form.is_edit());
        assert_eq!(form.backing().unwrap().id, EntityId::new(7));
        assert_eq!(
            form.draft(),
            &CategoryDraft {
                name: "Poetry".into(),
                description: "Verse".into(),
            }
        );
    }

    #[test]
    fn create_mode_starts_empty() {
        let form = FormController::<Categories>::create(ctx(), &FormContext::default());
        assert!(form.backing().is_none());
        assert_eq!(form.draft(), &CategoryDraft::default());
    }

    #[test]
    fn invalid_draft_is_not_submitted() {
        let mut form = FormController::<Categories>::create(ctx(), &FormContext::default());
        form.set_field("name", "Poetry").unwrap();
        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(form.error(), Some("Description is required"));
        assert!(!form.is_submitting());
    }

    #[test]
    fn second_submit_is_refused_while_in_flight() {
        let mut form = FormController::<Categories>::edit(ctx(), category());
        let ticket = form.begin_submit().unwrap();
        assert_eq!(ticket.target(), Some(EntityId::new(7)));
        assert!(form.is_submitting());
        assert!(matches!(
            form.begin_submit().unwrap_err(),
            CoreError::InProgress { .. }
        ));
    }

    #[test]
    fn failed_save_keeps_draft_and_shows_default_message() {
        let mut form = FormController::<Categories>::edit(ctx(), category());
        form.set_field("name", "Poems").unwrap();
        let ticket = form.begin_submit().unwrap();
        let event = form.finish_submit(SubmitOutcome {
            generation: ticket.generation,
            result: Err(CoreError::Api {
                status: Some(500),
                message: None,
            }),
        });
        assert_eq!(event, FormEvent::Failed);
        assert_eq!(
            form.error(),
            Some("An error occurred while saving the category")
        );
        assert_eq!(form.draft().name, "Poems");
        assert!(!form.is_submitting());
    }

    #[test]
    fn disposed_form_ignores_outcome() {
        let mut form = FormController::<Categories>::edit(ctx(), category());
        let ticket = form.begin_submit().unwrap();
        form.dispose();
        let event = form.finish_submit(SubmitOutcome {
            generation: ticket.generation,
            result: Ok(()),
        });
        assert_eq!(event, FormEvent::Ignored);
    }
}
