// ── Resource screen ──
//
// Wires one list controller, at most one open form, and the delete flow
// for a resource, plus the reference-field options the form needs. All
// in-flight work hangs off a single lifetime token that is cancelled
// when the screen is disposed or dropped.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;
use shelfy_api::ShelfClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::context::Context;
use crate::delete::{DeleteEvent, DeleteFlow, DeleteOutcome, DeleteTicket};
use crate::error::CoreError;
use crate::form::{FormController, FormEvent, SubmitOutcome, SubmitTicket};
use crate::list::{ListController, LoadTicket, Selection};
use crate::resource::{FormContext, RefOption, Resource};

// ── Option tickets ───────────────────────────────────────────────────

pub struct OptionsTicket<R: Resource> {
    generation: u64,
    token: SecretString,
    api: Arc<ShelfClient>,
    cancel: CancellationToken,
    _resource: std::marker::PhantomData<fn() -> R>,
}

impl<R: Resource> OptionsTicket<R> {
    pub async fn run(self) -> OptionsOutcome {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = R::options(&self.api, &self.token) => result,
        };
        OptionsOutcome {
            generation: self.generation,
            result,
        }
    }
}

impl<R: Resource> fmt::Debug for OptionsTicket<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsTicket")
            .field("resource", &R::KIND)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct OptionsOutcome {
    generation: u64,
    pub result: Result<Vec<RefOption>, CoreError>,
}

// ── Screen ───────────────────────────────────────────────────────────

pub struct ResourceScreen<R: Resource> {
    ctx: Context,
    list: ListController<R>,
    form: Option<FormController<R>>,
    delete: DeleteFlow<R>,
    options: Vec<RefOption>,
    options_generation: u64,
    lifetime: CancellationToken,
}

impl<R: Resource> ResourceScreen<R> {
    pub fn new(ctx: Context) -> Self {
        let lifetime = CancellationToken::new();
        Self {
            list: ListController::with_lifetime(ctx.clone(), lifetime.child_token()),
            delete: DeleteFlow::with_lifetime(ctx.clone(), lifetime.child_token()),
            form: None,
            options: Vec::new(),
            options_generation: 0,
            ctx,
            lifetime,
        }
    }

    pub fn list(&self) -> &ListController<R> {
        &self.list
    }

    /// Paging and filter changes go through here; follow them with
    /// [`ListController::begin_load`].
    pub fn list_mut(&mut self) -> &mut ListController<R> {
        &mut self.list
    }

    pub fn form(&self) -> Option<&FormController<R>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormController<R>> {
        self.form.as_mut()
    }

    pub fn deletion(&self) -> &DeleteFlow<R> {
        &self.delete
    }

    /// Reference-field choices (categories for books, books for reviews).
    pub fn options(&self) -> &[RefOption] {
        &self.options
    }

    pub fn selection(&self) -> &Selection<R::Entity> {
        self.list.selection()
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    // ── Reference options ────────────────────────────────────────────

    pub fn begin_options(&mut self) -> Result<OptionsTicket<R>, CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Cancelled);
        }
        let token = self.ctx.token()?;
        self.options_generation += 1;
        Ok(OptionsTicket {
            generation: self.options_generation,
            token,
            api: self.ctx.api_handle(),
            cancel: self.lifetime.child_token(),
            _resource: std::marker::PhantomData,
        })
    }

    /// Store fetched options. An untouched create form is reseeded so its
    /// reference field picks up the new defaults.
    pub fn finish_options(&mut self, outcome: OptionsOutcome) {
        if self.is_disposed() || outcome.generation != self.options_generation {
            return;
        }
        match outcome.result {
            Ok(options) => {
                debug!(resource = %R::KIND, count = options.len(), "reference options loaded");
                self.options = options;
                let pristine = self.form.as_ref().is_some_and(|form| {
                    let seed = FormContext {
                        options: Vec::new(),
                        filter: self.list.filter().clone(),
                    };
                    !form.is_edit()
                        && !form.is_submitting()
                        && form.draft() == &R::default_draft(&seed)
                });
                if pristine {
                    self.open_create_form();
                }
            }
            Err(CoreError::Cancelled) => {}
            Err(err) => warn!(resource = %R::KIND, error = %err, "failed to load reference options"),
        }
    }

    pub async fn load_options(&mut self) -> Result<(), CoreError> {
        let outcome = self.begin_options()?.run().await;
        let result = outcome.result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish_options(outcome);
        result
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Open the detail view for `entity`. Selection changes are refused
    /// (returning `false`) while a delete is in flight, so its outcome
    /// always lands on the record it was issued for.
    pub fn view(&mut self, entity: R::Entity) -> bool {
        if self.delete.is_deleting() {
            return false;
        }
        self.discard_form();
        self.delete.reset();
        self.list.select_for_view(entity);
        true
    }

    /// Open the edit form for `entity`, pre-populated with its values.
    pub fn edit(&mut self, entity: R::Entity) -> bool {
        if self.delete.is_deleting() {
            return false;
        }
        self.discard_form();
        self.delete.reset();
        self.form = Some(
            FormController::edit(self.ctx.clone(), entity.clone())
                .with_lifetime(self.lifetime.child_token()),
        );
        self.list.select_for_edit(entity);
        true
    }

    /// Switch the open detail view to its edit form. Returns `false`
    /// when no detail view is open or a delete is in flight.
    pub fn edit_selected(&mut self) -> bool {
        let Selection::Viewing(entity) = self.list.selection() else {
            return false;
        };
        let entity = entity.clone();
        self.edit(entity)
    }

    /// Open an empty create form.
    pub fn create(&mut self) -> bool {
        if self.delete.is_deleting() {
            return false;
        }
        self.discard_form();
        self.delete.reset();
        self.open_create_form();
        self.list.select_for_create();
        true
    }

    fn open_create_form(&mut self) {
        if let Some(form) = self.form.take() {
            form.dispose();
        }
        let seed = FormContext {
            options: self.options.clone(),
            filter: self.list.filter().clone(),
        };
        self.form = Some(
            FormController::create(self.ctx.clone(), &seed)
                .with_lifetime(self.lifetime.child_token()),
        );
    }

    fn discard_form(&mut self) {
        if let Some(form) = self.form.take() {
            form.dispose();
        }
    }

    /// Close whatever is open. A save still in flight is abandoned; a
    /// delete in flight is not, and keeps its detail view open.
    pub fn close(&mut self) -> bool {
        if self.delete.is_deleting() {
            return false;
        }
        self.discard_form();
        self.delete.reset();
        self.list.close();
        true
    }

    // ── Save ─────────────────────────────────────────────────────────

    pub fn begin_submit(&mut self) -> Result<SubmitTicket<R>, CoreError> {
        let form = self.form.as_mut().ok_or_else(|| CoreError::Internal("no form is open".into()))?;
        form.begin_submit()
    }

    /// Apply a save outcome. On success the form closes and the returned
    /// ticket reloads the active page.
    pub fn finish_submit(&mut self, outcome: SubmitOutcome) -> Option<LoadTicket<R>> {
        let form = self.form.as_mut()?;
        match form.finish_submit(outcome) {
            FormEvent::Saved => {
                self.form = None;
                self.list.on_mutation_succeeded().ok()
            }
            FormEvent::Failed | FormEvent::Ignored => None,
        }
    }

    /// Save the open form, then reload the list if it went through.
    pub async fn submit(&mut self) -> Result<(), CoreError> {
        let outcome = self.begin_submit()?.run().await;
        let result = outcome.result.clone();
        if let Some(ticket) = self.finish_submit(outcome) {
            let loaded = ticket.run().await;
            self.list.finish_load(loaded);
        }
        result
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Show the delete prompt for the record in the detail view.
    pub fn request_delete(&mut self) -> bool {
        if !self.list.selection().is_detail_open() {
            return false;
        }
        self.delete.request_delete();
        self.delete.is_confirming()
    }

    pub fn cancel_delete(&mut self) {
        self.delete.cancel_delete();
    }

    /// The user confirmed the prompt.
    pub fn begin_delete(&mut self) -> Result<DeleteTicket<R>, CoreError> {
        let Selection::Viewing(entity) = self.list.selection() else {
            return Err(CoreError::NotConfirmed);
        };
        let entity = entity.clone();
        self.delete.confirm_delete(&entity)
    }

    /// Apply a delete outcome. On success the detail view closes and the
    /// returned ticket reloads the active page; on failure the view stays
    /// open with the error.
    pub fn finish_delete(&mut self, outcome: DeleteOutcome) -> Option<LoadTicket<R>> {
        match self.delete.finish_delete(outcome) {
            DeleteEvent::Deleted => {
                self.delete.reset();
                self.list.on_mutation_succeeded().ok()
            }
            DeleteEvent::Failed | DeleteEvent::Ignored => None,
        }
    }

    /// Confirm the pending delete and reload the list if it went through.
    pub async fn confirm_delete(&mut self) -> Result<(), CoreError> {
        let outcome = self.begin_delete()?.run().await;
        let result = outcome.result.clone();
        if let Some(ticket) = self.finish_delete(outcome) {
            let loaded = ticket.run().await;
            self.list.finish_load(loaded);
        }
        result
    }

    // ── Loading ──────────────────────────────────────────────────────

    pub fn begin_load(&mut self) -> Result<LoadTicket<R>, CoreError> {
        self.list.begin_load()
    }

    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        self.list.load().await
    }

    /// Cancel everything in flight; later outcomes are ignored.
    pub fn dispose(&self) {
        self.lifetime.cancel();
    }
}

impl<R: Resource> Drop for ResourceScreen<R> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
