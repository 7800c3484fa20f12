// ── Resource list controller ──
//
// Owns the page cursor, the active filter, the loaded rows, and which
// row (if any) is open in a detail view or form. Loads are split into
// `begin_load` (state transition + owned ticket) and `finish_load`
// (apply the outcome) so an event loop can run the request elsewhere and
// feed the result back. Only the newest ticket's outcome is applied, and
// nothing is applied once the controller's lifetime token is cancelled.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;
use shelfy_api::ShelfClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::QueryCache;
use crate::context::Context;
use crate::error::CoreError;
use crate::resource::{ListQuery, Resource};

// ── States ───────────────────────────────────────────────────────────

/// Progress of the most recent list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}

/// What the screen currently has open. At most one entity is selected,
/// and a detail view and a form are never open together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<E> {
    #[default]
    Idle,
    Viewing(E),
    Editing(E),
    Creating,
}

impl<E> Selection<E> {
    pub fn entity(&self) -> Option<&E> {
        match self {
            Self::Viewing(e) | Self::Editing(e) => Some(e),
            Self::Idle | Self::Creating => None,
        }
    }

    pub fn is_detail_open(&self) -> bool {
        matches!(self, Self::Viewing(_))
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self, Self::Editing(_) | Self::Creating)
    }
}

// ── Tickets ──────────────────────────────────────────────────────────

/// An issued list request. Owns everything it needs, so it can be moved
/// into a spawned task.
pub struct LoadTicket<R: Resource> {
    generation: u64,
    query: ListQuery<R::Filter>,
    token: SecretString,
    api: Arc<ShelfClient>,
    cancel: CancellationToken,
}

impl<R: Resource> LoadTicket<R> {
    pub fn query(&self) -> &ListQuery<R::Filter> {
        &self.query
    }

    /// Perform the request. Resolves to `Cancelled` if the owning
    /// controller is disposed first.
    pub async fn run(self) -> LoadOutcome<R> {
        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = R::list(&self.api, &self.token, &self.query) => result,
        };
        LoadOutcome {
            generation: self.generation,
            query: self.query,
            result: result.map(Arc::new),
        }
    }
}

impl<R: Resource> fmt::Debug for LoadTicket<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadTicket")
            .field("resource", &R::KIND)
            .field("generation", &self.generation)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// Result of a [`LoadTicket`], to be handed to
/// [`ListController::finish_load`].
pub struct LoadOutcome<R: Resource> {
    generation: u64,
    query: ListQuery<R::Filter>,
    pub result: Result<Arc<Vec<R::Entity>>, CoreError>,
}

impl<R: Resource> LoadOutcome<R> {
    pub fn query(&self) -> &ListQuery<R::Filter> {
        &self.query
    }
}

impl<R: Resource> Clone for LoadOutcome<R> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            query: self.query.clone(),
            result: self.result.clone(),
        }
    }
}

impl<R: Resource> fmt::Debug for LoadOutcome<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOutcome")
            .field("resource", &R::KIND)
            .field("generation", &self.generation)
            .field("query", &self.query)
            .field("rows", &self.result.as_ref().map(|items| items.len()))
            .finish()
    }
}

// ── Controller ───────────────────────────────────────────────────────

pub struct ListController<R: Resource> {
    ctx: Context,
    page: u32,
    /// Page and filter of the last successful load; restored when a load
    /// fails so the cursor always describes the rows on screen.
    loaded_page: u32,
    loaded_filter: R::Filter,
    limit: u32,
    filter: R::Filter,
    items: Arc<Vec<R::Entity>>,
    state: LoadState,
    selection: Selection<R::Entity>,
    generation: u64,
    lifetime: CancellationToken,
    cache: QueryCache<ListQuery<R::Filter>, R::Entity>,
}

impl<R: Resource> ListController<R> {
    pub fn new(ctx: Context) -> Self {
        Self::with_lifetime(ctx, CancellationToken::new())
    }

    /// Build a controller whose in-flight work stops when `lifetime` is
    /// cancelled.
    pub fn with_lifetime(ctx: Context, lifetime: CancellationToken) -> Self {
        let limit = ctx.page_size();
        Self {
            ctx,
            page: 1,
            loaded_page: 1,
            loaded_filter: R::Filter::default(),
            limit,
            filter: R::Filter::default(),
            items: Arc::new(Vec::new()),
            state: LoadState::Idle,
            selection: Selection::Idle,
            generation: 0,
            lifetime,
            cache: QueryCache::default(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn filter(&self) -> &R::Filter {
        &self.filter
    }

    pub fn items(&self) -> &[R::Entity] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn selection(&self) -> &Selection<R::Entity> {
        &self.selection
    }

    pub fn cache(&self) -> &QueryCache<ListQuery<R::Filter>, R::Entity> {
        &self.cache
    }

    pub fn is_disposed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// The query the next load will issue.
    pub fn query(&self) -> ListQuery<R::Filter> {
        ListQuery {
            page: self.page,
            limit: self.limit,
            filter: self.filter.clone(),
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Always `true`: the server does not report a total count, so the
    /// last page is only discovered by loading past it.
    pub fn has_next_page(&self) -> bool {
        true
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Enter `Loading` and issue a ticket for the current query.
    ///
    /// A cached copy of the same query, if any, becomes visible at once.
    pub fn begin_load(&mut self) -> Result<LoadTicket<R>, CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Cancelled);
        }
        let token = match self.ctx.token() {
            Ok(token) => token,
            Err(err) => {
                self.state = LoadState::Failed {
                    message: err.to_string(),
                };
                return Err(err);
            }
        };

        self.generation += 1;
        let query = self.query();
        if let Some(cached) = self.cache.get(&query) {
            self.items = cached;
        }
        self.state = LoadState::Loading;
        debug!(resource = %R::KIND, page = query.page, filter = ?query.filter, "loading list");

        Ok(LoadTicket {
            generation: self.generation,
            query,
            token,
            api: self.ctx.api_handle(),
            cancel: self.lifetime.child_token(),
        })
    }

    /// Apply a finished load. Returns `false` when the outcome was
    /// discarded (superseded by a newer load, or the controller is gone).
    pub fn finish_load(&mut self, outcome: LoadOutcome<R>) -> bool {
        if self.is_disposed() || outcome.generation != self.generation {
            debug!(resource = %R::KIND, generation = outcome.generation, "discarding stale list load");
            return false;
        }

        match outcome.result {
            Ok(items) => {
                self.cache.insert(outcome.query.clone(), Arc::clone(&items));
                self.items = items;
                self.loaded_page = outcome.query.page;
                self.loaded_filter = outcome.query.filter;
                self.state = LoadState::Loaded;
            }
            Err(CoreError::Cancelled) => {
                self.page = self.loaded_page;
                self.filter = self.loaded_filter.clone();
                self.state = LoadState::Idle;
            }
            Err(err) => {
                warn!(resource = %R::KIND, page = outcome.query.page, error = %err, "list load failed");
                self.page = self.loaded_page;
                self.filter = self.loaded_filter.clone();
                let fallback = self.query();
                if let Some(items) = self.cache.get(&fallback) {
                    self.items = items;
                }
                let default = format!("Failed to load {}", R::KIND.plural().to_lowercase());
                self.state = LoadState::Failed {
                    message: err.user_message(&default),
                };
            }
        }
        true
    }

    /// Load the current query to completion.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let outcome = self.begin_load()?.run().await;
        let result = outcome.result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish_load(outcome);
        result
    }

    // ── Paging & filter ──────────────────────────────────────────────

    /// Move the cursor by `delta` pages, never below 1. Returns `true`
    /// when the page changed and a load is due.
    pub fn change_page(&mut self, delta: i64) -> bool {
        let target = (i64::from(self.page) + delta).max(1);
        let target = u32::try_from(target).unwrap_or(u32::MAX);
        if target == self.page {
            return false;
        }
        self.page = target;
        true
    }

    /// Swap the query filter. Returns `true` when it changed and a load
    /// is due. The page cursor is left alone.
    pub fn set_filter(&mut self, filter: R::Filter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        true
    }

    pub fn clear_filter(&mut self) -> bool {
        self.set_filter(R::Filter::default())
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn select_for_view(&mut self, entity: R::Entity) {
        self.selection = Selection::Viewing(entity);
    }

    pub fn select_for_edit(&mut self, entity: R::Entity) {
        self.selection = Selection::Editing(entity);
    }

    pub fn select_for_create(&mut self) {
        self.selection = Selection::Creating;
    }

    pub fn close(&mut self) {
        self.selection = Selection::Idle;
    }

    /// A create, update, or delete went through: drop cached pages,
    /// return to `Idle`, and reload the active page and filter.
    pub fn on_mutation_succeeded(&mut self) -> Result<LoadTicket<R>, CoreError> {
        self.cache.invalidate_all();
        self.selection = Selection::Idle;
        self.begin_load()
    }

    /// Stop in-flight work and ignore any later completions.
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
    use crate::model::{Category, EntityId};
    use crate::resource::{Categories, ReviewFilter, Reviews};
    use crate::session::Session;

    fn ctx(session: Session) -> Context {
        let transport = TransportConfig::default().with_timeout(Duration::from_secs(1));
        let api = ShelfClient::new("http://127.0.0.1:9", &transport).unwrap();
        Context::from_client(api, session, 10)
    }

    fn logged_in() -> Session {
        Session::with_token(SecretString::from("t".to_owned()))
    }

    fn category(id: u64) -> Category {
        Category {
            id: EntityId::new(id),
            name: format!("c{id}"),
            description: "d".into(),
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn previous_page_at_one_is_noop() {
        let mut list = ListController::<Categories>::new(ctx(logged_in()));
        assert!(!list.change_page(-1));
        assert_eq!(list.page(), 1);
        assert!(!list.has_previous_page());
    }

    #[test]
    fn next_page_always_increments() {
        let mut list = ListController::<Categories>::new(ctx(logged_in()));
        assert!(list.has_next_page());
        assert!(list.change_page(1));
        assert!(list.change_page(1));
        assert_eq!(list.page(), 3);
        assert!(list.change_page(-10));
        assert_eq!(list.page(), 1);
    }

    #[test]
    fn selection_transitions_are_exclusive() {
        let mut list = ListController::<Categories>::new(ctx(logged_in()));
        list.select_for_view(category(1));
        assert!(list.selection().is_detail_open());
        assert!(!list.selection().is_form_open());

        list.select_for_edit(category(1));
        assert!(list.selection().is_form_open());
        assert!(!list.selection().is_detail_open());

        list.select_for_create();
        assert_eq!(list.selection(), &Selection::Creating);
        assert!(list.selection().entity().is_none());

        list.close();
        assert_eq!(list.selection(), &Selection::Idle);
    }

    #[test]
    fn begin_load_without_token_fails_visibly() {
        let mut list = ListController::<Categories>::new(ctx(Session::anonymous()));
        let err = list.begin_load().unwrap_err();
        assert_eq!(err, CoreError::Unauthenticated);
        assert_eq!(list.state().error(), Some("Not logged in"));
    }

    #[test]
    fn filter_swaps_query_and_keeps_page() {
        let mut list = ListController::<Reviews>::new(ctx(logged_in()));
        list.change_page(1);
        let unfiltered = list.query();

        assert!(list.set_filter(ReviewFilter::book(EntityId::new(5))));
        assert_eq!(list.query().filter.book, Some(EntityId::new(5)));
        assert_eq!(list.query().page, 2);
        assert!(!list.set_filter(ReviewFilter::book(EntityId::new(5))));

        assert!(list.clear_filter());
        assert_eq!(list.query(), unfiltered);
    }

    #[test]
    fn stale_outcomes_are_discarded() {
        let mut list = ListController::<Categories>::new(ctx(logged_in()));
        let first = list.begin_load().unwrap();
        let second = list.begin_load().unwrap();

        let stale = LoadOutcome::<Categories> {
            generation: first.generation,
            query: first.query.clone(),
            result: Ok(Arc::new(vec![category(1)])),
        };
        assert!(!list.finish_load(stale));
        assert!(list.state().is_loading());

        let fresh = LoadOutcome::<Categories> {
            generation: second.generation,
            query: second.query.clone(),
            result: Ok(Arc::new(vec![category(2)])),
        };
        assert!(list.finish_load(fresh));
        assert_eq!(list.items()[0].id, EntityId::new(2));
        assert_eq!(list.state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn disposed_controller_ignores_completion() {
        let mut list = ListController::<Categories>::new(ctx(logged_in()));
        let ticket = list.begin_load().unwrap();
        list.dispose();

        let outcome = ticket.run().await;
        assert_eq!(outcome.result.as_ref().unwrap_err(), &CoreError::Cancelled);
        assert!(!list.finish_load(outcome));
        assert!(list.begin_load().is_err());
    }

    #[test]
    fn failed_load_restores_previous_page() {
        let mut list = ListController::<Categories>::new(ctx(logged_in()));
        list.change_page(1);
        let ticket = list.begin_load().unwrap();
        let outcome = LoadOutcome::<Categories> {
            generation: ticket.generation,
            query: ticket.query.clone(),
            result: Err(CoreError::Api {
                status: Some(500),
                message: None,
            }),
        };
        list.finish_load(outcome);
        assert_eq!(list.page(), 1);
        assert_eq!(list.state().error(), Some("Failed to load categories"));
    }
}
