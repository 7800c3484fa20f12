// ── Resource abstraction ──
//
// Books, categories, and reviews share one list/form/delete workflow.
// Each is a zero-sized marker implementing `Resource`, which names the
// entity, its draft, its list filter, and the four REST calls. The
// controllers are generic over it.

mod books;
mod categories;
mod reviews;

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use secrecy::SecretString;
use shelfy_api::ShelfClient;
use shelfy_api::types::PageParams;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::error::CoreError;
use crate::model::{EntityId, HasId};

pub use books::{BookDraft, Books};
pub use categories::{Categories, CategoryDraft};
pub use reviews::{ReviewDraft, ReviewFilter, Reviews};

/// Which resource a controller manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Book,
    Category,
    Review,
}

impl ResourceKind {
    /// Title-case plural, for headings.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Book => "Books",
            Self::Category => "Categories",
            Self::Review => "Reviews",
        }
    }
}

/// Cache key and request parameters of one list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery<F> {
    pub page: u32,
    pub limit: u32,
    pub filter: F,
}

impl<F> ListQuery<F> {
    pub fn page_params(&self) -> PageParams {
        PageParams::new(self.page, self.limit)
    }
}

/// One choice in a reference field (category for books, book for reviews).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefOption {
    pub id: EntityId,
    pub label: String,
}

/// What a create-mode form is seeded from.
#[derive(Debug, Clone, Default)]
pub struct FormContext<F> {
    /// Choices for the resource's reference field, in server order.
    pub options: Vec<RefOption>,
    /// Active list filter (reviews preselect the filtered book).
    pub filter: F,
}

// ── Drafts ───────────────────────────────────────────────────────────

/// How a form field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Multi-line free text.
    LongText,
    /// Id chosen from [`FormContext::options`].
    Reference,
}

/// Static description of one draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Name accepted by [`Draft::set_field`] (matches the request body key).
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// Editable, unsaved form state for a resource.
pub trait Draft: Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    fn fields() -> &'static [FieldSpec];

    /// Current textual value of `name` (ids render as digits, unset as "").
    fn value(&self, name: &str) -> Option<String>;

    /// Set a field from text. Id fields parse their digits; an empty id
    /// clears the reference.
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError>;

    /// Required-field check, reporting the first failure.
    fn validate(&self) -> Result<(), CoreError>;
}

pub(crate) fn require_text(field: &str, label: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, format!("{label} is required")));
    }
    Ok(())
}

pub(crate) fn require_ref(
    field: &str,
    label: &str,
    value: Option<EntityId>,
) -> Result<EntityId, CoreError> {
    value.ok_or_else(|| CoreError::validation(field, format!("{label} is required")))
}

pub(crate) fn parse_ref(field: &str, value: &str) -> Result<Option<EntityId>, CoreError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value
        .parse::<EntityId>()
        .map(Some)
        .map_err(|_| CoreError::validation(field, format!("'{value}' is not a valid id")))
}

pub(crate) fn unknown_field(name: &str) -> CoreError {
    CoreError::validation(name, format!("unknown field '{name}'"))
}

// ── Resource ─────────────────────────────────────────────────────────

/// One REST resource managed through the list/form/delete workflow.
pub trait Resource: Send + Sync + Sized + 'static {
    type Entity: HasId + Clone + Debug + PartialEq + Send + Sync + 'static;
    type Draft: Draft;
    type Filter: Clone + Debug + Default + PartialEq + Eq + Hash + Send + Sync + 'static;

    const KIND: ResourceKind;
    /// Inline message when a save fails without a server message.
    const SAVE_FAILED: &'static str;
    /// Inline message when a delete fails without a server message.
    const DELETE_FAILED: &'static str;

    fn list(
        api: &ShelfClient,
        token: &SecretString,
        query: &ListQuery<Self::Filter>,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, CoreError>> + Send;

    fn create(
        api: &ShelfClient,
        token: &SecretString,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn update(
        api: &ShelfClient,
        token: &SecretString,
        id: EntityId,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(
        api: &ShelfClient,
        token: &SecretString,
        id: EntityId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Choices for the draft's reference field. Empty when it has none.
    fn options(
        api: &ShelfClient,
        token: &SecretString,
    ) -> impl Future<Output = Result<Vec<RefOption>, CoreError>> + Send;

    /// Edit-mode draft: exactly the entity's current values.
    fn draft_from(entity: &Self::Entity) -> Self::Draft;

    /// Create-mode draft.
    fn default_draft(ctx: &FormContext<Self::Filter>) -> Self::Draft;
}
