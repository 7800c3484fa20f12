// shelfy-core: Session, resource controllers, and list/form/delete state
// shared by the shelfy CLI and TUI.

pub mod book_reviews;
pub mod cache;
pub mod config;
pub mod context;
pub mod delete;
pub mod error;
pub mod form;
pub mod list;
pub mod model;
pub mod resource;
pub mod screen;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use book_reviews::BookReviewPage;
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE, TlsVerification};
pub use context::Context;
pub use delete::{DeleteEvent, DeleteFlow, DeleteOutcome, DeletePhase, DeleteTicket};
pub use error::CoreError;
pub use form::{FormController, FormEvent, FormMode, SubmitOutcome, SubmitTicket};
pub use list::{ListController, LoadOutcome, LoadState, LoadTicket, Selection};
pub use resource::{
    BookDraft, Books, Categories, CategoryDraft, Draft, FieldKind, FieldSpec, FormContext,
    ListQuery, RefOption, Resource, ResourceKind, ReviewDraft, ReviewFilter, Reviews,
};
pub use screen::{OptionsOutcome, OptionsTicket, ResourceScreen};
pub use session::{RouteDecision, RouteKind, Session};

pub use model::{Book, BookSnapshot, Category, EntityId, HasId, Review, UNCATEGORIZED};
