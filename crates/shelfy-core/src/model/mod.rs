// ── Domain model ──
//
// Client-side views of server records. Wire types from `shelfy-api`
// convert into these; consumers never handle the wire shapes.

mod book;
mod category;
mod entity_id;
mod review;

use chrono::{DateTime, Utc};

pub use book::Book;
pub use category::Category;
pub use entity_id::{EntityId, HasId};
pub use review::{BookSnapshot, Review};

/// Label shown when a book's category is unknown.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// `true` when the record was modified after creation.
pub(crate) fn was_updated(
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
) -> bool {
    match (created_at, updated_at) {
        (Some(created), Some(updated)) => updated != created,
        _ => false,
    }
}
