use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelfy_api::types::{ReviewBook, ReviewResponse};

use super::{EntityId, HasId, UNCATEGORIZED};

/// Book details the server embeds in each review for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub id: EntityId,
    pub title: String,
    pub cover_image: Option<String>,
    pub category_name: Option<String>,
}

impl From<ReviewBook> for BookSnapshot {
    fn from(b: ReviewBook) -> Self {
        Self {
            id: EntityId::new(b.id),
            title: b.title,
            cover_image: b.cover_image.filter(|u| !u.is_empty()),
            category_name: b.category.map(|c| c.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: EntityId,
    pub book_id: EntityId,
    /// Review text.
    pub ulasan: String,
    pub user_id: Option<EntityId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub book: Option<BookSnapshot>,
}

impl Review {
    /// Title of the reviewed book, falling back to its id.
    pub fn book_title(&self) -> String {
        self.book
            .as_ref()
            .map_or_else(|| format!("Book #{}", self.book_id), |b| b.title.clone())
    }

    pub fn category_label(&self) -> &str {
        self.book
            .as_ref()
            .and_then(|b| b.category_name.as_deref())
            .unwrap_or(UNCATEGORIZED)
    }
}

impl HasId for Review {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl From<ReviewResponse> for Review {
    fn from(r: ReviewResponse) -> Self {
        Self {
            id: EntityId::new(r.id),
            book_id: EntityId::new(r.book_id),
            ulasan: r.ulasan,
            user_id: r.user_id.map(EntityId::new),
            created_at: r.created_at,
            updated_at: r.updated_at,
            book: r.book.map(BookSnapshot::from),
        }
    }
}
