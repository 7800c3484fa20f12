use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelfy_api::types::BookResponse;

use super::{EntityId, HasId, UNCATEGORIZED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub author: String,
    pub category_id: Option<EntityId>,
    pub category_name: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Book {
    pub fn category_label(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }

    pub fn was_updated(&self) -> bool {
        super::was_updated(self.created_at, self.updated_at)
    }
}

impl HasId for Book {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl From<BookResponse> for Book {
    fn from(b: BookResponse) -> Self {
        // Some endpoints only embed the category object.
        let category_id = b
            .category_id
            .or_else(|| b.category.as_ref().map(|c| c.id))
            .map(EntityId::new);
        Self {
            id: EntityId::new(b.id),
            title: b.title,
            author: b.author,
            category_id,
            category_name: b.category.map(|c| c.name),
            image_url: b.image_url.filter(|u| !u.is_empty()),
            description: b.description,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
