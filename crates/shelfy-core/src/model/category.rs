use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelfy_api::types::CategoryResponse;

use super::{EntityId, HasId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    /// Owner of the category.
    pub user_id: Option<EntityId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    pub fn was_updated(&self) -> bool {
        super::was_updated(self.created_at, self.updated_at)
    }
}

impl HasId for Category {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl From<CategoryResponse> for Category {
    fn from(c: CategoryResponse) -> Self {
        Self {
            id: EntityId::new(c.id),
            name: c.name,
            description: c.description,
            user_id: c.user_id.map(EntityId::new),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
