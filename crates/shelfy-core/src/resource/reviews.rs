use secrecy::SecretString;
use shelfy_api::ShelfClient;
use shelfy_api::types::ReviewPayload;

use super::{
    Draft, FieldKind, FieldSpec, FormContext, ListQuery, RefOption, Resource, ResourceKind,
    parse_ref, require_ref, require_text, unknown_field,
};
use crate::error::CoreError;
use crate::model::{Book, EntityId, Review};

/// Marker for the `/api/review` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reviews;

/// Review list filter. `book: None` lists every review of the current
/// user; `Some(id)` lists the reviews of that book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReviewFilter {
    pub book: Option<EntityId>,
}

impl ReviewFilter {
    pub fn book(id: EntityId) -> Self {
        Self { book: Some(id) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub book_id: Option<EntityId>,
    pub ulasan: String,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "bookId",
        label: "Book",
        kind: FieldKind::Reference,
        required: true,
    },
    FieldSpec {
        name: "ulasan",
        label: "Review",
        kind: FieldKind::LongText,
        required: true,
    },
];

impl ReviewDraft {
    pub fn for_book(book_id: EntityId) -> Self {
        Self {
            book_id: Some(book_id),
            ulasan: String::new(),
        }
    }

    pub fn to_payload(&self) -> Result<ReviewPayload, CoreError> {
        self.validate()?;
        let book_id = require_ref("bookId", "Book", self.book_id)?;
        Ok(ReviewPayload {
            book_id: book_id.get(),
            ulasan: self.ulasan.trim().to_owned(),
        })
    }
}

impl Draft for ReviewDraft {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "bookId" => Some(self.book_id.map(|id| id.to_string()).unwrap_or_default()),
            "ulasan" => Some(self.ulasan.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        match name {
            "bookId" => self.book_id = parse_ref(name, value)?,
            "ulasan" => value.clone_into(&mut self.ulasan),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_ref("bookId", "Book", self.book_id)?;
        require_text("ulasan", "Review", &self.ulasan)
    }
}

impl Resource for Reviews {
    type Entity = Review;
    type Draft = ReviewDraft;
    type Filter = ReviewFilter;

    const KIND: ResourceKind = ResourceKind::Review;
    const SAVE_FAILED: &'static str = "An error occurred while saving the review";
    const DELETE_FAILED: &'static str = "Failed to delete review";

    async fn list(
        api: &ShelfClient,
        token: &SecretString,
        query: &ListQuery<ReviewFilter>,
    ) -> Result<Vec<Review>, CoreError> {
        let params = Some(query.page_params());
        let reviews = match query.filter.book {
            Some(book_id) => api.list_book_reviews(token, book_id.get(), params).await?,
            None => api.list_reviews(token, params).await?,
        };
        Ok(reviews.into_iter().map(Review::from).collect())
    }

    async fn create(
        api: &ShelfClient,
        token: &SecretString,
        draft: &ReviewDraft,
    ) -> Result<(), CoreError> {
        let body = draft.to_payload()?;
        api.create_review(token, &body).await?;
        Ok(())
    }

    async fn update(
        api: &ShelfClient,
        token: &SecretString,
        id: EntityId,
        draft: &ReviewDraft,
    ) -> Result<(), CoreError> {
        let body = draft.to_payload()?;
        api.update_review(token, id.get(), &body).await?;
        Ok(())
    }

    async fn delete(api: &ShelfClient, token: &SecretString, id: EntityId) -> Result<(), CoreError> {
        api.delete_review(token, id.get()).await?;
        Ok(())
    }

    async fn options(api: &ShelfClient, token: &SecretString) -> Result<Vec<RefOption>, CoreError> {
        let books = api.list_books(token, None).await?;
        Ok(books
            .into_iter()
            .map(Book::from)
            .map(|b| RefOption {
                id: b.id,
                label: b.title,
            })
            .collect())
    }

    fn draft_from(review: &Review) -> ReviewDraft {
        ReviewDraft {
            book_id: Some(review.book_id),
            ulasan: review.ulasan.clone(),
        }
    }

    fn default_draft(ctx: &FormContext<ReviewFilter>) -> ReviewDraft {
        ReviewDraft {
            book_id: ctx.filter.book,
            ulasan: String::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn create_draft_preselects_filtered_book() {
        let ctx = FormContext {
            options: Vec::new(),
            filter: ReviewFilter::book(EntityId::new(4)),
        };
        assert_eq!(Reviews::default_draft(&ctx).book_id, Some(EntityId::new(4)));
        assert_eq!(
            Reviews::default_draft(&FormContext::default()).book_id,
            None
        );
    }

    #[test]
    fn empty_book_selection_clears_reference() {
        let mut draft = ReviewDraft::for_book(EntityId::new(1));
        draft.set_field("bookId", "").unwrap();
        assert_eq!(draft.book_id, None);
        assert_eq!(draft.validate().unwrap_err().to_string(), "Book is required");
    }

    #[test]
    fn payload_uses_camel_case_ids() {
        let mut draft = ReviewDraft::default();
        draft.set_field("bookId", "5").unwrap();
        draft.set_field("ulasan", "Great read").unwrap();
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.book_id, 5);
        assert_eq!(payload.ulasan, "Great read");
    }
}
