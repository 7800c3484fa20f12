use secrecy::SecretString;
use shelfy_api::ShelfClient;
use shelfy_api::types::BookPayload;

use super::{
    Draft, FieldKind, FieldSpec, FormContext, ListQuery, RefOption, Resource, ResourceKind,
    parse_ref, require_ref, require_text, unknown_field,
};
use crate::error::CoreError;
use crate::model::{Book, Category, EntityId};

/// Marker for the `/api/books` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Books;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category_id: Option<EntityId>,
    pub image_url: String,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        label: "Title",
        kind: FieldKind::Text,
        required: true,
    },
    FieldSpec {
        name: "author",
        label: "Author",
        kind: FieldKind::Text,
        required: true,
    },
    FieldSpec {
        name: "categoryId",
        label: "Category",
        kind: FieldKind::Reference,
        required: true,
    },
    FieldSpec {
        name: "imageUrl",
        label: "Image URL",
        kind: FieldKind::Text,
        required: false,
    },
];

impl BookDraft {
    pub fn to_payload(&self) -> Result<BookPayload, CoreError> {
        self.validate()?;
        let category_id = require_ref("categoryId", "Category", self.category_id)?;
        Ok(BookPayload {
            title: self.title.trim().to_owned(),
            author: self.author.trim().to_owned(),
            category_id: category_id.get(),
            image_url: self.image_url.trim().to_owned(),
        })
    }
}

impl Draft for BookDraft {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "author" => Some(self.author.clone()),
            "categoryId" => Some(self.category_id.map(|id| id.to_string()).unwrap_or_default()),
            "imageUrl" => Some(self.image_url.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        match name {
            "title" => value.clone_into(&mut self.title),
            "author" => value.clone_into(&mut self.author),
            "categoryId" => self.category_id = parse_ref(name, value)?,
            "imageUrl" => value.clone_into(&mut self.image_url),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_text("title", "Title", &self.title)?;
        require_text("author", "Author", &self.author)?;
        require_ref("categoryId", "Category", self.category_id)?;
        Ok(())
    }
}

impl Resource for Books {
    type Entity = Book;
    type Draft = BookDraft;
    type Filter = ();

    const KIND: ResourceKind = ResourceKind::Book;
    const SAVE_FAILED: &'static str = "An error occurred while saving the book";
    const DELETE_FAILED: &'static str = "Failed to delete book";

    async fn list(
        api: &ShelfClient,
        token: &SecretString,
        query: &ListQuery<()>,
    ) -> Result<Vec<Book>, CoreError> {
        let books = api.list_books(token, Some(query.page_params())).await?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn create(
        api: &ShelfClient,
        token: &SecretString,
        draft: &BookDraft,
    ) -> Result<(), CoreError> {
        let body = draft.to_payload()?;
        api.create_book(token, &body).await?;
        Ok(())
    }

    async fn update(
        api: &ShelfClient,
        token: &SecretString,
        id: EntityId,
        draft: &BookDraft,
    ) -> Result<(), CoreError> {
        let body = draft.to_payload()?;
        api.update_book(token, id.get(), &body).await?;
        Ok(())
    }

    async fn delete(api: &ShelfClient, token: &SecretString, id: EntityId) -> Result<(), CoreError> {
        api.delete_book(token, id.get()).await?;
        Ok(())
    }

    async fn options(api: &ShelfClient, token: &SecretString) -> Result<Vec<RefOption>, CoreError> {
        let categories = api.list_categories(token, None).await?;
        Ok(categories
            .into_iter()
            .map(Category::from)
            .map(|c| RefOption {
                id: c.id,
                label: c.name,
            })
            .collect())
    }

    fn draft_from(book: &Book) -> BookDraft {
        BookDraft {
            title: book.title.clone(),
            author: book.author.clone(),
            category_id: book.category_id,
            image_url: book.image_url.clone().unwrap_or_default(),
        }
    }

    fn default_draft(ctx: &FormContext<()>) -> BookDraft {
        BookDraft {
            category_id: ctx.options.first().map(|o| o.id),
            ..BookDraft::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn book() -> Book {
        Book {
            id: EntityId::new(3),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            category_id: Some(EntityId::new(2)),
            category_name: Some("Sci-Fi".into()),
            image_url: Some("https://img.example/dune.jpg".into()),
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn edit_draft_mirrors_entity() {
        let draft = Books::draft_from(&book());
        assert_eq!(
            draft,
            BookDraft {
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                category_id: Some(EntityId::new(2)),
                image_url: "https://img.example/dune.jpg".into(),
            }
        );
    }

    #[test]
    fn create_draft_defaults_to_first_category() {
        let ctx = FormContext {
            options: vec![
                RefOption {
                    id: EntityId::new(5),
                    label: "Poetry".into(),
                },
                RefOption {
                    id: EntityId::new(6),
                    label: "Essays".into(),
                },
            ],
            filter: (),
        };
        let draft = Books::default_draft(&ctx);
        assert_eq!(draft.category_id, Some(EntityId::new(5)));
        assert!(draft.title.is_empty());

        let empty = Books::default_draft(&FormContext::default());
        assert_eq!(empty.category_id, None);
    }

    #[test]
    fn set_field_parses_category_id() {
        let mut draft = BookDraft::default();
        draft.set_field("categoryId", "2").unwrap();
        assert_eq!(draft.category_id, Some(EntityId::new(2)));
        assert_eq!(draft.value("categoryId").unwrap(), "2");

        let err = draft.set_field("categoryId", "two").unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "categoryId"));
        assert_eq!(draft.category_id, Some(EntityId::new(2)));

        assert!(draft.set_field("isbn", "x").is_err());
    }

    #[test]
    fn validation_reports_first_missing_field() {
        let mut draft = BookDraft::default();
        assert_eq!(draft.validate().unwrap_err().to_string(), "Title is required");

        draft.title = "Dune".into();
        draft.author = "   ".into();
        assert_eq!(draft.validate().unwrap_err().to_string(), "Author is required");

        draft.author = "Herbert".into();
        assert_eq!(draft.validate().unwrap_err().to_string(), "Category is required");

        draft.category_id = Some(EntityId::new(2));
        let payload = draft.to_payload().unwrap();
        assert_eq!(payload.category_id, 2);
        assert_eq!(payload.image_url, "");
    }
}
