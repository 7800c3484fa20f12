use secrecy::SecretString;
use shelfy_api::ShelfClient;
use shelfy_api::types::CategoryPayload;

use super::{
    Draft, FieldKind, FieldSpec, FormContext, ListQuery, RefOption, Resource, ResourceKind,
    require_text, unknown_field,
};
use crate::error::CoreError;
use crate::model::{Category, EntityId};

/// Marker for the `/api/category` resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct Categories;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        label: "Name",
        kind: FieldKind::Text,
        required: true,
    },
    FieldSpec {
        name: "description",
        label: "Description",
        kind: FieldKind::LongText,
        required: true,
    },
];

impl CategoryDraft {
    pub fn to_payload(&self) -> Result<CategoryPayload, CoreError> {
        self.validate()?;
        Ok(CategoryPayload {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
        })
    }
}

impl Draft for CategoryDraft {
    fn fields() -> &'static [FieldSpec] {
        FIELDS
    }

    fn value(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            "description" => Some(self.description.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        match name {
            "name" => value.clone_into(&mut self.name),
            "description" => value.clone_into(&mut self.description),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", "Name", &self.name)?;
        require_text("description", "Description", &self.description)
    }
}

impl Resource for Categories {
    type Entity = Category;
    type Draft = CategoryDraft;
    type Filter = ();

    const KIND: ResourceKind = ResourceKind::Category;
    const SAVE_FAILED: &'static str = "An error occurred while saving the category";
    const DELETE_FAILED: &'static str = "Failed to delete category";

    async fn list(
        api: &ShelfClient,
        token: &SecretString,
        query: &ListQuery<()>,
    ) -> Result<Vec<Category>, CoreError> {
        let categories = api
            .list_categories(token, Some(query.page_params()))
            .await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }

    async fn create(
        api: &ShelfClient,
        token: &SecretString,
        draft: &CategoryDraft,
    ) -> Result<(), CoreError> {
        let body = draft.to_payload()?;
        api.create_category(token, &body).await?;
        Ok(())
    }

    async fn update(
        api: &ShelfClient,
        token: &SecretString,
        id: EntityId,
        draft: &CategoryDraft,
    ) -> Result<(), CoreError> {
        let body = draft.to_payload()?;
        api.update_category(token, id.get(), &body).await?;
        Ok(())
    }

    async fn delete(api: &ShelfClient, token: &SecretString, id: EntityId) -> Result<(), CoreError> {
        api.delete_category(token, id.get()).await?;
        Ok(())
    }

    async fn options(_api: &ShelfClient, _token: &SecretString) -> Result<Vec<RefOption>, CoreError> {
        Ok(Vec::new())
    }

    fn draft_from(category: &Category) -> CategoryDraft {
        CategoryDraft {
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }

    fn default_draft(_ctx: &FormContext<()>) -> CategoryDraft {
        CategoryDraft::default()
    }
}
