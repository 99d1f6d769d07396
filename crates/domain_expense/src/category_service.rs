//! Category application service

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use core_kernel::{CategoryId, PortError, UserId};

use crate::category::{
    default_categories, valid_color, Category, CategoryChanges, CategoryDraft, CategoryKind,
    CategoryPatch, NewCategory,
};
use crate::error::{map_not_found, ExpenseError};
use crate::ports::CategoryPort;

pub struct CategoryService {
    categories: Arc<dyn CategoryPort>,
}

fn check_color(color: &str) -> Result<(), ExpenseError> {
    valid_color(color).map_err(|e| {
        let message = e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string());
        ExpenseError::validation(message, "color")
    })
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryPort>) -> Self {
        Self { categories }
    }

    pub fn category_port(&self) -> &Arc<dyn CategoryPort> {
        &self.categories
    }

    /// The user's categories ordered by name, optionally of one kind
    pub async fn list_categories(
        &self,
        user_id: UserId,
        kind: Option<CategoryKind>,
    ) -> Result<Vec<Category>, ExpenseError> {
        Ok(self.categories.list_categories(user_id, kind).await?)
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn create_category(
        &self,
        user_id: UserId,
        draft: CategoryDraft,
    ) -> Result<Category, ExpenseError> {
        let draft = CategoryDraft {
            name: draft.name.trim().to_string(),
            color: draft.color.trim().to_string(),
            icon: draft.icon.trim().to_string(),
            ..draft
        };
        draft.validate()?;

        let category = self
            .categories
            .insert_category(NewCategory::new(user_id, draft.name, draft.kind, draft.color, draft.icon))
            .await?;
        info!(category_id = %category.id, kind = %category.kind, "Created category");
        Ok(category)
    }

    #[instrument(skip_all, fields(user_id = %user_id, category_id = %id))]
    pub async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        patch: CategoryPatch,
    ) -> Result<Category, ExpenseError> {
        let existing = self
            .categories
            .get_category(user_id, id)
            .await
            .map_err(map_not_found("Category", id))?;

        let patch = CategoryPatch {
            name: patch.name.map(|n| n.trim().to_string()),
            color: patch.color.map(|c| c.trim().to_string()),
            icon: patch.icon.map(|i| i.trim().to_string()),
            ..patch
        };
        patch.validate()?;
        if let Some(color) = &patch.color {
            check_color(color)?;
        }

        let changes = CategoryChanges {
            name: patch.name,
            kind: patch.kind,
            color: patch.color,
            icon: patch.icon,
        };
        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .categories
            .update_category(user_id, id, changes)
            .await
            .map_err(map_not_found("Category", id))?;
        info!("Updated category");
        Ok(updated)
    }

    #[instrument(skip_all, fields(user_id = %user_id, category_id = %id))]
    pub async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<u64, ExpenseError> {
        self.categories
            .get_category(user_id, id)
            .await
            .map_err(map_not_found("Category", id))?;
        let deleted = self.categories.delete_category(user_id, id).await?;
        info!(deleted, "Deleted category");
        Ok(deleted)
    }

    /// Writes the default categories for a user who has none
    ///
    /// Returns the categories created, empty when the user already had some.
    /// A concurrent seed that loses the race also returns empty.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn seed_defaults(&self, user_id: UserId) -> Result<Vec<Category>, ExpenseError> {
        if !self.categories.list_categories(user_id, None).await?.is_empty() {
            info!("User already has categories, nothing seeded");
            return Ok(Vec::new());
        }

        match self.categories.insert_categories(default_categories(user_id)).await {
            Ok(created) => {
                info!(created = created.len(), "Seeded default categories");
                Ok(created)
            }
            Err(PortError::Conflict { .. }) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::MockCategoryPort;

    fn service() -> (CategoryService, Arc<MockCategoryPort>) {
        let port = Arc::new(MockCategoryPort::new());
        (CategoryService::new(port.clone()), port)
    }

    fn pets() -> CategoryDraft {
        CategoryDraft::new(" Pets ", CategoryKind::Expense, "#a855f7", "🐶")
    }

    #[tokio::test]
    async fn test_create_and_list_by_kind() {
        let (service, _) = service();
        let user = UserId::new();

        let created = service.create_category(user, pets()).await.unwrap();
        assert_eq!(created.name, "Pets");
        service
            .create_category(user, CategoryDraft::new("Bolsa", CategoryKind::Income, "#10b981", "🎓"))
            .await
            .unwrap();

        let expense_kinds = service.list_categories(user, Some(CategoryKind::Expense)).await.unwrap();
        assert_eq!(expense_kinds.len(), 1);
        let all = service.list_categories(user, None).await.unwrap();
        assert_eq!(all.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), ["Bolsa", "Pets"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts_within_kind_only() {
        let (service, _) = service();
        let user = UserId::new();
        service.create_category(user, pets()).await.unwrap();

        let err = service.create_category(user, pets()).await.unwrap_err();
        assert!(matches!(err, ExpenseError::Port(PortError::Conflict { .. })));

        let income = CategoryDraft { kind: CategoryKind::Income, ..pets() };
        assert!(service.create_category(user, income).await.is_ok());
        assert!(service.create_category(UserId::new(), pets()).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_validates() {
        let (service, port) = service();
        let draft = CategoryDraft { color: "red".to_string(), ..pets() };
        let err = service.create_category(UserId::new(), draft).await.unwrap_err();
        assert_eq!(err.field().as_deref(), Some("color"));

        let draft = CategoryDraft { name: "   ".to_string(), ..pets() };
        let err = service.create_category(UserId::new(), draft).await.unwrap_err();
        assert_eq!(err.field().as_deref(), Some("name"));
        assert_eq!(port.count().await, 0);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (service, port) = service();
        let user = UserId::new();
        let created = service.create_category(user, pets()).await.unwrap();

        let patch = CategoryPatch { color: Some("#000".to_string()), ..Default::default() };
        let updated = service.update_category(user, created.id, patch).await.unwrap();
        assert_eq!(updated.color, "#000");
        assert_eq!(updated.name, "Pets");

        let patch = CategoryPatch { color: Some("black".to_string()), ..Default::default() };
        let err = service.update_category(user, created.id, patch).await.unwrap_err();
        assert_eq!(err.field().as_deref(), Some("color"));

        let err = service.delete_category(UserId::new(), created.id).await.unwrap_err();
        assert!(matches!(err, ExpenseError::NotFound { entity: "Category", .. }));
        assert_eq!(service.delete_category(user, created.id).await.unwrap(), 1);
        assert_eq!(port.count().await, 0);
    }

    #[tokio::test]
    async fn test_seed_only_for_users_without_categories() {
        let (service, port) = service();
        let fresh = UserId::new();

        let seeded = service.seed_defaults(fresh).await.unwrap();
        assert_eq!(seeded.len(), 16);
        assert!(service.seed_defaults(fresh).await.unwrap().is_empty());
        assert_eq!(port.count().await, 16);

        let custom = UserId::new();
        service.create_category(custom, pets()).await.unwrap();
        assert!(service.seed_defaults(custom).await.unwrap().is_empty());
        assert_eq!(service.list_categories(custom, None).await.unwrap().len(), 1);

        let incomes = service.list_categories(fresh, Some(CategoryKind::Income)).await.unwrap();
        assert_eq!(incomes.len(), 8);
        assert!(incomes.iter().any(|c| c.name == "Salário" && c.icon == "💼"));
    }
}
