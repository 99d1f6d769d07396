//! Expense Domain Ports
//!
//! Storage interfaces the expense, income and category services depend on. Every operation is
//! scoped to the owning user, mirroring the row-level security of the hosted
//! database.
//!
//! # Adapters
//!
//! - **PostgreSQL**: `infra_db::adapters`
//! - **Mock**: in-memory, behind the `mock` feature
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_expense::{ExpenseService, ExpenseConfig};
//!
//! let service = ExpenseService::new(
//!     Arc::new(PgExpenseAdapter::new(pool.clone())),
//!     Arc::new(PgProfileAdapter::new(pool)),
//!     ExpenseConfig::default(),
//! );
//! ```

use async_trait::async_trait;
use rust_decimal::Decimal;

use core_kernel::{
    CategoryId, DateRange, DomainPort, ExpenseId, HealthCheckable, IncomeId, PortError, UserId,
};

use crate::category::{Category, CategoryChanges, CategoryKind, NewCategory};
use crate::expense::{Expense, ExpenseChanges, NewExpense};
use crate::income::{Income, IncomeChanges, NewIncome};
use crate::profile::{ProfileUpdate, UserProfile};
use crate::query::{ExpenseQuery, IncomeQuery};

/// Expense persistence
#[async_trait]
pub trait ExpensePort: DomainPort + HealthCheckable {
    /// Retrieves one expense, or `PortError::NotFound`
    async fn get_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, PortError>;

    /// Lists expenses matching `query`, newest date first
    async fn list_expenses(
        &self,
        user_id: UserId,
        query: &ExpenseQuery,
    ) -> Result<Vec<Expense>, PortError>;

    async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, PortError>;

    /// Stores an installment group as one unit
    ///
    /// Either the parent and every child are stored, or nothing is. Returns
    /// the stored records in installment order, parent first.
    async fn insert_installment_group(
        &self,
        parent: NewExpense,
        children: Vec<NewExpense>,
    ) -> Result<Vec<Expense>, PortError>;

    async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        changes: ExpenseChanges,
    ) -> Result<Expense, PortError>;

    /// Deletes one expense; returns the number of rows removed
    async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<u64, PortError>;

    /// Deletes a parent and all its children as one unit
    async fn delete_installment_group(
        &self,
        user_id: UserId,
        parent_id: ExpenseId,
    ) -> Result<u64, PortError>;

    /// Sum of amounts dated within `range`
    async fn total_between(&self, user_id: UserId, range: DateRange) -> Result<Decimal, PortError>;

    /// Sum of every expense the user has recorded
    async fn lifetime_total(&self, user_id: UserId) -> Result<Decimal, PortError>;
}

/// Income persistence
#[async_trait]
pub trait IncomePort: DomainPort + HealthCheckable {
    /// Retrieves one income, or `PortError::NotFound`
    async fn get_income(&self, user_id: UserId, id: IncomeId) -> Result<Income, PortError>;

    /// Lists incomes matching `query`, newest date first
    async fn list_incomes(&self, user_id: UserId, query: &IncomeQuery) -> Result<Vec<Income>, PortError>;

    async fn insert_income(&self, income: NewIncome) -> Result<Income, PortError>;

    async fn update_income(
        &self,
        user_id: UserId,
        id: IncomeId,
        changes: IncomeChanges,
    ) -> Result<Income, PortError>;

    /// Deletes one income; returns the number of rows removed
    async fn delete_income(&self, user_id: UserId, id: IncomeId) -> Result<u64, PortError>;

    /// Sum of amounts dated within `range`
    async fn total_between(&self, user_id: UserId, range: DateRange) -> Result<Decimal, PortError>;

    /// Sum of every income the user has recorded
    async fn lifetime_total(&self, user_id: UserId) -> Result<Decimal, PortError>;
}

/// Category persistence
///
/// Names are unique per user and kind; a duplicate is `PortError::Conflict`.
#[async_trait]
pub trait CategoryPort: DomainPort + HealthCheckable {
    /// Lists categories, optionally of one kind, ordered by name
    async fn list_categories(
        &self,
        user_id: UserId,
        kind: Option<CategoryKind>,
    ) -> Result<Vec<Category>, PortError>;

    async fn get_category(&self, user_id: UserId, id: CategoryId) -> Result<Category, PortError>;

    async fn insert_category(&self, category: NewCategory) -> Result<Category, PortError>;

    /// Stores several categories as one unit
    async fn insert_categories(&self, categories: Vec<NewCategory>) -> Result<Vec<Category>, PortError>;

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Category, PortError>;

    /// Deletes one category; returns the number of rows removed
    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<u64, PortError>;
}

/// Profile persistence
#[async_trait]
pub trait ProfilePort: DomainPort + HealthCheckable {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, PortError>;

    /// Creates or replaces the editable profile fields
    async fn upsert_profile(
        &self,
        user_id: UserId,
        email: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, PortError>;
}

/// In-memory adapters for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::HealthCheckResult;

    fn health(adapter_id: &str, unavailable: bool) -> HealthCheckResult {
        if unavailable {
            HealthCheckResult::unhealthy(adapter_id, Duration::ZERO, "marked unavailable")
        } else {
            HealthCheckResult::healthy(adapter_id, Duration::ZERO)
        }
    }

    /// In-memory mock implementation of ExpensePort
    #[derive(Debug, Default)]
    pub struct MockExpensePort {
        expenses: Arc<RwLock<HashMap<ExpenseId, Expense>>>,
        unavailable: AtomicBool,
    }

    impl MockExpensePort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with expenses for testing
        pub async fn with_expenses(expenses: Vec<Expense>) -> Self {
            let port = Self::new();
            {
                let mut store = port.expenses.write().await;
                for expense in expenses {
                    store.insert(expense.id, expense);
                }
            }
            port
        }

        /// Makes every call fail with `ServiceUnavailable`
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn count(&self) -> usize {
            self.expenses.read().await.len()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::unavailable("mock-expense-port"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockExpensePort {}

    #[async_trait]
    impl HealthCheckable for MockExpensePort {
        async fn health_check(&self) -> HealthCheckResult {
            health("mock-expense-port", self.unavailable.load(Ordering::SeqCst))
        }
    }

    #[async_trait]
    impl ExpensePort for MockExpensePort {
        async fn get_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, PortError> {
            self.check_available()?;
            self.expenses
                .read()
                .await
                .get(&id)
                .filter(|e| e.user_id == user_id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Expense", id))
        }

        async fn list_expenses(
            &self,
            user_id: UserId,
            query: &ExpenseQuery,
        ) -> Result<Vec<Expense>, PortError> {
            self.check_available()?;
            let expenses = self.expenses.read().await;
            let mut results: Vec<_> = expenses
                .values()
                .filter(|e| e.user_id == user_id && query.matches(*e))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
            Ok(results)
        }

        async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, PortError> {
            self.check_available()?;
            let mut expenses = self.expenses.write().await;
            if expenses.contains_key(&expense.id) {
                return Err(PortError::conflict(format!("Expense {} already exists", expense.id)));
            }
            let stored = Expense::from_new(expense, Utc::now());
            expenses.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn insert_installment_group(
            &self,
            parent: NewExpense,
            children: Vec<NewExpense>,
        ) -> Result<Vec<Expense>, PortError> {
            self.check_available()?;
            let mut expenses = self.expenses.write().await;

            // check the whole group before writing any of it
            let mut seen = std::collections::HashSet::new();
            for record in std::iter::once(&parent).chain(children.iter()) {
                if expenses.contains_key(&record.id) || !seen.insert(record.id) {
                    return Err(PortError::conflict(format!("Expense {} already exists", record.id)));
                }
            }
            if let Some(orphan) = children.iter().find(|c| c.parent_expense_id != Some(parent.id)) {
                return Err(PortError::validation_field(
                    format!("Expense {} does not reference the group parent", orphan.id),
                    "parent_expense_id",
                ));
            }

            let now = Utc::now();
            let stored: Vec<Expense> = std::iter::once(parent)
                .chain(children)
                .map(|record| Expense::from_new(record, now))
                .collect();
            for expense in &stored {
                expenses.insert(expense.id, expense.clone());
            }
            Ok(stored)
        }

        async fn update_expense(
            &self,
            user_id: UserId,
            id: ExpenseId,
            changes: ExpenseChanges,
        ) -> Result<Expense, PortError> {
            self.check_available()?;
            let mut expenses = self.expenses.write().await;
            let expense = expenses
                .get_mut(&id)
                .filter(|e| e.user_id == user_id)
                .ok_or_else(|| PortError::not_found("Expense", id))?;
            changes.apply_to(expense, Utc::now());
            Ok(expense.clone())
        }

        async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<u64, PortError> {
            self.check_available()?;
            let mut expenses = self.expenses.write().await;
            let owned = expenses.get(&id).is_some_and(|e| e.user_id == user_id);
            if owned {
                expenses.remove(&id);
                Ok(1)
            } else {
                Ok(0)
            }
        }

        async fn delete_installment_group(
            &self,
            user_id: UserId,
            parent_id: ExpenseId,
        ) -> Result<u64, PortError> {
            self.check_available()?;
            let mut expenses = self.expenses.write().await;
            let before = expenses.len();
            expenses.retain(|id, e| {
                !(e.user_id == user_id && (*id == parent_id || e.parent_expense_id == Some(parent_id)))
            });
            Ok((before - expenses.len()) as u64)
        }

        async fn total_between(&self, user_id: UserId, range: DateRange) -> Result<Decimal, PortError> {
            self.check_available()?;
            Ok(self
                .expenses
                .read()
                .await
                .values()
                .filter(|e| e.user_id == user_id && range.contains(e.date))
                .map(|e| e.amount)
                .sum())
        }

        async fn lifetime_total(&self, user_id: UserId) -> Result<Decimal, PortError> {
            self.check_available()?;
            Ok(self
                .expenses
                .read()
                .await
                .values()
                .filter(|e| e.user_id == user_id)
                .map(|e| e.amount)
                .sum())
        }
    }

    /// In-memory mock implementation of IncomePort
    #[derive(Debug, Default)]
    pub struct MockIncomePort {
        incomes: Arc<RwLock<HashMap<IncomeId, Income>>>,
        unavailable: AtomicBool,
    }

    impl MockIncomePort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_incomes(incomes: Vec<Income>) -> Self {
            let port = Self::new();
            {
                let mut store = port.incomes.write().await;
                for income in incomes {
                    store.insert(income.id, income);
                }
            }
            port
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub async fn count(&self) -> usize {
            self.incomes.read().await.len()
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::unavailable("mock-income-port"));
            }
            Ok(())
        }

        async fn sum_where(&self, keep: impl Fn(&Income) -> bool) -> Decimal {
            self.incomes
                .read()
                .await
                .values()
                .filter(|i| keep(i))
                .map(|i| i.amount)
                .sum()
        }
    }

    impl DomainPort for MockIncomePort {}

    #[async_trait]
    impl HealthCheckable for MockIncomePort {
        async fn health_check(&self) -> HealthCheckResult {
            health("mock-income-port", self.unavailable.load(Ordering::SeqCst))
        }
    }

    #[async_trait]
    impl IncomePort for MockIncomePort {
        async fn get_income(&self, user_id: UserId, id: IncomeId) -> Result<Income, PortError> {
            self.check_available()?;
            self.incomes
                .read()
                .await
                .get(&id)
                .filter(|i| i.user_id == user_id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Income", id))
        }

        async fn list_incomes(&self, user_id: UserId, query: &IncomeQuery) -> Result<Vec<Income>, PortError> {
            self.check_available()?;
            let incomes = self.incomes.read().await;
            let mut results: Vec<_> = incomes
                .values()
                .filter(|i| i.user_id == user_id && query.matches(*i))
                .cloned()
                .collect();
            results.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
            Ok(results)
        }

        async fn insert_income(&self, income: NewIncome) -> Result<Income, PortError> {
            self.check_available()?;
            let mut incomes = self.incomes.write().await;
            if incomes.contains_key(&income.id) {
                return Err(PortError::conflict(format!("Income {} already exists", income.id)));
            }
            let stored = Income::from_new(income, Utc::now());
            incomes.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn update_income(
            &self,
            user_id: UserId,
            id: IncomeId,
            changes: IncomeChanges,
        ) -> Result<Income, PortError> {
            self.check_available()?;
            let mut incomes = self.incomes.write().await;
            let income = incomes
                .get_mut(&id)
                .filter(|i| i.user_id == user_id)
                .ok_or_else(|| PortError::not_found("Income", id))?;
            changes.apply_to(income, Utc::now());
            Ok(income.clone())
        }

        async fn delete_income(&self, user_id: UserId, id: IncomeId) -> Result<u64, PortError> {
            self.check_available()?;
            let mut incomes = self.incomes.write().await;
            let owned = incomes.get(&id).is_some_and(|i| i.user_id == user_id);
            if owned {
                incomes.remove(&id);
                Ok(1)
            } else {
                Ok(0)
            }
        }

        async fn total_between(&self, user_id: UserId, range: DateRange) -> Result<Decimal, PortError> {
            self.check_available()?;
            Ok(self
                .sum_where(|i| i.user_id == user_id && range.contains(i.date))
                .await)
        }

        async fn lifetime_total(&self, user_id: UserId) -> Result<Decimal, PortError> {
            self.check_available()?;
            Ok(self.sum_where(|i| i.user_id == user_id).await)
        }
    }

    /// In-memory mock implementation of CategoryPort
    #[derive(Debug, Default)]
    pub struct MockCategoryPort {
        categories: Arc<RwLock<HashMap<CategoryId, Category>>>,
    }

    impl MockCategoryPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_categories(categories: Vec<Category>) -> Self {
            let port = Self::new();
            {
                let mut store = port.categories.write().await;
                for category in categories {
                    store.insert(category.id, category);
                }
            }
            port
        }

        pub async fn count(&self) -> usize {
            self.categories.read().await.len()
        }
    }

    fn name_taken<'a>(
        mut existing: impl Iterator<Item = &'a Category>,
        user_id: UserId,
        kind: CategoryKind,
        name: &str,
        except: Option<CategoryId>,
    ) -> bool {
        existing.any(|c| {
            c.user_id == user_id && c.kind == kind && c.name == name && Some(c.id) != except
        })
    }

    fn duplicate(kind: CategoryKind, name: &str) -> PortError {
        PortError::conflict(format!("{} category {} already exists", kind, name))
    }

    impl DomainPort for MockCategoryPort {}

    #[async_trait]
    impl HealthCheckable for MockCategoryPort {
        async fn health_check(&self) -> HealthCheckResult {
            health("mock-category-port", false)
        }
    }

    #[async_trait]
    impl CategoryPort for MockCategoryPort {
        async fn list_categories(
            &self,
            user_id: UserId,
            kind: Option<CategoryKind>,
        ) -> Result<Vec<Category>, PortError> {
            let categories = self.categories.read().await;
            let mut results: Vec<_> = categories
                .values()
                .filter(|c| c.user_id == user_id && kind.map_or(true, |k| c.kind == k))
                .cloned()
                .collect();
            results.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.kind.cmp(&b.kind)));
            Ok(results)
        }

        async fn get_category(&self, user_id: UserId, id: CategoryId) -> Result<Category, PortError> {
            self.categories
                .read()
                .await
                .get(&id)
                .filter(|c| c.user_id == user_id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Category", id))
        }

        async fn insert_category(&self, category: NewCategory) -> Result<Category, PortError> {
            let mut store = self.categories.write().await;
            if name_taken(store.values(), category.user_id, category.kind, &category.name, None) {
                return Err(duplicate(category.kind, &category.name));
            }
            let stored = Category::from_new(category, Utc::now());
            store.insert(stored.id, stored.clone());
            Ok(stored)
        }

        async fn insert_categories(&self, categories: Vec<NewCategory>) -> Result<Vec<Category>, PortError> {
            let mut store = self.categories.write().await;

            // check the whole batch before writing any of it
            for (index, category) in categories.iter().enumerate() {
                let earlier = categories[..index].iter().any(|c| {
                    c.user_id == category.user_id && c.kind == category.kind && c.name == category.name
                });
                if earlier || name_taken(store.values(), category.user_id, category.kind, &category.name, None) {
                    return Err(duplicate(category.kind, &category.name));
                }
            }

            let now = Utc::now();
            let stored: Vec<Category> = categories
                .into_iter()
                .map(|c| Category::from_new(c, now))
                .collect();
            for category in &stored {
                store.insert(category.id, category.clone());
            }
            Ok(stored)
        }

        async fn update_category(
            &self,
            user_id: UserId,
            id: CategoryId,
            changes: CategoryChanges,
        ) -> Result<Category, PortError> {
            let mut store = self.categories.write().await;
            let mut updated = store
                .get(&id)
                .filter(|c| c.user_id == user_id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Category", id))?;
            changes.apply_to(&mut updated);
            if name_taken(store.values(), user_id, updated.kind, &updated.name, Some(id)) {
                return Err(duplicate(updated.kind, &updated.name));
            }
            store.insert(id, updated.clone());
            Ok(updated)
        }

        async fn delete_category(&self, user_id: UserId, id: CategoryId) -> Result<u64, PortError> {
            let mut store = self.categories.write().await;
            let owned = store.get(&id).is_some_and(|c| c.user_id == user_id);
            if owned {
                store.remove(&id);
                Ok(1)
            } else {
                Ok(0)
            }
        }
    }

    /// In-memory mock implementation of ProfilePort
    #[derive(Debug, Default)]
    pub struct MockProfilePort {
        profiles: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    }

    impl MockProfilePort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn with_profiles(profiles: Vec<UserProfile>) -> Self {
            let port = Self::new();
            {
                let mut store = port.profiles.write().await;
                for profile in profiles {
                    store.insert(profile.id, profile);
                }
            }
            port
        }
    }

    impl DomainPort for MockProfilePort {}

    #[async_trait]
    impl HealthCheckable for MockProfilePort {
        async fn health_check(&self) -> HealthCheckResult {
            health("mock-profile-port", false)
        }
    }

    #[async_trait]
    impl ProfilePort for MockProfilePort {
        async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, PortError> {
            Ok(self.profiles.read().await.get(&user_id).cloned())
        }

        async fn upsert_profile(
            &self,
            user_id: UserId,
            email: &str,
            update: &ProfileUpdate,
        ) -> Result<UserProfile, PortError> {
            let mut profiles = self.profiles.write().await;
            let profile = profiles
                .entry(user_id)
                .or_insert_with(|| UserProfile::new(user_id, email, update.full_name.clone()));
            profile.apply(update, Utc::now());
            Ok(profile.clone())
        }
    }
}
