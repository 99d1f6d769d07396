//! In-memory service wiring

use std::sync::Arc;

use domain_expense::ports::mock::{
    MockCategoryPort, MockExpensePort, MockIncomePort, MockProfilePort,
};
use domain_expense::{
    CategoryService, Expense, ExpenseConfig, ExpenseService, IncomeService, UserProfile,
};

/// Every service over mock ports, with handles to inspect the stores
pub struct MockServiceHarness {
    pub service: ExpenseService,
    pub income_service: IncomeService,
    pub category_service: CategoryService,
    pub expenses: Arc<MockExpensePort>,
    pub profiles: Arc<MockProfilePort>,
    pub incomes: Arc<MockIncomePort>,
    pub categories: Arc<MockCategoryPort>,
}

impl MockServiceHarness {
    /// Empty stores and the default configuration
    pub fn new() -> Self {
        Self::from_ports(MockExpensePort::new(), MockProfilePort::new(), ExpenseConfig::default())
    }

    /// Stores pre-populated with `expenses` and `profiles`
    pub async fn seeded(expenses: Vec<Expense>, profiles: Vec<UserProfile>) -> Self {
        Self::from_ports(
            MockExpensePort::with_expenses(expenses).await,
            MockProfilePort::with_profiles(profiles).await,
            ExpenseConfig::default(),
        )
    }

    /// Wires the given expense and profile stores; incomes and categories start empty
    pub fn from_ports(
        expenses: MockExpensePort,
        profiles: MockProfilePort,
        config: ExpenseConfig,
    ) -> Self {
        let expenses = Arc::new(expenses);
        let profiles = Arc::new(profiles);
        let incomes = Arc::new(MockIncomePort::new());
        let categories = Arc::new(MockCategoryPort::new());

        let service = ExpenseService::new(expenses.clone(), profiles.clone(), config.clone());
        let income_service = IncomeService::new(incomes.clone(), expenses.clone(), config);
        let category_service = CategoryService::new(categories.clone());
        Self {
            service,
            income_service,
            category_service,
            expenses,
            profiles,
            incomes,
            categories,
        }
    }
}

impl Default for MockServiceHarness {
    fn default() -> Self {
        Self::new()
    }
}
