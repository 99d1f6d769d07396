//! Income application service and the monthly overview
//!
//! The overview reads both ledgers, so this service holds the expense port
//! as well as its own.

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use core_kernel::{IncomeId, Money, UserId};

use crate::config::ExpenseConfig;
use crate::error::{map_not_found, ExpenseError};
use crate::income::{normalize_description, Income, IncomeChanges, IncomeDraft, IncomePatch, NewIncome};
use crate::overview::{LifetimeTotals, MonthlyOverview};
use crate::ports::{ExpensePort, IncomePort};
use crate::query::{ExpenseQuery, IncomeQuery};
use crate::service::{month_period, parse_amount_field, parse_date_field, MonthlyTotal};

pub struct IncomeService {
    incomes: Arc<dyn IncomePort>,
    expenses: Arc<dyn ExpensePort>,
    config: ExpenseConfig,
}

impl IncomeService {
    pub fn new(
        incomes: Arc<dyn IncomePort>,
        expenses: Arc<dyn ExpensePort>,
        config: ExpenseConfig,
    ) -> Self {
        Self {
            incomes,
            expenses,
            config,
        }
    }

    pub fn income_port(&self) -> &Arc<dyn IncomePort> {
        &self.incomes
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn create_income(&self, user_id: UserId, draft: IncomeDraft) -> Result<Income, ExpenseError> {
        draft.validate()?;
        let amount = parse_amount_field(&draft.amount, self.config.currency)?;
        let date = parse_date_field(&draft.date)?;

        let income = self
            .incomes
            .insert_income(NewIncome {
                id: IncomeId::new_v7(),
                user_id,
                title: draft.title.trim().to_string(),
                amount: amount.amount(),
                category: draft.category.trim().to_string(),
                date,
                description: normalize_description(draft.description.as_deref()),
            })
            .await?;

        info!(income_id = %income.id, "Created income");
        Ok(income)
    }

    pub async fn get_income(&self, user_id: UserId, id: IncomeId) -> Result<Income, ExpenseError> {
        self.incomes
            .get_income(user_id, id)
            .await
            .map_err(map_not_found("Income", id))
    }

    pub async fn list_incomes(&self, user_id: UserId, query: &IncomeQuery) -> Result<Vec<Income>, ExpenseError> {
        Ok(self.incomes.list_incomes(user_id, query).await?)
    }

    #[instrument(skip_all, fields(user_id = %user_id, income_id = %id))]
    pub async fn update_income(
        &self,
        user_id: UserId,
        id: IncomeId,
        patch: IncomePatch,
    ) -> Result<Income, ExpenseError> {
        let existing = self.get_income(user_id, id).await?;
        patch.validate()?;

        let changes = IncomeChanges {
            title: patch.title.map(|t| t.trim().to_string()),
            amount: patch
                .amount
                .as_deref()
                .map(|raw| parse_amount_field(raw, self.config.currency))
                .transpose()?
                .map(|money| money.amount()),
            date: patch.date.as_deref().map(parse_date_field).transpose()?,
            category: patch.category.map(|c| c.trim().to_string()),
            description: patch
                .description
                .as_deref()
                .map(|d| normalize_description(Some(d))),
        };
        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .incomes
            .update_income(user_id, id, changes)
            .await
            .map_err(map_not_found("Income", id))?;
        info!("Updated income");
        Ok(updated)
    }

    #[instrument(skip_all, fields(user_id = %user_id, income_id = %id))]
    pub async fn delete_income(&self, user_id: UserId, id: IncomeId) -> Result<u64, ExpenseError> {
        self.get_income(user_id, id).await?;
        let deleted = self.incomes.delete_income(user_id, id).await?;
        info!(deleted, "Deleted income");
        Ok(deleted)
    }

    /// Sum of incomes dated within the given month
    pub async fn month_total(&self, user_id: UserId, year: i32, month: u32) -> Result<MonthlyTotal, ExpenseError> {
        let (_, range) = month_period(year, month)?;
        let total = self.incomes.total_between(user_id, range).await?;
        Ok(MonthlyTotal {
            year,
            month,
            total: Money::new(total, self.config.currency),
        })
    }

    /// Month totals, balances and the month's biggest spenders
    #[instrument(skip_all, fields(user_id = %user_id, year, month))]
    pub async fn month_overview(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<MonthlyOverview, ExpenseError> {
        let (period, range) = month_period(year, month)?;

        let income_total = self.incomes.total_between(user_id, range).await?;
        let expenses = self
            .expenses
            .list_expenses(user_id, &ExpenseQuery::in_month(period))
            .await?;
        let lifetime = LifetimeTotals {
            incomes: self.incomes.lifetime_total(user_id).await?,
            expenses: self.expenses.lifetime_total(user_id).await?,
        };

        Ok(MonthlyOverview::compute(
            period,
            income_total,
            &expenses,
            lifetime,
            self.config.currency,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::{ExpenseDraft, PaymentMethod};
    use crate::ports::mock::{MockExpensePort, MockIncomePort, MockProfilePort};
    use crate::service::ExpenseService;
    use core_kernel::CalendarDate;
    use rust_decimal_macros::dec;

    struct Harness {
        incomes: IncomeService,
        expenses: ExpenseService,
        store: Arc<MockIncomePort>,
        user: UserId,
    }

    fn harness() -> Harness {
        let store = Arc::new(MockIncomePort::new());
        let expense_port = Arc::new(MockExpensePort::new());
        Harness {
            incomes: IncomeService::new(store.clone(), expense_port.clone(), ExpenseConfig::default()),
            expenses: ExpenseService::new(
                expense_port,
                Arc::new(MockProfilePort::new()),
                ExpenseConfig::default(),
            ),
            store,
            user: UserId::new(),
        }
    }

    async fn income(h: &Harness, amount: &str, date: &str, category: &str) -> Income {
        h.incomes
            .create_income(h.user, IncomeDraft::new("Pay", amount, date, category))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_income() {
        let h = harness();
        let created = h
            .incomes
            .create_income(
                h.user,
                IncomeDraft::new(" Salary ", "5200.00", "2024-03-05", "Salário").with_description("  "),
            )
            .await
            .unwrap();

        assert_eq!(created.title, "Salary");
        assert_eq!(created.amount, dec!(5200.00));
        assert_eq!(created.date, CalendarDate::parse("2024-03-05").unwrap());
        assert_eq!(created.description, None);
        assert_eq!(h.store.count().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let h = harness();
        for (amount, date, field) in [
            ("0", "2024-03-05", "amount"),
            ("abc", "2024-03-05", "amount"),
            ("100000000000", "2024-03-05", "amount"),
            ("10", "2024-02-30", "date"),
        ] {
            let err = h
                .incomes
                .create_income(h.user, IncomeDraft::new("Pay", amount, date, "Salário"))
                .await
                .unwrap_err();
            assert_eq!(err.field().as_deref(), Some(field), "{amount} {date}");
        }
        assert_eq!(h.store.count().await, 0);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let h = harness();
        income(&h, "100", "2024-03-01", "Freelance").await;
        income(&h, "200", "2024-03-20", "Salário").await;
        income(&h, "300", "2024-04-02", "Salário").await;

        let march = IncomeQuery::in_month(core_kernel::MonthOfYear::new(2024, 3).unwrap());
        let listed = h.incomes.list_incomes(h.user, &march).await.unwrap();
        assert_eq!(listed.iter().map(|i| i.amount).collect::<Vec<_>>(), [dec!(200), dec!(100)]);

        let salaries = h
            .incomes
            .list_incomes(h.user, &IncomeQuery::all().with_category("Salário"))
            .await
            .unwrap();
        assert_eq!(salaries.len(), 2);

        let range = core_kernel::DateRange::new(
            CalendarDate::parse("2024-03-15").unwrap(),
            CalendarDate::parse("2024-04-02").unwrap(),
        )
        .unwrap();
        let between = h.incomes.list_incomes(h.user, &IncomeQuery::between(range)).await.unwrap();
        assert_eq!(between.len(), 2);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let h = harness();
        let created = h
            .incomes
            .create_income(
                h.user,
                IncomeDraft::new("Gig", "800", "2024-03-10", "Freelance").with_description("logo"),
            )
            .await
            .unwrap();

        let patch = IncomePatch { amount: Some("950".to_string()), ..Default::default() };
        let updated = h.incomes.update_income(h.user, created.id, patch).await.unwrap();
        assert_eq!(updated.amount, dec!(950));
        assert_eq!(updated.description.as_deref(), Some("logo"));
        assert_eq!(updated.title, "Gig");

        let clear = IncomePatch { description: Some(String::new()), ..Default::default() };
        let cleared = h.incomes.update_income(h.user, created.id, clear).await.unwrap();
        assert_eq!(cleared.description, None);

        let bad = IncomePatch { date: Some("10/03/2024".to_string()), ..Default::default() };
        let err = h.incomes.update_income(h.user, created.id, bad).await.unwrap_err();
        assert_eq!(err.field().as_deref(), Some("date"));
    }

    #[tokio::test]
    async fn test_other_users_income_is_not_found() {
        let h = harness();
        let created = income(&h, "100", "2024-03-01", "Vendas").await;

        let err = h.incomes.get_income(UserId::new(), created.id).await.unwrap_err();
        assert!(matches!(err, ExpenseError::NotFound { entity: "Income", .. }));
        let err = h.incomes.delete_income(UserId::new(), created.id).await.unwrap_err();
        assert!(matches!(err, ExpenseError::NotFound { .. }));

        assert_eq!(h.incomes.delete_income(h.user, created.id).await.unwrap(), 1);
        assert_eq!(h.store.count().await, 0);
    }

    #[tokio::test]
    async fn test_month_total() {
        let h = harness();
        income(&h, "1000.00", "2024-02-01", "Salário").await;
        income(&h, "250.50", "2024-02-29", "Freelance").await;
        income(&h, "99.00", "2024-03-01", "Vendas").await;

        let total = h.incomes.month_total(h.user, 2024, 2).await.unwrap();
        assert_eq!(total.total.amount(), dec!(1250.50));

        let err = h.incomes.month_total(h.user, 2024, 0).await.unwrap_err();
        assert_eq!(err.field().as_deref(), Some("month"));
    }

    #[tokio::test]
    async fn test_month_overview_combines_both_ledgers() {
        let h = harness();
        income(&h, "5000.00", "2024-05-05", "Salário").await;
        income(&h, "3000.00", "2024-04-05", "Salário").await;

        for (title, amount, category, date) in [
            ("Rent", "1800.00", "Contas", "2024-05-10"),
            ("Market", "400.00", "Alimentação", "2024-05-12"),
            ("Dinner", "150.00", "Alimentação", "2024-05-20"),
            ("Old trip", "900.00", "Lazer", "2024-04-15"),
        ] {
            h.expenses
                .create_expense(h.user, ExpenseDraft::new(title, amount, date, category))
                .await
                .unwrap();
        }
        // a card purchase contributes only the installment due in May
        h.expenses
            .create_expense(
                h.user,
                ExpenseDraft::new("Phone", "3000.00", "2024-04-20", "Compras")
                    .with_payment_method(PaymentMethod::CreditCard)
                    .with_installments(3),
            )
            .await
            .unwrap();

        let overview = h.incomes.month_overview(h.user, 2024, 5).await.unwrap();
        assert_eq!(overview.income_total.amount(), dec!(5000.00));
        assert_eq!(overview.expense_total.amount(), dec!(3350.00));
        assert_eq!(overview.monthly_balance.amount(), dec!(1650.00));
        assert_eq!(overview.current_balance.amount(), dec!(1750.00));
        assert_eq!(overview.top_expense.unwrap().title, "Rent");
        assert_eq!(overview.top_category.unwrap().category, "Contas");
    }
}
