//! Expense application service
//!
//! Orchestrates form validation, the installment core and the storage ports.
//! The service never reads the clock for business dates: purchase dates come
//! from the form and month totals take the month as an argument.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};
use validator::Validate;

use core_kernel::{CalendarDate, Currency, DateRange, ExpenseId, Money, MonthOfYear, UserId};
use domain_billing::{
    build_plan, parse_purchase_date, parse_total_amount, DayOfMonth, InstallmentPlan,
    InvoiceSettings, PlanRequest,
};

use crate::config::ExpenseConfig;
use crate::error::{map_not_found, ExpenseError};
use crate::expense::{
    installment_title, Expense, ExpenseChanges, ExpenseDraft, ExpensePatch, NewExpense,
    PaymentMethod,
};
use crate::ports::{ExpensePort, ProfilePort};
use crate::profile::{ProfileUpdate, UserProfile};
use crate::query::ExpenseQuery;

/// Total spent in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: Money,
}

/// Validates a `year`/`month` pair and returns the month with its days
pub(crate) fn month_period(year: i32, month: u32) -> Result<(MonthOfYear, DateRange), ExpenseError> {
    let period = MonthOfYear::new(year, month)
        .map_err(|e| ExpenseError::validation(e.to_string(), "month"))?;
    let range = period
        .date_range()
        .map_err(|e| ExpenseError::validation(e.to_string(), "year"))?;
    Ok((period, range))
}

/// Parses an edited amount, reporting failures against the `amount` field
pub(crate) fn parse_amount_field(raw: &str, currency: Currency) -> Result<Money, ExpenseError> {
    parse_total_amount(raw, currency).map_err(|e| ExpenseError::validation(e.to_string(), "amount"))
}

/// Parses an edited date, reporting failures against the `date` field
pub(crate) fn parse_date_field(raw: &str) -> Result<CalendarDate, ExpenseError> {
    parse_purchase_date(raw).map_err(|e| ExpenseError::validation(e.to_string(), "date"))
}

/// Service for expenses and the profile settings they depend on
pub struct ExpenseService {
    expenses: Arc<dyn ExpensePort>,
    profiles: Arc<dyn ProfilePort>,
    config: ExpenseConfig,
}

impl ExpenseService {
    pub fn new(
        expenses: Arc<dyn ExpensePort>,
        profiles: Arc<dyn ProfilePort>,
        config: ExpenseConfig,
    ) -> Self {
        Self {
            expenses,
            profiles,
            config,
        }
    }

    pub fn config(&self) -> &ExpenseConfig {
        &self.config
    }

    pub fn expense_port(&self) -> &Arc<dyn ExpensePort> {
        &self.expenses
    }

    pub fn profile_port(&self) -> &Arc<dyn ProfilePort> {
        &self.profiles
    }

    /// The user's statement days, read once per installment operation
    ///
    /// Users without a profile, or without a payment day, get the configured
    /// default payment day and no closing day.
    pub async fn invoice_settings(&self, user_id: UserId) -> Result<InvoiceSettings, ExpenseError> {
        let default_day = DayOfMonth::new(self.config.default_payment_day).ok_or_else(|| {
            ExpenseError::Configuration(format!(
                "invalid default payment day {}",
                self.config.default_payment_day
            ))
        })?;

        let settings = match self.profiles.get_profile(user_id).await? {
            Some(profile) => {
                let mut settings = profile.invoice_settings()?;
                if profile.invoice_payment_day.is_none() {
                    settings.payment_day = default_day;
                }
                settings
            }
            None => InvoiceSettings::new(default_day, None),
        };
        Ok(settings)
    }

    /// Computes an installment plan without storing anything
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn preview_plan(
        &self,
        user_id: UserId,
        request: &PlanRequest,
    ) -> Result<InstallmentPlan, ExpenseError> {
        self.check_installment_limit(request.installment_count)?;
        let settings = self.invoice_settings(user_id).await?;
        Ok(request.build(&settings, self.config.currency)?)
    }

    /// Creates an expense from form data
    ///
    /// Credit card purchases with more than one installment become an
    /// installment group and the parent record is returned.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn create_expense(
        &self,
        user_id: UserId,
        draft: ExpenseDraft,
    ) -> Result<Expense, ExpenseError> {
        draft.validate()?;
        let date = parse_purchase_date(&draft.date)?;
        let amount = parse_total_amount(&draft.amount, self.config.currency)?;

        if let Some(count) = draft.installment_count() {
            return self.create_installments(user_id, &draft, date, amount, count).await;
        }

        let expense = self
            .expenses
            .insert_expense(NewExpense::single(
                user_id,
                draft.title.trim(),
                amount.amount(),
                draft.category.trim(),
                date,
                draft.payment_method(),
            ))
            .await?;

        info!(expense_id = %expense.id, "Created expense");
        Ok(expense)
    }

    async fn create_installments(
        &self,
        user_id: UserId,
        draft: &ExpenseDraft,
        purchase_date: CalendarDate,
        total: Money,
        count: i64,
    ) -> Result<Expense, ExpenseError> {
        let count = self.check_installment_limit(count)?;
        let settings = self.invoice_settings(user_id).await?;
        let plan = build_plan(purchase_date, total, count, &settings)?;

        let parent_id = ExpenseId::new_v7();
        let title = draft.title.trim();
        let category = draft.category.trim();

        let mut records = plan.records(parent_id).into_iter().map(|record| NewExpense {
            id: if record.is_parent() { parent_id } else { ExpenseId::new_v7() },
            user_id,
            title: installment_title(title, record.sequence_number, record.installments_total),
            amount: record.amount.amount(),
            category: category.to_string(),
            date: record.due_date,
            payment_method: PaymentMethod::CreditCard,
            purchase_date: Some(purchase_date),
            installments_total: Some(record.installments_total),
            installment_number: Some(record.sequence_number),
            parent_expense_id: record.parent_ref,
        });

        let parent = records.next().ok_or_else(|| {
            ExpenseError::Configuration("installment plan produced no entries".to_string())
        })?;
        let children: Vec<NewExpense> = records.collect();

        let stored = self.expenses.insert_installment_group(parent, children).await?;
        let parent = stored.into_iter().next().ok_or_else(|| {
            ExpenseError::not_found("Expense", parent_id)
        })?;

        info!(
            expense_id = %parent.id,
            installments = count,
            total = %total,
            "Created installment expense"
        );
        Ok(parent)
    }

    pub async fn get_expense(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, ExpenseError> {
        self.expenses
            .get_expense(user_id, id)
            .await
            .map_err(map_not_found("Expense", id))
    }

    pub async fn list_expenses(
        &self,
        user_id: UserId,
        query: &ExpenseQuery,
    ) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self.expenses.list_expenses(user_id, query).await?)
    }

    /// Updates a plain expense
    ///
    /// Installment records are rejected with `InstallmentLocked`; the group
    /// has to be deleted and recreated instead.
    #[instrument(skip_all, fields(user_id = %user_id, expense_id = %id))]
    pub async fn update_expense(
        &self,
        user_id: UserId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Expense, ExpenseError> {
        let existing = self.get_expense(user_id, id).await?;
        if existing.is_installment() {
            return Err(ExpenseError::InstallmentLocked(id));
        }

        patch.validate()?;
        let changes = self.changes_from(patch)?;
        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .expenses
            .update_expense(user_id, id, changes)
            .await
            .map_err(map_not_found("Expense", id))?;
        info!("Updated expense");
        Ok(updated)
    }

    fn changes_from(&self, patch: ExpensePatch) -> Result<ExpenseChanges, ExpenseError> {
        let amount = patch
            .amount
            .as_deref()
            .map(|raw| parse_amount_field(raw, self.config.currency))
            .transpose()?
            .map(|money| money.amount());
        let date = patch.date.as_deref().map(parse_date_field).transpose()?;

        Ok(ExpenseChanges {
            title: patch.title.map(|t| t.trim().to_string()),
            amount,
            date,
            category: patch.category.map(|c| c.trim().to_string()),
            payment_method: patch.payment_method,
        })
    }

    /// Deletes an expense, or its whole installment group
    ///
    /// Returns the number of records removed.
    #[instrument(skip_all, fields(user_id = %user_id, expense_id = %id))]
    pub async fn delete_expense(&self, user_id: UserId, id: ExpenseId) -> Result<u64, ExpenseError> {
        let existing = self.get_expense(user_id, id).await?;

        let deleted = match existing.group_root() {
            Some(parent_id) => {
                self.expenses
                    .delete_installment_group(user_id, parent_id)
                    .await?
            }
            None => self.expenses.delete_expense(user_id, id).await?,
        };

        info!(deleted, "Deleted expense");
        Ok(deleted)
    }

    /// Sum of expenses dated within the given month
    pub async fn month_total(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> Result<MonthlyTotal, ExpenseError> {
        let (_, range) = month_period(year, month)?;
        let total = self.expenses.total_between(user_id, range).await?;
        Ok(MonthlyTotal {
            year,
            month,
            total: Money::new(total, self.config.currency),
        })
    }

    pub async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, ExpenseError> {
        self.profiles
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ExpenseError::not_found("Profile", user_id))
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: UserId,
        email: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ExpenseError> {
        let update = update.normalized();
        update.validate()?;
        let profile = self.profiles.upsert_profile(user_id, email, &update).await?;
        info!("Updated profile");
        Ok(profile)
    }

    /// Caps the installment count; counts below one are left for the
    /// installment core to reject
    fn check_installment_limit(&self, requested: i64) -> Result<u32, ExpenseError> {
        let max = self.config.max_installments;
        if requested > i64::from(max) {
            return Err(ExpenseError::TooManyInstallments {
                requested: u32::try_from(requested).unwrap_or(u32::MAX),
                max,
            });
        }
        Ok(u32::try_from(requested).unwrap_or(0))
    }
}
