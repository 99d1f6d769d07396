//! Installment plans
//!
//! A plan zips the split amounts with the resolved due dates. It is a pure
//! value: nothing is persisted here, and nothing reads the clock.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{CalendarDate, Currency, Money};

use crate::cycle::resolve_with_settings;
use crate::error::{BillingError, Field, Violation};
use crate::settings::InvoiceSettings;
use crate::split::{split_amount, MAX_INSTALLMENTS, MAX_TOTAL_AMOUNT};

/// One installment of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentEntry {
    /// 1-based position in the plan
    pub sequence_number: u32,
    pub amount: Money,
    pub due_date: CalendarDate,
}

/// The outcome of splitting one purchase into installments
///
/// Invariants upheld by [`build_plan`]:
/// * the entry amounts add up to `total` exactly
/// * the first entry carries the rounding remainder
/// * due dates strictly increase, one invoice cycle apart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    purchase_date: CalendarDate,
    total: Money,
    installment_count: u32,
    entries: Vec<InstallmentEntry>,
}

impl InstallmentPlan {
    pub fn purchase_date(&self) -> CalendarDate {
        self.purchase_date
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn installment_count(&self) -> u32 {
        self.installment_count
    }

    pub fn entries(&self) -> &[InstallmentEntry] {
        &self.entries
    }

    pub fn first(&self) -> Option<&InstallmentEntry> {
        self.entries.first()
    }

    /// Records ready for persistence
    ///
    /// Entry 1 becomes the parent record. Every later entry points at
    /// `parent_ref`, the identity the persistence layer assigned (or will
    /// assign) to the parent.
    pub fn records<R: Clone>(&self, parent_ref: R) -> Vec<InstallmentRecord<R>> {
        self.entries
            .iter()
            .map(|entry| InstallmentRecord {
                sequence_number: entry.sequence_number,
                installments_total: self.installment_count,
                amount: entry.amount,
                due_date: entry.due_date,
                parent_ref: (entry.sequence_number > 1).then(|| parent_ref.clone()),
            })
            .collect()
    }
}

/// A plan entry as the persistence layer stores it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentRecord<R> {
    pub sequence_number: u32,
    pub installments_total: u32,
    pub amount: Money,
    pub due_date: CalendarDate,
    /// `None` for the parent, the parent's identity for every child
    pub parent_ref: Option<R>,
}

impl<R> InstallmentRecord<R> {
    pub fn is_parent(&self) -> bool {
        self.parent_ref.is_none()
    }
}

/// Builds the installment plan for a purchase
///
/// Splits `total` once and resolves one due date per installment, all from
/// the same `purchase_date`. Either the full plan is returned or an error;
/// there are no partial results.
///
/// # Example
///
/// ```rust
/// use core_kernel::{CalendarDate, Currency, Money};
/// use domain_billing::{build_plan, InvoiceSettings};
/// use rust_decimal::Decimal;
///
/// let plan = build_plan(
///     CalendarDate::parse("2024-01-15").unwrap(),
///     Money::new(Decimal::new(10000, 2), Currency::BRL),
///     3,
///     &InvoiceSettings::default(),
/// ).unwrap();
///
/// assert_eq!(plan.entries().len(), 3);
/// assert_eq!(plan.entries()[0].due_date.to_string(), "2024-02-05");
/// ```
pub fn build_plan(
    purchase_date: CalendarDate,
    total: Money,
    installment_count: u32,
    settings: &InvoiceSettings,
) -> Result<InstallmentPlan, BillingError> {
    let amounts = split_amount(total, installment_count)?;

    let entries = (1..=installment_count)
        .zip(amounts)
        .map(|(sequence_number, amount)| {
            Ok(InstallmentEntry {
                sequence_number,
                amount,
                due_date: resolve_with_settings(purchase_date, settings, sequence_number)?,
            })
        })
        .collect::<Result<Vec<_>, BillingError>>()?;

    debug!(
        %purchase_date,
        %total,
        installment_count,
        payment_day = settings.payment_day.get(),
        closing_day = settings.closing_day.map(|d| d.get()),
        "Built installment plan"
    );

    Ok(InstallmentPlan {
        purchase_date,
        total,
        installment_count,
        entries,
    })
}

/// Plan input as it arrives from a form or request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub purchase_date: String,
    pub total_amount: String,
    pub installment_count: i64,
}

impl PlanRequest {
    pub fn new(
        purchase_date: impl Into<String>,
        total_amount: impl Into<String>,
        installment_count: i64,
    ) -> Self {
        Self {
            purchase_date: purchase_date.into(),
            total_amount: total_amount.into(),
            installment_count,
        }
    }

    /// Validates the raw fields and builds the plan
    ///
    /// Errors name the offending field: an unparseable date is
    /// `InvalidDate`, an unparseable amount or a count below one is
    /// `InvalidAmount`.
    pub fn build(
        &self,
        settings: &InvoiceSettings,
        currency: Currency,
    ) -> Result<InstallmentPlan, BillingError> {
        let purchase_date = parse_purchase_date(&self.purchase_date)?;
        let total = parse_total_amount(&self.total_amount, currency)?;
        let count = installment_count(self.installment_count)?;

        build_plan(purchase_date, total, count, settings)
    }
}

/// Parses a purchase date, tagging failures with `Field::PurchaseDate`
pub fn parse_purchase_date(input: &str) -> Result<CalendarDate, BillingError> {
    CalendarDate::parse(input).map_err(|e| BillingError::InvalidDate {
        field: Field::PurchaseDate,
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Parses a purchase total, which must be a positive decimal no larger than
/// [`MAX_TOTAL_AMOUNT`]
pub fn parse_total_amount(input: &str, currency: Currency) -> Result<Money, BillingError> {
    let total = Money::parse(input, currency)
        .map_err(|_| BillingError::amount(Field::TotalAmount, Violation::Unparseable, input))?;
    if !total.is_positive() {
        return Err(BillingError::amount(Field::TotalAmount, Violation::NotPositive, input));
    }
    if total.amount() > MAX_TOTAL_AMOUNT {
        return Err(BillingError::amount(Field::TotalAmount, Violation::TooLarge, input));
    }
    Ok(total)
}

fn installment_count(raw: i64) -> Result<u32, BillingError> {
    if raw < 1 {
        return Err(BillingError::amount(Field::InstallmentCount, Violation::BelowOne, raw));
    }
    u32::try_from(raw)
        .ok()
        .filter(|count| *count <= MAX_INSTALLMENTS)
        .ok_or_else(|| BillingError::amount(Field::InstallmentCount, Violation::TooLarge, raw))
}
