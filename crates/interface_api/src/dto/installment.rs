//! Installment preview DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{CalendarDate, Currency};
use domain_billing::InstallmentPlan;

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentDto {
    pub number: u32,
    pub amount: Decimal,
    pub due_date: CalendarDate,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub purchase_date: CalendarDate,
    pub total_amount: Decimal,
    pub currency: Currency,
    pub installment_count: u32,
    pub installments: Vec<InstallmentDto>,
}

impl From<&InstallmentPlan> for PlanResponse {
    fn from(plan: &InstallmentPlan) -> Self {
        Self {
            purchase_date: plan.purchase_date(),
            total_amount: plan.total().amount(),
            currency: plan.total().currency(),
            installment_count: plan.installment_count(),
            installments: plan
                .entries()
                .iter()
                .map(|entry| InstallmentDto {
                    number: entry.sequence_number,
                    amount: entry.amount.amount(),
                    due_date: entry.due_date,
                })
                .collect(),
        }
    }
}
