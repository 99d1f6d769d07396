//! Test Data Builders
//!
//! Builders for expenses, incomes, categories, drafts and profiles. Tests set the fields they care
//! about and take defaults for the rest; free-text fields are filled with
//! fake data.

use chrono::{DateTime, Utc};
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{CalendarDate, CategoryId, ExpenseId, IncomeId, UserId};
use domain_expense::{
    Category, CategoryKind, Expense, ExpenseDraft, Income, NewExpense, NewIncome, PaymentMethod,
    ProfileUpdate, SettingUpdate, UserProfile,
};

use crate::fixtures::{DateFixtures, IdFixtures, StringFixtures};

fn fake_title() -> String {
    let words: Vec<String> = Words(2..4).fake();
    words.join(" ")
}

/// Builder for stored expenses
pub struct ExpenseBuilder {
    id: ExpenseId,
    user_id: UserId,
    title: String,
    amount: Decimal,
    category: String,
    date: CalendarDate,
    payment_method: PaymentMethod,
    purchase_date: Option<CalendarDate>,
    installments_total: Option<u32>,
    installment_number: Option<u32>,
    parent_expense_id: Option<ExpenseId>,
    created_at: DateTime<Utc>,
}

impl Default for ExpenseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseBuilder {
    pub fn new() -> Self {
        Self {
            id: ExpenseId::new_v7(),
            user_id: IdFixtures::user_id(),
            title: fake_title(),
            amount: dec!(42.50),
            category: StringFixtures::category().to_string(),
            date: DateFixtures::mid_january(),
            payment_method: PaymentMethod::Debit,
            purchase_date: None,
            installments_total: None,
            installment_number: None,
            parent_expense_id: None,
            created_at: DateFixtures::created_at(),
        }
    }

    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = id;
        self
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_date(mut self, date: CalendarDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    /// Marks the record as installment `number` of `total` bought on `purchase_date`
    ///
    /// Installment 1 is the parent; any other number needs [`Self::with_parent`].
    pub fn as_installment(mut self, number: u32, total: u32, purchase_date: CalendarDate) -> Self {
        self.payment_method = PaymentMethod::CreditCard;
        self.installment_number = Some(number);
        self.installments_total = Some(total);
        self.purchase_date = Some(purchase_date);
        self
    }

    pub fn with_parent(mut self, parent: ExpenseId) -> Self {
        self.parent_expense_id = Some(parent);
        self
    }

    pub fn build_new(self) -> NewExpense {
        NewExpense {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            amount: self.amount,
            category: self.category,
            date: self.date,
            payment_method: self.payment_method,
            purchase_date: self.purchase_date,
            installments_total: self.installments_total,
            installment_number: self.installment_number,
            parent_expense_id: self.parent_expense_id,
        }
    }

    pub fn build(self) -> Expense {
        let created_at = self.created_at;
        Expense::from_new(self.build_new(), created_at)
    }
}

/// Builder for expense form drafts
pub struct ExpenseDraftBuilder {
    draft: ExpenseDraft,
}

impl Default for ExpenseDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseDraftBuilder {
    /// A valid debit draft dated on the mid-January fixture
    pub fn new() -> Self {
        Self {
            draft: ExpenseDraft::new(
                fake_title(),
                "100.00",
                DateFixtures::mid_january().to_string(),
                StringFixtures::category(),
            ),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.draft.title = title.into();
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.draft.amount = amount.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.draft.date = date.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.draft.category = category.into();
        self
    }

    /// Credit card purchase in `count` installments
    pub fn on_credit_card(mut self, count: i64) -> Self {
        self.draft.payment_method = Some(PaymentMethod::CreditCard);
        self.draft.installments = Some(count);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.draft.payment_method = Some(method);
        self
    }

    pub fn build(self) -> ExpenseDraft {
        self.draft
    }
}

/// Builder for stored incomes
pub struct IncomeBuilder {
    income: NewIncome,
}

impl Default for IncomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IncomeBuilder {
    pub fn new() -> Self {
        Self {
            income: NewIncome {
                id: IncomeId::new_v7(),
                user_id: IdFixtures::user_id(),
                title: fake_title(),
                amount: dec!(1500.00),
                category: "Salário".to_string(),
                date: DateFixtures::mid_january(),
                description: None,
            },
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.income.user_id = user_id;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.income.amount = amount;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.income.category = category.into();
        self
    }

    pub fn with_date(mut self, date: CalendarDate) -> Self {
        self.income.date = date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.income.description = Some(description.into());
        self
    }

    pub fn build_new(self) -> NewIncome {
        self.income
    }

    pub fn build(self) -> Income {
        Income::from_new(self.income, DateFixtures::created_at())
    }
}

/// Builder for stored categories
pub struct CategoryBuilder {
    category: Category,
}

impl CategoryBuilder {
    pub fn new(kind: CategoryKind) -> Self {
        let name: String = Words(1..2).fake::<Vec<String>>().join(" ");
        Self {
            category: Category {
                id: CategoryId::new_v7(),
                user_id: IdFixtures::user_id(),
                name,
                kind,
                color: "#6b7280".to_string(),
                icon: "📦".to_string(),
                created_at: DateFixtures::created_at(),
            },
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.category.user_id = user_id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.category.name = name.into();
        self
    }

    pub fn build(self) -> Category {
        self.category
    }
}

/// Builder for stored profiles
pub struct ProfileBuilder {
    profile: UserProfile,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileBuilder {
    pub fn new() -> Self {
        let name: String = Name().fake();
        Self {
            profile: UserProfile::new(IdFixtures::user_id(), StringFixtures::email(), name),
        }
    }

    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.profile.id = user_id;
        self
    }

    pub fn with_payment_day(mut self, day: i32) -> Self {
        self.profile.invoice_payment_day = Some(day);
        self
    }

    pub fn with_closing_day(mut self, day: i32) -> Self {
        self.profile.invoice_closing_day = Some(day);
        self
    }

    pub fn build(self) -> UserProfile {
        self.profile
    }

    /// The profile's editable fields as a form update; unset days are left
    /// out rather than cleared
    pub fn build_update(self) -> ProfileUpdate {
        let day = |d: Option<i32>| d.map_or(SettingUpdate::Keep, SettingUpdate::Set);
        ProfileUpdate {
            full_name: self.profile.full_name,
            avatar_url: self.profile.avatar_url,
            invoice_payment_day: day(self.profile.invoice_payment_day),
            invoice_closing_day: day(self.profile.invoice_closing_day),
        }
    }
}
