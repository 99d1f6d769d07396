//! Request handlers

pub mod health;
pub mod installments;
pub mod expenses;
pub mod incomes;
pub mod categories;
pub mod summary;
pub mod profile;
