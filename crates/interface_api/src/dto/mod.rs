//! Request and response bodies

pub mod category;
pub mod expense;
pub mod income;
pub mod installment;
pub mod profile;
pub mod summary;
