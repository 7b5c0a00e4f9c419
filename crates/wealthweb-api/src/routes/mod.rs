//! Route modules for the API server
//!
//! - accounts: account CRUD and duplicate merge
//! - categories: categories, asset classes and the category breakdown
//! - transactions: ledger entries, bulk import and recalculation
//! - goals: savings goals and their progress
//! - reports: dashboard summary and trend
//! - state: backup export/restore, import template and user profile

pub mod accounts;
pub mod categories;
pub mod goals;
pub mod reports;
pub mod state;
pub mod transactions;
