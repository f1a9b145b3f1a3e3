//! Credit account monitoring.
//!
//! One credit account per app: balance and profile data, daily
//! income/expense stats, and recent transactions. Login happens in an
//! external browser flow; this module receives the result, caches all
//! three data sets, and keeps them fresh with a visibility-gated timer.
//! Authentication failures flip the login state instead of being retried.

pub mod errors;
pub mod service;
pub mod storage;
pub mod types;

pub use errors::CreditError;
pub use service::CreditService;
