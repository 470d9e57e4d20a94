//! Service layer providing the fleet, track and schedule operations on top of models.
//! - Separates business logic from the HTTP transport.
//! - Business rules live in `validation` as pure functions; the modules below load
//!   the current database state, run them, then write.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod validation;
pub mod guards;
pub mod auth;
pub mod fleet;
pub mod track;
pub mod schedule;
#[cfg(test)]
pub mod test_support;
