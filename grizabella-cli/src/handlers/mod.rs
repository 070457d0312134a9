//! Command handlers for the Grizabella CLI.

pub mod object;
pub mod query;
pub mod relation;
pub mod schema;
