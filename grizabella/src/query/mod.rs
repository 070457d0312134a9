//! The Query & Consistency Engine core: an IR, a planner that
//! type-checks and orders it, and an executor that evaluates it against
//! live adapters.

pub mod executor;
pub mod ir;
pub mod planner;

pub use executor::{Executor, QueryResult};
pub use ir::{Clause, Component, EmbeddingSearch, GraphHop, Query};
pub use planner::{Planner, PlannedQuery};
