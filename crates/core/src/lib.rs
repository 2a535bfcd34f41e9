//! `shelterflow-core`: shared building blocks.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! identifiers for shelters and supply items, the domain error model and
//! the value-object marker used by the forecasting and procurement crates.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{ItemId, LocationId, PairKey};
pub use value_object::ValueObject;
