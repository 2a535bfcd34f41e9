//! Infrastructure layer: storage adapters, queues, config, background agents.
//!
//! Every external collaborator of the procurement engine sits behind a port
//! trait defined here. Handles are built once at startup and passed
//! explicitly; nothing in this crate holds process-wide clients.

pub mod agent;
pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast_service;
pub mod history;
pub mod inventory;
pub mod metrics;
pub mod order_channel;
pub mod store;

pub use error::{PortError, PortResult};
