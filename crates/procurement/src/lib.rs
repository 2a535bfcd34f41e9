//! Procurement domain module.
//!
//! This crate contains the reorder decision rules, implemented purely as
//! deterministic logic (no IO, no HTTP, no storage). Fetching forecasts and
//! inventory, and handing orders to a queue, is the infra layer's job.

pub mod decision;
pub mod order;
pub mod policy;
pub mod reading;

pub use decision::{average_daily_usage, days_until_stockout, decide};
pub use order::PurchaseOrder;
pub use policy::ReorderPolicy;
pub use reading::InventoryReading;
