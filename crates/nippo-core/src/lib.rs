//! Web plumbing shared by Nippo services.

pub mod health;
pub mod middleware;
pub mod pagination;
pub mod serde;
pub mod tracing;
