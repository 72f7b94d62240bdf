//! rusty-forum/crates/rf-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Forum.

pub mod detail;
pub mod error;
pub mod models;
pub mod payload;
pub mod traits;

// Re-exporting for easier access in other crates
pub use detail::*;
pub use error::*;
pub use models::*;
pub use traits::*;
