//! Physical type metadata.
//!
//! This module provides:
//! - `PhysicalType`: the value kinds an operator can produce
//! - The per-type NULL sentinel table, the only place sentinels are defined
//! - `Value`: a nullable wrapper used where planning and testing code
//!   consumes results

pub mod physical;
pub mod value;

pub use physical::{null, NullSentinel, PhysicalType};
pub use value::Value;
