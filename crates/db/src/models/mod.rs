//! Row structs and DTOs.
//!
//! Each submodule contains `FromRow` structs matching database rows and the
//! conversions into the core domain types.

pub mod class;
pub mod class_draft;
