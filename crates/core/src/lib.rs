//! Domain logic for the class-creation wizard.
//!
//! This crate has no I/O. The `db` crate persists what is defined here and
//! the `api` crate exposes it over HTTP.

pub mod class_draft;
pub mod class_mapping;
pub mod error;
pub mod schedule;
pub mod search;
pub mod types;
pub mod validation;
pub mod wizard;
