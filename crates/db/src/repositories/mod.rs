//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod class_draft_repo;
pub mod class_repo;

pub use class_draft_repo::ClassDraftRepo;
pub use class_repo::{ClassRepo, CommitError};
