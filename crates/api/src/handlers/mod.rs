//! Request handlers.
//!
//! Handlers delegate to the repositories in `tutorly_db` and the pure
//! draft logic in `tutorly_core`, mapping errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod class_drafts;
pub mod classes;
