//! Wizard draft session model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorly_core::class_draft::ClassDraft;
use tutorly_core::error::CoreError;
use tutorly_core::types::{DbId, Timestamp};

/// A row from the `class_drafts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassDraftSession {
    pub id: DbId,
    pub tutor_id: DbId,
    pub editing_class_id: Option<DbId>,
    pub current_step: i32,
    pub draft: serde_json::Value,
    pub status: String,
    pub committed_class_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClassDraftSession {
    /// Decode the stored JSON draft.
    pub fn parse_draft(&self) -> Result<ClassDraft, CoreError> {
        serde_json::from_value(self.draft.clone()).map_err(|e| {
            CoreError::Internal(format!("Stored draft {} is not decodable: {e}", self.id))
        })
    }
}

/// DTO for opening a wizard session.
///
/// With `class_id` set the draft is hydrated from that committed class.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassDraft {
    pub tutor_id: DbId,
    pub class_id: Option<DbId>,
}

/// Encode a draft for the `draft` JSONB column.
pub fn encode_draft(draft: &ClassDraft) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(draft)
        .map_err(|e| CoreError::Internal(format!("Failed to encode draft: {e}")))
}
