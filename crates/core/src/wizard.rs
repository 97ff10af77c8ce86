//! Class-creation wizard steps, cursor and draft session status.
//!
//! The cursor is a plain clamped counter. It never validates anything on its
//! own; callers run the validation gate before moving forward.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Wizard steps
// ---------------------------------------------------------------------------

/// Minimum step number (1-based).
pub const MIN_STEP: u8 = 1;

/// Maximum step number (1-based).
pub const MAX_STEP: u8 = 7;

/// The seven steps of the class-creation wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    ClassType,
    Schedule,
    Pricing,
    Location,
    Curriculum,
    Review,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [WizardStep; 7] = [
        Self::BasicInfo,
        Self::ClassType,
        Self::Schedule,
        Self::Pricing,
        Self::Location,
        Self::Curriculum,
        Self::Review,
    ];

    /// Convert a 1-based step number to a `WizardStep`.
    pub fn from_number(n: u8) -> Result<Self, CoreError> {
        match n {
            1 => Ok(Self::BasicInfo),
            2 => Ok(Self::ClassType),
            3 => Ok(Self::Schedule),
            4 => Ok(Self::Pricing),
            5 => Ok(Self::Location),
            6 => Ok(Self::Curriculum),
            7 => Ok(Self::Review),
            _ => Err(CoreError::Validation(format!(
                "Invalid step number {n}. Must be between {MIN_STEP} and {MAX_STEP}"
            ))),
        }
    }

    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::ClassType => 2,
            Self::Schedule => 3,
            Self::Pricing => 4,
            Self::Location => 5,
            Self::Curriculum => 6,
            Self::Review => 7,
        }
    }

    /// Human-readable label for the step.
    pub fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Info",
            Self::ClassType => "Class Type",
            Self::Schedule => "Schedule",
            Self::Pricing => "Pricing",
            Self::Location => "Location",
            Self::Curriculum => "Curriculum",
            Self::Review => "Review",
        }
    }
}

// ---------------------------------------------------------------------------
// Step cursor
// ---------------------------------------------------------------------------

/// Current wizard position, always within `MIN_STEP..=MAX_STEP`.
///
/// Deserializing an out-of-range number clamps it, so a stored draft can
/// never yield an invalid cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct StepCursor(u8);

impl StepCursor {
    pub fn new() -> Self {
        Self(MIN_STEP)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn step(self) -> WizardStep {
        // The value is clamped on every write.
        WizardStep::ALL[(self.0 - MIN_STEP) as usize]
    }

    /// Advance one step, staying on the last step.
    pub fn next(&mut self) -> u8 {
        self.go_to(self.0.saturating_add(1))
    }

    /// Go back one step, staying on the first step.
    pub fn previous(&mut self) -> u8 {
        self.go_to(self.0.saturating_sub(1))
    }

    /// Jump to `n`, clamped into `MIN_STEP..=MAX_STEP`.
    pub fn go_to(&mut self, n: u8) -> u8 {
        self.0 = clamp_step(n);
        self.0
    }

    pub fn is_last(self) -> bool {
        self.0 == MAX_STEP
    }
}

impl Default for StepCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u8> for StepCursor {
    fn from(n: u8) -> Self {
        Self(clamp_step(n))
    }
}

impl From<StepCursor> for u8 {
    fn from(cursor: StepCursor) -> Self {
        cursor.0
    }
}

/// Clamp any step number into the valid range.
pub fn clamp_step(n: u8) -> u8 {
    n.clamp(MIN_STEP, MAX_STEP)
}

/// Clamp a wide integer (e.g. from a request body) into the valid range.
pub fn clamp_step_i64(n: i64) -> u8 {
    n.clamp(MIN_STEP as i64, MAX_STEP as i64) as u8
}

/// Steps that must pass validation before moving from `current` to `target`.
///
/// Empty for backward or same-step moves.
pub fn steps_to_validate(current: u8, target: u8) -> Vec<WizardStep> {
    let current = clamp_step(current);
    let target = clamp_step(target);
    (current..target)
        .filter_map(|n| WizardStep::from_number(n).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Draft session status
// ---------------------------------------------------------------------------

/// Lifecycle of a stored draft session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    InProgress,
    Submitting,
    Submitted,
    Cancelled,
}

impl DraftStatus {
    /// Parse a status string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "submitting" => Ok(Self::Submitting),
            "submitted" => Ok(Self::Submitted),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(CoreError::Validation(format!(
                "Invalid draft status '{s}'. Must be one of: in_progress, submitting, submitted, cancelled"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Check that a draft session still accepts edits and navigation.
pub fn ensure_editable(status: &str) -> Result<(), CoreError> {
    match DraftStatus::from_str_db(status)? {
        DraftStatus::InProgress => Ok(()),
        DraftStatus::Submitting => Err(CoreError::Conflict(
            "Draft is being submitted".to_string(),
        )),
        other => Err(CoreError::Validation(format!(
            "Draft is {} and can no longer be changed",
            other.as_str()
        ))),
    }
}
