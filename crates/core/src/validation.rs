//! Validation gate for wizard steps and final submission.
//!
//! Violations are returned as a [`ValidationReport`] value rather than an
//! error, so callers can show every field problem at once. The only rule
//! that mutates instead of rejecting is the one-on-one seat count, which
//! [`normalize`] silently forces to 1.

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::class_draft::{ClassDraft, DurationType, Venue, MAX_TOTAL_SESSIONS};
use crate::wizard::WizardStep;

/// Maximum accepted meeting-link length.
pub const MAX_MEETING_LINK_LEN: usize = 2048;

/// A single field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All problems found for a draft. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }

    /// First message, used as the headline of an error response.
    pub fn summary(&self) -> String {
        match self.errors.as_slice() {
            [] => "Draft is valid".to_string(),
            [only] => only.message.clone(),
            [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
        }
    }

    /// Fold `validator` errors into the report under `prefix.field`.
    fn absorb(&mut self, prefix: &str, result: Result<(), ValidationErrors>) {
        let Err(errors) = result else {
            return;
        };
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, errs) in fields {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                self.push(format!("{prefix}.{field}"), message);
            }
        }
    }
}

/// Apply silent corrections. Currently: one-on-one classes get one seat.
pub fn normalize(draft: &mut ClassDraft) {
    draft.enforce_class_size();
}

/// Validate the fields owned by one wizard step.
pub fn validate_step(draft: &ClassDraft, step: WizardStep) -> ValidationReport {
    let mut report = ValidationReport::default();
    match step {
        WizardStep::BasicInfo => check_basic_info(draft, &mut report),
        WizardStep::ClassType => check_class_type(draft, &mut report),
        WizardStep::Schedule => check_schedule(draft, &mut report),
        WizardStep::Pricing => check_pricing(draft, &mut report),
        WizardStep::Location => check_location(draft, &mut report),
        WizardStep::Curriculum => check_curriculum(draft, &mut report),
        WizardStep::Review => {}
    }
    report
}

/// Validate several steps, in order.
pub fn validate_steps(draft: &ClassDraft, steps: &[WizardStep]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for step in steps {
        report.merge(validate_step(draft, *step));
    }
    report
}

/// Normalize, then validate every step. Gate for commit.
pub fn validate_for_commit(draft: &mut ClassDraft) -> ValidationReport {
    normalize(draft);
    validate_steps(draft, &WizardStep::ALL)
}

fn check_basic_info(draft: &ClassDraft, report: &mut ValidationReport) {
    if draft.basic_info.title.trim().is_empty() {
        report.push("basic_info.title", "Title is required");
    }
    report.absorb("basic_info", draft.basic_info.validate());
}

fn check_class_type(draft: &ClassDraft, report: &mut ValidationReport) {
    if let Venue::Online { meeting_link } = &draft.venue {
        match meeting_link.as_deref().map(str::trim) {
            None | Some("") => {
                report.push("class_type.meeting_link", "Meeting link is required for online classes")
            }
            Some(link) if !is_http_url(link) => report.push(
                "class_type.meeting_link",
                "Meeting link must be an http(s) URL",
            ),
            Some(link) if link.len() > MAX_MEETING_LINK_LEN => report.push(
                "class_type.meeting_link",
                format!("Meeting link must be at most {MAX_MEETING_LINK_LEN} characters"),
            ),
            Some(_) => {}
        }
    }
}

fn check_schedule(draft: &ClassDraft, report: &mut ValidationReport) {
    let schedule = &draft.schedule;

    match schedule.start_date {
        None => report.push("schedule.start_date", "Start date is required"),
        Some(start) => {
            if schedule.end_date.is_some_and(|end| end < start) {
                report.push("schedule.end_date", "End date cannot be before the start date");
            }
            if schedule.enrollment_deadline.is_some_and(|d| d > start) {
                report.push(
                    "schedule.enrollment_deadline",
                    "Enrollment deadline cannot be after the start date",
                );
            }
        }
    }

    if schedule.total_sessions < 1 {
        report.push("schedule.total_sessions", "Total sessions must be at least 1");
    } else if schedule.total_sessions > MAX_TOTAL_SESSIONS {
        report.push(
            "schedule.total_sessions",
            format!("Total sessions must be at most {MAX_TOTAL_SESSIONS}"),
        );
    }

    if draft.class_type.duration_type == DurationType::Recurring && schedule.time_slots.is_empty()
    {
        report.push(
            "schedule.time_slots",
            "At least one time slot is required for recurring classes",
        );
    }

    for (i, slot) in schedule.time_slots.iter().enumerate() {
        if slot.start_time >= slot.end_time {
            report.push(
                format!("schedule.time_slots[{i}]"),
                "Start time must be before end time",
            );
        }
    }
}

fn check_pricing(draft: &ClassDraft, report: &mut ValidationReport) {
    report.absorb("pricing", draft.pricing.validate());
    if !draft.pricing.currency.chars().all(|c| c.is_ascii_alphabetic()) {
        report.push("pricing.currency", "Currency must be a 3-letter code");
    }
}

fn check_location(draft: &ClassDraft, report: &mut ValidationReport) {
    if let Venue::Offline { address } = &draft.venue {
        report.absorb("location", address.validate());
        for (field, value) in [
            ("street", &address.street),
            ("city", &address.city),
            ("country", &address.country),
        ] {
            if !value.is_empty() && value.trim().is_empty() {
                report.push(
                    format!("location.{field}"),
                    format!("{} is required for offline classes", capitalize(field)),
                );
            }
        }
    }
}

fn check_curriculum(draft: &ClassDraft, report: &mut ValidationReport) {
    for (i, lesson) in draft.curriculum.iter().enumerate() {
        if lesson.title.trim().is_empty() {
            report.push(format!("curriculum[{i}].title"), "Lesson title is required");
        }
        if let (Some(start), Some(end)) = (lesson.start_time, lesson.end_time) {
            if start >= end {
                report.push(
                    format!("curriculum[{i}]"),
                    "Lesson start time must be before end time",
                );
            }
        }
    }
}

fn is_http_url(link: &str) -> bool {
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.contains(char::is_whitespace))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_draft::*;
    use chrono::{NaiveDate, NaiveTime};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn valid_online_draft() -> ClassDraft {
        let mut draft = ClassDraft::new();
        draft.set_basic_info(BasicInfoPatch {
            title: Some("Intro to Algebra".into()),
            subject: Some("Math".into()),
            ..Default::default()
        });
        draft.set_class_type(ClassTypePatch {
            meeting_link: Some(Some("https://meet.example.com/algebra".into())),
            ..Default::default()
        });
        draft.set_schedule(SchedulePatch {
            frequency: Some(Frequency::Weekly),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 3),
            total_sessions: Some(4),
            time_slots: Some(vec![TimeSlot {
                start_time: time(16, 0),
                end_time: time(17, 30),
            }]),
            ..Default::default()
        });
        draft.set_pricing(PricingPatch {
            price: Some(Some(25.0)),
            ..Default::default()
        });
        draft.add_lesson(LessonItem {
            title: "Variables".into(),
            ..Default::default()
        });
        draft
    }

    #[test]
    fn complete_draft_passes() {
        let mut draft = valid_online_draft();
        let report = validate_for_commit(&mut draft);
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn total_sessions_has_an_upper_bound() {
        let mut draft = valid_online_draft();
        draft.set_schedule(SchedulePatch {
            total_sessions: Some(MAX_TOTAL_SESSIONS),
            ..Default::default()
        });
        assert!(validate_step(&draft, WizardStep::Schedule).is_valid());

        draft.set_schedule(SchedulePatch {
            total_sessions: Some(4_000_000),
            ..Default::default()
        });
        let report = validate_for_commit(&mut draft);
        assert!(report.has_field("schedule.total_sessions"));
    }

    #[test]
    fn empty_title_blocks_first_step() {
        let mut draft = valid_online_draft();
        draft.basic_info.title = "   ".into();
        let report = validate_step(&draft, WizardStep::BasicInfo);
        assert!(report.has_field("basic_info.title"));
    }

    #[test]
    fn long_subject_is_rejected() {
        let mut draft = valid_online_draft();
        draft.basic_info.subject = "x".repeat(101);
        let report = validate_step(&draft, WizardStep::BasicInfo);
        assert!(report.has_field("basic_info.subject"));
    }

    #[test]
    fn online_requires_meeting_link() {
        let mut draft = valid_online_draft();
        draft.venue = Venue::Online { meeting_link: None };
        let report = validate_step(&draft, WizardStep::ClassType);
        assert!(report.has_field("class_type.meeting_link"));

        draft.venue = Venue::Online {
            meeting_link: Some("not a url".into()),
        };
        let report = validate_step(&draft, WizardStep::ClassType);
        assert!(report.has_field("class_type.meeting_link"));
    }

    #[test]
    fn offline_with_empty_address_blocks_submit() {
        let mut draft = valid_online_draft();
        draft.set_class_type(ClassTypePatch {
            delivery_mode: Some(DeliveryMode::Offline),
            ..Default::default()
        });
        let report = validate_for_commit(&mut draft);
        assert!(!report.is_valid());
        assert!(report.has_field("location.street"));
        assert!(report.has_field("location.city"));
        assert!(report.has_field("location.country"));
        // The online branch no longer exists, so it is never validated.
        assert!(!report.has_field("class_type.meeting_link"));
    }

    #[test]
    fn whitespace_address_is_rejected() {
        let mut draft = valid_online_draft();
        draft.venue = Venue::Offline {
            address: Address {
                street: "  ".into(),
                city: "Springfield".into(),
                country: "US".into(),
                ..Default::default()
            },
        };
        let report = validate_step(&draft, WizardStep::Location);
        assert!(report.has_field("location.street"));
        assert!(!report.has_field("location.city"));
    }

    #[test]
    fn schedule_rules() {
        let mut draft = valid_online_draft();
        draft.schedule.start_date = None;
        draft.schedule.time_slots = vec![TimeSlot {
            start_time: time(18, 0),
            end_time: time(17, 0),
        }];
        let report = validate_step(&draft, WizardStep::Schedule);
        assert!(report.has_field("schedule.start_date"));
        assert!(report.has_field("schedule.time_slots[0]"));
    }

    #[test]
    fn equal_start_and_end_time_is_rejected() {
        let mut draft = valid_online_draft();
        draft.schedule.time_slots[0].end_time = draft.schedule.time_slots[0].start_time;
        assert!(validate_step(&draft, WizardStep::Schedule).has_field("schedule.time_slots[0]"));
    }

    #[test]
    fn recurring_needs_a_time_slot_but_fixed_does_not() {
        let mut draft = valid_online_draft();
        draft.schedule.time_slots.clear();
        assert!(validate_step(&draft, WizardStep::Schedule).has_field("schedule.time_slots"));

        draft.class_type.duration_type = DurationType::Fixed;
        assert!(validate_step(&draft, WizardStep::Schedule).is_valid());
    }

    #[test]
    fn date_ordering_rules() {
        let mut draft = valid_online_draft();
        draft.schedule.end_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        draft.schedule.enrollment_deadline = NaiveDate::from_ymd_opt(2024, 7, 1);
        let report = validate_step(&draft, WizardStep::Schedule);
        assert!(report.has_field("schedule.end_date"));
        assert!(report.has_field("schedule.enrollment_deadline"));
    }

    #[test]
    fn pricing_rules() {
        let mut draft = valid_online_draft();
        draft.pricing.price = Some(-1.0);
        draft.pricing.currency = "DOLLARS".into();
        draft.pricing.max_students = 0;
        let report = validate_step(&draft, WizardStep::Pricing);
        assert!(report.has_field("pricing.price"));
        assert!(report.has_field("pricing.currency"));
        assert!(report.has_field("pricing.max_students"));
    }

    #[test]
    fn one_on_one_is_corrected_not_rejected() {
        for prior in [0, 1, 2, 30] {
            let mut draft = valid_online_draft();
            draft.class_type.class_size = ClassSize::OneOnOne;
            draft.pricing.max_students = prior;
            let report = validate_for_commit(&mut draft);
            assert_eq!(draft.pricing.max_students, 1);
            assert!(report.is_valid(), "{report:?}");
        }
    }

    #[test]
    fn lesson_rules() {
        let mut draft = valid_online_draft();
        draft.add_lesson(LessonItem {
            title: String::new(),
            start_time: Some(time(10, 0)),
            end_time: Some(time(9, 0)),
            ..Default::default()
        });
        let report = validate_step(&draft, WizardStep::Curriculum);
        assert!(report.has_field("curriculum[1].title"));
        assert!(report.has_field("curriculum[1]"));
        assert!(!report.has_field("curriculum[0].title"));
    }

    #[test]
    fn review_step_has_no_rules_of_its_own() {
        assert!(validate_step(&ClassDraft::new(), WizardStep::Review).is_valid());
    }

    #[test]
    fn summary_mentions_remaining_count() {
        let mut report = ValidationReport::default();
        assert_eq!(report.summary(), "Draft is valid");
        report.push("a", "First problem");
        assert_eq!(report.summary(), "First problem");
        report.push("b", "Second problem");
        assert_eq!(report.summary(), "First problem (and 1 more)");
    }
}
