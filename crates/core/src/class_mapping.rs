//! Mapping between a [`ClassDraft`] and its relational records.
//!
//! [`CommitPlan::from_draft`] flattens a draft into the rows written on
//! submit, filling in derived fields (weekday, week number, lesson dates).
//! [`hydrate`] is the inverse used when an existing class is opened for
//! editing. Both are pure; the `db` crate executes them.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::class_draft::{
    Address, BasicInfo, ClassDraft, ClassFormat, ClassSize, ClassTypeInfo, DeliveryMode,
    DurationType, Frequency, LessonItem, LessonStatus, PricingInfo, ScheduleInfo, TimeSlot, Venue,
};
use crate::schedule::{schedule_day_of_week, session_date};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Columns of the parent `classes` row owned by the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecord {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub thumbnail_url: Option<String>,
    pub delivery_mode: DeliveryMode,
    pub class_format: ClassFormat,
    pub class_size: ClassSize,
    pub duration_type: DurationType,
    pub price: Option<f64>,
    pub currency: String,
    pub max_students: i32,
    pub auto_renewal: bool,
}

/// A `class_schedules` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRecord {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub enrollment_deadline: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub total_sessions: i32,
}

/// A `class_time_slots` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlotRecord {
    pub day_of_week: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A `class_locations` row. Address columns are `None` for online classes
/// and `meeting_link` is `None` for offline ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationRecord {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub meeting_link: Option<String>,
}

/// A `class_syllabus` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRecord {
    pub id: Option<DbId>,
    pub week_number: i32,
    pub title: String,
    pub description: String,
    pub learning_objectives: Vec<String>,
    pub session_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: LessonStatus,
    pub notes: String,
}

/// Everything written for one class on submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitPlan {
    /// `Some` updates this class; `None` inserts a new one.
    pub class_id: Option<DbId>,
    pub class: ClassRecord,
    pub schedule: ScheduleRecord,
    pub time_slots: Vec<TimeSlotRecord>,
    pub location: LocationRecord,
    pub lessons: Vec<LessonRecord>,
}

/// A committed class as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredClass {
    pub id: DbId,
    pub class: ClassRecord,
    pub schedule: Option<ScheduleRecord>,
    pub time_slots: Vec<TimeSlotRecord>,
    pub location: Option<LocationRecord>,
    /// Expected in `week_number` order.
    pub lessons: Vec<LessonRecord>,
}

// ---------------------------------------------------------------------------
// Draft -> records
// ---------------------------------------------------------------------------

impl CommitPlan {
    /// Flatten a draft. The draft is expected to have passed the gate.
    pub fn from_draft(draft: &ClassDraft) -> Self {
        let schedule = &draft.schedule;
        let day_of_week = schedule_day_of_week(schedule).map(str::to_string);

        let time_slots = schedule
            .time_slots
            .iter()
            .map(|slot| TimeSlotRecord {
                day_of_week: day_of_week.clone(),
                start_time: slot.start_time,
                end_time: slot.end_time,
            })
            .collect();

        let lessons = draft
            .curriculum
            .iter()
            .enumerate()
            .map(|(i, lesson)| lesson_record(schedule, i, lesson))
            .collect();

        Self {
            class_id: draft.editing_class_id,
            class: class_record(draft),
            schedule: ScheduleRecord {
                start_date: schedule.start_date,
                end_date: schedule.end_date,
                enrollment_deadline: schedule.enrollment_deadline,
                frequency: schedule.frequency,
                total_sessions: to_i32(schedule.total_sessions.max(1)),
            },
            time_slots,
            location: location_record(&draft.venue),
            lessons,
        }
    }
}

fn class_record(draft: &ClassDraft) -> ClassRecord {
    let max_students = match draft.class_type.class_size {
        ClassSize::OneOnOne => 1,
        ClassSize::Group => draft.pricing.max_students,
    };
    ClassRecord {
        title: draft.basic_info.title.trim().to_string(),
        description: draft.basic_info.description.clone(),
        subject: draft.basic_info.subject.clone(),
        thumbnail_url: draft.basic_info.thumbnail_url.clone(),
        delivery_mode: draft.delivery_mode(),
        class_format: draft.class_type.class_format,
        class_size: draft.class_type.class_size,
        duration_type: draft.class_type.duration_type,
        price: draft.pricing.price,
        currency: draft.pricing.currency.to_ascii_uppercase(),
        max_students: to_i32(max_students),
        auto_renewal: draft.pricing.auto_renewal,
    }
}

fn location_record(venue: &Venue) -> LocationRecord {
    match venue {
        Venue::Online { meeting_link } => LocationRecord {
            meeting_link: meeting_link.as_deref().and_then(non_empty),
            ..LocationRecord::default()
        },
        Venue::Offline { address } => LocationRecord {
            street: non_empty(&address.street),
            city: non_empty(&address.city),
            state: non_empty(&address.state),
            zip_code: non_empty(&address.zip_code),
            country: non_empty(&address.country),
            meeting_link: None,
        },
    }
}

fn lesson_record(schedule: &ScheduleInfo, position: usize, lesson: &LessonItem) -> LessonRecord {
    let week_number = u32::try_from(position + 1).unwrap_or(u32::MAX);
    let session_date = lesson.session_date.or_else(|| {
        let (start, frequency) = (schedule.start_date?, schedule.frequency?);
        session_date(start, frequency, week_number)
    });

    LessonRecord {
        id: lesson.id,
        week_number: to_i32(week_number),
        title: lesson.title.trim().to_string(),
        description: lesson.description.clone(),
        learning_objectives: lesson
            .learning_objectives
            .iter()
            .filter_map(|o| non_empty(o))
            .collect(),
        session_date,
        start_time: lesson.start_time,
        end_time: lesson.end_time,
        status: lesson.status,
        notes: lesson.notes.clone(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn to_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Records -> draft
// ---------------------------------------------------------------------------

/// Build an editing draft from a committed class.
///
/// Missing sub-resources map to defaults. Stored weekdays are dropped; they
/// are re-derived from the start date.
pub fn hydrate(stored: StoredClass) -> ClassDraft {
    let StoredClass {
        id,
        class,
        schedule,
        time_slots,
        location,
        mut lessons,
    } = stored;

    let mut draft = ClassDraft::editing(id);

    draft.basic_info = BasicInfo {
        title: class.title,
        subject: class.subject,
        description: class.description,
        thumbnail_url: class.thumbnail_url,
    };
    draft.class_type = ClassTypeInfo {
        class_format: class.class_format,
        class_size: class.class_size,
        duration_type: class.duration_type,
    };
    draft.pricing = PricingInfo {
        price: class.price,
        currency: class.currency,
        max_students: u32::try_from(class.max_students).unwrap_or(1).max(1),
        auto_renewal: class.auto_renewal,
    };

    let mut schedule_info = ScheduleInfo::default();
    if let Some(s) = schedule {
        schedule_info.frequency = s.frequency;
        schedule_info.start_date = s.start_date;
        schedule_info.end_date = s.end_date;
        schedule_info.enrollment_deadline = s.enrollment_deadline;
        schedule_info.total_sessions = u32::try_from(s.total_sessions).unwrap_or(1).max(1);
    }
    schedule_info.time_slots = time_slots
        .into_iter()
        .map(|slot| TimeSlot {
            start_time: slot.start_time,
            end_time: slot.end_time,
        })
        .collect();
    draft.schedule = schedule_info;

    let location = location.unwrap_or_default();
    draft.venue = match class.delivery_mode {
        DeliveryMode::Online => Venue::Online {
            meeting_link: location.meeting_link,
        },
        DeliveryMode::Offline => Venue::Offline {
            address: Address {
                street: location.street.unwrap_or_default(),
                city: location.city.unwrap_or_default(),
                state: location.state.unwrap_or_default(),
                zip_code: location.zip_code.unwrap_or_default(),
                country: location.country.unwrap_or_default(),
            },
        },
    };

    lessons.sort_by_key(|l| l.week_number);
    draft.curriculum = lessons
        .into_iter()
        .map(|l| LessonItem {
            id: l.id,
            title: l.title,
            description: l.description,
            learning_objectives: l.learning_objectives,
            session_date: l.session_date,
            start_time: l.start_time,
            end_time: l.end_time,
            status: l.status,
            notes: l.notes,
        })
        .collect();

    draft.enforce_class_size();
    draft
}
