//! Class and sub-resource rows (`classes`, `class_schedules`,
//! `class_time_slots`, `class_locations`, `class_syllabus`).

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;
use tutorly_core::class_draft::{
    ClassFormat, ClassSize, DeliveryMode, DurationType, Frequency, LessonStatus,
};
use tutorly_core::class_mapping::{
    ClassRecord, LessonRecord, LocationRecord, ScheduleRecord, TimeSlotRecord,
};
use tutorly_core::error::CoreError;
use tutorly_core::types::{DbId, Timestamp};

/// A row from the `classes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub thumbnail_url: Option<String>,
    pub delivery_mode: String,
    pub class_format: String,
    pub class_size: String,
    pub duration_type: String,
    pub status: String,
    pub price: Option<f64>,
    pub currency: String,
    pub max_students: i32,
    pub auto_renewal: bool,
    pub tutor_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClassRow {
    pub fn to_record(&self) -> Result<ClassRecord, CoreError> {
        Ok(ClassRecord {
            title: self.title.clone(),
            description: self.description.clone(),
            subject: self.subject.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            delivery_mode: DeliveryMode::from_str_db(&self.delivery_mode)?,
            class_format: ClassFormat::from_str_db(&self.class_format)?,
            class_size: ClassSize::from_str_db(&self.class_size)?,
            duration_type: DurationType::from_str_db(&self.duration_type)?,
            price: self.price,
            currency: self.currency.clone(),
            max_students: self.max_students,
            auto_renewal: self.auto_renewal,
        })
    }
}

/// A row from the `class_schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassScheduleRow {
    pub id: DbId,
    pub class_id: DbId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub enrollment_deadline: Option<NaiveDate>,
    pub frequency: Option<String>,
    pub total_sessions: i32,
}

impl ClassScheduleRow {
    pub fn to_record(&self) -> Result<ScheduleRecord, CoreError> {
        Ok(ScheduleRecord {
            start_date: self.start_date,
            end_date: self.end_date,
            enrollment_deadline: self.enrollment_deadline,
            frequency: self
                .frequency
                .as_deref()
                .map(Frequency::from_str_db)
                .transpose()?,
            total_sessions: self.total_sessions,
        })
    }
}

/// A row from the `class_time_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassTimeSlotRow {
    pub id: DbId,
    pub class_id: DbId,
    pub day_of_week: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<ClassTimeSlotRow> for TimeSlotRecord {
    fn from(row: ClassTimeSlotRow) -> Self {
        Self {
            day_of_week: row.day_of_week,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

/// A row from the `class_locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassLocationRow {
    pub id: DbId,
    pub class_id: DbId,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub meeting_link: Option<String>,
}

impl From<ClassLocationRow> for LocationRecord {
    fn from(row: ClassLocationRow) -> Self {
        Self {
            street: row.street,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            country: row.country,
            meeting_link: row.meeting_link,
        }
    }
}

/// A row from the `class_syllabus` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClassSyllabusRow {
    pub id: DbId,
    pub class_id: DbId,
    pub week_number: i32,
    pub title: String,
    pub description: String,
    pub learning_objectives: Vec<String>,
    pub session_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub status: String,
    pub notes: String,
}

impl ClassSyllabusRow {
    pub fn into_record(self) -> Result<LessonRecord, CoreError> {
        Ok(LessonRecord {
            id: Some(self.id),
            week_number: self.week_number,
            status: LessonStatus::from_str_db(&self.status)?,
            title: self.title,
            description: self.description,
            learning_objectives: self.learning_objectives,
            session_date: self.session_date,
            start_time: self.start_time,
            end_time: self.end_time,
            notes: self.notes,
        })
    }
}
