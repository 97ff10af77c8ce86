//! In-progress class definition edited by the wizard.
//!
//! A [`ClassDraft`] is an owned value: whoever runs the wizard holds it and
//! mutates it only through the setters below. Every setter takes a patch whose
//! `None` fields leave the current value alone. Optional values use
//! `Option<Option<T>>` in patches: an explicit JSON `null` clears them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;
use crate::wizard::{StepCursor, WizardStep};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Online vs. offline teaching modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    Online,
    Offline,
}

impl DeliveryMode {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(invalid_value("delivery mode", s, "online, offline")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// Delivery style of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassFormat {
    #[default]
    Live,
    Recorded,
    Inbound,
    Outbound,
}

impl ClassFormat {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "live" => Ok(Self::Live),
            "recorded" => Ok(Self::Recorded),
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            _ => Err(invalid_value(
                "class format",
                s,
                "live, recorded, inbound, outbound",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Recorded => "recorded",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

/// Group class or one-on-one tutoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClassSize {
    #[default]
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "one-on-one")]
    OneOnOne,
}

impl ClassSize {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "group" => Ok(Self::Group),
            "one-on-one" => Ok(Self::OneOnOne),
            _ => Err(invalid_value("class size", s, "group, one-on-one")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::OneOnOne => "one-on-one",
        }
    }
}

/// Whether the class repeats on a schedule or runs for a fixed set of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    #[default]
    Recurring,
    Fixed,
}

impl DurationType {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "recurring" => Ok(Self::Recurring),
            "fixed" => Ok(Self::Fixed),
            _ => Err(invalid_value("duration type", s, "recurring, fixed")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recurring => "recurring",
            Self::Fixed => "fixed",
        }
    }
}

/// How often sessions repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(invalid_value("frequency", s, "daily, weekly, monthly")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Progress of a single lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl LessonStatus {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(invalid_value(
                "lesson status",
                s,
                "scheduled, completed, cancelled",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

fn invalid_value(kind: &str, value: &str, allowed: &str) -> CoreError {
    CoreError::Validation(format!(
        "Invalid {kind} '{value}'. Must be one of: {allowed}"
    ))
}

// ---------------------------------------------------------------------------
// Draft groups
// ---------------------------------------------------------------------------

/// Default currency for new drafts.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default seat count for group classes.
pub const DEFAULT_MAX_STUDENTS: u32 = 10;

/// Upper bound on `ScheduleInfo::total_sessions`.
pub const MAX_TOTAL_SESSIONS: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct BasicInfo {
    pub title: String,
    #[validate(length(max = 100, message = "Subject must be at most 100 characters"))]
    pub subject: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassTypeInfo {
    pub class_format: ClassFormat,
    pub class_size: ClassSize,
    pub duration_type: DurationType,
}

/// One weekly meeting window. Its weekday is derived from the schedule's
/// start date and is never taken from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub enrollment_deadline: Option<NaiveDate>,
    pub total_sessions: u32,
    pub time_slots: Vec<TimeSlot>,
}

impl Default for ScheduleInfo {
    fn default() -> Self {
        Self {
            frequency: None,
            start_date: None,
            end_date: None,
            enrollment_deadline: None,
            total_sessions: 1,
            time_slots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PricingInfo {
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    #[validate(range(min = 1, message = "Max students must be at least 1"))]
    pub max_students: u32,
    pub auto_renewal: bool,
}

impl Default for PricingInfo {
    fn default() -> Self {
        Self {
            price: None,
            currency: DEFAULT_CURRENCY.to_string(),
            max_students: DEFAULT_MAX_STUDENTS,
            auto_renewal: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1, message = "Street is required for offline classes"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required for offline classes"))]
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[validate(length(min = 1, message = "Country is required for offline classes"))]
    pub country: String,
}

/// Where a class takes place. Only the branch matching the delivery mode
/// exists, so the other branch's data cannot leak into a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "delivery_mode", rename_all = "snake_case")]
pub enum Venue {
    Online { meeting_link: Option<String> },
    Offline { address: Address },
}

impl Venue {
    /// Empty venue for the given mode.
    pub fn empty(mode: DeliveryMode) -> Self {
        match mode {
            DeliveryMode::Online => Self::Online { meeting_link: None },
            DeliveryMode::Offline => Self::Offline {
                address: Address::default(),
            },
        }
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        match self {
            Self::Online { .. } => DeliveryMode::Online,
            Self::Offline { .. } => DeliveryMode::Offline,
        }
    }
}

impl Default for Venue {
    fn default() -> Self {
        Self::empty(DeliveryMode::Online)
    }
}

/// One lesson of the curriculum. Its week number is its 1-based position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonItem {
    #[serde(default)]
    pub id: Option<DbId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub session_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub status: LessonStatus,
    #[serde(default)]
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicInfoPatch {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassTypePatch {
    pub delivery_mode: Option<DeliveryMode>,
    pub class_format: Option<ClassFormat>,
    pub class_size: Option<ClassSize>,
    pub duration_type: Option<DurationType>,
    /// Applied only when the (resulting) delivery mode is online.
    #[serde(default, deserialize_with = "nullable")]
    pub meeting_link: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePatch {
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub enrollment_deadline: Option<Option<NaiveDate>>,
    pub total_sessions: Option<u32>,
    pub time_slots: Option<Vec<TimeSlot>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<f64>>,
    pub currency: Option<String>,
    pub max_students: Option<u32>,
    pub auto_renewal: Option<bool>,
}

/// Location fields. Address fields are ignored for an online venue and the
/// meeting link is ignored for an offline one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub meeting_link: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub learning_objectives: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub session_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_time: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_time: Option<Option<NaiveTime>>,
    pub status: Option<LessonStatus>,
    pub notes: Option<String>,
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// A present field, including `null`, becomes `Some`. With `#[serde(default)]`
/// an absent field stays `None`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// ClassDraft
// ---------------------------------------------------------------------------

/// The mutable, not-yet-committed class being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassDraft {
    /// Set when the draft edits an already committed class.
    pub editing_class_id: Option<DbId>,
    current_step: StepCursor,
    pub basic_info: BasicInfo,
    pub class_type: ClassTypeInfo,
    pub schedule: ScheduleInfo,
    pub pricing: PricingInfo,
    pub venue: Venue,
    pub curriculum: Vec<LessonItem>,
}

impl ClassDraft {
    /// Empty draft for a brand new class.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty draft that will update the class with `class_id` on commit.
    pub fn editing(class_id: DbId) -> Self {
        Self {
            editing_class_id: Some(class_id),
            ..Self::default()
        }
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.venue.delivery_mode()
    }

    pub fn meeting_link(&self) -> Option<&str> {
        match &self.venue {
            Venue::Online { meeting_link } => meeting_link.as_deref(),
            Venue::Offline { .. } => None,
        }
    }

    pub fn address(&self) -> Option<&Address> {
        match &self.venue {
            Venue::Offline { address } => Some(address),
            Venue::Online { .. } => None,
        }
    }

    // -- navigation --------------------------------------------------------

    pub fn current_step(&self) -> u8 {
        self.current_step.get()
    }

    pub fn current_wizard_step(&self) -> WizardStep {
        self.current_step.step()
    }

    pub fn next_step(&mut self) -> u8 {
        self.current_step.next()
    }

    pub fn previous_step(&mut self) -> u8 {
        self.current_step.previous()
    }

    pub fn go_to_step(&mut self, n: u8) -> u8 {
        self.current_step.go_to(n)
    }

    // -- setters -----------------------------------------------------------

    pub fn set_basic_info(&mut self, patch: BasicInfoPatch) {
        let info = &mut self.basic_info;
        merge(&mut info.title, patch.title);
        merge(&mut info.subject, patch.subject);
        merge(&mut info.description, patch.description);
        merge(&mut info.thumbnail_url, patch.thumbnail_url);
    }

    pub fn set_class_type(&mut self, patch: ClassTypePatch) {
        if let Some(mode) = patch.delivery_mode {
            if mode != self.delivery_mode() {
                self.venue = Venue::empty(mode);
            }
        }
        let info = &mut self.class_type;
        merge(&mut info.class_format, patch.class_format);
        merge(&mut info.class_size, patch.class_size);
        merge(&mut info.duration_type, patch.duration_type);
        if let Venue::Online { meeting_link } = &mut self.venue {
            merge(meeting_link, patch.meeting_link);
        }
        self.enforce_class_size();
    }

    pub fn set_schedule(&mut self, patch: SchedulePatch) {
        let schedule = &mut self.schedule;
        if patch.frequency.is_some() {
            schedule.frequency = patch.frequency;
        }
        if patch.start_date.is_some() {
            schedule.start_date = patch.start_date;
        }
        merge(&mut schedule.end_date, patch.end_date);
        merge(&mut schedule.enrollment_deadline, patch.enrollment_deadline);
        merge(&mut schedule.total_sessions, patch.total_sessions);
        merge(&mut schedule.time_slots, patch.time_slots);
    }

    pub fn set_pricing(&mut self, patch: PricingPatch) {
        let pricing = &mut self.pricing;
        merge(&mut pricing.price, patch.price);
        merge(&mut pricing.currency, patch.currency);
        merge(&mut pricing.max_students, patch.max_students);
        merge(&mut pricing.auto_renewal, patch.auto_renewal);
        self.enforce_class_size();
    }

    pub fn set_location(&mut self, patch: LocationPatch) {
        match &mut self.venue {
            Venue::Online { meeting_link } => merge(meeting_link, patch.meeting_link),
            Venue::Offline { address } => {
                merge(&mut address.street, patch.street);
                merge(&mut address.city, patch.city);
                merge(&mut address.state, patch.state);
                merge(&mut address.zip_code, patch.zip_code);
                merge(&mut address.country, patch.country);
            }
        }
    }

    pub fn set_curriculum(&mut self, lessons: Vec<LessonItem>) {
        self.curriculum = lessons;
    }

    /// Append a lesson and return its 1-based week number.
    pub fn add_lesson(&mut self, lesson: LessonItem) -> usize {
        self.curriculum.push(lesson);
        self.curriculum.len()
    }

    pub fn update_lesson(&mut self, index: usize, patch: LessonPatch) -> Result<(), CoreError> {
        let lesson = self.lesson_mut(index)?;
        merge(&mut lesson.title, patch.title);
        merge(&mut lesson.description, patch.description);
        merge(&mut lesson.learning_objectives, patch.learning_objectives);
        merge(&mut lesson.session_date, patch.session_date);
        merge(&mut lesson.start_time, patch.start_time);
        merge(&mut lesson.end_time, patch.end_time);
        merge(&mut lesson.status, patch.status);
        merge(&mut lesson.notes, patch.notes);
        Ok(())
    }

    pub fn remove_lesson(&mut self, index: usize) -> Result<LessonItem, CoreError> {
        self.lesson_mut(index)?;
        Ok(self.curriculum.remove(index))
    }

    fn lesson_mut(&mut self, index: usize) -> Result<&mut LessonItem, CoreError> {
        let len = self.curriculum.len();
        self.curriculum.get_mut(index).ok_or_else(|| {
            CoreError::Validation(format!(
                "Lesson index {index} is out of range (curriculum has {len} lessons)"
            ))
        })
    }

    /// One-on-one classes always have exactly one seat.
    pub(crate) fn enforce_class_size(&mut self) {
        if self.class_type.class_size == ClassSize::OneOnOne {
            self.pricing.max_students = 1;
        }
    }
}
