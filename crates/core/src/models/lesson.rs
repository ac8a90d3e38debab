use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::NewTimeSlot;
use crate::errors::{BookingError, BookingResult};

/// Status of a lesson.
///
/// `pending` and `scheduled` hold their slot. `declined` and `cancelled` are
/// terminal; the row stays around as a tombstone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    Pending,
    Scheduled,
    Declined,
    Cancelled,
}

impl LessonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Pending => "pending",
            LessonStatus::Scheduled => "scheduled",
            LessonStatus::Declined => "declined",
            LessonStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LessonStatus::Pending | LessonStatus::Scheduled)
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LessonStatus::Pending),
            "scheduled" => Ok(LessonStatus::Scheduled),
            "declined" => Ok(LessonStatus::Declined),
            "cancelled" => Ok(LessonStatus::Cancelled),
            other => Err(BookingError::Validation(format!(
                "unknown lesson status '{}'",
                other
            ))),
        }
    }
}

/// A mutation that can be applied to an existing lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAction {
    Accept,
    Decline,
    Cancel,
    Reschedule,
}

impl LessonAction {
    pub fn verb(&self) -> &'static str {
        match self {
            LessonAction::Accept => "accepted",
            LessonAction::Decline => "declined",
            LessonAction::Cancel => "cancelled",
            LessonAction::Reschedule => "rescheduled",
        }
    }

    /// Status the lesson ends up in after the action.
    pub fn target(&self) -> LessonStatus {
        match self {
            LessonAction::Accept | LessonAction::Reschedule => LessonStatus::Scheduled,
            LessonAction::Decline => LessonStatus::Declined,
            LessonAction::Cancel => LessonStatus::Cancelled,
        }
    }

    pub fn allowed_from(&self, status: LessonStatus) -> bool {
        match self {
            LessonAction::Accept => status == LessonStatus::Pending,
            LessonAction::Decline | LessonAction::Cancel | LessonAction::Reschedule => {
                status.is_active()
            }
        }
    }

    /// Whether the action gives the lesson's slot back to the ledger.
    ///
    /// Declining leaves the slot exactly as it was; cancelling frees it.
    pub fn releases_slot(&self) -> bool {
        matches!(self, LessonAction::Cancel)
    }

    pub fn check(&self, lesson_id: Uuid, status: LessonStatus) -> BookingResult<()> {
        if self.allowed_from(status) {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                lesson_id,
                status,
                action: self.verb(),
            })
        }
    }
}

/// Contact details captured when someone without an account asks for a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactInfo {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name and phone are mandatory; surrounding whitespace is dropped.
    pub fn validated(self) -> BookingResult<Self> {
        let name = self.name.trim().to_string();
        let phone = self.phone.trim().to_string();
        if name.is_empty() {
            return Err(BookingError::Validation("student name is required".into()));
        }
        if phone.is_empty() {
            return Err(BookingError::Validation("student phone is required".into()));
        }
        let email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());

        Ok(Self { name, phone, email })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub timeslot_id: Uuid,
    pub student_id: Option<Uuid>,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub student_email: Option<String>,
    pub status: LessonStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLessonRequest {
    pub tutor_id: Uuid,
    pub slot_id: Uuid,
    pub student_name: String,
    pub student_phone: String,
    #[serde(default)]
    pub student_email: Option<String>,
}

impl RequestLessonRequest {
    pub fn contact(&self) -> ContactInfo {
        ContactInfo {
            name: self.student_name.clone(),
            phone: self.student_phone.clone(),
            email: self.student_email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLessonRequest {
    pub tutor_id: Uuid,
    pub slot_id: Uuid,
}

/// Where a lesson should move to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum RescheduleRequest {
    ExistingSlot { slot_id: Uuid },
    NewSlot(NewTimeSlot),
}

/// Request waiting for the tutor's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingLessonView {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Accepted lesson as the tutor sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedLessonView {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

/// One entry of a student's lesson history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentLessonView {
    pub id: Uuid,
    pub status: LessonStatus,
    pub tutor_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLessonView {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub status: LessonStatus,
    pub tutor_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub student_id: Option<Uuid>,
    /// Login of the provisioned account, if any.
    pub account_login: Option<String>,
}
