use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::eyre;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorbook_core::{
    errors::BookingError,
    models::{
        account::{AdminNotification, Role, Student, User},
        catalog::{Grade, Subject, Tutor},
        lesson::{
            AdminLessonView, ConfirmedLessonView, Lesson, LessonStatus, PendingLessonView,
            StudentLessonView,
        },
        time_slot::TimeSlot,
    },
};
use uuid::Uuid;

fn parse_status(raw: &str) -> Result<LessonStatus, BookingError> {
    raw.parse()
        .map_err(|_| BookingError::Storage(eyre!("unexpected lesson status '{}' in storage", raw)))
}

fn parse_role(raw: &str) -> Result<Role, BookingError> {
    raw.parse()
        .map_err(|_| BookingError::Storage(eyre!("unexpected role '{}' in storage", raw)))
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSubject {
    pub id: Uuid,
    pub name: String,
}

impl From<DbSubject> for Subject {
    fn from(row: DbSubject) -> Self {
        Subject {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbGrade {
    pub id: Uuid,
    pub grade_name: String,
}

impl From<DbGrade> for Grade {
    fn from(row: DbGrade) -> Self {
        Grade {
            id: row.id,
            grade_name: row.grade_name,
        }
    }
}

/// Tutor row with the aggregated rating already coalesced to 0.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTutor {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub experience_years: i32,
    pub hourly_rate: f64,
    pub avg_rating: f64,
}

impl From<DbTutor> for Tutor {
    fn from(row: DbTutor) -> Self {
        let full_name = format!("{} {}", row.first_name, row.last_name);
        Tutor {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            full_name,
            email: row.email,
            phone: row.phone,
            bio: row.bio,
            experience_years: row.experience_years,
            hourly_rate: row.hourly_rate,
            avg_rating: row.avg_rating,
            subjects: Vec::new(),
            grades: Vec::new(),
            open_slots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            id: row.id,
            tutor_id: row.tutor_id,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            is_available: row.is_available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbLesson {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub timeslot_id: Uuid,
    pub student_id: Option<Uuid>,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub student_email: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbLesson> for Lesson {
    type Error = BookingError;

    fn try_from(row: DbLesson) -> Result<Self, Self::Error> {
        Ok(Lesson {
            status: parse_status(&row.status)?,
            id: row.id,
            tutor_id: row.tutor_id,
            timeslot_id: row.timeslot_id,
            student_id: row.student_id,
            student_name: row.student_name,
            student_phone: row.student_phone,
            student_email: row.student_email,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbPendingLesson {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

impl From<DbPendingLesson> for PendingLessonView {
    fn from(row: DbPendingLesson) -> Self {
        PendingLessonView {
            id: row.id,
            student_name: row.student_name,
            date: row.date,
            start_time: row.start_time,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbConfirmedLesson {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

impl From<DbConfirmedLesson> for ConfirmedLessonView {
    fn from(row: DbConfirmedLesson) -> Self {
        ConfirmedLessonView {
            id: row.id,
            student_name: row.student_name,
            student_phone: row.student_phone,
            date: row.date,
            start_time: row.start_time,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbStudentLesson {
    pub id: Uuid,
    pub status: String,
    pub tutor_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
}

impl TryFrom<DbStudentLesson> for StudentLessonView {
    type Error = BookingError;

    fn try_from(row: DbStudentLesson) -> Result<Self, Self::Error> {
        Ok(StudentLessonView {
            status: parse_status(&row.status)?,
            id: row.id,
            tutor_name: row.tutor_name,
            date: row.date,
            start_time: row.start_time,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAdminLesson {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub student_phone: Option<String>,
    pub status: String,
    pub tutor_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub student_id: Option<Uuid>,
    pub account_login: Option<String>,
}

impl TryFrom<DbAdminLesson> for AdminLessonView {
    type Error = BookingError;

    fn try_from(row: DbAdminLesson) -> Result<Self, Self::Error> {
        Ok(AdminLessonView {
            status: parse_status(&row.status)?,
            id: row.id,
            student_name: row.student_name,
            student_phone: row.student_phone,
            tutor_name: row.tutor_name,
            date: row.date,
            start_time: row.start_time,
            student_id: row.student_id,
            account_login: row.account_login,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

impl TryFrom<DbUser> for User {
    type Error = BookingError;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            role: parse_role(&row.role)?,
            id: row.id,
            username: row.username,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStudent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
}

impl From<DbStudent> for Student {
    fn from(row: DbStudent) -> Self {
        Student {
            id: row.id,
            user_id: row.user_id,
            full_name: row.full_name,
            phone: row.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAdminNotification {
    pub id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbAdminNotification> for AdminNotification {
    fn from(row: DbAdminNotification) -> Self {
        AdminNotification {
            id: row.id,
            message: row.message,
            created_at: row.created_at,
        }
    }
}
