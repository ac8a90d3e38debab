use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::TimeSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub id: Uuid,
    pub grade_name: String,
}

/// A tutor as listed in the directory.
///
/// `avg_rating` is 0 for tutors nobody has reviewed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub experience_years: i32,
    pub hourly_rate: f64,
    pub avg_rating: f64,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub grades: Vec<Grade>,
    /// Slots a student could book right now.
    #[serde(default)]
    pub open_slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorFilter {
    pub subject_id: Uuid,
    pub grade_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectTutors {
    pub subject: Subject,
    pub tutors: Vec<Tutor>,
}
