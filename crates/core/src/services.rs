//! Storage-facing operations.
//!
//! Every mutating method runs as a single transaction: it either commits or
//! leaves no trace. Conflicts are reported, never retried.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{
    account::{Actor, AdminNotification, Credentials, ProvisionedStudent, Role, Student, User},
    catalog::{Grade, Subject, SubjectTutors, Tutor, TutorFilter},
    lesson::{
        AdminLessonView, ConfirmedLessonView, ContactInfo, Lesson, PendingLessonView,
        StudentLessonView,
    },
    time_slot::{NewTimeSlot, TimeSlot},
};

/// Read-only directory of subjects, grades and tutors.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn subjects(&self) -> BookingResult<Vec<Subject>>;

    async fn grades(&self) -> BookingResult<Vec<Grade>>;

    /// Active tutors teaching the subject at the grade, best rated first.
    async fn tutors_by_filter(&self, filter: TutorFilter) -> BookingResult<Vec<Tutor>>;

    /// Every subject that has at least one active tutor, with its tutors.
    async fn tutors_by_subject(&self) -> BookingResult<Vec<SubjectTutors>>;

    async fn tutor_by_username(&self, username: String) -> BookingResult<Option<Tutor>>;

    /// Open slots no pending or scheduled lesson points at, by date then start.
    async fn bookable_slots(&self, tutor_id: Uuid) -> BookingResult<Vec<TimeSlot>>;
}

/// Source of truth for slot availability.
#[async_trait]
pub trait SlotLedger: Send + Sync {
    /// Slots flagged available, ordered by date then start time.
    async fn list_open_slots(&self, tutor_id: Uuid) -> BookingResult<Vec<TimeSlot>>;

    /// Publishes a new open slot for the tutor.
    async fn create_slot(&self, tutor_id: Uuid, slot: NewTimeSlot) -> BookingResult<TimeSlot>;

    /// Holds an open slot; `SlotConflict` if it is already held.
    async fn reserve(&self, slot_id: Uuid) -> BookingResult<TimeSlot>;

    /// Opens the slot again. Releasing an open slot is a no-op.
    async fn release(&self, slot_id: Uuid) -> BookingResult<TimeSlot>;
}

/// Lesson records and their status transitions.
#[async_trait]
pub trait LessonLifecycle: Send + Sync {
    /// Holds the slot and records a `pending` request with contact details.
    async fn request_lesson(
        &self,
        tutor_id: Uuid,
        slot_id: Uuid,
        contact: ContactInfo,
    ) -> BookingResult<Lesson>;

    /// Holds the slot and records a `scheduled` lesson for a known student.
    async fn book_lesson(
        &self,
        student_id: Uuid,
        tutor_id: Uuid,
        slot_id: Uuid,
    ) -> BookingResult<Lesson>;

    async fn accept(&self, lesson_id: Uuid) -> BookingResult<Lesson>;

    /// Marks the lesson declined. The slot is left untouched.
    async fn decline(&self, lesson_id: Uuid) -> BookingResult<Lesson>;

    /// Marks the lesson cancelled and releases its slot.
    async fn cancel(&self, lesson_id: Uuid) -> BookingResult<Lesson>;

    /// Moves the lesson to another open slot of the same tutor.
    async fn reschedule(&self, lesson_id: Uuid, new_slot_id: Uuid) -> BookingResult<Lesson>;

    /// Mints a held slot for the tutor and moves the lesson onto it.
    async fn reschedule_with_new_slot(
        &self,
        lesson_id: Uuid,
        tutor_id: Uuid,
        slot: NewTimeSlot,
    ) -> BookingResult<Lesson>;

    async fn find_lesson(&self, lesson_id: Uuid) -> BookingResult<Option<Lesson>>;

    async fn pending_for_tutor(&self, tutor_id: Uuid) -> BookingResult<Vec<PendingLessonView>>;

    async fn confirmed_for_tutor(&self, tutor_id: Uuid)
        -> BookingResult<Vec<ConfirmedLessonView>>;

    async fn history_for_student(&self, student_id: Uuid)
        -> BookingResult<Vec<StudentLessonView>>;

    async fn all_lessons(&self) -> BookingResult<Vec<AdminLessonView>>;
}

/// Logins, student profiles and the admin inbox.
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Creates a student login from the contact details on a lesson and links it.
    async fn provision_student(
        &self,
        lesson_id: Uuid,
        credentials: Credentials,
    ) -> BookingResult<ProvisionedStudent>;

    async fn create_user(&self, credentials: Credentials, role: Role) -> BookingResult<User>;

    async fn authenticate(&self, credentials: Credentials) -> BookingResult<Actor>;

    async fn student_by_login(&self, login: String) -> BookingResult<Option<Student>>;

    async fn notify_forgotten_password(&self, login: String) -> BookingResult<AdminNotification>;

    /// Newest first.
    async fn admin_notifications(&self) -> BookingResult<Vec<AdminNotification>>;
}
