pub mod accounts;
pub mod admin;
pub mod catalog;
pub mod lessons;
pub mod student;
pub mod tutor;

use tutorbook_core::{
    errors::BookingError,
    models::{
        account::{Role, Student},
        catalog::Tutor,
        lesson::Lesson,
    },
};
use uuid::Uuid;

use crate::{middleware::auth::Caller, ApiState};

/// The tutor profile behind a tutor caller.
pub(crate) async fn current_tutor(state: &ApiState, caller: &Caller) -> Result<Tutor, BookingError> {
    let actor = caller.require(&[Role::Tutor])?;
    state
        .catalog
        .tutor_by_username(actor.login.clone())
        .await?
        .ok_or_else(|| {
            BookingError::Authorization(format!("no tutor profile for login {}", actor.login))
        })
}

/// The student profile behind a student caller.
pub(crate) async fn current_student(
    state: &ApiState,
    caller: &Caller,
) -> Result<Student, BookingError> {
    let actor = caller.require(&[Role::Student])?;
    state
        .accounts
        .student_by_login(actor.login.clone())
        .await?
        .ok_or_else(|| {
            BookingError::Authorization(format!("no student profile for login {}", actor.login))
        })
}

pub(crate) async fn load_lesson(state: &ApiState, lesson_id: Uuid) -> Result<Lesson, BookingError> {
    state
        .lessons
        .find_lesson(lesson_id)
        .await?
        .ok_or_else(|| BookingError::lesson_not_found(lesson_id))
}

/// Admits admins, and tutors acting on their own lessons.
pub(crate) async fn managed_lesson(
    state: &ApiState,
    caller: &Caller,
    lesson_id: Uuid,
) -> Result<Lesson, BookingError> {
    caller.require(&[Role::Tutor, Role::Admin])?;
    let lesson = load_lesson(state, lesson_id).await?;

    if caller.role() == Role::Tutor {
        let tutor = current_tutor(state, caller).await?;
        if lesson.tutor_id != tutor.id {
            return Err(BookingError::Authorization(format!(
                "lesson {} belongs to another tutor",
                lesson_id
            )));
        }
    }

    Ok(lesson)
}
