use async_trait::async_trait;
use mockall::mock;
use tutorbook_core::{
    errors::BookingResult,
    models::{
        account::{Actor, AdminNotification, Credentials, ProvisionedStudent, Role, Student, User},
        catalog::{Grade, Subject, SubjectTutors, Tutor, TutorFilter},
        lesson::{
            AdminLessonView, ConfirmedLessonView, ContactInfo, Lesson, PendingLessonView,
            StudentLessonView,
        },
        time_slot::{NewTimeSlot, TimeSlot},
    },
    services::{Accounts, Catalog, LessonLifecycle, SlotLedger},
};
use uuid::Uuid;

mock! {
    pub CatalogStore {}

    #[async_trait]
    impl Catalog for CatalogStore {
        async fn subjects(&self) -> BookingResult<Vec<Subject>>;
        async fn grades(&self) -> BookingResult<Vec<Grade>>;
        async fn tutors_by_filter(&self, filter: TutorFilter) -> BookingResult<Vec<Tutor>>;
        async fn tutors_by_subject(&self) -> BookingResult<Vec<SubjectTutors>>;
        async fn tutor_by_username(&self, username: String) -> BookingResult<Option<Tutor>>;
        async fn bookable_slots(&self, tutor_id: Uuid) -> BookingResult<Vec<TimeSlot>>;
    }
}

mock! {
    pub SlotLedgerStore {}

    #[async_trait]
    impl SlotLedger for SlotLedgerStore {
        async fn list_open_slots(&self, tutor_id: Uuid) -> BookingResult<Vec<TimeSlot>>;
        async fn create_slot(&self, tutor_id: Uuid, slot: NewTimeSlot) -> BookingResult<TimeSlot>;
        async fn reserve(&self, slot_id: Uuid) -> BookingResult<TimeSlot>;
        async fn release(&self, slot_id: Uuid) -> BookingResult<TimeSlot>;
    }
}

mock! {
    pub LessonStore {}

    #[async_trait]
    impl LessonLifecycle for LessonStore {
        async fn request_lesson(
            &self,
            tutor_id: Uuid,
            slot_id: Uuid,
            contact: ContactInfo,
        ) -> BookingResult<Lesson>;
        async fn book_lesson(
            &self,
            student_id: Uuid,
            tutor_id: Uuid,
            slot_id: Uuid,
        ) -> BookingResult<Lesson>;
        async fn accept(&self, lesson_id: Uuid) -> BookingResult<Lesson>;
        async fn decline(&self, lesson_id: Uuid) -> BookingResult<Lesson>;
        async fn cancel(&self, lesson_id: Uuid) -> BookingResult<Lesson>;
        async fn reschedule(&self, lesson_id: Uuid, new_slot_id: Uuid) -> BookingResult<Lesson>;
        async fn reschedule_with_new_slot(
            &self,
            lesson_id: Uuid,
            tutor_id: Uuid,
            slot: NewTimeSlot,
        ) -> BookingResult<Lesson>;
        async fn find_lesson(&self, lesson_id: Uuid) -> BookingResult<Option<Lesson>>;
        async fn pending_for_tutor(&self, tutor_id: Uuid) -> BookingResult<Vec<PendingLessonView>>;
        async fn confirmed_for_tutor(&self, tutor_id: Uuid) -> BookingResult<Vec<ConfirmedLessonView>>;
        async fn history_for_student(&self, student_id: Uuid) -> BookingResult<Vec<StudentLessonView>>;
        async fn all_lessons(&self) -> BookingResult<Vec<AdminLessonView>>;
    }
}

mock! {
    pub AccountStore {}

    #[async_trait]
    impl Accounts for AccountStore {
        async fn provision_student(
            &self,
            lesson_id: Uuid,
            credentials: Credentials,
        ) -> BookingResult<ProvisionedStudent>;
        async fn create_user(&self, credentials: Credentials, role: Role) -> BookingResult<User>;
        async fn authenticate(&self, credentials: Credentials) -> BookingResult<Actor>;
        async fn student_by_login(&self, login: String) -> BookingResult<Option<Student>>;
        async fn notify_forgotten_password(&self, login: String) -> BookingResult<AdminNotification>;
        async fn admin_notifications(&self) -> BookingResult<Vec<AdminNotification>>;
    }
}
