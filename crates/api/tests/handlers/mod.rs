mod accounts_test;
mod admin_test;
mod lessons_test;
mod tutor_test;
