pub mod accounts;
pub mod admin;
pub mod catalog;
pub mod health;
pub mod lessons;
pub mod student;
pub mod tutor;
