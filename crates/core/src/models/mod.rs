pub mod account;
pub mod catalog;
pub mod lesson;
pub mod time_slot;
