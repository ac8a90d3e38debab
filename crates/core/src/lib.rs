//! # Tutorbook Core
//!
//! Domain types for the tutoring booking backend: the catalog of subjects,
//! grades and tutors, time slots, lessons and their status lifecycle, and
//! student accounts.
//!
//! The storage-facing operations are declared as async traits in
//! [`services`]; `tutorbook-db` implements them on PostgreSQL and the API
//! layer only ever talks to the traits.

pub mod errors;
pub mod models;
pub mod services;
