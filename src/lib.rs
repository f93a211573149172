//! Back office for a hospitality venue.
//!
//! The core of the crate is attendance time accounting: punching staff in
//! and out, breaks, planned schedules and manager corrections, reduced to
//! rounded work and break durations (see [`attendance`]). Around it sit the
//! customer register, bottle keeps, sales bills and user registration, all
//! persisted through the [`repository`] layer and served over HTTP by
//! [`api`].

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod attendance;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod repository;
