//! Core data models for the venue back-office service.
//!
//! This module contains every document type stored in the collections.

mod attendance;
mod bill;
mod bottle;
mod customer;
pub mod timestamp;
mod user;

pub use attendance::{AttendanceRecord, ManualBreak, PunchedBreak};
pub use bill::{Bill, BillItem};
pub use bottle::{Keep, Product};
pub use customer::Customer;
pub use timestamp::{format_timestamp, parse_timestamp};
pub use user::{Cast, Role, User};
