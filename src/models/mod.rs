// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

//! Data models for the application.

pub mod classified;
pub mod session;
pub mod spot;
pub mod user;

pub use classified::{ClassifiedQuery, SpotMatch};
pub use session::{StudyInterest, StudySession};
pub use spot::{NewSpot, Spot, SpotCategory};
pub use user::User;
