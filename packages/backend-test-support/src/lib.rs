//! Backend test support utilities
//!
//! Helpers shared by the game core's unit and integration tests: unified
//! logging initialization, sample records, unique ids, and problem-details
//! assertions.

pub mod fixtures;
pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
