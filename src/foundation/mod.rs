//! Foundation utilities shared by every engine subsystem.

pub mod math;
pub mod time;
