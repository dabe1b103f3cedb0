//! Reporting handlers

pub mod logs;
pub mod status;
