//! Mail handlers

pub mod send_mail;
pub mod send_test_email;
