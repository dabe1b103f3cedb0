//! Native email delivery

pub mod smtp;
