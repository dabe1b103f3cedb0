//! Infrastructure layer: adapters for HTTP, storage, SMTP and configuration.

pub mod db;
pub mod email;
pub mod http;
pub mod settings;
pub mod worker;
