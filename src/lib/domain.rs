//! Domain layer: the interception-and-forwarding pipeline and its collaborators.

pub mod delivery;
pub mod interception;
pub mod logs;
pub mod mail;
pub mod reporting;
pub mod settings;
