#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! EdgeMail: redirects outgoing transactional email to a remote Worker endpoint,
//! falling back to native delivery whenever redirection is unavailable.

pub mod domain;
pub mod infrastructure;
