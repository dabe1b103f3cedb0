//! Sender Resolver: derives the From identity for a request.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::EmailAddress;

lazy_static! {
    static ref MAILBOX_REGEX: Regex = Regex::new(r"^(.*?)\s*<(.+?)>$").unwrap();
}

const FROM_HEADER: &str = "From:";

/// The sender of a forwarded email
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderIdentity {
    /// Display name, possibly empty
    pub name: String,

    /// Validated sender address
    pub email: EmailAddress,
}

/// Errors that can occur while resolving the sender
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SenderError {
    /// Neither the From header nor the configured default yields a valid address
    #[error("no valid From email")]
    NoValidFromEmail,
}

/// Resolves the sender from the first `From:` header (matched
/// case-insensitively), falling back to the configured defaults when no such
/// header exists.
///
/// # Arguments
/// * `headers` - Raw header lines in the order the host supplied them.
/// * `default_email` - The configured default sender address.
/// * `default_name` - The configured default sender name.
///
/// # Returns
/// - [`Ok`] with the [`SenderIdentity`] if the resolved address is valid.
/// - [`Err`] with [`SenderError::NoValidFromEmail`] if it is empty or invalid.
pub fn resolve_sender(
    headers: &[String],
    default_email: &str,
    default_name: &str,
) -> Result<SenderIdentity, SenderError> {
    let (name, email) = match headers.iter().find_map(|line| from_header_value(line)) {
        Some(value) => parse_mailbox(value),
        None => (default_name.to_string(), default_email.to_string()),
    };

    let email = EmailAddress::new(&email).map_err(|err| {
        debug!("rejecting sender {email:?}: {err}");
        SenderError::NoValidFromEmail
    })?;

    Ok(SenderIdentity { name, email })
}

fn from_header_value(line: &str) -> Option<&str> {
    let prefix = line.get(..FROM_HEADER.len())?;

    prefix
        .eq_ignore_ascii_case(FROM_HEADER)
        .then(|| &line[FROM_HEADER.len()..])
}

/// Splits `Name <email>` into its parts; anything else is a bare address.
fn parse_mailbox(value: &str) -> (String, String) {
    let value = value.trim();

    match MAILBOX_REGEX.captures(value) {
        Some(captures) => (
            captures[1]
                .trim_matches(|c| matches!(c, ' ' | '"' | '\''))
                .to_string(),
            captures[2].trim().to_string(),
        ),
        None => (String::new(), value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn headers(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_quoted_display_name() -> TestResult {
        let sender = resolve_sender(
            &headers(&[r#"From: "Jane Doe" <jane@example.com>"#]),
            "no-reply@c.com",
            "Co",
        )?;

        assert_eq!(sender.name, "Jane Doe");
        assert_eq!(sender.email.as_str(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_apostrophe_quoted_display_name() -> TestResult {
        let sender = resolve_sender(&headers(&["From: 'Support' <help@example.com>"]), "", "")?;

        assert_eq!(sender.name, "Support");
        assert_eq!(sender.email.as_str(), "help@example.com");

        Ok(())
    }

    #[test]
    fn test_bare_address_has_empty_name() -> TestResult {
        let sender = resolve_sender(&headers(&["From: jane@example.com"]), "", "Co")?;

        assert_eq!(sender.name, "");
        assert_eq!(sender.email.as_str(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_angle_address_without_name() -> TestResult {
        let sender = resolve_sender(&headers(&["From: <jane@example.com>"]), "", "Co")?;

        assert_eq!(sender.name, "");
        assert_eq!(sender.email.as_str(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_header_name_is_case_insensitive() -> TestResult {
        let sender = resolve_sender(&headers(&["FROM: Jane <jane@example.com>"]), "", "")?;

        assert_eq!(sender.name, "Jane");

        let sender = resolve_sender(&headers(&["from:jane@example.com"]), "", "")?;

        assert_eq!(sender.email.as_str(), "jane@example.com");

        Ok(())
    }

    #[test]
    fn test_first_from_header_wins() -> TestResult {
        let sender = resolve_sender(
            &headers(&[
                "Reply-To: other@example.com",
                "From: First <first@example.com>",
                "From: Second <second@example.com>",
            ]),
            "",
            "",
        )?;

        assert_eq!(sender.email.as_str(), "first@example.com");

        Ok(())
    }

    #[test]
    fn test_header_must_start_with_from() -> TestResult {
        let sender = resolve_sender(
            &headers(&["X-Original-From: spoof@example.com", " From: x@example.com"]),
            "no-reply@c.com",
            "Co",
        )?;

        assert_eq!(sender.email.as_str(), "no-reply@c.com");
        assert_eq!(sender.name, "Co");

        Ok(())
    }

    #[test]
    fn test_defaults_used_verbatim_without_from_header() -> TestResult {
        let sender = resolve_sender(&headers(&["Cc: a@b.com"]), "no-reply@c.com", "Co")?;

        assert_eq!(
            sender,
            SenderIdentity {
                name: "Co".to_string(),
                email: EmailAddress::new_unchecked("no-reply@c.com"),
            }
        );

        Ok(())
    }

    #[test]
    fn test_empty_default_is_rejected() {
        assert_eq!(
            resolve_sender(&[], "", "Co"),
            Err(SenderError::NoValidFromEmail)
        );
    }

    #[test]
    fn test_invalid_header_address_is_rejected() {
        assert_eq!(
            resolve_sender(&headers(&["From: Jane <not-an-address>"]), "no-reply@c.com", "Co"),
            Err(SenderError::NoValidFromEmail)
        );
        assert_eq!(
            resolve_sender(&headers(&["From:   "]), "no-reply@c.com", "Co"),
            Err(SenderError::NoValidFromEmail)
        );
    }
}
