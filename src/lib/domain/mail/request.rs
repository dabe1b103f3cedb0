//! Outgoing mail as handed over by the host application.

/// An email the host application is about to send.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MailRequest {
    /// Recipient addresses, in the order the host supplied them
    pub recipients: Vec<String>,

    /// The subject line
    pub subject: String,

    /// The HTML body
    pub body_html: String,

    /// Raw header lines, e.g. `From: Jane <jane@example.com>`
    pub headers: Vec<String>,

    /// Opaque attachment references; never forwarded
    pub attachments: Vec<String>,
}

impl MailRequest {
    /// Creates a request with no headers or attachments. `to` may hold a
    /// comma-separated list of addresses.
    pub fn new(to: &str, subject: &str, body_html: &str) -> Self {
        Self {
            recipients: Self::parse_recipients(to),
            subject: subject.to_string(),
            body_html: body_html.to_string(),
            headers: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Appends a raw header line
    pub fn with_header(mut self, header: &str) -> Self {
        self.headers.push(header.to_string());
        self
    }

    /// The recipient the worker payload is addressed to, or an empty string if
    /// the host supplied none. Further recipients are not fanned out.
    pub fn primary_recipient(&self) -> &str {
        self.recipients.first().map(String::as_str).unwrap_or_default()
    }

    /// Splits a comma-separated recipient list.
    pub fn parse_recipients(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|recipient| !recipient.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Splits a raw header block into individual lines, dropping blank ones.
    pub fn parse_headers(raw: &str) -> Vec<String> {
        raw.lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}
