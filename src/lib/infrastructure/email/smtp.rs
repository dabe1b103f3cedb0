//! SMTP email service implementation

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::domain::mail::{resolve_sender, strip_tags, MailRequest, Mailer, MailerError};

/// SMTP configuration
#[derive(Clone, Default, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "localhost")]
    pub host: String,

    /// The SMTP port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username
    #[clap(long = "smtp-user", env = "SMTP_USER", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[clap(long = "smtp-password", env = "SMTP_PASSWORD", default_value = "")]
    pub password: String,

    /// The sender email address, used when a request has no From header
    #[clap(long = "smtp-sender", env = "SMTP_SENDER", default_value = "")]
    pub sender: String,

    /// The sender name, used when a request has no From header
    #[clap(long = "smtp-sender-name", env = "SMTP_SENDER_NAME", default_value = "")]
    pub sender_name: String,

    /// Verify the TLS certificate
    #[clap(long = "smtp-verify-tls", env = "SMTP_VERIFY_TLS", default_value = "true")]
    pub verify_tls: bool,

    /// Enable STARTTLS (TLS upgrade on connection)
    #[clap(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value = "true")]
    pub starttls: bool,
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }

    /// Builds the transport described by the configuration
    pub fn mailer(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let relay = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
        };

        let mut relay = relay.port(self.config.port).tls(Tls::Opportunistic(
            TlsParameters::builder(self.config.host.to_string())
                .dangerous_accept_invalid_certs(!self.config.verify_tls)
                .build()?,
        ));

        if !self.config.username.is_empty() {
            relay = relay.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }

        Ok(relay.build())
    }

    /// Renders `request` as a multipart message. The sender comes from the
    /// request's From header, or the configured sender when there is none.
    pub fn message(&self, request: &MailRequest) -> Result<Message, MailerError> {
        let sender = resolve_sender(
            &request.headers,
            &self.config.sender,
            &self.config.sender_name,
        )?;

        let name = (!sender.name.is_empty()).then(|| sender.name.clone());
        let from = Mailbox::new(name, sender.email.as_str().parse::<Address>()?);

        let mut builder = Message::builder().from(from).subject(request.subject.clone());

        for recipient in &request.recipients {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }

        if !request.attachments.is_empty() {
            debug!(
                "native delivery drops {} attachment(s)",
                request.attachments.len()
            );
        }

        Ok(builder.multipart(MultiPart::alternative_plain_html(
            strip_tags(&request.body_html),
            request.body_html.clone(),
        ))?)
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    #[mutants::skip]
    async fn send_email(&self, request: &MailRequest) -> Result<(), MailerError> {
        let email = self.message(request)?;

        match self.mailer()?.send(email).await {
            Ok(_) => Ok(()),
            Err(e) => Err(MailerError::UnknownError(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn mailer() -> SMTPMailer {
        SMTPMailer::new(SMTPConfig {
            host: "localhost".to_string(),
            port: 2525,
            sender: "site@host.com".to_string(),
            sender_name: "Site".to_string(),
            ..Default::default()
        })
    }

    fn rendered(message: &Message) -> TestResult<String> {
        Ok(String::from_utf8(message.formatted())?)
    }

    #[test]
    fn test_uses_configured_sender_without_from_header() -> TestResult {
        let message = mailer().message(&MailRequest::new("a@b.com", "Hi", "<b>Hello</b>"))?;
        let raw = rendered(&message)?;

        assert!(raw.contains("From: Site <site@host.com>"));
        assert!(raw.contains("To: a@b.com"));
        assert!(raw.contains("Subject: Hi"));
        assert!(raw.contains("<b>Hello</b>"));

        Ok(())
    }

    #[test]
    fn test_uses_from_header() -> TestResult {
        let request = MailRequest::new("a@b.com", "Hi", "Hello")
            .with_header("From: Shop <shop@example.org>");

        let raw = rendered(&mailer().message(&request)?)?;

        assert!(raw.contains("From: Shop <shop@example.org>"));

        Ok(())
    }

    #[test]
    fn test_sends_to_every_recipient() -> TestResult {
        let message = mailer().message(&MailRequest::new("a@b.com, c@d.com", "Hi", "Hello"))?;

        let to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(|address| address.to_string())
            .collect();

        assert_eq!(to, vec!["a@b.com", "c@d.com"]);

        Ok(())
    }

    #[test]
    fn test_invalid_recipient() {
        let result = mailer().message(&MailRequest::new("not-an-email", "Hi", "Hello"));

        assert!(matches!(result, Err(MailerError::InvalidEmail)));
    }

    #[test]
    fn test_invalid_sender() {
        let mailer = SMTPMailer::new(SMTPConfig::default());

        let result = mailer.message(&MailRequest::new("a@b.com", "Hi", "Hello"));

        assert!(matches!(result, Err(MailerError::InvalidEmail)));
    }

    #[test]
    fn test_no_recipients() {
        let result = mailer().message(&MailRequest::new("", "Hi", "Hello"));

        assert!(matches!(result, Err(MailerError::UnknownError(_))));
    }
}
