#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! EdgeMail server: accepts outgoing mail over HTTP and redirects it to the
//! worker endpoint, falling back to SMTP.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use edgemail::{
    domain::{
        delivery::DeliveryOutcome,
        interception::Interceptor,
        logs::EmailLogServiceImpl,
        mail::{EmailAddress, MailServiceImpl, OutboundPayload},
        reporting::StatusReporterImpl,
    },
    infrastructure::{
        db::sqlite::{DatabaseConnectionDetails, SqliteDatabase},
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{
            state::{AppConfig, AppState},
            HttpServer, HttpServerConfig,
        },
        settings::{StaticSettings, WorkerConfig},
        worker::WorkerClient,
    },
};
use tracing::{debug, info};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The database connection details
    #[clap(flatten)]
    pub db: DatabaseConnectionDetails,

    /// The redirection settings
    #[clap(flatten)]
    pub worker: WorkerConfig,

    /// The native fallback configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// Recipient of test emails
    #[arg(long, env = "ADMIN_EMAIL")]
    pub admin_email: String,

    /// How long log queries stay cached, in seconds
    #[arg(long, env = "EDGEMAIL_LOG_CACHE_TTL", default_value_t = 300)]
    pub log_cache_ttl: u64,

    /// Serve the status and logs endpoints
    #[arg(
        long,
        env = "EDGEMAIL_STATUS_REPORT",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub status_report: bool,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let admin_email = EmailAddress::new(&args.admin_email)?;

    let settings = Arc::new(StaticSettings::from(args.worker));

    let sqlite = Arc::new(SqliteDatabase::new(&args.db.connection_string).await?);
    let logs = Arc::new(EmailLogServiceImpl::with_cache_ttl(
        sqlite,
        Duration::from_secs(args.log_cache_ttl),
    ));

    let interceptor = Interceptor::new(settings.clone(), Arc::new(WorkerClient::new()?), logs.clone())
        .with_observer(|outcome: &DeliveryOutcome, payload: &OutboundPayload| {
            debug!(
                from = %payload.from.email,
                http_code = outcome.http_code(),
                "worker response: {}",
                outcome.response_text()
            );
        });

    let mail = MailServiceImpl::new(Arc::new(interceptor), Arc::new(SMTPMailer::new(args.smtp)));

    let reporter = args
        .status_report
        .then(|| StatusReporterImpl::new(settings, logs, admin_email.clone()));

    if reporter.is_none() {
        info!("status reporting disabled");
    }

    let state = AppState::new(AppConfig { admin_email }, mail, reporter);

    HttpServer::new(state, args.server).await?.run().await
}
