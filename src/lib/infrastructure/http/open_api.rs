//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::{
        logs::{LogEntry, LogStatus},
        mail::DeliveryRoute,
        reporting::StatusReport,
    },
    infrastructure::http::{errors::ErrorResponse, handlers::v1::*},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "EdgeMail"),
    paths(
        mail::send_mail::handler,
        mail::send_test_email::handler,
        reports::status::handler,
        reports::logs::handler,
        uptime::handler
    ),
    components(schemas(
        mail::send_mail::SendMailBody,
        mail::send_mail::SendMailResponse,
        mail::send_test_email::SendTestEmailResponse,
        DeliveryRoute,
        StatusReport,
        LogEntry,
        LogStatus,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
