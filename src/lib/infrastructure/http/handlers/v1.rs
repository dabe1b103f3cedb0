use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::{mail::MailService, reporting::StatusReporter},
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod mail;
pub mod reports;
pub mod stoplight;
pub mod uptime;

pub fn router<M: MailService, R: StatusReporter>() -> Router<AppState<M, R>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<M, R>))
        .route("/mail", post(mail::send_mail::handler::<M, R>))
        .route("/test-email", post(mail::send_test_email::handler::<M, R>))
        .route("/status", get(reports::status::handler::<M, R>))
        .route("/logs", get(reports::logs::handler::<M, R>))
}
