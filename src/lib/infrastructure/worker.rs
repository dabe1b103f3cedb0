//! Delivery Client for the worker endpoint, built on reqwest.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, Response};
use tracing::{debug, warn};

use crate::domain::{
    delivery::{DeliveryClient, DeliveryOutcome},
    mail::OutboundPayload,
};

/// Header carrying the shared secret
pub const TOKEN_HEADER: &str = "X-EDGEMAIL-TOKEN";

/// Upper bound on a single delivery attempt
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Most of a worker response body that is ever read
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Posts payloads to the worker endpoint
#[derive(Debug, Clone)]
pub struct WorkerClient {
    http: Client,
}

impl WorkerClient {
    /// Creates a client with the standard [`REQUEST_TIMEOUT`].
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Creates a client with a custom timeout. Redirects are never followed:
    /// the worker does not redirect, so a redirect is a failed delivery.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl DeliveryClient for WorkerClient {
    async fn send(&self, url: &str, token: &str, payload: &OutboundPayload) -> DeliveryOutcome {
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_HEADER, token)
            .json(payload)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                warn!("worker request failed: {err}");
                return DeliveryOutcome::transport_failure(&err.to_string());
            }
        };

        let status = response.status().as_u16();

        let body = read_body(response).await;

        debug!("worker answered {status}");

        DeliveryOutcome::from_response(status, body)
    }
}

/// Reads at most [`MAX_BODY_BYTES`] of the body, chunk by chunk.
async fn read_body(mut response: Response) -> String {
    let mut body = Vec::new();

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_BODY_BYTES - body.len();
                if chunk.len() >= room {
                    body.extend_from_slice(&chunk[..room]);
                    debug!("worker response body truncated to {MAX_BODY_BYTES} bytes");
                    break;
                }
                body.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(err) => {
                debug!("could not read worker response body: {err}");
                break;
            }
        }
    }

    String::from_utf8_lossy(&body).into_owned()
}
