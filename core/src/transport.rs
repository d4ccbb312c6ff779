//! Executes `HttpRequest` values over the network with `reqwest`.
//!
//! Status codes are returned as data; interpreting them is the client's job.
//! Only failures to complete the round-trip become errors here, and all of
//! them are `ApiError::Connectivity`.

use std::time::Duration;

use reqwest::{Client, Method};

use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    timeout: Duration,
}

impl Transport {
    /// The timeout bounds the whole request, connect through body read.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };

        tracing::debug!(method = req.method.as_str(), url = %req.url, "sending request");

        let mut builder = self.client.request(method, &req.url);
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(&req.url, e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(&req.url, e))?;

        tracing::debug!(status, url = %req.url, "received response");
        Ok(HttpResponse { status, body })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            tracing::error!(url, "request timeout after {:?}", self.timeout);
            ApiError::Connectivity(format!("request timed out after {:?}", self.timeout))
        } else {
            tracing::error!(url, error = %err, "connection error");
            ApiError::Connectivity(err.to_string())
        }
    }
}
