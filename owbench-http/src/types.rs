use std::time::Duration;

use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

/// A request against the FaaS control plane. Only the headers the OpenWhisk
/// REST API actually needs are modeled (`Authorization`, `Content-Type`).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: http::Method,
    pub url: String,
    pub authorization: Option<String>,
    pub json_body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn get(url: String) -> Self {
        Self {
            method: http::Method::GET,
            url,
            authorization: None,
            json_body: None,
            timeout: None,
        }
    }

    pub fn post_json(url: String, body: Bytes) -> Self {
        Self {
            method: http::Method::POST,
            url,
            authorization: None,
            json_body: Some(body),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_authorization(mut self, value: &str) -> Self {
        self.authorization = Some(value.to_string());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
