//! HTTP request and response descriptions as plain data.
//!
//! # Design
//! Managers describe every call as an `HttpRequest` value (method, url,
//! query, headers, JSON body) and the gateway is the only place that turns
//! it into network I/O. Request construction can therefore be unit-tested
//! without a server, and the gateway stays a thin executor.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GradesError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Query parameters keep insertion order and are always sent, even when the
/// value is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Serializes `payload` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Result<Self> {
        let body = serde_json::to_string(payload)
            .map_err(|e| GradesError::Serialization(e.to_string()))?;
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        Ok(self)
    }

    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `reason` is the status line's reason phrase when the server sent one
/// other than the canonical phrase for `status`.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts any non-2xx status into `GradesError::Http`.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(match self.reason {
                Some(reason) => GradesError::Http {
                    status: self.status,
                    status_text: reason,
                },
                None => GradesError::from_status(self.status),
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| GradesError::Deserialization(e.to_string()))
    }

    /// A body holding a single string, sent either as a JSON string or as
    /// plain text.
    pub fn text_value(&self) -> Result<String> {
        if let Ok(value) = serde_json::from_str::<String>(&self.body) {
            return Ok(value);
        }
        let raw = self.body.trim();
        if raw.is_empty() || raw.starts_with(['{', '[', '"']) {
            return Err(GradesError::Deserialization(format!(
                "expected a string body, got {raw:?}"
            )));
        }
        Ok(raw.to_string())
    }
}
