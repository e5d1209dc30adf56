//! Authenticated request execution against the grading service.
//!
//! # Design
//! Every call re-authenticates with the client-credentials grant and uses
//! the freshly issued token for that one request only. The token is a local
//! value threaded from `authenticate` into `send`; the gateway keeps no
//! token state, so concurrent calls cannot overwrite each other's
//! credentials. The price is one extra round trip per operation.

use std::fmt;

use hyper::ext::ReasonPhrase;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Endpoint, GradesConfig};
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const AUTH_SCOPE: &str = "cvut:grades:course-restricted";

/// An access token issued by the authorization endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

enum Credentials<'a> {
    Basic,
    Bearer(&'a BearerToken),
}

/// Builds URLs and executes requests, authenticating before each one.
pub struct RequestGateway {
    http: reqwest::Client,
    endpoint: Endpoint,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl RequestGateway {
    pub fn new(config: &GradesConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
            auth_url: config.auth_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Appends `action` to the base endpoint. `action` must start with `/`;
    /// it is not validated.
    pub fn url_for_request(&self, action: &str) -> String {
        format!("{}{}", self.endpoint.base_url(), action)
    }

    /// The client-credentials token request, minus the basic-auth header
    /// which `send` adds.
    pub fn build_authentication(&self) -> HttpRequest {
        HttpRequest::post(&self.auth_url)
            .query("grant_type", "client_credentials")
            .query("scope", AUTH_SCOPE)
            .header("accept", "application/json")
    }

    /// Obtains a fresh bearer token.
    pub async fn authenticate(&self) -> Result<BearerToken> {
        debug!(auth_url = %self.auth_url, "requesting access token");
        let response = self
            .send(self.build_authentication(), Credentials::Basic)
            .await?;
        let token: TokenResponse = response.json()?;
        Ok(BearerToken(token.access_token))
    }

    /// Authenticates, then sends `request` with the new token.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let token = self.authenticate().await?;
        self.send(request, Credentials::Bearer(&token)).await
    }

    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        self.execute(with_query(HttpRequest::get(url), query)).await
    }

    pub async fn delete(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        self.execute(with_query(HttpRequest::delete(url), query))
            .await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let request = with_query(HttpRequest::post(url), query).json(body)?;
        self.execute(request).await
    }

    pub async fn put<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse> {
        let request = with_query(HttpRequest::put(url), query).json(body)?;
        self.execute(request).await
    }

    async fn send(&self, request: HttpRequest, credentials: Credentials<'_>) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.http.request(method, &request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match credentials {
            Credentials::Basic => builder.basic_auth(&self.client_id, Some(&self.client_secret)),
            Credentials::Bearer(token) => builder.bearer_auth(token.as_str()),
        };
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let reason = response
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .map(str::to_string);
        let body = response.text().await?;
        let response = HttpResponse {
            status,
            reason,
            body,
        };
        if !response.is_success() {
            warn!(status, url = %request.url, "request rejected by server");
        }
        response.error_for_status()
    }
}

fn with_query(request: HttpRequest, query: &[(&str, &str)]) -> HttpRequest {
    query
        .iter()
        .fold(request, |request, (key, value)| request.query(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(endpoint: Endpoint) -> RequestGateway {
        let config = GradesConfig::new(endpoint, "client", "secret")
            .with_auth_url("http://localhost:9000/oauth/token");
        RequestGateway::new(&config).unwrap()
    }

    #[test]
    fn url_for_request_concatenates_base_and_action() {
        assert_eq!(
            gateway(Endpoint::Live).url_for_request("/public/semester-code"),
            "https://grades.fit.cvut.cz/api/v1/public/semester-code"
        );
        assert_eq!(
            gateway(Endpoint::Dev).url_for_request("/public/courses/PI-ARB/definitions"),
            "https://rozvoj.fit.cvut.cz/evolution-dev/classification-dev/api/v1/public/courses/PI-ARB/definitions"
        );
    }

    #[test]
    fn url_for_request_does_not_validate_action() {
        let gw = gateway(Endpoint::Custom("http://localhost:3000".to_string()));
        assert_eq!(gw.url_for_request("public"), "http://localhost:3000public");
    }

    #[test]
    fn authentication_request_uses_client_credentials_grant() {
        let req = gateway(Endpoint::Live).build_authentication();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9000/oauth/token");
        assert_eq!(req.query_value("grant_type"), Some("client_credentials"));
        assert_eq!(req.query_value("scope"), Some(AUTH_SCOPE));
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn bearer_token_debug_is_redacted() {
        let token = BearerToken("abc".to_string());
        assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
    }
}
