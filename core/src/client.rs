//! Entry point of the library.
//!
//! # Design
//! `GradesClient` owns the gateway and the language preference; course
//! handles and managers borrow it, so there is exactly one place holding
//! credentials. Semester aliases are always resolved by the service, even
//! when the caller already passes a literal code.

use std::fmt;

use tracing::debug;

use crate::config::GradesConfig;
use crate::course::Course;
use crate::error::Result;
use crate::gateway::RequestGateway;
use crate::http::HttpRequest;

/// A semester reference: a relative alias or a literal code such as `B202`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Semester {
    #[default]
    Current,
    Prev,
    Next,
    Code(String),
}

impl Semester {
    pub fn as_str(&self) -> &str {
        match self {
            Semester::Current => "current",
            Semester::Prev => "prev",
            Semester::Next => "next",
            Semester::Code(code) => code,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Semester {
    fn from(s: &str) -> Self {
        match s {
            "current" => Semester::Current,
            "prev" => Semester::Prev,
            "next" => Semester::Next,
            code => Semester::Code(code.to_string()),
        }
    }
}

impl From<String> for Semester {
    fn from(s: String) -> Self {
        Semester::from(s.as_str())
    }
}

impl From<&Semester> for Semester {
    fn from(s: &Semester) -> Self {
        s.clone()
    }
}

/// Client for the grading service.
pub struct GradesClient {
    gateway: RequestGateway,
    lang: Option<String>,
}

impl GradesClient {
    pub fn new(config: GradesConfig) -> Result<Self> {
        debug!(endpoint = %config.endpoint, "creating grades client");
        Ok(Self {
            gateway: RequestGateway::new(&config)?,
            lang: config.lang,
        })
    }

    /// Configuration from `GRADES_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GradesConfig::from_env()?)
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn set_lang(&mut self, lang: Option<String>) {
        self.lang = lang;
    }

    /// Raw access to the request gateway.
    pub fn api(&self) -> &RequestGateway {
        &self.gateway
    }

    pub fn course(&self, code: impl Into<String>) -> Course<'_> {
        Course::new(self, code.into())
    }

    pub fn build_semester_code(&self, semester: &Semester) -> HttpRequest {
        HttpRequest::get(self.gateway.url_for_request("/public/semester-code"))
            .query("semester", semester)
    }

    /// Resolves `semester` to a literal semester code.
    pub async fn semester_code(&self, semester: impl Into<Semester>) -> Result<String> {
        let semester = semester.into();
        let response = self
            .gateway
            .execute(self.build_semester_code(&semester))
            .await?;
        let code = response.text_value()?;
        debug!(alias = %semester, code = %code, "resolved semester");
        Ok(code)
    }

    /// A GET request carrying the `lang` and `semester` parameters every
    /// read endpoint takes. `lang` is sent empty when unset.
    pub(crate) fn localized_get(&self, url: String, semester_code: &str) -> HttpRequest {
        HttpRequest::get(url)
            .query("lang", self.lang.as_deref().unwrap_or_default())
            .query("semester", semester_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoint;
    use crate::http::HttpMethod;

    fn client() -> GradesClient {
        GradesClient::new(GradesConfig::new(Endpoint::Dev, "id", "secret")).unwrap()
    }

    #[test]
    fn semester_parses_aliases_and_codes() {
        assert_eq!(Semester::from("current"), Semester::Current);
        assert_eq!(Semester::from("prev"), Semester::Prev);
        assert_eq!(Semester::from("next"), Semester::Next);
        assert_eq!(Semester::from("B202"), Semester::Code("B202".to_string()));
        assert_eq!(Semester::default().as_str(), "current");
    }

    #[test]
    fn build_semester_code_sends_alias() {
        let req = client().build_semester_code(&Semester::Prev);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "https://rozvoj.fit.cvut.cz/evolution-dev/classification-dev/api/v1/public/semester-code"
        );
        assert_eq!(req.query, vec![("semester".to_string(), "prev".to_string())]);
    }

    #[test]
    fn localized_get_always_sends_lang() {
        let mut c = client();
        let req = c.localized_get("http://x".to_string(), "B202");
        assert_eq!(req.query_value("lang"), Some(""));
        assert_eq!(req.query_value("semester"), Some("B202"));

        c.set_lang(Some("en".to_string()));
        let req = c.localized_get("http://x".to_string(), "B202");
        assert_eq!(req.query_value("lang"), Some("en"));
        assert_eq!(c.lang(), Some("en"));
    }
}
