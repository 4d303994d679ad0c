//! The transport seam: one synchronous send per rendered resource.
//!
//! The orchestrator only sees the [`Transport`] trait, so tests script
//! responses without a network and the HTTP implementation stays thin.

use async_trait::async_trait;
use serde_json::Value;

use fhirsub_render::ResourceKind;

use crate::error::Result;

/// Response to one resource submission.
#[derive(Debug, Clone)]
pub struct SendResponse {
    pub status: u16,
    pub body: Value,
}

impl SendResponse {
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

/// Sends one rendered document to one URL. No retries at this layer; a
/// transport failure is terminal for the resource's subtree only.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, document: &Value, url: &str) -> Result<SendResponse>;
}

/// A submission endpoint; builds one URL per resource kind.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    pub fn new(base_url: &str) -> Result<Self> {
        url::Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, kind: ResourceKind) -> String {
        format!(
            "{}/{}?_format=json&_pretty=true&_summary=true",
            self.base_url, kind
        )
    }
}

/// HTTP transport over reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, document: &Value, url: &str) -> Result<SendResponse> {
        let resp = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(document)
            .send()
            .await?;
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };
        Ok(SendResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_for_kind() {
        let endpoint = Endpoint::new("http://fhirtest.b12x.org/baseDstu3/").unwrap();
        assert_eq!(
            endpoint.url_for(ResourceKind::Patient),
            "http://fhirtest.b12x.org/baseDstu3/Patient?_format=json&_pretty=true&_summary=true"
        );
        assert_eq!(endpoint.base_url(), "http://fhirtest.b12x.org/baseDstu3");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(Endpoint::new("not a url").is_err());
    }

    #[test]
    fn test_success_statuses() {
        for (status, expected) in [(200, true), (201, true), (204, false), (500, false)] {
            let resp = SendResponse {
                status,
                body: Value::Null,
            };
            assert_eq!(resp.is_success(), expected);
        }
    }

    #[tokio::test]
    async fn test_http_transport_posts_json() {
        let server = MockServer::start().await;
        let document = json!({"resourceType": "Patient", "identifier": {"value": "sys*p1"}});
        Mock::given(method("POST"))
            .and(path("/baseDstu3/Patient"))
            .and(query_param("_format", "json"))
            .and(body_json(&document))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"resourceType": "Patient", "id": "42"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = Endpoint::new(&format!("{}/baseDstu3", server.uri())).unwrap();
        let transport = HttpTransport::new();
        let resp = transport
            .send(&document, &endpoint.url_for(ResourceKind::Patient))
            .await
            .unwrap();

        assert_eq!(resp.status, 201);
        assert_eq!(resp.body["id"], "42");
    }

    #[tokio::test]
    async fn test_http_transport_tolerates_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new();
        let resp = transport
            .send(&json!({}), &format!("{}/Patient", server.uri()))
            .await
            .unwrap();

        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, Value::Null);
    }
}
