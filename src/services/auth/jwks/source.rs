use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::{JwkSet, JwksError};

/// Where signing keys come from. Implementations must be cheap to share across requests.
#[async_trait]
pub trait JwksSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<JwkSet, JwksError>;
}

/// Fetches the identity provider's published key set over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpJwksSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpJwksSource {
    /// `timeout` bounds the whole request (connect + body).
    pub fn new(url: Url, timeout: Duration) -> Result<Self, JwksError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl JwksSource for HttpJwksSource {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        tracing::debug!(url = %self.url, "fetching jwks");

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(JwksError::Status(status.as_u16()));
        }

        let value = response.json::<Value>().await?;
        JwkSet::from_value(value)
    }
}

/// A fixed key set (local development, tests).
#[async_trait]
impl JwksSource for JwkSet {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn source_for(server: &MockServer) -> HttpJwksSource {
        let url = Url::parse(&format!("{}/.well-known/jwks.json", server.uri())).unwrap();
        HttpJwksSource::new(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn fetches_published_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keys": [{"kty": "RSA", "kid": "k1", "use": "sig", "n": "abc", "e": "AQAB"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let set = source_for(&server).await.fetch().await.unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.find("k1").unwrap().e, "AQAB");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, JwksError::Status(503)), "{err:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, JwksError::Http(_)), "{err:?}");
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"keys": []}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&server.uri()).unwrap();
        let source = HttpJwksSource::new(url, Duration::from_millis(200)).unwrap();

        match source.fetch().await {
            Err(JwksError::Http(e)) => assert!(e.is_timeout(), "{e:?}"),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
