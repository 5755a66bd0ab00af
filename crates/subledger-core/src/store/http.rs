//! HTTP store client for the subscriptions REST resource.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{StoreError, StoreResult, SubscriptionStore};
use crate::subscription::{
    DATE_FORMAT, ExpiryHorizon, NewSubscription, Subscription, SubscriptionId, UserContext,
};
use crate::{Error, Result};

/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    service: &'a str,
    #[serde(rename = "endDate")]
    end_date: String,
}

#[derive(Serialize)]
struct RenewBody {
    #[serde(rename = "endDate")]
    end_date: String,
}

/// Store client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: Url,
    http_client: Client,
}

impl HttpStore {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client with an optional per-request timeout.
    ///
    /// Without a timeout a hung request waits as long as the transport does.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| Error::Config(format!("invalid store URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "store URL must be http(s): {base_url}"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// The configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/subscriptions[/...]`, percent-encoding each segment.
    fn endpoint(&self, extra: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Transport(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .push("subscriptions")
            .extend(extra);
        Ok(url)
    }
}

/// Map a non-success status to a store error.
fn status_error(status: StatusCode, body: &str) -> StoreError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let body = body.trim();
            if body.is_empty() {
                StoreError::Validation(status.to_string())
            } else {
                StoreError::Validation(body.to_string())
            }
        }
        _ => StoreError::Transport(status.to_string()),
    }
}

async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(StoreError::transport)
}

/// Decodes the record echoed back by a write, if there is one.
///
/// The status alone decides success. An empty or unrecognised body is
/// ignored since the caller re-lists afterwards anyway.
async fn read_record(response: Response) -> StoreResult<Option<Subscription>> {
    let response = check_status(response).await?;
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Ignoring unreadable write response: {e}");
            return Ok(None);
        }
    };
    if body.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&body) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::debug!("Write response is not a subscription record: {e}");
            Ok(None)
        }
    }
}

impl SubscriptionStore for HttpStore {
    async fn list(&self, user: &UserContext) -> StoreResult<Vec<Subscription>> {
        let url = self.endpoint(&[])?;
        tracing::debug!("GET {url} userId={}", user.scope());

        let response = self
            .http_client
            .get(url)
            .query(&[("userId", user.scope())])
            .send()
            .await
            .map_err(StoreError::transport)?;

        read_json(response).await
    }

    async fn create(
        &self,
        user: &UserContext,
        subscription: &NewSubscription,
    ) -> StoreResult<Option<Subscription>> {
        let url = self.endpoint(&[])?;
        tracing::debug!("POST {url} service={}", subscription.service);

        let body = CreateBody {
            user_id: user.scope(),
            service: &subscription.service,
            end_date: subscription.end_date.format(DATE_FORMAT).to_string(),
        };
        let response = self
            .http_client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(StoreError::transport)?;

        read_record(response).await
    }

    async fn renew(
        &self,
        id: &SubscriptionId,
        end_date: NaiveDate,
    ) -> StoreResult<Option<Subscription>> {
        let url = self.endpoint(&[id.as_str()])?;
        tracing::debug!("PUT {url} endDate={end_date}");

        let body = RenewBody {
            end_date: end_date.format(DATE_FORMAT).to_string(),
        };
        let response = self
            .http_client
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(StoreError::transport)?;

        read_record(response).await
    }

    async fn delete(&self, id: &SubscriptionId) -> StoreResult<()> {
        let url = self.endpoint(&[id.as_str()])?;
        tracing::debug!("DELETE {url}");

        let response = self
            .http_client
            .delete(url)
            .send()
            .await
            .map_err(StoreError::transport)?;

        check_status(response).await.map(|_| ())
    }

    async fn list_expiring(
        &self,
        user: &UserContext,
        horizon: ExpiryHorizon,
    ) -> StoreResult<Vec<Subscription>> {
        let url = self.endpoint(&["notifications"])?;
        tracing::debug!("GET {url} days={}", horizon.in_days());

        let days = horizon.in_days().to_string();
        let response = self
            .http_client
            .get(url)
            .query(&[("userId", user.scope()), ("days", days.as_str())])
            .send()
            .await
            .map_err(StoreError::transport)?;

        read_json(response).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let store = HttpStore::new("http://localhost:5000/api/").unwrap();

        assert_eq!(
            store.endpoint(&[]).unwrap().as_str(),
            "http://localhost:5000/api/subscriptions"
        );
        assert_eq!(
            store.endpoint(&["notifications"]).unwrap().as_str(),
            "http://localhost:5000/api/subscriptions/notifications"
        );
        assert_eq!(
            store.endpoint(&["a/b c"]).unwrap().as_str(),
            "http://localhost:5000/api/subscriptions/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        assert!(matches!(HttpStore::new("not a url"), Err(Error::Config(_))));
        assert!(matches!(
            HttpStore::new("ftp://example.com/api"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            HttpStore::new("mailto:someone@example.com"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST, "service is required"),
            StoreError::Validation("service is required".into())
        );
        assert_eq!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, ""),
            StoreError::Validation("422 Unprocessable Entity".into())
        );
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "missing"),
            StoreError::Transport("404 Not Found".into())
        );
        assert!(!status_error(StatusCode::INTERNAL_SERVER_ERROR, "").is_validation());
    }
}
