// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction under `/api/`, status
// classification, and structured error-body extraction. One inherent
// method per backend operation.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{CreateSiteRequest, CreatedSite, ErrorBody, Site, Stats};
use crate::transport::TransportConfig;

/// HTTP client for the monitoring backend.
///
/// Every method is a single request/response pair. Nothing is cached and
/// nothing is retried; callers decide what a failure means for them.
#[derive(Debug, Clone)]
pub struct SiteClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SiteClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://localhost:5000`); a
    /// path prefix is preserved, so `http://host/monitor` targets
    /// `http://host/monitor/api/...`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Operations ───────────────────────────────────────────────────

    /// `GET /api/sites`
    pub async fn list_sites(&self) -> Result<Vec<Site>, Error> {
        let url = self.api_url("sites")?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        parse_json(check_status(resp).await?).await
    }

    /// `GET /api/stats`
    pub async fn fetch_stats(&self) -> Result<Stats, Error> {
        let url = self.api_url("stats")?;
        debug!("GET {url}");
        let resp = self.http.get(url).send().await?;
        parse_json(check_status(resp).await?).await
    }

    /// `POST /api/sites` with `{url, name}`.
    ///
    /// The caller is responsible for trimming and rejecting an empty url;
    /// the backend may still refuse (duplicate, malformed), in which case
    /// its message comes back verbatim as [`Error::Rejected`].
    pub async fn create_site(&self, url: &str, name: &str) -> Result<CreatedSite, Error> {
        let body = CreateSiteRequest {
            url: url.to_owned(),
            name: name.to_owned(),
        };
        let endpoint = self.api_url("sites")?;
        let resp = self.send_json(reqwest::Method::POST, endpoint, &body).await?;
        let body = check_status(resp).await?.text().await?;
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            debug!(error = %e, body = preview(&body), "unrecognized create response");
            CreatedSite::Accepted
        }))
    }

    /// `DELETE /api/sites/{id}`
    pub async fn delete_site(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("sites/{id}"))?;
        debug!("DELETE {url}");
        let resp = self.http.delete(url).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    /// `POST /api/sites/{id}/check`
    ///
    /// The check result is not returned; re-fetch the site list to see it.
    pub async fn force_check(&self, id: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("sites/{id}/check"))?;
        debug!("POST {url}");
        let resp = self.http.post(url).send().await?;
        check_status(resp).await?;
        Ok(())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<reqwest::Response, Error> {
        debug!("{method} {url}");
        Ok(self.http.request(method, url).json(body).send().await?)
    }
}

/// Pass 2xx responses through; turn anything else into a classified error.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let status = status.as_u16();
    let body = resp.text().await.unwrap_or_default();
    trace!(status, body = %preview(&body), "non-2xx response");

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message);

    Err(match message {
        Some(message) => Error::Rejected { status, message },
        None => Error::Status { status },
    })
}

async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        }
    })
}

/// First 200 characters of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    body.char_indices().nth(200).map_or(body, |(i, _)| &body[..i])
}
