// File: src/client/core.rs
use crate::client::middleware::{DefaultHeadersLayer, DefaultHeadersService};
use crate::error::{Error, Result};
use crate::model::DailySchedule;
use crate::model::parser::parse_payload;

use async_trait::async_trait;
use http::Request;
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceExt;
use tower_layer::Layer;
use url::Url;

type HttpsClient = DefaultHeadersService<
    Client<
        hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
        String,
    >,
>;

/// Location and calculation parameters for one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub city: String,
    pub country: String,
    pub method: u8,
}

/// Anything that can produce today's schedule for a location.
#[async_trait]
pub trait TimingsSource: Send + Sync {
    async fn fetch(&self, query: &FeedQuery) -> Result<DailySchedule>;
}

/// Client for the Aladhan `timingsByCity` endpoint.
#[derive(Clone, Debug)]
pub struct AladhanClient {
    base_url: Url,
    http: HttpsClient,
}

impl AladhanClient {
    pub fn new(api_url: &str) -> Result<Self> {
        // `Url::join` replaces the last segment unless the base ends with '/'.
        let mut base = api_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| Error::Fetch(format!("invalid API url '{}': {}", api_url, e)))?;

        let mut root_store = rustls::RootCertStore::empty();
        let result = rustls_native_certs::load_native_certs();
        let (added, _ignored) = root_store.add_parsable_certificates(result.certs);
        if added == 0 {
            log::warn!("No system certificates found; HTTPS requests will fail");
        }
        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https_connector);
        let http = DefaultHeadersLayer::for_feed().layer(client);

        Ok(Self { base_url, http })
    }

    pub fn request_url(&self, query: &FeedQuery) -> Result<Url> {
        let mut url = self
            .base_url
            .join("timingsByCity")
            .map_err(|e| Error::Fetch(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("city", &query.city)
            .append_pair("country", &query.country)
            .append_pair("method", &query.method.to_string());
        Ok(url)
    }
}

#[async_trait]
impl TimingsSource for AladhanClient {
    async fn fetch(&self, query: &FeedQuery) -> Result<DailySchedule> {
        let url = self.request_url(query)?;
        log::debug!("GET {}", url);

        let req = Request::get(url.as_str())
            .body(String::new())
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let resp = self
            .http
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read response body: {}", e)))?
            .to_bytes();

        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "API request failed with status {}",
                status
            )));
        }

        let text = String::from_utf8(body.to_vec())
            .map_err(|e| Error::DataShape(format!("response is not UTF-8: {}", e)))?;
        parse_payload(&text)
    }
}
