use crate::{Error, Result};
use logstitch_core::PageRequest;
use logstitch_types::format_api_timestamp;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const LOGS_PATH: &str = "api/analytics/logs";
const INITIAL_DATA_PATH: &str = "api/initial-data";

/// Log type selector for application/event logs on the analytics endpoint.
const EVENT_LOG_TYPE: &str = "2";

/// Connection settings for one controller.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// FQDN, IP address or full base URL; bare hosts default to https.
    pub address: String,
    pub user: String,
    pub password: String,
    pub tenant: String,
    /// API version to pin; discovered from the controller when absent.
    pub api_version: Option<String>,
    /// Accept self-signed controller certificates.
    pub insecure: bool,
    pub timeout: Duration,
}

/// Raw body of an analytics logs response.
#[derive(Debug, Deserialize)]
pub struct LogsResponse {
    /// Total records available in the window; informational only.
    #[serde(default)]
    pub count: Option<u64>,
    pub results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct InitialData {
    version: VersionInfo,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(rename = "Version")]
    version: String,
}

/// Blocking HTTP client for the controller REST API.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    client: Client,
    base: Url,
    user: String,
    password: String,
    tenant: String,
    api_version: Option<String>,
}

impl ControllerClient {
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let base = base_url(&config.address)?;
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base,
            user: config.user.clone(),
            password: config.password.clone(),
            tenant: config.tenant.clone(),
            api_version: config.api_version.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.api_version = Some(version.into());
    }

    /// Ask the controller which API version it runs.
    pub fn discover_api_version(&self) -> Result<String> {
        let url = self.url(INITIAL_DATA_PATH)?;
        log::debug!("GET {}", url);
        let response = check_status(self.client.get(url).send()?)?;
        let data: InitialData = response
            .json()
            .map_err(|err| Error::Decode(format!("initial-data: {}", err)))?;
        Ok(data.version.version)
    }

    /// Fetch one page of event logs for `request`.
    pub fn fetch_logs(&self, request: &PageRequest<'_>) -> Result<LogsResponse> {
        let url = self.url(LOGS_PATH)?;
        let mut params: Vec<(&str, String)> = vec![
            ("type", EVENT_LOG_TYPE.to_string()),
            ("page", "1".to_string()),
            ("page_size", request.page_size.to_string()),
            ("start", format_api_timestamp(&request.window.start())),
            ("end", format_api_timestamp(&request.window.end())),
            ("format", "json".to_string()),
            ("query_id", request.query_id.to_string()),
        ];
        params.extend(request.filters.iter().map(|f| ("filter", f.clone())));

        log::debug!(
            "GET {} end={} page_size={} query_id={}",
            url,
            format_api_timestamp(&request.window.end()),
            request.page_size,
            request.query_id
        );
        let response = self
            .authorized(self.client.get(url))
            .query(&params)
            .send()?;
        let response = check_status(response)?;
        response
            .json()
            .map_err(|err| Error::Decode(format!("analytics logs: {}", err)))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .basic_auth(&self.user, Some(&self.password))
            .header("X-Avi-Tenant", &self.tenant);
        match &self.api_version {
            Some(version) => builder.header("X-Avi-Version", version),
            None => builder,
        }
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|err| Error::InvalidAddress(format!("{}: {}", path, err)))
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(status_error(status.as_u16(), response.text()))
}

/// Build a status error, keeping a body-read failure visible in the body text.
fn status_error<E: fmt::Display>(status: u16, body: std::result::Result<String, E>) -> Error {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            log::debug!("could not read body of status {} response: {}", status, err);
            format!("<unreadable response body: {}>", err)
        }
    };
    Error::Status { status, body }
}

/// Normalize a controller address into a base URL ending in `/`.
fn base_url(address: &str) -> Result<Url> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::InvalidAddress(
            "controller address must not be empty".to_string(),
        ));
    }
    let with_scheme = if address.contains("://") {
        address.to_string()
    } else {
        format!("https://{}", address)
    };
    let normalized = format!("{}/", with_scheme.trim_end_matches('/'));
    Url::parse(&normalized).map_err(|err| Error::InvalidAddress(format!("{}: {}", address, err)))
}
