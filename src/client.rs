use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, error, trace};

use crate::protocol::{
    illuminate_group_fields, illuminate_theme_fields, parse_group_list, parse_theme_list,
    request_body, request_url, set_hue_sat_fields, Framing, METHOD_CONTROLLER_NAME,
    METHOD_GROUP_LIST_GET, METHOD_ILLUMINATE_GROUP, METHOD_ILLUMINATE_THEME, METHOD_SET_HUE_SAT,
    METHOD_THEME_LIST_GET,
};
use crate::types::*;
use crate::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LuxorClientBuilder {
    host: String,
    http: Option<reqwest::Client>,
    timeout: Duration,
    framing: Framing,
}

impl LuxorClientBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            http: None,
            timeout: DEFAULT_TIMEOUT,
            framing: Framing::default(),
        }
    }

    /// Share an existing HTTP session (connection pool) with the client.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    pub fn build(self) -> Result<LuxorClient> {
        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder().build()?,
        };

        Ok(LuxorClient {
            http,
            host: self.host.clone(),
            base_url: base_url(&self.host),
            timeout: self.timeout,
            framing: self.framing,
        })
    }
}

fn base_url(host: &str) -> String {
    let url = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    };
    url.trim_end_matches('/').to_string()
}

/// Client for a single Luxor controller. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct LuxorClient {
    http: reqwest::Client,
    host: String,
    base_url: String,
    timeout: Duration,
    framing: Framing,
}

impl LuxorClient {
    pub fn builder(host: impl Into<String>) -> LuxorClientBuilder {
        LuxorClientBuilder::new(host)
    }

    pub fn new(host: impl Into<String>) -> Result<Self> {
        LuxorClientBuilder::new(host).build()
    }

    /// The host as configured, before any scheme was added.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Issue a single protocol request and return the decoded JSON body.
    ///
    /// Failures are logged with the target URL and payload and returned
    /// as-is; nothing is retried here.
    pub async fn call(&self, method: &str, extra: Map<String, Value>) -> Result<Value> {
        self.call_with(method, extra, Ok).await
    }

    /// Like [`call`](Self::call), with `parse` applied to the body so shape
    /// errors are logged alongside transport errors.
    async fn call_with<T>(
        &self,
        method: &str,
        extra: Map<String, Value>,
        parse: impl FnOnce(Value) -> Result<T>,
    ) -> Result<T> {
        let url = request_url(self.framing, &self.base_url, method);
        let payload = request_body(self.framing, method, extra);
        debug!(url = %url, method, payload = %payload, "sending request");

        match self.send(&url, method, &payload).await.and_then(parse) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                error!(
                    url = %url,
                    method,
                    payload = %payload,
                    error = %e,
                    "controller request failed"
                );
                Err(e)
            }
        }
    }

    async fn send(&self, url: &str, method: &str, payload: &Value) -> Result<Value> {
        let resp = self
            .http
            .post(url)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Protocol {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        trace!(method, status = status.as_u16(), body = %body, "response");
        serde_json::from_str(&body).map_err(|e| Error::decode(method, e.to_string()))
    }

    pub async fn controller_identity(&self) -> Result<ControllerIdentity> {
        let identity = self
            .call_with(METHOD_CONTROLLER_NAME, Map::new(), |body| match body {
                Value::Object(raw) => Ok(ControllerIdentity::from_raw(raw)),
                other => Err(Error::decode(
                    METHOD_CONTROLLER_NAME,
                    format!("expected an object, got {other}"),
                )),
            })
            .await?;
        debug!(name = %identity.name, family = ?identity.family(), "controller identified");
        Ok(identity)
    }

    /// Groups in the order the controller reports them.
    pub async fn list_groups(&self) -> Result<Vec<LightGroup>> {
        self.call_with(METHOD_GROUP_LIST_GET, Map::new(), |body| {
            parse_group_list(&body)
        })
        .await
    }

    pub async fn list_themes(&self) -> Result<Vec<Theme>> {
        self.call_with(METHOD_THEME_LIST_GET, Map::new(), |body| {
            parse_theme_list(&body)
        })
        .await
    }

    /// Intensity is 0..=100 and is sent as given; 0 turns the group off.
    pub async fn set_group_intensity(&self, group_number: u16, intensity: u8) -> Result<Value> {
        self.call(
            METHOD_ILLUMINATE_GROUP,
            illuminate_group_fields(group_number, intensity),
        )
        .await
    }

    pub async fn activate_theme(&self, theme_index: u16, on_off: bool) -> Result<Value> {
        self.call(
            METHOD_ILLUMINATE_THEME,
            illuminate_theme_fields(theme_index, on_off),
        )
        .await
    }

    /// Only meaningful for color groups on a color-capable controller.
    pub async fn set_hue_saturation(
        &self,
        group_number: u16,
        hue: u16,
        saturation: u8,
    ) -> Result<Value> {
        self.call(
            METHOD_SET_HUE_SAT,
            set_hue_sat_fields(group_number, hue, saturation),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(base_url("192.168.1.20"), "http://192.168.1.20");
        assert_eq!(base_url("luxor.local:8080"), "http://luxor.local:8080");
    }

    #[test]
    fn scheme_is_kept_verbatim() {
        assert_eq!(base_url("http://10.0.0.5"), "http://10.0.0.5");
        assert_eq!(base_url("https://10.0.0.5"), "https://10.0.0.5");
        assert_eq!(base_url("http://10.0.0.5/"), "http://10.0.0.5");
    }

    #[test]
    fn builder_defaults() {
        let client = LuxorClient::new("10.0.0.5").unwrap();
        assert_eq!(client.host(), "10.0.0.5");
        assert_eq!(client.base_url(), "http://10.0.0.5");
        assert_eq!(client.framing(), Framing::MethodField);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
    }
}
