use std::sync::Arc;

use reqwest::{
    Method, Url,
    header::{HOST, HeaderMap, HeaderName, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::args::{DEFAULT_USER_AGENT, HttpMethod};
use crate::error::{AppError, AppResult, HttpError};

/// Everything a request shares across the run except its body.
#[derive(Debug, Clone)]
pub struct RequestTemplate {
    method: Method,
    url: Url,
    headers: HeaderMap,
}

/// One unit of work on the job queue.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub template: Arc<RequestTemplate>,
    pub body: String,
}

impl RequestTemplate {
    /// Builds the shared request parts.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid URL, header or host override.
    pub fn new(
        method: HttpMethod,
        url: &str,
        headers: &[(String, String)],
        host_override: Option<&str>,
    ) -> AppResult<Self> {
        let url = parse_target(url)?;
        let mut headers = build_headers(headers)?;
        if let Some(host) = host_override {
            // The URL keeps the original target for the connection and SNI.
            headers.insert(HOST, host_header(host)?);
            debug!("Host header override {} for {}", host.trim(), url);
        }

        Ok(Self {
            method: method.as_reqwest(),
            url,
            headers,
        })
    }

    #[must_use]
    pub fn request(self: &Arc<Self>, body: String) -> RequestDescriptor {
        RequestDescriptor {
            template: Arc::clone(self),
            body,
        }
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn parse_target(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::http(HttpError::UnsupportedScheme {
                scheme: other.to_owned(),
            }));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::http(HttpError::UrlMissingHost {
            url: raw.to_owned(),
        }));
    }
    Ok(url)
}

fn build_headers(headers: &[(String, String)]) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderName {
                header: key.clone(),
                source: err,
            })
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            AppError::http(HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })
        })?;
        map.append(name, value);
    }
    if !map.contains_key(USER_AGENT) {
        map.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    }
    Ok(map)
}

fn host_header(raw: &str) -> AppResult<HeaderValue> {
    let host = raw.trim();
    let invalid = || {
        AppError::http(HttpError::InvalidHostOverride {
            host: raw.to_owned(),
        })
    };
    if host.is_empty() {
        return Err(invalid());
    }
    HeaderValue::from_str(host).map_err(|_err| invalid())
}
