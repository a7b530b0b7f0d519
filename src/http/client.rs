use std::time::Duration;

use reqwest::{Client, Proxy};

use crate::error::{AppError, AppResult, HttpError};

/// Transport options shared by every worker's client.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// Bounds connection setup, including the TLS handshake.
    pub handshake_timeout: Option<Duration>,
    pub disable_compression: bool,
    pub disable_keepalive: bool,
    pub proxy: Option<String>,
    pub insecure: bool,
}

/// Builds one worker's client.
///
/// # Errors
///
/// Returns an error when the proxy URL is invalid or the client cannot be
/// constructed.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let mut client_builder = Client::builder();

    if let Some(timeout) = settings.handshake_timeout {
        client_builder = client_builder.connect_timeout(timeout);
    }

    if settings.disable_keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    }

    if settings.disable_compression {
        client_builder = client_builder.no_gzip().no_brotli().no_deflate();
    }

    if settings.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    if let Some(proxy_url) = settings.proxy.as_deref() {
        let proxy = Proxy::all(proxy_url).map_err(|err| {
            AppError::http(HttpError::InvalidProxyUrl {
                url: proxy_url.to_owned(),
                source: err,
            })
        })?;
        client_builder = client_builder.proxy(proxy);
    }

    client_builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
