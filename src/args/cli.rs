use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_header, parse_positive_usize};
use super::types::{HttpMethod, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "barrage",
    version,
    about = "Rate-limited async HTTP load generator with a live per-second table, response-time histogram, and latency percentiles."
)]
pub struct LoadArgs {
    /// Target URL
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body sent with every request
    #[arg(long, short, default_value = "")]
    pub data: String,

    /// Read request bodies from a file, one request per line
    #[arg(long = "data-lines", short = 'Z', conflicts_with = "data")]
    pub data_lines: Option<String>,

    /// Host header and TLS server name to present instead of the URL host
    #[arg(long = "host")]
    pub host: Option<String>,

    /// Number of concurrent workers
    #[arg(
        long = "concurrency",
        short = 'c',
        alias = "workers",
        default_value = "50",
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Stop after N requests (0 = until the input is exhausted)
    #[arg(long = "requests", short = 'n', default_value_t = 0)]
    pub requests: u64,

    /// Requests per second across all workers (0 = unthrottled)
    #[arg(long = "rate", short = 'q', default_value_t = 0)]
    pub rate: u64,

    /// Connection and TLS handshake timeout (supports ms/s/m/h)
    #[arg(long = "timeout", default_value = "10s", value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Do not ask the server for compressed responses
    #[arg(long = "disable-compression")]
    pub disable_compression: bool,

    /// Open a new connection for every request
    #[arg(long = "disable-keepalive")]
    pub disable_keepalive: bool,

    /// Proxy URL for all requests
    #[arg(long = "proxy")]
    pub proxy: Option<String>,

    /// Skip TLS certificate and hostname verification
    #[arg(long = "insecure", short = 'k')]
    pub insecure: bool,

    /// Path to a TOML or JSON config file
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
