use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, parse_duration_value};
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub method: Option<HttpMethod>,
    pub headers: Option<Vec<String>>,
    pub data: Option<String>,
    pub data_lines: Option<String>,
    pub host: Option<String>,
    #[serde(alias = "workers")]
    pub concurrency: Option<usize>,
    pub requests: Option<u64>,
    pub rate: Option<u64>,
    pub timeout: Option<DurationValue>,
    pub disable_compression: Option<bool>,
    pub disable_keepalive: Option<bool>,
    pub proxy: Option<String>,
    pub insecure: Option<bool>,
    pub no_color: Option<bool>,
    pub verbose: Option<bool>,
}

/// A duration written either as seconds (`5`) or with a unit (`"750ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
