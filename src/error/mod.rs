mod app;
mod config;
mod http;
mod source;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use source::SourceError;
pub use validation::ValidationError;
