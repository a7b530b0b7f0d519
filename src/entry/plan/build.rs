use std::path::Path;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::debug;

use crate::app::RunSettings;
use crate::args::LoadArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{ClientSettings, RequestTemplate};
use crate::source::{LineReader, RequestSource, StaticBody};

use super::types::RunPlan;

/// Merges the config file (explicit or default) under the CLI values.
pub(crate) fn resolve_args(mut args: LoadArgs, matches: &ArgMatches) -> AppResult<LoadArgs> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }
    Ok(args)
}

/// Validates the arguments and prepares everything the run needs. Failures
/// here abort before any request is sent.
pub(crate) async fn build_plan(args: LoadArgs) -> AppResult<RunPlan> {
    validate_args(&args)?;
    let url = args
        .url
        .as_deref()
        .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;

    let template = Arc::new(RequestTemplate::new(
        args.method,
        url,
        &args.headers,
        args.host.as_deref(),
    )?);

    let source: Box<dyn RequestSource> = match args.data_lines.as_deref() {
        Some(path) => Box::new(LineReader::open(Path::new(path)).await?),
        None => Box::new(StaticBody::new(args.data)),
    };

    let settings = RunSettings {
        concurrency: args.concurrency.get(),
        requests: args.requests,
        rate: args.rate,
        no_color: args.no_color,
        client: ClientSettings {
            handshake_timeout: Some(args.timeout),
            disable_compression: args.disable_compression,
            disable_keepalive: args.disable_keepalive,
            proxy: args.proxy,
            insecure: args.insecure,
        },
    };
    debug!("Run settings: {:?}", settings);

    Ok(RunPlan {
        source,
        template,
        settings,
    })
}

pub(crate) fn validate_args(args: &LoadArgs) -> AppResult<()> {
    if args.url.as_deref().is_none_or(|url| url.trim().is_empty()) {
        return Err(AppError::validation(ValidationError::MissingUrl));
    }
    if args.data_lines.is_none() && args.requests == 0 {
        return Err(AppError::validation(ValidationError::UnboundedStaticBody));
    }
    Ok(())
}
