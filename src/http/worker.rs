use std::error::Error;
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;

use crate::metrics::{Report, RequestResult};

use super::request::RequestDescriptor;

/// Runs requests off the job queue until it is closed and drained.
pub async fn run_worker(
    worker_id: usize,
    client: Client,
    queue_rx: flume::Receiver<RequestDescriptor>,
    report: Arc<Report>,
) {
    while let Ok(descriptor) = queue_rx.recv_async().await {
        report.sent().incr(1);
        let result = execute(&client, &descriptor).await;
        if let Some(error) = result.error.as_deref() {
            debug!("Worker {} request failed: {}", worker_id, error);
        }
        report.record(&result);
    }
    debug!("Worker {} finished", worker_id);
}

/// Times one request from just before send until the body is fully read.
pub(crate) async fn execute(client: &Client, descriptor: &RequestDescriptor) -> RequestResult {
    let template = &descriptor.template;
    let request = client
        .request(template.method().clone(), template.url().clone())
        .headers(template.headers().clone())
        .body(descriptor.body.clone())
        .build();
    let start = Instant::now();
    let request = match request {
        Ok(request) => request,
        Err(err) => return RequestResult::failure(start.elapsed(), error_text(&err)),
    };

    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            match drain_response_body(response).await {
                Ok(bytes) => RequestResult::success(status, start.elapsed(), bytes),
                Err(err) => RequestResult::failure(start.elapsed(), error_text(&err)),
            }
        }
        Err(err) => RequestResult::failure(start.elapsed(), error_text(&err)),
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

/// The error followed by its source chain, joined by `": "`.
pub(crate) fn error_text(err: &(dyn Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}
