use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::error::AppResult;
use crate::http::{
    ClientSettings, RequestDescriptor, RequestTemplate, build_client, dispatch, run_worker,
};
use crate::metrics::{Report, WindowSnapshot};
use crate::shutdown::shutdown_channel;
use crate::source::RequestSource;

use super::progress::setup_progress_reporter;
use super::summary::RunOverview;

/// A full queue holds the dispatcher to worker throughput.
const JOB_QUEUE_CAPACITY: usize = 1;

#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) concurrency: usize,
    /// Maximum submissions; 0 means until the source is exhausted.
    pub(crate) requests: u64,
    /// Submissions per second; 0 means unthrottled.
    pub(crate) rate: u64,
    pub(crate) no_color: bool,
    pub(crate) client: ClientSettings,
}

pub(crate) struct RunOutcome {
    pub(crate) total: WindowSnapshot,
    pub(crate) overview: RunOverview,
}

/// Runs the dispatcher, the worker pool and the live reporter to completion.
///
/// Lifecycle: the dispatcher closes the queue, workers drain it and exit,
/// then the shutdown signal stops the reporter, which is joined before the
/// total window is read.
///
/// # Errors
///
/// Returns an error when a worker client cannot be built or the reporter
/// task fails.
pub(crate) async fn run_load(
    source: &mut dyn RequestSource,
    template: &Arc<RequestTemplate>,
    settings: &RunSettings,
) -> AppResult<RunOutcome> {
    let concurrency = settings.concurrency.max(1);
    let clients = (0..concurrency)
        .map(|_| build_client(&settings.client))
        .collect::<AppResult<Vec<_>>>()?;

    let report = Arc::new(Report::new());
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let reporter = setup_progress_reporter(Arc::clone(&report), shutdown_rx, settings.no_color);

    info!(
        "Sending requests to {} with {} workers",
        template.url(),
        concurrency
    );
    let run_start = Instant::now();
    let (queue_tx, queue_rx) = flume::bounded::<RequestDescriptor>(JOB_QUEUE_CAPACITY);
    let workers: Vec<_> = clients
        .into_iter()
        .enumerate()
        .map(|(worker_id, client)| {
            tokio::spawn(run_worker(
                worker_id,
                client,
                queue_rx.clone(),
                Arc::clone(&report),
            ))
        })
        .collect();
    drop(queue_rx);

    let dispatched = dispatch(source, template, queue_tx, settings.requests, settings.rate).await;
    debug!("Dispatcher finished after {} requests", dispatched);

    for handle in workers {
        if let Err(err) = handle.await {
            error!("Worker task failed: {}", err);
        }
    }
    let elapsed = run_start.elapsed();

    drop(shutdown_tx.send(()));
    reporter.await?;

    Ok(RunOutcome {
        total: report.total().snapshot(),
        overview: RunOverview {
            sent: report.sent().get(),
            dispatched,
            elapsed,
        },
    })
}
