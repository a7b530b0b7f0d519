use std::sync::Arc;

use tracing::debug;

use crate::source::RequestSource;

use super::rate::Throttle;
use super::request::{RequestDescriptor, RequestTemplate};

/// Pulls bodies from the source and pushes descriptors onto the job queue
/// until the source is exhausted or `requests` (when non-zero) have been
/// submitted. Dropping the sender on return closes the queue. Returns the
/// number of descriptors submitted.
pub async fn dispatch(
    source: &mut dyn RequestSource,
    template: &Arc<RequestTemplate>,
    queue_tx: flume::Sender<RequestDescriptor>,
    requests: u64,
    rate: u64,
) -> u64 {
    let mut throttle = Throttle::new(rate);
    let mut dispatched: u64 = 0;

    loop {
        if requests > 0 && dispatched >= requests {
            debug!("Request cap of {} reached", requests);
            break;
        }
        let Some(body) = source.next_body().await else {
            debug!("Request source exhausted");
            break;
        };
        if let Some(throttle) = throttle.as_mut() {
            throttle.wait().await;
        }
        if queue_tx.send_async(template.request(body)).await.is_err() {
            debug!("Job queue closed before dispatch finished");
            break;
        }
        dispatched = dispatched.saturating_add(1);
    }

    dispatched
}
