use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::trace;
use tracing::warn;

use super::Observer;
use crate::metrics::OBSERVER_DELIVERY_FAILURES;
use crate::utils::async_task::call_with_timeout;
use crate::AggregateView;
use crate::ErrorDetails;

/// Pushes `view` to every observer concurrently.
///
/// Each delivery is bounded by `timeout` and isolated from the others: a
/// slow, failing or disconnected observer is logged and counted, never
/// propagated. Returns the number of successful deliveries.
pub async fn deliver(
    observers: &[Arc<dyn Observer>],
    view: &AggregateView,
    error: Option<&ErrorDetails>,
    timeout: Duration,
) -> usize {
    if observers.is_empty() {
        return 0;
    }

    let deliveries = observers.iter().enumerate().map(|(index, observer)| async move {
        let target = format!("observer#{index}");
        let result = call_with_timeout(&target, timeout, observer.on_data_changed(view, error.cloned())).await;
        if let Err(e) = &result {
            warn!(%target, error = %e, "failed to deliver safety data");
            OBSERVER_DELIVERY_FAILURES.inc();
        }
        result.is_ok()
    });

    let delivered = join_all(deliveries).await.into_iter().filter(|ok| *ok).count();
    trace!(delivered, total = observers.len(), "delivered aggregate view");
    delivered
}
