use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use async_trait::async_trait;

use crate::AggregateView;
use crate::ErrorDetails;
use crate::Result;

/// Receiver of aggregate updates for one profile group.
///
/// Implementations sit on the far side of a transport. An observer that is
/// gone should answer with [`crate::DispatchError::Disconnected`]; the hub
/// logs it and keeps serving the others.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Observer: Send + Sync + 'static {
    async fn on_data_changed(
        &self,
        view: &AggregateView,
        error: Option<ErrorDetails>,
    ) -> Result<()>;
}

/// Observers are compared by the allocation they live in, not by value.
pub(crate) fn same_observer(
    a: &Arc<dyn Observer>,
    b: &Arc<dyn Observer>,
) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
