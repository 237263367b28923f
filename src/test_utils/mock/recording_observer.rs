use async_trait::async_trait;
use parking_lot::Mutex;

use crate::AggregateView;
use crate::ErrorDetails;
use crate::Observer;
use crate::Result;

/// Keeps every delivery it receives, in order.
#[derive(Default)]
pub struct RecordingObserver {
    deliveries: Mutex<Vec<(AggregateView, Option<ErrorDetails>)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.deliveries.lock().len()
    }

    pub fn last_view(&self) -> Option<AggregateView> {
        self.deliveries.lock().last().map(|(view, _)| view.clone())
    }

    pub fn last_error(&self) -> Option<ErrorDetails> {
        self.deliveries.lock().last().and_then(|(_, error)| error.clone())
    }
}

#[async_trait]
impl Observer for RecordingObserver {
    async fn on_data_changed(
        &self,
        view: &AggregateView,
        error: Option<ErrorDetails>,
    ) -> Result<()> {
        self.deliveries.lock().push((view.clone(), error));
        Ok(())
    }
}
