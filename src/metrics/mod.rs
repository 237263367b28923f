//! Process wide counters of the hub.
//!
//! Metrics are plain prometheus collectors; embedders decide where they are
//! exposed by registering them into their own [`Registry`] with
//! [`register_custom_metrics`], or by scraping [`gather_text`].

use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::error;

lazy_static! {
    pub static ref REPORTS_RECEIVED: IntCounterVec = IntCounterVec::new(
        Opts::new("reports_received", "Reports accepted from safety sources"),
        &["source_id"]
    )
    .expect("metric can not be created");

    pub static ref OBSERVER_DELIVERY_FAILURES: IntCounter = IntCounter::new(
        "observer_delivery_failures",
        "Observer notifications that failed or timed out"
    )
    .expect("metric can not be created");

    pub static ref DISPATCH_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("dispatch_failures", "Outbound calls that failed or timed out"),
        &["kind"]
    )
    .expect("metric can not be created");

    pub static ref ISSUES_DISMISSED: IntCounter =
        IntCounter::new("issues_dismissed", "Issues dismissed by the user")
            .expect("metric can not be created");

    pub static ref ACTIONS_IN_FLIGHT: IntGauge =
        IntGauge::new("actions_in_flight", "Resolving actions awaiting their source")
            .expect("metric can not be created");

    pub static ref REGISTRY: Registry = {
        let registry = Registry::new_custom(Some("safety_broker".to_string()), None)
            .expect("registry can be created");
        register_custom_metrics(&registry).expect("collector can be registered");
        registry
    };
}

/// Registers every hub collector into `registry`.
pub fn register_custom_metrics(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(REPORTS_RECEIVED.clone()))?;
    registry.register(Box::new(OBSERVER_DELIVERY_FAILURES.clone()))?;
    registry.register(Box::new(DISPATCH_FAILURES.clone()))?;
    registry.register(Box::new(ISSUES_DISMISSED.clone()))?;
    registry.register(Box::new(ACTIONS_IN_FLIGHT.clone()))?;
    Ok(())
}

/// Text exposition of the crate's default [`REGISTRY`]
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
        return String::default();
    }
    String::from_utf8(buffer).unwrap_or_else(|e| {
        error!("custom metrics could not be from_utf8'd: {}", e);
        String::default()
    })
}
