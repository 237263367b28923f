use std::sync::Arc;

use serial_test::serial;

use super::*;
use crate::test_utils::*;
use crate::MockDispatchSink;
use crate::MockSourceBroadcaster;
use crate::StaticProfileGroups;

fn builder() -> SafetyHubBuilder {
    SafetyHubBuilder::new(
        Arc::new(StaticProfileGroups::new([primary_group()])),
        Arc::new(MockSourceBroadcaster::new()),
        Arc::new(MockDispatchSink::new()),
    )
}

#[test]
#[serial]
fn build_should_use_default_settings() {
    let hub = builder().build();

    assert_eq!(hub.settings().broadcast.source_timeout_in_ms, 5000);
    assert_eq!(hub.settings().delivery.observer_timeout_in_ms, 1000);
    // enabled, but nothing to serve until a config is loaded
    assert!(!hub.is_enabled());
    assert!(hub.start(&test_config()));
    assert!(hub.is_enabled());
}

#[test]
#[serial]
fn disabled_builder_should_produce_disabled_hub() {
    let hub = builder().enabled(false).build();
    hub.start(&test_config());

    assert!(!hub.is_enabled());
}

#[test]
#[serial]
fn load_settings_should_apply_override_file_and_env() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("hub.toml");
    std::fs::write(&config_path, "[broadcast]\nsource_timeout_in_ms = 250\n").unwrap();
    let path = config_path.to_str().unwrap().to_string();

    temp_env::with_vars(
        vec![
            ("SAFETY_BROKER__DELIVERY__OBSERVER_TIMEOUT_IN_MS", Some("42")),
            ("CONFIG_PATH", None::<&str>),
        ],
        || {
            let hub = builder().load_settings(Some(&path)).unwrap().build();

            assert_eq!(hub.settings().broadcast.source_timeout_in_ms, 250);
            assert_eq!(hub.settings().delivery.observer_timeout_in_ms, 42);
        },
    );
}

#[test]
#[serial]
fn load_settings_should_reject_invalid_values() {
    temp_env::with_vars(
        vec![("SAFETY_BROKER__BROADCAST__SOURCE_TIMEOUT_IN_MS", Some("0"))],
        || {
            assert!(builder().load_settings(None).is_err());
        },
    );
}
