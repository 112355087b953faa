//! Process-wide configuration lives in a `OnceLock`, so it gets its own test
//! binary.

use moxi_events::config::{self, PlatformConfig};
use moxi_events::{ApiError, EventService};

#[test]
fn default_config_is_installed_once() {
    let config = PlatformConfig::new("partner", "secret").with_base_url("http://localhost:3000");
    config::set_default(config.clone()).unwrap();

    assert_eq!(config::default_config().unwrap(), &config);

    let err = config::set_default(PlatformConfig::new("other", "secret")).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
    assert_eq!(config::default_config().unwrap().platform_identifier, "partner");

    let service = EventService::from_default_config().unwrap();
    let request = service.client().build_find_event("a1", "e1").unwrap();
    assert!(request.path.starts_with("http://localhost:3000/api/events/e1"));
}
