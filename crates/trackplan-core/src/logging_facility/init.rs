//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at startup; later calls are no-ops. `RUST_LOG` overrides the
/// profile's default filter.
///
/// # Profiles
///
/// - **Development**: Human-readable logs on stderr with debug level
/// - **Production**: JSON structured logs on stderr with info level
/// - **Test**: Capture mode for test assertions
///
/// # Example
///
/// ```
/// use trackplan_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("trackplan=debug")),
                    )
                    .init();
            }
            Profile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("trackplan=info")),
                    )
                    .init();
            }
            Profile::Test => {
                // Capture layer is installed by init_test_capture()
                tracing_subscriber::registry().init();
            }
        }
    });
}
