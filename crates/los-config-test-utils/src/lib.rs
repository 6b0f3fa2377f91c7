//! Testing utilities for the LOS configuration core.
//!
//! Record and flow builders, YAML flow fixtures and a tracing setup for tests.

pub mod builders;
pub mod fixtures;

pub use builders::{
    active_record, create_test_flow, create_test_record, RecordBuilder, FlowBuilder,
};
pub use fixtures::{screen_ids_of, standard_screen_registry};

/// Initialize tracing for tests with a default configuration
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("los_config_core=debug,los_config_store_inmemory=debug")
        .with_test_writer()
        .try_init();
}
