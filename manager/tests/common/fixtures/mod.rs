//! This module provides reusable test utilities:
//! - In-memory inventory service that records every call
//! - Mock HTTP inventory server
//! - Test configuration builder
//! - Common test data

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_inventory;
pub mod test_config;
pub mod test_data;

// Re-export commonly used items
pub use fake_inventory::{FakeInventory, InventoryCall};
pub use mock_inventory::MockInventoryServer;
pub use test_config::TestConfigBuilder;
pub use test_data::*;
