//! Test utilities for co-pilot tests.
//!
//! Mock drivers and agents that script replies, count calls, and can hold a
//! call open until the test releases it.

pub mod mock_agent;
pub mod mock_driver;

#[allow(unused_imports)]
pub use mock_agent::{MockAgent, MockReply, RecordedTurn};
#[allow(unused_imports)]
pub use mock_driver::{MockDriver, MockResponse};
