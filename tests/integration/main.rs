//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one node, or both nodes
//! together, against mock or simulated adapters.  All tests run on the
//! host with no real hardware required.

mod control_node_tests;
mod end_to_end_tests;
mod interaction_node_tests;
mod mock_hw;
