//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the bridge against mock
//! adapters. No simulation host or serial hardware is required.

mod bridge_tests;
mod mock_sim;
