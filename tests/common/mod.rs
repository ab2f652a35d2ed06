//! Common test utilities for riskmap.
//!
//! This module provides shared utilities for testing the plotting functions.

// Re-export all common test utilities
pub mod assertions;
pub mod image_utils;
pub mod test_data;
