//! Chart builder tests
//!
//! Tests for:
//! - Age/gender reference overlay
//! - Glucose trace with meals and sleep
//! - Ambulatory glucose profile

pub mod agp_tests;
pub mod cgm_tests;
pub mod reference_tests;
