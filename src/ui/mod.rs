//! UI module - contains UI rendering components
//!
//! Panel layout lives in main.rs; this module holds the reusable widgets.

pub mod components;
