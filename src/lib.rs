//! SheSafe monitor - polling client for the SheSafe safety-detection backend
//!
//! This library keeps a local view of the backend's remote state (alerts,
//! headcount, gesture detection, health) fresh by polling each resource on
//! a fixed interval, and exposes the `{data, loading, error}` state views
//! render from.

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod poll;
pub mod view;
