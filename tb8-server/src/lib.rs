//! Transit query server.
//!
//! Loads the London transit tables once at startup and serves them, along
//! with live TfL data, over a read-only JSON API.

pub mod config;
pub mod dataset;
pub mod startup;
pub mod tfl;
pub mod validate;
pub mod web;
