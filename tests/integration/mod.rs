//! Integration tests for lifeguard-translate
//!
//! Everything here goes through the public API only, against the shop model
//! in [`fixtures`].

mod commands;
mod configuration;
mod fixtures;
mod projections;
mod values;
