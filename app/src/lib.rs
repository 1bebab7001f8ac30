//! Elevation Tracker application library
//!
//! Exposes the storage, repositories, and services behind the
//! `elevation-tracker` command so integration tests can drive them directly.

pub mod config;
pub mod error;
pub mod repositories;
pub mod services;
pub mod state;
pub mod store;
