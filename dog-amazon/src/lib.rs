//! Dog Amazon: a listing page and a CRUD walkthrough over the `dogs` collection.
//!
//! - [`model`] - the `Dog` document and its constraints
//! - [`web`] - the `GET /` handler
//! - [`views`] - HTML for the listing and error pages
//! - [`crud`] - the ten-step create/read/update/delete script
//! - [`config`] - command-line and environment configuration
//! - [`telemetry`] - tracing setup shared by the binaries

pub mod config;
pub mod crud;
pub mod model;
pub mod telemetry;
pub mod views;
pub mod web;
