//! Core library for the `weathr` CLI.
//!
//! This crate defines:
//! - Run configuration, layered settings and the API credential
//! - The OpenWeatherMap forecast client and its transport seam
//! - Rendering a forecast as raw JSON or a short summary
//!
//! It is used by `weathr-cli`, but can also be reused by other binaries.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod transport;

pub use client::ForecastClient;
pub use config::{Config, Credential, OutputFormat, Settings, Units, unit_letter};
pub use error::{Result, WeathrError};
pub use model::{City, ForecastEntry, ForecastResponse};
pub use render::render;
pub use reqwest::StatusCode;
pub use transport::{HttpReply, ReqwestTransport, Transport};
