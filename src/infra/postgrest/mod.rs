//! PostgREST-backed ping and view sources.
//!
//! [`RestConfig`] reads connection settings from the environment.
//! [`RestClient`] implements both [`PingSource`](crate::services::sources::PingSource)
//! and [`ViewSource`](crate::services::sources::ViewSource).

mod client;
mod config;

pub use client::RestClient;
pub use config::RestConfig;
