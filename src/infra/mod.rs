//! Concrete ping and view sources.

pub mod csv_source;
pub mod postgrest;
