//! Collaborator interfaces the analysis engine consumes.

pub mod sources;
