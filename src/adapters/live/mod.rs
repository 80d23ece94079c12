//! Live adapters that talk to real HTTP endpoints.

pub mod avatar;
pub mod github;
