//! Client entry point for the Discovery Engine answer API.
//!
//! Provides `DiscoveryEngineClient` with a builder, a lazily built answer
//! service, and factory functions.

mod builder;
mod client;

pub use builder::DiscoveryEngineClientBuilder;
pub use client::{create_client, create_client_from_env, DiscoveryEngineClient};
