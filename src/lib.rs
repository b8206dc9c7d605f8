/// Engagement Service Library
///
/// Data layer for subscription relationships and video engagement state:
/// the subscription toggle, the publish-visibility gate, the
/// watch-history recorder, and the read-time engagement aggregator.
///
/// # Modules
///
/// - `config`: Configuration management
/// - `domain`: Entity and aggregate view types
/// - `error`: Error taxonomy and HTTP boundary mapping
/// - `repository`: Database access layer
/// - `services`: Business logic layer
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod services;
