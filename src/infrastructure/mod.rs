// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod grafana_repository;
pub mod graphite_repository;
pub mod http_client;
pub mod logging;
pub mod redis_sink;
