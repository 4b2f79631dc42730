// Presentation layer - Status endpoint for daemon mode
pub mod app_state;
pub mod handlers;
