// Application layer - Evaluation cycle, outbox and the ports it depends on
pub mod accumulator;
pub mod errors;
pub mod evaluation_service;
pub mod outbox;
pub mod repository;
pub mod scheduler;
