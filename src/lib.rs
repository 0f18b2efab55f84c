// HTTP server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

// Relay core
pub mod config;
pub mod error;
pub mod persona;
pub mod relay;
pub mod telemetry;

// Outbound clients
pub mod llm;
pub mod whatsapp;
