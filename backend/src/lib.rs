pub mod analytics;
pub mod config;
pub mod error;
pub mod fusion;
pub mod model;
pub mod routes;
pub mod service;
pub mod views;
pub mod vision;
