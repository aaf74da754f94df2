pub mod config;
pub mod dashboard;
pub mod errors;
pub mod message;
