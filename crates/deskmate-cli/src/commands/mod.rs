pub mod config;
pub mod overtime;
pub mod quiz;
