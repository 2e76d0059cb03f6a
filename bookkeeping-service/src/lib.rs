pub mod aggregation;
pub mod config;
pub mod dtos;
pub mod export;
pub mod handlers;
pub mod models;
pub mod overrides;
pub mod period;
pub mod services;
pub mod startup;
