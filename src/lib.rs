pub mod configuration;
pub mod dao;
pub mod error;
pub mod handler;
pub mod helpers;
pub mod model;
pub mod provider;
pub mod push;
pub mod scheduler;
pub mod types;
