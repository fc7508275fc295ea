pub mod config;
pub mod data;
pub mod plan;
pub mod status;
pub mod workout;
