pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod coverage;
pub mod fixture;
pub mod output;
pub mod roi;
pub mod server;
pub mod types;
