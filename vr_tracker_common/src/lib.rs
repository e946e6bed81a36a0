pub mod config;
pub mod device;
pub mod display;
pub mod events;
pub mod pose;
