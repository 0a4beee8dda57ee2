pub mod config;
pub mod customize;
pub mod error;
pub mod hook;
pub mod layout;
pub mod patch;
pub mod record;
pub mod scaling;
pub mod service;
