// cloudidp: provider-aware navigation shell for a multi-cloud dashboard

pub mod config;
pub mod engine;
pub mod logging;
pub mod ui;
