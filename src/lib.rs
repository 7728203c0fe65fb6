pub mod actions;
pub mod api_connection;
pub mod biomarkers;
pub mod cli;
pub mod config;
pub mod logging;
pub mod numeric;
pub mod plan;
pub mod session;
pub mod shopping;
pub mod storage;
pub mod wizard;
