pub mod analyze;
pub mod config_cmd;
pub mod dashboard;
pub mod sample;
