pub mod commands;
pub mod config;
pub mod feed;
pub mod gauge;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod predict;
pub mod session;
pub mod utils;

/// ASCII art logo for the riskdash header
pub const LOGO: &str = "\
   ┬─┐┬┌─┐┬┌─┌┬┐┌─┐┌─┐┬ ┬
   ├┬┘│└─┐├┴┐ ││├─┤└─┐├─┤
   ┴└─┴└─┘┴ ┴─┴┘┴ ┴└─┘┴ ┴";
