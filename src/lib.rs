pub mod cli;
pub mod config;
pub mod db;
pub mod delta;
pub mod errors;
pub mod oracle;
pub mod process;
pub mod scripting;
pub mod services;
pub mod types;
pub mod utils;
pub mod vcs;
