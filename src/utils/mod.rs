pub mod fs;
pub mod init;
pub mod logger;
pub mod parsers;
pub mod progress;
pub mod queries;
pub mod run_log;
pub mod script_reader;
pub mod time;

pub use fs::{
    ensure_dir, file_matches_object, list_files, modification_times, written_since,
};
pub use progress::ProgressReporter;
pub use queries::{get_query, sql_literal};
pub use run_log::RunLog;
pub use script_reader::{read_script_batches, split_batches};
pub use time::{commit_timestamp, format_duration};
