mod adapter;
mod args;
pub mod ddl;

pub use adapter::ScriptingAdapter;
pub use args::{ScriptOptions, build_args, single_file_name};
