//! File logging for the dashboard. The terminal belongs to the UI, so log
//! records never go to stdout or stderr while it runs.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

const LOG_FILE_NAME: &str = "newsdash-tui.log";

/// `<cache dir>/newsdash/newsdash-tui.log`, or the working directory when the
/// platform has no cache directory.
pub fn default_log_path() -> PathBuf {
    match dirs::cache_dir() {
        Some(dir) => dir.join("newsdash").join(LOG_FILE_NAME),
        None => PathBuf::from(LOG_FILE_NAME),
    }
}

/// Install the file logger. Failing to create the file only disables logging.
pub fn initialize(path: &Path, level: LevelFilter) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    match File::create(path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, build_config(), file);
        }
        Err(err) => {
            eprintln!("Warning: could not create log file {}: {err}", path.display());
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("newsdash")
        .build()
}
