use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Log file under the user cache dir; the terminal belongs to the UI
pub fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("inboxtui/inboxtui.log"))
}

/// Route `log` records to the log file, filtered by `INBOXTUI_LOG`
/// (default `info`). Logging stays off if the file can't be opened.
pub fn init() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::new().filter_or("INBOXTUI_LOG", "info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}
