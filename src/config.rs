use std::path::PathBuf;

#[cfg(not(target_os = "windows"))]
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(target_os = "windows")]
fn home_dir() -> Option<PathBuf> {
    std::env::var("USERPROFILE").ok().map(PathBuf::from)
}

fn data_dir() -> Option<PathBuf> {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
}

/// `$XDG_DATA_HOME/namedlog/logs`, or a directory under the system temp dir
/// when no home is known.
pub fn default_log_dir() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("namedlog").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("namedlog"))
}
