use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let root = config::storage_root();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Generate a stored attachment filename that cannot collide with any other
/// upload: `{prefix}_{submission_id}_{unix_time}_{token}.{ext}`.
///
/// Uniqueness comes from the random token, independent of the original
/// filename, so concurrent uploads never overwrite each other.
pub fn chat_attachment_name(prefix: &str, submission_id: i64, ext: &str) -> String {
    let ts = chrono::Utc::now().timestamp();
    let token = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{submission_id}_{ts}_{token}.{ext}")
}
