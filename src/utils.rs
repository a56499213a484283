//! File-system and string helpers shared by the persisted stores.
//!
//! - Atomic JSON persistence (write to a sibling temp file, then rename)
//! - Truncation of long strings for log fields

use crate::error::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, instrument};

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// The data is written to `<path>.tmp` first and then renamed over the
/// target, so readers (and a crash mid-write) only ever see the old or the
/// new file, never a torn one. Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if serialization fails, or if the directory, temp file,
/// or rename cannot be written.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, &json).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    debug!(bytes = json.len(), "Persisted JSON");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a byte
/// count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        assert_eq!(truncate_for_log("äöü", 2), "äö…(+2 bytes)");
    }

    #[test]
    fn test_temp_path_is_sibling() {
        assert_eq!(
            temp_path(Path::new("/data/sources.json")),
            PathBuf::from("/data/sources.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_write_json_atomic_creates_dirs_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_json_atomic(&path, &vec![1, 2, 3]).await.unwrap();
        write_json_atomic(&path, &vec![4]).await.unwrap();

        let back: Vec<i32> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec![4]);
        assert!(!temp_path(&path).exists());
    }
}
