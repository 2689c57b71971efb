use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{WorkspaceError, WorkspaceResult};

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> WorkspaceResult<()> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');
    write_bytes_atomic(path, &data)
}

/// Write through a sibling `.tmp` file and rename, so readers never see a
/// partially written file.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> WorkspaceResult<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    std::fs::rename(&tmp_path, path)?;
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> WorkspaceResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| WorkspaceError::Invalid(format!("not a file path: {}", path.display())))?;
    let tmp_name = format!("{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file_and_leaves_no_temp() {
        let dir = std::env::temp_dir().join(format!("synthtab_atomic_{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("out.json");

        write_json_atomic(&path, &serde_json::json!({ "a": 1 })).expect("first write");
        write_bytes_atomic(&path, b"second").expect("second write");

        assert_eq!(std::fs::read(&path).expect("read back"), b"second");
        assert!(!path.with_file_name("out.json.tmp").exists());
    }

    #[test]
    fn directory_like_path_is_rejected() {
        let err = write_bytes_atomic(Path::new("/"), b"x").unwrap_err();
        assert!(matches!(err, WorkspaceError::Invalid(_)));
    }
}
