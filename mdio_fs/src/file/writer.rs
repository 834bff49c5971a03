//! Raw byte writes with parent-directory creation and atomic replace.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes an encoded buffer to disk.
pub trait RawFileWriter: Send + Sync {
    /// Write `bytes` to `path`, creating missing parent directories.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Filesystem writer.
///
/// With `atomic_writes` the buffer goes to a sibling temp file that is
/// renamed over the destination, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct FsWriter {
    pub atomic_writes: bool,
    /// Copy the destination's permissions onto the replacement (Unix only)
    pub preserve_permissions: bool,
    pub temp_suffix: String,
}

impl Default for FsWriter {
    fn default() -> Self {
        FsWriter {
            atomic_writes: true,
            preserve_permissions: true,
            temp_suffix: ".tmp".to_string(),
        }
    }
}

impl RawFileWriter for FsWriter {
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if !self.atomic_writes {
            return write_to_file(path, bytes);
        }

        let temp_path = get_temp_path(path, &self.temp_suffix);
        let result = write_to_file(&temp_path, bytes)
            .and_then(|()| {
                if self.preserve_permissions && path.exists() {
                    preserve_permissions(path, &temp_path)
                } else {
                    Ok(())
                }
            })
            .and_then(|()| fs::rename(&temp_path, path));

        // a partial temp file must not outlive a failed write
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_to_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut writer = io::BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Sibling path used for atomic writes.
fn get_temp_path(original_path: &Path, suffix: &str) -> PathBuf {
    let original_name = original_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");
    original_path.with_file_name(format!("{original_name}{suffix}"))
}

#[cfg(unix)]
fn preserve_permissions(source: &Path, target: &Path) -> io::Result<()> {
    let permissions = fs::metadata(source)?.permissions();
    fs::set_permissions(target, permissions)
}

#[cfg(not(unix))]
fn preserve_permissions(_source: &Path, _target: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/note.md");

        FsWriter::default().write(&path, b"hello").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "old").unwrap();

        FsWriter::default().write(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("note.md.tmp").exists());
    }

    #[test]
    fn test_direct_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        let writer = FsWriter {
            atomic_writes: false,
            ..FsWriter::default()
        };

        writer.write(&path, b"direct").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"direct");
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("script.md");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        FsWriter::default().write(&path, b"new").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[test]
    fn test_write_into_missing_dir_fails_when_parent_is_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = FsWriter::default().write(&blocker.join("note.md"), b"x");
        assert!(err.is_err());
    }

    #[test]
    fn test_failed_atomic_write_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // a non-empty directory cannot be replaced by a file
        let path = dir.path().join("taken.md");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), "").unwrap();

        let err = FsWriter::default().write(&path, b"x");
        assert!(err.is_err());
        assert!(!dir.path().join("taken.md.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_get_temp_path() {
        let temp = get_temp_path(Path::new("/path/to/file.md"), ".tmp");
        assert_eq!(temp, Path::new("/path/to/file.md.tmp"));
    }
}
