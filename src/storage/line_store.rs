//! Raw line-oriented file access.
//!
//! The store has no knowledge of headers or rows. It reads a file as a
//! sequence of trimmed, non-blank lines and writes whole payloads back.

use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write},
    path::Path,
};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::common::error::{Result, StoreError};

/// How [`LineStore::write_text`] opens its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the whole file. The previous contents stay intact until the
    /// full payload has been written.
    Truncate,
    /// Add to the end of an existing file, never truncating.
    Append,
    /// Create a new file; fails if one already exists.
    CreateNew,
}

/// File access used by the engine.
///
/// Implementations assume one caller per path at a time.
pub trait LineStore {
    /// Reads a file as trimmed, non-blank lines. A missing file is
    /// [`StoreError::NotFound`].
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;

    /// Writes `text` followed by a newline.
    fn write_text(&self, path: &Path, text: &str, mode: WriteMode) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Deletes a file. A missing file is [`StoreError::NotFound`].
    fn delete(&self, path: &Path) -> Result<()>;
}

/// Strips surrounding whitespace but keeps tabs, which separate values, so
/// a trailing empty value survives the round trip.
pub(crate) fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() && c != '\t')
}

/// A line is blank when it holds nothing but whitespace.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// [`LineStore`] backed by the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileLineStore {
    sync_writes: bool,
}

impl FileLineStore {
    pub fn new(sync_writes: bool) -> Self {
        Self { sync_writes }
    }

    /// Writes to an anonymous temp file in the same directory, then renames
    /// it over `path`. The temp name is created exclusively, so it never
    /// clobbers another table.
    fn replace(&self, path: &Path, payload: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(payload)?;
        if self.sync_writes {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(path).map_err(|err| StoreError::Io(err.error))?;

        if self.sync_writes {
            if let Ok(dir) = File::open(dir) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    /// Appends `payload`, first terminating a last line that lacks its `\n`.
    fn append(&self, path: &Path, payload: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
                _ => StoreError::Io(err),
            })?;

        if file.metadata()?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }

        file.write_all(payload.as_bytes())?;
        if self.sync_writes {
            file.sync_data()?;
        }
        Ok(())
    }
}

impl LineStore for FileLineStore {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
            _ => StoreError::Io(err),
        })?;

        let mut lines = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if is_blank(&line) {
                continue;
            }
            lines.push(trim_line(&line).to_owned());
        }

        debug!(path = %path.display(), lines = lines.len(), "read table file");
        Ok(lines)
    }

    fn write_text(&self, path: &Path, text: &str, mode: WriteMode) -> Result<()> {
        let mut payload = String::with_capacity(text.len() + 1);
        payload.push_str(text);
        payload.push('\n');

        match mode {
            WriteMode::Truncate => self.replace(path, payload.as_bytes())?,
            WriteMode::Append => self.append(path, &payload)?,
            WriteMode::CreateNew => {
                let mut file = OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(path)
                    .map_err(|err| match err.kind() {
                        ErrorKind::AlreadyExists => {
                            StoreError::AlreadyExists(path.display().to_string())
                        }
                        _ => StoreError::Io(err),
                    })?;
                file.write_all(payload.as_bytes())?;
                if self.sync_writes {
                    file.sync_all()?;
                }
            }
        }

        debug!(path = %path.display(), bytes = payload.len(), ?mode, "wrote table file");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
            _ => StoreError::Io(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_read_skips_blank_lines_and_trims() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "fields\ta,b\n\n   \n 1\t2 \r\n3\t\n").unwrap();

        let lines = FileLineStore::default().read_lines(&path).unwrap();
        assert_eq!(lines, vec!["fields\ta,b", "1\t2", "3\t"]);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = FileLineStore::default().read_lines(&dir.path().join("missing"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_truncate_replaces_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "old contents\n").unwrap();

        let store = FileLineStore::new(true);
        store.write_text(&path, "new", WriteMode::Truncate).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec!["t"]);
    }

    #[test]
    fn test_truncate_leaves_similarly_named_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users");
        let sibling = dir.path().join("users.tmp");
        fs::write(&path, "old\n").unwrap();
        fs::write(&sibling, "fields\tid\n1\n").unwrap();

        FileLineStore::default()
            .write_text(&path, "new", WriteMode::Truncate)
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(&sibling).unwrap(), "fields\tid\n1\n");
    }

    #[test]
    fn test_append_terminates_unfinished_last_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t");
        fs::write(&path, "fields\tid\n1").unwrap();

        FileLineStore::default()
            .write_text(&path, "2", WriteMode::Append)
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "fields\tid\n1\n2\n");
    }

    #[test]
    fn test_append_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t");
        let store = FileLineStore::default();

        let result = store.write_text(&path, "x", WriteMode::Append);
        assert!(matches!(result, Err(StoreError::NotFound(_))));

        fs::write(&path, "a\n").unwrap();
        store.write_text(&path, "b", WriteMode::Append).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_create_new_and_delete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t");
        let store = FileLineStore::default();

        store.write_text(&path, "a", WriteMode::CreateNew).unwrap();
        assert!(store.exists(&path));

        let again = store.write_text(&path, "a", WriteMode::CreateNew);
        assert!(matches!(again, Err(StoreError::AlreadyExists(_))));

        store.delete(&path).unwrap();
        assert!(!store.exists(&path));
        assert!(matches!(store.delete(&path), Err(StoreError::NotFound(_))));
    }
}
