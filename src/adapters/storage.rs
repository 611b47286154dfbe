use crate::domain::ports::RecordStorage;
use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for FileStorage {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, contents: &str) -> io::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        // 先寫入同目錄的暫存檔，再以 rename 覆蓋，避免寫到一半留下殘缺檔案
        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// In-process storage. Clones share the same buffer, so a handle kept
/// outside the store can observe what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.state.borrow_mut().contents = Some(contents.into());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.state.borrow().contents.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state.borrow().writes
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl RecordStorage for MemoryStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.state.borrow().contents.clone())
    }

    fn save(&self, contents: &str) -> io::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory storage is read-only",
            ));
        }
        state.contents = Some(contents.to_string());
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("reservation_history.txt"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("history.txt");
        let storage = FileStorage::new(&path);

        storage.save("first line\nsecond line\n").unwrap();
        storage.save("only line\n").unwrap();

        assert_eq!(storage.load().unwrap().as_deref(), Some("only line\n"));

        // rename 之後不應留下暫存檔
        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_memory_storage_shares_state_between_clones() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();

        storage.save("Ann B Lee 555-1000 5\n").unwrap();
        assert_eq!(observer.write_count(), 1);
        assert_eq!(observer.contents().as_deref(), Some("Ann B Lee 555-1000 5\n"));

        observer.set_fail_writes(true);
        assert!(storage.save("anything").is_err());
        assert_eq!(observer.write_count(), 1);
    }
}
