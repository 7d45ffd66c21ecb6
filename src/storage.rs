// Document store and low-level file helpers.
//
// The vault is a plain directory of Markdown notes. Notes are replaced
// atomically (temp file + rename) so an editor never sees a half-written
// file, but no lock is held between reading a note and writing it back: an
// edit that lands in between is overwritten.
use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Host document store, addressed by vault-relative `/`-separated paths.
pub trait DocumentStore: Send + Sync {
    /// Returns `Ok(None)` when the document does not exist.
    fn read(&self, path: &str) -> Result<Option<String>>;
    /// Creates or replaces the document.
    fn write(&self, path: &str, contents: &str) -> Result<()>;
    /// Creates a directory. Succeeds if it already exists.
    fn create_dir(&self, path: &str) -> Result<()>;
}

/// A vault rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault-relative path.
    pub fn full_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

impl DocumentStore for VaultStore {
    fn read(&self, path: &str) -> Result<Option<String>> {
        let full = self.full_path(path);
        match fs::read_to_string(&full) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::store_io(full, e)),
        }
    }

    fn write(&self, path: &str, contents: &str) -> Result<()> {
        let full = self.full_path(path);
        LocalStorage::atomic_write(&full, contents).map_err(|e| Error::store_io(&full, e))
    }

    fn create_dir(&self, path: &str) -> Result<()> {
        let full = self.full_path(path);
        match fs::create_dir(&full) {
            Ok(()) => {
                log::debug!("Created directory {}", full.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists && full.is_dir() => Ok(()),
            Err(e) => Err(Error::store_io(full, e)),
        }
    }
}

pub struct LocalStorage;

impl LocalStorage {
    /// `<name><suffix>` next to `path`, e.g. `config.toml.lock`.
    fn sidecar(path: &Path, suffix: &str) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        path.with_file_name(name)
    }

    /// Runs `f` while holding an exclusive advisory lock on a sidecar file.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> anyhow::Result<T>
    where
        F: FnOnce() -> anyhow::Result<T>,
    {
        let lock = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(Self::sidecar(file_path, ".lock"))?;

        lock.lock_exclusive()?;
        let result = f();
        lock.unlock()?;
        result
    }

    /// Writes to `<name>.tmp` next to the target, then renames over it.
    /// The staged file is removed again if either step fails.
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
        path: P,
        contents: C,
    ) -> std::io::Result<()> {
        let path = path.as_ref();
        let staged = Self::sidecar(path, ".tmp");
        let result = fs::write(&staged, contents).and_then(|()| fs::rename(&staged, path));
        if result.is_err() {
            let _ = fs::remove_file(&staged);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppContext, TestContext};

    #[test]
    fn test_read_missing_document_is_none() {
        let ctx = TestContext::new();
        let store = VaultStore::new(ctx.get_vault_dir().unwrap());
        assert_eq!(store.read("Nope.md").unwrap(), None);
    }

    #[test]
    fn test_write_replaces_and_leaves_no_temp_file() {
        let ctx = TestContext::new();
        let store = VaultStore::new(ctx.get_vault_dir().unwrap());

        store.write("Prayer Times.md", "first").unwrap();
        store.write("Prayer Times.md", "second").unwrap();

        assert_eq!(
            store.read("Prayer Times.md").unwrap().as_deref(),
            Some("second")
        );
        assert!(!store.full_path("Prayer Times.md.tmp").exists());
    }

    #[test]
    fn test_failed_write_removes_staged_file() {
        let ctx = TestContext::new();
        let store = VaultStore::new(ctx.get_vault_dir().unwrap());
        store.create_dir("Taken.md").unwrap();

        let result = store.write("Taken.md", "cannot replace a directory");

        assert!(matches!(result, Err(Error::StoreIo { .. })));
        assert!(store.full_path("Taken.md").is_dir());
        assert!(!store.full_path("Taken.md.tmp").exists());
    }

    #[test]
    fn test_create_dir_is_idempotent() {
        let ctx = TestContext::new();
        let store = VaultStore::new(ctx.get_vault_dir().unwrap());

        store.create_dir("Notes").unwrap();
        store.create_dir("Notes").unwrap();
        store.create_dir("Notes/2026").unwrap();
        assert!(store.full_path("Notes/2026").is_dir());
    }

    #[test]
    fn test_create_dir_over_file_fails() {
        let ctx = TestContext::new();
        let store = VaultStore::new(ctx.get_vault_dir().unwrap());

        store.write("Notes", "not a directory").unwrap();
        assert!(matches!(
            store.create_dir("Notes"),
            Err(Error::StoreIo { .. })
        ));
    }

    #[test]
    fn test_with_lock_returns_closure_result() {
        let ctx = TestContext::new();
        let target = ctx.root.join("config.toml");
        let value = LocalStorage::with_lock(&target, || Ok(42)).unwrap();
        assert_eq!(value, 42);
    }
}
