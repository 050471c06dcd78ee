//! Atomic TOML file operations.
//!
//! Writes go through a temporary file in the same directory, are fsynced and
//! then renamed over the target, so a reader never sees a half-written file.

use newsdesk_core::{NewsdeskError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to a TOML file holding one `T`.
///
/// Provides:
/// - **Atomicity**: saves are all-or-nothing via tmp file + rename
/// - **Isolation**: [`Self::update`] holds an exclusive lock for read-modify-write
/// - **Durability**: explicit fsync before rename
/// - **Privacy**: files opened with [`Self::private`] are created with mode `0600` on Unix
#[derive(Debug, Clone)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    private: bool,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            private: false,
            _phantom: PhantomData,
        }
    }

    /// Like [`Self::new`], for files only the current user may read.
    pub fn private(path: PathBuf) -> Self {
        Self {
            private: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data to the file atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = self.create_file(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("[AtomicTomlFile] Saved {}", self.path.display());

        Ok(())
    }

    /// Performs a locked read-modify-write.
    ///
    /// `f` receives the current value (or `default_value` if the file is
    /// missing). The result is written back only if `f` returns `Ok`.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)?;

        Ok(data)
    }

    /// Deletes the file. Removing a missing file succeeds.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn create_file(&self, path: &Path) -> Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        #[cfg(unix)]
        if self.private {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        Ok(options.open(path)?)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| NewsdeskError::storage("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// Exclusive lock on a sibling `.lock` file, released on drop.
struct FileLock {
    _file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| NewsdeskError::storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(Self {
            _file: file,
            lock_path,
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // best effort; the lock itself is released with the handle
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("nested/counter.toml"));
        let counter = Counter {
            name: "sends".to_string(),
            count: 42,
        };

        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
        assert!(!temp_dir.path().join("nested/.counter.toml.tmp").exists());
    }

    #[test]
    fn test_load_missing_or_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        assert_eq!(file.load().unwrap(), None);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_load_corrupt_file_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        fs::write(&path, "name = ").unwrap();

        let err = AtomicTomlFile::<Counter>::new(path).load().unwrap_err();

        assert!(err.is_serialization());
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));
        let default_counter = Counter {
            name: "sends".to_string(),
            count: 0,
        };

        file.update(default_counter.clone(), |c| {
            c.count += 10;
            Ok(())
        })
        .unwrap();
        let updated = file
            .update(default_counter.clone(), |c| {
                c.count += 5;
                Ok(())
            })
            .unwrap();

        assert_eq!(updated.count, 15);
        assert_eq!(file.load().unwrap().unwrap().count, 15);
        assert!(!temp_dir.path().join("counter.lock").exists());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));
        let default_counter = Counter {
            name: "sends".to_string(),
            count: 0,
        };

        let result = file.update(default_counter, |c| {
            c.count = 99;
            Err(NewsdeskError::config("rejected"))
        });

        assert!(result.is_err());
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));
        file.save(&Counter {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        file.remove().unwrap();
        file.remove().unwrap();

        assert!(!file.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_private_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::private(temp_dir.path().join("secret.toml"));
        file.save(&Counter {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        let mode = fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
