//! Credential persistence in `credential.toml`.

use crate::paths::NewsdeskPaths;
use crate::storage::AtomicTomlFile;
use newsdesk_core::Result;
use newsdesk_core::credential::CredentialStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialFile {
    token: String,
}

/// [`CredentialStore`] backed by a private TOML file.
///
/// `clear` deletes the file rather than blanking it.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    file: AtomicTomlFile<CredentialFile>,
}

impl FileCredentialStore {
    pub fn new(paths: &NewsdeskPaths) -> Self {
        Self {
            file: AtomicTomlFile::private(paths.credential_file()),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self
            .file
            .load()?
            .map(|stored| stored.token)
            .filter(|token| !token.is_empty()))
    }

    fn set(&self, credential: &str) -> Result<()> {
        self.file.save(&CredentialFile {
            token: credential.to_string(),
        })
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let paths = NewsdeskPaths::from_base(temp_dir.path());
        let store = FileCredentialStore::new(&paths);

        assert_eq!(store.get().unwrap(), None);

        store.set("tok-xyz").unwrap();
        assert_eq!(store.get().unwrap(), Some("tok-xyz".to_string()));

        // A second store over the same directory sees the same credential
        let reopened = FileCredentialStore::new(&paths);
        assert_eq!(reopened.get().unwrap(), Some("tok-xyz".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert!(!paths.credential_file().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_blank_token_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = NewsdeskPaths::from_base(temp_dir.path());
        std::fs::write(paths.credential_file(), "token = \"\"\n").unwrap();

        let store = FileCredentialStore::new(&paths);
        assert_eq!(store.get().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_credential_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let paths = NewsdeskPaths::from_base(temp_dir.path());
        FileCredentialStore::new(&paths).set("tok-xyz").unwrap();

        let mode = std::fs::metadata(paths.credential_file())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
