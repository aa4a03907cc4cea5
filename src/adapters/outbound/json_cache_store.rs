//! JSON File Cache Store
//!
//! Implements CacheStore as a single JSON object file mapping each address
//! to a `[latitude, longitude]` pair.

use crate::domain::entities::HopAddress;
use crate::domain::errors::CacheError;
use crate::domain::ports::{CacheEntries, CacheStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "ip_cache.json";

/// Mode for a cache file that did not exist before (`rw-r--r--`).
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// File-backed cache store.
///
/// A missing, unreadable or incompatible file loads as empty (with a
/// warning for the latter two) and is replaced by the next save. Saves go
/// through a temporary file in the same directory and a rename, so a crash
/// mid-write leaves the previous file intact.
pub struct JsonCacheStore {
    path: PathBuf,
    failures_path: PathBuf,
}

impl JsonCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let failures_path = path.with_extension("failed.json");
        Self {
            path,
            failures_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file holding addresses that failed on earlier runs.
    pub fn failures_path(&self) -> &Path {
        &self.failures_path
    }

    fn read_json<T: DeserializeOwned + Default>(path: &Path) -> T {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no cache file at {}, starting empty", path.display());
                return T::default();
            }
            Err(e) => {
                tracing::warn!(
                    "cannot read cache file {}: {}; starting empty",
                    path.display(),
                    e
                );
                return T::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "ignoring incompatible cache file {}: {}",
                    path.display(),
                    e
                );
                T::default()
            }
        }
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, value)?;
            writer.flush().map_err(io_err)?;
        }

        // temp files are owner-only; keep what the replaced file had
        let permissions = match fs::metadata(path) {
            Ok(meta) => tmp.as_file().set_permissions(meta.permissions()),
            Err(_) => set_new_file_permissions(tmp.as_file()),
        };
        permissions.map_err(io_err)?;

        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

#[cfg(unix)]
fn set_new_file_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

impl Default for JsonCacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PATH)
    }
}

impl CacheStore for JsonCacheStore {
    fn load(&self) -> CacheEntries {
        Self::read_json(&self.path)
    }

    fn save(&self, entries: &CacheEntries) -> Result<(), CacheError> {
        Self::write_json(&self.path, entries)
    }

    fn load_failures(&self) -> BTreeSet<HopAddress> {
        Self::read_json(&self.failures_path)
    }

    fn save_failures(&self, failures: &BTreeSet<HopAddress>) -> Result<(), CacheError> {
        if failures.is_empty() {
            return match fs::remove_file(&self.failures_path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(CacheError::Io {
                    path: self.failures_path.clone(),
                    source: e,
                }),
                _ => Ok(()),
            };
        }
        Self::write_json(&self.failures_path, failures)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::value_objects::Coordinates;
    use tempfile::tempdir;
    use tracing_test::traced_test;

    fn addr(s: &str) -> HopAddress {
        HopAddress::new(s)
    }

    fn sample_entries() -> CacheEntries {
        let mut entries = CacheEntries::new();
        entries.insert(addr("8.8.8.8"), Coordinates::new(37.751, -97.822));
        entries.insert(addr("1.1.1.1"), Coordinates::new(-27.4766, 153.0166));
        entries
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path().join("ip_cache.json"));

        assert!(store.load().is_empty());
        assert!(store.load_failures().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path().join("ip_cache.json"));

        store.save(&sample_entries()).unwrap();

        assert_eq!(store.load(), sample_entries());
    }

    #[test]
    fn test_file_format_is_address_to_pair() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip_cache.json");
        let store = JsonCacheStore::new(&path);

        store.save(&sample_entries()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({
                "1.1.1.1": [-27.4766, 153.0166],
                "8.8.8.8": [37.751, -97.822]
            })
        );
    }

    #[test]
    fn test_reads_file_written_by_other_tools() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip_cache.json");
        fs::write(&path, r#"{"9.9.9.9": [47.6, -122.3], "4.2.2.2": [38, -97]}"#).unwrap();

        let entries = JsonCacheStore::new(&path).load();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[&addr("4.2.2.2")], Coordinates::new(38.0, -97.0));
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path().join("ip_cache.json"));

        store.save(&sample_entries()).unwrap();

        let mut smaller = CacheEntries::new();
        smaller.insert(addr("9.9.9.9"), Coordinates::new(1.0, 2.0));
        store.save(&smaller).unwrap();

        assert_eq!(store.load(), smaller);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path().join("nested/deeper/cache.json"));

        store.save(&sample_entries()).unwrap();

        assert_eq!(store.load(), sample_entries());
    }

    #[test]
    #[traced_test]
    fn test_corrupt_file_loads_empty_with_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip_cache.json");
        fs::write(&path, "{ this is not json").unwrap();

        assert!(JsonCacheStore::new(&path).load().is_empty());
        assert!(logs_contain("ignoring incompatible cache file"));
    }

    #[test]
    #[traced_test]
    fn test_incompatible_structure_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ip_cache.json");
        fs::write(&path, r#"{"8.8.8.8": {"lat": 1.0, "lon": 2.0}}"#).unwrap();

        assert!(JsonCacheStore::new(&path).load().is_empty());
        assert!(logs_contain("ignoring incompatible cache file"));
    }

    #[test]
    fn test_save_into_file_path_parent_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();

        let store = JsonCacheStore::new(blocker.join("ip_cache.json"));
        let result = store.save(&sample_entries());

        assert!(matches!(result, Err(CacheError::Io { .. })));
    }

    #[test]
    fn test_failures_sidecar_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path().join("ip_cache.json"));
        let failures: BTreeSet<_> = [addr("10.0.0.1"), addr("192.168.1.1")].into_iter().collect();

        store.save_failures(&failures).unwrap();

        assert_eq!(store.failures_path(), dir.path().join("ip_cache.failed.json"));
        assert_eq!(store.load_failures(), failures);
        // the main cache is untouched
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_saving_no_failures_removes_sidecar() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path().join("ip_cache.json"));
        let failures: BTreeSet<_> = [addr("10.0.0.1")].into_iter().collect();

        store.save_failures(&failures).unwrap();
        assert!(store.failures_path().exists());

        store.save_failures(&BTreeSet::new()).unwrap();
        assert!(!store.failures_path().exists());

        // removing an absent sidecar is fine
        store.save_failures(&BTreeSet::new()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_new_cache_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ip_cache.json");
        JsonCacheStore::new(&path).save(&sample_entries()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("ip_cache.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o664)).unwrap();

        JsonCacheStore::new(&path).save(&sample_entries()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o664);
        assert_eq!(JsonCacheStore::new(&path).load(), sample_entries());
    }

    #[test]
    fn test_default_path() {
        let store = JsonCacheStore::default();
        assert_eq!(store.path(), Path::new("ip_cache.json"));
        assert_eq!(store.failures_path(), Path::new("ip_cache.failed.json"));
    }
}
