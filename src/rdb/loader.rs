use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::{keyspace::KeyValueStore, rdb::rdb_parser::RdbParser};

/// Loads the RDB snapshot at `path` and seeds the keyspace with its
/// entries.
///
/// Runs before the listener accepts connections, so seeding uses the
/// store's exclusive bulk-load path. A missing file, bad magic string or
/// malformed block fails the load without touching the store; the caller
/// decides whether to continue with an empty keyspace.
///
/// # Returns
///
/// * `Ok(usize)` - The number of keys seeded
/// * `Err` - If the file cannot be read or parsed
pub async fn load_snapshot(path: &Path, store: &mut KeyValueStore) -> tokio::io::Result<usize> {
    let buffer = fs::read(path).await?;

    let mut parser = RdbParser::new(buffer);
    parser.parse()?;

    if let Some(version) = &parser.redis_version {
        debug!(%version, path = %path.display(), "parsed snapshot");
    }

    let loaded = parser.entries.len();
    store.seed(parser.entries);

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::load_snapshot;
    use crate::keyspace::KeyValueStore;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rudis-loader-test-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn test_load_snapshot_seeds_store() {
        let path = temp_file("basic.rdb");
        let mut bytes = b"REDIS0011".to_vec();
        bytes.extend([0x00, 0x05]);
        bytes.extend(b"mango");
        bytes.push(0x09);
        bytes.extend(b"raspberry");
        bytes.push(0xFF);
        tokio::fs::write(&path, &bytes).await.unwrap();

        let mut store = KeyValueStore::new();
        let loaded = load_snapshot(&path, &mut store).await.unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(
            store.get_string(b"mango").await,
            Ok(Some(b"raspberry".to_vec()))
        );

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_snapshot_missing_file() {
        let mut store = KeyValueStore::new();
        let result = load_snapshot(&temp_file("does-not-exist.rdb"), &mut store).await;

        assert!(result.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_load_snapshot_bad_magic_leaves_store_empty() {
        let path = temp_file("bad-magic.rdb");
        tokio::fs::write(&path, b"NOTRDB001\xFF").await.unwrap();

        let mut store = KeyValueStore::new();
        let result = load_snapshot(&path, &mut store).await;

        assert!(result.is_err());
        assert!(store.is_empty().await);

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
