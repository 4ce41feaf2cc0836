use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::StorageError;

/// Metadata for a file that has been fully written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Absolute path of the stored file.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

/// Filesystem store for uploaded submission files.
///
/// Uploads are streamed into a `.tmp` scratch file and renamed into place
/// under their final (collision-free, caller-namespaced) name only once
/// fully written, so a partially received upload never becomes visible.
pub struct UploadStore {
    base_path: PathBuf,
    max_size: u64,
}

impl UploadStore {
    /// Create a new upload store rooted at `base_path`, creating the
    /// directory tree if needed.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Directory stored files live in.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Begin a streaming upload.
    pub async fn begin(&self) -> Result<UploadWriter, StorageError> {
        let temp_path = self.temp_path();
        let file = fs::File::create(&temp_path).await?;
        Ok(UploadWriter {
            file,
            temp_path,
            base_path: self.base_path.clone(),
            max_size: self.max_size,
            written: 0,
        })
    }

    /// Store a complete in-memory buffer under `stored_name`.
    pub async fn put(&self, data: &[u8], stored_name: &str) -> Result<StoredFile, StorageError> {
        let mut writer = self.begin().await?;
        writer.write_chunk(data).await?;
        writer.finish(stored_name).await
    }

    /// Open a previously stored file for reading.
    pub async fn open(&self, stored_name: &str) -> Result<fs::File, StorageError> {
        let path = self.base_path.join(validate_stored_name(stored_name)?);
        match fs::File::open(&path).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-flight streaming upload. Call [`UploadWriter::finish`] to make the
/// file visible, or [`UploadWriter::abort`] to discard it.
pub struct UploadWriter {
    file: fs::File,
    temp_path: PathBuf,
    base_path: PathBuf,
    max_size: u64,
    written: u64,
}

impl UploadWriter {
    /// Append a chunk, enforcing the size cap. On overflow the scratch file
    /// is removed and the writer is unusable.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.written += chunk.len() as u64;
        if self.written > self.max_size {
            let _ = fs::remove_file(&self.temp_path).await;
            return Err(StorageError::SizeLimitExceeded {
                actual: self.written,
                limit: self.max_size,
            });
        }
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and rename the scratch file to its final name.
    pub async fn finish(mut self, stored_name: &str) -> Result<StoredFile, StorageError> {
        let name = match validate_stored_name(stored_name) {
            Ok(name) => name,
            Err(e) => {
                drop(self.file);
                let _ = fs::remove_file(&self.temp_path).await;
                return Err(e);
            }
        };

        self.file.flush().await?;
        drop(self.file);

        let final_path = self.base_path.join(name);
        if let Err(e) = fs::rename(&self.temp_path, &final_path).await {
            let _ = fs::remove_file(&self.temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(name, size = self.written, "upload stored");
        Ok(StoredFile {
            path: final_path,
            size: self.written,
        })
    }

    /// Discard the upload, removing the scratch file.
    pub async fn abort(self) {
        drop(self.file);
        let _ = fs::remove_file(&self.temp_path).await;
    }
}

/// Stored names must be flat filenames: no separators, no traversal,
/// nothing hidden. Callers build them from already-sanitized parts; this is
/// the last line of defense.
fn validate_stored_name(name: &str) -> Result<&str, StorageError> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name.starts_with('.')
    {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(max_size: u64) -> (UploadStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"), max_size)
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn put_open_round_trip() {
        let (store, _dir) = temp_store(1024).await;
        let stored = store.put(b"hello world", "1_2_x.txt").await.unwrap();
        assert_eq!(stored.size, 11);

        let mut file = store.open("1_2_x.txt").await.unwrap();
        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut file, &mut buf)
            .await
            .unwrap();
        assert_eq!(buf, b"hello world");
    }

    #[tokio::test]
    async fn streaming_chunks_accumulate() {
        let (store, _dir) = temp_store(1024).await;
        let mut writer = store.begin().await.unwrap();
        writer.write_chunk(b"abc").await.unwrap();
        writer.write_chunk(b"def").await.unwrap();
        assert_eq!(writer.written(), 6);
        let stored = writer.finish("chunked.bin").await.unwrap();
        assert_eq!(stored.size, 6);
    }

    #[tokio::test]
    async fn size_limit_enforced_and_temp_cleaned() {
        let (store, dir) = temp_store(10).await;
        let mut writer = store.begin().await.unwrap();
        let result = writer.write_chunk(b"this is more than 10 bytes").await;
        assert!(matches!(
            result,
            Err(StorageError::SizeLimitExceeded { .. })
        ));

        let tmp_entries: Vec<_> = std::fs::read_dir(dir.path().join("uploads/.tmp"))
            .unwrap()
            .collect();
        assert_eq!(tmp_entries.len(), 0);
    }

    #[tokio::test]
    async fn abort_removes_scratch_file() {
        let (store, dir) = temp_store(1024).await;
        let mut writer = store.begin().await.unwrap();
        writer.write_chunk(b"partial").await.unwrap();
        writer.abort().await;

        let tmp_entries: Vec<_> = std::fs::read_dir(dir.path().join("uploads/.tmp"))
            .unwrap()
            .collect();
        assert_eq!(tmp_entries.len(), 0);
    }

    #[tokio::test]
    async fn open_not_found() {
        let (store, _dir) = temp_store(1024).await;
        assert!(matches!(
            store.open("missing.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_unsafe_stored_names() {
        let (store, _dir) = temp_store(1024).await;
        for name in ["../escape", "a/b.txt", ".hidden", ""] {
            assert!(matches!(
                store.put(b"x", name).await,
                Err(StorageError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn constructor_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("deep/nested/uploads");
        assert!(!base.exists());

        let _store = UploadStore::new(base.clone(), 1024).await.unwrap();

        assert!(base.exists());
        assert!(base.join(".tmp").exists());
    }
}
