mod error;
mod store;

pub use error::StorageError;
pub use store::{StoredFile, UploadStore, UploadWriter};
