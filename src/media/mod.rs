mod storage;

pub use storage::{MediaStore, MediaStoreError};
