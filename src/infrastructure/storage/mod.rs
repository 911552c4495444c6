pub mod file;
#[cfg(test)]
pub mod memory;

use crate::domain::models::StorageBox;

pub struct StorageManager {}

impl StorageManager {
    /// Returns the token file configured through `token-file`.
    pub fn get() -> StorageBox {
        return Box::<file::FileStorage>::default();
    }
}
