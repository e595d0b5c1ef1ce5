pub mod azure;

use derive_more::Display;

pub use azure::AzureBlobStorage;

#[derive(Debug, Display)]
pub enum StorageError {
    #[display(fmt = "export storage is not configured")]
    NotConfigured,

    #[display(fmt = "Invalid storage connection string: {}", _0)]
    InvalidConnectionString(String),

    #[display(fmt = "Could not sign storage request: {}", _0)]
    Signing(String),

    #[display(fmt = "Request to blob storage failed: {}", _0)]
    Http(reqwest::Error),

    #[display(fmt = "Blob storage answered {} to {}", status, operation)]
    UnexpectedStatus {
        operation: &'static str,
        status: reqwest::StatusCode,
    },
}

impl std::error::Error for StorageError {}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Http(e)
    }
}

/// Object store receiving exports.
///
/// `upload` stores `content` under `name`, overwriting any previous object,
/// and returns a time-limited URL granting read access to it.
pub trait ExportStorage: Send + Sync {
    fn upload(&self, name: &str, content: Vec<u8>) -> Result<String, StorageError>;
}

/// Stand-in used when no storage connection string was configured
pub struct UnconfiguredStorage;

impl ExportStorage for UnconfiguredStorage {
    fn upload(&self, _: &str, _: Vec<u8>) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured)
    }
}
