//! Errors from the fallible edges of the app: snapshot files and exports.

/// Errors that can occur while persisting or exporting game state.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the snapshot file failed.
    Io(std::io::Error),
    /// The snapshot could not be encoded or decoded.
    Json(serde_json::Error),
    /// Writing CSV output failed.
    Csv(csv::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Snapshot I/O failed: {}", e),
            StoreError::Json(e) => write!(f, "Snapshot is not valid JSON: {}", e),
            StoreError::Csv(e) => write!(f, "CSV export failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            StoreError::Csv(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}
