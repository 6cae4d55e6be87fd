use std::path::PathBuf;

/// Unique path under the system temp dir for a throwaway collection document.
pub fn temp_data_file(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}_{}.json", prefix, uuid::Uuid::new_v4()))
}
