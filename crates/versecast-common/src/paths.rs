//! Logical storage-path helpers.
//!
//! Media objects live under `{content_kind}/{bible_id}/{fileset_id}/{file}`
//! in the CDN-backed object store. These helpers build those paths so that
//! the layout is defined in exactly one place.

/// Build the storage directory for a fileset's files.
pub fn fileset_prefix(content_kind: &str, bible_id: &str, fileset_id: &str) -> String {
    format!("{content_kind}/{bible_id}/{fileset_id}")
}

/// Build the full logical path for one stored file.
pub fn object_path(prefix: &str, file_name: &str) -> String {
    format!("{prefix}/{file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fileset_prefix() {
        assert_eq!(
            fileset_prefix("audio", "ENGESV", "ENGESVN2DA16"),
            "audio/ENGESV/ENGESVN2DA16"
        );
    }

    #[test]
    fn test_object_path() {
        let prefix = fileset_prefix("audio", "ENGESV", "ENGESVN2DA16");
        assert_eq!(
            object_path(&prefix, "B01___01_Matthew.mp3"),
            "audio/ENGESV/ENGESVN2DA16/B01___01_Matthew.mp3"
        );
    }
}
