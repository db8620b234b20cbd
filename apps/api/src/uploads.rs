//! Upload directory. Resumes are kept on disk under their uploaded file name.

use std::path::{Path, PathBuf};

use tracing::info;

/// Creates the upload directory if it does not exist yet.
pub async fn ensure_upload_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    info!("Upload directory ready at {}", dir.display());
    Ok(())
}

/// Reduces a client-supplied name to its final path component.
/// Returns `None` for names with nothing usable left (empty, `.`, `..`).
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Location of an upload inside `dir`, or `None` if the name is unusable.
pub fn upload_path(dir: &Path, filename: &str) -> Option<PathBuf> {
    sanitize_filename(filename).map(|name| dir.join(name))
}

/// Writes the file, replacing any earlier upload with the same name.
pub async fn save_upload(dir: &Path, filename: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    let path = upload_path(dir, filename).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("unusable file name '{filename}'"),
        )
    })?;
    tokio::fs::write(&path, data).await?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("cv.pdf").as_deref(), Some("cv.pdf"));
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(
            sanitize_filename(r"C:\Users\me\resume.docx").as_deref(),
            Some("resume.docx")
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_names() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("uploads/"), None);
        assert_eq!(sanitize_filename(".."), None);
    }

    #[tokio::test]
    async fn test_save_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        save_upload(dir.path(), "cv.txt", b"first").await.unwrap();
        let path = save_upload(dir.path(), "cv.txt", b"second").await.unwrap();
        assert_eq!(path, dir.path().join("cv.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/uploads");
        ensure_upload_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        ensure_upload_dir(&nested).await.unwrap();
    }
}
