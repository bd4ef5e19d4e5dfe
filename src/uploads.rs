//! Multipart ingestion for the admin media routes.
//!
//! Each upload route declares an [`UploadPolicy`]: which file fields it
//! accepts, where under the public root they land, and whether the generated
//! name carries a random suffix. Files are streamed to disk as the body is
//! read, before the handler looks at the text fields. If anything fails, the
//! files already written for that request are removed again.

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use rand::Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

pub const IMAGES_DIR: &str = "images";
pub const ABILITY_IMAGES_DIR: &str = "images/abilities";
pub const ABILITY_VIDEOS_DIR: &str = "videos/abilities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Every accepted file goes to the same directory.
    Fixed(&'static str),
    /// `image/*` and `video/*` go to the ability media directories; any
    /// other type is refused.
    ByMediaType,
}

impl Destination {
    fn directory(self, media_type: &str) -> Result<&'static str, UploadError> {
        match self {
            Self::Fixed(dir) => Ok(dir),
            Self::ByMediaType if media_type.starts_with("image/") => Ok(ABILITY_IMAGES_DIR),
            Self::ByMediaType if media_type.starts_with("video/") => Ok(ABILITY_VIDEOS_DIR),
            Self::ByMediaType => Err(UploadError::InvalidFileType(media_type.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub fields: &'static [&'static str],
    pub destination: Destination,
    pub random_suffix: bool,
}

/// Hero portrait and background.
pub const HERO_MEDIA: UploadPolicy = UploadPolicy {
    fields: &["image_url", "background_image_url"],
    destination: Destination::Fixed(IMAGES_DIR),
    random_suffix: false,
};

/// Ability icon and optional clip.
pub const ABILITY_MEDIA: UploadPolicy = UploadPolicy {
    fields: &["image_url", "video_url"],
    destination: Destination::ByMediaType,
    random_suffix: true,
};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Unexpected file field '{0}'")]
    UnexpectedField(String),

    #[error("Only one file is accepted for '{0}'")]
    DuplicateField(String),

    #[error("Malformed upload: {0}")]
    Malformed(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    /// Public URL path, e.g. `/images/image_url-1717171717171.png`.
    pub url: String,
}

/// Text fields and stored files of one multipart request.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, StoredFile>,
}

impl UploadForm {
    /// Trimmed value of a text field, `None` when absent or blank.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn file_url(&self, name: &str) -> Option<String> {
        self.files.get(name).map(|f| f.url.clone())
    }

    #[must_use]
    pub fn stored_files(&self) -> usize {
        self.files.len()
    }

    /// Removes every file this request stored.
    pub async fn discard(self) {
        for file in self.files.into_values() {
            if let Err(e) = fs::remove_file(&file.path).await {
                warn!(path = %file.path.display(), error = %e, "Failed to remove orphaned upload");
            } else {
                debug!(path = %file.path.display(), "Removed orphaned upload");
            }
        }
    }
}

pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the media directories below the public root.
    pub async fn ensure_layout(&self) -> std::io::Result<()> {
        for dir in [IMAGES_DIR, ABILITY_IMAGES_DIR, ABILITY_VIDEOS_DIR] {
            fs::create_dir_all(self.root.join(dir)).await?;
        }
        Ok(())
    }

    pub async fn ingest(
        &self,
        mut multipart: Multipart,
        policy: &UploadPolicy,
    ) -> Result<UploadForm, UploadError> {
        let mut form = UploadForm::default();

        match self.collect(&mut multipart, policy, &mut form).await {
            Ok(()) => Ok(form),
            Err(e) => {
                form.discard().await;
                Err(e)
            }
        }
    }

    async fn collect(
        &self,
        multipart: &mut Multipart,
        policy: &UploadPolicy,
        form: &mut UploadForm,
    ) -> Result<(), UploadError> {
        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(original_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await.map_err(malformed)?;
                form.fields.insert(name, value);
                continue;
            };

            // Browsers send an empty file part when no file was chosen.
            if original_name.is_empty() {
                continue;
            }

            if !policy.fields.contains(&name.as_str()) {
                return Err(UploadError::UnexpectedField(name));
            }
            if form.files.contains_key(&name) {
                return Err(UploadError::DuplicateField(name));
            }

            let media_type = media_type_of(field.content_type(), &original_name);
            let dir = policy.destination.directory(&media_type)?;

            let suffix = policy
                .random_suffix
                .then(|| rand::rng().random_range(0..1_000_000_000));
            let (file, stored) = self
                .create_unique(dir, &name, &original_name, suffix)
                .await?;
            let path = stored.path.clone();

            // Registered before writing so a half-written file is cleaned up too.
            form.files.insert(name.clone(), stored);

            write_field(field, file).await?;
            debug!(field = %name, path = %path.display(), "Stored upload");
        }

        Ok(())
    }

    /// Maps a stored public URL back to its file. Only plain names inside the
    /// media directories resolve; anything else is `None`.
    #[must_use]
    pub fn path_of(&self, url: &str) -> Option<PathBuf> {
        let (dir, name) = url.strip_prefix('/')?.rsplit_once('/')?;
        if ![IMAGES_DIR, ABILITY_IMAGES_DIR, ABILITY_VIDEOS_DIR].contains(&dir) {
            return None;
        }
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return None;
        }
        Some(self.root.join(dir).join(name))
    }

    /// Deletes media files a record stopped pointing to. Failures are logged,
    /// the edit itself has already been committed.
    pub async fn remove_superseded(&self, urls: &[String]) {
        for url in urls {
            let Some(path) = self.path_of(url) else {
                warn!(url = %url, "Not removing media outside the upload directories");
                continue;
            };
            match fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed superseded media"),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove superseded media"),
            }
        }
    }

    /// Creates the target file without ever replacing an existing one. Two
    /// uploads within the same millisecond get consecutive timestamps.
    async fn create_unique(
        &self,
        dir: &str,
        field: &str,
        original_name: &str,
        suffix: Option<u32>,
    ) -> Result<(fs::File, StoredFile), UploadError> {
        let target_dir = self.root.join(dir);
        fs::create_dir_all(&target_dir).await?;

        let mut timestamp_ms = chrono::Utc::now().timestamp_millis();
        loop {
            let stored_name = stored_file_name(field, original_name, timestamp_ms, suffix);
            let path = target_dir.join(&stored_name);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    let url = format!("/{dir}/{stored_name}");
                    return Ok((file, StoredFile { path, url }));
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => timestamp_ms += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

async fn write_field(mut field: Field<'_>, mut file: fs::File) -> Result<(), UploadError> {
    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(())
}

fn malformed(err: axum::extract::multipart::MultipartError) -> UploadError {
    UploadError::Malformed(err.body_text())
}

/// Declared part type, or a guess from the file name when the client sent none.
fn media_type_of(content_type: Option<&str>, file_name: &str) -> String {
    content_type.map_or_else(
        || {
            mime_guess::from_path(file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        },
        str::to_ascii_lowercase,
    )
}

/// `<field>-<unix millis>[-<suffix>][.<ext>]`. The extension is taken from the
/// client's file name and dropped if it is not plain alphanumerics.
#[must_use]
pub fn stored_file_name(
    field: &str,
    original_name: &str,
    timestamp_ms: i64,
    suffix: Option<u32>,
) -> String {
    let mut name = format!("{field}-{timestamp_ms}");

    if let Some(suffix) = suffix {
        name.push('-');
        name.push_str(&suffix.to_string());
    }

    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()));

    if let Some(ext) = extension {
        name.push('.');
        name.push_str(ext);
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    const BOUNDARY: &str = "X-HERODEX-TEST";

    fn multipart_request(parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match file {
                Some((file_name, content_type)) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("herodex-uploads-{}", uuid::Uuid::new_v4()))
    }

    fn files_under(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn test_stored_file_name() {
        assert_eq!(
            stored_file_name("image_url", "axe.PNG", 1_700_000_000_000, None),
            "image_url-1700000000000.PNG"
        );
        assert_eq!(
            stored_file_name("video_url", "clip.webm", 42, Some(7)),
            "video_url-42-7.webm"
        );
        assert_eq!(stored_file_name("image_url", "noext", 1, None), "image_url-1");
        assert_eq!(
            stored_file_name("image_url", "evil.p/hp", 1, None),
            "image_url-1"
        );
    }

    #[test]
    fn test_destination_by_media_type() {
        let by_type = Destination::ByMediaType;
        assert_eq!(by_type.directory("image/png").unwrap(), ABILITY_IMAGES_DIR);
        assert_eq!(by_type.directory("video/mp4").unwrap(), ABILITY_VIDEOS_DIR);
        assert!(matches!(
            by_type.directory("application/pdf"),
            Err(UploadError::InvalidFileType(_))
        ));
        assert_eq!(
            Destination::Fixed(IMAGES_DIR).directory("application/pdf").unwrap(),
            IMAGES_DIR
        );
    }

    #[test]
    fn test_media_type_falls_back_to_file_name() {
        assert_eq!(media_type_of(Some("Image/PNG"), "x.bin"), "image/png");
        assert_eq!(media_type_of(None, "clip.mp4"), "video/mp4");
        assert_eq!(media_type_of(None, "blob"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_ingest_stores_files_and_text() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        let request = multipart_request(&[
            ("name", None, "Blink"),
            ("image_url", Some(("blink.png", "image/png")), "PNGDATA"),
            ("video_url", Some(("", "application/octet-stream")), ""),
        ]);

        let multipart = Multipart::from_request(request, &()).await.unwrap();
        let form = store.ingest(multipart, &ABILITY_MEDIA).await.unwrap();

        assert_eq!(form.text("name"), Some("Blink"));
        assert_eq!(form.stored_files(), 1);
        assert!(form.file_url("video_url").is_none());

        let url = form.file_url("image_url").unwrap();
        assert!(url.starts_with("/images/abilities/image_url-"));
        assert!(url.ends_with(".png"));

        let on_disk = root.join(url.trim_start_matches('/'));
        assert_eq!(std::fs::read_to_string(on_disk).unwrap(), "PNGDATA");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_ingest_rejects_wrong_type_and_cleans_up() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        let request = multipart_request(&[
            ("image_url", Some(("icon.png", "image/png")), "PNGDATA"),
            ("video_url", Some(("notes.txt", "text/plain")), "hello"),
        ]);

        let multipart = Multipart::from_request(request, &()).await.unwrap();
        let result = store.ingest(multipart, &ABILITY_MEDIA).await;

        assert!(matches!(result, Err(UploadError::InvalidFileType(_))));
        assert_eq!(files_under(&root.join(ABILITY_IMAGES_DIR)), 0);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_ingest_rejects_unknown_file_field() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        let request = multipart_request(&[("avatar", Some(("me.png", "image/png")), "PNG")]);

        let multipart = Multipart::from_request(request, &()).await.unwrap();
        let result = store.ingest(multipart, &HERO_MEDIA).await;

        assert!(matches!(result, Err(UploadError::UnexpectedField(f)) if f == "avatar"));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_path_of_stays_inside_media_dirs() {
        let store = UploadStore::new("/srv/public");

        assert_eq!(
            store.path_of("/images/image_url-1.png"),
            Some(PathBuf::from("/srv/public/images/image_url-1.png"))
        );
        assert_eq!(
            store.path_of("/videos/abilities/video_url-1-2.mp4"),
            Some(PathBuf::from("/srv/public/videos/abilities/video_url-1-2.mp4"))
        );
        assert!(store.path_of("/css/style.css").is_none());
        assert!(store.path_of("/images/../config.toml").is_none());
        assert!(store.path_of("/images/..").is_none());
        assert!(store.path_of("images/x.png").is_none());
        assert!(store.path_of("/images/").is_none());
    }
}
