use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One downloadable output file referenced by a generation result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactFile {
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    pub download_url: String,
}

impl ArtifactFile {
    /// File extension, lowercased, if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// A completed generation. Created once when a request succeeds and
/// never mutated afterwards; the gallery keeps them in completion
/// order for the lifetime of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub id: Uuid,
    /// The originating text prompt, or an `Image: <name>` label when
    /// the input was an uploaded image.
    pub prompt: String,
    /// Preview image: backend-generated url, or the local upload path.
    pub image_url: Option<String>,
    pub files: Vec<ArtifactFile>,
    pub processing_time: f32,
    pub timestamp: DateTime<Utc>,
    /// Backend job id, parsed from the first file's download url.
    pub request_id: String,
}

impl GenerationResult {
    /// Result of a plain text-to-image generation. No artifact files,
    /// no backend job id to correlate with.
    pub fn image(prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            image_url: Some(image_url.into()),
            files: Vec::new(),
            processing_time: 0.0,
            timestamp: Utc::now(),
            request_id: fallback_request_id(),
        }
    }

    pub fn has_model_files(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Extract the backend job id from a download url, i.e. the path
/// segment between `/download/` and the following `/`.
pub fn request_id_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/download/")?;
    let (id, _) = rest.split_once('/')?;
    if id.is_empty() { None } else { Some(id) }
}

/// Client-generated substitute id when the url carries none.
/// Best effort only; not guaranteed unique across sessions.
pub fn fallback_request_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_request_id_from_download_url() {
        let url = "/api/3d/download/abc123/model.obj";
        assert_eq!(request_id_from_url(url), Some("abc123"));
    }

    #[test]
    fn extracts_request_id_from_absolute_url() {
        let url = "http://localhost:8080/api/3d/download/req-9/mesh.glb";
        assert_eq!(request_id_from_url(url), Some("req-9"));
    }

    #[test]
    fn missing_pattern_yields_none() {
        assert_eq!(request_id_from_url("/api/3d/files/model.obj"), None);
        // No segment after the id.
        assert_eq!(request_id_from_url("/api/3d/download/abc123"), None);
        assert_eq!(request_id_from_url("/api/3d/download//model.obj"), None);
    }

    #[test]
    fn fallback_id_is_numeric() {
        let id = fallback_request_id();
        assert!(id.parse::<i64>().is_ok());
    }

    #[test]
    fn artifact_extension_is_lowercased() {
        let f = ArtifactFile {
            filename: "Model.OBJ".into(),
            size: 10,
            download_url: "/d".into(),
        };
        assert_eq!(f.extension().as_deref(), Some("obj"));
    }
}
