//! Wire schemas of the generation backend and their normalization
//! into [`GenerationResult`] / [`GenError`].

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::artifact::{fallback_request_id, request_id_from_url, ArtifactFile, GenerationResult};
use crate::error::GenError;

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    pub error: Option<String>,
}

impl ImageResponse {
    pub fn into_result(self, prompt: &str) -> Result<GenerationResult, GenError> {
        if let Some(url) = self.image_url {
            return Ok(GenerationResult::image(prompt, url));
        }
        match self.error {
            Some(error) => Err(GenError::Backend(error)),
            None => Err(GenError::EmptyResponse(
                "Backend returned no image and no error".into(),
            )),
        }
    }
}

/// Body of `POST /api/3d/generate` and `POST /api/3d/generate-from-text`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelResponse {
    #[serde(default)]
    pub files: Vec<ArtifactFile>,
    pub generated_image_url: Option<String>,
    pub processing_time: Option<f32>,
    pub error: Option<String>,
}

impl ModelResponse {
    /// Normalize into a result. `label` is the prompt or the synthetic
    /// upload label; `local_preview` is the path of the uploaded image,
    /// used when the backend produced no preview of its own.
    pub fn into_result(
        self,
        label: &str,
        local_preview: Option<String>,
    ) -> Result<GenerationResult, GenError> {
        if !self.files.is_empty() {
            let request_id = self
                .files
                .first()
                .and_then(|f| request_id_from_url(&f.download_url))
                .map(str::to_owned)
                .unwrap_or_else(fallback_request_id);

            return Ok(GenerationResult {
                id: Uuid::new_v4(),
                prompt: label.to_owned(),
                image_url: self.generated_image_url.or(local_preview),
                files: self.files,
                processing_time: self.processing_time.unwrap_or(0.0),
                timestamp: Utc::now(),
                request_id,
            });
        }

        match (self.error, self.generated_image_url) {
            // The model step failed after an image was produced; keep
            // that nuance in the message instead of discarding it.
            (Some(error), Some(preview_url)) => Err(GenError::Partial { error, preview_url }),
            (Some(error), None) => Err(GenError::Backend(error)),
            (None, _) => Err(GenError::EmptyResponse(
                "Failed to generate 3D model - no files returned".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_response(json: &str) -> ModelResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn image_response_with_url() {
        let resp: ImageResponse =
            serde_json::from_str(r#"{"imageUrl": "/img/1.png"}"#).unwrap();
        let result = resp.into_result("a red cube").unwrap();
        assert_eq!(result.prompt, "a red cube");
        assert_eq!(result.image_url.as_deref(), Some("/img/1.png"));
        assert!(result.files.is_empty());
    }

    #[test]
    fn image_response_with_error() {
        let resp: ImageResponse =
            serde_json::from_str(r#"{"error": "prompt rejected"}"#).unwrap();
        let err = resp.into_result("x").unwrap_err();
        assert_eq!(err, GenError::Backend("prompt rejected".into()));
        assert_eq!(err.to_string(), "prompt rejected");
    }

    #[test]
    fn image_response_empty_payload() {
        let resp: ImageResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            resp.into_result("x"),
            Err(GenError::EmptyResponse(_))
        ));
    }

    #[test]
    fn model_response_with_files() {
        let resp = model_response(
            r#"{
                "files": [{"filename": "model.obj", "size": 1024,
                           "download_url": "/api/3d/download/abc123/model.obj"}],
                "processing_time": 4.2
            }"#,
        );
        let result = resp.into_result("Image: cat.png", None).unwrap();
        assert_eq!(result.request_id, "abc123");
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].size, 1024);
        assert_eq!(result.processing_time, 4.2);
    }

    #[test]
    fn model_response_error_and_no_files() {
        let resp = model_response(r#"{"error": "generation failed"}"#);
        let err = resp.into_result("a chair", None).unwrap_err();
        assert_eq!(err.to_string(), "generation failed");
    }

    #[test]
    fn model_response_partial_failure() {
        let resp = model_response(
            r#"{"error": "mesh export failed", "generated_image_url": "/img/p.png"}"#,
        );
        let err = resp.into_result("a chair", None).unwrap_err();
        match err {
            GenError::Partial { error, preview_url } => {
                assert_eq!(error, "mesh export failed");
                assert_eq!(preview_url, "/img/p.png");
            }
            other => panic!("expected partial failure, got {other:?}"),
        }
    }

    #[test]
    fn model_response_no_files_no_error() {
        let resp = model_response("{}");
        assert!(matches!(
            resp.into_result("x", None),
            Err(GenError::EmptyResponse(_))
        ));
    }

    #[test]
    fn backend_preview_wins_over_local_preview() {
        let resp = model_response(
            r#"{
                "files": [{"filename": "m.obj",
                           "download_url": "/api/3d/download/id1/m.obj"}],
                "generated_image_url": "/img/gen.png"
            }"#,
        );
        let result = resp
            .into_result("Image: cat.png", Some("/tmp/cat.png".into()))
            .unwrap();
        assert_eq!(result.image_url.as_deref(), Some("/img/gen.png"));
    }

    #[test]
    fn local_preview_used_when_backend_has_none() {
        let resp = model_response(
            r#"{"files": [{"filename": "m.obj",
                           "download_url": "/api/3d/download/id1/m.obj"}]}"#,
        );
        let result = resp
            .into_result("Image: cat.png", Some("/tmp/cat.png".into()))
            .unwrap();
        assert_eq!(result.image_url.as_deref(), Some("/tmp/cat.png"));
        // Missing size defaults to zero, missing time to zero.
        assert_eq!(result.files[0].size, 0);
        assert_eq!(result.processing_time, 0.0);
    }

    #[test]
    fn request_id_falls_back_when_url_has_no_pattern() {
        let resp = model_response(
            r#"{"files": [{"filename": "m.obj", "download_url": "/files/m.obj"}]}"#,
        );
        let result = resp.into_result("x", None).unwrap();
        assert!(result.request_id.parse::<i64>().is_ok());
    }
}
