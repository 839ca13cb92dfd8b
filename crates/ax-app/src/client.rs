//! Remote generation client: one method per backend endpoint, every
//! outcome normalized into `GenerationResult` / `GenError`. No
//! caching, no retry; transport failures, non-success statuses and
//! malformed bodies all become error values, never panics.

use std::time::Duration;

use reqwest::blocking::multipart;

use ax_core::{GenError, GenerationResult, ImageResponse, ModelResponse};

/// Generous timeout: model generation can take a minute or two.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct GenClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl GenClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self { base_url, http }
    }

    /// `POST /api/generate` - text to image.
    pub fn generate_image(&self, prompt: &str) -> Result<GenerationResult, GenError> {
        let response = self
            .http
            .post(self.url("/api/generate"))
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .map_err(GenError::transport)?;

        let body: ImageResponse = Self::read_json(response)?;
        body.into_result(prompt)
    }

    /// `POST /api/3d/generate-from-text` - text to 3D model.
    pub fn generate_model_from_text(&self, prompt: &str) -> Result<GenerationResult, GenError> {
        let response = self
            .http
            .post(self.url("/api/3d/generate-from-text"))
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .map_err(GenError::transport)?;

        let body: ModelResponse = Self::read_json(response)?;
        body.into_result(prompt, None)
    }

    /// `POST /api/3d/generate` - image to 3D model, multipart upload.
    /// `local_preview` is shown for the result if the backend does not
    /// return a generated preview of its own.
    pub fn generate_model_from_image(
        &self,
        name: &str,
        bytes: Vec<u8>,
        local_preview: Option<String>,
    ) -> Result<GenerationResult, GenError> {
        let part = multipart::Part::bytes(bytes).file_name(name.to_string());
        let form = multipart::Form::new().part("image", part);

        let response = self
            .http
            .post(self.url("/api/3d/generate"))
            .multipart(form)
            .send()
            .map_err(GenError::transport)?;

        let label = format!("Image: {name}");
        let body: ModelResponse = Self::read_json(response)?;
        body.into_result(&label, local_preview)
    }

    /// `GET` arbitrary backend-relative or absolute url, returning the
    /// raw bytes. Used for previews, viewer assets and downloads.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, GenError> {
        let response = self
            .http
            .get(self.absolute(url))
            .send()
            .map_err(GenError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Status(status.as_u16()));
        }

        let bytes = response.bytes().map_err(GenError::transport)?;
        Ok(bytes.to_vec())
    }

    /// Retrieval location of one artifact; doubles as the viewer's
    /// asset source url.
    pub fn download_url(&self, request_id: &str, filename: &str) -> String {
        format!("{}/api/3d/download/{request_id}/{filename}", self.base_url)
    }

    /// Resolve a backend-relative path against the configured base.
    pub fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, GenError> {
        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Status(status.as_u16()));
        }
        response
            .json()
            .map_err(|e| GenError::EmptyResponse(format!("Malformed backend response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = GenClient::new("http://localhost:8080/");
        assert_eq!(
            client.download_url("abc123", "model.obj"),
            "http://localhost:8080/api/3d/download/abc123/model.obj"
        );
    }

    #[test]
    fn absolute_resolves_relative_urls() {
        let client = GenClient::new("http://localhost:8080");
        assert_eq!(
            client.absolute("/img/1.png"),
            "http://localhost:8080/img/1.png"
        );
        assert_eq!(
            client.absolute("img/1.png"),
            "http://localhost:8080/img/1.png"
        );
        assert_eq!(
            client.absolute("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
