//! Pending user input and the submission guard.

use std::path::PathBuf;

/// Which generation flow the form feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Image,
    Model,
}

impl Mode {
    pub fn title(&self) -> &str {
        match self {
            Self::Image => "Image Generator",
            Self::Model => "3D Generator",
        }
    }
}

/// A locally selected input image. Picker and drag-and-drop both land
/// here, so they behave identically downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedImage {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Self { path, name }
    }
}

/// The user's in-progress input. Cleared on successful submission or
/// explicit removal; left intact on failure so a retry needs no
/// re-entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingSelection {
    pub prompt: String,
    pub image: Option<SelectedImage>,
}

impl PendingSelection {
    pub fn clear(&mut self) {
        self.prompt.clear();
        self.image = None;
    }
}

/// What the network worker should do for one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum GenRequest {
    Image { prompt: String },
    ModelFromText { prompt: String },
    ModelFromImage { path: PathBuf, name: String },
}

/// Form state: selection plus the busy flag that serializes
/// submissions. One network request per completed round-trip.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub selection: PendingSelection,
    pub busy: bool,
    pub error: Option<String>,
}

impl FormState {
    pub fn can_submit(&self, mode: Mode) -> bool {
        !self.busy && self.has_input(mode)
    }

    fn has_input(&self, mode: Mode) -> bool {
        let has_prompt = !self.selection.prompt.trim().is_empty();
        match mode {
            Mode::Image => has_prompt,
            Mode::Model => has_prompt || self.selection.image.is_some(),
        }
    }

    pub fn select_image(&mut self, image: SelectedImage) {
        self.selection.image = Some(image);
        self.error = None;
    }

    pub fn remove_image(&mut self) {
        self.selection.image = None;
        self.error = None;
    }

    /// Start a submission. Returns `None` (a no-op, no network call)
    /// when input is empty or another request is already in flight.
    pub fn begin_submit(&mut self, mode: Mode) -> Option<GenRequest> {
        if !self.can_submit(mode) {
            return None;
        }

        let request = match mode {
            Mode::Image => GenRequest::Image {
                prompt: self.selection.prompt.trim().to_string(),
            },
            // An uploaded image takes precedence over the prompt.
            Mode::Model => match &self.selection.image {
                Some(img) => GenRequest::ModelFromImage {
                    path: img.path.clone(),
                    name: img.name.clone(),
                },
                None => GenRequest::ModelFromText {
                    prompt: self.selection.prompt.trim().to_string(),
                },
            },
        };

        self.busy = true;
        self.error = None;
        Some(request)
    }

    /// The in-flight request succeeded: unlock and clear the input.
    pub fn complete(&mut self) {
        self.busy = false;
        self.selection.clear();
    }

    /// The in-flight request failed: unlock, surface the message,
    /// keep the input for a retry.
    pub fn fail(&mut self, message: String) {
        self.busy = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_prompt(p: &str) -> FormState {
        FormState {
            selection: PendingSelection {
                prompt: p.to_string(),
                image: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn empty_submission_is_a_noop() {
        let mut form = FormState::default();
        assert_eq!(form.begin_submit(Mode::Image), None);
        assert_eq!(form.begin_submit(Mode::Model), None);
        assert!(!form.busy);

        // Whitespace-only prompts count as empty.
        let mut form = form_with_prompt("   ");
        assert_eq!(form.begin_submit(Mode::Model), None);
    }

    #[test]
    fn busy_flag_rejects_concurrent_submissions() {
        let mut form = form_with_prompt("a red cube");
        let first = form.begin_submit(Mode::Image);
        assert!(first.is_some());

        // Second attempt while in flight: rejected, not queued.
        assert_eq!(form.begin_submit(Mode::Image), None);

        form.complete();
        // Round-trip finished and the prompt was cleared, so there is
        // nothing to resubmit either.
        assert_eq!(form.begin_submit(Mode::Image), None);
    }

    #[test]
    fn success_clears_selection() {
        let mut form = form_with_prompt("a chair");
        form.select_image(SelectedImage::new("/tmp/cat.png".into()));
        form.begin_submit(Mode::Model).unwrap();
        form.complete();
        assert_eq!(form.selection, PendingSelection::default());
        assert!(!form.busy);
        assert!(form.error.is_none());
    }

    #[test]
    fn failure_keeps_selection_and_surfaces_message() {
        let mut form = form_with_prompt("a chair");
        form.begin_submit(Mode::Model).unwrap();
        form.fail("generation failed".into());
        assert_eq!(form.selection.prompt, "a chair");
        assert_eq!(form.error.as_deref(), Some("generation failed"));
        assert!(!form.busy);

        // Retry works without re-entering input.
        assert!(form.begin_submit(Mode::Model).is_some());
    }

    #[test]
    fn image_takes_precedence_in_model_mode() {
        let mut form = form_with_prompt("a chair");
        form.select_image(SelectedImage::new("/tmp/cat.png".into()));
        match form.begin_submit(Mode::Model).unwrap() {
            GenRequest::ModelFromImage { name, .. } => assert_eq!(name, "cat.png"),
            other => panic!("expected image request, got {other:?}"),
        }
    }

    #[test]
    fn image_alone_does_not_enable_image_mode() {
        let mut form = FormState::default();
        form.select_image(SelectedImage::new("/tmp/cat.png".into()));
        assert!(!form.can_submit(Mode::Image));
        assert!(form.can_submit(Mode::Model));
    }

    #[test]
    fn model_mode_without_image_sends_text_request() {
        let mut form = form_with_prompt("  a wooden ship  ");
        match form.begin_submit(Mode::Model).unwrap() {
            GenRequest::ModelFromText { prompt } => assert_eq!(prompt, "a wooden ship"),
            other => panic!("expected text request, got {other:?}"),
        }
    }
}
