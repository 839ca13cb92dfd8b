use std::path::PathBuf;

use uuid::Uuid;

use ax_core::{GenError, GenerationResult};

use crate::ui::UiEvent;

/// User event type of the winit loop.
#[derive(Debug, Clone)]
pub enum AxEvent {
    Ui(UiEvent),
    Net(NetEvent),
}

/// Results coming back from the network worker thread.
#[derive(Debug, Clone)]
pub enum NetEvent {
    /// The one in-flight generation request resolved.
    GenerationFinished(Result<GenerationResult, GenError>),

    /// Preview image bytes for a gallery entry.
    PreviewFetched {
        result_id: Uuid,
        bytes: Result<Vec<u8>, String>,
    },

    /// Raw 3D asset bytes for the open viewer session.
    AssetFetched {
        url: String,
        bytes: Result<Vec<u8>, String>,
    },

    /// A save-to-disk download finished.
    DownloadFinished {
        filename: String,
        result: Result<PathBuf, String>,
    },
}
