//! Viewer session lifecycle.
//!
//! `Closed -> Initializing -> (Ready | Failed) -> Closed`. "Closed" is
//! the absence of a session value; the owner holds an
//! `Option<ViewerSession>` and closing is dropping it, which is safe
//! from any state, including mid-initialization.

use crate::camera::Camera;
use crate::mesh::{self, Mesh};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerStatus {
    /// Runtime bootstrap and asset fetch in flight.
    Initializing,
    /// Rendering; the mesh may be the placeholder substitute.
    Ready,
    /// Runtime bootstrap failed. Terminal: the only exit is closing
    /// the session. Asset problems never land here - they substitute
    /// the placeholder and stay `Ready`.
    Failed(String),
}

/// Transient state of one open model viewer. At most one exists at a
/// time; it owns its camera and mesh exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSession {
    pub asset_url: String,
    pub label: String,
    pub status: ViewerStatus,
    pub camera: Camera,
    pub mesh: Option<Mesh>,
    /// True when the placeholder was substituted for the real asset.
    pub substituted: bool,
}

impl ViewerSession {
    pub fn open(asset_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            asset_url: asset_url.into(),
            label: label.into(),
            status: ViewerStatus::Initializing,
            camera: Camera::default(),
            mesh: None,
            substituted: false,
        }
    }

    /// The asset bytes arrived; run the load policy. Always reaches
    /// `Ready` - parse or format problems substitute the placeholder.
    pub fn asset_loaded(&mut self, bytes: &[u8]) -> &Mesh {
        let loaded = mesh::load_asset(&self.label, bytes);
        self.substituted = loaded.substituted();
        self.mesh = Some(loaded.mesh);
        self.status = ViewerStatus::Ready;
        self.mesh.as_ref().unwrap()
    }

    /// The asset could not be fetched at all. Same policy: show the
    /// placeholder rather than a blank or broken scene.
    pub fn asset_unavailable(&mut self) -> &Mesh {
        self.substituted = true;
        self.mesh = Some(Mesh::placeholder_cube());
        self.status = ViewerStatus::Ready;
        self.mesh.as_ref().unwrap()
    }

    /// The rendering runtime itself could not be brought up.
    pub fn bootstrap_failed(&mut self, message: impl Into<String>) {
        self.status = ViewerStatus::Failed(message.into());
    }

    pub fn is_ready(&self) -> bool {
        self.status == ViewerStatus::Ready
    }

    /// Whether the per-frame loop should keep running.
    pub fn wants_frames(&self) -> bool {
        self.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    #[test]
    fn opens_in_initializing() {
        let session = ViewerSession::open("/api/3d/download/a/m.obj", "m.obj");
        assert_eq!(session.status, ViewerStatus::Initializing);
        assert!(session.mesh.is_none());
        assert!(!session.wants_frames());
    }

    #[test]
    fn obj_bytes_reach_ready_unsubstituted() {
        let mut session = ViewerSession::open("/d/m.obj", "m.obj");
        session.asset_loaded(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert!(session.is_ready());
        assert!(!session.substituted);
        assert!(session.wants_frames());
    }

    #[test]
    fn unrecognized_extension_is_ready_with_placeholder() {
        let mut session = ViewerSession::open("/d/m.splat", "m.splat");
        session.asset_loaded(b"whatever");
        assert!(session.is_ready());
        assert!(session.substituted);
        assert_eq!(session.mesh, Some(Mesh::placeholder_cube()));
        assert!(!matches!(session.status, ViewerStatus::Failed(_)));
    }

    #[test]
    fn parse_failure_is_ready_with_placeholder() {
        let mut session = ViewerSession::open("/d/m.obj", "m.obj");
        session.asset_loaded(b"f 1 2 9999\n");
        assert!(session.is_ready());
        assert!(session.substituted);
    }

    #[test]
    fn fetch_failure_is_ready_with_placeholder() {
        let mut session = ViewerSession::open("/d/m.obj", "m.obj");
        session.asset_unavailable();
        assert!(session.is_ready());
        assert!(session.substituted);
    }

    #[test]
    fn bootstrap_failure_is_terminal() {
        let mut session = ViewerSession::open("/d/m.obj", "m.obj");
        session.bootstrap_failed("no adapter");
        assert_eq!(session.status, ViewerStatus::Failed("no adapter".into()));
        assert!(!session.wants_frames());
    }

    #[test]
    fn close_mid_initializing_is_a_plain_drop() {
        let session = Some(ViewerSession::open("/d/m.obj", "m.obj"));
        drop(session);
    }
}
