pub mod camera;
pub mod mesh;
pub mod renderer;
pub mod session;

pub use camera::Camera;
pub use mesh::{LoadOutcome, LoadedAsset, Mesh};
pub use renderer::{MeshRenderer, RenderRuntime};
pub use session::{ViewerSession, ViewerStatus};
