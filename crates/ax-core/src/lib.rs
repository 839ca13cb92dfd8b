pub mod artifact;
pub mod error;
pub mod response;

pub use artifact::{ArtifactFile, GenerationResult};
pub use error::GenError;
pub use response::{ImageResponse, ModelResponse};
