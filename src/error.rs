use std::fmt;

/// Errors produced while configuring or running a render pass.
///
/// Zero-area triangles are not errors; they contribute no pixels.
#[derive(Debug)]
pub enum RenderError {
    /// A direction that must be non-zero (look-at axis, up vector, light) is not.
    DegenerateVector(&'static str),
    /// A transform that has to be inverted is singular.
    SingularTransform(&'static str),
    /// A mesh could not be read or parsed.
    MeshLoad { path: String, reason: String },
    /// Image encoding or decoding failed.
    Image(image::ImageError),
    /// Plain I/O failure.
    Io(std::io::Error),
    /// Invalid configuration value.
    Config(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::DegenerateVector(what) => write!(f, "degenerate vector: {what}"),
            RenderError::SingularTransform(what) => write!(f, "singular transform: {what}"),
            RenderError::MeshLoad { path, reason } => {
                write!(f, "failed to load mesh '{path}': {reason}")
            }
            RenderError::Image(e) => write!(f, "image error: {e}"),
            RenderError::Io(e) => write!(f, "i/o error: {e}"),
            RenderError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Image(e) => Some(e),
            RenderError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Image(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}
