use std::path::PathBuf;
use thiserror::Error;

/// Failures of the in-memory document engine. No I/O is involved, so none of
/// these carry a file path; [`UdlError::Document`] adds it.
#[derive(Debug, Error, PartialEq)]
pub enum DocumentError {
    #[error("Failed to parse content as {format}: {reason}")]
    Parse {
        format: &'static str,
        reason: String,
    },

    #[error("Failed to serialize document as {format}: {reason}")]
    Serialize {
        format: &'static str,
        reason: String,
    },

    #[error("Failed to navigate to desired location '{accessor}': {reason}")]
    Navigation { accessor: String, reason: String },

    #[error("Invalid accessor '{accessor}': {reason}")]
    PathShape { accessor: String, reason: String },

    #[error(
        "Index {index} in '{accessor}' is outside the existing sequence (sequence has {len} elements)"
    )]
    OutOfBounds {
        accessor: String,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Error)]
pub enum UdlError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to update {path}: {source}")]
    Document {
        path: PathBuf,
        source: DocumentError,
    },

    #[error("Content for {path} is not valid base64: {source}")]
    Decode {
        path: PathBuf,
        source: base64::DecodeError,
    },

    #[error("Environment variable \"{env_var}\" is not a valid directive: {reason}")]
    MalformedDirective { env_var: String, reason: String },

    #[error("Environment variable \"{env_var}\" failed: {source}")]
    Directive {
        env_var: String,
        source: Box<UdlError>,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("Failed waiting for {program}: {source}")]
    Wait {
        program: String,
        source: std::io::Error,
    },
}

impl UdlError {
    /// Attach the name of the environment variable that produced this error.
    pub fn in_directive(self, env_var: &str) -> Self {
        UdlError::Directive {
            env_var: env_var.to_string(),
            source: Box::new(self),
        }
    }

    /// Render the message shown when the launcher gives up.
    ///
    /// File system failures are by far the most common problem in containers
    /// (the image user cannot write to the target path), so those name the
    /// variable, operation, path and OS error explicitly.
    pub fn report(&self) -> String {
        if let UdlError::Directive { env_var, source } = self {
            let io = match source.as_ref() {
                UdlError::Read { path, source } => Some(("read", path, source)),
                UdlError::Write { path, source } => Some(("write", path, source)),
                _ => None,
            };
            if let Some((op, path, cause)) = io {
                return format!(
                    "Environment variable \"{env_var}\" ran operation \"{op}\" that failed at path \"{}\" with error \"{cause}\". \
                     This is usually a permission error. Make sure the container user has permission to this path.",
                    path.display()
                );
            }
        }
        self.to_string()
    }
}
