use std::path::PathBuf;

/// Errors raised while loading game data or setting up the window.
///
/// Most of these never leave the load phase: the loaders log them and skip the
/// offending entry. Only `ArchiveOpen` reaches the caller, which then runs the
/// engine in its "data not found" mode.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to open archive {path:?}: {reason}")]
    ArchiveOpen { path: PathBuf, reason: String },

    #[error("failed to read archive entry {name:?}: {reason}")]
    EntryRead { name: String, reason: String },

    #[error("archive has no entry named {0:?}")]
    MissingEntry(String),

    #[error("failed to parse document: {0}")]
    DocumentParse(String),

    #[error("image {0:?} is not in the asset table")]
    UnresolvedAsset(String),

    #[error("failed to decode image {path:?}: {source}")]
    ImageDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to pack {path:?}: {reason}")]
    Pack { path: PathBuf, reason: String },

    #[error("graphics setup failed: {0}")]
    Graphics(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::DocumentParse(err.message().to_string())
    }
}

impl From<std::str::Utf8Error> for EngineError {
    fn from(err: std::str::Utf8Error) -> Self {
        EngineError::DocumentParse(format!("not valid UTF-8: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
