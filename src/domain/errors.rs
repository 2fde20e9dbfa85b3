use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that end a run with a non-zero exit status.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("GOOGLE_API_KEY is required")]
    MissingCredential,

    #[error("could not read manifest {}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read README {}", .path.display())]
    ReadmeUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error generating updated README content")]
    Generation(#[from] GenerationError),

    #[error("generation service returned no content, aborting update")]
    EmptyResponse,

    #[error("could not write README {}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to generation service failed")]
    Http(#[from] reqwest::Error),

    #[error("generation service answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}
