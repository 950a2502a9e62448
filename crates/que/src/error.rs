//! Errors surfaced by the render pipeline and the CLI.

use std::path::PathBuf;

use que_relief::EvalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("no element matches `{0}`")]
    MountTargetMissing(String),

    #[error("invalid step `{step}`: {message}")]
    Step { step: String, message: String },
}

impl RenderError {
    pub fn step(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Step {
            step: step.into(),
            message: message.into(),
        }
    }
}
