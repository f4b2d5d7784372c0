use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("difficulty index {index} is out of bounds (expected 0..{len})")]
    InvalidDifficulty { index: usize, len: usize },

    #[error("sprite sheet has no frames")]
    EmptySpriteSheet,

    #[error("prompts directory {path} is not readable: {source}")]
    PromptDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
