use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};

const DINO_FRAMES: [[&str; 4]; 4] = [
    [
        "          __ ",
        "         / _)",
        " .-^^^-/ /   ",
        "/ |  |__/    ",
    ],
    [
        "          __ ",
        "         / _)",
        " .-^^^-/ /   ",
        "/  |  /\\     ",
    ],
    [
        "          __ ",
        "         / _)",
        " .-^^^-/ /   ",
        "/   \\_| \\    ",
    ],
    [
        "          __ ",
        "         / _)",
        " .-^^^-/ /   ",
        "/  /  |      ",
    ],
];

/// Ordered animation frames, each a block of text lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    frames: Vec<Vec<String>>,
}

impl SpriteSheet {
    pub fn new(frames: Vec<Vec<String>>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::EmptySpriteSheet);
        }
        Ok(Self { frames })
    }

    /// The running dinosaur.
    pub fn dino() -> Self {
        Self {
            frames: DINO_FRAMES
                .iter()
                .map(|frame| frame.iter().map(|line| line.to_string()).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> &[String] {
        &self.frames[index % self.frames.len()]
    }

    /// Widest line across all frames, in terminal columns.
    pub fn width(&self) -> usize {
        self.frames
            .iter()
            .flatten()
            .map(|line| line.width())
            .max()
            .unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.frames.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::dino()
    }
}
