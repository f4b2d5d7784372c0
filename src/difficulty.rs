use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::round::TRACK_WIDTH;

/// Sprite advance per tick, slowest first.
pub const DIFFICULTY_STEPS: [u32; 4] = [
    25 * TRACK_WIDTH / 3000,
    50 * TRACK_WIDTH / 3000,
    75 * TRACK_WIDTH / 3000,
    100 * TRACK_WIDTH / 3000,
];

#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    PartialEq,
    Eq,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    #[strum(serialize = "Very Hard")]
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidDifficulty {
                index,
                len: DIFFICULTY_STEPS.len(),
            })
    }

    pub fn index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
            Difficulty::VeryHard => 3,
        }
    }

    pub fn step(self) -> u32 {
        DIFFICULTY_STEPS[self.index()]
    }

    /// Menu hotkeys: '1' through '4'.
    pub fn from_hotkey(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| (d as usize).checked_sub(1))
            .and_then(|i| Self::from_index(i).ok())
    }
}
