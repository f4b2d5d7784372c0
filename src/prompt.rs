use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use rand::{seq::SliceRandom, RngCore};

use crate::chunk::{chunk_text, SEGMENT_CAP};
use crate::error::{Error, Result};

static PROMPTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/prompts");

const PROMPT_EXTENSION: &str = "txt";

/// Prompt name -> ordered segments, iterated alphabetically.
pub type PromptMap = BTreeMap<String, Vec<String>>;

/// Supplies the segment queues a round is played over.
///
/// Segments are already chunked to at most [`SEGMENT_CAP`] chars.
pub trait PromptSource {
    fn prompts(&self) -> PromptMap;

    fn prompt(&self, name: &str) -> Option<Vec<String>> {
        self.prompts().remove(name)
    }

    /// A uniformly chosen prompt, or an empty list if there are none.
    fn random_prompt(&self, rng: &mut dyn RngCore) -> Vec<String> {
        let mut prompts = self.prompts();
        let names: Vec<String> = prompts.keys().cloned().collect();
        match names.choose(rng) {
            Some(name) => prompts.remove(name).unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

/// Prompts read from `*.txt` files in a directory.
#[derive(Debug, Clone, Default)]
pub struct DirPromptSource {
    prompts: PromptMap,
}

impl DirPromptSource {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        tracing::info!(dir = %dir.display(), "loading prompt files");

        let entries = fs::read_dir(dir).map_err(|source| Error::PromptDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut prompts = PromptMap::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "skipping directory entry");
                    continue;
                }
            };
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !name.to_lowercase().ends_with(PROMPT_EXTENSION) {
                continue;
            }
            if prompts.contains_key(name) {
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(text) => {
                    prompts.insert(name.to_string(), chunk_text(&text, SEGMENT_CAP));
                }
                Err(err) => {
                    tracing::warn!(file = %path.display(), error = %err, "skipping prompt file");
                }
            }
        }

        tracing::info!(count = prompts.len(), "loaded prompt files");
        Ok(Self { prompts })
    }
}

impl PromptSource for DirPromptSource {
    fn prompts(&self) -> PromptMap {
        self.prompts.clone()
    }
}

/// Prompts compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPromptSource;

impl PromptSource for EmbeddedPromptSource {
    fn prompts(&self) -> PromptMap {
        PROMPTS_DIR
            .files()
            .filter_map(|file| {
                let name = file.path().file_name()?.to_str()?;
                let text = file.contents_utf8()?;
                Some((name.to_string(), chunk_text(text, SEGMENT_CAP)))
            })
            .collect()
    }
}

/// Fixed in-memory prompts, e.g. a prompt given on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticPromptSource {
    prompts: PromptMap,
}

impl StaticPromptSource {
    pub fn new(prompts: PromptMap) -> Self {
        Self { prompts }
    }

    pub fn from_text(name: &str, text: &str) -> Self {
        let mut prompts = PromptMap::new();
        prompts.insert(name.to_string(), chunk_text(text, SEGMENT_CAP));
        Self { prompts }
    }
}

impl PromptSource for StaticPromptSource {
    fn prompts(&self) -> PromptMap {
        self.prompts.clone()
    }
}
