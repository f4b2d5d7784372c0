use std::collections::VecDeque;

use rand::RngCore;

use crate::difficulty::Difficulty;
use crate::error::Result;
use crate::prompt::PromptSource;
use crate::sprite::SpriteSheet;
use crate::tick::{self, TickDriver};

/// Visible width of the track the sprite runs along.
pub const TRACK_WIDTH: u32 = 600;
/// Extra travel off the left edge before the sprite reappears.
pub const TRACK_OFFSET: u32 = 200;
pub const TRACK_SPAN: u32 = TRACK_OFFSET + TRACK_WIDTH;

pub const EMPTY_SOURCE_SENTINEL: &str = "The current text file is empty.";

pub const BACKSPACE: char = '\u{8}';
/// Keycode of the shift key; never inserted into the buffer.
pub const SHIFT: char = '\u{10}';

const STARTING_LIVES: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    Lost,
}

/// Read-only snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundView {
    pub prompt: Option<String>,
    pub input: String,
    pub error: bool,
    pub lives: i32,
    pub remaining: usize,
    pub position: u32,
    pub frame: usize,
    pub started: bool,
}

/// One play session: the prompt queue being typed and the running sprite.
#[derive(Debug, Clone)]
pub struct Round {
    queue: VecDeque<String>,
    input: String,
    lives: i32,
    error: bool,
    difficulty: Difficulty,
    position: u32,
    frame: usize,
    started: bool,
    driver: TickDriver,
    outcome: Option<RoundOutcome>,
    sheet: SpriteSheet,
}

impl Round {
    pub fn new(sheet: SpriteSheet) -> Self {
        let mut round = Self {
            queue: VecDeque::new(),
            input: String::new(),
            lives: STARTING_LIVES,
            error: false,
            difficulty: Difficulty::default(),
            position: 0,
            frame: 0,
            started: false,
            driver: TickDriver::default(),
            outcome: None,
            sheet,
        };
        round.reset();
        round
    }

    /// Back to a fresh, unstarted round over the sentinel prompt.
    /// Difficulty is kept.
    pub fn reset(&mut self) {
        self.position = 0;
        self.lives = STARTING_LIVES;
        self.driver.stop();
        self.started = false;
        self.error = false;
        self.outcome = None;
        self.set_prompt(&[]);
        self.input.clear();
        self.frame = 0;
    }

    /// Takes a private copy of `segments`; an empty list installs the sentinel.
    pub fn set_prompt(&mut self, segments: &[String]) {
        self.queue = if segments.is_empty() {
            VecDeque::from([EMPTY_SOURCE_SENTINEL.to_string()])
        } else {
            segments.iter().cloned().collect()
        };
    }

    pub fn set_difficulty(&mut self, index: usize) -> Result<()> {
        self.difficulty = Difficulty::from_index(index)?;
        tracing::debug!(difficulty = %self.difficulty, step = self.step(), "difficulty set");
        Ok(())
    }

    /// Handles one typed character.
    pub fn on_key(&mut self, c: char) -> Option<RoundOutcome> {
        if self.outcome.is_some() {
            return None;
        }

        if !self.started {
            self.started = true;
            self.driver.start();
            tracing::info!(difficulty = %self.difficulty, segments = self.queue.len(), "round started");
        }

        match c {
            BACKSPACE => {
                self.input.pop();
            }
            SHIFT => {}
            c => self.input.push(c),
        }

        self.check_input()
    }

    fn check_input(&mut self) -> Option<RoundOutcome> {
        let segment = self.queue.front()?;
        let typed = self.input.chars().count();
        let expected = segment.chars().count();

        if self.input == *segment {
            self.queue.pop_front();
            self.lives += 1;
            self.error = false;

            if self.queue.is_empty() {
                self.driver.stop();
                return self.finish(RoundOutcome::Won);
            }
            self.input.clear();
        } else if typed < expected {
            self.error = !segment.starts_with(self.input.as_str());
        } else {
            self.error = true;
        }

        None
    }

    /// One period of the animation loop. Ignored while the driver is stopped.
    pub fn on_tick(&mut self) -> Option<RoundOutcome> {
        if !self.driver.is_running() || self.outcome.is_some() {
            return None;
        }

        let (position, lapped) = tick::advance(self.position, self.step());
        self.position = position;

        if lapped {
            self.lives -= 1;
            tracing::debug!(lives = self.lives, "missed a lap");
        }

        if self.lives <= 0 {
            self.driver.stop();
            return self.finish(RoundOutcome::Lost);
        }

        self.frame = (self.frame + 1) % self.sheet.len();
        None
    }

    /// Gives up on a round in progress.
    pub fn abort(&mut self) -> Option<RoundOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.driver.stop();
        self.finish(RoundOutcome::Lost)
    }

    fn finish(&mut self, outcome: RoundOutcome) -> Option<RoundOutcome> {
        tracing::info!(?outcome, lives = self.lives, remaining = self.queue.len(), "round finished");
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn view(&self) -> RoundView {
        RoundView {
            prompt: self.queue.front().cloned(),
            input: self.input.clone(),
            error: self.error,
            lives: self.lives,
            remaining: self.queue.len(),
            position: self.position,
            frame: self.frame,
            started: self.started,
        }
    }

    pub fn step(&self) -> u32 {
        self.difficulty.step()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn driver(&self) -> &TickDriver {
        &self.driver
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn current_segment(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Builds rounds from an injected prompt source and sprite sheet.
pub struct RoundFactory {
    source: Box<dyn PromptSource>,
    sheet: SpriteSheet,
    difficulty: Difficulty,
}

impl RoundFactory {
    pub fn new(source: Box<dyn PromptSource>, sheet: SpriteSheet, difficulty: Difficulty) -> Self {
        Self {
            source,
            sheet,
            difficulty,
        }
    }

    pub fn source(&self) -> &dyn PromptSource {
        self.source.as_ref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// A round over a randomly chosen prompt.
    pub fn new_round(&self, rng: &mut dyn RngCore) -> Result<Round> {
        let segments = self.source.random_prompt(rng);
        self.build(&segments)
    }

    /// A round over the named prompt, or the sentinel if it is unknown.
    pub fn round_for(&self, name: &str) -> Result<Round> {
        let segments = self.source.prompt(name).unwrap_or_default();
        self.build(&segments)
    }

    fn build(&self, segments: &[String]) -> Result<Round> {
        let mut round = Round::new(self.sheet.clone());
        round.set_prompt(segments);
        round.set_difficulty(self.difficulty.index())?;
        Ok(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::prompt::{PromptMap, StaticPromptSource};
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};

    fn round_with(segments: &[&str]) -> Round {
        let mut round = Round::new(SpriteSheet::dino());
        let segments: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
        round.set_prompt(&segments);
        round
    }

    fn type_str(round: &mut Round, text: &str) -> Option<RoundOutcome> {
        let mut outcome = None;
        for c in text.chars() {
            if let Some(o) = round.on_key(c) {
                outcome = Some(o);
            }
        }
        outcome
    }

    #[test]
    fn new_round_is_reset() {
        let round = Round::new(SpriteSheet::dino());
        let view = round.view();

        assert_eq!(view.prompt.as_deref(), Some(EMPTY_SOURCE_SENTINEL));
        assert_eq!(view.remaining, 1);
        assert_eq!(view.lives, 1);
        assert!(!view.error);
        assert_eq!(view.position, 0);
        assert_eq!(view.frame, 0);
        assert!(!view.started);
        assert!(!round.driver().is_running());
        assert_eq!(round.outcome(), None);
    }

    #[test]
    fn first_keystroke_starts_driver() {
        let mut round = round_with(&["cat"]);
        assert!(!round.driver().is_running());
        round.on_key('c');
        assert!(round.has_started());
        assert!(round.driver().is_running());
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut round = round_with(&["cat"]);
        for _ in 0..1000 {
            assert_eq!(round.on_tick(), None);
        }
        assert_eq!(round.view().position, 0);
        assert_eq!(round.lives(), 1);
    }

    #[test]
    fn prefix_tracks_error_flag() {
        let segment = "Hello, world";
        let prefixes = ["H", "He", "Hel", "Hello, wor"];
        for prefix in prefixes {
            let mut round = round_with(&[segment]);
            type_str(&mut round, prefix);
            assert!(!round.has_error(), "{prefix:?} should be a valid prefix");
        }

        for wrong in ["h", "Hx", "Hello,  ", "hello"] {
            let mut round = round_with(&[segment]);
            type_str(&mut round, wrong);
            assert!(round.has_error(), "{wrong:?} should be flagged");
        }
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        let mut round = round_with(&["Cat"]);
        round.on_key('c');
        assert!(round.has_error());
    }

    #[test]
    fn exact_match_pops_segment_and_gains_life() {
        let mut round = round_with(&["ab", "cd"]);
        assert_eq!(type_str(&mut round, "ab"), None);

        let view = round.view();
        assert_eq!(view.lives, 2);
        assert_eq!(view.remaining, 1);
        assert_eq!(view.prompt.as_deref(), Some("cd"));
        assert_eq!(view.input, "");
        assert!(!view.error);
    }

    #[test]
    fn next_segment_is_checked_after_pop() {
        let mut round = round_with(&["ab", "cd"]);
        type_str(&mut round, "abx");
        assert!(round.has_error());
        round.on_key(BACKSPACE);
        assert!(!round.has_error());
        assert_eq!(type_str(&mut round, "cd"), Some(RoundOutcome::Won));
        assert!(!round.has_error());
    }

    #[test]
    fn overflow_is_always_an_error() {
        let mut round = round_with(&["ab"]);
        round.on_key('a');
        round.on_key('x');
        round.on_key('y');
        assert!(round.has_error());
        assert_eq!(round.input(), "axy");

        // still an error at the prompt's length with a wrong char
        round.on_key(BACKSPACE);
        assert!(round.has_error());

        // back to a valid prefix
        round.on_key(BACKSPACE);
        assert!(!round.has_error());
        assert_eq!(round.input(), "a");
    }

    #[test]
    fn backspace_on_empty_buffer_is_noop() {
        let mut round = round_with(&["ab"]);
        round.on_key(BACKSPACE);
        assert_eq!(round.input(), "");
        assert!(!round.has_error());
        assert!(round.has_started());
    }

    #[test]
    fn shift_keycode_is_not_inserted() {
        let mut round = round_with(&["AB"]);
        round.on_key(SHIFT);
        round.on_key('A');
        round.on_key(SHIFT);
        assert_eq!(round.input(), "A");
        assert!(!round.has_error());
    }

    #[test]
    fn other_control_chars_are_inserted() {
        let mut round = round_with(&["ab"]);
        round.on_key('\t');
        assert_eq!(round.input(), "\t");
        assert!(round.has_error());
    }

    #[test]
    fn documented_scenario_wins_once() {
        let mut round = round_with(&["cat-", "dog"]);
        round.set_difficulty(0).unwrap();

        for c in ['c', 'a', 't'] {
            assert_eq!(round.on_key(c), None);
            assert!(!round.has_error());
        }
        assert_eq!(round.on_key('-'), None);
        assert_eq!(round.lives(), 2);
        assert_eq!(round.input(), "");

        assert_eq!(round.on_key('d'), None);
        assert_eq!(round.on_key('o'), None);
        assert_eq!(round.on_key('g'), Some(RoundOutcome::Won));
        assert_eq!(round.lives(), 3);
        assert!(!round.driver().is_running());

        // nothing fires after the round is over
        assert_eq!(round.on_key('x'), None);
        assert_eq!(round.on_tick(), None);
        assert_eq!(round.abort(), None);
        assert_eq!(round.outcome(), Some(RoundOutcome::Won));
    }

    #[test]
    fn lap_costs_a_life_regardless_of_typing() {
        let mut round = round_with(&["a long prompt", "second"]);
        round.set_difficulty(3).unwrap();
        let step = round.step();
        type_str(&mut round, "a long prompt");
        assert_eq!(round.lives(), 2);

        let ticks_per_lap = TRACK_SPAN / step;
        for _ in 0..ticks_per_lap - 1 {
            assert_eq!(round.on_tick(), None);
        }
        assert_eq!(round.lives(), 2);

        assert_eq!(round.on_tick(), None);
        assert_eq!(round.lives(), 1);
        assert_eq!(round.view().position, 0);
    }

    #[test]
    fn lap_decay_matches_wrap_condition() {
        let mut round = round_with(&["zzz"]);
        round.set_difficulty(1).unwrap();
        round.on_key('z');
        // gain lives so the round survives several laps
        round.lives = 10;

        for _ in 0..500 {
            let before = round.lives();
            let position = round.view().position;
            let wraps = (position + round.step()) % TRACK_SPAN < round.step();
            round.on_tick();
            let expected = if wraps { before - 1 } else { before };
            assert_eq!(round.lives(), expected);
        }
    }

    #[test]
    fn losing_all_lives_fires_lost_once() {
        let mut round = round_with(&["never typed"]);
        round.set_difficulty(3).unwrap();
        round.on_key('n');

        let mut outcomes = Vec::new();
        for _ in 0..200 {
            if let Some(o) = round.on_tick() {
                outcomes.push(o);
            }
        }

        assert_eq!(outcomes, vec![RoundOutcome::Lost]);
        assert_eq!(round.lives(), 0);
        assert!(!round.driver().is_running());
        assert_eq!(round.on_key('e'), None);
    }

    #[test]
    fn losing_tick_does_not_advance_frame() {
        let mut round = round_with(&["x"]);
        round.set_difficulty(3).unwrap();
        round.on_key('y');

        let ticks_per_lap = (TRACK_SPAN / round.step()) as usize;
        for _ in 0..ticks_per_lap - 1 {
            round.on_tick();
        }
        let frame = round.view().frame;
        assert_eq!(round.on_tick(), Some(RoundOutcome::Lost));
        assert_eq!(round.view().frame, frame);
    }

    #[test]
    fn frame_wraps_with_sheet_length() {
        let sheet = SpriteSheet::new(vec![vec!["a".into()], vec!["b".into()], vec!["c".into()]])
            .unwrap();
        let mut round = Round::new(sheet);
        round.on_key('T');
        let frames: Vec<usize> = (0..5)
            .map(|_| {
                round.on_tick();
                round.view().frame
            })
            .collect();
        assert_eq!(frames, vec![1, 2, 0, 1, 2]);
    }

    #[test]
    fn set_prompt_takes_a_private_copy() {
        let mut source = vec!["one".to_string(), "two".to_string()];
        let mut round = Round::new(SpriteSheet::dino());
        round.set_prompt(&source);

        source[0].push_str(" changed");
        source.clear();

        assert_eq!(round.current_segment(), Some("one"));
        assert_eq!(round.view().remaining, 2);
    }

    #[test]
    fn completed_round_leaves_source_intact() {
        let mut map = PromptMap::new();
        map.insert("p".into(), vec!["hi".into()]);
        let factory = RoundFactory::new(
            Box::new(StaticPromptSource::new(map)),
            SpriteSheet::dino(),
            Difficulty::Easy,
        );

        let mut first = factory.round_for("p").unwrap();
        assert_eq!(type_str(&mut first, "hi"), Some(RoundOutcome::Won));

        let second = factory.round_for("p").unwrap();
        assert_eq!(second.current_segment(), Some("hi"));
        assert_eq!(second.view().remaining, 1);
    }

    #[test]
    fn empty_prompt_installs_sentinel() {
        let mut round = round_with(&["x"]);
        round.set_prompt(&[]);
        assert_eq!(round.current_segment(), Some(EMPTY_SOURCE_SENTINEL));
    }

    #[test]
    fn invalid_difficulty_leaves_state_untouched() {
        let mut round = round_with(&["abc"]);
        round.set_difficulty(2).unwrap();
        round.on_key('a');
        let before = round.view();

        assert_matches!(
            round.set_difficulty(4),
            Err(Error::InvalidDifficulty { index: 4, len: 4 })
        );
        assert_eq!(round.view(), before);
        assert_eq!(round.difficulty(), Difficulty::Hard);
        assert_eq!(round.step(), 15);
    }

    #[test]
    fn reset_stops_driver_and_keeps_difficulty() {
        let mut round = round_with(&["abc"]);
        round.set_difficulty(1).unwrap();
        type_str(&mut round, "ax");
        round.on_tick();
        round.reset();

        let view = round.view();
        assert!(!round.driver().is_running());
        assert!(!view.started);
        assert_eq!(view.input, "");
        assert_eq!(view.position, 0);
        assert_eq!(view.frame, 0);
        assert!(!view.error);
        assert_eq!(view.prompt.as_deref(), Some(EMPTY_SOURCE_SENTINEL));
        assert_eq!(round.difficulty(), Difficulty::Medium);

        // reset twice is fine
        round.reset();
        assert!(!round.driver().is_running());
    }

    #[test]
    fn abort_ends_round_as_lost() {
        let mut round = round_with(&["abc"]);
        round.on_key('a');
        assert_eq!(round.abort(), Some(RoundOutcome::Lost));
        assert!(!round.driver().is_running());
        assert_eq!(round.abort(), None);
    }

    #[test]
    fn factory_applies_difficulty_and_random_prompt() {
        let mut map = PromptMap::new();
        map.insert("only".into(), vec!["seg".into()]);
        let factory = RoundFactory::new(
            Box::new(StaticPromptSource::new(map)),
            SpriteSheet::dino(),
            Difficulty::VeryHard,
        );
        let mut rng = StdRng::seed_from_u64(1);

        let round = factory.new_round(&mut rng).unwrap();
        assert_eq!(round.current_segment(), Some("seg"));
        assert_eq!(round.difficulty(), Difficulty::VeryHard);
        assert_eq!(round.step(), 20);
    }

    #[test]
    fn factory_unknown_prompt_uses_sentinel() {
        let factory = RoundFactory::new(
            Box::new(StaticPromptSource::default()),
            SpriteSheet::dino(),
            Difficulty::Easy,
        );
        let round = factory.round_for("missing").unwrap();
        assert_eq!(round.current_segment(), Some(EMPTY_SOURCE_SENTINEL));
    }
}
