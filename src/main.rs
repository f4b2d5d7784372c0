pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use dinotype::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    prompt::{DirPromptSource, EmbeddedPromptSource, PromptSource, StaticPromptSource},
    round::{BACKSPACE, SHIFT},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    sprite::SpriteSheet,
    telemetry,
    Round, RoundFactory, RoundOutcome,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

const CUSTOM_PROMPT_NAME: &str = "custom";

/// typing race tui: keep up with the running dino by typing prompts verbatim
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type each prompt segment exactly while a dinosaur runs laps. Every finished segment earns a lap, every lap the dino completes costs one. Run out and the round is over."
)]
pub struct Cli {
    /// how fast the dino runs
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// directory of .txt files to use as prompts
    #[clap(short = 'P', long = "prompts")]
    prompts_dir: Option<PathBuf>,

    /// custom prompt to use; skips the menu and starts right away
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// write tracing output to $DINOTYPE_TRACE_LOG (default: temp dir)
    #[clap(long)]
    log: bool,

    /// use this config file instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// persist the effective difficulty, prompts dir and log setting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the stored config.
    fn merge(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(dir) = &self.prompts_dir {
            config.prompts_dir = Some(dir.clone());
        }
        config.log |= self.log;
        config
    }

    fn prompt_source(&self, config: &Config) -> dinotype::Result<Box<dyn PromptSource>> {
        if let Some(text) = &self.prompt {
            return Ok(Box::new(StaticPromptSource::from_text(
                CUSTOM_PROMPT_NAME,
                text,
            )));
        }
        match &config.prompts_dir {
            Some(dir) => Ok(Box::new(DirPromptSource::load(dir)?)),
            None => Ok(Box::new(EmbeddedPromptSource)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Menu,
    Selection,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuItem {
    Start,
    ChoosePrompt,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Start, MenuItem::ChoosePrompt, MenuItem::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Start => "Start Game",
            MenuItem::ChoosePrompt => "Choose Prompt",
            MenuItem::Exit => "Exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub factory: RoundFactory,
    pub round: Round,
    pub state: AppState,
    pub menu_index: usize,
    pub prompt_names: Vec<String>,
    pub selection_index: usize,
    pub last_outcome: Option<RoundOutcome>,
    pub status: String,
}

impl App {
    pub fn new(factory: RoundFactory) -> Self {
        let round = Round::new(SpriteSheet::dino());
        let prompt_names = factory.source().prompts().into_keys().collect();
        Self {
            factory,
            round,
            state: AppState::Menu,
            menu_index: 0,
            prompt_names,
            selection_index: 0,
            last_outcome: None,
            status: String::from("Type 1, 2, 3, or 4 to select difficulty"),
        }
    }

    pub fn start_random(&mut self) -> dinotype::Result<()> {
        self.round = self.factory.new_round(&mut rand::thread_rng())?;
        self.state = AppState::Playing;
        Ok(())
    }

    pub fn start_named(&mut self, name: &str) -> dinotype::Result<()> {
        self.round = self.factory.round_for(name)?;
        self.state = AppState::Playing;
        Ok(())
    }

    /// Navigation hand-off after a round ends either way.
    fn finish_round(&mut self, outcome: RoundOutcome) {
        self.last_outcome = Some(outcome);
        self.round.reset();
        self.state = AppState::Menu;
    }

    pub fn on_tick(&mut self) {
        if self.state != AppState::Playing {
            return;
        }
        if let Some(outcome) = self.round.on_tick() {
            self.finish_round(outcome);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> dinotype::Result<Flow> {
        if key.kind == KeyEventKind::Release {
            return Ok(Flow::Continue);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Flow::Quit);
        }

        match self.state {
            AppState::Menu => self.on_menu_key(key),
            AppState::Selection => self.on_selection_key(key),
            AppState::Playing => {
                self.on_game_key(key);
                Ok(Flow::Continue)
            }
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> dinotype::Result<Flow> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Flow::Quit),
            KeyCode::Up => self.menu_index = self.menu_index.saturating_sub(1),
            KeyCode::Down => self.menu_index = (self.menu_index + 1).min(MenuItem::ALL.len() - 1),
            KeyCode::Enter => match MenuItem::ALL[self.menu_index] {
                MenuItem::Start => self.start_random()?,
                MenuItem::ChoosePrompt => {
                    self.selection_index = 0;
                    self.state = AppState::Selection;
                }
                MenuItem::Exit => return Ok(Flow::Quit),
            },
            KeyCode::Char(c) => {
                if let Some(difficulty) = Difficulty::from_hotkey(c) {
                    self.factory.set_difficulty(difficulty);
                    self.status = format!("Selected {difficulty}");
                    tracing::info!(%difficulty, "difficulty selected");
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn on_selection_key(&mut self, key: KeyEvent) -> dinotype::Result<Flow> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => self.state = AppState::Menu,
            KeyCode::Up => self.selection_index = self.selection_index.saturating_sub(1),
            KeyCode::Down => {
                if self.selection_index + 1 < self.prompt_names.len() {
                    self.selection_index += 1;
                }
            }
            KeyCode::Enter => {
                // an empty list still starts a round, over the sentinel prompt
                let name = self
                    .prompt_names
                    .get(self.selection_index)
                    .cloned()
                    .unwrap_or_default();
                self.start_named(&name)?;
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn on_game_key(&mut self, key: KeyEvent) {
        let outcome = match key.code {
            KeyCode::Esc => self.round.abort(),
            _ => match typed_char(&key) {
                Some(c) => self.round.on_key(c),
                None => None,
            },
        };
        if let Some(outcome) = outcome {
            self.finish_round(outcome);
        }
    }
}

/// Maps a terminal key to the character the round sees.
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Backspace => Some(BACKSPACE),
        KeyCode::Enter => Some('\n'),
        KeyCode::Tab => Some('\t'),
        // terminals only report bare modifier presses under the kitty keyboard
        // protocol; elsewhere shift just arrives folded into the char
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            Some(SHIFT)
        }
        _ => None,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let config = cli.merge(store.load());

    telemetry::init_tracing(config.log, &AppDirs::trace_log_path());

    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "saved config");
    }

    let source = cli.prompt_source(&config)?;
    let factory = RoundFactory::new(source, SpriteSheet::dino(), config.difficulty);
    let mut app = App::new(factory);
    if cli.prompt.is_some() {
        app.start_named(CUSTOM_PROMPT_NAME)?;
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let ticker = FixedTicker::new(app.round.driver().interval());
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            GameEvent::Tick => {
                // only the animation needs a redraw on ticks
                if app.state == AppState::Playing && app.round.driver().is_running() {
                    app.on_tick();
                    terminal.draw(|f| ui::draw(app, f))?;
                }
            }
            GameEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            GameEvent::Closed => {
                tracing::warn!("terminal input closed, exiting");
                break;
            }
            GameEvent::Key(key) => {
                if app.on_key(key)? == Flow::Quit {
                    break;
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}
