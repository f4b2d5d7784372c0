pub mod screen;

use dinotype::{round::RoundView, sprite::SpriteSheet, RoundOutcome};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{App, MenuItem};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const GAME_NAME: &str = "Dino Type";

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn italic_dim() -> Style {
    Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM)
}

/// Left column of the sprite for a track position.
///
/// The whole span maps onto the area plus the sprite's own width, so a
/// wrap puts the sprite just off the left edge.
pub fn sprite_column(position: u32, area_width: u16, sprite_width: usize) -> i32 {
    let travel = area_width as i64 + sprite_width as i64;
    let column = position as i64 * travel / dinotype::round::TRACK_SPAN as i64;
    (column - sprite_width as i64) as i32
}

struct Sprite<'a> {
    sheet: &'a SpriteSheet,
    frame: usize,
    column: i32,
}

impl Widget for Sprite<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
        for (row, line) in self.sheet.frame(self.frame).iter().enumerate() {
            if row as u16 >= area.height {
                break;
            }
            for (offset, ch) in line.chars().enumerate() {
                let col = self.column + offset as i32;
                if ch == ' ' || col < 0 || col >= area.width as i32 {
                    continue;
                }
                let position = (area.x + col as u16, area.y + row as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
    }
}

pub fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // difficulty status
            Constraint::Length(2), // last outcome
            Constraint::Min(MenuItem::ALL.len() as u16),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(GAME_NAME, bold().fg(Color::White)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(app.status.as_str(), bold()))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if let Some(outcome) = app.last_outcome {
        let banner = match outcome {
            RoundOutcome::Won => Span::styled("You outran the dino!", bold().fg(Color::Green)),
            RoundOutcome::Lost => Span::styled("Out of laps.", bold().fg(Color::Red)),
        };
        Paragraph::new(banner)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    let items: Vec<Line> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if idx == app.menu_index {
                Line::from(Span::styled(
                    format!("> {} <", item.label()),
                    bold().fg(Color::Black).bg(Color::White),
                ))
            } else {
                Line::from(Span::raw(item.label()))
            }
        })
        .collect();
    Paragraph::new(items)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(↑/↓) move / (enter) select / (1-4) difficulty / (esc)ape",
        italic_dim(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

pub fn render_selection(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let lines: Vec<Line> = if app.prompt_names.is_empty() {
        vec![Line::from(Span::styled("no prompts available", italic_dim()))]
    } else {
        app.prompt_names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if idx == app.selection_index {
                    Line::from(Span::styled(
                        format!("> {name}"),
                        bold().fg(Color::Black).bg(Color::White),
                    ))
                } else {
                    Line::from(format!("  {name}"))
                }
            })
            .collect()
    };

    // keep the highlighted entry on screen
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = app.selection_index.saturating_sub(visible.saturating_sub(1));

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Prompts"))
        .scroll((scroll as u16, 0))
        .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(↑/↓) move / (enter) play / (b)ack",
        italic_dim(),
    ))
    .render(chunks[1], buf);
}

pub fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let view: RoundView = app.round.view();
    let sheet = app.round.sheet();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),                   // laps / segments
            Constraint::Length(sheet.height() as u16), // track
            Constraint::Min(1),
            Constraint::Length(2), // prompt
            Constraint::Length(2), // input
            Constraint::Length(1), // legend
        ])
        .split(area);

    let status = format!(
        "Laps left: {}   Segments left: {}   {}",
        view.lives,
        view.remaining,
        app.round.difficulty()
    );
    Paragraph::new(Span::styled(status, bold()))
        .block(Block::default().padding(ratatui::widgets::Padding::horizontal(HORIZONTAL_MARGIN)))
        .render(chunks[0], buf);

    Sprite {
        sheet,
        frame: view.frame,
        column: sprite_column(view.position, chunks[1].width, sheet.width()),
    }
    .render(chunks[1], buf);

    let text_area = |chunk: Rect| Rect {
        x: chunk.x + HORIZONTAL_MARGIN.min(chunk.width / 2),
        width: chunk.width.saturating_sub(HORIZONTAL_MARGIN * 2),
        ..chunk
    };

    if let Some(prompt) = view.prompt.as_deref() {
        Paragraph::new(Span::styled(prompt, bold().add_modifier(Modifier::DIM)))
            .wrap(Wrap { trim: false })
            .render(text_area(chunks[3]), buf);
    }

    let input_style = if view.error {
        bold().fg(Color::Red)
    } else {
        bold().fg(Color::White)
    };
    let mut spans = vec![Span::styled(
        view.input.replace('\t', "→").replace('\n', "⏎"),
        input_style,
    )];
    spans.push(Span::styled(
        " ",
        Style::default().add_modifier(Modifier::UNDERLINED),
    ));
    Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .render(text_area(chunks[4]), buf);

    let legend = if view.started {
        "(esc) give up"
    } else {
        "start typing to set the dino running / (esc) give up"
    };
    Paragraph::new(Span::styled(legend, italic_dim()))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}
