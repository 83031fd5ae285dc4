//! Terminal UI rendering with ratatui

use crate::game::Game;
use crate::grid::{COLUMNS, ROWS};
use crate::menu::{Menu, MenuItem, MenuItemType, MenuScreen, NameEntry};
use crate::shape::{ColorTag, Shape};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";
const FILLED: &str = "██";

/// board(22) + next/stats(16)
const GAME_WIDTH: u16 = 38;
/// board(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

/// Map a block's color tag to a terminal color
fn color_of(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Cyan => Color::Cyan,
        ColorTag::Yellow => Color::Yellow,
        ColorTag::Purple => Color::Magenta,
        ColorTag::Green => Color::Green,
        ColorTag::Red => Color::Red,
        ColorTag::Blue => Color::Blue,
        ColorTag::Orange => Color::Rgb(240, 126, 19),
    }
}

/// Render the main menu or the high score list
pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let area = frame.area();
    let menu_area = center_rect(area, 44, 18);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(menu_area);

    let title = match menu.screen {
        MenuScreen::Main => "BLOCKFALL",
        MenuScreen::HighScores => "HIGH SCORES",
    };
    let title = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(title, Style::default().fg(Color::Cyan).bold()),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = vec![Line::raw("")];
    for (i, item) in menu.items.iter().enumerate() {
        lines.push(render_menu_item(item, i == menu.selected));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "↑↓ Select | Enter Confirm",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render a single menu item based on its type
fn render_menu_item(item: &MenuItem, is_selected: bool) -> Line<'static> {
    match &item.item_type {
        MenuItemType::Button(_) => {
            let prefix = if is_selected { "▶ " } else { "  " };
            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            Line::styled(format!("{}{}", prefix, item.label), style)
        }
        MenuItemType::Label { text } if text.is_empty() => {
            Line::styled(item.label.clone(), Style::default().fg(Color::Gray))
        }
        MenuItemType::Label { text } => Line::from(vec![
            Span::styled(format!("{}  ", item.label), Style::default().fg(Color::Gray)),
            Span::styled(text.clone(), Style::default().fg(Color::Cyan)),
        ]),
    }
}

/// Render a game in progress, with an optional overlay on top
pub fn render_game(frame: &mut Frame, game: &Game, overlay: Overlay<'_>) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(16), // Next queue + stats
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(14), // Next queue
            Constraint::Min(8),     // Stats
        ])
        .split(main_layout[1]);

    render_next_queue(frame, right_layout[0], &game.preview());
    render_stats(frame, right_layout[1], game);

    match overlay {
        Overlay::None => {}
        Overlay::Paused => render_overlay(
            frame,
            area,
            "PAUSED",
            vec![Line::styled("Press P to resume", Style::default().fg(Color::Gray))],
        ),
        Overlay::GameOver(name) => {
            let summary = game.summary();
            render_overlay(
                frame,
                area,
                "GAME OVER",
                vec![
                    Line::styled(format!("Score {}", summary.score), Style::default().fg(Color::Yellow)),
                    Line::raw(""),
                    Line::from(vec![
                        Span::styled("Name: ", Style::default().fg(Color::Gray)),
                        Span::styled(name.value.clone(), Style::default().fg(Color::Green)),
                        Span::styled("_", Style::default().fg(Color::Yellow)),
                    ]),
                    Line::styled("Enter=Save | Esc=Skip", Style::default().fg(Color::DarkGray)),
                ],
            );
        }
    }
}

/// What to draw over the board
#[derive(Debug, Clone, Copy)]
pub enum Overlay<'a> {
    None,
    Paused,
    GameOver(&'a NameEntry),
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the next piece queue
fn render_next_queue(frame: &mut Frame, area: Rect, queue: &[Shape]) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(4); queue.len()])
        .split(inner);

    for (piece_area, &shape) in piece_areas.iter().zip(queue) {
        render_mini_piece(frame, *piece_area, shape);
    }
}

/// Render a small piece preview from its spawn template
fn render_mini_piece(frame: &mut Frame, area: Rect, shape: Shape) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let template = shape.template();
    let min_col = template.iter().map(|&(c, _)| c).min().unwrap_or(0);
    let max_col = template.iter().map(|&(c, _)| c).max().unwrap_or(0);
    let min_row = template.iter().map(|&(_, r)| r).min().unwrap_or(0);
    let max_row = template.iter().map(|&(_, r)| r).max().unwrap_or(0);
    let style = Style::default().fg(color_of(shape.color()));

    let lines: Vec<Line> = (min_row..=max_row)
        .map(|row| {
            let spans: Vec<Span> = (min_col..=max_col)
                .map(|col| {
                    if template.contains(&(col, row)) {
                        Span::styled(FILLED, style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Render the playfield with the active piece
fn render_board(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = game.active();
    let active_style = Style::default().fg(color_of(active.shape.color()));
    let positions = active.positions();

    let lines: Vec<Line> = (0..ROWS as i32)
        .map(|row| {
            let spans: Vec<Span> = (0..COLUMNS as i32)
                .map(|col| {
                    if positions.contains(&(row, col)) {
                        Span::styled(FILLED, active_style)
                    } else if let Some(locked) = game.grid.get(row, col) {
                        Span::styled(FILLED, Style::default().fg(color_of(locked.color())))
                    } else {
                        Span::styled("· ", Style::default().fg(Color::DarkGray))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let summary = game.summary();
    let label = |s: &'static str| Line::from(Span::styled(s, Style::default().fg(Color::Gray)));

    let lines = vec![
        label("SCORE"),
        Line::styled(summary.score.to_string(), Style::default().fg(Color::Yellow).bold()),
        label("LEVEL"),
        Line::styled(summary.level.to_string(), Style::default().fg(Color::Cyan)),
        label("LINES"),
        Line::styled(summary.lines.to_string(), Style::default().fg(Color::Green)),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a centred popup (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, body: Vec<Line<'static>>) {
    let popup_height = body.len() as u16 + 4;
    let popup_area = center_rect(area, 28, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
    ];
    text.extend(body);

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
