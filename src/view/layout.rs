//! Layout rendering (screen tabs and search box)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph, Tabs},
    Frame,
};

use crate::model::{ContentState, Screen, UiState};
use super::utils::Palette;

pub fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    palette: &Palette,
) {
    let screen = ui_state.screen;
    let constraints = if screen.has_search() {
        [Constraint::Min(0), Constraint::Percentage(40)]
    } else {
        [Constraint::Min(0), Constraint::Length(0)]
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    render_tabs(frame, chunks[0], screen, palette);

    if screen.has_search() {
        render_search_box(frame, chunks[1], ui_state, search_query(content_state, screen), palette);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, screen: Screen, palette: &Palette) {
    let titles: Vec<Line> = Screen::ALL.iter().map(|s| Line::from(s.title())).collect();
    let selected = Screen::ALL.iter().position(|s| *s == screen).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(palette.text))
        .highlight_style(Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
        .divider("|")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" saavn-rs ")
                .title_style(palette.header_style()),
        );
    frame.render_widget(tabs, area);
}

fn render_search_box(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    query: &str,
    palette: &Palette,
) {
    let focused = ui_state.search_focused;

    let (text, style) = if focused {
        (format!("{query}_"), Style::default().fg(palette.accent))
    } else if query.is_empty() {
        ("Press / to search...".to_string(), Style::default().fg(palette.muted))
    } else {
        (query.to_string(), Style::default().fg(palette.text))
    };

    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Search {} ", ui_state.screen.title()))
            .padding(Padding::horizontal(1))
            .border_style(palette.border(focused)),
    );
    frame.render_widget(search, area);
}

fn search_query(content_state: &ContentState, screen: Screen) -> &str {
    match screen {
        Screen::Songs => &content_state.songs.query,
        Screen::Artists => &content_state.artists.query,
        Screen::Albums => &content_state.albums.query,
        _ => "",
    }
}
