//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::model::Theme;

/// Colors used by every widget, resolved from the active theme
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub header: Color,
    pub warning: Color,
    pub error: Color,
    pub background: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::Green,
                text: Color::White,
                muted: Color::DarkGray,
                header: Color::Cyan,
                warning: Color::Yellow,
                error: Color::Red,
                background: Color::Black,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                muted: Color::Gray,
                header: Color::Magenta,
                warning: Color::Rgb(180, 110, 0),
                error: Color::Red,
                background: Color::White,
            },
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default()
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header).add_modifier(Modifier::BOLD)
    }

    /// Row style for a list entry
    pub fn row(&self, selected: bool, focused: bool, playing: bool) -> Style {
        if selected && focused {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else if playing {
            Style::default().fg(self.header).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    pub fn panel<'a>(&self, title: &'a str, focused: bool) -> Block<'a> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(self.border(focused))
    }
}

pub fn render_scrollable_list(
    frame: &mut Frame,
    area: Rect,
    items: Vec<ListItem>,
    selected_index: usize,
    block: Block,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()); // Highlight handled by item styles

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Calculate width needed for index column (log10(n) + padding)
pub fn calculate_num_width(item_count: usize) -> usize {
    if item_count == 0 {
        2
    } else {
        let digits = (item_count as f64).log10().floor() as usize + 1;
        digits + 1
    }
}

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_width)
    } else {
        format!("{:<width$}", s, width = max_width)
    }
}

/// Column widths for song listings
/// Returns (num_width, title_width, artist_width, duration_width)
pub fn song_column_widths(content_width: usize, item_count: usize) -> (usize, usize, usize, usize) {
    // " {num}   {fav}   {title}   {artist}   {duration}"
    let num_width = calculate_num_width(item_count);
    let fav_width = 1;
    let duration_width = 6;
    let fixed_width = 1 + num_width + 3 + fav_width + 3 + 3 + 3 + duration_width;
    let remaining_width = content_width.saturating_sub(fixed_width);
    let title_width = (remaining_width * 55) / 100;
    let artist_width = remaining_width.saturating_sub(title_width);

    (num_width, title_width, artist_width, duration_width)
}
