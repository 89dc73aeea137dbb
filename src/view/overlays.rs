//! Overlay rendering (error notification, help popup, lyrics)

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{LyricsState, UiState};
use super::utils::Palette;

const KEYBINDINGS: &[(&str, &str)] = &[
    ("", "── Navigation ──"),
    ("Tab / Shift+Tab", "Switch screen"),
    ("↑ / ↓", "Move selection"),
    ("[ / ]", "Switch section"),
    ("Enter", "Play / Open"),
    ("Backspace / Esc", "Go back"),
    ("/", "Search (Enter to submit)"),
    ("", ""),
    ("", "── Playback ──"),
    ("Space", "Play / Pause"),
    ("N / P", "Next / Previous track"),
    ("← / →", "Seek 10 seconds"),
    ("0-9", "Jump to 0%-90%"),
    ("Home", "Restart track"),
    ("S", "Toggle shuffle"),
    ("R", "Cycle repeat (off → all → one)"),
    ("", ""),
    ("", "── Actions ──"),
    ("F", "Favorite / Unfavorite"),
    ("a", "Add to queue"),
    ("A", "Play next"),
    ("X / Delete", "Remove from queue or recents"),
    ("c", "Clear queue"),
    ("C", "Clear recent searches"),
    ("Y", "Lyrics"),
    ("", ""),
    ("", "── General ──"),
    ("T", "Toggle theme"),
    ("H", "Toggle this help"),
    ("Q", "Quit"),
];

/// Rectangle of the given size centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState, palette: &Palette) {
    let Some(error_msg) = ui_state.error_message.as_deref() else {
        return;
    };
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    // Wrapped line count plus the two borders
    let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;
    let popup_area = centered(area, popup_width, 2 + error_line_count.max(1));

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(error_msg.to_string())
        .style(Style::default().fg(palette.error))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(palette.error).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(palette.background)),
        );

    frame.render_widget(error_widget, popup_area);
}

pub fn render_help_popup(frame: &mut Frame, palette: &Palette) {
    let popup_area = centered(frame.area(), 62, KEYBINDINGS.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = KEYBINDINGS
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(palette.text)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.header))
                .title(" Help (H or Esc to close) ")
                .title_style(palette.header_style()),
        )
        .style(Style::default().bg(palette.background));

    frame.render_widget(help_text, popup_area);
}

pub fn render_lyrics_popup(frame: &mut Frame, lyrics: &LyricsState, palette: &Palette) {
    let area = frame.area();
    let popup_area = centered(area, 70, area.height.saturating_sub(6).max(10));
    frame.render_widget(Clear, popup_area);

    let text_style = if lyrics.text.is_loading || lyrics.text.data.is_none() {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.text)
    };

    let title = if lyrics.title.is_empty() {
        " Lyrics ".to_string()
    } else {
        format!(" Lyrics: {} ", lyrics.title)
    };

    let popup = Paragraph::new(lyrics.display_text().to_string())
        .style(text_style)
        .wrap(Wrap { trim: false })
        .scroll((lyrics.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.header))
                .title(title)
                .title_style(palette.header_style())
                .title_bottom(Line::from(" ↑↓ scroll | Y or Esc to close ").right_aligned())
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(palette.background)),
        );

    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popups_stay_inside_small_terminals() {
        let area = Rect { x: 0, y: 0, width: 40, height: 12 };
        let popup = centered(area, 62, 30);
        assert_eq!(popup.width, 36);
        assert_eq!(popup.height, 8);
        assert_eq!(popup.x, 2);
        assert_eq!(popup.y, 2);
    }

    #[test]
    fn help_lists_every_section() {
        let headers: Vec<&str> =
            KEYBINDINGS.iter().filter(|(k, d)| k.is_empty() && !d.is_empty()).map(|(_, d)| *d).collect();
        assert_eq!(headers.len(), 4);
        assert!(KEYBINDINGS.iter().any(|(k, _)| *k == "Y"));
    }
}
