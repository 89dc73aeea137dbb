//! Mini player rendering

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::PlayerSnapshot;
use super::utils::{format_duration, Palette};

pub fn render_progress_bar(frame: &mut Frame, area: Rect, snapshot: &PlayerSnapshot, palette: &Palette) {
    let title = status_line(snapshot);

    let shuffle_text = if snapshot.shuffle { "Shuffle: On" } else { "Shuffle: Off" };
    let queue_text = if snapshot.queue.is_empty() {
        "Queue: empty".to_string()
    } else {
        format!("Queue: {}/{}", snapshot.current_index + 1, snapshot.queue.len())
    };
    let controls_info = format!(" {} | {} | {} ", shuffle_text, snapshot.repeat.label(), queue_text);

    let transport = &snapshot.transport;
    let time_str = format!(
        "{} / {}",
        format_duration(transport.position_ms),
        format_duration(transport.duration_ms)
    );

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(palette.accent))
        .ratio(transport.progress_ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}

fn status_line(snapshot: &PlayerSnapshot) -> String {
    let Some(track) = snapshot.current.as_ref() else {
        return " No track playing ".to_string();
    };

    let symbol = if snapshot.transport.is_playing { "▶" } else { "⏸" };
    match track.artist.as_deref() {
        Some(artist) if !artist.is_empty() => format!(" {} {} | {} ", symbol, track.title, artist),
        _ => format!(" {} {} ", symbol, track.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SongInfo;

    #[test]
    fn status_shows_play_state_and_artist() {
        let mut snapshot = PlayerSnapshot::default();
        assert_eq!(status_line(&snapshot), " No track playing ");

        snapshot.current = Some(SongInfo {
            title: "Kesariya".into(),
            artist: Some("Arijit Singh".into()),
            ..Default::default()
        });
        snapshot.transport.is_playing = true;
        assert_eq!(status_line(&snapshot), " ▶ Kesariya | Arijit Singh ");

        snapshot.transport.is_playing = false;
        if let Some(track) = snapshot.current.as_mut() {
            track.artist = None;
        }
        assert_eq!(status_line(&snapshot), " ⏸ Kesariya ");
    }
}
