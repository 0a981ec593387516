use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::shared::DisplayState;

use super::mode::TuiState;

const NAME_WIDTH: usize = 7;

// One line per track: name, mute marker, then the step cells. Cells in
// odd groups of four get the darker shade so the beat structure reads
// at a glance; the playing column and the cursor sit on top.
pub fn draw_pattern_grid(frame: &mut Frame, area: Rect, ds: &DisplayState, ts: &TuiState) {
    let mut lines = Vec::with_capacity(ds.tracks.len());
    for (row, track) in ds.tracks.iter().enumerate() {
        let mut spans = Vec::with_capacity(track.pattern.len() + 2);

        let name_style = if track.muted {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(
            format!("{:<NAME_WIDTH$}", truncate(&track.name, NAME_WIDTH)),
            name_style,
        ));
        spans.push(Span::raw(if track.muted { "M " } else { "  " }));

        for (col, &active) in track.pattern.iter().enumerate() {
            spans.push(Span::styled("██", cell_style(ds, ts, row, col, active, track.muted)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::default()); // breathing room between rows
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn cell_style(
    ds: &DisplayState,
    ts: &TuiState,
    row: usize,
    col: usize,
    active: bool,
    muted: bool,
) -> Style {
    let dark_group = (col / 4) % 2 != 0;

    let mut color = match (active, dark_group) {
        (true, true) => Color::Green,
        (true, false) => Color::LightGreen,
        (false, true) => Color::DarkGray,
        (false, false) => Color::Gray,
    };
    if muted && active {
        color = Color::Rgb(60, 90, 60);
    }
    let mut style = Style::default().fg(color);

    if ds.playing_step == Some(col) {
        style = style.bg(Color::Magenta);
    }
    if ts.cursor_track == row && ts.cursor_step == col {
        style = style.bg(Color::Blue);
    }
    style
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
