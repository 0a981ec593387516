use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::shared::DisplayState;

use super::grid::draw_pattern_grid;
use super::mode::TuiState;

pub fn render(frame: &mut Frame, area: Rect, ds: &DisplayState, ts: &TuiState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // transport / tempo header
            Constraint::Min(8),    // pattern grid
            Constraint::Length(1), // key hints + status
        ])
        .split(area);

    draw_header(frame, sections[0], ds);
    draw_pattern_grid(frame, sections[1], ds, ts);
    draw_footer(frame, sections[2], ds);
}

fn draw_header(frame: &mut Frame, area: Rect, ds: &DisplayState) {
    let transport = if ds.playing {
        Span::styled("▶ PLAYING", Style::default().fg(Color::LightGreen))
    } else {
        Span::styled("■ STOPPED", Style::default().fg(Color::DarkGray))
    };
    let line = Line::from(vec![
        Span::raw(format!(" {:>5.0} BPM   ", ds.bpm)),
        transport,
    ]);
    let block = Block::default().borders(Borders::ALL).title(" loopbox ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, ds: &DisplayState) {
    let hints = " space play  x toggle  m mute  -/= bpm  s save  q quit   ";
    let line = Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        Span::styled(&ds.status, Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
