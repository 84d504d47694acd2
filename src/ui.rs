pub mod digits;

use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget},
};

use crate::session::Phase;

const HORIZONTAL_MARGIN: u16 = 2;
const MAX_GAUGE_WIDTH: u16 = 60;

/// Read-only view of the session handed to the renderer once per cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub paused: bool,
    pub sessions_completed: u32,
    pub focus_secs: u64,
    pub break_secs: u64,
    pub command: Option<&'a str>,
    pub log_path: Option<&'a Path>,
}

impl Snapshot<'_> {
    pub fn phase_length(&self) -> u64 {
        match self.phase {
            Phase::Focus => self.focus_secs,
            Phase::Break => self.break_secs,
        }
    }

    /// Fraction of the current phase already elapsed, within `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        let total = self.phase_length();
        if total == 0 {
            return 1.0;
        }
        let remaining = self.remaining_secs.min(total);
        ((total - remaining) as f64 / total as f64).clamp(0.0, 1.0)
    }
}

/// `MM:SS`; minutes keep growing past 99.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

impl Widget for &Snapshot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let phase_color = match self.phase {
            Phase::Focus => Color::Red,
            Phase::Break => Color::Green,
        };
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let clock = format_clock(self.remaining_secs);
        let big_rows = digits::GLYPH_ROWS as u16;
        let body_height = big_rows + 1 + 1 + 1 + 3;
        let spacer = area.height.saturating_sub(body_height + 2) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1),         // header
                Constraint::Length(1),         // key legend
                Constraint::Length(spacer),    // padding
                Constraint::Length(big_rows),  // big clock
                Constraint::Length(1),         // padding
                Constraint::Length(1),         // gauge
                Constraint::Length(1),         // padding
                Constraint::Length(3),         // status lines
                Constraint::Min(0),
            ])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", self.phase),
                bold_style.fg(phase_color),
            ),
            Span::styled(
                format!("sessions: {}", self.sessions_completed),
                bold_style,
            ),
            Span::styled(if self.paused { "  [PAUSED]" } else { "" }, bold_style.fg(Color::Yellow)),
        ]));
        header.render(chunks[0], buf);

        let legend = Paragraph::new(Span::styled(
            "(space) pause/resume  (n) skip  (r) reset  (q) quit",
            Style::default().add_modifier(Modifier::ITALIC),
        ));
        legend.render(chunks[1], buf);

        let clock_style = if self.paused {
            dim_style.fg(phase_color)
        } else {
            Style::default().fg(phase_color)
        };
        if chunks[3].width >= digits::big_text_width(&clock) {
            Paragraph::new(digits::big_text(&clock))
                .style(clock_style)
                .alignment(Alignment::Center)
                .render(chunks[3], buf);
        } else {
            // too narrow for block digits
            let row = Rect {
                y: chunks[3].y + chunks[3].height / 2,
                height: chunks[3].height.min(1),
                ..chunks[3]
            };
            Paragraph::new(clock.as_str())
                .style(clock_style.add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .render(row, buf);
        }

        let gauge_width = chunks[5].width.min(MAX_GAUGE_WIDTH);
        let gauge_area = Rect {
            x: chunks[5].x + (chunks[5].width - gauge_width) / 2,
            width: gauge_width,
            ..chunks[5]
        };
        Gauge::default()
            .gauge_style(Style::default().fg(phase_color))
            .ratio(self.progress())
            .label(format!("{:.0}%", self.progress() * 100.0))
            .render(gauge_area, buf);

        let status = Paragraph::new(vec![
            Line::from(format!(
                "Mode: {}   Remaining: {}   Paused: {}",
                self.phase,
                clock,
                if self.paused { "YES" } else { "NO" }
            )),
            Line::from(format!(
                "Focus: {}m  Break: {}m  CMD: {}",
                self.focus_secs / 60,
                self.break_secs / 60,
                self.command.unwrap_or("None")
            )),
            Line::from(Span::styled(
                format!(
                    "Log: {}",
                    self.log_path
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "disabled".to_string())
                ),
                dim_style,
            )),
        ])
        .alignment(Alignment::Center);
        status.render(chunks[7], buf);
    }
}
