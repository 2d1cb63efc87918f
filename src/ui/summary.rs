use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::{BestRecord, RoundSummary};

/// End-of-round results panel.
pub struct SummaryPanel<'a> {
    summary: &'a RoundSummary,
    best: Option<&'a BestRecord>,
}

impl<'a> SummaryPanel<'a> {
    pub fn new(summary: &'a RoundSummary, best: Option<&'a BestRecord>) -> Self {
        Self { summary, best }
    }
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>14}  "), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{}:{:02}.{}", secs / 60, secs % 60, (elapsed_ms % 1000) / 100)
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let s = self.summary;

        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled(
                format!("{}%", s.accuracy),
                Style::default()
                    .fg(if s.accuracy == 100 {
                        Color::Green
                    } else {
                        Color::Yellow
                    })
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            stat_line("Time", format_elapsed(s.elapsed_ms)),
            stat_line("Words", format!("{}", s.word_count)),
            stat_line("Characters", format!("{}", s.chars_typed)),
            stat_line("Mistakes", format!("{}", s.mistakes)),
        ];

        if s.skipped_words > 0 {
            lines.push(stat_line("Skipped", format!("{}", s.skipped_words)));
        }

        lines.push(Line::default());
        if s.new_record {
            lines.push(Line::from(Span::styled(
                "★ New record! ★",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )));
        } else if let Some(best) = self.best {
            lines.push(Line::from(Span::styled(
                format!(
                    "Best: {}% in {}",
                    best.accuracy,
                    format_elapsed(best.elapsed_ms)
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "[r] Retry  [Esc] Menu",
            Style::default().fg(Color::DarkGray),
        )));

        let block = Block::bordered()
            .title(format!(" {} ", s.level))
            .border_style(Style::default().fg(Color::DarkGray));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
