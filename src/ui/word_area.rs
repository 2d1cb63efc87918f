use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::sinks::{CharStatus, FrameBuffer};

/// The word being spelled, drawn from the engine's last rendered frame.
/// Meaning line above, cells in the middle, transient message below.
pub struct WordArea<'a> {
    frame: &'a FrameBuffer,
}

impl<'a> WordArea<'a> {
    pub fn new(frame: &'a FrameBuffer) -> Self {
        Self { frame }
    }
}

fn cell_style(status: CharStatus) -> Style {
    match status {
        CharStatus::Correct => Style::default().fg(Color::Green),
        CharStatus::Incorrect => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED),
        CharStatus::Pending => Style::default().fg(Color::Gray),
        CharStatus::Hidden => Style::default().fg(Color::DarkGray),
    }
}

impl Widget for WordArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let meaning_line = match &self.frame.meaning {
            Some(meaning) => Line::from(Span::styled(
                meaning.clone(),
                Style::default().fg(Color::Cyan),
            )),
            None => Line::default(),
        };

        let mut word_spans = Vec::with_capacity(self.frame.cells.len() * 2);
        for cell in &self.frame.cells {
            word_spans.push(Span::styled(cell.ch.to_string(), cell_style(cell.status)));
            word_spans.push(Span::raw(" "));
        }
        let word_line = Line::from(word_spans);

        let message_line = match &self.frame.message {
            Some(message) => Line::from(Span::styled(
                message.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::default(),
        };

        let paragraph = Paragraph::new(vec![
            meaning_line,
            Line::default(),
            word_line,
            Line::default(),
            message_line,
        ])
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));

        paragraph.render(area, buf);
    }
}
