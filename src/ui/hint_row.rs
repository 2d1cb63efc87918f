use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::sinks::HintChoice;

/// Shuffled letter palette for the hidden region. Consumed letters stay in
/// place but dim out, so the row never reflows under the player.
pub struct HintRow<'a> {
    choices: &'a [HintChoice],
}

impl<'a> HintRow<'a> {
    pub fn new(choices: &'a [HintChoice]) -> Self {
        Self { choices }
    }
}

impl Widget for HintRow<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.choices.is_empty() {
            return;
        }

        let mut spans = Vec::with_capacity(self.choices.len() * 2);
        for choice in self.choices {
            let style = if choice.consumed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White).bg(Color::Indexed(237))
            };
            spans.push(Span::styled(format!(" {} ", choice.letter), style));
            spans.push(Span::raw(" "));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
