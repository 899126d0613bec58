// Reusable UI components

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::engine::Provider;

pub struct Footer {
    content: Line<'static>,
}

impl Footer {
    pub fn shell(provider: Provider, dispatches: u64) -> Self {
        let stats_text = format!("{} Mode, Renders: {}  |  ", provider, dispatches);

        let mut spans = vec![Span::raw(stats_text)];

        let mut controls = vec![
            ("[↑/↓]", " Select"),
            ("[Enter]", " Open"),
            ("[1-3]", " Provider"),
            ("[P]", " Next"),
            ("[A]", " Tenant"),
            ("[G]", " Region"),
            ("[E]", " Env"),
        ];
        if provider == Provider::Azure {
            controls.push(("[O]", " Resource Group"));
        }
        controls.extend([
            ("[M]", "ode"),
            ("[T]", "ime"),
            ("[U]", " Auto"),
            ("[R]", "efresh"),
            ("[Q]", "uit"),
        ]);

        for (i, (hotkey, desc)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*hotkey, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(*desc));
        }

        Self {
            content: Line::from(spans),
        }
    }
}

impl Widget for Footer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.content)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
    }
}
