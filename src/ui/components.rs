//! Small widgets shared by the form view

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::form::UploadOutcome;
use crate::theme::Theme;

/// A bordered, centered button. Disabled buttons are drawn in the inactive color.
pub fn button<'a>(content: Line<'a>, hotkey: &'a str, enabled: bool, theme: &Theme) -> Paragraph<'a> {
    let color = if enabled { theme.accent } else { theme.inactive };
    let mut style = Style::default().fg(color);
    if enabled {
        style = style.add_modifier(Modifier::BOLD);
    }

    Paragraph::new(content)
        .alignment(Alignment::Center)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(format!(" {} ", hotkey), Style::default().fg(color))),
        )
}

/// Inline alert for the latest upload outcome, dismissable with `x`
pub fn alert<'a>(outcome: &'a UploadOutcome, theme: &Theme) -> Paragraph<'a> {
    let (icon, title, color) = match outcome {
        UploadOutcome::Success(_) => ("✔", " Success ", theme.success),
        UploadOutcome::Failure(_) => ("✘", " Error ", theme.danger),
    };

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::styled(outcome.message(), Style::default().fg(theme.text)),
    ]))
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
            .title_bottom(Line::from(Span::styled(" x dismiss ", Style::default().fg(theme.text_dim))).right_aligned()),
    )
}
