mod components;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup, SPINNER};
use crate::theme::Theme;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info line
            Constraint::Min(10),   // Form card
            Constraint::Length(1), // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_form(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::FileBrowser => draw_file_browser(f, app),
        Popup::Help => draw_help_popup(f, &app.theme),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(t.accent)))
    } else if app.form.is_uploading() {
        Line::from(vec![
            Span::styled(SPINNER[app.spinner_frame], Style::default().fg(t.accent)),
            Span::styled(" Uploading", Style::default().fg(t.text_dim)),
        ])
    } else {
        Line::from(vec![
            Span::styled("Ready │ ", Style::default().fg(t.text_dim)),
            Span::styled(app.endpoint(), Style::default().fg(t.text_dim)),
        ])
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let card = centered_width(if area.width < 80 { 96 } else { 60 }, area);

    let block = Block::default()
        .title(Span::styled(
            " Upload file ",
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));
    let inner = block.inner(card);
    f.render_widget(block, card);

    let alert_height = if app.form.upload_status().is_some() { 4 } else { 0 };
    let url_height = if app.form.result_url().is_some() { 4 } else { 0 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),            // Select button
            Constraint::Length(2),            // Selected file
            Constraint::Length(3),            // Upload button
            Constraint::Length(alert_height), // Alert
            Constraint::Length(url_height),   // Result URL
            Constraint::Min(0),
        ])
        .split(inner);

    let select = components::button(Line::from("Select file"), "o", true, t);
    f.render_widget(select, rows[0]);

    let selected = match app.form.selected_file() {
        Some(file) => Line::from(vec![
            Span::styled("Selected file: ", Style::default().fg(t.text_dim)),
            Span::styled(file.name(), Style::default().fg(t.text)),
            Span::styled(format!("  ({})", file.mime()), Style::default().fg(t.text_dim)),
        ]),
        None => Line::from(Span::styled("No file selected", Style::default().fg(t.text_dim))),
    };
    f.render_widget(Paragraph::new(selected).alignment(Alignment::Center), rows[1]);

    let label = if app.form.is_uploading() {
        Line::from(vec![
            Span::raw(SPINNER[app.spinner_frame]),
            Span::raw(" Uploading..."),
        ])
    } else {
        Line::from("Upload file")
    };
    let upload = components::button(label, "u", app.form.can_submit(), t);
    f.render_widget(upload, rows[2]);

    if let Some(outcome) = app.form.upload_status() {
        f.render_widget(components::alert(outcome, t), rows[3]);
    }

    if let Some(url) = app.form.result_url() {
        let link = Paragraph::new(Line::from(Span::styled(
            url,
            Style::default().fg(t.accent).add_modifier(Modifier::UNDERLINED),
        )))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(" File URL: ", Style::default().fg(t.text)))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(t.inactive)),
        );
        f.render_widget(link, rows[4]);
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let key = |k: &'static str| Span::styled(k, Style::default().fg(t.accent));
    let sep = || Span::styled(" │ ", Style::default().fg(t.inactive));

    let hints = Line::from(vec![
        key("o"),
        Span::raw(" select"),
        sep(),
        key("u"),
        Span::raw(" upload"),
        sep(),
        key("x"),
        Span::raw(" dismiss"),
        sep(),
        key("?"),
        Span::raw(" help"),
        sep(),
        key("q"),
        Span::raw(" quit"),
    ]);

    let footer = Paragraph::new(hints)
        .alignment(Alignment::Center)
        .style(Style::default().fg(t.text_dim));
    f.render_widget(footer, area);
}

fn draw_file_browser(f: &mut Frame, app: &App) {
    let t = &app.theme;
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 90 } else { 70 },
        if area.height < 30 { 85 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Select File ", Style::default().fg(t.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(t.accent));

    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(popup_area);

    let path_str = app.browser_path.to_string_lossy();
    let path_display = Paragraph::new(Line::from(vec![
        Span::styled("dir ", Style::default().fg(t.accent)),
        Span::styled(path_str.as_ref(), Style::default().fg(t.text)),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(t.inactive)));
    f.render_widget(path_display, inner[0]);

    // Keep the selection visible in long directories
    let visible = inner[1].height.max(1) as usize;
    let offset = app.browser_selected.saturating_sub(visible - 1);

    let rows: Vec<Row> = if app.browser_entries.is_empty() {
        vec![Row::new(vec![Span::styled(
            "  Empty directory",
            Style::default().fg(t.text_dim),
        )])]
    } else {
        app.browser_entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, entry)| {
                let (icon, icon_color) = if entry.is_dir { ("▸", t.accent) } else { (" ", t.success) };
                let row_style = if i == app.browser_selected {
                    Style::default().bg(t.bg_selected).fg(t.text)
                } else {
                    Style::default()
                };
                let size = entry.size.map(format_bytes).unwrap_or_default();

                Row::new(vec![
                    Span::styled(format!("  {} ", icon), Style::default().fg(icon_color)),
                    Span::styled(entry.name.as_str(), Style::default().fg(t.text)),
                    Span::styled(size, Style::default().fg(t.text_dim)),
                ])
                .style(row_style)
            })
            .collect()
    };

    let widths = [Constraint::Length(5), Constraint::Min(10), Constraint::Length(10)];
    f.render_widget(Table::new(rows, widths), inner[1]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("j/k", Style::default().fg(t.accent)),
        Span::raw(" nav │ "),
        Span::styled("Enter", Style::default().fg(t.accent)),
        Span::raw(" select │ "),
        Span::styled("Backspace", Style::default().fg(t.accent)),
        Span::raw(" up │ "),
        Span::styled("~", Style::default().fg(t.accent)),
        Span::raw(" home │ "),
        Span::styled("Esc", Style::default().fg(t.accent)),
        Span::raw(" cancel"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(t.text_dim));
    f.render_widget(hint, inner[2]);
}

fn draw_help_popup(f: &mut Frame, t: &Theme) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 95 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(t.accent).add_modifier(Modifier::BOLD)))
    };
    let entry = |k: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(k, Style::default().fg(t.accent)), Span::raw(desc)])
    };

    let help_text = vec![
        heading("═══ Upload ═══"),
        entry("  o / f     ", "Open the file browser"),
        entry("  u / Enter ", "Upload the selected file"),
        entry("  x / Esc   ", "Dismiss the result alert"),
        Line::from(""),
        heading("═══ File Browser ═══"),
        entry("  ↑/↓ j/k   ", "Move up/down"),
        entry("  Enter     ", "Open directory / choose file"),
        entry("  Backspace ", "Parent directory"),
        entry("  ~         ", "Home directory"),
        Line::from(""),
        heading("═══ Command Line ═══"),
        entry("  upform --file <PATH>     ", "Upload without the TUI, print JSON"),
        entry("  upform --endpoint <URL>  ", "Override the upload endpoint"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(t.text_dim)),
            Span::styled("?", Style::default().fg(t.accent)),
            Span::styled("/", Style::default().fg(t.text_dim)),
            Span::styled("Esc", Style::default().fg(t.accent)),
            Span::styled(" to close", Style::default().fg(t.text_dim)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" upform Help ", Style::default().fg(t.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn centered_width(percent_x: u16, r: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(r)[1]
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    centered_width(percent_x, popup_layout[1])
}
