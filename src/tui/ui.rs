//! UI rendering for the TUI.

use std::sync::atomic::Ordering;

use humansize::{format_size, BINARY};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::classifier;

use super::app::{App, Mode};

/// Render the entire UI.
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Listing
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    render_listing(app, frame, chunks[1]);
    render_footer(app, frame, chunks[2]);

    match app.mode {
        Mode::ConfirmTrash => render_confirm_dialog(app, frame),
        Mode::Help => render_help_overlay(frame),
        Mode::Normal => {}
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    // Detailed total once the scan lands, stored overview estimate before
    let size_display = match (&app.listing, app.stored_total) {
        (Some(listing), _) => format_size(listing.total_size, BINARY),
        (None, Some(total)) => format!("~{}", format_size(total, BINARY)),
        (None, None) => "...".to_string(),
    };

    let progress = app.explorer.progress();
    let header_text = if app.scanning {
        format!(
            " {}  {}  │  scanning: {} files, {} dirs, {}",
            app.cwd.display(),
            size_display,
            progress.files(),
            progress.dirs(),
            format_size(progress.bytes(), BINARY)
        )
    } else {
        format!(" {}  {}", app.cwd.display(), size_display)
    };

    let block = Block::default()
        .title(" Spelunk ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(header_text)
            .block(block)
            .style(Style::default().fg(Color::White)),
        area,
    );
}

fn render_listing(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let Some(listing) = &app.listing else {
        let message = if app.scanning { "Scanning..." } else { "No data" };
        frame.render_widget(
            Paragraph::new(message)
                .block(block)
                .style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };

    let total = listing.total_size.max(1);
    let items: Vec<ListItem> = listing
        .entries
        .iter()
        .map(|entry| {
            let share = entry.size as f64 / total as f64 * 100.0;
            let tag = domain_tag(&entry.path.to_string_lossy());
            let line = format!(
                "{:>10}  {:>5.1}%  {}{}",
                format_size(entry.size, BINARY),
                share,
                entry.display_name(),
                tag
            );
            let style = if entry.is_dir() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            ListItem::new(Line::styled(line, style))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Marker for paths another cleanup subsystem already manages.
fn domain_tag(path: &str) -> &'static str {
    if classifier::is_handled_by_mo_clean(path) {
        "  [deep-clean]"
    } else if classifier::is_cleanable_dir(path) {
        "  [artifact]"
    } else {
        ""
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.trashing {
        format!(
            "Trashing... {} files",
            app.trash_counter.load(Ordering::Relaxed)
        )
    } else if let Some(message) = &app.status_message {
        message.clone()
    } else {
        String::new()
    };

    let keys = " ↑↓ move  ⏎ enter  ⌫ up  t trash  r rescan  ? help  q quit";
    let text = vec![
        Line::styled(status, Style::default().fg(Color::Yellow)),
        Line::styled(keys, Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(text), area);
}

fn render_confirm_dialog(app: &App, frame: &mut Frame) {
    let Some(path) = app.selected_path() else {
        return;
    };

    let area = centered_rect(60, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Move to trash? ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = vec![
        Line::raw(format!("{}", path.display())),
        Line::raw(""),
        Line::styled("y: trash (recoverable)   n: cancel", Style::default().bold()),
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 12, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = vec![
        Line::raw("j/k, ↑/↓     move selection"),
        Line::raw("Enter, l     enter directory"),
        Line::raw("Backspace, h parent directory"),
        Line::raw("t, d         move selection to trash"),
        Line::raw("r            rescan (bypass cache)"),
        Line::raw("g/G          first/last entry"),
        Line::raw("q, Esc       quit"),
        Line::raw(""),
        Line::raw("[deep-clean] and [artifact] mark paths"),
        Line::raw("other cleanup flows already manage."),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Centered rect of `width` percent by `height` rows.
fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * width_percent / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}
