//! Terminal layout. One `draw` call renders the whole frame from `App`.

pub mod event_card;
pub mod results;
pub mod search_bar;

use crate::app::App;
use crate::notify::ToastKind;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
        frame.area(),
    );

    let rows = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(frame.area());

    render_header(frame, rows[0], app);
    search_bar::render(
        frame,
        rows[1],
        app.form(),
        app.focus().form_field(),
        theme,
    );
    results::render_filters(frame, rows[2], app);
    results::render_body(frame, rows[3], app);
    render_footer(frame, rows[4], app);
    render_toasts(frame, app);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    frame.render_widget(
        Paragraph::new(vec![
            Line::styled(
                "Event Explorer",
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                "Search historical IP events in style",
                Style::default().fg(theme.muted),
            ),
        ])
        .centered(),
        area,
    );

    let mode = if theme.dark { "Dark Mode On" } else { "Light Mode On" };
    let width = (mode.len() as u16).min(area.width);
    let mode_area = Rect {
        x: area.right().saturating_sub(width),
        y: area.y,
        width,
        height: 1,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(mode, Style::default().fg(theme.muted))),
        mode_area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let extras = app.summary().map(|summary| {
        format!(
            "{} files · {} lines · {:.2}s",
            summary.files_scanned, summary.lines_checked, summary.duration_seconds
        )
    });
    let right_width = extras.as_deref().map_or(0, |s| s.chars().count() as u16 + 1);
    let cols =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).split(area);

    frame.render_widget(
        Paragraph::new("Tab fields · Enter search · ←/→ page · ^A/^R filters · ^D theme · Esc quit")
            .style(Style::default().fg(theme.muted)),
        cols[0],
    );
    if let Some(extras) = extras {
        frame.render_widget(
            Paragraph::new(extras).style(Style::default().fg(theme.muted)),
            cols[1],
        );
    }
}

/// Most recent toasts, stacked in the top-right corner over whatever is
/// underneath.
fn render_toasts(frame: &mut Frame, app: &App) {
    if app.notifier().is_empty() {
        return;
    }
    let theme = app.theme();
    let screen = frame.area();
    let width = 44.min(screen.width.saturating_sub(2));
    if width == 0 {
        return;
    }

    let recent: Vec<_> = app.notifier().visible().collect();
    let start = recent.len().saturating_sub(3);
    for (row, toast) in recent[start..].iter().enumerate() {
        let y = screen.y + 2 + row as u16;
        if y >= screen.bottom() {
            break;
        }
        let area = Rect {
            x: screen.right().saturating_sub(width + 1),
            y,
            width,
            height: 1,
        };
        let (glyph, color) = match toast.kind {
            ToastKind::Success => ("✓", theme.accept),
            ToastKind::Error => ("✗", theme.reject),
            ToastKind::Info => ("•", theme.accent),
            ToastKind::Loading => (app.spinner_frame(), theme.accent),
        };
        let line = Line::from(vec![
            Span::styled(format!(" {glyph} "), Style::default().fg(color)),
            Span::styled(
                toast.message.clone(),
                Style::default().fg(theme.foreground),
            ),
        ]);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme.highlight)),
            area,
        );
    }
}
