//! Result area: filter row, record table, detail pane, pagination.

use crate::app::{App, Phase};
use crate::format;
use crate::model::{EventRecord, EventStatus};
use crate::ui::event_card;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

pub fn render_filters(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let filter = app.filter();
    let mut spans = vec![
        Span::styled("Filters ", Style::default().fg(theme.muted)),
        Span::styled(
            checkbox("ACCEPT", filter.accept),
            Style::default().fg(if filter.accept { theme.accept } else { theme.muted }),
        ),
        Span::raw("  "),
        Span::styled(
            checkbox("REJECT", filter.reject),
            Style::default().fg(if filter.reject { theme.reject } else { theme.muted }),
        ),
    ];
    if app.is_filtering() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} applying", app.spinner_frame()),
            Style::default().fg(theme.accent),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    if app.is_filtering() {
        render_wait(frame, area, app, "Applying filters...");
        return;
    }
    if app.phase() == Phase::Loading {
        render_wait(frame, area, app, "Loading events...");
        return;
    }

    let visible = app.visible_records();
    if visible.is_empty() {
        render_hint(frame, area, app);
        return;
    }

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    render_info(frame, rows[0], app, visible.len());
    render_results(frame, rows[1], app, &visible);
    render_pagination(frame, rows[2], app);
}

fn render_info(frame: &mut Frame, area: Rect, app: &App, shown: usize) {
    let theme = app.theme();
    let pagination = app.pagination();
    let text = info_text(
        shown,
        pagination.total_matches,
        pagination.page,
        pagination.total_pages,
    );
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(theme.muted))
            .centered(),
        area,
    );
}

fn render_results(frame: &mut Frame, area: Rect, app: &App, visible: &[&EventRecord]) {
    let panes = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_table(frame, panes[0], app, visible);

    if let Some(record) = app.selected_record() {
        event_card::render(frame, panes[1], record, app.theme());
    } else {
        frame.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme().border))
                .title(" Event "),
            panes[1],
        );
    }
}

fn render_table(frame: &mut Frame, area: Rect, app: &App, visible: &[&EventRecord]) {
    let theme = app.theme();
    let header = Row::new(["Status", "Source", "Destination", "Start", "Action"])
        .style(Style::default().fg(theme.muted).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = visible
        .iter()
        .map(|record| {
            let status_color = match record.status {
                EventStatus::Accept => theme.accept,
                EventStatus::Reject => theme.reject,
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    record.status.as_str(),
                    Style::default().fg(status_color),
                )),
                Cell::from(record.source_ip.clone().unwrap_or_else(|| "-".to_string())),
                Cell::from(
                    record
                        .destination_ip
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(start_cell(record)),
                Cell::from(record.action.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Min(13),
            Constraint::Min(13),
            Constraint::Length(20),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .title(" Results "),
    )
    .row_highlight_style(
        Style::default()
            .bg(theme.highlight)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(app.selected());
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let pagination = app.pagination();
    let active = Style::default().fg(theme.foreground);
    let inactive = Style::default().fg(theme.muted);

    let line = Line::from(vec![
        Span::styled(
            "Prev",
            if pagination.page > 1 { active } else { inactive },
        ),
        Span::styled(
            format!("  Page {} of {}  ", pagination.page, pagination.total_pages),
            Style::default().fg(theme.muted),
        ),
        Span::styled(
            "Next",
            if pagination.page < pagination.total_pages {
                active
            } else {
                inactive
            },
        ),
    ]);
    frame.render_widget(Paragraph::new(line).centered(), area);
}

fn render_wait(frame: &mut Frame, area: Rect, app: &App, label: &str) {
    let theme = app.theme();
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(area);
    let line = Line::from(vec![
        Span::styled(app.spinner_frame(), Style::default().fg(theme.accent)),
        Span::styled(format!(" {label}"), Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(line).centered(), rows[1]);
}

fn render_hint(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(area);
    let line = Line::from(vec![
        Span::styled(
            "Try searching for something like ",
            Style::default().fg(theme.muted),
        ),
        Span::styled(
            "dstaddr=1.2.3.4",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).centered(), rows[1]);
}

fn checkbox(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[x] {label}")
    } else {
        format!("[ ] {label}")
    }
}

fn info_text(shown: usize, total: u64, page: u32, total_pages: u32) -> String {
    format!("Showing {shown} of {total} results (Page {page} of {total_pages})")
}

fn start_cell(record: &EventRecord) -> String {
    match record.start_time.filter(|&secs| secs != 0) {
        Some(secs) => format!(
            "{} {}",
            format::format_date(secs),
            format::format_time(secs)
        ),
        None => "-".to_string(),
    }
}
