//! Detail card for a single flow record.

use crate::format;
use crate::model::{EventRecord, EventStatus};
use crate::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, record: &EventRecord, theme: &Theme) {
    let status_color = match record.status {
        EventStatus::Accept => theme.accept,
        EventStatus::Reject => theme.reject,
    };
    let title = Line::from(vec![
        Span::styled(" Event ", Style::default().fg(theme.foreground).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{} ", record.status),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        ),
    ]);
    let card = Paragraph::new(card_lines(record, theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

/// One line per populated field. Timestamps split into date and time rows;
/// the duration row needs both endpoints. Epoch zero marks an unset
/// timestamp in the source logs and renders nothing.
pub fn card_lines(record: &EventRecord, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    push_text(&mut lines, theme, "Source", record.source_ip.as_deref());
    push_text(&mut lines, theme, "Destination", record.destination_ip.as_deref());

    let start = present_time(record.start_time);
    let end = present_time(record.end_time);
    if let Some(start) = start {
        push_owned(&mut lines, theme, "Start Date", format::format_date(start));
        push_owned(&mut lines, theme, "Start Time", format::format_time(start));
    }
    if let Some(end) = end {
        push_owned(&mut lines, theme, "End Date", format::format_date(end));
        push_owned(&mut lines, theme, "End Time", format::format_time(end));
    }
    if let (Some(start), Some(end)) = (start, end) {
        let seconds = format::duration_secs(start, end);
        push_owned(&mut lines, theme, "Duration", format!("{seconds} seconds"));
    }

    push_text(&mut lines, theme, "Action", record.action.as_deref());
    push_text(&mut lines, theme, "Interface", record.interface_id.as_deref());
    push_text(&mut lines, theme, "Packets", record.packets.as_deref());
    push_text(&mut lines, theme, "Bytes", record.bytes.as_deref());
    push_text(&mut lines, theme, "Filename", record.filename.as_deref());

    lines
}

fn present_time(value: Option<i64>) -> Option<i64> {
    value.filter(|&secs| secs != 0)
}

fn push_text(lines: &mut Vec<Line<'static>>, theme: &Theme, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            push_owned(lines, theme, label, value.to_string());
        }
    }
}

fn push_owned(lines: &mut Vec<Line<'static>>, theme: &Theme, label: &str, value: String) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(theme.muted).add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, Style::default().fg(theme.foreground)),
    ]));
}
