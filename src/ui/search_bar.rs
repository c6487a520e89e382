//! Three-field search form: a query string plus an epoch-second time range.

use crate::model::SearchParams;
use crate::notify::Notifier;
use crate::theme::Theme;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub const QUERY_PLACEHOLDER: &str = "Search by IP or field (e.g., dstaddr=24.57.123.131)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Query,
    Start,
    End,
}

/// Single-line text input with append/delete editing.
#[derive(Debug, Clone, Default)]
pub struct Input {
    value: String,
    digits_only: bool,
}

impl Input {
    fn numeric() -> Self {
        Self {
            value: String::new(),
            digits_only: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if self.digits_only && !c.is_ascii_digit() {
            return;
        }
        self.value.push(c);
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// Form state. Time fields take digits only; all values stay raw strings.
#[derive(Debug, Clone)]
pub struct SearchForm {
    query: Input,
    start: Input,
    end: Input,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            query: Input::default(),
            start: Input::numeric(),
            end: Input::numeric(),
        }
    }
}

impl SearchForm {
    pub fn field(&self, field: FormField) -> &Input {
        match field {
            FormField::Query => &self.query,
            FormField::Start => &self.start,
            FormField::End => &self.end,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut Input {
        match field {
            FormField::Query => &mut self.query,
            FormField::Start => &mut self.start,
            FormField::End => &mut self.end,
        }
    }

    pub fn input_char(&mut self, field: FormField, c: char) {
        self.field_mut(field).push_char(c);
    }

    pub fn pop_char(&mut self, field: FormField) {
        self.field_mut(field).pop_char();
    }

    pub fn clear_field(&mut self, field: FormField) {
        self.field_mut(field).clear();
    }

    /// Validates and yields the raw form values. All-empty input raises
    /// the validation toast and yields nothing.
    pub fn submit(&self, notifier: &mut Notifier) -> Option<SearchParams> {
        if self.query.is_empty() && self.start.is_empty() && self.end.is_empty() {
            notifier.error("Please provide at least one field (query, start, or end)");
            return None;
        }
        Some(SearchParams {
            search_term: self.query.value().to_string(),
            start_time: self.start.value().to_string(),
            end_time: self.end.value().to_string(),
        })
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    form: &SearchForm,
    focused: Option<FormField>,
    theme: &Theme,
) {
    let fields = Layout::horizontal([
        Constraint::Percentage(50),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ])
    .split(area);

    render_field(
        frame,
        fields[0],
        form.field(FormField::Query),
        "Query",
        QUERY_PLACEHOLDER,
        focused == Some(FormField::Query),
        theme,
    );
    render_field(
        frame,
        fields[1],
        form.field(FormField::Start),
        "Start time (epoch)",
        "epoch seconds",
        focused == Some(FormField::Start),
        theme,
    );
    render_field(
        frame,
        fields[2],
        form.field(FormField::End),
        "End time (epoch)",
        "epoch seconds",
        focused == Some(FormField::End),
        theme,
    );
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    input: &Input,
    title: &str,
    placeholder: &str,
    focused: bool,
    theme: &Theme,
) {
    let border_color = if focused { theme.accent } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(if focused { theme.accent } else { theme.muted }),
        ));
    let inner = block.inner(area);

    let width = inner.width as usize;
    let content = if input.is_empty() {
        Span::styled(
            visible_tail(placeholder, width),
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            visible_tail(input.value(), width),
            Style::default().fg(theme.foreground),
        )
    };

    frame.render_widget(Paragraph::new(content.clone()).block(block), area);

    if focused {
        let cursor_x = if input.is_empty() {
            inner.x
        } else {
            inner.x + content.content.chars().count().min(width) as u16
        };
        frame.set_cursor_position(Position::new(cursor_x, inner.y));
    }
}

/// Last `width` characters of `value`, with a leading ellipsis when the
/// head is cut off.
fn visible_tail(value: &str, width: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= width || width == 0 {
        return value.to_string();
    }
    let mut shown = String::from("…");
    shown.extend(&chars[chars.len() - (width - 1).max(1)..]);
    shown
}
