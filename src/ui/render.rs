use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::editor::LineRef;
use crate::ui::{status, style};

/// Render the whole screen: text rows, gutter, status bar and cursor.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let text_height = model.viewport.text_height().min(area.height);
    let text_area = Rect {
        height: text_height,
        ..area
    };
    let status_area = Rect {
        y: area.y + text_height,
        height: area.height - text_height,
        ..area
    };

    let buffer = &model.buffer;
    let total = buffer.line_count();
    let cursor = buffer.cursor();
    let gutter = model.viewport.gutter_width(total);
    let range = model.viewport.visible_range(cursor, total);

    let rows: Vec<Line> = buffer
        .lines()
        .enumerate()
        .skip(range.start)
        .take(range.len())
        .map(|(idx, line)| {
            let mut spans = Vec::with_capacity(2);
            if gutter > 0 {
                let digits = usize::from(gutter - 1);
                spans.push(Span::styled(
                    format!("{:>digits$} ", idx + 1),
                    style::gutter_style(),
                ));
            }
            spans.push(Span::raw(display_text(line)));
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(rows), text_area);

    if status_area.height > 0 {
        status::render_status_bar(model, frame, status_area);
    }

    let (x, y) = model.viewport.cursor_position(cursor, total);
    frame.set_cursor_position(Position::new(
        text_area.x + x,
        text_area.y + y.min(text_area.height.saturating_sub(1)),
    ));
}

/// Terminal text for one buffer line.
pub fn display_text(line: LineRef<'_>) -> String {
    line.chars().filter_map(display_char).collect()
}

/// Glyph drawn for a codepoint: tabs take one cell, other controls none.
pub fn display_char(c: char) -> Option<char> {
    match c {
        '\t' => Some(' '),
        c if c.is_control() => None,
        c => Some(c),
    }
}
