use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::ui::style;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    if let Some((message, level)) = model.active_toast() {
        let bar = Paragraph::new(format!(" {message}")).style(style::toast_style(level));
        frame.render_widget(bar, area);
        return;
    }

    let buffer = &model.buffer;
    let cursor = buffer.cursor();
    let dirty = if buffer.is_dirty() { " [+]" } else { "" };
    let position = format!(
        "Ln {}, Col {}  {} ",
        cursor.y() + 1,
        cursor.x() + 1,
        model
            .viewport
            .position_label(cursor, buffer.line_count())
    );
    let left = format!(" {}{}", model.file_name(), dirty);
    let padding = usize::from(area.width)
        .saturating_sub(model.mode.label().len() + 2 + left.chars().count() + position.len());

    let line = Line::from(vec![
        Span::styled(format!(" {} ", model.mode.label()), style::mode_style(model.mode)),
        Span::raw(left),
        Span::raw(" ".repeat(padding)),
        Span::raw(position),
    ]);
    frame.render_widget(Paragraph::new(line).style(style::status_style()), area);
}
