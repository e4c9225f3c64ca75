//! Source code pane rendering with syntax highlighting
//!
//! The lines covered by the top-level list being evaluated are highlighted;
//! the first of them is kept at a fixed visual row while stepping.

use super::utils::{highlight, pane_block, visible_height};
use crate::parser::ast::Span as SourceSpan;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::ops::RangeInclusive;

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// 1-based line range covered by `span`
pub fn span_lines(source: &str, span: SourceSpan) -> RangeInclusive<usize> {
    let first = span.line(source);
    let last = SourceSpan::new(span.end.saturating_sub(1).max(span.start), span.end).line(source);
    first..=last
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current: Option<RangeInclusive<usize>>,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source ", is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = visible_height(area.height);

    // Initialize target_line_row to center if not set
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the first current line at the target visual row
    if let Some(range) = &current {
        let first = *range.start();
        if first > 0 && first <= total_lines {
            scroll_state.offset = (first - 1).saturating_sub(target_row);
            if total_lines > visible_height {
                scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
            } else {
                scroll_state.offset = 0;
            }
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = current
                .as_ref()
                .is_some_and(|range| range.contains(&line_num));

            let (num_style, content_style) = match (is_current, is_error) {
                (true, true) => (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Some(
                        Style::default()
                            .bg(DEFAULT_THEME.error)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                ),
                (true, false) => (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    None,
                ),
                _ => (Style::default().fg(DEFAULT_THEME.comment), None),
            };

            let mut content = highlight(line);
            match content_style {
                // Error lines drop syntax colors entirely
                Some(style) => {
                    for span in &mut content.spans {
                        span.style = style;
                    }
                }
                None if is_current => {
                    for span in &mut content.spans {
                        span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                    }
                }
                None => {}
            }

            let marker = if is_current { "▶" } else { " " };
            let mut spans = vec![Span::styled(format!("{}{:4} ", marker, line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_lines() {
        let source = "(a)\n(b\n c)\n(d)";
        assert_eq!(span_lines(source, SourceSpan::new(0, 3)), 1..=1);
        assert_eq!(span_lines(source, SourceSpan::new(4, 10)), 2..=3);
        assert_eq!(span_lines(source, SourceSpan::new(11, 14)), 4..=4);
    }
}
