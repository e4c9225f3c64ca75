//! Terminal output pane rendering

use super::utils::{clamp_scroll, pane_block, visible_height};
use crate::parser::ast::Span;
use crate::snapshot::OutputLog;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the terminal output pane.
///
/// Lines printed by the item at `current` are shown in the highlight color.
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &OutputLog,
    current: Option<Span>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = output.len();
    let visible_height = visible_height(area.height);
    clamp_scroll(scroll_offset, total_items, visible_height);

    let visible_items: Vec<ListItem> = output
        .lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| {
            let color = if current.is_some() && line.span == current {
                DEFAULT_THEME.secondary
            } else {
                DEFAULT_THEME.fg
            };
            ListItem::new(line.text.as_str()).style(Style::default().fg(color))
        })
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
