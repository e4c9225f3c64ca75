//! Stack pane rendering: call frames, globals and the pending work-list
//!
//! # Layout
//!
//! - One block per active call frame, item scope first, with its bindings
//! - The global context
//! - Items still waiting on the execution stack, next one first

use super::utils::{clamp_scroll, follow_growth, highlight, pane_block, visible_height};
use crate::snapshot::ContextView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Scroll state for the stack pane
pub struct StackScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Data needed to render the stack pane
pub struct StackRenderData<'a> {
    pub frames: &'a [ContextView],
    pub globals: &'a ContextView,
    pub pending: &'a [String],
    pub continuation_depth: usize,
}

fn section_header(title: String) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled("── ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            title,
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
}

fn binding_items(view: &ContextView, items: &mut Vec<ListItem<'static>>) {
    if view.bindings.is_empty() {
        items.push(ListItem::new("    (no bindings)").style(Style::default().fg(DEFAULT_THEME.comment)));
        return;
    }
    for (name, value) in &view.bindings {
        let mut spans = vec![
            Span::raw("    "),
            Span::styled(name.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
        ];
        spans.extend(highlight(value).spans);
        items.push(ListItem::new(Line::from(spans)));
    }
}

/// Build every row of the pane, before scrolling
fn stack_items(data: &StackRenderData<'_>) -> Vec<ListItem<'static>> {
    let mut all_items = Vec::new();

    if data.frames.is_empty() {
        all_items.push(ListItem::new("(idle)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }
    for (depth, view) in data.frames.iter().enumerate() {
        let name_color = if depth + 1 == data.frames.len() {
            DEFAULT_THEME.function
        } else {
            DEFAULT_THEME.muted_function
        };
        all_items.push(ListItem::new(Line::from(vec![
            Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                format!("Frame {} ", depth),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
            Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(
                view.label.clone(),
                Style::default().fg(name_color).add_modifier(Modifier::BOLD),
            ),
        ])));
        binding_items(view, &mut all_items);
    }

    all_items.push(section_header(format!("{} ", data.globals.label)));
    binding_items(data.globals, &mut all_items);

    all_items.push(section_header(format!("pending ({}) ", data.pending.len())));
    if data.pending.is_empty() {
        all_items.push(ListItem::new("    (empty)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }
    for (index, form) in data.pending.iter().enumerate() {
        let mut spans = vec![Span::styled(
            format!("  {:>2}. ", index + 1),
            Style::default().fg(DEFAULT_THEME.comment),
        )];
        spans.extend(highlight(form).spans);
        all_items.push(ListItem::new(Line::from(spans)));
    }

    all_items
}

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    data: StackRenderData<'_>,
    is_focused: bool,
    scroll_state: &mut StackScrollState,
) {
    let title = format!(" Execution Stack │ {} continuations ", data.continuation_depth);
    let block = pane_block(&title, is_focused);

    let all_items = stack_items(&data);
    let total_items = all_items.len();
    let visible_height = visible_height(area.height);

    follow_growth(
        &mut scroll_state.offset,
        &mut scroll_state.prev_item_count,
        total_items,
        visible_height,
    );
    clamp_scroll(&mut scroll_state.offset, total_items, visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
