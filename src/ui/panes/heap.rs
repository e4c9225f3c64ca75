//! Heap pane rendering
//!
//! Lists every block in address order. Freed blocks stay visible as
//! tombstones so use-after-free errors can be traced back to the `free`.

use super::utils::{clamp_scroll, follow_growth, highlight, pane_block, visible_height};
use crate::memory::heap::{BlockState, Heap, HeapBlock, HeapObject};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

/// Scroll state for the heap pane
pub struct HeapScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Printed contents of a block
fn describe(block: &HeapBlock) -> String {
    match &block.object {
        HeapObject::Cell(value) => value.repr(),
        HeapObject::Lambda(lambda) => {
            format!("({} ({}))", lambda.display_name(), lambda.params.join(" "))
        }
    }
}

fn block_line(addr: u64, block: &HeapBlock) -> Line<'static> {
    let freed = block.state == BlockState::Tombstone;
    let addr_style = if freed {
        Style::default().fg(DEFAULT_THEME.error)
    } else {
        Style::default().fg(DEFAULT_THEME.comment)
    };

    let mut spans = vec![
        Span::styled(format!("0x{:08x}", addr), addr_style),
        Span::styled(" │ ", Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(
            format!("{:<6} ", block.object.kind()),
            Style::default().fg(DEFAULT_THEME.primary),
        ),
    ];

    if freed {
        spans.push(Span::styled(
            format!("freed (was {})", describe(block)),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::CROSSED_OUT),
        ));
    } else {
        spans.extend(highlight(&describe(block)).spans);
    }
    Line::from(spans)
}

/// Render the heap pane
pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    heap: &Heap,
    is_focused: bool,
    scroll_state: &mut HeapScrollState,
) {
    let title = format!(" Heap │ {}/{} live ", heap.live_objects(), heap.max_objects());
    let block = pane_block(&title, is_focused);

    let allocations = heap.allocations();
    let all_items: Vec<ListItem> = if allocations.is_empty() {
        vec![ListItem::new("(no allocations)").style(Style::default().fg(DEFAULT_THEME.comment))]
    } else {
        allocations
            .iter()
            .map(|(addr, block)| ListItem::new(block_line(*addr, block)))
            .collect()
    };

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
