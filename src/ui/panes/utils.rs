//! Shared helpers for pane rendering
//!
//! All functions in this module are `pub(super)`, making them accessible only
//! within the panes module.

use crate::interpreter::builtins::Builtin;
use crate::interpreter::forms::SpecialForm;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// Bordered block with the focus-dependent border style
pub(super) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows that fit inside a bordered pane of `height`
pub(super) fn visible_height(height: u16) -> usize {
    height.saturating_sub(2).max(1) as usize // Account for borders (2), min 1
}

/// Clamp a scroll offset so the last page stays full
pub(super) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}

/// Follow the bottom of a pane when new items appear
pub(super) fn follow_growth(offset: &mut usize, prev_count: &mut usize, total: usize, visible: usize) {
    if total > *prev_count && total > visible {
        *offset = total - visible;
    }
    *prev_count = total;
}

/// Style for a word of source text or a printed value
pub(super) fn word_style(word: &str, is_head: bool) -> Style {
    if SpecialForm::from_name(word).is_some() {
        return Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD);
    }
    match word {
        "true" | "false" | "null" => Style::default().fg(DEFAULT_THEME.constant),
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ if is_head || Builtin::from_name(word).is_some() => {
            Style::default().fg(DEFAULT_THEME.function)
        }
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Syntax-highlight one line of list source (or a printed list value)
pub(super) fn highlight(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut word = String::new();
    let mut after_open = false;

    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>, is_head: bool| {
        if !word.is_empty() {
            let style = word_style(word.as_str(), is_head);
            spans.push(Span::styled(std::mem::take(word), style));
        }
    };

    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                flush(&mut word, &mut spans, after_open);
                let mut text = String::from('"');
                for next in chars.by_ref() {
                    text.push(next);
                    if next == '"' {
                        break;
                    }
                }
                spans.push(Span::styled(text, Style::default().fg(DEFAULT_THEME.string)));
                after_open = false;
            }
            '(' | ')' => {
                flush(&mut word, &mut spans, after_open);
                spans.push(Span::styled(
                    c.to_string(),
                    Style::default().fg(DEFAULT_THEME.primary),
                ));
                after_open = c == '(';
            }
            c if c.is_whitespace() => {
                let is_head = after_open && !word.is_empty();
                flush(&mut word, &mut spans, is_head);
                if is_head {
                    after_open = false;
                }
                spans.push(Span::raw(c.to_string()));
            }
            c => word.push(c),
        }
    }
    flush(&mut word, &mut spans, after_open);

    Line::from(spans)
}
