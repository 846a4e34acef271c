//! Pairing of open and close markup into a tree.
//!
//! Resolution produces a flat list in which markup appears as separate open,
//! close and standalone values. [`pair_markup`] nests the content between an
//! open and its matching close into the open value's `children`.
//!
//! Misnested markup is repaired: a close that matches an outer open closes
//! every inner open implicitly, then reopens copies of them, so
//! `{+b}foo{+a}bar{-b}baz{-a}` becomes `b[foo, a[bar]]` followed by `a[baz]`.
//! A close with no matching open stays in place; an open that is never
//! closed absorbs the rest of the pattern.

use crate::model::MarkupKind;
use crate::types::{MarkupValue, MessageValue};

pub fn pair_markup(values: Vec<MessageValue>) -> Vec<MessageValue> {
    let mut root = Vec::new();
    let mut stack: Vec<MarkupValue> = Vec::new();

    for value in values {
        match value {
            MessageValue::Markup(markup) if markup.kind == MarkupKind::Open => stack.push(markup),
            MessageValue::Markup(markup) if markup.kind == MarkupKind::Close => {
                let Some(index) = stack.iter().rposition(|open| open.name == markup.name) else {
                    push(&mut root, &mut stack, MessageValue::Markup(markup));
                    continue;
                };
                let inner = stack.split_off(index + 1);
                let reopened: Vec<MarkupValue> = inner.iter().map(MarkupValue::reopened).collect();
                let matched = close_frames(stack.pop(), inner);
                if let Some(matched) = matched {
                    push(&mut root, &mut stack, MessageValue::Markup(matched));
                }
                stack.extend(reopened);
            }
            other => push(&mut root, &mut stack, other),
        }
    }

    if let Some(unclosed) = close_frames(None, stack) {
        root.push(MessageValue::Markup(unclosed));
    }
    root
}

/// Append to the innermost open element, or to the top level.
fn push(root: &mut Vec<MessageValue>, stack: &mut [MarkupValue], value: MessageValue) {
    match stack.last_mut() {
        Some(open) => open.children.push(value),
        None => root.push(value),
    }
}

/// Close `frames` innermost first, nesting each into its parent, and finally
/// into `outer` when given. Returns the outermost closed element.
fn close_frames(outer: Option<MarkupValue>, frames: Vec<MarkupValue>) -> Option<MarkupValue> {
    let mut closed: Option<MarkupValue> = None;
    for mut frame in frames.into_iter().rev() {
        if let Some(child) = closed.take() {
            frame.children.push(MessageValue::Markup(child));
        }
        closed = Some(frame);
    }
    match (outer, closed) {
        (Some(mut outer), Some(child)) => {
            outer.children.push(MessageValue::Markup(child));
            Some(outer)
        }
        (outer, closed) => outer.or(closed),
    }
}
