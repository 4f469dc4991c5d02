//! Synchronous click dispatch.
//!
//! A click targets one node. If that node is a word unit (or sits inside
//! one) the annotator handles it and stops propagation; otherwise the event
//! comes back untouched and the host runs its own action, such as turning
//! the page.

use crate::annotator::Annotator;
use crate::content::{ContentTree, NodeId};
use std::iter;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    target: NodeId,
    propagation_stopped: bool,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self {
            target,
            propagation_stopped: false,
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

pub fn dispatch_click(
    tree: &mut ContentTree,
    annotator: &mut Annotator,
    target: NodeId,
) -> ClickEvent {
    let mut event = ClickEvent::new(target);
    let unit = iter::once(target)
        .chain(tree.ancestors(target))
        .find(|id| tree.is_word_unit(*id));

    match unit {
        Some(unit) => annotator.activate(tree, unit, &mut event),
        None => trace!(node = %event.target(), "Click outside any word unit"),
    }
    event
}
