use crate::content::{ContentTree, NodeId};

/// The at-most-one highlighted unit of the current render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Active(NodeId),
}

impl Selection {
    pub fn active(&self) -> Option<NodeId> {
        match self {
            Selection::Idle => None,
            Selection::Active(unit) => Some(*unit),
        }
    }

    /// Move the highlight to `unit`, clearing the previous one first.
    pub fn activate(&mut self, tree: &mut ContentTree, unit: NodeId, active_class: &str) {
        if let Selection::Active(previous) = *self {
            if previous != unit {
                tree.remove_class(previous, active_class);
            }
        }
        tree.add_class(unit, active_class);
        *self = Selection::Active(unit);
    }

    /// Forget the highlight without touching any tree; used when a new pass
    /// replaces the tree the old unit lived in.
    pub(crate) fn reset(&mut self) {
        *self = Selection::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ElementData;

    #[test]
    fn only_latest_unit_stays_flagged() {
        let mut tree = ContentTree::new();
        let units: Vec<NodeId> = (0..3)
            .map(|_| {
                let span = tree.create_element(ElementData::new("span"));
                tree.append_child(tree.root(), span);
                span
            })
            .collect();

        let mut selection = Selection::default();
        for &unit in [units[0], units[2], units[2], units[1]].iter() {
            selection.activate(&mut tree, unit, "active");
            assert_eq!(tree.elements_with_class("active"), vec![unit]);
        }
        assert_eq!(selection.active(), Some(units[1]));
    }
}
