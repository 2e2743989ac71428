// crates/sedml-rs/src/visitor.rs

//! Pre-order traversal and element filtering.

use crate::base::SedBase;
use crate::document::SedDocument;
use crate::types::TypeCode;

/// Callbacks for a depth-first walk of a SED-ML tree.
///
/// The document is visited first, then each list (tagged with the kind of
/// its items), then each node in declared-field order. `leave` fires on the
/// way back up. Every method has a no-op default.
pub trait SedVisitor {
    fn visit_document(&mut self, _doc: &SedDocument) {}

    fn leave_document(&mut self, _doc: &SedDocument) {}

    fn visit_list(&mut self, _list: &dyn SedBase, _item_type: TypeCode) {}

    fn leave_list(&mut self, _list: &dyn SedBase, _item_type: TypeCode) {}

    /// Returns `false` to skip the node's children.
    fn visit(&mut self, _node: &dyn SedBase) -> bool {
        true
    }

    fn leave(&mut self, _node: &dyn SedBase) {}

    /// Returns `true` to stop the walk early.
    fn is_done(&self) -> bool {
        false
    }
}

/// Decides which nodes [`SedBase::get_all_elements`] returns.
pub trait ElementFilter {
    fn filter(&self, node: &dyn SedBase) -> bool;

    /// Whether to look inside `node`. Rejected nodes are still descended into.
    fn descend(&self, _node: &dyn SedBase) -> bool {
        true
    }
}

/// Any closure over a node is a filter.
impl<F> ElementFilter for F
where
    F: Fn(&dyn SedBase) -> bool,
{
    fn filter(&self, node: &dyn SedBase) -> bool {
        self(node)
    }
}

/// Accepts nodes of one kind, or of any kind derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeFilter(pub TypeCode);

impl ElementFilter for TypeFilter {
    fn filter(&self, node: &dyn SedBase) -> bool {
        node.type_code().is_a(self.0)
    }
}

/// Pushes `node` (if accepted) and then its descendants onto `found`.
pub(crate) fn collect_elements<'a>(
    node: &'a dyn SedBase,
    filter: Option<&dyn ElementFilter>,
    found: &mut Vec<&'a dyn SedBase>,
) {
    if filter.is_none_or(|f| f.filter(node)) {
        found.push(node);
    }
    if filter.is_none_or(|f| f.descend(node)) {
        for child in node.children() {
            collect_elements(child, filter, found);
        }
    }
}

/// Collects the ids of every node in visiting order.
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl SedVisitor for IdCollector {
    fn visit(&mut self, node: &dyn SedBase) -> bool {
        if let Some(id) = node.id() {
            self.ids.push(id.to_string());
        }
        true
    }
}
