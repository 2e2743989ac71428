// crates/sedml-rs/src/list_of.rs

//! Owned, ordered child containers (`<listOf...>` elements).

use crate::attributes::{ElementInfo, ReadContext};
use crate::base::{BaseFields, SedBase, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::OperationStatus;
use crate::types::{SedNamespaces, TypeCode};
use crate::visitor::SedVisitor;
use core::fmt;
use log::debug;

/// A type that can live in a [`ListOf`]: one concrete kind, or a closed enum of sibling kinds.
pub trait ListItem: Clone + fmt::Debug + 'static {
    fn node(&self) -> &dyn SedBase;

    fn node_mut(&mut self) -> &mut dyn SedBase;

    /// An empty item for the XML element `name`, or `None` if `name` is not one of this list's kinds.
    fn create(name: &str, namespaces: &SedNamespaces) -> Option<Self>;

    /// The kind tag of the list's items (abstract for sibling enums).
    fn item_type() -> TypeCode;
}

/// Implements [`ListItem`] for concrete node structs built by `new(&SedNamespaces)`.
macro_rules! list_item {
    ($($ty:ty => $info:expr),* $(,)?) => {
        $(
            impl $crate::list_of::ListItem for $ty {
                fn node(&self) -> &dyn $crate::base::SedBase {
                    self
                }

                fn node_mut(&mut self) -> &mut dyn $crate::base::SedBase {
                    self
                }

                fn create(name: &str, namespaces: &$crate::types::SedNamespaces) -> Option<Self> {
                    (name == $info.element_name()).then(|| <$ty>::new(namespaces))
                }

                fn item_type() -> $crate::types::TypeCode {
                    $info.type_code
                }
            }
        )*
    };
}
pub(crate) use list_item;

static LIST_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::ListOf,
    id_required: false,
    attributes: &[],
    allowed_attributes: ErrorCode::SedAllowedAttributes,
    allowed_elements: ErrorCode::SedUnrecognizedElement,
};

/// An ordered list that exclusively owns its items.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOf<T: ListItem> {
    base: BaseFields,
    element_name: &'static str,
    items: Vec<T>,
}

impl<T: ListItem> ListOf<T> {
    pub fn new(element_name: &'static str, namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            element_name,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// The first item whose `id` equals `id`.
    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.node().id() == Some(id))
    }

    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.node().id() == Some(id))
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    // --- Insertion ---

    /// Appends a copy of `item`.
    ///
    /// Checks, in order: required attributes, level, version, namespaces, and
    /// that no item of this list already uses the same id.
    pub fn append(&mut self, item: &T) -> OperationStatus {
        if !item.node().has_required_attributes() {
            return OperationStatus::InvalidObject;
        }
        let status = self.check_addition(item.node());
        if !status.is_success() {
            return status;
        }
        self.adopt(item.clone());
        OperationStatus::Success
    }

    /// Appends `item` itself. On failure the item is dropped.
    pub fn append_and_own(&mut self, item: T) -> OperationStatus {
        let status = self.check_addition(item.node());
        if status.is_success() {
            self.adopt(item);
        }
        status
    }

    /// Appends copies of every item of `other`, stopping at the first failure.
    pub fn append_from(&mut self, other: &ListOf<T>) -> OperationStatus {
        for item in &other.items {
            let status = self.append(item);
            if !status.is_success() {
                return status;
            }
        }
        OperationStatus::Success
    }

    /// Inserts a copy of `item` before `index`, with the same checks as [`ListOf::append`].
    pub fn insert(&mut self, index: usize, item: &T) -> OperationStatus {
        if index > self.items.len() {
            return OperationStatus::IndexExceedsSize;
        }
        if !item.node().has_required_attributes() {
            return OperationStatus::InvalidObject;
        }
        self.insert_and_own(index, item.clone())
    }

    pub fn insert_and_own(&mut self, index: usize, mut item: T) -> OperationStatus {
        if index > self.items.len() {
            return OperationStatus::IndexExceedsSize;
        }
        let status = self.check_addition(item.node());
        if status.is_success() {
            self.attach(&mut item);
            self.items.insert(index, item);
        }
        status
    }

    /// Appends without any checks. Used by the factories and the reader.
    pub(crate) fn append_new(&mut self, item: T) -> &mut T {
        self.adopt(item)
    }

    fn check_addition(&self, node: &dyn SedBase) -> OperationStatus {
        let namespaces = &self.base.namespaces;
        if node.level() != namespaces.level() {
            OperationStatus::LevelMismatch
        } else if node.version() != namespaces.version() {
            OperationStatus::VersionMismatch
        } else if !namespaces.accepts(node.namespaces()) {
            OperationStatus::NamespacesMismatch
        } else if node.id().is_some_and(|id| self.get_by_id(id).is_some()) {
            OperationStatus::DuplicateObjectId
        } else {
            OperationStatus::Success
        }
    }

    fn attach(&self, item: &mut T) {
        let node = item.node_mut();
        node.base_mut()
            .attach(Some(self.base.key()), self.base.document());
        node.connect_to_child();
    }

    fn adopt(&mut self, mut item: T) -> &mut T {
        self.attach(&mut item);
        debug!(
            "{}: appended <{}> {:?}",
            self.element_name,
            item.node().element_name(),
            item.node().id()
        );
        let index = self.items.len();
        self.items.push(item);
        &mut self.items[index]
    }

    // --- Removal ---

    /// Removes and returns the item at `index`, detached from this tree.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let mut item = self.items.remove(index);
        let node = item.node_mut();
        node.base_mut().attach(None, None);
        node.set_document(None);
        Some(item)
    }

    pub fn remove_by_id(&mut self, id: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.node().id() == Some(id))?;
        self.remove(index)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<'a, T: ListItem> IntoIterator for &'a ListOf<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: ListItem> SedBase for ListOf<T> {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &LIST_INFO
    }

    fn element_name(&self) -> &str {
        self.element_name
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        self.items.iter().map(|item| item.node()).collect()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        self.items.iter_mut().map(|item| item.node_mut()).collect()
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        let item = T::create(name, &self.base.namespaces)?;
        Some(self.append_new(item).node_mut())
    }

    fn is_empty_container(&self) -> bool {
        self.items.is_empty()
    }

    fn accept(&self, visitor: &mut dyn SedVisitor) -> bool {
        visitor.visit_list(self, T::item_type());
        for item in &self.items {
            if !item.node().accept(visitor) {
                break;
            }
        }
        visitor.leave_list(self, T::item_type());
        !visitor.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Model, Simulation, SteadyState, UniformTimeCourse};

    fn model(id: &str) -> Model {
        let mut model = Model::new(&SedNamespaces::default());
        let _ = model.set_id(id);
        let _ = model.set_source("urn:sedml:model.xml");
        model
    }

    #[test]
    fn test_append_copies_and_attaches() {
        let ns = SedNamespaces::default();
        let mut list: ListOf<Model> = ListOf::new("listOfModels", &ns);
        let original = model("m1");

        assert_eq!(list.append(&original), OperationStatus::Success);
        assert_eq!(list.len(), 1);

        let stored = list.get(0).unwrap();
        assert_eq!(stored.id(), Some("m1"));
        assert_ne!(stored.base().key(), original.base().key());
        assert_eq!(stored.base().parent(), Some(list.base().key()));
        assert_eq!(original.base().parent(), None);
    }

    #[test]
    fn test_append_check_order() {
        let ns = SedNamespaces::default();
        let mut list: ListOf<Model> = ListOf::new("listOfModels", &ns);

        // Incomplete objects are rejected before anything else.
        let v3 = SedNamespaces::new(1, 3).unwrap();
        let mut incomplete = Model::new(&v3);
        let _ = incomplete.set_id("m1");
        assert_eq!(list.append(&incomplete), OperationStatus::InvalidObject);

        let _ = incomplete.set_source("a.xml");
        assert_eq!(list.append(&incomplete), OperationStatus::VersionMismatch);

        let mut foreign = model("m1");
        foreign.base_mut().namespaces.add_namespace(Some("sbml"), "http://www.sbml.org/sbml/level3/version1/core");
        assert_eq!(list.append(&foreign), OperationStatus::NamespacesMismatch);

        assert_eq!(list.append(&model("m1")), OperationStatus::Success);
        assert_eq!(list.append(&model("m1")), OperationStatus::DuplicateObjectId);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_transfers_ownership() {
        let ns = SedNamespaces::default();
        let mut list: ListOf<Model> = ListOf::new("listOfModels", &ns);
        let _ = list.append(&model("a"));
        let _ = list.append(&model("b"));

        let removed = list.remove_by_id("a").unwrap();
        assert_eq!(removed.id(), Some("a"));
        assert_eq!(removed.base().parent(), None);
        assert_eq!(list.len(), 1);
        assert!(list.get_by_id("a").is_none());
        assert!(list.remove(5).is_none());

        // The detached node can be owned by another list.
        let mut other: ListOf<Model> = ListOf::new("listOfModels", &ns);
        assert_eq!(other.append_and_own(removed), OperationStatus::Success);
        assert_eq!(other.get(0).unwrap().base().parent(), Some(other.base().key()));
    }

    #[test]
    fn test_insert_bounds_and_position() {
        let ns = SedNamespaces::default();
        let mut list: ListOf<Model> = ListOf::new("listOfModels", &ns);
        let _ = list.append(&model("b"));
        assert_eq!(list.insert(3, &model("x")), OperationStatus::IndexExceedsSize);
        assert_eq!(list.insert(0, &model("a")), OperationStatus::Success);
        let ids: Vec<_> = list.iter().filter_map(|m| m.id()).collect();
        assert_eq!(ids, ["a", "b"]);

        assert_eq!(list.insert(1, &model("b")), OperationStatus::DuplicateObjectId);
        assert_eq!(list.insert_and_own(0, model("a")), OperationStatus::DuplicateObjectId);
        assert_eq!(list.append_and_own(model("b")), OperationStatus::DuplicateObjectId);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_heterogeneous_list_creates_each_kind() {
        let ns = SedNamespaces::default();
        let mut list: ListOf<Simulation> = ListOf::new("listOfSimulations", &ns);
        let mut log = crate::diagnostics::ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 4);

        assert!(list.create_object("uniformTimeCourse", &mut ctx).is_some());
        assert!(list.create_object("steadyState", &mut ctx).is_some());
        assert!(list.create_object("model", &mut ctx).is_none());

        assert_eq!(ListOf::<Simulation>::new("x", &ns).element_name(), "x");
        assert!(list.children()[0].is::<UniformTimeCourse>());
        assert!(list.children()[1].is::<SteadyState>());
        assert!(matches!(list.get(1), Some(Simulation::SteadyState(_))));
    }

    #[test]
    fn test_empty_list_is_skipped_on_write() {
        let ns = SedNamespaces::default();
        let list: ListOf<Model> = ListOf::new("listOfModels", &ns);
        assert!(list.is_empty_container());
        assert_eq!(list.type_code(), TypeCode::ListOf);
    }
}
