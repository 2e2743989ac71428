// crates/sedml-rs/src/identity.rs

//! Identifier syntax, the id namespace of a tree, and reference checking.

use crate::attributes::AttrKind;
use crate::base::{NodeKey, SedBase};
use crate::diagnostics::ErrorCode;
use crate::types::TypeCode;
use std::collections::BTreeMap;

// --- Syntax ---

/// `SId ::= (letter | '_') (letter | digit | '_')*`
pub fn is_valid_sid(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// XML `ID` (an NCName): no colon, starts with a letter or `_`.
pub fn is_valid_xml_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.') || is_combining(c))
}

fn is_combining(c: char) -> bool {
    matches!(c, '\u{00B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}'..='\u{2040}')
}

/// Renames `<ci>` references inside a MathML fragment. Returns the number replaced.
pub fn rename_in_math(math: &mut String, old_id: &str, new_id: &str) -> usize {
    let mut out = String::with_capacity(math.len());
    let mut rest = math.as_str();
    let mut renamed = 0;

    while let Some(open) = rest.find("<ci") {
        let after = &rest[open + 3..];
        let Some(gt) = after.find('>') else {
            break;
        };
        let is_ci_tag = after.starts_with(|c: char| c == '>' || c.is_whitespace());
        if !is_ci_tag || after[..gt].ends_with('/') {
            out.push_str(&rest[..open + 3]);
            rest = after;
            continue;
        }
        let content_start = open + 3 + gt + 1;
        let Some(close) = rest[content_start..].find("</ci>") else {
            break;
        };
        let content = &rest[content_start..content_start + close];
        out.push_str(&rest[..content_start]);
        if content.trim() == old_id {
            out.push_str(&content.replacen(old_id, new_id, 1));
            renamed += 1;
        } else {
            out.push_str(content);
        }
        rest = &rest[content_start + close..];
    }

    if renamed > 0 {
        out.push_str(rest);
        *math = out;
    }
    renamed
}

// --- Identity Space ---

/// One declaration of an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdEntry {
    pub id: String,
    pub key: NodeKey,
    pub type_code: TypeCode,
    pub element: String,
    pub line: u32,
    pub column: u32,
}

/// A SIdRef attribute that names nothing, or names a node of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub element: String,
    pub attribute: &'static str,
    pub value: String,
    pub expected: TypeCode,
    /// The kind actually found under that id, if any.
    pub found: Option<TypeCode>,
    pub code: Option<ErrorCode>,
    pub line: u32,
    pub column: u32,
}

/// Every id declared in a tree, grouped by scope.
///
/// `variable` and `parameter` ids are local to the element that owns their
/// list (a data generator or functional range). Every other id shares the
/// document-wide scope, keyed by `None`.
#[derive(Debug, Default)]
pub struct IdentitySpace {
    scopes: BTreeMap<Option<NodeKey>, BTreeMap<String, Vec<IdEntry>>>,
}

impl IdentitySpace {
    pub fn build(root: &dyn SedBase) -> Self {
        let mut space = IdentitySpace::default();
        space.collect(root, None);
        space
    }

    fn collect(&mut self, node: &dyn SedBase, owner: Option<NodeKey>) {
        if let Some(id) = node.id() {
            let scope = if is_locally_scoped(node.type_code()) {
                owner
            } else {
                None
            };
            let entry = IdEntry {
                id: id.to_string(),
                key: node.base().key(),
                type_code: node.type_code(),
                element: node.element_name().to_string(),
                line: node.line(),
                column: node.column(),
            };
            self.scopes
                .entry(scope)
                .or_default()
                .entry(entry.id.clone())
                .or_default()
                .push(entry);
        }
        let child_owner = if node.type_code() == TypeCode::ListOf {
            owner
        } else {
            Some(node.base().key())
        };
        for child in node.children() {
            self.collect(child, child_owner);
        }
    }

    /// The first document-wide declaration of `id`.
    pub fn resolve(&self, id: &str) -> Option<&IdEntry> {
        self.scopes.get(&None)?.get(id)?.first()
    }

    pub fn len(&self) -> usize {
        self.scopes
            .values()
            .flat_map(|scope| scope.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every declaration after the first of an id within its scope.
    pub fn duplicates(&self) -> Vec<&IdEntry> {
        self.scopes
            .values()
            .flat_map(|scope| scope.values())
            .flat_map(|entries| entries.iter().skip(1))
            .collect()
    }

    /// SIdRef attributes in `root`'s subtree that do not resolve to a node of the declared kind.
    pub fn unresolved_references(&self, root: &dyn SedBase) -> Vec<UnresolvedReference> {
        let mut found = Vec::new();
        self.check_references(root, &mut found);
        found
    }

    fn check_references(&self, node: &dyn SedBase, found: &mut Vec<UnresolvedReference>) {
        for spec in node.info().attributes {
            let AttrKind::SIdRef(expected) = spec.kind else {
                continue;
            };
            let Some(value) = node.get_attribute(spec.name) else {
                continue;
            };
            let target = self.resolve(&value).map(|entry| entry.type_code);
            if target.is_some_and(|kind| kind.is_a(expected)) {
                continue;
            }
            found.push(UnresolvedReference {
                element: node.element_name().to_string(),
                attribute: spec.name,
                value,
                expected,
                found: target,
                code: spec.invalid_code,
                line: node.line(),
                column: node.column(),
            });
        }
        for child in node.children() {
            self.check_references(child, found);
        }
    }
}

fn is_locally_scoped(kind: TypeCode) -> bool {
    matches!(kind, TypeCode::Variable | TypeCode::Parameter)
}
