// crates/sedml-rs/src/attributes.rs

//! Typed attribute marshaling.
//!
//! Each element kind declares its attributes once, as a static table of
//! [`AttributeSpec`]s, and exposes the backing storage through [`Slot`] /
//! [`SlotMut`]. The generic read and write paths in [`crate::base`] drive the
//! codec functions here from that table, so per-kind code only has to map
//! attribute names to fields.

use crate::diagnostics::{ErrorCode, ErrorLog};
use crate::error::{OperationStatus, SedmlError};
use crate::identity::{is_valid_sid, is_valid_xml_id};
use crate::types::TypeCode;
use crate::xml::{AttributeSource, XmlSink};

// --- Declarations ---

/// The value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    Bool,
    Int,
    UInt,
    Double,
    Str,
    /// An identifier declaration.
    SId,
    /// A reference to the `id` of a node of the given kind.
    SIdRef(TypeCode),
    /// One of a fixed set of tokens; the slot knows which.
    Enum,
}

/// Static description of one attribute of an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub kind: AttrKind,
    pub required: bool,
    /// Code logged when the text cannot be converted (or a reference does not
    /// resolve). `None` falls back to the element's "allowed attributes" code.
    pub invalid_code: Option<ErrorCode>,
    /// Alternative spellings accepted when reading. Never written.
    pub aliases: &'static [&'static str],
}

impl AttributeSpec {
    pub const fn new(name: &'static str, kind: AttrKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            invalid_code: None,
            aliases: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn invalid(mut self, code: ErrorCode) -> Self {
        self.invalid_code = Some(code);
        self
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, AttrKind::SIdRef(_))
    }

    /// Finds the raw text of this attribute, trying aliases after the canonical name.
    pub fn lookup<'s>(&self, source: &'s dyn AttributeSource) -> Option<&'s str> {
        source
            .get(self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| source.get(alias)))
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// Kind-independent metadata shared by every instance of an element kind.
#[derive(Debug)]
pub struct ElementInfo {
    pub type_code: TypeCode,
    pub id_required: bool,
    /// Kind-specific attributes, in write order. `id`, `name` and `metaid` are implied.
    pub attributes: &'static [AttributeSpec],
    /// Logged for unknown or missing attributes.
    pub allowed_attributes: ErrorCode,
    /// Logged for unknown, repeated or missing child elements.
    pub allowed_elements: ErrorCode,
}

impl ElementInfo {
    pub fn element_name(&self) -> &'static str {
        self.type_code.element_name()
    }

    pub fn spec(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes.iter().find(|s| s.matches_name(name))
    }
}

/// Attributes every node may carry.
pub const CORE_ATTRIBUTES: &[&str] = &["id", "name", "metaid"];

// --- Enumerations ---

/// An attribute type with a closed set of textual values.
pub trait XmlEnum: Copy + Sized + 'static {
    const VALUES: &'static [(Self, &'static str)];

    fn from_xml(text: &str) -> Option<Self>;

    fn as_xml(self) -> &'static str;
}

/// Object-safe view of an `Option<E: XmlEnum>` field.
pub trait EnumSlot {
    fn get_str(&self) -> Option<&'static str>;

    /// Sets from text. Returns `false` and leaves the value unset when the text is not a member.
    fn set_str(&mut self, text: &str) -> bool;

    /// Whether `text` names a member, without touching the value.
    fn accepts(&self, text: &str) -> bool;

    fn clear(&mut self);
}

impl<E> EnumSlot for Option<E>
where
    E: XmlEnum + PartialEq,
{
    fn get_str(&self) -> Option<&'static str> {
        self.map(E::as_xml)
    }

    fn set_str(&mut self, text: &str) -> bool {
        *self = E::from_xml(text);
        self.is_some()
    }

    fn accepts(&self, text: &str) -> bool {
        E::from_xml(text).is_some()
    }

    fn clear(&mut self) {
        *self = None;
    }
}

// --- Slots ---

/// Read-only view of an attribute's storage.
pub enum Slot<'a> {
    Bool(&'a Option<bool>),
    Int(&'a Option<i32>),
    UInt(&'a Option<u32>),
    Double(&'a Option<f64>),
    Str(&'a Option<String>),
    Enum(&'a dyn EnumSlot),
}

/// Mutable view of an attribute's storage.
pub enum SlotMut<'a> {
    Bool(&'a mut Option<bool>),
    Int(&'a mut Option<i32>),
    UInt(&'a mut Option<u32>),
    Double(&'a mut Option<f64>),
    Str(&'a mut Option<String>),
    Enum(&'a mut dyn EnumSlot),
}

impl Slot<'_> {
    pub fn is_set(&self) -> bool {
        match self {
            Slot::Bool(v) => v.is_some(),
            Slot::Int(v) => v.is_some(),
            Slot::UInt(v) => v.is_some(),
            Slot::Double(v) => v.is_some(),
            Slot::Str(v) => v.is_some(),
            Slot::Enum(v) => v.get_str().is_some(),
        }
    }

    /// The value as it would be written to XML.
    pub fn to_xml(&self) -> Option<String> {
        match self {
            Slot::Bool(v) => v.map(|b| b.to_string()),
            Slot::Int(v) => v.map(|i| i.to_string()),
            Slot::UInt(v) => v.map(|u| u.to_string()),
            Slot::Double(v) => v.map(format_double),
            Slot::Str(v) => (*v).clone(),
            Slot::Enum(v) => v.get_str().map(str::to_string),
        }
    }
}

fn assign_parsed<T>(slot: &mut Option<T>, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

impl SlotMut<'_> {
    /// Parses `text` into the slot.
    ///
    /// On failure the slot is left unset and `false` is returned.
    pub fn set_from_xml(&mut self, text: &str) -> bool {
        match self {
            SlotMut::Bool(v) => {
                **v = parse_bool(text);
                v.is_some()
            }
            SlotMut::Int(v) => {
                **v = text.trim().parse().ok();
                v.is_some()
            }
            SlotMut::UInt(v) => {
                **v = text.trim().parse().ok();
                v.is_some()
            }
            SlotMut::Double(v) => {
                **v = parse_double(text);
                v.is_some()
            }
            SlotMut::Str(v) => {
                **v = Some(text.to_string());
                true
            }
            SlotMut::Enum(v) => v.set_str(text.trim()),
        }
    }

    /// Parses `text` into the slot, keeping the previous value when it does not convert.
    pub fn try_set_from_xml(&mut self, text: &str) -> bool {
        match self {
            SlotMut::Bool(v) => assign_parsed(&mut **v, parse_bool(text)),
            SlotMut::Int(v) => assign_parsed(&mut **v, text.trim().parse().ok()),
            SlotMut::UInt(v) => assign_parsed(&mut **v, text.trim().parse().ok()),
            SlotMut::Double(v) => assign_parsed(&mut **v, parse_double(text)),
            SlotMut::Str(v) => {
                **v = Some(text.to_string());
                true
            }
            SlotMut::Enum(v) => v.accepts(text.trim()) && v.set_str(text.trim()),
        }
    }

    pub fn clear(&mut self) {
        match self {
            SlotMut::Bool(v) => **v = None,
            SlotMut::Int(v) => **v = None,
            SlotMut::UInt(v) => **v = None,
            SlotMut::Double(v) => **v = None,
            SlotMut::Str(v) => **v = None,
            SlotMut::Enum(v) => v.clear(),
        }
    }
}

// --- Value Conversion ---

/// XML Schema boolean: `true`, `false`, `1`, `0`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// XML Schema double, including `INF`, `-INF` and `NaN`.
pub fn parse_double(text: &str) -> Option<f64> {
    match text.trim() {
        "INF" | "+INF" | "inf" | "+inf" => Some(f64::INFINITY),
        "-INF" | "-inf" => Some(f64::NEG_INFINITY),
        "NaN" | "nan" => Some(f64::NAN),
        other if other.is_empty() => None,
        other => other.parse().ok().filter(|v: &f64| v.is_finite()),
    }
}

pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

// --- Reading ---

/// Where attribute diagnostics go, and what they are attributed to.
pub struct ReadContext<'a> {
    pub log: &'a mut ErrorLog,
    pub level: u32,
    pub version: u32,
    /// Check `id`/`metaid`/reference syntax while reading.
    pub validate_ids: bool,
}

impl<'a> ReadContext<'a> {
    pub fn new(log: &'a mut ErrorLog, level: u32, version: u32) -> Self {
        Self {
            log,
            level,
            version,
            validate_ids: true,
        }
    }

    pub fn log_error(&mut self, code: ErrorCode, details: &str, line: u32, column: u32) {
        self.log
            .log_error(code, self.level, self.version, details, line, column);
    }
}

/// Location and identity of the element whose attributes are being read.
pub struct ElementRef<'a> {
    pub element: &'a str,
    pub id: Option<&'a str>,
    pub line: u32,
    pub column: u32,
    pub allowed_attributes: ErrorCode,
}

impl ElementRef<'_> {
    fn describe(&self) -> String {
        match self.id {
            Some(id) => format!("<{}> with id '{}'", self.element, id),
            None => format!("<{}>", self.element),
        }
    }
}

/// Reads one declared attribute into its slot.
///
/// Returns whether the attribute was present. Conversion problems are logged
/// with the attribute's own code; a missing required attribute is logged with
/// the element's "allowed attributes" code.
pub fn read_attribute(
    spec: &AttributeSpec,
    source: &dyn AttributeSource,
    mut slot: SlotMut<'_>,
    element: &ElementRef<'_>,
    ctx: &mut ReadContext<'_>,
) -> bool {
    let invalid_code = spec.invalid_code.unwrap_or(element.allowed_attributes);
    let Some(text) = spec.lookup(source) else {
        slot.clear();
        if spec.required {
            let details = format!(
                "Sedml attribute '{}' is missing from the {} element.",
                spec.name,
                element.describe()
            );
            ctx.log_error(
                element.allowed_attributes,
                &details,
                element.line,
                element.column,
            );
        }
        return false;
    };

    match spec.kind {
        AttrKind::Str | AttrKind::SId | AttrKind::SIdRef(_) => {
            if text.is_empty() && spec.kind != AttrKind::Str {
                let details = format!(
                    "Attribute '{}' on the {} is empty.",
                    spec.name,
                    element.describe()
                );
                ctx.log_error(element.allowed_attributes, &details, element.line, element.column);
                slot.clear();
                return true;
            }
            slot.set_from_xml(text);
            if ctx.validate_ids && spec.kind != AttrKind::Str && !is_valid_sid(text) {
                let code = match spec.kind {
                    AttrKind::SId => ErrorCode::SedmlIdSyntaxRule,
                    _ => invalid_code,
                };
                let details = format!(
                    "The {} attribute on the {} is '{}', which does not conform to the syntax.",
                    spec.name,
                    element.describe(),
                    text
                );
                ctx.log_error(code, &details, element.line, element.column);
            }
        }
        _ => {
            if !slot.set_from_xml(text) {
                let expected = match spec.kind {
                    AttrKind::Bool => "a boolean",
                    AttrKind::Int => "an integer",
                    AttrKind::UInt => "a non-negative integer",
                    AttrKind::Double => "a double",
                    _ => "one of the allowed values",
                };
                let details = format!(
                    "Attribute '{}' on the {} must be {}, but is '{}'.",
                    spec.name,
                    element.describe(),
                    expected,
                    text
                );
                ctx.log_error(invalid_code, &details, element.line, element.column);
            }
        }
    }
    true
}

// --- Writing ---

/// Writes an attribute only if its slot is set.
pub fn write_attribute(
    name: &str,
    slot: Slot<'_>,
    sink: &mut dyn XmlSink,
) -> Result<(), SedmlError> {
    match slot.to_xml() {
        Some(value) => sink.write_attribute(name, &value),
        None => Ok(()),
    }
}

// --- Generic Set ---

/// Assigns `value` to `slot` after checking it against `spec`.
///
/// A rejected value leaves the slot as it was.
pub fn set_checked(spec: &AttributeSpec, mut slot: SlotMut<'_>, value: &str) -> OperationStatus {
    match spec.kind {
        AttrKind::SId | AttrKind::SIdRef(_) if !is_valid_sid(value) => {
            OperationStatus::InvalidAttributeValue
        }
        _ => {
            if slot.try_set_from_xml(value) {
                OperationStatus::Success
            } else {
                OperationStatus::InvalidAttributeValue
            }
        }
    }
}

/// Validates a `metaid` value.
pub fn check_metaid(value: &str) -> OperationStatus {
    if is_valid_xml_id(value) {
        OperationStatus::Success
    } else {
        OperationStatus::InvalidAttributeValue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlAttributes;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shape {
        Round,
        Flat,
    }

    impl XmlEnum for Shape {
        const VALUES: &'static [(Self, &'static str)] = &[(Shape::Round, "round"), (Shape::Flat, "flat")];

        fn from_xml(text: &str) -> Option<Self> {
            Self::VALUES.iter().find(|(_, s)| *s == text).map(|(v, _)| *v)
        }

        fn as_xml(self) -> &'static str {
            Self::VALUES
                .iter()
                .find(|(v, _)| *v == self)
                .map_or("", |(_, s)| *s)
        }
    }

    fn element() -> ElementRef<'static> {
        ElementRef {
            element: "thing",
            id: Some("t1"),
            line: 4,
            column: 2,
            allowed_attributes: ErrorCode::SedAllowedAttributes,
        }
    }

    fn source(pairs: &[(&str, &str)]) -> XmlAttributes {
        let mut attrs = XmlAttributes::default();
        for (k, v) in pairs {
            attrs.push(k, v);
        }
        attrs
    }

    #[test]
    fn test_double_reads_special_values() {
        assert_eq!(parse_double("INF"), Some(f64::INFINITY));
        assert_eq!(parse_double("-INF"), Some(f64::NEG_INFINITY));
        assert!(parse_double("NaN").unwrap().is_nan());
        assert_eq!(parse_double(" 1.5e3 "), Some(1500.0));
        assert_eq!(parse_double("abc"), None);
        assert_eq!(format_double(f64::NEG_INFINITY), "-INF");
        assert_eq!(format_double(2.5), "2.5");
    }

    #[test]
    fn test_bad_integer_logs_attribute_code() {
        let spec = AttributeSpec::new("numberOfPoints", AttrKind::Int)
            .required()
            .invalid(ErrorCode::SedmlUniformTimeCourseNumberOfPointsMustBeInteger);
        let attrs = source(&[("numberOfPoints", "ten")]);
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 3);
        let mut value: Option<i32> = Some(3);

        let present = read_attribute(&spec, &attrs, SlotMut::Int(&mut value), &element(), &mut ctx);

        assert!(present);
        assert_eq!(value, None);
        assert_eq!(log.num_errors(), 1);
        let error = log.get(0).unwrap();
        assert_eq!(
            error.error_id,
            ErrorCode::SedmlUniformTimeCourseNumberOfPointsMustBeInteger
        );
        assert_eq!((error.line, error.column), (4, 2));
    }

    #[test]
    fn test_missing_required_attribute_uses_allowed_code() {
        let spec = AttributeSpec::new("source", AttrKind::Str).required();
        let attrs = source(&[]);
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 4);
        let mut value: Option<String> = None;

        assert!(!read_attribute(&spec, &attrs, SlotMut::Str(&mut value), &element(), &mut ctx));
        assert_eq!(log.num_errors(), 1);
        assert_eq!(log.get(0).unwrap().error_id, ErrorCode::SedAllowedAttributes);
        assert!(log.get(0).unwrap().message.contains("'source'"));
    }

    #[test]
    fn test_invalid_enum_leaves_slot_unset() {
        let spec = AttributeSpec::new("shape", AttrKind::Enum)
            .invalid(ErrorCode::SedmlSurfaceTypeMustBeSurfaceTypeEnum);
        let attrs = source(&[("shape", "square")]);
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 4);
        let mut value: Option<Shape> = None;

        read_attribute(&spec, &attrs, SlotMut::Enum(&mut value), &element(), &mut ctx);
        assert_eq!(value, None);
        assert!(ctx.log.contains(ErrorCode::SedmlSurfaceTypeMustBeSurfaceTypeEnum));

        let attrs = source(&[("shape", "flat")]);
        read_attribute(&spec, &attrs, SlotMut::Enum(&mut value), &element(), &mut ctx);
        assert_eq!(value, Some(Shape::Flat));
    }

    #[test]
    fn test_alias_is_accepted_on_read() {
        let spec = AttributeSpec::new("concatenate", AttrKind::Bool).aliases(&["concatentate"]);
        let attrs = source(&[("concatentate", "true")]);
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 3);
        let mut value = None;
        assert!(read_attribute(&spec, &attrs, SlotMut::Bool(&mut value), &element(), &mut ctx));
        assert_eq!(value, Some(true));
        assert!(log.is_empty());
    }

    #[test]
    fn test_bad_reference_syntax_is_logged_but_kept() {
        let spec = AttributeSpec::new("modelReference", AttrKind::SIdRef(TypeCode::Model))
            .invalid(ErrorCode::SedmlTaskModelReferenceMustBeModel);
        let attrs = source(&[("modelReference", "1model")]);
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 3);
        let mut value = None;
        read_attribute(&spec, &attrs, SlotMut::Str(&mut value), &element(), &mut ctx);
        assert_eq!(value.as_deref(), Some("1model"));
        assert!(log.contains(ErrorCode::SedmlTaskModelReferenceMustBeModel));
    }

    #[test]
    fn test_write_skips_unset_slots() {
        struct Recorder(Vec<(String, String)>);
        impl XmlSink for Recorder {
            fn start_element(&mut self, _: &str) -> Result<(), SedmlError> {
                Ok(())
            }
            fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), SedmlError> {
                self.0.push((name.to_string(), value.to_string()));
                Ok(())
            }
            fn write_text(&mut self, _: &str) -> Result<(), SedmlError> {
                Ok(())
            }
            fn write_raw(&mut self, _: &str) -> Result<(), SedmlError> {
                Ok(())
            }
            fn end_element(&mut self, _: &str) -> Result<(), SedmlError> {
                Ok(())
            }
        }

        let mut sink = Recorder(Vec::new());
        write_attribute("a", Slot::Double(&None), &mut sink).unwrap();
        write_attribute("b", Slot::Bool(&Some(false)), &mut sink).unwrap();
        assert_eq!(sink.0, vec![("b".to_string(), "false".to_string())]);
    }

    #[test]
    fn test_set_checked_rejects_bad_values() {
        let spec = AttributeSpec::new("step", AttrKind::Double);
        let mut value = None;
        assert_eq!(
            set_checked(&spec, SlotMut::Double(&mut value), "fast"),
            OperationStatus::InvalidAttributeValue
        );
        assert_eq!(
            set_checked(&spec, SlotMut::Double(&mut value), "0.1"),
            OperationStatus::Success
        );
        assert_eq!(value, Some(0.1));
        assert_eq!(check_metaid("_m1"), OperationStatus::Success);
        assert_eq!(check_metaid("1m"), OperationStatus::InvalidAttributeValue);
    }

    #[test]
    fn test_rejected_set_keeps_previous_value() {
        let spec = AttributeSpec::new("numberOfPoints", AttrKind::Int);
        let mut points = None;
        assert_eq!(
            set_checked(&spec, SlotMut::Int(&mut points), "10"),
            OperationStatus::Success
        );
        assert_eq!(
            set_checked(&spec, SlotMut::Int(&mut points), "ten"),
            OperationStatus::InvalidAttributeValue
        );
        assert_eq!(points, Some(10));

        let spec = AttributeSpec::new("shape", AttrKind::Enum);
        let mut shape = Some(Shape::Flat);
        assert_eq!(
            set_checked(&spec, SlotMut::Enum(&mut shape), "square"),
            OperationStatus::InvalidAttributeValue
        );
        assert_eq!(shape, Some(Shape::Flat));
    }
}
