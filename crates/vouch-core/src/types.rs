//! # Type Descriptors and the Coercion Engine
//!
//! A field declares its type with a [`TypeDescriptor`]. [`resolve`] maps the
//! descriptor to a concrete [`Coercer`], the object that turns a raw input
//! value into a typed value or reports why it cannot.
//!
//! ## Descriptor Shapes
//!
//! | Shape | Resolves to |
//! |-------|-------------|
//! | `Any` (absent) | accepts every value unchanged |
//! | `Tag("int")` | the built-in coercer for that tag |
//! | `Nested([Tag("array"), elem])` | an array whose elements satisfy `elem` |
//! | `Resolved(coercer)` | the coercer itself, unchanged |
//! | `Instance(tag)` | values that are instances of a Rust type |
//!
//! ## Coercion Semantics
//!
//! Built-in coercers follow form-parameter conventions: a string holding
//! a number is accepted where a number is expected, `"true"`/`"false"` are
//! accepted for booleans, and ISO 8601 strings for dates and times. The
//! reverse direction is not performed: a number is never silently turned
//! into a string.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{CoercionError, VouchError, VouchResult};
use crate::value::Value;

/// Turns raw values into typed values.
///
/// Implementations must be pure: the same input always yields the same
/// output, and coercion never mutates shared state.
pub trait Coercer: Send + Sync + fmt::Debug {
    /// Coerce `raw` into this type, or explain why it does not fit.
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError>;

    /// Whether `Null` is an accepted value for this type.
    fn is_optional(&self) -> bool {
        false
    }

    /// The value the type substitutes when a field is absent.
    fn default_value(&self) -> Option<&Value> {
        None
    }

    /// Short type name used in diagnostics.
    fn name(&self) -> String;
}

// ─── Primitive Coercers ──────────────────────────────────────────────

/// The primitive kinds understood by the built-in engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Accepts anything.
    Any,
    /// Only `Null`; an empty string counts as `Null`.
    Nil,
    /// UTF-8 string.
    String,
    /// 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Arbitrary-precision decimal.
    Decimal,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Time of day.
    Time,
    /// Any array.
    Array,
    /// Any string-keyed map.
    Hash,
    /// Symbol.
    Symbol,
}

impl Primitive {
    fn failure(&self) -> CoercionError {
        let message = match self {
            Primitive::Any => "must be any value",
            Primitive::Nil => "must be nil",
            Primitive::String => "must be a string",
            Primitive::Integer => "must be an integer",
            Primitive::Float => "must be a float",
            Primitive::Decimal => "must be a decimal",
            Primitive::Boolean => "must be boolean",
            Primitive::Date => "must be a date",
            Primitive::DateTime => "must be a date time",
            Primitive::Time => "must be a time",
            Primitive::Array => "must be an array",
            Primitive::Hash => "must be a hash",
            Primitive::Symbol => "must be a symbol",
        };
        CoercionError::new(message)
    }
}

impl Coercer for Primitive {
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        let coerced = match (self, raw) {
            (Primitive::Any, v) => Some(v.clone()),

            (Primitive::Nil, Value::Null) => Some(Value::Null),
            (Primitive::Nil, Value::Str(s)) if s.is_empty() => Some(Value::Null),

            (Primitive::String, Value::Str(s)) => Some(Value::Str(s.clone())),

            (Primitive::Integer, Value::Int(i)) => Some(Value::Int(*i)),
            (Primitive::Integer, Value::Str(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

            (Primitive::Float, Value::Float(f)) => Some(Value::Float(*f)),
            (Primitive::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (Primitive::Float, Value::Str(s)) => s.trim().parse::<f64>().ok().map(Value::Float),

            (Primitive::Decimal, Value::Decimal(d)) => Some(Value::Decimal(*d)),
            (Primitive::Decimal, Value::Int(i)) => Some(Value::Decimal(Decimal::from(*i))),
            (Primitive::Decimal, Value::Float(f)) => {
                Decimal::from_str(&f.to_string()).ok().map(Value::Decimal)
            }
            (Primitive::Decimal, Value::Str(s)) => {
                Decimal::from_str(s.trim()).ok().map(Value::Decimal)
            }

            (Primitive::Boolean, Value::Bool(b)) => Some(Value::Bool(*b)),
            (Primitive::Boolean, Value::Str(s)) => parse_bool(s).map(Value::Bool),

            (Primitive::Date, Value::Date(d)) => Some(Value::Date(*d)),
            (Primitive::Date, Value::Str(s)) => {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(Value::Date)
            }

            (Primitive::DateTime, Value::DateTime(dt)) => Some(Value::DateTime(*dt)),
            (Primitive::DateTime, Value::Str(s)) => parse_datetime(s).map(Value::DateTime),

            (Primitive::Time, Value::Time(t)) => Some(Value::Time(*t)),
            (Primitive::Time, Value::Str(s)) => parse_time(s).map(Value::Time),

            (Primitive::Array, Value::Array(items)) => Some(Value::Array(items.clone())),
            (Primitive::Hash, Value::Hash(map)) => Some(Value::Hash(map.clone())),

            (Primitive::Symbol, Value::Symbol(s)) | (Primitive::Symbol, Value::Str(s)) => {
                Some(Value::Symbol(s.clone()))
            }

            _ => None,
        };
        coerced.ok_or_else(|| self.failure())
    }

    fn name(&self) -> String {
        match self {
            Primitive::Any => "any",
            Primitive::Nil => "nil",
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Float => "float",
            Primitive::Decimal => "decimal",
            Primitive::Boolean => "boolean",
            Primitive::Date => "date",
            Primitive::DateTime => "datetime",
            Primitive::Time => "time",
            Primitive::Array => "array",
            Primitive::Hash => "hash",
            Primitive::Symbol => "symbol",
        }
        .to_owned()
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "f" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    // Naive timestamps are read as UTC.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

// ─── Wrapping Coercers ───────────────────────────────────────────────

/// Accepts `Null` in addition to whatever the inner type accepts.
#[derive(Debug, Clone)]
pub struct Optional(pub Arc<dyn Coercer>);

impl Coercer for Optional {
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        self.0.coerce(raw)
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn default_value(&self) -> Option<&Value> {
        self.0.default_value()
    }

    fn name(&self) -> String {
        format!("{}?", self.0.name())
    }
}

/// Carries an immediate default, substituted when the field is absent.
#[derive(Debug, Clone)]
pub struct Defaulted {
    inner: Arc<dyn Coercer>,
    default: Value,
}

impl Defaulted {
    /// Wrap `inner` with a default value.
    pub fn new(inner: Arc<dyn Coercer>, default: Value) -> Self {
        Self { inner, default }
    }
}

impl Coercer for Defaulted {
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        self.inner.coerce(raw)
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        Some(&self.default)
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

/// An array whose every element satisfies `element`.
#[derive(Debug, Clone)]
pub struct ArrayOf(pub Arc<dyn Coercer>);

impl Coercer for ArrayOf {
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        let items = raw.as_array().ok_or_else(|| Primitive::Array.failure())?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.0.coerce(item).map_err(|e| e.at_index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn name(&self) -> String {
        format!("array<{}>", self.0.name())
    }
}

type Check = dyn Fn(&Value) -> bool + Send + Sync;

/// A type narrowed by an extra predicate, checked after coercion.
#[derive(Clone)]
pub struct Constrained {
    inner: Arc<dyn Coercer>,
    check: Arc<Check>,
    message: String,
}

impl Constrained {
    /// Narrow `inner` with `check`, reporting `message` when it fails.
    pub fn new(
        inner: Arc<dyn Coercer>,
        message: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner,
            check: Arc::new(check),
            message: message.into(),
        }
    }
}

impl fmt::Debug for Constrained {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constrained")
            .field("inner", &self.inner)
            .field("message", &self.message)
            .finish()
    }
}

impl Coercer for Constrained {
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        let value = self.inner.coerce(raw)?;
        // Optional inner types pass Null straight through.
        if value.is_null() || (self.check)(&value) {
            Ok(value)
        } else {
            Err(CoercionError::new(self.message.clone()))
        }
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<&Value> {
        self.inner.default_value()
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

// ─── Instance Types ──────────────────────────────────────────────────

/// A capability tag meaning "value must be an instance of `T`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceTag {
    type_id: TypeId,
    type_name: &'static str,
}

impl InstanceTag {
    /// The tag for Rust type `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The Rust type name behind the tag.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn accepts(&self, value: &Value) -> bool {
        let id = self.type_id;
        match value {
            Value::Object(obj) => obj.inner_type_id() == id,
            Value::Str(_) | Value::Symbol(_) => id == TypeId::of::<String>(),
            Value::Int(_) => id == TypeId::of::<i64>(),
            Value::Float(_) => id == TypeId::of::<f64>(),
            Value::Bool(_) => id == TypeId::of::<bool>(),
            Value::Decimal(_) => id == TypeId::of::<Decimal>(),
            Value::Date(_) => id == TypeId::of::<NaiveDate>(),
            Value::DateTime(_) => id == TypeId::of::<DateTime<FixedOffset>>(),
            Value::Time(_) => id == TypeId::of::<NaiveTime>(),
            Value::Array(_) => id == TypeId::of::<Vec<Value>>(),
            Value::Hash(_) => id == TypeId::of::<BTreeMap<String, Value>>(),
            _ => false,
        }
    }
}

/// Coercer for [`InstanceTag`]; never converts, only checks.
#[derive(Debug, Clone, Copy)]
pub struct InstanceOf(pub InstanceTag);

impl Coercer for InstanceOf {
    fn coerce(&self, raw: &Value) -> Result<Value, CoercionError> {
        if self.0.accepts(raw) {
            Ok(raw.clone())
        } else {
            Err(CoercionError::new(format!(
                "must be an instance of {}",
                self.0.type_name
            )))
        }
    }

    fn name(&self) -> String {
        self.0.type_name.to_owned()
    }
}

// ─── Descriptors ─────────────────────────────────────────────────────

/// The declared type of a field, before resolution.
#[derive(Debug, Clone, Default)]
pub enum TypeDescriptor {
    /// No type declared; any value is accepted.
    #[default]
    Any,
    /// A primitive tag such as `"int"` or `"date"`.
    Tag(String),
    /// The nested array shape `[array_tag, element_descriptor]`.
    Nested(Vec<TypeDescriptor>),
    /// A coercer supplied directly by the caller.
    Resolved(Arc<dyn Coercer>),
    /// Values must be instances of a Rust type.
    Instance(InstanceTag),
}

impl TypeDescriptor {
    /// Shorthand for a primitive tag.
    pub fn tag(tag: impl Into<String>) -> Self {
        TypeDescriptor::Tag(tag.into())
    }

    /// Shorthand for `[array, element]`.
    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor::Nested(vec![TypeDescriptor::tag("array"), element])
    }

    /// Shorthand for an instance-of-`T` check.
    pub fn instance_of<T: Any>() -> Self {
        TypeDescriptor::Instance(InstanceTag::of::<T>())
    }

    /// Shorthand for a caller-built coercer.
    pub fn resolved(coercer: impl Coercer + 'static) -> Self {
        TypeDescriptor::Resolved(Arc::new(coercer))
    }
}

impl From<&str> for TypeDescriptor {
    fn from(tag: &str) -> Self {
        TypeDescriptor::tag(tag)
    }
}

impl From<Primitive> for TypeDescriptor {
    fn from(p: Primitive) -> Self {
        TypeDescriptor::Resolved(Arc::new(p))
    }
}

/// Map a primitive tag (including aliases) to its kind.
pub fn primitive_for_tag(tag: &str) -> VouchResult<Primitive> {
    let primitive = match tag {
        "string" | "str" => Primitive::String,
        "integer" | "int" => Primitive::Integer,
        "float" => Primitive::Float,
        "decimal" => Primitive::Decimal,
        "boolean" | "bool" => Primitive::Boolean,
        "date" => Primitive::Date,
        "datetime" => Primitive::DateTime,
        "time" => Primitive::Time,
        "array" => Primitive::Array,
        "hash" => Primitive::Hash,
        "symbol" | "sym" => Primitive::Symbol,
        "any" => Primitive::Any,
        "nil" => Primitive::Nil,
        other => return Err(VouchError::UnknownTypeTag(other.to_owned())),
    };
    Ok(primitive)
}

/// Resolve a descriptor to a concrete coercer.
///
/// # Errors
///
/// - [`VouchError::UnknownTypeTag`] for a tag outside the supported set.
/// - [`VouchError::InvalidTypeDescriptor`] for a nested shape that is not
///   exactly `[array, element]`.
pub fn resolve(descriptor: &TypeDescriptor) -> VouchResult<Arc<dyn Coercer>> {
    match descriptor {
        TypeDescriptor::Any => Ok(Arc::new(Primitive::Any)),
        TypeDescriptor::Tag(tag) => Ok(Arc::new(primitive_for_tag(tag)?)),
        TypeDescriptor::Nested(parts) => match parts.as_slice() {
            [TypeDescriptor::Tag(head), element] if head == "array" => {
                Ok(Arc::new(ArrayOf(resolve(element)?)))
            }
            _ => Err(VouchError::InvalidTypeDescriptor(format!(
                "nested descriptor must be [array, element], got {} part(s)",
                parts.len()
            ))),
        },
        TypeDescriptor::Resolved(coercer) => Ok(Arc::clone(coercer)),
        TypeDescriptor::Instance(tag) => Ok(Arc::new(InstanceOf(*tag))),
    }
}
