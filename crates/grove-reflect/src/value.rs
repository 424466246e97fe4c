//! Dynamically typed values passed to and returned from reflective calls.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::class::ObjectRef;
use crate::context::ContextRef;

/// An argument or result of a reflective call.
///
/// Members are matched by declared parameter type names, not by the variant
/// of the value passed, so the variants only need to cover what the toolkit's
/// API surface exchanges.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    File(PathBuf),
    StrArray(Vec<String>),
    List(Vec<Value>),
    /// A map or `Properties` passed by value.
    Map(BTreeMap<String, Value>),
    Object(ObjectRef),
    /// A class-loading context passed where the toolkit expects a class loader.
    Context(ContextRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Runtime type name, used in diagnostics.
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Str(_) => "java.lang.String".to_string(),
            Value::File(_) => "java.io.File".to_string(),
            Value::StrArray(_) => "java.lang.String[]".to_string(),
            Value::List(_) => "java.util.List".to_string(),
            Value::Map(_) => "java.util.Map".to_string(),
            Value::Object(o) => o.class().name().to_string(),
            Value::Context(_) => "java.lang.ClassLoader".to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::File(p) => write!(f, "File({})", p.display()),
            Value::StrArray(items) => write!(f, "String{items:?}"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Map(m) => f.debug_map().entries(m).finish(),
            Value::Object(o) => write!(f, "{}@{:p}", o.class().name(), *o),
            Value::Context(c) => write!(f, "{c:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&Path> for Value {
    fn from(p: &Path) -> Self {
        Value::File(p.to_path_buf())
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Value::File(p)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<ContextRef> for Value {
    fn from(c: ContextRef) -> Self {
        Value::Context(c)
    }
}
