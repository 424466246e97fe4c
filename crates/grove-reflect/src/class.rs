//! Classes, members and instances of the reflective object model.
//!
//! A [`ClassInfo`] is immutable once built. Members carry their behaviour as
//! closures so that any runtime bridge (or a test double) can describe a
//! toolkit class without this crate knowing how it is executed.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::value::Value;

pub type ClassRef = Arc<ClassInfo>;
pub type ObjectRef = Arc<Instance>;

/// Body of a method. The receiver is [`Value::Null`] for static calls.
pub type MethodBody = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, Throwable> + Send + Sync>;
/// Body of a constructor, run against the freshly allocated instance.
pub type ConstructorBody = Arc<dyn Fn(&ObjectRef, &[Value]) -> Result<(), Throwable> + Send + Sync>;
/// Reader of a field. The receiver is [`Value::Null`] for static fields.
pub type FieldBody = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// A failure raised by the toolkit's own code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{class_name}: {message}")]
pub struct Throwable {
    pub class_name: String,
    pub message: String,
    #[source]
    pub cause: Option<Box<Throwable>>,
}

impl Throwable {
    pub fn new(class_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: Throwable) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// Accessibility flag shared by all member kinds.
#[derive(Debug)]
struct Access(AtomicBool);

impl Access {
    fn new(public: bool) -> Self {
        Self(AtomicBool::new(public))
    }

    fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, accessible: bool) {
        self.0.store(accessible, Ordering::Release);
    }
}

pub struct Method {
    name: String,
    param_types: Vec<String>,
    is_static: bool,
    is_default: bool,
    access: Access,
    body: MethodBody,
}

impl Method {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether this is an interface method with an implementation.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn is_accessible(&self) -> bool {
        self.access.get()
    }

    pub fn set_accessible(&self, accessible: bool) {
        self.access.set(accessible);
    }

    pub(crate) fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value, Throwable> {
        (self.body)(receiver, args)
    }

    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.param_types.join(", "))
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({})", self.signature())
    }
}

pub struct Constructor {
    param_types: Vec<String>,
    access: Access,
    body: ConstructorBody,
}

impl Constructor {
    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }

    pub fn is_accessible(&self) -> bool {
        self.access.get()
    }

    pub fn set_accessible(&self, accessible: bool) {
        self.access.set(accessible);
    }

    pub(crate) fn call(&self, instance: &ObjectRef, args: &[Value]) -> Result<(), Throwable> {
        (self.body)(instance, args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({})", self.param_types.join(", "))
    }
}

pub struct Field {
    name: String,
    type_name: String,
    is_static: bool,
    access: Access,
    body: FieldBody,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_accessible(&self) -> bool {
        self.access.get()
    }

    pub fn set_accessible(&self, accessible: bool) {
        self.access.set(accessible);
    }

    pub(crate) fn read(&self, receiver: &Value) -> Value {
        (self.body)(receiver)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({} {})", self.type_name, self.name)
    }
}

/// Metadata and members of one class.
pub struct ClassInfo {
    name: String,
    superclass: Option<ClassRef>,
    interfaces: Vec<ClassRef>,
    is_interface: bool,
    constructors: Vec<Arc<Constructor>>,
    methods: Vec<Arc<Method>>,
    fields: Vec<Arc<Field>>,
    code_source: Option<String>,
}

impl ClassInfo {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simple name after the last `.` (and `$` for nested classes).
    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.name)
    }

    pub fn superclass(&self) -> Option<&ClassRef> {
        self.superclass.as_ref()
    }

    pub fn interfaces(&self) -> &[ClassRef] {
        &self.interfaces
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    pub fn declared_constructors(&self) -> &[Arc<Constructor>] {
        &self.constructors
    }

    pub fn declared_methods(&self) -> &[Arc<Method>] {
        &self.methods
    }

    pub fn declared_fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    /// Location of the artifact the class was loaded from, if known.
    pub fn code_source(&self) -> Option<&str> {
        self.code_source.as_deref()
    }

    /// Whether this class is `name` or extends or implements it.
    pub fn is_assignable_to(&self, name: &str) -> bool {
        self.name == name
            || self.superclass.as_ref().is_some_and(|s| s.is_assignable_to(name))
            || self.interfaces.iter().any(|i| i.is_assignable_to(name))
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("name", &self.name)
            .field("superclass", &self.superclass.as_ref().map(|s| s.name()))
            .field("constructors", &self.constructors.len())
            .field("methods", &self.methods.len())
            .field("fields", &self.fields.len())
            .finish()
    }
}

fn owned(params: &[&str]) -> Vec<String> {
    params.iter().map(|p| p.to_string()).collect()
}

/// Fluent builder for [`ClassInfo`].
pub struct ClassBuilder {
    class: ClassInfo,
}

impl ClassBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            class: ClassInfo {
                name: name.into(),
                superclass: None,
                interfaces: Vec::new(),
                is_interface: false,
                constructors: Vec::new(),
                methods: Vec::new(),
                fields: Vec::new(),
                code_source: None,
            },
        }
    }

    pub fn extends(mut self, superclass: ClassRef) -> Self {
        self.class.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: ClassRef) -> Self {
        self.class.interfaces.push(interface);
        self
    }

    pub fn interface(mut self) -> Self {
        self.class.is_interface = true;
        self
    }

    pub fn code_source(mut self, location: impl Into<String>) -> Self {
        self.class.code_source = Some(location.into());
        self
    }

    pub fn constructor<F>(mut self, params: &[&str], body: F) -> Self
    where
        F: Fn(&ObjectRef, &[Value]) -> Result<(), Throwable> + Send + Sync + 'static,
    {
        self.class.constructors.push(Arc::new(Constructor {
            param_types: owned(params),
            access: Access::new(true),
            body: Arc::new(body),
        }));
        self
    }

    fn push_method(
        mut self,
        name: &str,
        params: &[&str],
        is_static: bool,
        public: bool,
        body: MethodBody,
    ) -> Self {
        let is_default = self.class.is_interface && !is_static;
        self.class.methods.push(Arc::new(Method {
            name: name.to_string(),
            param_types: owned(params),
            is_static,
            is_default,
            access: Access::new(public),
            body,
        }));
        self
    }

    /// A public instance method. On an interface this is a default method.
    pub fn method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, Throwable> + Send + Sync + 'static,
    {
        self.push_method(name, params, false, true, Arc::new(body))
    }

    /// A non-public instance method; it must be made accessible before use.
    pub fn private_method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, Throwable> + Send + Sync + 'static,
    {
        self.push_method(name, params, false, false, Arc::new(body))
    }

    pub fn static_method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, Throwable> + Send + Sync + 'static,
    {
        self.push_method(name, params, true, true, Arc::new(body))
    }

    pub fn field<F>(mut self, name: &str, type_name: &str, body: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.class.fields.push(Arc::new(Field {
            name: name.to_string(),
            type_name: type_name.to_string(),
            is_static: false,
            access: Access::new(false),
            body: Arc::new(body),
        }));
        self
    }

    pub fn static_field(mut self, name: &str, type_name: &str, value: Value) -> Self {
        self.class.fields.push(Arc::new(Field {
            name: name.to_string(),
            type_name: type_name.to_string(),
            is_static: true,
            access: Access::new(true),
            body: Arc::new(move |_| value.clone()),
        }));
        self
    }

    pub fn build(self) -> ClassRef {
        Arc::new(self.class)
    }
}

/// An allocated object: its class plus named state slots.
pub struct Instance {
    class: ClassRef,
    slots: Mutex<BTreeMap<String, Value>>,
}

impl Instance {
    pub fn new(class: ClassRef) -> ObjectRef {
        Arc::new(Self {
            class,
            slots: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn get(&self, slot: &str) -> Option<Value> {
        self.slots.lock().get(slot).cloned()
    }

    pub fn set(&self, slot: impl Into<String>, value: Value) {
        self.slots.lock().insert(slot.into(), value);
    }

    /// Append to a list slot, creating it when absent.
    pub fn push(&self, slot: &str, value: Value) {
        let mut slots = self.slots.lock();
        match slots.get_mut(slot) {
            Some(Value::List(items)) => items.push(value),
            _ => {
                slots.insert(slot.to_string(), Value::List(vec![value]));
            }
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("slots", &*self.slots.lock())
            .finish()
    }
}
