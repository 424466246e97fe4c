//! Member lookup and invocation.
//!
//! Lookups walk the superclass chain for an exact signature match and fail
//! with [`GroveError::MemberNotFound`]. Invocations force accessibility and
//! report two kinds of failure: [`GroveError::ReflectiveUsage`] when the
//! request itself is malformed, and [`GroveError::InvocationFailed`] when the
//! toolkit's own code threw.

use std::iter;
use std::sync::Arc;

use grove_util::errors::{GroveError, GroveResult};

use crate::class::{ClassRef, Constructor, Field, Instance, Method};
use crate::context::ClassContext;
use crate::value::Value;

/// A constructor together with the class it instantiates.
#[derive(Debug, Clone)]
pub struct BoundConstructor {
    pub class: ClassRef,
    pub constructor: Arc<Constructor>,
}

fn lineage(class: &ClassRef) -> impl Iterator<Item = ClassRef> {
    iter::successors(Some(class.clone()), |c| c.superclass().cloned())
}

fn params_match(declared: &[String], wanted: &[&str]) -> bool {
    declared.len() == wanted.len() && declared.iter().zip(wanted).all(|(d, w)| d == w)
}

/// Load a class by name from a context.
pub fn find_class(context: &dyn ClassContext, name: &str) -> GroveResult<ClassRef> {
    context
        .load_class(name)
        .ok_or_else(|| GroveError::MemberNotFound {
            message: format!("Unable to find class {name}"),
        })
}

/// Find a constructor with exactly the given parameter types.
pub fn find_constructor(class: &ClassRef, param_types: &[&str]) -> GroveResult<BoundConstructor> {
    for candidate in lineage(class) {
        let found = candidate
            .declared_constructors()
            .iter()
            .find(|c| params_match(c.param_types(), param_types));
        if let Some(constructor) = found {
            return Ok(BoundConstructor {
                class: candidate.clone(),
                constructor: constructor.clone(),
            });
        }
    }
    Err(GroveError::MemberNotFound {
        message: format!(
            "Unable to find constructor {}({})",
            class.name(),
            param_types.join(", ")
        ),
    })
}

/// Find a method by name and exact parameter types.
///
/// Each class in the chain is searched before the default methods of the
/// interfaces it implements directly.
pub fn find_method(class: &ClassRef, name: &str, param_types: &[&str]) -> GroveResult<Arc<Method>> {
    let matches = |m: &&Arc<Method>| m.name() == name && params_match(m.param_types(), param_types);

    for candidate in lineage(class) {
        if let Some(method) = candidate.declared_methods().iter().find(matches) {
            return Ok(method.clone());
        }
        for interface in candidate.interfaces() {
            let default = interface
                .declared_methods()
                .iter()
                .filter(|m| m.is_default())
                .find(matches);
            if let Some(method) = default {
                return Ok(method.clone());
            }
        }
    }
    Err(GroveError::MemberNotFound {
        message: format!(
            "Unable to find method {}.{}({})",
            class.name(),
            name,
            param_types.join(", ")
        ),
    })
}

/// Find a field by name, by type, or by both.
pub fn find_field(
    class: &ClassRef,
    name: Option<&str>,
    type_name: Option<&str>,
) -> GroveResult<Arc<Field>> {
    if name.is_none() && type_name.is_none() {
        return Err(GroveError::ReflectiveUsage {
            message: "Either the name or the type of the field must be specified".to_string(),
        });
    }

    for candidate in lineage(class) {
        let found = candidate.declared_fields().iter().find(|f| {
            name.map_or(true, |n| f.name() == n) && type_name.map_or(true, |t| f.type_name() == t)
        });
        if let Some(field) = found {
            return Ok(field.clone());
        }
    }
    Err(GroveError::MemberNotFound {
        message: format!(
            "Unable to find field {}.{} of type {}",
            class.name(),
            name.unwrap_or("*"),
            type_name.unwrap_or("*")
        ),
    })
}

fn check_arity(what: &str, expected: usize, args: &[Value]) -> GroveResult<()> {
    if expected != args.len() {
        return Err(GroveError::ReflectiveUsage {
            message: format!(
                "{what} takes {expected} argument(s) but {} were supplied",
                args.len()
            ),
        });
    }
    Ok(())
}

/// Instantiate the constructor's class.
pub fn invoke_constructor(bound: &BoundConstructor, args: Vec<Value>) -> GroveResult<Value> {
    let context = format!(
        "{}({})",
        bound.class.name(),
        bound.constructor.param_types().join(", ")
    );
    check_arity(&context, bound.constructor.param_types().len(), &args)?;
    if bound.class.is_interface() {
        return Err(GroveError::ReflectiveUsage {
            message: format!("Cannot instantiate interface {}", bound.class.name()),
        });
    }

    bound.constructor.set_accessible(true);
    let instance = Instance::new(bound.class.clone());
    bound
        .constructor
        .call(&instance, &args)
        .map_err(|cause| GroveError::InvocationFailed {
            context,
            source: Box::new(cause),
        })?;
    Ok(Value::Object(instance))
}

/// Invoke a method on `target`.
pub fn invoke_method(method: &Method, target: &Value, args: Vec<Value>) -> GroveResult<Value> {
    if target.is_null() && !method.is_static() {
        return Err(GroveError::ReflectiveUsage {
            message: format!("Cannot invoke instance method {} on null", method.signature()),
        });
    }
    call(method, target, args)
}

/// Invoke a static method.
pub fn invoke_static_method(method: &Method, args: Vec<Value>) -> GroveResult<Value> {
    if !method.is_static() {
        return Err(GroveError::ReflectiveUsage {
            message: format!("Method {} is not static", method.signature()),
        });
    }
    call(method, &Value::Null, args)
}

fn call(method: &Method, receiver: &Value, args: Vec<Value>) -> GroveResult<Value> {
    check_arity(&method.signature(), method.param_types().len(), &args)?;
    method.set_accessible(true);
    tracing::trace!("invoking {}", method.signature());
    method
        .call(receiver, &args)
        .map_err(|cause| GroveError::InvocationFailed {
            context: method.signature(),
            source: Box::new(cause),
        })
}

/// Read a field of `target`.
pub fn get_field_value(field: &Field, target: &Value) -> GroveResult<Value> {
    if target.is_null() && !field.is_static() {
        return Err(GroveError::ReflectiveUsage {
            message: format!("Cannot read instance field {} of null", field.name()),
        });
    }
    field.set_accessible(true);
    Ok(field.read(target))
}

/// Read a static field.
pub fn get_static_field_value(field: &Field) -> GroveResult<Value> {
    if !field.is_static() {
        return Err(GroveError::ReflectiveUsage {
            message: format!("Field {} is not static", field.name()),
        });
    }
    field.set_accessible(true);
    Ok(field.read(&Value::Null))
}
