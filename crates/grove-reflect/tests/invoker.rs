use grove_reflect::class::{ClassInfo, ClassRef, Throwable};
use grove_reflect::invoker::{
    find_constructor, find_field, find_method, get_field_value, get_static_field_value,
    invoke_constructor, invoke_method, invoke_static_method,
};
use grove_reflect::value::Value;
use grove_util::errors::GroveError;

fn base_class() -> ClassRef {
    ClassInfo::builder("example.Base")
        .constructor(&[], |this, _| {
            this.set("name", Value::from("base"));
            Ok(())
        })
        .method("getName", &[], |this, _| {
            Ok(this.as_object().and_then(|o| o.get("name")).unwrap_or_default())
        })
        .static_field("GREETING", "java.lang.String", Value::from("hello"))
        .build()
}

fn greeter_interface() -> ClassRef {
    ClassInfo::builder("example.Greeter")
        .interface()
        .method("greet", &["java.lang.String"], |_, args| {
            Ok(Value::from(format!("hi {}", args[0].as_str().unwrap_or("?"))))
        })
        .build()
}

fn derived_class() -> ClassRef {
    ClassInfo::builder("example.Derived")
        .extends(base_class())
        .implements(greeter_interface())
        .constructor(&["java.lang.String"], |this, args| {
            this.set("name", args[0].clone());
            Ok(())
        })
        .method("fail", &[], |_, _| {
            Err(Throwable::new("java.lang.IllegalStateException", "boom"))
        })
        .private_method("secret", &["int"], |_, args| {
            Ok(Value::Int(args[0].as_int().unwrap_or(0) * 2))
        })
        .static_method("create", &[], |_, _| Ok(Value::from("created")))
        .field("name", "java.lang.String", |this| {
            this.as_object().and_then(|o| o.get("name")).unwrap_or_default()
        })
        .build()
}

#[test]
fn finds_declared_constructor_with_exact_signature() {
    let class = derived_class();
    let ctor = find_constructor(&class, &["java.lang.String"]).unwrap();
    let obj = invoke_constructor(&ctor, vec![Value::from("derived")]).unwrap();
    assert_eq!(obj.type_name(), "example.Derived");
    assert_eq!(obj.as_object().unwrap().get("name").unwrap().as_str(), Some("derived"));
}

#[test]
fn constructor_lookup_walks_superclasses() {
    let class = derived_class();
    let ctor = find_constructor(&class, &[]).unwrap();
    assert_eq!(ctor.class.name(), "example.Base");
}

#[test]
fn missing_constructor_is_member_not_found() {
    let err = find_constructor(&derived_class(), &["int"]).unwrap_err();
    assert!(matches!(err, GroveError::MemberNotFound { .. }), "got: {err}");
}

#[test]
fn inherited_method_is_found() {
    let class = derived_class();
    let ctor = find_constructor(&class, &["java.lang.String"]).unwrap();
    let obj = invoke_constructor(&ctor, vec![Value::from("x")]).unwrap();
    let get_name = find_method(&class, "getName", &[]).unwrap();
    let name = invoke_method(&get_name, &obj, Vec::new()).unwrap();
    assert_eq!(name.as_str(), Some("x"));
}

#[test]
fn interface_default_method_is_found() {
    let class = derived_class();
    let greet = find_method(&class, "greet", &["java.lang.String"]).unwrap();
    let obj = invoke_constructor(
        &find_constructor(&class, &["java.lang.String"]).unwrap(),
        vec![Value::from("x")],
    )
    .unwrap();
    let out = invoke_method(&greet, &obj, vec![Value::from("there")]).unwrap();
    assert_eq!(out.as_str(), Some("hi there"));
}

#[test]
fn parameter_types_must_match_exactly() {
    let err = find_method(&derived_class(), "greet", &["java.lang.Object"]).unwrap_err();
    assert!(matches!(err, GroveError::MemberNotFound { .. }));
}

#[test]
fn private_method_is_made_accessible() {
    let class = derived_class();
    let secret = find_method(&class, "secret", &["int"]).unwrap();
    assert!(!secret.is_accessible());
    let obj = invoke_constructor(
        &find_constructor(&class, &["java.lang.String"]).unwrap(),
        vec![Value::from("x")],
    )
    .unwrap();
    let out = invoke_method(&secret, &obj, vec![Value::Int(21)]).unwrap();
    assert_eq!(out.as_int(), Some(42));
    assert!(secret.is_accessible());
}

#[test]
fn target_failure_is_invocation_failed_with_cause() {
    let class = derived_class();
    let fail = find_method(&class, "fail", &[]).unwrap();
    let obj = invoke_constructor(&find_constructor(&class, &[]).unwrap(), Vec::new()).unwrap();
    let err = invoke_method(&fail, &obj, Vec::new()).unwrap_err();
    match err {
        GroveError::InvocationFailed { context, source } => {
            assert_eq!(context, "fail()");
            assert!(source.to_string().contains("IllegalStateException: boom"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_arity_is_usage_error() {
    let class = derived_class();
    let greet = find_method(&class, "greet", &["java.lang.String"]).unwrap();
    let obj = invoke_constructor(&find_constructor(&class, &[]).unwrap(), Vec::new()).unwrap();
    let err = invoke_method(&greet, &obj, Vec::new()).unwrap_err();
    assert!(matches!(err, GroveError::ReflectiveUsage { .. }), "got: {err}");
}

#[test]
fn instance_method_on_null_is_usage_error() {
    let get_name = find_method(&derived_class(), "getName", &[]).unwrap();
    let err = invoke_method(&get_name, &Value::Null, Vec::new()).unwrap_err();
    assert!(matches!(err, GroveError::ReflectiveUsage { .. }));
}

#[test]
fn static_method_invocation() {
    let class = derived_class();
    let create = find_method(&class, "create", &[]).unwrap();
    assert_eq!(invoke_static_method(&create, Vec::new()).unwrap().as_str(), Some("created"));

    let get_name = find_method(&class, "getName", &[]).unwrap();
    let err = invoke_static_method(&get_name, Vec::new()).unwrap_err();
    assert!(matches!(err, GroveError::ReflectiveUsage { .. }));
}

#[test]
fn fields_by_name_type_or_both() {
    let class = derived_class();
    let by_name = find_field(&class, Some("name"), None).unwrap();
    let by_type = find_field(&class, None, Some("java.lang.String")).unwrap();
    assert_eq!(by_name.name(), by_type.name());

    let inherited = find_field(&class, Some("GREETING"), Some("java.lang.String")).unwrap();
    assert_eq!(get_static_field_value(&inherited).unwrap().as_str(), Some("hello"));

    assert!(matches!(
        find_field(&class, None, None).unwrap_err(),
        GroveError::ReflectiveUsage { .. }
    ));
    assert!(matches!(
        find_field(&class, Some("name"), Some("int")).unwrap_err(),
        GroveError::MemberNotFound { .. }
    ));
}

#[test]
fn instance_field_read() {
    let class = derived_class();
    let obj = invoke_constructor(
        &find_constructor(&class, &["java.lang.String"]).unwrap(),
        vec![Value::from("field-value")],
    )
    .unwrap();
    let field = find_field(&class, Some("name"), None).unwrap();
    assert_eq!(get_field_value(&field, &obj).unwrap().as_str(), Some("field-value"));
    assert!(get_field_value(&field, &Value::Null).is_err());
}

#[test]
fn interfaces_cannot_be_instantiated() {
    let iface = ClassInfo::builder("example.Marker")
        .interface()
        .constructor(&[], |_, _| Ok(()))
        .build();
    let ctor = find_constructor(&iface, &[]).unwrap();
    assert!(matches!(
        invoke_constructor(&ctor, Vec::new()).unwrap_err(),
        GroveError::ReflectiveUsage { .. }
    ));
}
