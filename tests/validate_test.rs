use conform::{is_valid, validate, Object, Rule, Schema, TypeTag, Validator, Value};

#[derive(Debug)]
struct Record {
    a: Value,
}

impl Object for Record {
    fn type_name(&self) -> &str {
        "Record"
    }

    fn call(&self, accessor: &str) -> Option<Value> {
        match accessor {
            "a" => Some(self.a.clone()),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Marker;

impl Object for Marker {
    fn type_name(&self) -> &str {
        "Marker"
    }

    fn call(&self, _accessor: &str) -> Option<Value> {
        None
    }
}

fn digits() -> Schema {
    Schema::pattern(r"\A\d+\z").unwrap()
}

// ====== hash Tests ======

#[test]
fn test_hash_matches_exact_keys() {
    let schema = Schema::rules([Rule::hash([
        ("a", Schema::of(TypeTag::Integer)),
        ("b", Schema::of(TypeTag::String)),
    ])]);

    let value = Value::map([("a", Value::Int(1)), ("b", Value::from("x"))]);
    assert!(validate(&value, &schema).is_ok());
}

#[test]
fn test_hash_field_failure_points_at_key() {
    let schema = Schema::rules([Rule::hash([
        ("a", Schema::of(TypeTag::Integer)),
        ("b", Schema::of(TypeTag::String)),
    ])]);

    let value = Value::map([("a", "y"), ("b", "x")]);
    let err = validate(&value, &schema).unwrap_err();
    assert_eq!(err.as_invalid().unwrap().path.to_string(), "[a]");
    assert_eq!(err.to_string(), "expected Integer != String (at [a])");
}

#[test]
fn test_hash_rejects_missing_key() {
    let schema = Schema::rules([Rule::hash([
        ("a", Schema::of(TypeTag::Integer)),
        ("b", Schema::of(TypeTag::String)),
    ])]);

    let err = validate(&Value::map([("a", 1)]), &schema).unwrap_err();
    assert_eq!(err.to_string(), r#"expected implicit keys ["a", "b"] != ["a"]"#);
}

#[test]
fn test_hash_rejects_extra_key() {
    let schema = Schema::rules([Rule::hash([("a", Schema::of(TypeTag::Integer))])]);
    let value = Value::map([("a", Value::Int(1)), ("z", Value::Nil)]);

    let err = validate(&value, &schema).unwrap_err();
    assert_eq!(err.as_invalid().unwrap().code, "key_mismatch");
}

#[test]
fn test_hash_req_tolerates_extra_keys() {
    let schema = Schema::rules([Rule::hash_req([("a", Schema::of(TypeTag::Integer))])]);
    let value = Value::map([("a", Value::Int(1)), ("z", Value::Nil)]);
    assert!(validate(&value, &schema).is_ok());

    let err = validate(&Value::map([("z", Value::Nil)]), &schema).unwrap_err();
    assert_eq!(err.as_invalid().unwrap().code, "missing_keys");
}

#[test]
fn test_hash_opt_keys_are_excluded_from_exactness() {
    let schema = Schema::rules([
        Rule::hash([("id", Schema::of(TypeTag::Integer))]),
        Rule::hash_opt([("note", Schema::of(TypeTag::String))]),
    ]);

    assert!(validate(&Value::map([("id", 1)]), &schema).is_ok());
    assert!(validate(
        &Value::map([("id", Value::Int(1)), ("note", Value::from("hi"))]),
        &schema
    )
    .is_ok());

    let err = validate(
        &Value::map([("id", Value::Int(1)), ("note", Value::Int(2))]),
        &schema,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "expected String != Integer (at [note])");
}

// ====== tuple Tests ======

#[test]
fn test_tuple_failure_points_at_element() {
    let schema = Schema::tuple([digits(), Schema::interval(1..=5)]);

    let err = validate(&Value::seq([Value::from("42"), Value::Int(9)]), &schema).unwrap_err();
    assert_eq!(err.as_invalid().unwrap().path.to_string(), "[#1]");
    assert_eq!(err.to_string(), "expected 1..5 != 9 (at [#1])");
}

#[test]
fn test_nested_tuple_reports_inner_path() {
    let schema = Schema::tuple([Schema::tuple([digits(), Schema::interval(1..=5)])]);

    let ok = Value::seq([Value::seq([Value::from("12"), Value::Int(3)])]);
    assert!(validate(&ok, &schema).is_ok());

    let bad = Value::seq([Value::seq([Value::from("12"), Value::Int(9)])]);
    let err = validate(&bad, &schema).unwrap_err();
    let error = err.as_invalid().unwrap();
    assert_eq!(error.path.to_string(), "[#0, #1]");
    assert_eq!(err.to_string(), "expected 1..5 != 9 (at [#0, #1])");
}

#[test]
fn test_pattern_does_not_match_integers() {
    let err = validate(&Value::Int(12), &digits()).unwrap_err();
    assert_eq!(err.to_string(), r"expected /\A\d+\z/ != 12");
}

// ====== union Tests ======

#[test]
fn test_union_cites_every_variant() {
    let schema = Schema::union([Schema::of(TypeTag::Integer), Schema::of(TypeTag::String)]);

    let err = validate(&Value::Float(3.25), &schema).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("expected at least one of 2 rules to match the 3.25, errors:"));
    assert!(message.contains("expected Integer != Float (at [variant#0])"));
    assert!(message.contains("expected String != Float (at [variant#1])"));
}

#[test]
fn test_union_first_match_wins() {
    let schema = Schema::union([Schema::nil(), Schema::interval(1..=1)]);
    assert!(validate(&Value::Int(1), &schema).is_ok());
    assert!(validate(&Value::Nil, &schema).is_ok());
}

// ====== method Tests ======

#[test]
fn test_method_validates_accessor_result() {
    let schema = Schema::rules([Rule::method([("a", Schema::symbol("b"))])]);

    let ok = Value::object(Record { a: Value::symbol("b") });
    assert!(validate(&ok, &schema).is_ok());

    let bad = Value::object(Record { a: Value::from("b") });
    let err = validate(&bad, &schema).unwrap_err();
    assert_eq!(err.to_string(), r#"expected :b != "b" (at [method#a])"#);
}

#[test]
fn test_is_valid_propagates_undefined_accessor() {
    let schema = Schema::rules([Rule::method([("missing", Schema::nil())])]);
    let value = Value::object(Record { a: Value::Nil });

    let err = is_valid(&value, &schema).unwrap_err();
    assert_eq!(err.to_string(), "undefined accessor `missing` for Record");
    assert!(!err.is_invalid());
}

#[test]
fn test_is_valid() {
    let schema = Schema::of(TypeTag::Integer);
    assert_eq!(is_valid(&Value::Int(1), &schema), Ok(true));
    assert_eq!(is_valid(&Value::Nil, &schema), Ok(false));
}

// ====== Composite ======

#[test]
fn test_full_vocabulary_against_one_value() {
    let value = Value::seq([
        Value::Nil,
        Value::Bool(true),
        Value::Bool(false),
        Value::symbol("symbol"),
        Value::from("string"),
        Value::object(Marker),
        Value::from(""),
        Value::Int(1),
        Value::seq(Vec::<Value>::new()),
        Value::map(Vec::<(Value, Value)>::new()),
        Value::map([(4, 3), (2, 1)]),
        Value::object(Record { a: Value::symbol("b") }),
    ]);

    let pairs = Schema::tuple([Schema::interval(2..=4), Schema::interval(1..=3)]);
    let schema = Schema::tuple([
        Schema::nil(),
        Schema::literal(true),
        Schema::literal(false),
        Schema::symbol("symbol"),
        Schema::literal("string"),
        Schema::of(TypeTag::named("Marker")),
        Schema::pattern(r"\A\z").unwrap(),
        Schema::union([Schema::nil(), Schema::interval(1..=1)]),
        Schema::rules([Rule::size(0..=0)]),
        Schema::rules([
            Rule::hash_opt([("", "")]),
            Rule::assertion(|value, _| Ok(value.len() == Some(0))),
        ]),
        Schema::rules([
            Rule::keys(Schema::tuple([Schema::interval(4..=4), Schema::interval(2..=2)])),
            Rule::keys_sorted(Schema::tuple([Schema::interval(2..=2), Schema::interval(4..=4)])),
            Rule::hash_req([(2, Schema::interval(1..=1))]),
            Rule::each_key(Schema::of(TypeTag::Integer)),
            Rule::each_value(Schema::of(TypeTag::Integer)),
            Rule::values(Schema::tuple([Schema::interval(3..=3), Schema::interval(1..=1)])),
            Rule::each(pairs),
            Rule::hash([(4, Schema::interval(3..=3)), (2, Schema::interval(1..=1))]),
        ]),
        Schema::rules([Rule::method([("a", Schema::symbol("b"))])]),
    ]);

    validate(&value, &schema).unwrap();
}

// ====== Validator options ======

#[test]
fn test_static_hint_is_appended() {
    let validator = Validator::new().with_message("in config.yml");
    let err = validator
        .validate(&Value::map([("port", "x")]), &Schema::rules([Rule::hash([("port", Schema::of(TypeTag::Integer))])]))
        .unwrap_err();
    assert_eq!(err.to_string(), "expected Integer != String (at [port]) in config.yml");
}

#[test]
fn test_max_depth_guard() {
    let deep = Schema::tuple([Schema::tuple([Schema::tuple([Schema::nil()])])]);
    let value = Value::seq([Value::seq([Value::seq([Value::Nil])])]);

    assert!(Validator::new().validate(&value, &deep).is_ok());

    let err = Validator::new().with_max_depth(2).validate(&value, &deep).unwrap_err();
    assert_eq!(err.as_invalid().unwrap().code, "max_depth_exceeded");
}

#[test]
fn test_json_values_convert() {
    let json = serde_json::json!({"name": "ada", "tags": ["x", "y"]});
    let schema = Schema::rules([Rule::hash([
        ("name", Schema::of(TypeTag::String)),
        (
            "tags",
            Schema::rules([Rule::size(1..=5), Rule::each(Schema::of(TypeTag::String))]),
        ),
    ])]);
    assert!(validate(&Value::from(json), &schema).is_ok());
}
