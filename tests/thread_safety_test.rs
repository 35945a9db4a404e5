//! Schemas and validators are shared across threads without locking.

use conform::{Rule, Schema, TypeTag, Validator, Value};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_validation() {
    let schema = Arc::new(Schema::rules([Rule::hash([
        ("name", Schema::pattern(r"\AUser\d+\z").unwrap()),
        ("age", Schema::interval(20..=40)),
    ])]));
    let validator = Arc::new(Validator::new().with_message_fn(|value| format!("in {}", value)));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let schema = Arc::clone(&schema);
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let value = Value::map([
                    ("name", Value::from(format!("User{}", i))),
                    ("age", Value::Int(20 + i)),
                ]);
                validator.validate(&value, &schema).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_failures_are_independent() {
    let schema = Arc::new(Schema::union([
        Schema::of(TypeTag::Integer),
        Schema::of(TypeTag::String),
    ]));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let err = Validator::new()
                    .validate(&Value::Float(i as f64 + 0.5), &schema)
                    .unwrap_err();
                let error = err.as_invalid().unwrap().clone();
                assert_eq!(error.branch_errors().count(), 2);
                error
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let error = handle.join().unwrap();
        assert!(error
            .message
            .contains(&format!("match the {:?}, errors:", i as f64 + 0.5)));
    }
}
