//! Integration tests for element tree validation.

use conform::tree::{validate_tree, Element, Target, TreeRule, TreeSchema};
use conform::Error;

fn catalog() -> Element {
    Element::new("catalog")
        .with_attribute("version", "2")
        .with_child(
            Element::new("book")
                .with_attribute("isbn", "9780131103627")
                .with_child(Element::new("title").with_text("The C Programming Language"))
                .with_child(Element::new("author").with_text("Kernighan"))
                .with_child(Element::new("author").with_text("Ritchie")),
        )
        .with_child(
            Element::new("book")
                .with_attribute("isbn", "9781593278281")
                .with_attribute("edition", "1")
                .with_child(Element::new("title").with_text("The Rust Programming Language"))
                .with_child(Element::new("author").with_text("Klabnik")),
        )
}

fn book_schema() -> TreeSchema {
    TreeSchema::rules([
        TreeRule::attr_req([("isbn", TreeSchema::pattern(r"\A\d{13}\z").unwrap())]),
        TreeRule::attr_opt([("edition", TreeSchema::pattern(r"\A\d+\z").unwrap())]),
        TreeRule::exact([
            ("title", TreeSchema::rules([TreeRule::size(1..=1)])),
            (
                "author",
                TreeSchema::rules([
                    TreeRule::size(1..=5),
                    TreeRule::each(TreeSchema::pattern(r"\A[A-Z][a-z]+\z").unwrap()),
                ]),
            ),
        ]),
    ])
}

fn check(schema: &TreeSchema) -> Result<(), Error> {
    let doc = catalog();
    validate_tree(&Target::Element(&doc), schema)
}

#[test]
fn test_catalog_validates() {
    let schema = TreeSchema::rules([
        TreeRule::attr_exact([("version", "2")]),
        TreeRule::children([("book", TreeRule::each(book_schema()))]),
        TreeRule::children([("./book/title", TreeRule::size(2..=2))]),
    ]);
    check(&schema).unwrap();
}

#[test]
fn test_failure_path_runs_through_selection() {
    let schema = TreeSchema::rules([TreeRule::children([(
        "book",
        TreeRule::each(TreeSchema::rules([TreeRule::children([(
            "author",
            TreeRule::size(2..=5),
        )])])),
    )])]);

    let err = check(&schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected explicit size 2..5 != 1 (at [book, #1, author])"
    );
}

#[test]
fn test_tuple_over_children() {
    let schema = TreeSchema::rules([TreeRule::children([(
        "*/title",
        TreeSchema::tuple([
            TreeSchema::text("The C Programming Language"),
            TreeSchema::pattern("Rust").unwrap(),
        ]),
    )])]);
    check(&schema).unwrap();
}

#[test]
fn test_union_over_attribute() {
    let schema = TreeSchema::rules([TreeRule::attr_req([(
        "version",
        TreeSchema::union([TreeSchema::text("1"), TreeSchema::text("3")]),
    )])]);

    let err = check(&schema).unwrap_err();
    let error = err.as_invalid().unwrap();
    assert!(error.is_union());
    assert_eq!(
        err.to_string(),
        [
            r#"expected at least one of 2 rules to match the "2", errors:"#,
            r#"  expected "1" != "2" (at [version, variant#0])"#,
            r#"  expected "3" != "2" (at [version, variant#1])"#,
        ]
        .join("\n")
    );
}

#[test]
fn test_exact_rejects_unexpected_children() {
    let schema = TreeSchema::rules([TreeRule::children([(
        "book",
        TreeRule::each(TreeSchema::rules([TreeRule::exact([(
            "title",
            TreeSchema::rules([]),
        )])])),
    )])]);

    let err = check(&schema).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"expected implicit children ["title"] != ["title", "author"] (at [book, #0])"#
    );
}

#[test]
fn test_text_rule_uses_descendant_text() {
    let schema = TreeSchema::rules([TreeRule::children([(
        "book",
        TreeRule::each(TreeSchema::rules([TreeRule::text("The C Programming LanguageKernighanRitchie")])),
    )])]);

    let err = check(&schema).unwrap_err();
    assert_eq!(
        err.as_invalid().unwrap().path.to_string(),
        "[book, #1]"
    );
}
