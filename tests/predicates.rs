use kinetic::form::{Field, FormData, is_blank};
use kinetic::predicate::{FieldNameDecomposition, OperatorKind, OperatorTable, PredicateValue};
use kinetic::serializer::FormQuerySerializer;
use kinetic::settings::{ControlNames, SerializerOptions};

fn predicates(form: &FormData) -> String {
    FormQuerySerializer::default().build_search_predicate_string(form)
}

fn choice(options: &[&str], selected_index: usize) -> Field {
    Field::Choice {
        options: options.iter().map(|o| o.to_string()).collect(),
        selected_index,
    }
}

#[test]
fn metadata_names_decompose() {
    let d = FieldNameDecomposition::parse("_age_comp").expect("comparison");
    assert_eq!(d.attribute, "age");
    assert_eq!(d.kind, OperatorKind::Comparison);
    let d = FieldNameDecomposition::parse("_first_name_logical").expect("logical");
    assert_eq!(d.attribute, "first_name");
    assert_eq!(d.kind, OperatorKind::Logical);
    for malformed in ["_class_key", "_limit", "__comp", "age_comp", "_age_comparison"] {
        assert!(FieldNameDecomposition::parse(malformed).is_none(), "{malformed} should not decompose");
    }
}

#[test]
fn operators_qualify_values() {
    let form = FormData::new()
        .with("_name_logical", choice(&["AND", "OR"], 1))
        .with("_name_comp", choice(&["=", "LIKE"], 1))
        .with("name", "Ali%")
        .with("city", "Oslo");
    assert_eq!(predicates(&form), r#"name OR LIKE "Ali%", city "Oslo""#);
}

#[test]
fn metadata_order_does_not_matter() {
    let before = FormData::new()
        .with("_name_logical", "AND")
        .with("_name_comp", "=")
        .with("name", "Alice");
    let after = FormData::new()
        .with("name", "Alice")
        .with("_name_logical", "AND")
        .with("_name_comp", "=");
    assert_eq!(predicates(&before), r#"name AND = "Alice""#);
    assert_eq!(predicates(&before), predicates(&after));
}

#[test]
fn emptiness_rule() {
    assert!(is_blank(""));
    assert!(is_blank(" \t\n"));
    assert!(!is_blank(" x "));
    assert!(Field::Range { low: " ".into(), high: String::new() }.is_blank());
    assert!(!Field::Range { low: String::new(), high: "9".into() }.is_blank());
    assert!(choice(&["a"], 3).is_blank(), "out of range selection is empty");
}

#[test]
fn blank_values_and_operators_are_dropped() {
    let form = FormData::new()
        .with("name", "   ")
        .with("_city_logical", "")
        .with("_city_comp", " ")
        .with("city", "Oslo")
        .with("", "orphan")
        .with("zip", choice(&["1000"], 4));
    assert_eq!(predicates(&form), r#"city "Oslo""#);
}

#[test]
fn first_occurrence_wins() {
    let form = FormData::new()
        .with("color", "red")
        .with("color", "blue")
        .with("color", "green");
    assert_eq!(predicates(&form), r#"color "red""#);

    // a blank first occurrence still claims the attribute
    let form = FormData::new().with("color", "").with("color", "blue");
    assert_eq!(predicates(&form), "");
}

#[test]
fn between_uses_sibling_bounds() {
    let form = FormData::new()
        .with("_age_comp", choice(&["=", "BETWEEN"], 1))
        .with("age", "")
        .with("age_between", "18")
        .with("age_not_between", "65");
    assert_eq!(predicates(&form), r#"age BETWEEN ["18", "65"]"#);

    let predicates = FormQuerySerializer::default().search_predicates(&form);
    assert_eq!(predicates.len(), 1);
    assert_eq!(predicates[0].value, PredicateValue::Range("18".into(), "65".into()));
}

#[test]
fn between_without_plain_control() {
    let form = FormData::new()
        .with("age_not_between", "65")
        .with("age_between", "18")
        .with("_age_comp", "BETWEEN");
    assert_eq!(predicates(&form), r#"age BETWEEN ["18", "65"]"#);
}

#[test]
fn between_accepts_resolved_range() {
    let form = FormData::new()
        .with("_age_logical", "AND")
        .with("_age_comp", "between")
        .with("age", Field::Range { low: "1".into(), high: "9".into() });
    assert_eq!(predicates(&form), r#"age AND between ["1", "9"]"#);
}

#[test]
fn bounds_ignored_without_between() {
    let form = FormData::new()
        .with("_age_comp", choice(&["=", "BETWEEN"], 0))
        .with("age_between", "18")
        .with("age_not_between", "65")
        .with("age", "30");
    assert_eq!(predicates(&form), r#"age = "30""#);

    // without any metadata these are ordinary attributes
    let form = FormData::new().with("size_between", "4");
    assert_eq!(predicates(&form), r#"size_between "4""#);
}

#[test]
fn between_without_bounds_falls_back_to_value() {
    let form = FormData::new()
        .with("_age_comp", "BETWEEN")
        .with("age", "30")
        .with("age_between", "")
        .with("age_not_between", " ");
    assert_eq!(predicates(&form), r#"age BETWEEN "30""#);
}

#[test]
fn control_fields_are_not_predicates() {
    let form = FormData::new()
        .with("_class_key", "Person")
        .with("_limit", "5")
        .with("search", "Search")
        .with("name", "Bob");
    assert_eq!(predicates(&form), r#"name "Bob""#);
}

#[test]
fn free_text_search_without_predicates() {
    let form = FormData::new().with("search", "anything goes").with("name", "");
    let serializer = FormQuerySerializer::new(
        ControlNames::default(),
        SerializerOptions { free_text_search: true, ..SerializerOptions::default() },
    );
    assert_eq!(serializer.build_search_predicate_string(&form), "anything goes");
    assert_eq!(predicates(&form), "", "free text is off by default");
}

#[test]
fn free_text_search_yields_to_predicates() {
    let form = FormData::new().with("search", "anything goes").with("name", "Bob");
    let serializer = FormQuerySerializer::new(
        ControlNames::default(),
        SerializerOptions { free_text_search: true, ..SerializerOptions::default() },
    );
    assert_eq!(serializer.build_search_predicate_string(&form), r#"name "Bob""#);
}

#[test]
fn operator_table_is_per_form() {
    let first = FormData::new().with("_name_comp", "LIKE").with("name", "A%");
    let second = FormData::new().with("name", "B");
    let table = OperatorTable::collect(&first);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("name").and_then(|o| o.comparison.as_deref()), Some("LIKE"));
    assert!(OperatorTable::collect(&second).is_empty());
    assert_eq!(predicates(&first), r#"name LIKE "A%""#);
    assert_eq!(predicates(&second), r#"name "B""#);
}
