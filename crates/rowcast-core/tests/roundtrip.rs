//! Record JSON round-trip and order properties.

use chrono::DateTime;
use proptest::prelude::*;

use rowcast_core::{Input, Record, StructuredValue, Template, Value};

fn typed_template() -> Template {
    Template::new()
        .with_int64("id")
        .with_string("label")
        .with_bool("active")
        .with_float64("score")
        .with_time("seen")
        .with_uint8("level")
        .with_number("amount")
}

fn typed_values() -> impl Strategy<Value = Vec<Value>> {
    (
        any::<i64>(),
        "\\PC*",
        any::<bool>(),
        any::<f64>().prop_filter("finite", |v| v.is_finite()),
        -62_135_596_800i64..253_402_300_799i64,
        any::<u8>(),
        any::<i128>(),
    )
        .prop_map(|(id, label, active, score, seen, level, amount)| {
            vec![
                Value::Int64(id),
                Value::String(label),
                Value::Bool(active),
                Value::Float64(score),
                Value::Time(DateTime::from_timestamp(seen, 0).unwrap().fixed_offset()),
                Value::Uint8(level),
                Value::number(amount.to_string()),
            ]
        })
}

/// Distinct field names with auto-typed scalar values.
fn auto_fields() -> impl Strategy<Value = Vec<(String, Value)>> {
    let scalar = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::number(v.to_string())),
        "[a-z ]{0,12}".prop_map(Value::String),
    ];
    prop::collection::vec(("[a-z]{1,6}", scalar), 0..12).prop_map(|pairs| {
        let mut seen = std::collections::HashSet::new();
        pairs
            .into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .collect()
    })
}

proptest! {
    #[test]
    fn typed_record_survives_json(values in typed_values()) {
        let template = typed_template();
        let record = template.create_row(values).unwrap();
        let json = record.to_json().unwrap();
        let parsed = template.parse_json(json.as_bytes()).unwrap();
        prop_assert_eq!(&parsed, &record);
        prop_assert_eq!(parsed.to_json().unwrap(), json);
    }

    #[test]
    fn auto_record_survives_json(fields in auto_fields()) {
        let mut record = Record::new();
        for (name, value) in &fields {
            record.set(name.clone(), StructuredValue::auto(value.clone()));
        }
        let json = record.to_json().unwrap();
        let parsed = Record::from_json(json.as_bytes()).unwrap();
        prop_assert_eq!(&parsed, &record);
    }

    #[test]
    fn first_appearance_fixes_order(fields in auto_fields(), pick in any::<prop::sample::Index>()) {
        let mut record = Record::new();
        for (name, value) in &fields {
            record.import_at_key(name, value.clone()).unwrap();
        }
        if !fields.is_empty() {
            let (name, _) = &fields[pick.index(fields.len())];
            record.set(name.clone(), StructuredValue::auto("replaced"));
        }
        let expected: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
        prop_assert_eq!(record.names().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn keyed_input_appends_extras_in_order(fields in auto_fields()) {
        let template = Template::new().with_auto("declared");
        let record = template.create_row(Input::Map(fields.clone())).unwrap();
        let mut expected = vec!["declared"];
        expected.extend(
            fields
                .iter()
                .map(|(name, _)| name.as_str())
                .filter(|name| *name != "declared"),
        );
        prop_assert_eq!(record.names().collect::<Vec<_>>(), expected);
    }
}
