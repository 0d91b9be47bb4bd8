//! End-to-end behavior of templates and records as seen on the JSON wire.

use insta::assert_snapshot;

use rowcast_core::{
    CoercionError, Input, LogicalType, Record, StructuredValue, Template, Value, coerce,
};

fn row(template: &Template, json: &str) -> Record {
    template
        .create_row(Input::from_json(json.as_bytes()).unwrap())
        .unwrap()
}

#[test]
fn positional_row_with_datetime() {
    let template = Template::new()
        .with_string("name")
        .with_number("age")
        .with_time("birthdate");
    let record = row(&template, r#"["Dorothy", 30, "1991-09-24T21:21:00Z"]"#);
    assert_snapshot!(
        record.to_json().unwrap(),
        @r#"{"name":"Dorothy","age":30,"birthdate":"1991-09-24T21:21:00Z"}"#
    );
}

#[test]
fn keyed_row_with_numeric_text() {
    let template = Template::new()
        .with_string("title")
        .with_number("release_date");
    let record = row(&template, r#"{"title":"The Matrix","release_date":"1999"}"#);

    let exported = record.export().unwrap();
    assert_eq!(exported.get("title").unwrap().raw(), &Value::from("The Matrix"));
    assert_eq!(exported.get("release_date").unwrap().raw(), &Value::number("1999"));
    assert_snapshot!(
        record.to_json().unwrap(),
        @r#"{"title":"The Matrix","release_date":1999}"#
    );
}

#[test]
fn binary_is_little_endian_and_base64() {
    assert_eq!(
        coerce(LogicalType::Binary, Value::Int64(1)).unwrap(),
        Value::Binary(vec![0x01, 0, 0, 0, 0, 0, 0, 0])
    );
    let mut record = Record::new();
    record.set("blob", StructuredValue::typed(Value::Int64(1), LogicalType::Binary));
    assert_snapshot!(record.to_json().unwrap(), @r#"{"blob":"AQAAAAAAAAA="}"#);
}

#[test]
fn overflow_is_reported_not_clamped() {
    assert!(matches!(
        coerce(LogicalType::Int8, Value::Int64(200)),
        Err(CoercionError::Overflow { .. })
    ));
    assert!(matches!(
        coerce(LogicalType::Uint8, Value::Int64(-1)),
        Err(CoercionError::Overflow { .. })
    ));
}

#[test]
fn hidden_fields_never_serialize() {
    let template = Template::new().with_string("user").with_hidden("password");
    let record = row(&template, r#"{"user":"dorothy","password":"secret"}"#);
    assert_eq!(
        record.get("password").unwrap().raw(),
        &Value::from("secret")
    );
    assert_snapshot!(record.to_json().unwrap(), @r#"{"user":"dorothy"}"#);

    let record = template.create_empty();
    assert_snapshot!(record.to_json().unwrap(), @r#"{"user":null}"#);
}

#[test]
fn extra_fields_follow_declared_fields() {
    let template = Template::new().with_string("a").with_string("b");
    let record = row(&template, r#"{"z":1,"b":"2","y":[true],"a":"1","x":{"k":null}}"#);
    assert_snapshot!(
        record.to_json().unwrap(),
        @r#"{"a":"1","b":"2","z":1,"y":[true],"x":{"k":null}}"#
    );
}

#[test]
fn failing_field_fails_whole_row() {
    let template = Template::new().with_uint8("small").with_string("rest");
    let err = template
        .create_row(Input::from_json(br#"{"rest":"ok","small":256}"#).unwrap())
        .unwrap_err();
    assert_eq!(err.field_path(), vec!["small"]);
    assert_snapshot!(err.to_string(), @r#"field "small": 256 (number) is out of range for uint8"#);
}

#[test]
fn output_order_is_stable_across_calls() {
    let template = Template::new().with_int32("n").with_auto("tags");
    let record = row(&template, r#"{"tags":["a","b"],"n":"0x10","later":1.25}"#);
    let first = record.to_json().unwrap();
    for _ in 0..5 {
        assert_eq!(record.to_json().unwrap(), first);
    }
    assert_snapshot!(first, @r#"{"n":16,"tags":["a","b"],"later":1.25}"#);
}

#[test]
fn large_numbers_keep_precision() {
    let template = Template::new().with_number("big").with_auto("raw");
    let record = row(
        &template,
        r#"{"big":123456789012345678901234567890,"raw":0.10000000000000000000001}"#,
    );
    assert_snapshot!(
        record.to_json().unwrap(),
        @r#"{"big":123456789012345678901234567890,"raw":0.10000000000000000000001}"#
    );
}
