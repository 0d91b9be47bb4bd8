//! Integer targets accept exactly `[min, max]` and overflow just outside it.

use rowcast_core::{
    CoerceOptions, Coercer, CoercionError, Input, LogicalType, MachineWidth, Template, Value,
};

/// The narrowest native value carrying `v`, falling back to literal text.
fn wide(v: i128) -> Value {
    if let Ok(v) = i64::try_from(v) {
        Value::Int64(v)
    } else if let Ok(v) = u64::try_from(v) {
        Value::Uint64(v)
    } else {
        Value::number(v.to_string())
    }
}

fn assert_range(coercer: &Coercer, target: LogicalType, min: i128, max: i128) {
    for source in [wide as fn(i128) -> Value, |v: i128| Value::number(v.to_string())] {
        for inside in [min, max] {
            let coerced = coercer
                .coerce(target, source(inside))
                .unwrap_or_else(|err| panic!("{target} rejected {inside}: {err}"));
            assert_eq!(
                coercer.coerce(LogicalType::Number, coerced).unwrap(),
                Value::number(inside.to_string()),
                "{target} changed {inside}"
            );
        }
        for outside in [min - 1, max + 1] {
            let result = coercer.coerce(target, source(outside));
            assert!(
                matches!(result, Err(CoercionError::Overflow { .. })),
                "{target} accepted {outside}: {result:?}"
            );
        }
    }
}

#[test]
fn signed_widths() {
    let coercer = Coercer::default();
    assert_range(&coercer, LogicalType::Int8, i8::MIN.into(), i8::MAX.into());
    assert_range(&coercer, LogicalType::Int16, i16::MIN.into(), i16::MAX.into());
    assert_range(&coercer, LogicalType::Int32, i32::MIN.into(), i32::MAX.into());
    assert_range(&coercer, LogicalType::Int64, i64::MIN.into(), i64::MAX.into());
    assert_range(&coercer, LogicalType::Int, i64::MIN.into(), i64::MAX.into());
}

#[test]
fn unsigned_widths() {
    let coercer = Coercer::default();
    assert_range(&coercer, LogicalType::Uint8, 0, u8::MAX.into());
    assert_range(&coercer, LogicalType::Uint16, 0, u16::MAX.into());
    assert_range(&coercer, LogicalType::Uint32, 0, u32::MAX.into());
    assert_range(&coercer, LogicalType::Uint64, 0, u64::MAX.into());
    assert_range(&coercer, LogicalType::Uint, 0, u64::MAX.into());
}

#[test]
fn machine_width_32() {
    let coercer = Coercer::new(CoerceOptions::new().with_machine_width(MachineWidth::W32));
    assert_range(&coercer, LogicalType::Int, i32::MIN.into(), i32::MAX.into());
    assert_range(&coercer, LogicalType::Uint, 0, u32::MAX.into());
}

#[test]
fn float_sources_use_inclusive_bounds() {
    let coercer = Coercer::default();
    let cases = [
        (LogicalType::Int8, -128.0, 127.0),
        (LogicalType::Int16, -32768.0, 32767.0),
        (LogicalType::Uint8, 0.0, 255.0),
        (LogicalType::Uint16, 0.0, 65535.0),
        (LogicalType::Int32, -2147483648.0, 2147483647.0),
        (LogicalType::Uint32, 0.0, 4294967295.0),
    ];
    for (target, min, max) in cases {
        assert!(coercer.coerce(target, Value::Float64(min)).is_ok(), "{target} {min}");
        assert!(coercer.coerce(target, Value::Float64(max)).is_ok(), "{target} {max}");
        assert!(coercer.coerce(target, Value::Float64(min - 1.0)).is_err(), "{target} {min}-1");
        assert!(coercer.coerce(target, Value::Float64(max + 1.0)).is_err(), "{target} {max}+1");
    }
}

fn assert_overflow(coercer: &Coercer, target: LogicalType, v: f64) {
    let result = coercer.coerce(target, Value::Float64(v));
    assert!(
        matches!(result, Err(CoercionError::Overflow { .. })),
        "{target} accepted {v}: {result:?}"
    );
}

#[test]
fn float_sources_at_64_bit_bounds() {
    let coercer = Coercer::default();
    // 2^63 and 2^64 are the first floats past i64::MAX and u64::MAX.
    for target in [LogicalType::Int64, LogicalType::Int] {
        let top = coercer.coerce(target, Value::Float64(9223372036854774784.0)).unwrap();
        assert_eq!(
            coercer.coerce(LogicalType::Number, top).unwrap(),
            Value::number("9223372036854774784")
        );
        let bottom = coercer.coerce(target, Value::Float64(-9223372036854775808.0)).unwrap();
        assert_eq!(
            coercer.coerce(LogicalType::Number, bottom).unwrap(),
            Value::number("-9223372036854775808")
        );
        assert_overflow(&coercer, target, 9223372036854775808.0);
        assert_overflow(&coercer, target, -9223372036854777856.0);
        assert_overflow(&coercer, target, f64::INFINITY);
    }
    for target in [LogicalType::Uint64, LogicalType::Uint] {
        let top = coercer.coerce(target, Value::Float64(18446744073709549568.0)).unwrap();
        assert_eq!(
            coercer.coerce(LogicalType::Number, top).unwrap(),
            Value::number("18446744073709549568")
        );
        assert_overflow(&coercer, target, 18446744073709551616.0);
    }

    let narrow = Coercer::new(CoerceOptions::new().with_machine_width(MachineWidth::W32));
    assert_overflow(&narrow, LogicalType::Int, 2147483648.0);
    assert_overflow(&narrow, LogicalType::Uint, 4294967296.0);
}

#[test]
fn float_targets_never_produce_non_finite_values() {
    let template = Template::new().with_float64("x").with_float32("y");
    let convert = |json: &str| template.create_row(Input::from_json(json.as_bytes()).unwrap());

    assert_eq!(
        convert(r#"{"x":1.5,"y":2}"#).unwrap().to_json().unwrap(),
        r#"{"x":1.5,"y":2.0}"#
    );
    for (json, expect_overflow) in [
        (r#"{"x":"NaN"}"#, false),
        (r#"{"x":"inf"}"#, false),
        (r#"{"y":"-infinity"}"#, false),
        (r#"{"x":1e400}"#, true),
        (r#"{"y":1e300}"#, true),
        (r#"{"y":"1e300"}"#, true),
    ] {
        let err = convert(json).unwrap_err();
        let inner = err.coercion().cloned();
        if expect_overflow {
            assert!(matches!(inner, Some(CoercionError::Overflow { .. })), "{json}: {err}");
        } else {
            assert!(matches!(inner, Some(CoercionError::ParseFailure { .. })), "{json}: {err}");
        }
    }

    let coercer = Coercer::default();
    let result = coercer.coerce(LogicalType::Float32, Value::Float64(f64::MAX));
    assert!(matches!(result, Err(CoercionError::Overflow { .. })), "{result:?}");
}

#[test]
fn bool_sources_map_to_zero_and_one() {
    let coercer = Coercer::default();
    for target in LogicalType::ALL.into_iter().filter(|ty| ty.is_signed() || ty.is_unsigned()) {
        let one = coercer.coerce(target, Value::Bool(true)).unwrap();
        assert_eq!(coercer.coerce(LogicalType::Number, one).unwrap(), Value::number("1"));
        let zero = coercer.coerce(target, Value::Bool(false)).unwrap();
        assert_eq!(coercer.coerce(LogicalType::Number, zero).unwrap(), Value::number("0"));
    }
}
