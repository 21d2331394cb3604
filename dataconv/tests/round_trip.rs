use dataconv::{pack, unpack, Value};
use proptest::prelude::*;

/// A format directive paired with a value it can carry losslessly.
fn numeric() -> impl Strategy<Value = (&'static str, Value)> {
    prop_oneof![
        any::<i16>().prop_map(|v| ("s", Value::I16(v))),
        any::<u16>().prop_map(|v| ("S", Value::U16(v))),
        any::<i32>().prop_map(|v| ("i", Value::I32(v))),
        any::<u32>().prop_map(|v| ("I", Value::U32(v))),
        any::<i64>().prop_map(|v| ("l", Value::I64(v))),
        any::<u64>().prop_map(|v| ("L", Value::U64(v))),
        any::<i8>().prop_map(|v| ("c", Value::I8(v))),
        any::<u8>().prop_map(|v| ("b", Value::U8(v))),
        (-1e6f32..1e6).prop_map(|v| ("f", Value::F32(v))),
        (-1e12f64..1e12).prop_map(|v| ("d", Value::F64(v))),
    ]
}

fn text() -> impl Strategy<Value = (&'static str, Value)> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,12}".prop_map(|v| ("z8", Value::Str(v))),
        "[^\\x00]{0,8}".prop_map(|v| ("z6", Value::Str(v))),
        "[^\\x00]{0,8}".prop_map(|v| ("z4", Value::Str(v))),
    ]
}

/// A repeated field paired with exactly as many values as it asks for.
fn repeated() -> impl Strategy<Value = (String, Vec<Value>)> {
    prop_oneof![
        prop::collection::vec(any::<u16>(), 1..6).prop_map(|v| {
            (format!("[{}]S", v.len()), v.into_iter().map(Value::U16).collect::<Vec<_>>())
        }),
        prop::collection::vec(any::<i32>(), 1..10).prop_map(|v| {
            (format!("{}i", v.len()), v.into_iter().map(Value::I32).collect::<Vec<_>>())
        }),
    ]
}

fn field() -> impl Strategy<Value = (String, Vec<Value>)> {
    prop_oneof![
        3 => numeric().prop_map(|(directive, value)| (directive.to_string(), vec![value])),
        1 => text().prop_map(|(directive, value)| (directive.to_string(), vec![value])),
        1 => repeated(),
    ]
}

fn prefix() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(""),
        Just("^"),
        Just("_"),
        Just("%"),
        Just("!"),
        Just("^!"),
        Just("x"),
        Just("3x"),
        Just("[2]x"),
        Just("!x"),
    ]
}

proptest! {
    #[test]
    fn unpack_inverts_pack(fields in prop::collection::vec((prefix(), field()), 1..12)) {
        let mut format = String::new();
        let mut args = Vec::new();
        for (prefix, (directive, values)) in fields {
            format.push_str(prefix);
            format.push_str(&directive);
            args.extend(values);
        }

        let bytes = pack(&format, &args).unwrap();
        prop_assert_eq!(unpack(&format, &bytes, 0).unwrap(), args, "format {}", format);
    }

    #[test]
    fn repeated_fields_unpack_flat(values in prop::collection::vec(any::<u32>(), 1..40)) {
        let args: Vec<Value> = values.iter().copied().map(Value::U32).collect();
        let format = format!("^[{}]I", values.len());
        let bytes = pack(&format, &args).unwrap();
        prop_assert_eq!(bytes.len(), values.len() * 4);
        prop_assert_eq!(unpack("^*I", &bytes, 0).unwrap(), args);
    }
}
