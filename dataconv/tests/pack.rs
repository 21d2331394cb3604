use dataconv::{pack, pack_iter, ErrorKind, Value};

#[test]
fn test_alignment_to_field_size() {
    let bytes = pack!("_s!i", 0x7b, 0x12345678).unwrap();
    assert_eq!(bytes, [0x7b, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12]);
}

#[test]
fn test_alignment_is_relative_to_packed_length() {
    // the pad only reaches the next multiple of 8
    let bytes = pack!("_i!l", 1, 2).unwrap();
    assert_eq!(bytes, [1, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0]);

    // already aligned, no padding
    let bytes = pack!("_S!S", 1, 2).unwrap();
    assert_eq!(bytes, [1, 0, 2, 0]);
}

#[test]
fn test_alignment_only_affects_next_field() {
    let bytes = pack!("b!Sbb", 1, 2, 3, 4).unwrap();
    assert_eq!(bytes.len(), 6);
    assert_eq!(bytes[0], 1);
    assert_eq!(bytes[1], 0);
    assert_eq!(&bytes[4..], [3, 4]);
}

#[test]
fn test_byte_order_switches() {
    let bytes = pack!("^I_I", 0xdeadbeef_u32, 0xdeadbeef_u32).unwrap();
    assert_eq!(bytes, [0xde, 0xad, 0xbe, 0xef, 0xef, 0xbe, 0xad, 0xde]);

    let native = pack!("%I", 0xdeadbeef_u32).unwrap();
    assert_eq!(native, 0xdeadbeef_u32.to_ne_bytes());
}

#[test]
fn test_default_byte_order_is_native() {
    let bytes = pack!("sl", -2, 1).unwrap();
    let mut expected = (-2_i16).to_ne_bytes().to_vec();
    expected.extend_from_slice(&1_i64.to_ne_bytes());
    assert_eq!(bytes, expected);
}

#[test]
fn test_every_numeric_kind() {
    let bytes = pack!(
        "^sSiIlLfdbcC",
        -1, 2, -3, 4, -5, 6, 1.5_f32, -2.0, 7, -8, 9
    )
    .unwrap();
    let mut expected = Vec::new();
    expected.extend_from_slice(&(-1_i16).to_be_bytes());
    expected.extend_from_slice(&2_u16.to_be_bytes());
    expected.extend_from_slice(&(-3_i32).to_be_bytes());
    expected.extend_from_slice(&4_u32.to_be_bytes());
    expected.extend_from_slice(&(-5_i64).to_be_bytes());
    expected.extend_from_slice(&6_u64.to_be_bytes());
    expected.extend_from_slice(&1.5_f32.to_be_bytes());
    expected.extend_from_slice(&(-2.0_f64).to_be_bytes());
    expected.extend_from_slice(&[7, 0xf8, 9]);
    assert_eq!(bytes, expected);
}

#[test]
fn test_repeat_count_caps_arguments() {
    assert_eq!(pack!("4C", 65, 66, 67, 68).unwrap(), b"ABCD");
    assert_eq!(pack!("4C", 65, 66, 67, 68, 69, 70).unwrap(), b"ABCD");
}

#[test]
fn test_repeat_stops_when_arguments_run_out() {
    assert_eq!(pack!("4C", 65, 66).unwrap(), b"AB");
    // nothing after an unfinished repeat is packed
    assert_eq!(pack!("[3]bi", 1).unwrap(), [1]);
}

#[test]
fn test_bracketed_repeat() {
    let args: Vec<Value> = (0..12).map(Value::I32).collect();
    let bytes = pack("[12]b", &args).unwrap();
    assert_eq!(bytes, (0..12).collect::<Vec<u8>>());
}

#[test]
fn test_zero_repeat_consumes_nothing() {
    assert_eq!(pack!("[0]bb", 5).unwrap(), [5]);
}

#[test]
fn test_repeat_survives_byte_order_switch() {
    let bytes = pack!("2^S", 1, 2).unwrap();
    assert_eq!(bytes, [0, 1, 0, 2]);
}

#[test]
fn test_star_consumes_remaining_arguments() {
    let bytes = pack!("_b*S", 9, 1, 2, 3).unwrap();
    assert_eq!(bytes, [9, 1, 0, 2, 0, 3, 0]);
}

#[test]
fn test_star_stops_packing() {
    // the trailing field and the bogus directive after it are never reached
    assert_eq!(pack!("*bbq", 1, 2).unwrap(), [1, 2]);
}

#[test]
fn test_missing_argument_packs_default() {
    let bytes = pack!("_bS", 1).unwrap();
    assert_eq!(bytes, [1, 0, 0]);

    assert_eq!(pack!("z8").unwrap(), [0]);
    assert_eq!(pack!("b$8", 1).unwrap(), [1]);
}

#[test]
fn test_null_bytes() {
    assert_eq!(pack!("bxb", 1, 2).unwrap(), [1, 0, 2]);
    assert_eq!(pack!("b3xb", 1, 2).unwrap(), [1, 0, 0, 0, 2]);
    assert_eq!(pack!("x").unwrap(), [0]);
}

#[test]
fn test_repeated_null_bytes() {
    assert_eq!(pack!("2xb", 5).unwrap(), [0, 0, 5]);
    // the count is used up by `x`
    assert_eq!(pack!("2xbb", 5, 6).unwrap(), [0, 0, 5, 6]);
    assert_eq!(pack!("*xb", 5).unwrap(), [0, 5]);
}

#[test]
fn test_repeated_null_bytes_stop_without_arguments() {
    assert_eq!(pack!("b2x", 1).unwrap(), [1]);
    assert_eq!(pack!("b*xb", 1).unwrap(), [1]);
    assert_eq!(pack!("b[0]x", 1).unwrap(), [1]);
}

#[test]
fn test_null_terminated_strings() {
    assert_eq!(pack!("z8", "hello").unwrap(), b"hello\0");
    assert_eq!(
        pack!("z6", "hello").unwrap(),
        b"h\0e\0l\0l\0o\0\0\0"
    );
    assert_eq!(pack!("zb", "hi").unwrap(), b"\0h\0i\0\0");
    assert_eq!(pack!("z3", "a").unwrap(), b"a\0\0\0\0\0\0\0");
    assert_eq!(pack!("z4", "a").unwrap(), b"\0\0\0a\0\0\0\0");
    assert_eq!(pack!("z7", "a+b").unwrap(), b"a+-b\0");
}

#[test]
fn test_unterminated_strings() {
    assert_eq!(pack!("$8$8", "ab", "cd").unwrap(), b"abcd");
    assert_eq!(pack!("$6", "é").unwrap(), [0xe9, 0x00]);
}

#[test]
fn test_strings_align_to_four_after_marker() {
    assert_eq!(pack!("b!z8", 1, "ab").unwrap(), b"\x01\0\0\0ab\0");
    // without the marker, strings follow immediately
    assert_eq!(pack!("bz8", 1, "ab").unwrap(), b"\x01ab\0");
}

#[test]
fn test_strings_use_display_form() {
    assert_eq!(pack!("$8", 42).unwrap(), b"42");
    assert_eq!(pack!("$8", 1.5).unwrap(), b"1.5");
}

#[test]
fn test_numeric_coercions() {
    // strings parse, floats round half to even
    assert_eq!(pack!("bbbb", "17", 2.5, 3.5, -0.4).unwrap(), [17, 2, 4, 0]);
    assert_eq!(pack!("_s", " -300 ").unwrap(), (-300_i16).to_le_bytes());
    assert_eq!(pack!("_f", 3).unwrap(), 3.0_f32.to_le_bytes());
    assert_eq!(pack!("_d", "0.25").unwrap(), 0.25_f64.to_le_bytes());
}

#[test]
fn test_type_conversion_errors() {
    let error = pack!("bi", 1, "twelve").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeConversion);
    assert!(error.to_string().contains("format position 1"), "{}", error);

    assert_eq!(pack!("b", 256).unwrap_err().kind(), ErrorKind::TypeConversion);
    assert_eq!(pack!("c", 128).unwrap_err().kind(), ErrorKind::TypeConversion);
    assert_eq!(pack!("S", -1).unwrap_err().kind(), ErrorKind::TypeConversion);
    assert_eq!(
        pack!("i", f64::NAN).unwrap_err().kind(),
        ErrorKind::TypeConversion
    );
}

#[test]
fn test_invalid_directive() {
    let error = pack!("q", 1).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidFormat);
    assert!(error.to_string().contains("`q'"), "{}", error);

    let error = pack!("ii!q", 1, 2).unwrap_err();
    assert!(error.to_string().contains("position 3"), "{}", error);
}

#[test]
fn test_invalid_string_selector() {
    assert_eq!(pack!("$x", "a").unwrap_err().kind(), ErrorKind::InvalidFormat);
    assert_eq!(pack!("z", "a").unwrap_err().kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_malformed_repeat_count() {
    assert_eq!(pack!("[x]b", 1).unwrap_err().kind(), ErrorKind::InvalidFormat);
    assert_eq!(pack!("[]b", 1).unwrap_err().kind(), ErrorKind::InvalidFormat);
    assert_eq!(pack!("[4b", 1).unwrap_err().kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_empty_inputs() {
    assert!(pack("", &[]).unwrap().is_empty());
    assert!(pack("", &[Value::I32(1)]).unwrap().is_empty());
    assert!(pack("*i", &[]).unwrap().is_empty());
}

#[test]
fn test_pack_iter_pulls_lazily() {
    let mut pulled = 0;
    let args = std::iter::repeat_with(|| {
        pulled += 1;
        Value::U8(0xaa)
    });
    let bytes = pack_iter("2b", args).unwrap();
    assert_eq!(bytes, [0xaa, 0xaa]);
    assert_eq!(pulled, 2);
}

#[test]
fn test_pack_iter_matches_pack() {
    let args = vec![Value::I16(-7), Value::from("x"), Value::F64(0.5)];
    assert_eq!(
        pack_iter("^s!z6d", args.iter()).unwrap(),
        pack("^s!z6d", &args).unwrap()
    );
    assert_eq!(
        pack_iter("^s!z6d", args.clone()).unwrap(),
        pack("^s!z6d", &args).unwrap()
    );
}

#[test]
fn test_long_string_sequences() {
    let names: Vec<Value> = (0..200).map(|i| Value::from(format!("n{}", i))).collect();
    let bytes = pack("*z8", &names).unwrap();
    let expected: Vec<u8> = (0..200)
        .flat_map(|i| format!("n{}\0", i).into_bytes())
        .collect();
    assert_eq!(bytes, expected);
}
