use bencode_canon::{decode, DecodeError, DecodeErrorKind, Decoder, DecodeOptions, Value};

fn err(input: &[u8]) -> DecodeError {
    decode(input).expect_err("decode must fail")
}

#[test]
fn decodes_dict_into_sorted_tree() {
    let value = decode(b"d3:bar4:spam3:fooi42ee").unwrap();
    assert_eq!(
        value,
        Value::dict([("bar", Value::from("spam")), ("foo", Value::from(42))])
    );
}

#[test]
fn decodes_nested_krpc_query() {
    let value = decode(b"d1:ad2:id20:abcdefghij0123456789e1:q4:ping1:t2:aa1:y1:qe").unwrap();
    let args = value.get("a").and_then(Value::as_dict).expect("args dict");
    assert_eq!(
        args.get(b"id".as_slice()).and_then(Value::as_bytes),
        Some(b"abcdefghij0123456789".as_slice())
    );
    assert_eq!(value.get("q").and_then(Value::as_str), Some("ping"));
    assert_eq!(value.get("t").and_then(Value::as_str), Some("aa"));
    assert_eq!(value.get("y").and_then(Value::as_str), Some("q"));
}

#[test]
fn decodes_lists_and_empties() {
    assert_eq!(decode(b"le").unwrap(), Value::List(vec![]));
    assert_eq!(decode(b"de").unwrap(), Value::Dict(Default::default()));
    assert_eq!(
        decode(b"l4:spami42eli-1eee").unwrap(),
        Value::list([
            Value::from("spam"),
            Value::from(42),
            Value::list([-1]),
        ])
    );
}

#[test]
fn binary_payloads_are_kept_verbatim() {
    let value = decode(b"3:\x00\xffe").unwrap();
    assert_eq!(value.as_bytes(), Some([0x00, 0xff, b'e'].as_slice()));
    assert_eq!(value.as_str(), None);
}

#[test]
fn big_integers_use_arbitrary_precision() {
    let value = decode(b"i18446744073709551616e").unwrap();
    let int = value.as_integer().expect("integer");
    assert!(!int.is_small());
    assert_eq!(int.to_string(), "18446744073709551616");
    assert_eq!(value, Value::from(u128::from(u64::MAX) + 1));

    let huge = b"i-123456789012345678901234567890123456789e";
    let value = decode(huge).unwrap();
    assert_eq!(
        value.as_integer().map(ToString::to_string).as_deref(),
        Some("-123456789012345678901234567890123456789")
    );
}

#[test]
fn rejects_non_canonical_input() {
    let cases: &[(&[u8], DecodeErrorKind)] = &[
        (b"", DecodeErrorKind::EmptyInput),
        (b"ie", DecodeErrorKind::EmptyInteger),
        (b"i-0e", DecodeErrorKind::NegativeZero),
        (b"i01e", DecodeErrorKind::IntegerLeadingZero),
        (b"i00e", DecodeErrorKind::IntegerLeadingZero),
        (b"01:q", DecodeErrorKind::LengthLeadingZero),
        (b"00:", DecodeErrorKind::LengthLeadingZero),
        (b"10:q", DecodeErrorKind::TruncatedByteString(10)),
        (b"a", DecodeErrorKind::InvalidPrefix(b'a')),
        (b"l", DecodeErrorKind::UnterminatedList),
        (b"lll", DecodeErrorKind::UnterminatedList),
        (b"d", DecodeErrorKind::UnterminatedDict),
        (b"d3:foo", DecodeErrorKind::UnexpectedEnd),
        (b"ld3:fooe", DecodeErrorKind::InvalidPrefix(b'e')),
        (b"d3:foo4:spam3:bari42e", DecodeErrorKind::KeysNotSorted),
        (b"d3:foo3:bar3:bari42ee", DecodeErrorKind::KeysNotSorted),
        (b"d3:fooi1e3:fooi2ee", DecodeErrorKind::DuplicateKey(b"foo".to_vec())),
        (b"i1ei2e", DecodeErrorKind::TrailingBytes(3)),
        (b"4:spamx", DecodeErrorKind::TrailingBytes(1)),
    ];
    for (input, kind) in cases {
        assert_eq!(
            &err(input).kind,
            kind,
            "input {:?}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn error_messages_carry_offsets() {
    assert_eq!(
        err(b"d3:foo3:bar3:bari42ee").to_string(),
        "keys not sorted (offset 11)"
    );
    assert_eq!(err(b"i-0e").to_string(), "invalid leading '-0' (offset 1)");
    assert_eq!(err(b"li1e?e").offset, 4);
    assert_eq!(err(b"i1ei2e").offset, 3);
}

#[test]
fn unsorted_keys_fail_before_their_value_is_read() {
    // The value after the misplaced key is malformed; ordering is reported first.
    assert_eq!(
        err(b"d1:bi1e1:ai01ee").kind,
        DecodeErrorKind::KeysNotSorted
    );
}

#[test]
fn depth_limit_is_configurable() {
    let deep: Vec<u8> = std::iter::repeat(b'l')
        .take(600)
        .chain(std::iter::repeat(b'e').take(600))
        .collect();
    assert_eq!(
        err(&deep).kind,
        DecodeErrorKind::DepthLimitExceeded(bencode_canon::DEFAULT_MAX_DEPTH)
    );

    let relaxed = Decoder::with_options(DecodeOptions::default().with_max_depth(1000));
    assert!(relaxed.decode(&deep).is_ok());
}
