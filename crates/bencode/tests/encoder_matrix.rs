use bencode_canon::{
    encode, BoolPolicy, Dict, EncodeError, EncodeOptions, Encoder, PoolOptions, Value,
};
use serde_json::json;

#[test]
fn encodes_scenarios() {
    assert_eq!(encode(&Value::Dict(Dict::new())).unwrap(), b"de");
    assert_eq!(encode(&Value::List(vec![])).unwrap(), b"le");
    assert_eq!(encode(&Value::list([1, 2, 3])).unwrap(), b"li1ei2ei3ee");
    assert_eq!(encode(&json!([1, 2, 3])).unwrap(), b"li1ei2ei3ee");
}

#[test]
fn encodes_nested_document() {
    let value = json!({
        "spam": ["a", "b"],
        "cow": "moo",
        "n": -12,
        "nested": {"z": [], "a": {}},
    });
    assert_eq!(
        encode(&value).unwrap(),
        b"d3:cow3:moo1:ni-12e6:nestedd1:ade1:zlee4:spaml1:a1:bee"
    );
}

#[test]
fn output_is_independent_of_construction_order() {
    let forward = json!({"a": 1, "b": 2, "c": 3});
    let backward = json!({"c": 3, "b": 2, "a": 1});
    assert_eq!(encode(&forward).unwrap(), encode(&backward).unwrap());
    assert_eq!(encode(&forward).unwrap(), b"d1:ai1e1:bi2e1:ci3ee");
}

#[test]
fn keys_sort_by_raw_bytes() {
    // 'Z' (0x5a) < 'a' (0x61) and a prefix sorts before its extensions.
    let value = json!({"ab": 1, "a": 2, "Z": 3});
    assert_eq!(encode(&value).unwrap(), b"d1:Zi3e1:ai2e2:abi1ee");
}

#[test]
fn binary_strings_from_json() {
    let value = json!({"peers": "data:application/octet-stream;base64,fwAAARrh"});
    assert_eq!(
        encode(&value).unwrap(),
        b"d5:peers6:\x7f\x00\x00\x01\x1a\xe1e"
    );
}

#[test]
fn big_integers_round_trip_through_text() {
    let big = Value::from(i128::MAX);
    let bytes = encode(&big).unwrap();
    assert_eq!(bytes, format!("i{}e", i128::MAX).into_bytes());
    assert_eq!(bencode_canon::decode(&bytes).unwrap(), big);
}

#[test]
fn bools_follow_policy() {
    assert_eq!(encode(&json!({"private": true})).unwrap(), b"d7:privatei1ee");
    let strict = Encoder::with_options(EncodeOptions::default().with_bools(BoolPolicy::Reject));
    assert_eq!(
        strict.encode(&json!({"private": true})),
        Err(EncodeError::BoolRejected)
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        encode(&json!([null])).unwrap_err().to_string(),
        "unsupported value of type null"
    );
    assert_eq!(
        encode(&json!({"k": 1, "data:application/octet-stream;base64,aw==": 2}))
            .unwrap_err()
            .to_string(),
        "duplicate dictionary key \"k\""
    );
}

#[test]
fn shared_encoder_across_threads() {
    let encoder = Encoder::with_options(
        EncodeOptions::default().with_pool(PoolOptions::default().with_max_pooled(2)),
    );
    std::thread::scope(|s| {
        for i in 0..8 {
            let encoder = &encoder;
            s.spawn(move || {
                let value = Value::list([i, i + 1]);
                let expected = format!("li{}ei{}ee", i, i + 1).into_bytes();
                for _ in 0..50 {
                    assert_eq!(encoder.encode(&value).unwrap(), expected);
                }
            });
        }
    });
    assert!(encoder.pool().idle() <= 2);
}
