mod common;

use abi_codec::{
    AbiSerializer, CodecConfig, EnumValue, Error, HexAddressFormatter, SchemaParser, Value,
};
use num_bigint::{BigInt, BigUint};
use serde_json::json;

use common::my_contract;

const MY_ABI_STRUCT: &[u8] = b"\x00\x00\x00\x02\x1E\xA5\
    \x00\x00\x00\x02\x01\x04\x00\
    \x01\xFF\xFF\xFF\xFD";

fn my_abi_struct() -> Value {
    Value::structure([
        ("field1", Value::BigUint(BigUint::from(7845u32))),
        ("field2", Value::List(vec![Value::UInt(4), Value::Null])),
        ("field3", Value::List(vec![Value::Bool(true), Value::Int(-3)])),
    ])
}

#[test]
fn test_option_big_uint_forms() {
    let serializer = my_contract();
    let sixteen = Value::BigUint(BigUint::from(16u32));

    assert_eq!(
        serializer.nested_encode("Option<BigUint>", &sixteen).unwrap(),
        b"\x01\x00\x00\x00\x01\x10".to_vec()
    );
    assert_eq!(serializer.top_encode("BigUint", &sixteen).unwrap(), vec![0x10]);
    assert_eq!(serializer.nested_encode("Option<BigUint>", &Value::Null).unwrap(), vec![0x00]);
    assert!(serializer.top_encode("Option<BigUint>", &Value::Null).unwrap().is_empty());

    let (value, rest) = serializer
        .nested_decode("Option<BigUint>", b"\x01\x00\x00\x00\x01\x10")
        .unwrap();
    assert_eq!(value, sixteen);
    assert!(rest.is_empty());
    assert_eq!(serializer.top_decode("Option<BigUint>", b"").unwrap(), Value::Null);
}

#[test]
fn test_enum_zero_shortcut() {
    let serializer = my_contract();
    let nothing = Value::Enum(EnumValue::new("Nothing", 0, None));

    assert_eq!(serializer.top_decode("MyAbiEnum", b"").unwrap(), nothing);
    assert_eq!(serializer.top_decode("MyAbiEnum", b"\x00").unwrap(), nothing);
    assert_eq!(serializer.nested_decode("MyAbiEnum", b"").unwrap().0, nothing);
    assert!(serializer.top_encode("MyAbiEnum", &nothing).unwrap().is_empty());
    assert_eq!(serializer.nested_encode("MyAbiEnum", &nothing).unwrap(), vec![0x00]);
}

#[test]
fn test_list_count_exceeds_data() {
    let serializer = my_contract();
    assert!(matches!(
        serializer.nested_decode("List<u8>", b"\x01\x02\x01\x03"),
        Err(Error::InsufficientDataError { .. })
    ));
}

#[test]
fn test_array_leaves_remainder() {
    let serializer = my_contract();
    let (value, rest) = serializer
        .nested_decode("array5<u8>", b"\x01\x02\x03\x04\x05\x1E\xA5")
        .unwrap();
    assert_eq!(value, Value::from(vec![1u64, 2, 3, 4, 5]));
    assert_eq!(rest, b"\x1E\xA5");
}

#[test]
fn test_variadic_multi_arity() {
    let serializer = my_contract();
    let type_name = "variadic<multi<bool,Option<u8>>>";
    let buffers: Vec<Vec<u8>> = ["", "", "01", "0108"]
        .iter()
        .map(|h| hex::decode(h).unwrap())
        .collect();

    assert!(matches!(
        serializer.top_decode_buffers(type_name, &buffers[..3]),
        Err(Error::ArityError(_))
    ));

    let value = serializer.top_decode_buffers(type_name, &buffers).unwrap();
    assert_eq!(value.to_json(&HexAddressFormatter), json!([[false, null], [true, 8]]));
    assert_eq!(serializer.top_encode_buffers(type_name, &value).unwrap(), buffers);
}

#[test]
fn test_struct_from_file_abi() {
    let serializer = my_contract();

    let (value, rest) = serializer.nested_decode("MyAbiStruct", MY_ABI_STRUCT).unwrap();
    assert_eq!(value, my_abi_struct());
    assert!(rest.is_empty());
    assert_eq!(serializer.top_decode("MyAbiStruct", MY_ABI_STRUCT).unwrap(), my_abi_struct());
    assert_eq!(
        value.to_json(&HexAddressFormatter),
        json!({ "field1": "7845", "field2": [4, null], "field3": [true, -3] })
    );

    assert_eq!(serializer.top_encode("MyAbiStruct", &my_abi_struct()).unwrap(), MY_ABI_STRUCT);

    let mut trailing = MY_ABI_STRUCT.to_vec();
    trailing.push(0x00);
    assert_eq!(
        serializer.top_decode("MyAbiStruct", &trailing).unwrap_err(),
        Error::TrailingDataError { type_name: "MyAbiStruct".to_string(), remaining: 1 }
    );
}

#[test]
fn test_enum_with_struct_payload() {
    let serializer = my_contract();
    let payload = Value::structure([
        ("field1", Value::UInt(1)),
        ("field2", Value::from(vec![5u64])),
        ("field3", Value::List(vec![Value::Bool(false), Value::from("MEX-abcdef")])),
    ]);
    let value = Value::structure([
        ("name", Value::from("SomethingMore")),
        ("values", Value::List(vec![Value::UInt(3), payload])),
    ]);

    let encoded = serializer.top_encode("MyAbiEnum", &value).unwrap();
    assert_eq!(
        hex::encode(&encoded),
        "020300000001010000000100000005000000000a4d45582d616263646566"
    );
    assert_eq!(
        serializer.top_decode("MyAbiEnum", &encoded).unwrap(),
        Value::Enum(EnumValue::new(
            "SomethingMore",
            2,
            Some(vec![
                Value::UInt(3),
                Value::structure([
                    ("field1", Value::BigUint(BigUint::from(1u32))),
                    ("field2", Value::from(vec![5u64])),
                    ("field3", Value::List(vec![Value::Bool(false), Value::from("MEX-abcdef")])),
                ]),
            ]),
        ))
    );
}

#[test]
fn test_nesting_depth_limit() {
    let registry = SchemaParser::new().parse_str(common::MY_CONTRACT_ABI).unwrap();
    let config = CodecConfig {
        max_nesting_depth: 1,
        ..CodecConfig::default()
    };
    let serializer = AbiSerializer::with_config(registry, config);

    assert!(serializer.top_decode("List<u8>", b"\x00\x00\x00\x01\x07").is_ok());
    assert_eq!(
        serializer
            .top_decode("List<List<u8>>", b"\x00\x00\x00\x01\x00\x00\x00\x01\x07")
            .unwrap_err(),
        Error::NestingDepthError(1)
    );
    assert_eq!(
        serializer
            .nested_encode("List<List<u8>>", &Value::List(vec![Value::from(vec![7u64])]))
            .unwrap_err(),
        Error::NestingDepthError(1)
    );
}

#[test]
fn test_unknown_names() {
    let serializer = my_contract();
    assert_eq!(
        serializer.top_decode("MyMissingStruct", b"").unwrap_err(),
        Error::UnknownTypeError("MyMissingStruct".to_string())
    );
    assert_eq!(
        serializer.decode_endpoint_outputs("missing", &[vec![0x01u8]]).unwrap_err(),
        Error::UnknownEndpointError("missing".to_string())
    );
}

#[test]
fn test_basic_round_trips_at_boundaries() {
    common::init_tracing();
    let serializer = my_contract();
    let cases = vec![
        ("u8", Value::UInt(0)),
        ("u8", Value::UInt(u8::MAX as u64)),
        ("u16", Value::UInt(u16::MAX as u64)),
        ("u32", Value::UInt(u32::MAX as u64)),
        ("u64", Value::UInt(0)),
        ("u64", Value::UInt(u64::MAX)),
        ("usize", Value::UInt(u32::MAX as u64)),
        ("i8", Value::Int(i8::MIN as i64)),
        ("i8", Value::Int(i8::MAX as i64)),
        ("i16", Value::Int(i16::MIN as i64)),
        ("i32", Value::Int(i32::MAX as i64)),
        ("i64", Value::Int(i64::MIN)),
        ("i64", Value::Int(i64::MAX)),
        ("isize", Value::Int(i32::MIN as i64)),
        ("bool", Value::Bool(false)),
        ("bool", Value::Bool(true)),
        ("BigUint", Value::BigUint(BigUint::from(0u32))),
        ("BigUint", Value::BigUint(BigUint::from(u128::MAX))),
        ("BigInt", Value::BigInt(BigInt::from(0))),
        ("BigInt", Value::BigInt(BigInt::from(i128::MIN))),
        ("utf-8 string", Value::String(String::new())),
        ("bytes", Value::Bytes(bytes::Bytes::new())),
    ];

    for (type_name, value) in cases {
        let nested = serializer.nested_encode(type_name, &value).unwrap();
        let (decoded, rest) = serializer.nested_decode(type_name, &nested).unwrap();
        assert_eq!(decoded, value, "nested round trip of {}", type_name);
        assert!(rest.is_empty(), "nested round trip of {} left bytes", type_name);

        let top = serializer.top_encode(type_name, &value).unwrap();
        assert_eq!(
            serializer.top_decode(type_name, &top).unwrap(),
            value,
            "top round trip of {}",
            type_name
        );
    }
}
