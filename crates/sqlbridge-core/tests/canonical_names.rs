use sqlbridge_core::{
    NativeType, NativeTypeDescriptor, PrimitiveKind, parse_canonical_name, render_canonical_name,
};

#[test]
fn nested_generics_render_deterministically() {
    let native = NativeType::dictionary(
        PrimitiveKind::String.into(),
        NativeType::list(NativeType::nullable(PrimitiveKind::Int64.into())),
    );
    let first = render_canonical_name(Some(&native));
    let second = render_canonical_name(Some(&native));
    assert_eq!(first.as_deref(), Some("Dictionary<String, List<Nullable<Int64>>>"));
    assert_eq!(first, second);
}

#[test]
fn display_matches_canonical_name() {
    let native = NativeType::array(NativeType::list(PrimitiveKind::Int32.into()));
    assert_eq!(native.to_string(), "List<Int32>[]");
    assert_eq!("List<Int32>[]".parse::<NativeType>().unwrap(), native);
}

#[test]
fn bytes_render_as_uint8_array() {
    assert_eq!(NativeType::bytes().canonical_name(), "UInt8[]");
    assert!(parse_canonical_name("UInt8[]").unwrap().is_bytes());
}

#[test]
fn descriptor_serializes_hints() {
    let descriptor = NativeTypeDescriptor::new(PrimitiveKind::Decimal.into())
        .with_precision_scale(18, 6);
    let json = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(json["precision"], 18);
    assert_eq!(json["scale"], 6);
    assert_eq!(json["native_type"]["kind"], "primitive");
    assert_eq!(json["native_type"]["type"], "decimal");
}
