#![allow(clippy::unwrap_used, reason = "tests unwrap known-good descriptors")]

use super::*;
use pretty_assertions::assert_eq;

fn flags8() -> BitViewType {
    BitViewType::bitmap(BitWidth::W8, [("enabled", 0), ("locked", 1)]).unwrap()
}

#[test]
fn scalar_names_round_trip() {
    for kind in [
        ScalarKind::Byte,
        ScalarKind::Int,
        ScalarKind::Long,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::Bool,
        ScalarKind::String,
        ScalarKind::Any,
    ] {
        assert_eq!(ScalarKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(ScalarKind::from_name("INTEGER"), Some(ScalarKind::Int));
    assert_eq!(ScalarKind::from_name("Boolean"), Some(ScalarKind::Bool));
    assert_eq!(ScalarKind::from_name("date"), None);
}

#[test]
fn numeric_ladder_orders_kinds() {
    let rank = |k: ScalarKind| k.numeric_rank().unwrap();
    assert!(rank(ScalarKind::Byte) < rank(ScalarKind::Int));
    assert!(rank(ScalarKind::Long) < rank(ScalarKind::Float));
    assert!(rank(ScalarKind::Float) < rank(ScalarKind::Double));
    assert_eq!(ScalarKind::String.numeric_rank(), None);
}

#[test]
fn record_field_lookup_ignores_case() {
    let shape = RecordShape::new([("Name", TypeDesc::STRING), ("age", TypeDesc::INT)]).unwrap();
    let (idx, field) = shape.field("NAME").unwrap();
    assert_eq!(idx, 0);
    assert_eq!(field.ty, TypeDesc::STRING);
    assert!(shape.field("missing").is_none());
}

#[test]
fn record_rejects_duplicate_names() {
    let err = RecordShape::new([("id", TypeDesc::INT), ("ID", TypeDesc::LONG)]).unwrap_err();
    assert_eq!(
        err,
        DescriptorError::DuplicateField {
            name: "ID".to_string()
        }
    );
}

#[test]
fn bitmap_fields_are_single_bits() {
    let view = flags8();
    assert_eq!(view.kind(), BitViewKind::Bitmap);
    let locked = view.field("LOCKED").unwrap();
    assert_eq!(locked.offset, 1);
    assert_eq!(locked.width, 1);
    assert_eq!(locked.extract(0b10), 1);
    assert_eq!(locked.extract(0b01), 0);
}

#[test]
fn bit_field_out_of_range_fails_at_construction() {
    let err = BitViewType::bitmap(BitWidth::W8, [("high", 8)]).unwrap_err();
    assert!(matches!(err, DescriptorError::FieldOutOfRange { backing: 8, .. }));

    let err = BitViewType::intmap(BitWidth::W16, [("wide", 10, 8)]).unwrap_err();
    assert!(matches!(err, DescriptorError::FieldOutOfRange { end: 17, .. }));
}

#[test]
fn intmap_rejects_overlap_and_zero_width() {
    let err = BitViewType::intmap(BitWidth::W16, [("lo", 0, 8), ("mid", 4, 8)]).unwrap_err();
    assert_eq!(
        err,
        DescriptorError::OverlappingFields {
            first: "lo".to_string(),
            second: "mid".to_string()
        }
    );
    let err = BitViewType::intmap(BitWidth::W16, [("none", 0, 0)]).unwrap_err();
    assert!(matches!(err, DescriptorError::ZeroWidth { .. }));
}

#[test]
fn insert_preserves_other_bits() {
    let view = BitViewType::intmap(BitWidth::W16, [("lo", 0, 4), ("hi", 4, 4)]).unwrap();
    let hi = view.field("hi").unwrap();
    let raw = hi.insert(0x00f5, 0x3).unwrap();
    assert_eq!(raw, 0x0035);
    assert_eq!(hi.insert(raw, 0x10), None);
}

#[test]
fn full_width_field_masks_everything() {
    let view = BitViewType::intmap(BitWidth::W64, [("all", 0, 64)]).unwrap();
    let all = view.field("all").unwrap();
    assert_eq!(all.max_value(), u64::MAX);
    assert_eq!(all.extract(u64::MAX), u64::MAX);
}

#[test]
fn unsupported_width_is_rejected() {
    assert_eq!(
        BitWidth::from_bits(12),
        Err(DescriptorError::UnsupportedWidth { bits: 12 })
    );
    assert_eq!(BitWidth::from_bits(32), Ok(BitWidth::W32));
}

#[test]
fn descriptors_display_like_typeof() {
    assert_eq!(TypeDesc::INT.to_string(), "int");
    assert_eq!(
        TypeDesc::Array(ArrayShape::fixed(TypeDesc::STRING, 3)).to_string(),
        "array.string[3]"
    );
    assert_eq!(
        TypeDesc::Array(ArrayShape::dynamic(TypeDesc::INT)).to_string(),
        "array.int[*]"
    );
    assert_eq!(
        TypeDesc::bit_view(flags8()).to_string(),
        "bitmap8{enabled:0, locked:1}"
    );
    let shape = RecordShape::new([("x", TypeDesc::INT)]).unwrap();
    assert_eq!(TypeDesc::Record(shape).to_string(), "record{x: int}");
}

#[test]
fn bit_view_picks_matching_variant() {
    let view = BitViewType::intmap(BitWidth::W8, [("n", 0, 3)]).unwrap();
    assert!(matches!(TypeDesc::bit_view(view), TypeDesc::Intmap(_)));
    assert!(matches!(TypeDesc::bit_view(flags8()), TypeDesc::Bitmap(_)));
}
