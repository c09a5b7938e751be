use std::cell::RefCell;
use std::rc::Rc;

use crate::typed::{ArrayType, Opaque, StructType, TypeError, Value, types};

fn get_int(instance: &crate::typed::StructInstance, name: &str) -> i64 {
	instance.get(name).expect("field reads").as_int().expect("integer field")
}

#[test]
fn two_uint8_fields_pack_without_padding() {
	let point = StructType::new([("x", types::uint8()), ("y", types::uint8())]).expect("schema builds");

	assert!(!point.is_variable());
	assert!(!point.is_opaque());
	assert_eq!(point.byte_length(), Some(2));
	assert_eq!(point.byte_alignment(), Some(1));
	assert_eq!(point.field_offsets().expect("non-opaque"), vec![("x", 0), ("y", 1)]);

	let p1 = point.from_values([("x", Value::Int(1)), ("y", Value::Int(1))]).expect("values assign");
	assert_eq!(get_int(&p1, "x"), 1);
	assert_eq!(get_int(&p1, "y"), 1);
}

#[test]
fn uint32_field_is_aligned_to_four_bytes() {
	let ty = StructType::new([("x", types::uint8()), ("y", types::uint32())]).expect("schema builds");

	assert_eq!(ty.byte_length(), Some(8));
	assert_eq!(ty.byte_alignment(), Some(4));
	assert_eq!(ty.field_offsets().expect("non-opaque"), vec![("x", 0), ("y", 4)]);

	let s = ty.from_values([("x", Value::Int(255)), ("y", Value::Int(1024))]).expect("values assign");
	assert_eq!(get_int(&s, "x"), 255);
	assert_eq!(get_int(&s, "y"), 1024);
}

#[test]
fn trailing_small_field_still_pads_to_max_alignment() {
	let ty = StructType::new([("x", types::uint32()), ("y", types::uint8())]).expect("schema builds");

	assert_eq!(ty.byte_length(), Some(8));
	assert_eq!(ty.byte_alignment(), Some(4));
	assert_eq!(ty.field_offsets().expect("non-opaque"), vec![("x", 0), ("y", 4)]);
}

#[test]
fn all_nine_numeric_kinds_lay_out_naturally() {
	let ty = StructType::new([
		("u8", types::uint8()),
		("i8", types::int8()),
		("u8c", types::uint8_clamped()),
		("u16", types::uint16()),
		("i16", types::int16()),
		("u32", types::uint32()),
		("i32", types::int32()),
		("f32", types::float32()),
		("f64", types::float64()),
	])
	.expect("schema builds");

	assert_eq!(ty.byte_length(), Some(32));
	assert_eq!(ty.byte_alignment(), Some(8));
	assert_eq!(
		ty.field_offsets().expect("non-opaque"),
		vec![
			("u8", 0),
			("i8", 1),
			("u8c", 2),
			("u16", 4),
			("i16", 6),
			("u32", 8),
			("i32", 12),
			("f32", 16),
			("f64", 24),
		]
	);

	let s1 = ty
		.from_values([
			("u8", Value::Int(255)),
			("i8", Value::Int(127)),
			("u8c", Value::Int(1024)),
			("u16", Value::Int(0xFFFF)),
			("i16", Value::Int(0x7FFF)),
			("u32", Value::Int(0xFFFF_FFFF)),
			("i32", Value::Int(0x7FFF_FFFF)),
			("f32", Value::Float(1.5)),
			("f64", Value::Float(1.5)),
		])
		.expect("values assign");
	assert_eq!(get_int(&s1, "u8"), 255);
	assert_eq!(get_int(&s1, "i8"), 127);
	assert_eq!(get_int(&s1, "u8c"), 255);
	assert_eq!(get_int(&s1, "u16"), 0xFFFF);
	assert_eq!(get_int(&s1, "i16"), 0x7FFF);
	assert_eq!(get_int(&s1, "u32"), 0xFFFF_FFFF);
	assert_eq!(get_int(&s1, "i32"), 0x7FFF_FFFF);
	assert_eq!(s1.get("f32").expect("field reads").as_float(), Some(1.5));
	assert_eq!(s1.get("f64").expect("field reads").as_float(), Some(1.5));

	let s2 = ty.instance();
	for (name, _) in ty.field_types().expect("non-opaque") {
		let value = s2.get(name).expect("field reads");
		assert_eq!(value.as_float(), Some(0.0), "default for {name}");
	}
}

#[test]
fn empty_schema_degenerates_to_zero_size() {
	let ty = StructType::new(Vec::<(&str, crate::typed::TypeDesc)>::new()).expect("schema builds");
	assert_eq!(ty.byte_length(), Some(0));
	assert_eq!(ty.byte_alignment(), Some(1));
	let _ = ty.instance();
}

#[test]
fn raw_buffer_view_writes_at_absolute_offsets() {
	let ty = StructType::new([("x", types::uint8()), ("y", types::uint16()), ("z", types::uint32())]).expect("schema builds");
	let buffer = Rc::new(RefCell::new(vec![0_u8; 1024]));

	let s = ty.view_over_bytes(&buffer, 100).expect("view binds");
	s.set("x", Value::Int(1)).expect("x writes");
	s.set("y", Value::Int(2)).expect("y writes");
	s.set("z", Value::Int(3)).expect("z writes");

	let bytes = buffer.borrow();
	assert_eq!(bytes[100], 1);
	assert_eq!(u16::from_ne_bytes([bytes[102], bytes[103]]), 2);
	assert_eq!(u32::from_ne_bytes([bytes[104], bytes[105], bytes[106], bytes[107]]), 3);
}

#[test]
fn nested_struct_reads_alias_and_writes_copy() {
	let inner = StructType::new([("x", types::uint8())]).expect("schema builds");
	let outer = StructType::new([("s", inner.clone().into())]).expect("schema builds");

	let s1 = outer
		.from_values([("s", inner.from_values([("x", Value::Int(1))]).expect("inner builds").into())])
		.expect("values assign");
	let child = s1.get("s").expect("field reads");
	let child = child.as_struct().expect("struct field");
	assert_eq!(get_int(child, "x"), 1);

	child.set("x", Value::Int(2)).expect("aliased write");
	assert_eq!(get_int(s1.get("s").expect("field reads").as_struct().expect("struct field"), "x"), 2);

	let source = inner.from_values([("x", Value::Int(42))]).expect("inner builds");
	s1.set("s", source.clone().into()).expect("copy assign");
	assert_eq!(get_int(s1.get("s").expect("field reads").as_struct().expect("struct field"), "x"), 42);

	// value semantics: mutating the copy source no longer reaches s1
	source.set("x", Value::Int(99)).expect("source write");
	assert_eq!(get_int(s1.get("s").expect("field reads").as_struct().expect("struct field"), "x"), 42);
}

#[test]
fn nested_struct_layout_and_storage_window() {
	let inner = StructType::new([("x", types::uint8()), ("y", types::uint32())]).expect("schema builds");
	let outer = StructType::new([("z", types::uint16()), ("s", inner.clone().into())]).expect("schema builds");

	assert_eq!(outer.byte_length(), Some(12));
	assert_eq!(outer.byte_alignment(), Some(4));
	assert_eq!(outer.field_offsets().expect("non-opaque"), vec![("z", 0), ("s", 4)]);

	let s1 = outer
		.from_values([
			("z", Value::Int(3)),
			("s", inner.from_values([("x", Value::Int(1)), ("y", Value::Int(2))]).expect("inner builds").into()),
		])
		.expect("values assign");

	let child_value = s1.get("s").expect("field reads");
	let child = child_value.as_struct().expect("struct field");
	let window = inner.storage(child).expect("non-opaque storage");
	assert_eq!(window.byte_offset, 4);
	assert_eq!(window.byte_length, 8);

	assert_eq!(get_int(child, "x"), 1);
	assert_eq!(get_int(child, "y"), 2);
	assert_eq!(get_int(&s1, "z"), 3);

	child.set("x", Value::Int(2)).expect("aliased write");
	assert_eq!(get_int(s1.get("s").expect("field reads").as_struct().expect("struct field"), "x"), 2);

	let replacement = inner.from_values([("x", Value::Int(42)), ("y", Value::Int(1024))]).expect("inner builds");
	s1.set("s", replacement.into()).expect("copy assign");
	let copied_value = s1.get("s").expect("field reads");
	let copied = copied_value.as_struct().expect("struct field");
	assert_eq!(get_int(copied, "x"), 42);
	assert_eq!(get_int(copied, "y"), 1024);
}

#[test]
fn nested_struct_over_raw_buffer_lands_at_computed_offsets() {
	let inner = StructType::new([("x", types::uint8()), ("y", types::uint32())]).expect("schema builds");
	let outer = StructType::new([("z", types::uint16()), ("s", inner.clone().into())]).expect("schema builds");
	let buffer = Rc::new(RefCell::new(vec![0_u8; 1024]));

	let s1 = outer.view_over_bytes(&buffer, 100).expect("view binds");
	s1.set("s", inner.from_values([("x", Value::Int(1)), ("y", Value::Int(2))]).expect("inner builds").into())
		.expect("copy assign");
	s1.set("z", Value::Int(3)).expect("z writes");

	let bytes = buffer.borrow();
	assert_eq!(u16::from_ne_bytes([bytes[100], bytes[101]]), 3);
	assert_eq!(bytes[104], 1);
	assert_eq!(u32::from_ne_bytes([bytes[108], bytes[109], bytes[110], bytes[111]]), 2);
}

#[test]
fn fields_of_one_representation_share_a_view_group() {
	let inner = StructType::new([("x", types::uint8())]).expect("schema builds");
	let ty = StructType::new([
		("a", types::int32()),
		("b", types::int32()),
		("c", types::uint8()),
		("o", types::object()),
		("p", types::object()),
		("s", inner.clone().into()),
		("t", inner.into()),
	])
	.expect("schema builds");

	// int32, uint8, slots, and one shared nested layout
	assert_eq!(ty.view_group_count(), 4);
}

#[test]
fn opaque_struct_keeps_reference_identity_and_hides_bytes() {
	let ty = StructType::new([("x", types::uint8()), ("o", types::object())]).expect("schema builds");

	assert!(ty.is_opaque());
	assert_eq!(ty.byte_length(), None);
	assert_eq!(ty.byte_alignment(), None);
	assert!(ty.field_offsets().is_none());
	assert!(ty.field_types().is_none());

	let referent = Opaque::new(String::from("payload"));
	let s = ty.from_values([("x", Value::Int(5)), ("o", referent.clone().into())]).expect("values assign");
	assert_eq!(get_int(&s, "x"), 5);
	let read = s.get("o").expect("field reads");
	assert!(read.as_opaque().expect("reference field").ptr_eq(&referent));

	assert!(s.is_opaque());
	assert!(matches!(s.storage(), Err(TypeError::OpaqueStorageAccess)));
	assert!(matches!(ty.storage(&s), Err(TypeError::OpaqueStorageAccess)));
}

#[test]
fn opacity_propagates_through_nested_opaque_field() {
	let inner = StructType::new([("x", types::uint8()), ("o", types::object())]).expect("schema builds");
	let outer = StructType::new([("s", inner.clone().into()), ("x", types::uint32())]).expect("schema builds");
	assert!(outer.is_opaque());

	let referent = Opaque::new(7_i64);
	let s1 = outer
		.from_values([
			("s", inner.from_values([("x", Value::Int(5)), ("o", referent.clone().into())]).expect("inner builds").into()),
			("x", Value::Int(1024)),
		])
		.expect("values assign");

	assert_eq!(get_int(&s1, "x"), 1024);
	let child_value = s1.get("s").expect("field reads");
	let child = child_value.as_struct().expect("struct field");
	assert_eq!(get_int(child, "x"), 5);
	assert!(child.get("o").expect("field reads").as_opaque().expect("reference field").ptr_eq(&referent));
}

#[test]
fn non_opaque_child_of_opaque_parent_loses_its_byte_window() {
	let inner = StructType::new([("x", types::uint8()), ("y", types::uint32())]).expect("schema builds");
	let outer = StructType::new([("s", inner.clone().into()), ("o", types::object())]).expect("schema builds");

	assert!(!inner.is_opaque());
	assert!(outer.is_opaque());

	let referent = Opaque::new([1_u8, 2, 3]);
	let s1 = outer
		.from_values([
			("s", inner.from_values([("x", Value::Int(5)), ("y", Value::Int(1024))]).expect("inner builds").into()),
			("o", referent.clone().into()),
		])
		.expect("values assign");

	let child_value = s1.get("s").expect("field reads");
	let child = child_value.as_struct().expect("struct field");
	assert_eq!(get_int(child, "x"), 5);
	assert_eq!(get_int(child, "y"), 1024);
	assert!(s1.get("o").expect("field reads").as_opaque().expect("reference field").ptr_eq(&referent));

	// the child descriptor would have a byte window, but this instance lives
	// in opaque storage
	assert!(child.is_opaque());
	assert!(matches!(child.storage(), Err(TypeError::OpaqueStorageAccess)));
	assert!(matches!(inner.storage(child), Err(TypeError::OpaqueStorageAccess)));
}

#[test]
fn variable_length_field_is_rejected() {
	let var = ArrayType::variable(types::uint32()).expect("descriptor builds");
	let err = StructType::new([("data", var.into())]).expect_err("variable field fails");
	assert!(matches!(err, TypeError::VariableLengthField { field } if field.as_ref() == "data"));
}

#[test]
fn duplicate_field_name_is_rejected() {
	let err = StructType::new([("x", types::uint8()), ("x", types::uint32())]).expect_err("duplicate fails");
	assert!(matches!(err, TypeError::DuplicateField { field } if field.as_ref() == "x"));
}

#[test]
fn unknown_field_access_is_rejected() {
	let ty = StructType::new([("x", types::uint8())]).expect("schema builds");
	let s = ty.instance();
	assert!(matches!(s.get("y"), Err(TypeError::UnknownField { name }) if name.as_ref() == "y"));
	assert!(matches!(s.set("y", Value::Int(0)), Err(TypeError::UnknownField { .. })));
	assert!(matches!(
		ty.from_values([("y", Value::Int(0))]),
		Err(TypeError::UnknownField { .. })
	));
}

#[test]
fn opaque_type_cannot_alias_raw_bytes_or_plain_storage() {
	let ty = StructType::new([("o", types::object())]).expect("schema builds");

	let buffer = Rc::new(RefCell::new(vec![0_u8; 64]));
	assert!(matches!(ty.view_over_bytes(&buffer, 0), Err(TypeError::OpaqueOverBytes)));

	let plain = crate::typed::Storage::alloc(64, false);
	assert!(matches!(ty.view_over_storage(&plain, 0), Err(TypeError::StorageOpacityMismatch)));
}

#[test]
fn view_past_end_of_buffer_is_rejected() {
	let ty = StructType::new([("x", types::uint32())]).expect("schema builds");
	let buffer = Rc::new(RefCell::new(vec![0_u8; 16]));
	let err = ty.view_over_bytes(&buffer, 14).expect_err("short buffer fails");
	assert!(matches!(err, TypeError::BufferTooSmall { byte_offset: 14, need: 4, have: 16 }));
}
