//! Immutable registry of primitive descriptors.
//!
//! Composite schemas are built from these twelve constructors plus
//! [`StructType`](crate::typed::StructType) and
//! [`ArrayType`](crate::typed::ArrayType); nothing here mutates shared state.

use crate::typed::{RefKind, TypeDesc, ValueKind};

/// Signed 8-bit integer descriptor.
pub fn int8() -> TypeDesc {
	TypeDesc::Value(ValueKind::Int8)
}

/// Unsigned 8-bit integer descriptor.
pub fn uint8() -> TypeDesc {
	TypeDesc::Value(ValueKind::Uint8)
}

/// Clamped unsigned 8-bit integer descriptor.
pub fn uint8_clamped() -> TypeDesc {
	TypeDesc::Value(ValueKind::Uint8Clamped)
}

/// Signed 16-bit integer descriptor.
pub fn int16() -> TypeDesc {
	TypeDesc::Value(ValueKind::Int16)
}

/// Unsigned 16-bit integer descriptor.
pub fn uint16() -> TypeDesc {
	TypeDesc::Value(ValueKind::Uint16)
}

/// Signed 32-bit integer descriptor.
pub fn int32() -> TypeDesc {
	TypeDesc::Value(ValueKind::Int32)
}

/// Unsigned 32-bit integer descriptor.
pub fn uint32() -> TypeDesc {
	TypeDesc::Value(ValueKind::Uint32)
}

/// Single-precision float descriptor.
pub fn float32() -> TypeDesc {
	TypeDesc::Value(ValueKind::Float32)
}

/// Double-precision float descriptor.
pub fn float64() -> TypeDesc {
	TypeDesc::Value(ValueKind::Float64)
}

/// Opaque host-object descriptor.
pub fn object() -> TypeDesc {
	TypeDesc::Reference(RefKind::Object)
}

/// Opaque host-string descriptor.
pub fn string() -> TypeDesc {
	TypeDesc::Reference(RefKind::String)
}

/// Opaque any-value descriptor.
pub fn any() -> TypeDesc {
	TypeDesc::Reference(RefKind::Any)
}
