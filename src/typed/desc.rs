use crate::typed::{ArrayType, StructType, ValueKind, ViewKey};

/// Opaque reference scalar kinds.
///
/// All three are structurally identical; the kind only documents intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
	/// Arbitrary host object.
	Object,
	/// Host string value.
	String,
	/// Any host value.
	Any,
}

impl RefKind {
	/// Stable lowercase kind name.
	pub fn name(self) -> &'static str {
		match self {
			RefKind::Object => "object",
			RefKind::String => "string",
			RefKind::Any => "any",
		}
	}
}

/// Closed descriptor variant covering every representable type.
///
/// Numeric and reference descriptors are plain enum payloads; composite
/// descriptors are cheap-clone handles sharing one immutable layout.
#[derive(Debug, Clone)]
pub enum TypeDesc {
	/// Primitive numeric representation.
	Value(ValueKind),
	/// Opaque reference scalar.
	Reference(RefKind),
	/// Fixed-layout record.
	Struct(StructType),
	/// Homogeneous sequence.
	Array(ArrayType),
}

impl From<StructType> for TypeDesc {
	fn from(ty: StructType) -> Self {
		TypeDesc::Struct(ty)
	}
}

impl From<ArrayType> for TypeDesc {
	fn from(ty: ArrayType) -> Self {
		TypeDesc::Array(ty)
	}
}

impl From<ValueKind> for TypeDesc {
	fn from(kind: ValueKind) -> Self {
		TypeDesc::Value(kind)
	}
}

impl From<RefKind> for TypeDesc {
	fn from(kind: RefKind) -> Self {
		TypeDesc::Reference(kind)
	}
}

impl TypeDesc {
	/// Byte footprint, `None` for variable-length arrays.
	pub fn size(&self) -> Option<usize> {
		match self {
			TypeDesc::Value(kind) => Some(kind.size()),
			TypeDesc::Reference(_) => Some(1),
			TypeDesc::Struct(ty) => Some(ty.size()),
			TypeDesc::Array(ty) => ty.size(),
		}
	}

	/// Natural alignment in bytes.
	pub fn alignment(&self) -> usize {
		match self {
			TypeDesc::Value(kind) => kind.size(),
			TypeDesc::Reference(_) => 1,
			TypeDesc::Struct(ty) => ty.alignment(),
			TypeDesc::Array(ty) => ty.alignment(),
		}
	}

	/// Whether any leaf of this type requires indexed, non-byte storage.
	pub fn is_opaque(&self) -> bool {
		match self {
			TypeDesc::Value(_) => false,
			TypeDesc::Reference(_) => true,
			TypeDesc::Struct(ty) => ty.is_opaque(),
			TypeDesc::Array(ty) => ty.is_opaque(),
		}
	}

	/// Whether instance length is supplied at construction time.
	pub fn is_variable(&self) -> bool {
		match self {
			TypeDesc::Array(ty) => ty.is_variable(),
			_ => false,
		}
	}

	/// Stable deduplication key for the view this descriptor binds.
	pub(crate) fn view_key(&self) -> ViewKey {
		match self {
			TypeDesc::Value(kind) => ViewKey::Num(*kind),
			TypeDesc::Reference(_) => ViewKey::Slots,
			TypeDesc::Struct(ty) => ViewKey::Layout(ty.layout_id()),
			TypeDesc::Array(ty) => ViewKey::Layout(ty.layout_id()),
		}
	}
}
