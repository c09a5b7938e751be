use std::rc::Rc;

use crate::typed::{ArrayType, Result, Storage, StructType, TypeDesc, TypeError, Value, ValueKind};

/// Stable key identifying one representation bound against one storage.
///
/// Fields whose descriptors produce the same key share a single [`View`] per
/// instance; composite layouts are keyed by their shared-layout identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewKey {
	/// One numeric representation.
	Num(ValueKind),
	/// The opaque slot representation.
	Slots,
	/// One composite layout.
	Layout(usize),
}

/// The representation half of a bound view.
#[derive(Debug, Clone)]
enum Repr {
	Num(ValueKind),
	Slots,
	Struct(StructType),
	Array(ArrayType),
}

impl Repr {
	fn of(desc: &TypeDesc) -> Repr {
		match desc {
			TypeDesc::Value(kind) => Repr::Num(*kind),
			TypeDesc::Reference(_) => Repr::Slots,
			TypeDesc::Struct(ty) => Repr::Struct(ty.clone()),
			TypeDesc::Array(ty) => Repr::Array(ty.clone()),
		}
	}

	/// Width of one item index step, in bytes.
	fn unit_bytes(&self) -> usize {
		match self {
			Repr::Num(kind) => kind.size(),
			Repr::Slots => 1,
			Repr::Struct(ty) => ty.alignment(),
			Repr::Array(ty) => ty.alignment(),
		}
	}
}

/// One representation bound to a storage at a base byte offset.
///
/// Item indices are expressed in representation units: element width for
/// numerics, one slot for references, alignment units for composites.
#[derive(Debug, Clone)]
pub(crate) struct View {
	storage: Rc<Storage>,
	base: usize,
	repr: Repr,
}

impl View {
	pub(crate) fn bind(desc: &TypeDesc, storage: &Rc<Storage>, base: usize) -> View {
		View {
			storage: Rc::clone(storage),
			base,
			repr: Repr::of(desc),
		}
	}

	/// Read the item at `units`; composite items alias the bound storage.
	pub(crate) fn get_item(&self, units: usize) -> Result<Value> {
		let at = self.base + units * self.repr.unit_bytes();
		match &self.repr {
			Repr::Num(kind) => Ok(self.storage.with_bytes(|bytes| kind.read(bytes, at))),
			Repr::Slots => Ok(Value::Ref(self.storage.read_slot(at))),
			Repr::Struct(ty) => Ok(Value::Struct(ty.view_over_storage(&self.storage, at)?)),
			Repr::Array(ty) => Ok(Value::Array(ty.view_over_storage(&self.storage, at)?)),
		}
	}

	/// Write the item at `units`; composite sources are copied leaf-by-leaf.
	pub(crate) fn set_item(&self, units: usize, value: &Value) -> Result<()> {
		let at = self.base + units * self.repr.unit_bytes();
		match &self.repr {
			Repr::Num(kind) => self.storage.with_bytes_mut(|bytes| kind.write(bytes, at, value)),
			Repr::Slots => match value {
				Value::Ref(opaque) => {
					self.storage.write_slot(at, opaque.clone());
					Ok(())
				}
				other => Err(TypeError::ValueKindMismatch {
					expected: "reference",
					got: other.kind_name(),
				}),
			},
			Repr::Struct(ty) => match value {
				Value::Struct(source) => ty.view_over_storage(&self.storage, at)?.copy_from(source),
				other => Err(TypeError::ValueKindMismatch {
					expected: "struct",
					got: other.kind_name(),
				}),
			},
			Repr::Array(ty) => match value {
				Value::Array(source) => ty.view_over_storage(&self.storage, at)?.copy_from(source),
				other => Err(TypeError::ValueKindMismatch {
					expected: "array",
					got: other.kind_name(),
				}),
			},
		}
	}
}
