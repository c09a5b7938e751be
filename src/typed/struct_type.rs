use std::rc::Rc;

use crate::typed::{Result, SharedBytes, Storage, StorageRef, TypeDesc, TypeError, Value, View, ViewKey};

fn round_up(size: usize, alignment: usize) -> usize {
	let rem = size % alignment;
	if rem == 0 { size } else { size + alignment - rem }
}

/// One resolved schema field.
#[derive(Debug)]
struct Field {
	name: Box<str>,
	ty: TypeDesc,
	byte_offset: usize,
	/// Byte offset divided by the field's alignment: the item index inside
	/// the field's view group.
	offset_units: usize,
	/// Index into the layout's view-group table.
	group: usize,
}

/// Layout shared by every instance of one struct descriptor.
#[derive(Debug)]
struct Layout {
	fields: Vec<Field>,
	/// One exemplar descriptor per distinct view key, in first-seen order.
	groups: Vec<TypeDesc>,
	size: usize,
	alignment: usize,
	opaque: bool,
}

/// Record descriptor: field offsets, alignment, opacity, and view groups,
/// computed once from a schema in declaration order.
///
/// Cheap to clone; all clones share one immutable layout, and that shared
/// layout's identity is the descriptor's view-deduplication key.
#[derive(Debug, Clone)]
pub struct StructType {
	layout: Rc<Layout>,
}

impl StructType {
	/// Build a descriptor from `(name, type)` schema entries in declaration order.
	///
	/// Field offsets are rounded up to each field's own alignment (natural
	/// alignment, no packing), total size is padded to the maximum field
	/// alignment so arrays of this struct tile without gaps, and the struct
	/// is opaque when any field is.
	pub fn new<N, I>(schema: I) -> Result<Self>
	where
		N: Into<Box<str>>,
		I: IntoIterator<Item = (N, TypeDesc)>,
	{
		let mut fields: Vec<Field> = Vec::new();
		let mut groups: Vec<(ViewKey, TypeDesc)> = Vec::new();
		let mut size = 0_usize;
		let mut max_alignment = 1_usize;
		let mut opaque = false;

		for (name, ty) in schema {
			let name = name.into();
			if fields.iter().any(|field| field.name == name) {
				return Err(TypeError::DuplicateField { field: name });
			}
			let Some(field_size) = ty.size() else {
				return Err(TypeError::VariableLengthField { field: name });
			};

			let alignment = ty.alignment();
			size = round_up(size, alignment);

			let key = ty.view_key();
			let group = match groups.iter().position(|(seen, _)| *seen == key) {
				Some(index) => index,
				None => {
					groups.push((key, ty.clone()));
					groups.len() - 1
				}
			};

			opaque = opaque || ty.is_opaque();
			max_alignment = max_alignment.max(alignment);

			fields.push(Field {
				name,
				byte_offset: size,
				offset_units: size / alignment,
				group,
				ty,
			});

			size += field_size;
		}

		size = round_up(size, max_alignment);

		Ok(Self {
			layout: Rc::new(Layout {
				fields,
				groups: groups.into_iter().map(|(_, ty)| ty).collect(),
				size,
				alignment: max_alignment,
				opaque,
			}),
		})
	}

	/// Identity of the shared layout, used as the view-deduplication key.
	pub(crate) fn layout_id(&self) -> usize {
		Rc::as_ptr(&self.layout) as usize
	}

	/// Total byte footprint including trailing padding.
	pub fn size(&self) -> usize {
		self.layout.size
	}

	/// Maximum field alignment in bytes.
	pub fn alignment(&self) -> usize {
		self.layout.alignment
	}

	/// Whether any field's tree contains an opaque leaf.
	pub fn is_opaque(&self) -> bool {
		self.layout.opaque
	}

	/// Struct descriptors always have a build-time-fixed size.
	pub fn is_variable(&self) -> bool {
		false
	}

	/// Byte footprint; absent for opaque descriptors.
	pub fn byte_length(&self) -> Option<usize> {
		(!self.layout.opaque).then_some(self.layout.size)
	}

	/// Byte alignment; absent for opaque descriptors.
	pub fn byte_alignment(&self) -> Option<usize> {
		(!self.layout.opaque).then_some(self.layout.alignment)
	}

	/// Field-name to byte-offset pairs in declaration order; absent for opaque descriptors.
	pub fn field_offsets(&self) -> Option<Vec<(&str, usize)>> {
		(!self.layout.opaque).then(|| {
			self.layout
				.fields
				.iter()
				.map(|field| (field.name.as_ref(), field.byte_offset))
				.collect()
		})
	}

	/// Field-name to descriptor pairs in declaration order; absent for opaque descriptors.
	pub fn field_types(&self) -> Option<Vec<(&str, &TypeDesc)>> {
		(!self.layout.opaque).then(|| {
			self.layout
				.fields
				.iter()
				.map(|field| (field.name.as_ref(), &field.ty))
				.collect()
		})
	}

	/// Fresh zero/default-initialized instance over its own storage.
	pub fn instance(&self) -> StructInstance {
		let storage = Storage::alloc(self.layout.size, self.layout.opaque);
		self.bind(&storage, 0)
	}

	/// Fresh instance with the given fields assigned; absent fields keep defaults.
	pub fn from_values<'a, I>(&self, values: I) -> Result<StructInstance>
	where
		I: IntoIterator<Item = (&'a str, Value)>,
	{
		let instance = self.instance();
		instance.assign(values)?;
		Ok(instance)
	}

	/// Alias a caller byte buffer at `byte_offset`.
	///
	/// Only non-opaque descriptors can window raw bytes; writes through the
	/// returned instance land in the shared buffer.
	pub fn view_over_bytes(&self, buffer: &SharedBytes, byte_offset: usize) -> Result<StructInstance> {
		if self.layout.opaque {
			return Err(TypeError::OpaqueOverBytes);
		}
		let storage = Storage::over(Rc::clone(buffer));
		self.check_bounds(&storage, byte_offset)?;
		Ok(self.bind(&storage, byte_offset))
	}

	/// Alias an existing storage at `byte_offset`.
	///
	/// This is the nested-view construction path: composite field reads reuse
	/// the parent's storage here. An opaque descriptor requires storage that
	/// carries opaque slots; a non-opaque descriptor over opaque storage is
	/// allowed and yields an opaque instance.
	pub fn view_over_storage(&self, storage: &Rc<Storage>, byte_offset: usize) -> Result<StructInstance> {
		if self.layout.opaque && !storage.is_opaque() {
			return Err(TypeError::StorageOpacityMismatch);
		}
		self.check_bounds(storage, byte_offset)?;
		Ok(self.bind(storage, byte_offset))
	}

	/// External byte-region descriptor for a non-opaque instance of this type.
	pub fn storage(&self, instance: &StructInstance) -> Result<StorageRef> {
		instance.storage()
	}

	fn check_bounds(&self, storage: &Rc<Storage>, byte_offset: usize) -> Result<()> {
		let have = storage.byte_len();
		let need = self.layout.size;
		if byte_offset.checked_add(need).is_none_or(|end| end > have) {
			return Err(TypeError::BufferTooSmall { byte_offset, need, have });
		}
		Ok(())
	}

	fn bind(&self, storage: &Rc<Storage>, byte_offset: usize) -> StructInstance {
		let views = self
			.layout
			.groups
			.iter()
			.map(|ty| View::bind(ty, storage, byte_offset))
			.collect();
		StructInstance {
			opaque: self.layout.opaque || storage.is_opaque(),
			ty: self.clone(),
			storage: Rc::clone(storage),
			byte_offset,
			views,
		}
	}

	#[cfg(test)]
	pub(crate) fn view_group_count(&self) -> usize {
		self.layout.groups.len()
	}
}

/// One materialized record bound to a storage region.
///
/// The field set is fixed by the descriptor; only field values can change.
/// Clones share the same storage and are therefore aliases.
#[derive(Debug, Clone)]
pub struct StructInstance {
	ty: StructType,
	storage: Rc<Storage>,
	byte_offset: usize,
	/// One bound view per descriptor view group.
	views: Vec<View>,
	/// Descriptor opacity OR storage opacity.
	opaque: bool,
}

impl StructInstance {
	/// Descriptor this instance was built from.
	pub fn ty(&self) -> &StructType {
		&self.ty
	}

	/// Whether this instance is byte-inaccessible.
	pub fn is_opaque(&self) -> bool {
		self.opaque
	}

	/// Read one field.
	///
	/// Scalar fields return their converted value; composite fields return a
	/// new aliasing view over this instance's storage, so mutating the result
	/// mutates this instance.
	pub fn get(&self, name: &str) -> Result<Value> {
		let field = self.field(name)?;
		self.views[field.group].get_item(field.offset_units)
	}

	/// Write one field.
	///
	/// Scalar values are converted and stored; composite values are copied
	/// leaf-by-leaf into place (value semantics, storage is never rebound).
	pub fn set(&self, name: &str, value: Value) -> Result<()> {
		let field = self.field(name)?;
		self.views[field.group].set_item(field.offset_units, &value)
	}

	/// Assign several fields from `(name, value)` pairs.
	pub fn assign<'a, I>(&self, values: I) -> Result<()>
	where
		I: IntoIterator<Item = (&'a str, Value)>,
	{
		for (name, value) in values {
			self.set(name, value)?;
		}
		Ok(())
	}

	/// External byte-region descriptor; opaque instances have none.
	pub fn storage(&self) -> Result<StorageRef> {
		if self.opaque {
			return Err(TypeError::OpaqueStorageAccess);
		}
		Ok(StorageRef {
			buffer: self.storage.buffer(),
			byte_offset: self.byte_offset,
			byte_length: self.ty.layout.size,
		})
	}

	/// Copy `source`'s fields into this instance's storage, field by field.
	pub(crate) fn copy_from(&self, source: &StructInstance) -> Result<()> {
		for field in &self.ty.layout.fields {
			let value = source.get(&field.name)?;
			self.views[field.group].set_item(field.offset_units, &value)?;
		}
		Ok(())
	}

	fn field(&self, name: &str) -> Result<&Field> {
		self.ty
			.layout
			.fields
			.iter()
			.find(|field| field.name.as_ref() == name)
			.ok_or_else(|| TypeError::UnknownField { name: name.into() })
	}
}

#[cfg(test)]
mod tests;
