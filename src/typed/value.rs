use crate::typed::{ArrayInstance, Opaque, StructInstance};

/// Runtime value passed in and out of field and element accessors.
///
/// Composite payloads carry instances: reads hand out aliasing views over the
/// parent's storage, writes treat the payload as a copy source.
#[derive(Debug, Clone)]
pub enum Value {
	/// Integer payload for the integral numeric kinds.
	Int(i64),
	/// Floating payload for the float kinds.
	Float(f64),
	/// Opaque reference payload for reference kinds.
	Ref(Opaque),
	/// Record payload for struct fields and elements.
	Struct(StructInstance),
	/// Sequence payload for array fields and elements.
	Array(ArrayInstance),
}

impl Value {
	/// The empty reference value.
	pub fn null() -> Self {
		Value::Ref(Opaque::null())
	}

	/// Stable payload-kind label, used in mismatch diagnostics.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::Ref(_) => "reference",
			Value::Struct(_) => "struct",
			Value::Array(_) => "array",
		}
	}

	/// Integer payload, when present.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Floating payload, also widening an integer payload.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(v) => Some(*v),
			Value::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	/// Opaque reference payload, when present.
	pub fn as_opaque(&self) -> Option<&Opaque> {
		match self {
			Value::Ref(v) => Some(v),
			_ => None,
		}
	}

	/// Record payload, when present.
	pub fn as_struct(&self) -> Option<&StructInstance> {
		match self {
			Value::Struct(v) => Some(v),
			_ => None,
		}
	}

	/// Sequence payload, when present.
	pub fn as_array(&self) -> Option<&ArrayInstance> {
		match self {
			Value::Array(v) => Some(v),
			_ => None,
		}
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(i64::from(value))
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Value::Float(f64::from(value))
	}
}

impl From<Opaque> for Value {
	fn from(value: Opaque) -> Self {
		Value::Ref(value)
	}
}

impl From<StructInstance> for Value {
	fn from(value: StructInstance) -> Self {
		Value::Struct(value)
	}
}

impl From<ArrayInstance> for Value {
	fn from(value: ArrayInstance) -> Self {
		Value::Array(value)
	}
}
