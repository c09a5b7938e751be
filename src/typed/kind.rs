use crate::typed::{Result, TypeError, Value};

/// Numeric representation of a primitive value field.
///
/// Size and alignment coincide for every kind, so byte offsets divided by
/// alignment give element indices directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// Signed 8-bit integer, wrapping on write.
	Int8,
	/// Unsigned 8-bit integer, wrapping on write.
	Uint8,
	/// Unsigned 8-bit integer, clamped to `[0, 255]` on write.
	Uint8Clamped,
	/// Signed 16-bit integer.
	Int16,
	/// Unsigned 16-bit integer.
	Uint16,
	/// Signed 32-bit integer.
	Int32,
	/// Unsigned 32-bit integer.
	Uint32,
	/// IEEE754 single-precision float.
	Float32,
	/// IEEE754 double-precision float.
	Float64,
}

impl ValueKind {
	/// Element width in bytes; natural alignment is the same value.
	pub fn size(self) -> usize {
		match self {
			ValueKind::Int8 | ValueKind::Uint8 | ValueKind::Uint8Clamped => 1,
			ValueKind::Int16 | ValueKind::Uint16 => 2,
			ValueKind::Int32 | ValueKind::Uint32 | ValueKind::Float32 => 4,
			ValueKind::Float64 => 8,
		}
	}

	/// Stable lowercase representation name.
	pub fn name(self) -> &'static str {
		match self {
			ValueKind::Int8 => "int8",
			ValueKind::Uint8 => "uint8",
			ValueKind::Uint8Clamped => "uint8clamped",
			ValueKind::Int16 => "int16",
			ValueKind::Uint16 => "uint16",
			ValueKind::Int32 => "int32",
			ValueKind::Uint32 => "uint32",
			ValueKind::Float32 => "float32",
			ValueKind::Float64 => "float64",
		}
	}

	/// Read the element at byte offset `at` using native-endian encoding.
	///
	/// Panics when the slice is too short, mirroring raw memory access.
	pub(crate) fn read(self, bytes: &[u8], at: usize) -> Value {
		match self {
			ValueKind::Int8 => Value::Int(i64::from(bytes[at] as i8)),
			ValueKind::Uint8 | ValueKind::Uint8Clamped => Value::Int(i64::from(bytes[at])),
			ValueKind::Int16 => Value::Int(i64::from(i16::from_ne_bytes(take(bytes, at)))),
			ValueKind::Uint16 => Value::Int(i64::from(u16::from_ne_bytes(take(bytes, at)))),
			ValueKind::Int32 => Value::Int(i64::from(i32::from_ne_bytes(take(bytes, at)))),
			ValueKind::Uint32 => Value::Int(i64::from(u32::from_ne_bytes(take(bytes, at)))),
			ValueKind::Float32 => Value::Float(f64::from(f32::from_ne_bytes(take(bytes, at)))),
			ValueKind::Float64 => Value::Float(f64::from_ne_bytes(take(bytes, at))),
		}
	}

	/// Write `value` at byte offset `at`, applying this representation's
	/// native conversion (integer wrapping, 8-bit clamping, IEEE rounding).
	pub(crate) fn write(self, bytes: &mut [u8], at: usize, value: &Value) -> Result<()> {
		match self {
			ValueKind::Int8 => bytes[at] = to_wrapped(value, 8)? as u8,
			ValueKind::Uint8 => bytes[at] = to_wrapped(value, 8)? as u8,
			ValueKind::Uint8Clamped => bytes[at] = to_clamped_u8(value)?,
			ValueKind::Int16 => put(bytes, at, (to_wrapped(value, 16)? as u16).to_ne_bytes()),
			ValueKind::Uint16 => put(bytes, at, (to_wrapped(value, 16)? as u16).to_ne_bytes()),
			ValueKind::Int32 => put(bytes, at, (to_wrapped(value, 32)? as u32).to_ne_bytes()),
			ValueKind::Uint32 => put(bytes, at, (to_wrapped(value, 32)? as u32).to_ne_bytes()),
			ValueKind::Float32 => put(bytes, at, (to_float(value)? as f32).to_ne_bytes()),
			ValueKind::Float64 => put(bytes, at, to_float(value)?.to_ne_bytes()),
		}
		Ok(())
	}
}

fn take<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
	let mut out = [0_u8; N];
	out.copy_from_slice(&bytes[at..at + N]);
	out
}

fn put<const N: usize>(bytes: &mut [u8], at: usize, raw: [u8; N]) {
	bytes[at..at + N].copy_from_slice(&raw);
}

fn to_float(value: &Value) -> Result<f64> {
	match value {
		Value::Int(v) => Ok(*v as f64),
		Value::Float(v) => Ok(*v),
		other => Err(TypeError::ValueKindMismatch {
			expected: "numeric",
			got: other.kind_name(),
		}),
	}
}

/// Convert to an integer truncated modulo `2^bits`, returned as the unsigned
/// bit pattern. Non-finite floats become 0, finite floats truncate toward zero.
fn to_wrapped(value: &Value, bits: u32) -> Result<u64> {
	let wide = match value {
		Value::Int(v) => *v,
		Value::Float(f) => wrap_float(*f, bits),
		other => {
			return Err(TypeError::ValueKindMismatch {
				expected: "numeric",
				got: other.kind_name(),
			});
		}
	};
	Ok((wide as u64) & ((1_u64 << bits) - 1))
}

fn wrap_float(f: f64, bits: u32) -> i64 {
	if !f.is_finite() {
		return 0;
	}
	let modulus = (1_u64 << bits) as f64;
	let mut r = f.trunc() % modulus;
	if r < 0.0 {
		r += modulus;
	}
	r as i64
}

fn to_clamped_u8(value: &Value) -> Result<u8> {
	match value {
		Value::Int(v) => Ok((*v).clamp(0, 255) as u8),
		Value::Float(f) if f.is_nan() => Ok(0),
		Value::Float(f) => Ok(f.clamp(0.0, 255.0).round_ties_even() as u8),
		other => Err(TypeError::ValueKindMismatch {
			expected: "numeric",
			got: other.kind_name(),
		}),
	}
}
