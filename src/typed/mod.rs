mod array_type;
mod desc;
mod error;
mod kind;
mod opaque;
mod storage;
mod struct_type;
mod value;
mod view;

/// Immutable registry of primitive type descriptors.
pub mod types;

/// Homogeneous sequence descriptor and instance types.
pub use array_type::{ArrayInstance, ArrayType};
/// Closed descriptor variant and reference kinds.
pub use desc::{RefKind, TypeDesc};
/// Error and result aliases.
pub use error::{Result, TypeError};
/// Numeric representation kinds.
pub use kind::ValueKind;
/// Opaque slot value handle.
pub use opaque::Opaque;
/// Backing allocation and external byte-region types.
pub use storage::{SharedBytes, Storage, StorageRef};
/// Record descriptor and instance types.
pub use struct_type::{StructInstance, StructType};
/// Runtime value currency for field and element access.
pub use value::Value;

pub(crate) use view::{View, ViewKey};
