//! Copying a decoded `data` value into caller-owned destinations.
//!
//! A destination is either record-shaped or map-shaped, see [`Target`].
//! Records describe their fields once with the [`record!`](crate::record)
//! macro; maps accept any key.
//!
//! The rules applied to records are strict:
//! - a key without a matching field fails with [`UnpackError::UnknownField`],
//! - a field without a matching key is reset to its default value,
//! - a value of the wrong shape fails with [`UnpackError::TypeMismatch`].
//!
//! Resetting missing fields means that unpacking the same `data` twice into
//! the same value always ends in the same state.
//!
//! ```rust
//! use gqlclient::{record, unpack::unpack};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct User {
//!     id: String,
//!     display_name: Option<String>,
//! }
//!
//! record!(User { id, display_name => "displayName" });
//!
//! let data = json!({ "id": "1", "displayName": "bob" });
//! let mut user = User::default();
//! unpack(Some(&data), &mut user)?;
//!
//! assert_eq!(user.display_name.as_deref(), Some("bob"));
//! # Ok::<(), gqlclient::unpack::UnpackError>(())
//! ```

use serde_json::Value;

mod error;
pub use self::error::UnpackError;

mod path;
pub use self::path::UnpackPath;

mod record;
pub use self::record::{Field, FieldIndex, RecordTarget};

mod map;
pub use self::map::MapTarget;

mod scalar;

/// A value that can be overwritten from a JSON value.
///
/// Implemented for strings, booleans, numbers, [`Value`], `Option<T>`,
/// `Vec<T>`, string-keyed maps, and every type declared with
/// [`record!`](crate::record).
pub trait Unpack {
    /// Overwrites `self` with `value`.
    ///
    /// `null` never reaches this method from the unpacker: the slot is
    /// [`reset`](Self::reset) instead.
    ///
    /// # Errors
    ///
    /// Fails when `value` has a shape `Self` cannot hold, or when a nested
    /// record meets an unknown key.
    fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError>;

    /// Resets `self` to its zero value.
    fn reset(&mut self);
}

/// The two shapes a destination can take.
pub enum Target<'a> {
    /// A value with a fixed, declared set of fields.
    Record(&'a mut dyn RecordTarget),
    /// A value accepting arbitrary string keys.
    Map(&'a mut dyn MapTarget),
}

/// A caller-owned value that can receive the `data` of a response.
pub trait Destination {
    /// Exposes the destination shape to the unpacker.
    fn target(&mut self) -> Target<'_>;
}

/// Populates `destination` from `data`.
///
/// Absent or `null` data resets the destination to its zero value.
///
/// # Errors
///
/// Returns the first [`UnpackError`] met. Fields visited before the failure
/// keep their new values.
pub fn unpack<D>(data: Option<&Value>, destination: &mut D) -> Result<(), UnpackError>
where
    D: Destination + ?Sized,
{
    let mut path = UnpackPath::new();
    unpack_target(destination.target(), data, &mut path)
}

/// Dispatches on the destination shape.
///
/// Used by the code generated by [`record!`](crate::record).
///
/// # Errors
///
/// See [`unpack`].
pub fn unpack_target(
    target: Target<'_>,
    data: Option<&Value>,
    path: &mut UnpackPath,
) -> Result<(), UnpackError> {
    match (target, data) {
        (Target::Record(record), None | Some(Value::Null)) => {
            record::reset_record(record);
            Ok(())
        }
        (Target::Map(map), None | Some(Value::Null)) => {
            map.clear_entries();
            Ok(())
        }
        (Target::Record(record), Some(Value::Object(object))) => {
            record::unpack_record(record, object, path)
        }
        (Target::Map(map), Some(Value::Object(object))) => map::unpack_map(map, object, path),
        (Target::Record(_) | Target::Map(_), Some(other)) => {
            Err(UnpackError::type_mismatch(path, "object", other))
        }
    }
}

/// Unpacks `value` into `slot`, resetting it on `null`.
pub(crate) fn unpack_or_reset<T>(
    slot: &mut T,
    value: &Value,
    path: &mut UnpackPath,
) -> Result<(), UnpackError>
where
    T: Unpack + ?Sized,
{
    if value.is_null() {
        slot.reset();
        Ok(())
    } else {
        slot.unpack(value, path)
    }
}

/// Short name of the JSON kind of `value`, as used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
