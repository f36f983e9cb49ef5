use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{UnpackError, UnpackPath};

/// One declared field of a record destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The Rust field identifier.
    pub name: &'static str,
    /// The key expected in the response.
    pub wire: &'static str,
}

impl Field {
    /// Declares a field read from the `wire` key.
    pub const fn new(name: &'static str, wire: &'static str) -> Self {
        Self { name, wire }
    }
}

/// Lookup table from response keys to the declared fields of a record type.
///
/// Built once per record type, see [`record!`](crate::record).
/// Keys are matched against the wire name first, then ignoring ASCII case.
#[derive(Debug, Clone)]
pub struct FieldIndex {
    fields: Vec<Field>,
    exact: HashMap<&'static str, usize>,
    folded: HashMap<String, usize>,
}

impl FieldIndex {
    /// Indexes `fields` by wire name.
    pub fn new(fields: Vec<Field>) -> Self {
        let mut exact = HashMap::with_capacity(fields.len());
        let mut folded = HashMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            exact.entry(field.wire).or_insert(position);
            folded
                .entry(field.wire.to_ascii_lowercase())
                .or_insert(position);
        }

        Self {
            fields,
            exact,
            folded,
        }
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Finds the field receiving the response `key`.
    pub fn lookup(&self, key: &str) -> Option<&Field> {
        let position = self
            .exact
            .get(key)
            .or_else(|| self.folded.get(&key.to_ascii_lowercase()))?;
        self.fields.get(*position)
    }
}

/// A record-shaped destination: a fixed set of named fields.
///
/// Implement it with the [`record!`](crate::record) macro rather than by hand.
pub trait RecordTarget {
    /// The cached field table of this record type.
    fn field_index(&self) -> &'static FieldIndex;

    /// Unpacks `value` into the field called `name`.
    ///
    /// # Errors
    ///
    /// Fails when `value` does not fit the field type.
    fn unpack_field(
        &mut self,
        name: &str,
        value: &Value,
        path: &mut UnpackPath,
    ) -> Result<(), UnpackError>;

    /// Resets the field called `name` to its zero value.
    fn reset_field(&mut self, name: &str);
}

pub(super) fn unpack_record(
    record: &mut dyn RecordTarget,
    object: &Map<String, Value>,
    path: &mut UnpackPath,
) -> Result<(), UnpackError> {
    let index = record.field_index();
    let mut visited = Vec::with_capacity(object.len());

    for (key, value) in object {
        let Some(field) = index.lookup(key) else {
            return Err(UnpackError::unknown_field(path, key));
        };
        // a folded key loses against the exact key, or an earlier folded one
        if field.wire != key && (object.contains_key(field.wire) || visited.contains(&field.name)) {
            return Err(UnpackError::unknown_field(path, key));
        }

        path.push_key(key);
        let result = if value.is_null() {
            record.reset_field(field.name);
            Ok(())
        } else {
            record.unpack_field(field.name, value, path)
        };
        path.pop();
        result?;

        visited.push(field.name);
    }

    for field in index.fields() {
        if !visited.contains(&field.name) {
            record.reset_field(field.name);
        }
    }

    Ok(())
}

pub(super) fn reset_record(record: &mut dyn RecordTarget) {
    for field in record.field_index().fields() {
        record.reset_field(field.name);
    }
}

/// Declares a record destination for an existing struct.
///
/// Every listed field must implement [`Unpack`](crate::unpack::Unpack).
/// The response key defaults to the field identifier; `field => "wireName"`
/// overrides it. The generated field table is built on first use and shared
/// by every value of the type.
///
/// ```rust
/// use gqlclient::record;
///
/// #[derive(Debug, Default)]
/// struct Repository {
///     name: String,
///     stargazer_count: u32,
///     topics: Vec<String>,
/// }
///
/// record!(Repository {
///     name,
///     stargazer_count => "stargazerCount",
///     topics,
/// });
/// ```
#[macro_export]
macro_rules! record {
    (@wire $field:ident) => {
        ::core::stringify!($field)
    };
    (@wire $field:ident, $wire:literal) => {
        $wire
    };
    ($ty:ty { $($field:ident $(=> $wire:literal)?),* $(,)? }) => {
        impl $crate::unpack::RecordTarget for $ty {
            fn field_index(&self) -> &'static $crate::unpack::FieldIndex {
                static INDEX: ::std::sync::OnceLock<$crate::unpack::FieldIndex> =
                    ::std::sync::OnceLock::new();
                INDEX.get_or_init(|| {
                    $crate::unpack::FieldIndex::new(::std::vec![
                        $(
                            $crate::unpack::Field::new(
                                ::core::stringify!($field),
                                $crate::record!(@wire $field $(, $wire)?),
                            ),
                        )*
                    ])
                })
            }

            #[allow(unused_variables)]
            fn unpack_field(
                &mut self,
                name: &str,
                value: &$crate::Value,
                path: &mut $crate::unpack::UnpackPath,
            ) -> ::core::result::Result<(), $crate::unpack::UnpackError> {
                $(
                    if name == ::core::stringify!($field) {
                        return $crate::unpack::Unpack::unpack(&mut self.$field, value, path);
                    }
                )*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn reset_field(&mut self, name: &str) {
                $(
                    if name == ::core::stringify!($field) {
                        $crate::unpack::Unpack::reset(&mut self.$field);
                        return;
                    }
                )*
            }
        }

        impl $crate::unpack::Unpack for $ty {
            fn unpack(
                &mut self,
                value: &$crate::Value,
                path: &mut $crate::unpack::UnpackPath,
            ) -> ::core::result::Result<(), $crate::unpack::UnpackError> {
                $crate::unpack::unpack_target(
                    $crate::unpack::Target::Record(self),
                    ::core::option::Option::Some(value),
                    path,
                )
            }

            fn reset(&mut self) {
                $( $crate::unpack::Unpack::reset(&mut self.$field); )*
            }
        }

        impl $crate::unpack::Destination for $ty {
            fn target(&mut self) -> $crate::unpack::Target<'_> {
                $crate::unpack::Target::Record(self)
            }
        }
    };
}
