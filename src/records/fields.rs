//! Typed access to the raw fields of one record line.
//!
//! Records are declared with `record!`, which generates the struct, its
//! decoder and its tabular projection from one field list. A field written
//! as `nvhi: f64 = 1.1` is optional: when the line stops early, or the
//! field is blank, it takes the documented default.

use crate::error::FieldError;

/// Sequential reader over the fields of one line.
pub(crate) struct Fields<'a> {
    values: &'a [String],
    next: usize,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(values: &'a [String]) -> Self {
        Self { values, next: 0 }
    }

    fn take(&mut self) -> Option<&'a str> {
        let value = self.values.get(self.next).map(|v| v.trim());
        self.next += 1;
        value
    }

    pub(crate) fn int(&mut self, field: &'static str) -> Result<i64, FieldError> {
        i64::read(self, field)
    }

    pub(crate) fn real(&mut self, field: &'static str) -> Result<f64, FieldError> {
        f64::read(self, field)
    }

    pub(crate) fn text(&mut self, field: &'static str) -> Result<String, FieldError> {
        String::read(self, field)
    }
}

/// A value type a record field can decode into.
pub(crate) trait FieldKind: Sized {
    /// Read a required field.
    fn read(fields: &mut Fields<'_>, field: &'static str) -> Result<Self, FieldError>;

    /// Read an optional field, falling back to `default` when absent or blank.
    fn read_or<D: Into<Self>>(
        fields: &mut Fields<'_>,
        field: &'static str,
        default: D,
    ) -> Result<Self, FieldError>;
}

impl FieldKind for i64 {
    fn read(fields: &mut Fields<'_>, field: &'static str) -> Result<Self, FieldError> {
        match fields.take() {
            None | Some("") => Err(FieldError::Missing { field }),
            Some(raw) => parse_int(field, raw),
        }
    }

    fn read_or<D: Into<Self>>(
        fields: &mut Fields<'_>,
        field: &'static str,
        default: D,
    ) -> Result<Self, FieldError> {
        match fields.take() {
            None | Some("") => Ok(default.into()),
            Some(raw) => parse_int(field, raw),
        }
    }
}

impl FieldKind for f64 {
    fn read(fields: &mut Fields<'_>, field: &'static str) -> Result<Self, FieldError> {
        match fields.take() {
            None | Some("") => Err(FieldError::Missing { field }),
            Some(raw) => parse_real(field, raw),
        }
    }

    fn read_or<D: Into<Self>>(
        fields: &mut Fields<'_>,
        field: &'static str,
        default: D,
    ) -> Result<Self, FieldError> {
        match fields.take() {
            None | Some("") => Ok(default.into()),
            Some(raw) => parse_real(field, raw),
        }
    }
}

/// A present but blank string field decodes to the empty string.
impl FieldKind for String {
    fn read(fields: &mut Fields<'_>, field: &'static str) -> Result<Self, FieldError> {
        match fields.take() {
            None => Err(FieldError::Missing { field }),
            Some(raw) => Ok(unquote(raw).to_string()),
        }
    }

    fn read_or<D: Into<Self>>(
        fields: &mut Fields<'_>,
        _field: &'static str,
        default: D,
    ) -> Result<Self, FieldError> {
        match fields.take().map(unquote) {
            None | Some("") => Ok(default.into().trim().to_string()),
            Some(value) => Ok(value.to_string()),
        }
    }
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    raw.parse().map_err(|_| FieldError::Invalid {
        field,
        value: raw.to_string(),
        expected: "integer",
    })
}

fn parse_real(field: &'static str, raw: &str) -> Result<f64, FieldError> {
    raw.parse().map_err(|_| FieldError::Invalid {
        field,
        value: raw.to_string(),
        expected: "real number",
    })
}

/// Strip one pair of matching single or double quotes, then padding.
pub(crate) fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return raw[1..raw.len() - 1].trim();
        }
    }
    raw
}

macro_rules! read_field {
    ($fields:ident, $ty:ty, $name:expr) => {
        <$ty as $crate::records::fields::FieldKind>::read(&mut $fields, $name)?
    };
    ($fields:ident, $ty:ty, $name:expr, $default:expr) => {
        <$ty as $crate::records::fields::FieldKind>::read_or(&mut $fields, $name, $default)?
    };
}

/// Declare a record line: struct, `decode`, `FIELDS`, `values` and `Tabular`.
macro_rules! record {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty $(= $default:expr)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            pub index: usize,
            $( $(#[$field_meta])* pub $field: $ty, )*
        }

        impl $name {
            /// Field names in file order, without `index`.
            pub const FIELDS: &'static [&'static str] = &[$( stringify!($field) ),*];

            pub fn decode(index: usize, values: &[String]) -> Result<Self, $crate::error::FieldError> {
                let mut fields = $crate::records::fields::Fields::new(values);
                Ok(Self {
                    index,
                    $( $field: read_field!(fields, $ty, stringify!($field) $(, $default)?), )*
                })
            }

            /// Field values in file order, without `index`.
            pub fn values(&self) -> Vec<$crate::table::FieldValue> {
                vec![$( $crate::table::FieldValue::from(&self.$field) ),*]
            }
        }

        impl $crate::table::Tabular for $name {
            fn columns() -> Vec<String> {
                std::iter::once("index")
                    .chain(Self::FIELDS.iter().copied())
                    .map(String::from)
                    .collect()
            }

            fn row(&self) -> Vec<$crate::table::FieldValue> {
                let mut row = vec![$crate::table::FieldValue::from(self.index)];
                row.extend(self.values());
                row
            }
        }
    };
}
