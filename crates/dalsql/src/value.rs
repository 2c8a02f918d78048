//! Bound parameter values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A scalar transmitted out-of-band through a `?` placeholder.
///
/// Executors translate these into their driver's native parameter type.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    U64(u64),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as an `i64` if it holds any integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(src: $ty) -> Self {
                    Self::$variant(src.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => I32,
    i16 => I32,
    i32 => I32,
    u8 => I32,
    u16 => I32,
    i64 => I64,
    u32 => I64,
    u64 => U64,
    f32 => F64,
    f64 => F64,
    String => String,
    &str => String,
    &String => String,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Timestamp,
    Uuid => Uuid,
    serde_json::Value => Json,
}

impl From<usize> for Value {
    fn from(src: usize) -> Self {
        Self::U64(src as u64)
    }
}

impl From<&[u8]> for Value {
    fn from(src: &[u8]) -> Self {
        Self::Bytes(src.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        src.map_or(Self::Null, Into::into)
    }
}
