use chrono::{DateTime, FixedOffset, Utc};

use super::{date_parser, CoerceError, FromCell};
use crate::schema::SemanticType;

macro_rules! impl_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl FromCell for $ty {
            fn semantic_type() -> SemanticType {
                SemanticType::Int
            }

            fn from_cell(text: &str) -> Result<Self, CoerceError> {
                text.parse::<$ty>().map_err(|_| CoerceError::Integer {
                    text: text.to_string(),
                    target: stringify!($ty),
                })
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl FromCell for $ty {
            fn semantic_type() -> SemanticType {
                SemanticType::Uint
            }

            fn from_cell(text: &str) -> Result<Self, CoerceError> {
                // std accepts a leading '+' for unsigned types; base-10 digits only here
                if text.starts_with('+') {
                    return Err(CoerceError::Unsigned {
                        text: text.to_string(),
                        target: stringify!($ty),
                    });
                }
                text.parse::<$ty>().map_err(|_| CoerceError::Unsigned {
                    text: text.to_string(),
                    target: stringify!($ty),
                })
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl FromCell for f64 {
    fn semantic_type() -> SemanticType {
        SemanticType::Float
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        text.parse().map_err(|_| CoerceError::Float {
            text: text.to_string(),
        })
    }
}

impl FromCell for f32 {
    fn semantic_type() -> SemanticType {
        SemanticType::Float
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        text.parse().map_err(|_| CoerceError::Float {
            text: text.to_string(),
        })
    }
}

impl FromCell for bool {
    fn semantic_type() -> SemanticType {
        SemanticType::Bool
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        match text {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(CoerceError::Bool {
                text: text.to_string(),
            }),
        }
    }
}

impl FromCell for String {
    fn semantic_type() -> SemanticType {
        SemanticType::Text
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        Ok(text.to_string())
    }
}

impl FromCell for DateTime<FixedOffset> {
    fn semantic_type() -> SemanticType {
        SemanticType::DateTime
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        date_parser::parse_datetime(text)
            .map(|(_, dt)| dt)
            .ok_or_else(|| CoerceError::DateTime {
                text: text.to_string(),
            })
    }
}

impl FromCell for DateTime<Utc> {
    fn semantic_type() -> SemanticType {
        SemanticType::DateTime
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        DateTime::<FixedOffset>::from_cell(text).map(|dt| dt.with_timezone(&Utc))
    }
}
