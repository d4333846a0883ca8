//! Cell coercion: turning one trimmed text cell into a field value.

pub mod date_parser;
mod primitive;

use thiserror::Error;

use crate::schema::SemanticType;

pub use date_parser::{parse_datetime, DateFormat, DATE_FORMATS};

/// Why a single cell could not be coerced. Carries the offending text;
/// field and column identity are attached by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("invalid integer for {target}: {text}")]
    Integer { text: String, target: &'static str },

    #[error("invalid unsigned integer for {target}: {text}")]
    Unsigned { text: String, target: &'static str },

    #[error("invalid float: {text}")]
    Float { text: String },

    #[error("invalid boolean: {text}")]
    Bool { text: String },

    #[error(
        "invalid time format: {text} (supported formats: {})",
        date_parser::format_list()
    )]
    DateTime { text: String },

    /// Raised by user-supplied `FromCell` impls.
    #[error("invalid value: {text} ({reason})")]
    Custom { text: String, reason: String },
}

/// A type a single CSV cell can be coerced into.
///
/// `text` handed to [`FromCell::from_cell`] is already trimmed and never
/// empty; the empty-cell policy is applied before coercion is attempted.
pub trait FromCell: Sized {
    /// What kind of value this is, checked once when the field plan is built.
    fn semantic_type() -> SemanticType;

    fn from_cell(text: &str) -> Result<Self, CoerceError>;
}

impl<T: FromCell> FromCell for Option<T> {
    fn semantic_type() -> SemanticType {
        SemanticType::Optional(Box::new(T::semantic_type()))
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        T::from_cell(text).map(Some)
    }
}

/// Type-erased assignment of a coerced cell into one field of `T`.
pub type Setter<T> = Box<dyn Fn(&mut T, &str) -> Result<(), CoerceError> + Send + Sync>;

#[derive(Debug)]
pub(crate) enum CellError {
    Missing,
    Invalid(CoerceError),
}

/// Apply the empty-value policy, then coerce `raw` into `record` via `setter`.
///
/// An absent cell (ragged row) is treated the same as an empty one. Empty
/// optional cells leave the field at its default.
pub(crate) fn assign_cell<T>(
    record: &mut T,
    setter: &Setter<T>,
    raw: Option<&str>,
    required: bool,
) -> Result<(), CellError> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return if required {
            Err(CellError::Missing)
        } else {
            Ok(())
        };
    }
    setter(record, text).map_err(CellError::Invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        count: u32,
        note: Option<String>,
    }

    fn count_setter() -> Setter<Sample> {
        Box::new(|p: &mut Sample, text: &str| {
            p.count = u32::from_cell(text)?;
            Ok(())
        })
    }

    fn note_setter() -> Setter<Sample> {
        Box::new(|p: &mut Sample, text: &str| {
            p.note = Option::<String>::from_cell(text)?;
            Ok(())
        })
    }

    #[test]
    fn test_empty_optional_cell_keeps_default() {
        let mut sample = Sample::default();
        assert!(assign_cell(&mut sample, &count_setter(), Some("   "), false).is_ok());
        assert!(assign_cell(&mut sample, &note_setter(), None, false).is_ok());
        assert_eq!(sample.count, 0);
        assert_eq!(sample.note, None);
    }

    #[test]
    fn test_empty_required_cell_is_missing() {
        let mut sample = Sample::default();
        let res = assign_cell(&mut sample, &count_setter(), Some(""), true);
        assert!(matches!(res, Err(CellError::Missing)));
        let res = assign_cell(&mut sample, &note_setter(), None, true);
        assert!(matches!(res, Err(CellError::Missing)));
    }

    #[test]
    fn test_cell_is_trimmed_before_coercion() {
        let mut sample = Sample::default();
        assign_cell(&mut sample, &count_setter(), Some("  42 "), true).unwrap();
        assign_cell(&mut sample, &note_setter(), Some(" hi "), false).unwrap();
        assert_eq!(sample.count, 42);
        assert_eq!(sample.note.as_deref(), Some("hi"));
    }

    #[test]
    fn test_invalid_cell_reports_text() {
        let mut sample = Sample::default();
        match assign_cell(&mut sample, &count_setter(), Some("-3"), false) {
            Err(CellError::Invalid(CoerceError::Unsigned { text, target })) => {
                assert_eq!(text, "-3");
                assert_eq!(target, "u32");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_option_semantic_type_wraps_inner() {
        assert_eq!(
            Option::<f64>::semantic_type(),
            SemanticType::Optional(Box::new(SemanticType::Float))
        );
        assert_eq!(Option::<i8>::from_cell("7"), Ok(Some(7)));
    }
}
