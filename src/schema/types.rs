// src/schema/types.rs

use std::fmt;

use crate::convert::{FromCell, Setter};

/// What kind of value a field holds, as far as coercion is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Text,
    Int,
    Uint,
    Float,
    Bool,
    DateTime,
    Optional(Box<SemanticType>),
    /// A nested record. Only date-times are supported as structured
    /// values, so any field declaring this is rejected at plan build.
    Struct(&'static str),
}

impl SemanticType {
    pub fn is_supported(&self) -> bool {
        match self {
            SemanticType::Struct(_) => false,
            SemanticType::Optional(inner) => inner.is_supported(),
            _ => true,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, SemanticType::Optional(_))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Text => f.write_str("text"),
            SemanticType::Int => f.write_str("int"),
            SemanticType::Uint => f.write_str("uint"),
            SemanticType::Float => f.write_str("float"),
            SemanticType::Bool => f.write_str("bool"),
            SemanticType::DateTime => f.write_str("datetime"),
            SemanticType::Optional(inner) => write!(f, "optional {}", inner),
            SemanticType::Struct(name) => write!(f, "struct {}", name),
        }
    }
}

/// One field of a record type: its name, raw `csv` tag (if any), declared
/// type and a typed setter.
pub struct FieldDescriptor<T> {
    name: &'static str,
    tag: Option<&'static str>,
    semantic_type: SemanticType,
    setter: Setter<T>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// Describe a field reachable through `access`. A `None` tag marks the
    /// field as unannotated, which the analyzer rejects.
    pub fn new<V>(
        name: &'static str,
        tag: Option<&'static str>,
        access: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: FromCell + 'static,
    {
        Self {
            name,
            tag,
            semantic_type: V::semantic_type(),
            setter: Box::new(move |record: &mut T, text: &str| {
                *access(record) = V::from_cell(text)?;
                Ok(())
            }),
        }
    }

    pub fn annotated<V>(name: &'static str, tag: &'static str, access: fn(&mut T) -> &mut V) -> Self
    where
        V: FromCell + 'static,
    {
        Self::new(name, Some(tag), access)
    }
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    pub fn semantic_type(&self) -> &SemanticType {
        &self.semantic_type
    }

    pub(crate) fn into_parts(self) -> (&'static str, Option<&'static str>, SemanticType, Setter<T>) {
        (self.name, self.tag, self.semantic_type, self.setter)
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("semantic_type", &self.semantic_type)
            .finish()
    }
}

/// A record type that rows can be mapped onto.
///
/// Usually implemented through [`csv_record!`](crate::csv_record). Every
/// field of the type must be listed by [`CsvRecord::fields`], annotated
/// or not, so that a missing annotation is caught at construction.
pub trait CsvRecord: Default + Sized + 'static {
    fn fields() -> Vec<FieldDescriptor<Self>>;
}
