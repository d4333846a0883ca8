use std::fmt;

use csv::StringRecord;
use tracing::debug;

use super::{Annotation, CsvRecord, FieldDescriptor, HeaderIndex, SemanticType};
use crate::convert::{assign_cell, CellError, Setter};
use crate::error::{Error, Result};

/// One field bound to one header column.
pub struct PlanEntry<T> {
    field: &'static str,
    column: &'static str,
    column_index: usize,
    required: bool,
    semantic_type: SemanticType,
    setter: Setter<T>,
}

impl<T> PlanEntry<T> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn semantic_type(&self) -> &SemanticType {
        &self.semantic_type
    }
}

impl<T> fmt::Debug for PlanEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanEntry")
            .field("field", &self.field)
            .field("column", &self.column)
            .field("column_index", &self.column_index)
            .field("required", &self.required)
            .field("semantic_type", &self.semantic_type)
            .finish()
    }
}

/// Immutable field -> column bindings for one record type against one
/// header layout. `Send + Sync`, so it can be built once and shared.
pub struct FieldPlan<T> {
    entries: Vec<PlanEntry<T>>,
    omitted: Vec<&'static str>,
}

impl<T: CsvRecord> FieldPlan<T> {
    /// Analyze `T`'s field descriptors against `headers`.
    pub fn build(headers: &HeaderIndex) -> Result<Self> {
        Self::from_descriptors(T::fields(), headers)
    }

    /// Fill a fresh `T` from one tokenized row. `row` is the 1-based data
    /// row number used in diagnostics.
    pub(crate) fn materialize(&self, record: &StringRecord, row: u64) -> Result<T> {
        let mut out = T::default();
        for entry in &self.entries {
            let raw = record.get(entry.column_index);
            assign_cell(&mut out, &entry.setter, raw, entry.required).map_err(|err| match err {
                CellError::Missing => Error::MissingValue {
                    field: entry.field,
                    column: entry.column,
                    row,
                },
                CellError::Invalid(source) => Error::TypeMismatch {
                    field: entry.field,
                    column: entry.column,
                    row,
                    source,
                },
            })?;
        }
        Ok(out)
    }
}

impl<T> FieldPlan<T> {
    /// Analyze an explicit descriptor list against `headers`.
    ///
    /// Fails on the first unannotated field, unsupported type, or required
    /// column absent from the header. Optional fields whose column is
    /// absent are left out of the plan.
    pub fn from_descriptors(
        fields: Vec<FieldDescriptor<T>>,
        headers: &HeaderIndex,
    ) -> Result<Self> {
        let mut entries = Vec::with_capacity(fields.len());
        let mut omitted = Vec::new();

        for descriptor in fields {
            let (field, tag, semantic_type, setter) = descriptor.into_parts();

            let tag = tag.ok_or(Error::MissingAnnotation { field })?;
            if !semantic_type.is_supported() {
                return Err(Error::UnsupportedType {
                    field,
                    type_name: semantic_type.to_string(),
                });
            }

            let Annotation { column, required } = Annotation::parse(tag);
            if column.is_empty() {
                return Err(Error::EmptyColumnName { field, tag });
            }

            match headers.position(column) {
                Some(column_index) => entries.push(PlanEntry {
                    field,
                    column,
                    column_index,
                    required,
                    semantic_type,
                    setter,
                }),
                None if required => return Err(Error::MissingColumn { column, field }),
                None => {
                    debug!(field, column, "optional column absent, field omitted");
                    omitted.push(field);
                }
            }
        }

        debug!(
            entries = entries.len(),
            omitted = omitted.len(),
            header_width = headers.width(),
            "built field plan"
        );
        Ok(Self { entries, omitted })
    }

    pub fn entries(&self) -> &[PlanEntry<T>] {
        &self.entries
    }

    /// Fields left out because their optional column was absent.
    pub fn omitted(&self) -> &[&'static str] {
        &self.omitted
    }

    /// Check that every bound column sits at the same position in
    /// `headers`, so this plan can drive another stream.
    pub fn check_headers(&self, headers: &HeaderIndex) -> Result<()> {
        for entry in &self.entries {
            let found = headers.position(entry.column);
            if found != Some(entry.column_index) {
                return Err(Error::PlanMismatch {
                    column: entry.column,
                    expected: entry.column_index,
                    found,
                });
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for FieldPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPlan")
            .field("entries", &self.entries)
            .field("omitted", &self.omitted)
            .finish()
    }
}
