//! Map CSV rows onto annotated record types.
//!
//! A record type lists its fields with a `csv` tag each (`column` or
//! `column,required`), usually through [`csv_record!`]. A [`CsvIterator`]
//! reads the header once, binds every field to its column by name, and
//! then coerces one row per step into a fresh record: integers, floats,
//! booleans, text, `Option<T>` for nullable cells, and date-times in nine
//! fixed formats.
//!
//! ```
//! use csvmap::{csv_record, CsvIterator, Outcome};
//!
//! csv_record! {
//!     #[derive(Debug, Default)]
//!     struct Person {
//!         #[csv("name,required")]
//!         name: String,
//!         #[csv("age")]
//!         age: i32,
//!     }
//! }
//!
//! let data = "name,age\nJohn Doe,30\n";
//! let mut it: CsvIterator<Person, _> = CsvIterator::from_reader(data.as_bytes()).unwrap();
//! while let Outcome::Record(person) = it.next_record() {
//!     println!("{} is {}", person.name, person.age);
//! }
//! ```

pub mod convert;
pub mod error;
pub mod fetch;
pub mod iter;
mod macros;
pub mod options;
pub mod schema;

use std::{fs::File, io::Read, path::Path};

use reqwest::blocking::Response;

pub use convert::{CoerceError, DateFormat, FromCell};
pub use error::{Error, ErrorKind, Result};
pub use iter::{CsvIterator, Outcome, State};
pub use options::CsvOptions;
pub use schema::{CsvRecord, FieldDescriptor, FieldPlan, HeaderIndex, SemanticType};

/// Iterate `T` records from any byte stream.
pub fn from_reader<T: CsvRecord, R: Read>(reader: R) -> Result<CsvIterator<T, R>> {
    CsvIterator::from_reader(reader)
}

/// Iterate `T` records from a local file.
pub fn from_file<T: CsvRecord>(path: impl AsRef<Path>) -> Result<CsvIterator<T, File>> {
    CsvIterator::from_file(path)
}

/// Iterate `T` records from an HTTP(S) resource.
pub fn from_url<T: CsvRecord>(url: &str) -> Result<CsvIterator<T, Response>> {
    CsvIterator::from_url(url)
}
