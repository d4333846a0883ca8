//! Row materialization: pulls one row at a time from the tokenizer and
//! turns it into a record through the field plan.

use std::{io::Read, iter::FusedIterator, sync::Arc};

use csv::StringRecord;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::options::CsvOptions;
use crate::schema::{CsvRecord, FieldPlan, HeaderIndex};

/// Result of one step. End-of-data is its own variant rather than an error.
#[derive(Debug)]
pub enum Outcome<T> {
    Record(T),
    EndOfData,
    Error(Error),
}

impl<T> Outcome<T> {
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, Outcome::EndOfData)
    }

    /// `Ok(None)` at end-of-data.
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Outcome::Record(record) => Ok(Some(record)),
            Outcome::EndOfData => Ok(None),
            Outcome::Error(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed, no row read yet.
    Ready,
    /// At least one record returned.
    Emitting,
    /// Tokenizer reported end-of-data.
    Exhausted,
    /// A row or tokenizer error occurred; the iterator must not be reused.
    Failed,
    /// The underlying stream has been released.
    Closed,
}

impl State {
    fn as_str(&self) -> &'static str {
        match self {
            State::Ready => "ready",
            State::Emitting => "emitting",
            State::Exhausted => "exhausted",
            State::Failed => "failed",
            State::Closed => "closed",
        }
    }
}

/// Lazily maps the rows of a CSV stream onto `T`.
///
/// The header row is read and the field plan built at construction; each
/// call to [`CsvIterator::next_record`] then reads exactly one row.
pub struct CsvIterator<T, R> {
    reader: Option<csv::Reader<R>>,
    headers: Vec<String>,
    plan: Arc<FieldPlan<T>>,
    row: StringRecord,
    rows_read: u64,
    state: State,
}

impl<T: CsvRecord, R: Read> CsvIterator<T, R> {
    /// Read from any byte stream with default options.
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, &CsvOptions::default())
    }

    pub fn from_reader_with_options(reader: R, options: &CsvOptions) -> Result<Self> {
        let mut rdr = options.reader_builder().from_reader(reader);
        let headers = read_headers(&mut rdr)?;
        let plan = FieldPlan::build(&HeaderIndex::new(&headers))?;
        Ok(Self::assemble(rdr, headers, Arc::new(plan)))
    }

    /// Reuse a plan built for an earlier stream. The new header must put
    /// every bound column at the same position.
    pub fn with_plan(reader: R, plan: Arc<FieldPlan<T>>, options: &CsvOptions) -> Result<Self> {
        let mut rdr = options.reader_builder().from_reader(reader);
        let headers = read_headers(&mut rdr)?;
        plan.check_headers(&HeaderIndex::new(&headers))?;
        Ok(Self::assemble(rdr, headers, plan))
    }

    fn assemble(reader: csv::Reader<R>, headers: Vec<String>, plan: Arc<FieldPlan<T>>) -> Self {
        Self {
            reader: Some(reader),
            headers,
            plan,
            row: StringRecord::new(),
            rows_read: 0,
            state: State::Ready,
        }
    }

    /// Read and map the next row.
    pub fn next_record(&mut self) -> Outcome<T> {
        match self.state {
            State::Exhausted => return Outcome::EndOfData,
            State::Failed | State::Closed => {
                return Outcome::Error(Error::InvalidState {
                    state: self.state.as_str(),
                })
            }
            State::Ready | State::Emitting => {}
        }
        let Some(reader) = self.reader.as_mut() else {
            return Outcome::Error(Error::InvalidState {
                state: State::Closed.as_str(),
            });
        };

        match reader.read_record(&mut self.row) {
            Ok(false) => {
                debug!(rows = self.rows_read, "end of data");
                self.state = State::Exhausted;
                Outcome::EndOfData
            }
            Ok(true) => {
                self.rows_read += 1;
                match self.plan.materialize(&self.row, self.rows_read) {
                    Ok(record) => {
                        trace!(row = self.rows_read, "materialized row");
                        self.state = State::Emitting;
                        Outcome::Record(record)
                    }
                    Err(err) => self.fail(err),
                }
            }
            Err(err) => self.fail(Error::Csv(err)),
        }
    }

    fn fail(&mut self, err: Error) -> Outcome<T> {
        warn!(row = self.rows_read, error = %err, "row failed, iterator stopped");
        self.state = State::Failed;
        Outcome::Error(err)
    }

    /// Feed every row to `callback` until it returns `false`, the data
    /// runs out, or an error has been delivered.
    pub fn for_each_row<F>(&mut self, mut callback: F)
    where
        F: FnMut(Result<T>) -> bool,
    {
        loop {
            let item = match self.next_record() {
                Outcome::EndOfData => break,
                Outcome::Record(record) => Ok(record),
                Outcome::Error(err) => Err(err),
            };
            let failed = item.is_err();
            if !callback(item) || failed {
                break;
            }
        }
    }

    /// Collect all remaining rows. Any error discards what was collected.
    pub fn to_vec(&mut self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        loop {
            match self.next_record() {
                Outcome::Record(record) => out.push(record),
                Outcome::EndOfData => return Ok(out),
                Outcome::Error(err) => return Err(err),
            }
        }
    }
}

impl<T, R> CsvIterator<T, R> {
    /// Header cells exactly as read from the first row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn plan(&self) -> &Arc<FieldPlan<T>> {
        &self.plan
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Data rows pulled from the tokenizer so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Release the underlying stream. Returns `false` if it was already
    /// released.
    pub fn close(&mut self) -> bool {
        self.state = State::Closed;
        match self.reader.take() {
            Some(reader) => {
                drop(reader);
                debug!(rows = self.rows_read, "closed csv source");
                true
            }
            None => false,
        }
    }
}

impl<T: CsvRecord, R: Read> Iterator for CsvIterator<T, R> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if !matches!(self.state, State::Ready | State::Emitting) {
            return None;
        }
        self.next_record().into_result().transpose()
    }
}

impl<T: CsvRecord, R: Read> FusedIterator for CsvIterator<T, R> {}

fn read_headers<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<String>> {
    let mut record = StringRecord::new();
    if !rdr.read_record(&mut record)? {
        return Err(Error::NoHeader);
    }
    Ok(record.iter().map(str::to_string).collect())
}
