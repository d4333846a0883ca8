use std::env;

use crate::error::{Error, Result};

/// Tokenizer settings. The first row is always the header and rows may
/// be ragged, regardless of these options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field separator. Defaults to `,`.
    pub delimiter: u8,
    /// Quote character. Defaults to `"`.
    pub quote: u8,
    /// Whether `""` inside a quoted field is an escaped quote.
    pub double_quote: bool,
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
            comment: None,
        }
    }
}

impl CsvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn double_quote(mut self, yes: bool) -> Self {
        self.double_quote = yes;
        self
    }

    pub fn comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Read `CSVMAP_DELIMITER`, `CSVMAP_QUOTE` and `CSVMAP_COMMENT`, each a
    /// single ASCII character (`\t` is accepted for tab). Unset variables
    /// keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();
        if let Some(raw) = lookup("CSVMAP_DELIMITER") {
            options.delimiter = parse_byte("CSVMAP_DELIMITER", &raw)?;
        }
        if let Some(raw) = lookup("CSVMAP_QUOTE") {
            options.quote = parse_byte("CSVMAP_QUOTE", &raw)?;
        }
        if let Some(raw) = lookup("CSVMAP_COMMENT") {
            options.comment = Some(parse_byte("CSVMAP_COMMENT", &raw)?);
        }
        Ok(options)
    }

    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true) // ragged rows are tolerated
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .comment(self.comment);
        builder
    }
}

fn parse_byte(name: &'static str, raw: &str) -> Result<u8> {
    match raw {
        "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(Error::InvalidOption {
            name,
            value: raw.to_string(),
        }),
    }
}
