/// A parsed `csv` tag: `column_name` or `column_name,required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation {
    pub column: &'static str,
    pub required: bool,
}

impl Annotation {
    /// Parse a raw tag. Parts are trimmed; directives other than
    /// `required` are ignored.
    pub fn parse(tag: &'static str) -> Self {
        let mut parts = tag.split(',');
        let column = parts.next().unwrap_or_default().trim();
        let required = parts.any(|part| part.trim() == "required");
        Self { column, required }
    }
}
