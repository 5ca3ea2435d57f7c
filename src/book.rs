// Record module: the `Book` data carrier and its on-disk line format.
// One record is one text line of six `|`-separated fields; see
// `to_line`/`from_line` for the escaping rules.

use std::fmt;
use thiserror::Error;

/// Field separator used in the backing file.
pub const DELIMITER: char = '|';

/// Why a record line could not be turned into a `Book`.
///
/// The two cases are handled differently by the store: a wrong field
/// count is tolerated (the line is skipped), a non-numeric id or year
/// is surfaced to the caller.
#[derive(Debug, Error)]
pub enum ParseLineError {
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid {field}: '{value}' is not a number")]
    Number { field: &'static str, value: String },
}

/// One catalog entry. The id is assigned by the store when the book is
/// added and never changes afterwards; every other field is editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    id: u32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
    pub category: String,
}

impl Book {
    pub fn new(
        id: u32,
        title: String,
        author: String,
        isbn: String,
        year: i32,
        category: String,
    ) -> Self {
        Book {
            id,
            title,
            author,
            isbn,
            year,
            category,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Serialize to a single backing-file line (no trailing newline).
    ///
    /// Text fields are escaped so a value containing the delimiter, a
    /// backslash or a newline survives a reload. A value containing
    /// none of these serializes to the plain unescaped form, so files
    /// written by older tools load unchanged.
    pub fn to_line(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
            self.id,
            escape_field(&self.title),
            escape_field(&self.author),
            escape_field(&self.isbn),
            self.year,
            escape_field(&self.category),
            d = DELIMITER,
        )
    }

    /// Parse one backing-file line.
    pub fn from_line(line: &str) -> Result<Self, ParseLineError> {
        let fields: [String; 6] = split_line(line)
            .try_into()
            .map_err(|v: Vec<String>| ParseLineError::FieldCount(v.len()))?;
        let [id, title, author, isbn, year, category] = fields;

        let id = id.parse().map_err(|_| ParseLineError::Number {
            field: "id",
            value: id.clone(),
        })?;
        let year = year.parse().map_err(|_| ParseLineError::Number {
            field: "year",
            value: year.clone(),
        })?;

        Ok(Book {
            id,
            title,
            author,
            isbn,
            year,
            category,
        })
    }
}

/// Human-readable multi-line block, as shown by View All and Search.
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "Book ID      : {}", self.id)?;
        writeln!(f, "Title        : {}", self.title)?;
        writeln!(f, "Author       : {}", self.author)?;
        writeln!(f, "ISBN         : {}", self.isbn)?;
        writeln!(f, "Year         : {}", self.year)?;
        writeln!(f, "Category     : {}", self.category)?;
        write!(f, "{}", "=".repeat(60))
    }
}

fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            DELIMITER => {
                out.push('\\');
                out.push(DELIMITER);
            }
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Split a line on unescaped delimiters, resolving escape sequences.
/// A dangling or unknown escape is kept literally rather than rejected.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\\') => cur.push('\\'),
                Some(DELIMITER) => cur.push(DELIMITER),
                Some('n') => cur.push('\n'),
                Some(other) => {
                    cur.push('\\');
                    cur.push(other);
                }
                None => cur.push('\\'),
            },
            DELIMITER => fields.push(std::mem::take(&mut cur)),
            c => cur.push(c),
        }
    }
    fields.push(cur);
    fields
}
