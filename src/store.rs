// Store module: owns the in-memory catalog, the backing file path and
// the next-id counter. It is intentionally small and synchronous: the
// file is read once at startup and fully rewritten after mutations,
// never held open across operations.

use crate::book::{Book, ParseLineError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors the store can surface to the caller.
///
/// A missing backing file is not among them: absence means first run
/// and yields an empty catalog. Malformed lines (wrong field count)
/// are skipped during load with a warning, not reported as errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("bad record on line {line}: {source}")]
    Parse { line: usize, source: ParseLineError },

    #[error("record ids are exhausted")]
    IdsExhausted,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// How to look records up; all variants scan the collection in order.
/// Substring matches are case-sensitive containment.
pub enum SearchCriterion {
    ById(u32),
    TitleContains(String),
    AuthorContains(String),
    CategoryContains(String),
}

/// Which field(s) of a record to overwrite.
pub enum EditField {
    Title(String),
    Author(String),
    Isbn(String),
    Year(i32),
    Category(String),
    All {
        title: String,
        author: String,
        isbn: String,
        year: i32,
        category: String,
    },
}

/// What happened to a delete request.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Cancelled,
}

/// The catalog: an ordered collection of books plus persistence.
/// Insertion order is display order; ids ascend and are never reused.
#[derive(Debug)]
pub struct Library {
    books: Vec<Book>,
    next_id: u32,
    path: PathBuf,
}

impl Library {
    /// Load the catalog from `path`. A missing file starts an empty
    /// catalog; lines with the wrong field count are skipped with a
    /// warning; a non-numeric id or year aborts the load so the caller
    /// can report it instead of silently dropping data.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let mut books = Vec::new();
        let mut max_id = 0;

        match fs::read_to_string(&path) {
            Ok(contents) => {
                let mut skipped = 0usize;
                for (index, line) in contents.lines().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    match Book::from_line(line) {
                        Ok(book) => {
                            max_id = max_id.max(book.id());
                            books.push(book);
                        }
                        Err(ParseLineError::FieldCount(n)) => {
                            warn!(line = index + 1, fields = n, "skipping malformed record line");
                            skipped += 1;
                        }
                        Err(source) => {
                            return Err(StoreError::Parse {
                                line: index + 1,
                                source,
                            });
                        }
                    }
                }
                if skipped > 0 {
                    warn!(skipped, "some record lines could not be parsed");
                }
                info!(count = books.len(), path = %path.display(), "loaded catalog");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no previous data found, starting fresh");
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        }

        // A file already holding the maximum id still loads; the
        // exhaustion surfaces on the next add instead of wrapping.
        Ok(Library {
            next_id: max_id.checked_add(1).unwrap_or(u32::MAX),
            books,
            path,
        })
    }

    /// Rewrite the whole backing file from the in-memory collection.
    /// On failure the in-memory state is untouched and stays usable.
    pub fn save(&self) -> StoreResult<()> {
        let mut out = String::new();
        for book in &self.books {
            out.push_str(&book.to_line());
            out.push('\n');
        }
        fs::write(&self.path, out).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Add a new record and return its assigned id. Accepts any field
    /// values, including empty strings; the only failure is running
    /// out of ids, which never reuses or wraps the counter.
    pub fn add(
        &mut self,
        title: String,
        author: String,
        isbn: String,
        year: i32,
        category: String,
    ) -> StoreResult<u32> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        self.books.push(Book::new(id, title, author, isbn, year, category));
        Ok(id)
    }

    /// Matching records in collection order. `ById` yields at most one.
    pub fn find(&self, criterion: &SearchCriterion) -> Vec<&Book> {
        match criterion {
            SearchCriterion::ById(id) => self.get(*id).into_iter().collect(),
            SearchCriterion::TitleContains(term) => self
                .books
                .iter()
                .filter(|b| b.title.contains(term.as_str()))
                .collect(),
            SearchCriterion::AuthorContains(term) => self
                .books
                .iter()
                .filter(|b| b.author.contains(term.as_str()))
                .collect(),
            SearchCriterion::CategoryContains(term) => self
                .books
                .iter()
                .filter(|b| b.category.contains(term.as_str()))
                .collect(),
        }
    }

    /// Look a record up by id (linear scan; ids are unique).
    pub fn get(&self, id: u32) -> Option<&Book> {
        self.books.iter().find(|b| b.id() == id)
    }

    /// Overwrite the requested field(s) of the record with `id`.
    /// Returns `false` (and mutates nothing) when the id is unknown.
    pub fn edit(&mut self, id: u32, field: EditField) -> bool {
        let Some(book) = self.books.iter_mut().find(|b| b.id() == id) else {
            return false;
        };
        match field {
            EditField::Title(title) => book.title = title,
            EditField::Author(author) => book.author = author,
            EditField::Isbn(isbn) => book.isbn = isbn,
            EditField::Year(year) => book.year = year,
            EditField::Category(category) => book.category = category,
            EditField::All {
                title,
                author,
                isbn,
                year,
                category,
            } => {
                book.title = title;
                book.author = author;
                book.isbn = isbn;
                book.year = year;
                book.category = category;
            }
        }
        true
    }

    /// Remove the record with `id` if it exists and `confirmed` is set.
    /// The freed id is never handed out again.
    pub fn delete(&mut self, id: u32, confirmed: bool) -> DeleteOutcome {
        let Some(position) = self.books.iter().position(|b| b.id() == id) else {
            return DeleteOutcome::NotFound;
        };
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }
        self.books.remove(position);
        DeleteOutcome::Deleted
    }

    /// The full collection in stored order; empty is a valid result.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_in(dir: &tempfile::TempDir) -> Library {
        Library::open(dir.path().join("library_data.txt")).unwrap()
    }

    fn add_sample(library: &mut Library, title: &str, author: &str) -> u32 {
        library
            .add(
                title.into(),
                author.into(),
                "isbn".into(),
                2000,
                "General".into(),
            )
            .unwrap()
    }

    #[test]
    fn first_add_on_fresh_store_assigns_id_one() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        assert!(library.is_empty());
        assert_eq!(add_sample(&mut library, "A", "a"), 1);
    }

    #[test]
    fn ids_ascend_and_are_never_reused() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        let first = add_sample(&mut library, "A", "a");
        let second = add_sample(&mut library, "B", "b");
        let third = add_sample(&mut library, "C", "c");
        assert!(first < second && second < third);

        assert_eq!(library.delete(third, true), DeleteOutcome::Deleted);
        let fourth = add_sample(&mut library, "D", "d");
        assert!(fourth > third);
    }

    #[test]
    fn next_id_resumes_from_max_id_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.txt");
        fs::write(&path, "3|A|a|i|2000|G\n7|B|b|i|2001|G\n").unwrap();

        let mut library = Library::open(&path).unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(add_sample(&mut library, "C", "c"), 8);
    }

    #[test]
    fn save_then_open_round_trips_records_and_order() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        add_sample(&mut library, "Zebra", "z");
        add_sample(&mut library, "Apple", "a");
        library
            .add(
                "Pipes | Filters".into(),
                "Kernighan".into(),
                "".into(),
                1984,
                "Unix".into(),
            )
            .unwrap();
        library.save().unwrap();

        let reloaded = Library::open(library.path()).unwrap();
        assert_eq!(reloaded.books(), library.books());
    }

    #[test]
    fn deleting_nonexistent_id_leaves_file_unchanged() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        add_sample(&mut library, "A", "a");
        library.save().unwrap();
        let before = fs::read(library.path()).unwrap();

        assert_eq!(library.delete(99, true), DeleteOutcome::NotFound);
        library.save().unwrap();
        assert_eq!(fs::read(library.path()).unwrap(), before);
    }

    #[test]
    fn declined_confirmation_cancels_delete() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        let id = add_sample(&mut library, "A", "a");

        assert_eq!(library.delete(id, false), DeleteOutcome::Cancelled);
        assert_eq!(library.len(), 1);
        assert!(library.get(id).is_some());
    }

    #[test]
    fn edit_changes_only_the_requested_field() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        let first = add_sample(&mut library, "First", "one");
        let second = add_sample(&mut library, "Second", "two");
        let untouched = library.get(second).unwrap().clone();

        assert!(library.edit(first, EditField::Author("changed".into())));

        let edited = library.get(first).unwrap();
        assert_eq!(edited.author, "changed");
        assert_eq!(edited.title, "First");
        assert_eq!(edited.isbn, "isbn");
        assert_eq!(edited.year, 2000);
        assert_eq!(edited.category, "General");
        assert_eq!(library.get(second).unwrap(), &untouched);
    }

    #[test]
    fn edit_all_overwrites_every_field_but_the_id() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        let id = add_sample(&mut library, "Old", "old");

        assert!(library.edit(
            id,
            EditField::All {
                title: "New".into(),
                author: "new".into(),
                isbn: "999".into(),
                year: 2024,
                category: "Updated".into(),
            },
        ));

        let book = library.get(id).unwrap();
        assert_eq!(book.id(), id);
        assert_eq!(book.title, "New");
        assert_eq!(book.year, 2024);
    }

    #[test]
    fn edit_unknown_id_reports_not_found() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        assert!(!library.edit(42, EditField::Title("x".into())));
    }

    #[test]
    fn substring_search_is_case_sensitive_and_partial() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        add_sample(&mut library, "The Go Programming Language", "Donovan");
        add_sample(&mut library, "Go in Action", "Kennedy");

        let hits = library.find(&SearchCriterion::TitleContains("Go".into()));
        assert_eq!(hits.len(), 2);
        assert!(library
            .find(&SearchCriterion::TitleContains("go".into()))
            .is_empty());
        assert!(library
            .find(&SearchCriterion::TitleContains("python".into()))
            .is_empty());
    }

    #[test]
    fn find_by_id_yields_at_most_one() {
        let dir = tempdir().unwrap();
        let mut library = open_in(&dir);
        let id = add_sample(&mut library, "A", "a");
        add_sample(&mut library, "B", "b");

        let hits = library.find(&SearchCriterion::ById(id));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), id);
        assert!(library.find(&SearchCriterion::ById(999)).is_empty());
    }

    #[test]
    fn malformed_line_is_skipped_but_load_continues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.txt");
        fs::write(&path, "1|Good|Author|isbn|2000|G\nonly|four|fields|here\n").unwrap();

        let library = Library::open(&path).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.books()[0].title, "Good");
    }

    #[test]
    fn malformed_line_is_dropped_on_next_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.txt");
        fs::write(&path, "1|Good|Author|isbn|2000|G\nonly|four|fields|here\n").unwrap();

        let library = Library::open(&path).unwrap();
        library.save().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1|Good|Author|isbn|2000|G\n"
        );
        assert_eq!(Library::open(&path).unwrap().len(), 1);
    }

    #[test]
    fn add_surfaces_id_exhaustion_instead_of_wrapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.txt");
        fs::write(&path, format!("{}|T|A|i|2000|G\n", u32::MAX)).unwrap();

        let mut library = Library::open(&path).unwrap();
        let err = library
            .add("X".into(), "x".into(), "i".into(), 2000, "G".into())
            .unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn non_numeric_id_fails_the_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("library_data.txt");
        fs::write(&path, "abc|T|A|i|2000|G\n").unwrap();

        let err = Library::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { line: 1, .. }));
    }
}
