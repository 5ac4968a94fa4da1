//! Source code representation and error management.

use std::{cell::RefCell, fmt, rc::Rc};

/// Path used for sources that do not come from a file.
pub const ANONYMOUS_PATH: &str = "<input>";

/// Represents source code.
pub struct Source<'a> {
    /// Path the source was loaded from.
    pub path: Rc<str>,
    /// Original source code.
    pub content: &'a str,
    /// Byte offsets of the first character of every line.
    line_starts: Vec<usize>,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self::with_path(ANONYMOUS_PATH, content)
    }

    /// Create a new `Source` with the specified `path` and `content`.
    pub fn with_path(path: impl Into<Rc<str>>, content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            path: path.into(),
            content,
            line_starts,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts a byte `offset` into a 1-based line and column.
    /// Columns count characters, so multi-byte characters occupy a single column.
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.content.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        let line_start = self.line_starts[line];
        let col = self
            .content
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());

        Location {
            path: Rc::clone(&self.path),
            line: line as u32 + 1,
            col: col as u32 + 1,
        }
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// A position inside a [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: Rc<str>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub col: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.col)
    }
}

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub location: Location,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message` and `location`.
    pub fn new(message: impl ToString, location: Location) -> Self {
        Self {
            message: message.to_string(),
            location,
        }
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<SyntaxError>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: SyntaxError) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Returns a copy of the accumulated errors in the order they were reported.
    pub fn errors(&self) -> Vec<SyntaxError> {
        self.errors.borrow().clone()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "ERROR: {}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location() {
        let source = Source::with_path("main.bk", "ab\ncd\n\nxé y");
        let loc = source.location(0);
        assert_eq!((loc.line, loc.col), (1, 1));
        let loc = source.location(4);
        assert_eq!((loc.line, loc.col), (2, 2));
        let loc = source.location(6);
        assert_eq!((loc.line, loc.col), (3, 1));
        // `é` is two bytes but one column
        let loc = source.location(11);
        assert_eq!((loc.line, loc.col), (4, 4));
        assert_eq!(loc.to_string(), "main.bk:4:4");
    }

    #[test]
    fn test_location_past_end() {
        let source = Source::new("a\n");
        let loc = source.location(100);
        assert_eq!((loc.line, loc.col), (2, 1));
        assert_eq!(&*loc.path, ANONYMOUS_PATH);
    }

    #[test]
    fn test_error_reporter() {
        let source: Source = "x".into();
        assert!(source.has_no_errors());
        source
            .errors
            .add_error(SyntaxError::new("expected ';'", source.location(1)));
        assert_eq!(source.errors.len(), 1);
        assert_eq!(source.errors.to_string(), "ERROR: <input>:1:2: expected ';'\n");
    }
}
