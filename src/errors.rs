//! Errors and error-related utilities.

use std::path::PathBuf;
use std::{error, fmt, io, result};

/// An error that can be moved between worker threads.
pub type BoxedError = Box<dyn error::Error + Send + Sync>;

/// The result type used throughout this library.
pub type Result<T> = result::Result<T, BoxedError>;

/// The input folder does not exist or is not a directory.
#[derive(Debug)]
pub struct InvalidFolder(pub String);

/// The attribute is not one of the known attribute names.
#[derive(Debug)]
pub struct InvalidAttribute(pub String);

/// The input folder does not contain any eligible files.
#[derive(Debug)]
pub struct EmptyInput(pub PathBuf);

/// One input file could not be read as a sequence of records.
#[derive(Debug)]
pub struct ParseError {
    pub path: PathBuf,
    pub source: serde_json::Error,
}

/// A worker task failed for some reason other than parsing.
#[derive(Debug)]
pub struct TaskExecutionError(pub String);

/// At least one file failed during collection.
///
/// All files were still processed; `cause` is the error of the first failing
/// file, in path order.
#[derive(Debug)]
pub struct CollectionFailed {
    pub failed: usize,
    pub total: usize,
    pub cause: BoxedError,
}

/// The report file could not be created.
#[derive(Debug)]
pub struct ReportCreation {
    pub path: PathBuf,
    pub source: io::Error,
}

/// The report file could not be written.
#[derive(Debug)]
pub struct ReportWrite {
    pub path: PathBuf,
    pub source: io::Error,
}

impl fmt::Display for InvalidFolder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid folder: {}", self.0)
    }
}

impl fmt::Display for InvalidAttribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid attribute: {}", self.0)
    }
}

impl fmt::Display for EmptyInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "folder {} does not contain any json files",
            self.0.display()
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.path.display(), self.source)
    }
}

impl fmt::Display for TaskExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "task failed: {}", self.0)
    }
}

impl fmt::Display for CollectionFailed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "failed to collect statistics ({} of {} files failed): {}",
            self.failed, self.total, self.cause
        )
    }
}

impl fmt::Display for ReportCreation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not create report {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl fmt::Display for ReportWrite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not write report {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl error::Error for InvalidFolder {}

impl error::Error for InvalidAttribute {}

impl error::Error for EmptyInput {}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.source)
    }
}

impl error::Error for TaskExecutionError {}

impl error::Error for CollectionFailed {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&*self.cause)
    }
}

impl error::Error for ReportCreation {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.source)
    }
}

impl error::Error for ReportWrite {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A helper for constructing [InvalidFolder].
pub fn invalid_folder(s: String) -> BoxedError {
    InvalidFolder(s).into()
}

/// A helper for constructing [InvalidAttribute].
pub fn invalid_attribute(s: String) -> BoxedError {
    InvalidAttribute(s).into()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::error::Error;

    #[test]
    fn collection_failed_exposes_cause() {
        let e = CollectionFailed {
            failed: 1,
            total: 3,
            cause: TaskExecutionError("boom".to_owned()).into(),
        };
        assert_eq!(
            e.to_string(),
            "failed to collect statistics (1 of 3 files failed): task failed: boom"
        );
        let cause = e.source().expect("has a cause");
        assert!(cause.downcast_ref::<TaskExecutionError>().is_some());
    }

    #[test]
    fn empty_input_names_folder() {
        let e = EmptyInput(PathBuf::from("data"));
        assert_eq!(e.to_string(), "folder data does not contain any json files");
    }
}
