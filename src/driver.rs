//! Main entry point: validate the arguments, collect, and report.

use crate::attribute::Attribute;
use crate::collector::Collector;
use crate::errors::{Result, invalid_folder};
use crate::reporter::Reporter;
use log::info;
use std::path::{Path, PathBuf};

/// What to calculate?
pub struct DriverArgs<'a> {
    /// Folder with the `.json` record files.
    pub folder: &'a Path,

    /// Name of the attribute to tally, e.g. `genre`.
    pub attribute: &'a str,

    /// Folder where the report is written.
    pub out_dir: &'a Path,

    /// Worker pool size; 0 means one thread per CPU.
    pub threads: usize,
}

pub fn validate_folder(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(invalid_folder(format!(
            "folder {} does not exist",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(invalid_folder(format!(
            "folder {} is not a directory",
            dir.display()
        )));
    }
    Ok(())
}

/// Collect statistics and write the report.
///
/// Returns the location of the report.
pub fn run(args: &DriverArgs) -> Result<PathBuf> {
    validate_folder(args.folder)?;
    let attribute: Attribute = args.attribute.parse()?;
    info!(target: "gamestats", "collecting stats...");
    let table = Collector::new(args.threads).collect(args.folder, attribute)?;
    Reporter::new(args.out_dir).report(&table, attribute)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::InvalidFolder;

    #[test]
    fn missing_folder() {
        let e = validate_folder(Path::new("no/such/folder")).unwrap_err();
        assert!(e.downcast_ref::<InvalidFolder>().is_some());
        assert_eq!(
            e.to_string(),
            "invalid folder: folder no/such/folder does not exist"
        );
    }

    #[test]
    fn file_is_not_a_folder() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let e = validate_folder(file.path()).unwrap_err();
        assert!(e.to_string().ends_with("is not a directory"));
    }

    #[test]
    fn existing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_folder(dir.path()).is_ok());
    }
}
