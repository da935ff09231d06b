//! Writing the statistics as an XML report.

use crate::attribute::Attribute;
use crate::errors::{ReportCreation, ReportWrite, Result};
use crate::tally::TallyTable;
use log::info;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct Reporter {
    out_dir: PathBuf,
}

impl Reporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Reporter {
        Reporter {
            out_dir: out_dir.into(),
        }
    }

    /// Where the report for `attribute` goes.
    pub fn path_for(&self, attribute: Attribute) -> PathBuf {
        self.out_dir.join(format!("statistics_by_{attribute}.xml"))
    }

    /// Write `table` as the report for `attribute`, replacing any earlier
    /// report for the same attribute.
    pub fn report(&self, table: &TallyTable, attribute: Attribute) -> Result<PathBuf> {
        let path = self.path_for(attribute);
        let file = create(&path).map_err(|source| ReportCreation {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        write_statistics(&mut writer, table)
            .and_then(|()| writer.flush())
            .map_err(|source| ReportWrite {
                path: path.clone(),
                source,
            })?;
        info!(target: "gamestats", "wrote {} items to {}", table.len(), path.display());
        Ok(path)
    }
}

fn create(path: &Path) -> io::Result<File> {
    match fs::remove_file(path) {
        Ok(()) => (),
        Err(e) if e.kind() == io::ErrorKind::NotFound => (),
        Err(e) => return Err(e),
    }
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// Items are written in order of value.
pub fn write_statistics<W: Write>(writer: &mut W, table: &TallyTable) -> io::Result<()> {
    writeln!(writer, "<statistics>")?;
    for (value, count) in table.sorted() {
        writeln!(writer, "    <item>")?;
        writeln!(writer, "        <value>{}</value>", escape_xml(&value))?;
        writeln!(writer, "        <count>{count}</count>")?;
        writeln!(writer, "    </item>")?;
    }
    write!(writer, "</statistics>")?;
    Ok(())
}

/// Characters that XML 1.0 does not allow, not even as references, are dropped.
fn escape_xml(text: &str) -> String {
    text.chars()
        .filter(|&c| allowed_in_xml(c))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn allowed_in_xml(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}')
        || c >= '\u{10000}'
}
