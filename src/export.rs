use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{LotteryError, Result};
use crate::types::CanonicalTable;

/// Writes the table as semicolon-separated CSV with a header row.
pub fn write_csv<W: Write>(table: &CanonicalTable, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    wtr.write_record(table.columns())?;

    for draw in table {
        let mut record = Vec::with_capacity(table.columns().len());
        record.push(draw.date.format("%Y-%m-%d").to_string());
        record.extend(draw.numbers().map(|n| n.to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `<dir>/<game>.csv`. The directory must already exist.
pub fn export(table: &CanonicalTable, dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(LotteryError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("export directory '{}' does not exist", dir.display()),
        )));
    }

    let path = dir.join(format!("{}.csv", table.game().slug()));
    let file = std::fs::File::create(&path)?;
    write_csv(table, io::BufWriter::new(file))?;
    info!(path = %path.display(), draws = table.len(), "exported draws");
    Ok(path)
}
