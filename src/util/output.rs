use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Returns true if the path ends in ".gz"
pub fn is_gzipped(filename: &Path) -> bool {
    filename.extension().unwrap_or_default() == "gz"
}

/// Picks the delimiter for a table based on the extension, ignoring any trailing ".gz".
/// Anything ending in ".csv" is comma-delimited, everything else is tab-delimited.
pub fn table_delimiter(filename: &Path) -> u8 {
    let base = if is_gzipped(filename) {
        filename.file_stem().map(Path::new).unwrap_or(filename)
    } else {
        filename
    };
    if base.extension().unwrap_or_default() == "csv" {
        b','
    } else {
        b'\t'
    }
}

/// Opens a buffered output file, compressing on the fly if the filename ends in ".gz".
/// # Arguments
/// * `filename` - the path to create
/// # Errors
/// * if the file cannot be created
pub fn open_output(filename: &Path) -> anyhow::Result<Box<dyn Write>> {
    let file = File::create(filename)
        .with_context(|| format!("Error while creating {filename:?}:"))?;
    let writer: Box<dyn Write> = if is_gzipped(filename) {
        Box::new(BufWriter::new(
            flate2::write::GzEncoder::new(file, flate2::Compression::default())
        ))
    } else {
        Box::new(BufWriter::new(file))
    };
    Ok(writer)
}

/// This will save a generic serializable struct to pretty JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> anyhow::Result<()> {
    let mut writer = open_output(out_filename)?;
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Error while serializing {out_filename:?}:"))?;
    writer.flush()
        .with_context(|| format!("Error while flushing output to {out_filename:?}:"))?;
    Ok(())
}
