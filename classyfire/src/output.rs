//! Result output
//!
//! Pretty JSON to stdout or a file; a `.gz` file name compresses the output.

use crate::models::Classification;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write `value` as pretty JSON to `path`, or to stdout when `None`
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: Option<&Path>) -> io::Result<()> {
    match path {
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)
        }
        Some(path) if is_gzip(path) => {
            let mut encoder =
                GzEncoder::new(BufWriter::new(File::create(path)?), Compression::default());
            serde_json::to_writer_pretty(&mut encoder, value)?;
            encoder.finish()?.flush()
        }
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
            out.flush()
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// One-line summary: `<label>\t<kingdom> > ... > <direct parent>`
///
/// Classified results are labelled with their InChIKey.
pub fn short_summary(label: &str, classification: &Classification) -> String {
    match classification.compound() {
        None => format!("{}\t(empty classification)", label),
        Some(compound) => {
            let path = compound
                .levels()
                .iter()
                .map(|node| node.name.as_str())
                .collect::<Vec<_>>()
                .join(" > ");
            format!("{}\t{}", compound.inchikey, path)
        }
    }
}
