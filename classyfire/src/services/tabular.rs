//! Tabular batch adapter
//!
//! Classifies the identifier cells of delimited rows. All designated cells
//! of all rows go through one orchestrator batch, so a value repeated across
//! rows or columns is fetched once and the retry pass covers the whole table.

use crate::error::{ClassyFireError, Result};
use crate::models::{is_valid_inchikey, Classification, FailurePolicy, Identifier, IdentifierKind};
use crate::services::batch::BatchOrchestrator;
use async_stream::stream;
use futures::{pin_mut, Stream, StreamExt};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, warn};

/// One input row: column name → raw cell
pub type Row = IndexMap<String, String>;

/// One output row: column name → classification
pub type ClassifiedRow = IndexMap<String, Classification>;

/// Which cells hold identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Cells that validate as InChIKeys, plus non-empty cells of columns
    /// whose name contains "smiles"
    #[default]
    Auto,
    /// Explicit InChIKey and SMILES columns
    Designated {
        inchikey: Vec<String>,
        smiles: Vec<String>,
    },
}

impl ColumnSelection {
    pub fn designated(inchikey: Vec<String>, smiles: Vec<String>) -> Self {
        if inchikey.is_empty() && smiles.is_empty() {
            ColumnSelection::Auto
        } else {
            ColumnSelection::Designated { inchikey, smiles }
        }
    }

    /// Identifiers of `row`, in column order
    ///
    /// Empty cells are skipped. A designated cell that fails validation is an
    /// error, so nothing is fetched for a table with bad input.
    fn plan(&self, row: &Row) -> Result<Vec<(String, Identifier)>> {
        let mut cells = Vec::new();

        for (column, raw) in row {
            if raw.trim().is_empty() {
                continue;
            }

            let kind = match self {
                ColumnSelection::Auto => {
                    if is_valid_inchikey(raw) {
                        Some(IdentifierKind::InchiKey)
                    } else if column.to_ascii_lowercase().contains("smiles") {
                        Some(IdentifierKind::Smiles)
                    } else {
                        None
                    }
                }
                ColumnSelection::Designated { inchikey, smiles } => {
                    if inchikey.contains(column) {
                        Some(IdentifierKind::InchiKey)
                    } else if smiles.contains(column) {
                        Some(IdentifierKind::Smiles)
                    } else {
                        None
                    }
                }
            };

            if let Some(kind) = kind {
                cells.push((column.clone(), Identifier::parse(raw, kind)?));
            }
        }

        Ok(cells)
    }
}

/// Read a delimited file into rows
///
/// Without a header, columns are named by position ("0", "1", ...).
pub fn read_delimited(path: &Path, delimiter: u8, has_header: bool) -> Result<Vec<Row>> {
    let tabular_error =
        |e: csv::Error| ClassyFireError::Tabular(format!("{}: {}", path.display(), e));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .flexible(true)
        .from_path(path)
        .map_err(tabular_error)?;

    let headers: Vec<String> = if has_header {
        reader
            .headers()
            .map_err(tabular_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(tabular_error)?;
        let row: Row = record
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let column = headers.get(idx).cloned().unwrap_or_else(|| idx.to_string());
                (column, cell.to_string())
            })
            .collect();
        rows.push(row);
    }

    debug!(path = %path.display(), rows = rows.len(), "Loaded tabular input");
    Ok(rows)
}

/// Delimiter implied by a file extension, if any
pub fn delimiter_for_path(path: &Path) -> Option<u8> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some(b'\t'),
        Some(ext) if ext.eq_ignore_ascii_case("ssv") => Some(b' '),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(b','),
        _ => None,
    }
}

impl BatchOrchestrator {
    /// Classify the identifier cells of `rows`, yielding rows in input order
    ///
    /// Under `FailurePolicy::Skip` a cell whose request failed is left out of
    /// its row.
    pub fn classify_rows(
        &self,
        rows: Vec<Row>,
        selection: ColumnSelection,
    ) -> impl Stream<Item = Result<ClassifiedRow>> + '_ {
        stream! {
            let plans = match rows
                .iter()
                .map(|row| selection.plan(row))
                .collect::<Result<Vec<_>>>()
            {
                Ok(plans) => plans,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let identifiers: Vec<Identifier> = plans
                .iter()
                .flatten()
                .map(|(_, identifier)| identifier.clone())
                .collect();

            let results = self.classify_many(identifiers);
            pin_mut!(results);

            for plan in plans {
                let mut classified = ClassifiedRow::with_capacity(plan.len());

                for (column, identifier) in plan {
                    match results.next().await {
                        Some(Ok(classification)) => {
                            classified.insert(column, classification);
                        }
                        Some(Err(e))
                            if e.is_request_failure()
                                && self.failure_policy() == FailurePolicy::Skip =>
                        {
                            warn!(
                                column = %column,
                                identifier = %identifier,
                                error = %e,
                                "Cell left unclassified"
                            );
                        }
                        Some(Err(e)) => {
                            yield Err(e);
                            return;
                        }
                        None => {
                            yield Err(ClassyFireError::Storage(format!(
                                "batch ended before '{}' was classified",
                                identifier
                            )));
                            return;
                        }
                    }
                }

                yield Ok(classified);
            }
        }
    }

    /// Read a delimited file and classify its rows
    pub fn classify_delimited(
        &self,
        path: &Path,
        delimiter: u8,
        has_header: bool,
        selection: ColumnSelection,
    ) -> Result<impl Stream<Item = Result<ClassifiedRow>> + '_> {
        let rows = read_delimited(path, delimiter, has_header)?;
        Ok(self.classify_rows(rows, selection))
    }
}
