//! CSV readers
//!
//! Row numbers in parse errors count data rows from 0, header excluded;
//! column numbers count from 0 at the leftmost column.

use crate::error::Result;
use irt_core::{load_items, Error, ItemSet, RawItemRow, ResponseMatrix, ResponsePattern};
use std::io::Read;
use tracing::{debug, instrument};

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("na")
}

/// Read a ragged threshold table: item id, then one column per threshold
///
/// Items with fewer thresholds leave their trailing cells blank.
#[instrument(skip_all)]
pub fn read_item_parameters<R: Read>(input: R) -> Result<ItemSet> {
    let mut rdr = reader(input);
    let mut rows = Vec::new();
    for (r, record) in rdr.records().enumerate() {
        let record = record?;
        let id = record.get(0).unwrap_or_default().to_string();
        let cells = record
            .iter()
            .enumerate()
            .skip(1)
            .map(|(c, cell)| {
                if is_missing(cell) {
                    Ok(None)
                } else {
                    cell.parse::<f64>()
                        .map(Some)
                        .map_err(|e| Error::parse(r, c, format!("invalid threshold {cell:?}: {e}")))
                }
            })
            .collect::<std::result::Result<Vec<_>, Error>>()?;
        rows.push(RawItemRow::new(id, cells));
    }
    let items = load_items(&rows)?;
    debug!(n_items = items.len(), max_score = items.max_score(), "item parameters loaded");
    Ok(items)
}

/// Read responses whose header names the items
///
/// Cells hold a category index, or are blank or `NA` for a missing response.
/// Items absent from the header are missing for everyone.
#[instrument(skip_all, fields(n_items = items.len()))]
pub fn read_responses<R: Read>(input: R, items: &ItemSet) -> Result<ResponseMatrix> {
    let mut rdr = reader(input);
    let header = rdr.headers()?.clone();
    let positions = header
        .iter()
        .map(|id| {
            items
                .position(id)
                .ok_or_else(|| Error::UnknownItem(id.to_string()))
        })
        .collect::<std::result::Result<Vec<_>, Error>>()?;

    let mut rows = Vec::new();
    for (r, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() != positions.len() {
            return Err(Error::parse(
                r,
                record.len().min(positions.len()),
                format!("expected {} cells, found {}", positions.len(), record.len()),
            )
            .into());
        }
        let mut responses = vec![None; items.len()];
        for (c, (cell, &pos)) in record.iter().zip(&positions).enumerate() {
            if is_missing(cell) {
                continue;
            }
            let category = cell
                .parse::<usize>()
                .map_err(|e| Error::parse(r, c, format!("invalid category {cell:?}: {e}")))?;
            responses[pos] = Some(category);
        }
        rows.push(ResponsePattern::new(items, responses)?);
    }
    debug!(n_rows = rows.len(), "responses loaded");
    Ok(ResponseMatrix::new(rows))
}
