//! CSV writers
//!
//! Undefined standard errors are written as `inf`.

use crate::error::Result;
use irt_core::{Error, ItemSet};
use irt_estimate::{BatchEstimates, ScoringTable, TraitEstimate};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct EstimateRecord {
    person: usize,
    theta: Option<f64>,
    se: Option<f64>,
    status: String,
}

/// Write one `person,theta,se,status` row per estimate
pub fn write_estimates<W: Write>(output: W, estimates: &[TraitEstimate]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(output);
    for (person, e) in estimates.iter().enumerate() {
        wtr.serialize(EstimateRecord {
            person,
            theta: Some(e.theta),
            se: Some(e.se),
            status: e.status.to_string(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Like [`write_estimates`], with failed rows left blank and the failure kind as status
pub fn write_batch_results<W: Write>(output: W, batch: &BatchEstimates) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(output);
    for (person, result) in batch.results().iter().enumerate() {
        let record = match result {
            Ok(e) => EstimateRecord {
                person,
                theta: Some(e.theta),
                se: Some(e.se),
                status: e.status.to_string(),
            },
            Err(err) => EstimateRecord {
                person,
                theta: None,
                se: None,
                status: format!("error:{}", err.kind()),
            },
        };
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ScoringRecord<'a> {
    sum_score: usize,
    theta: f64,
    se: f64,
    status: String,
    expected: &'a [f64],
}

/// Write a scoring table; item detail columns are named after the items
pub fn write_scoring_table<W: Write>(
    output: W,
    items: &ItemSet,
    table: &ScoringTable,
) -> Result<()> {
    let with_detail = table.rows().iter().any(|row| row.item_detail.is_some());
    // The header is written by hand because the detail columns vary
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(output);

    let mut header = vec![
        "sum_score".to_string(),
        "theta".to_string(),
        "se".to_string(),
        "status".to_string(),
    ];
    if with_detail {
        header.extend(items.iter().map(|item| format!("expected_{}", item.id())));
    }
    wtr.write_record(&header)?;

    for row in table.rows() {
        let expected: &[f64] = if with_detail {
            let detail = row.item_detail.as_deref().unwrap_or_default();
            if detail.len() != items.len() {
                return Err(Error::size_mismatch(items.len(), detail.len(), "scoring table item detail").into());
            }
            detail
        } else {
            &[]
        };
        wtr.serialize(ScoringRecord {
            sum_score: row.sum_score,
            theta: row.theta,
            se: row.se,
            status: row.status.to_string(),
            expected,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use irt_core::fixtures::{mixed_length_items, seven_item_pcm};
    use irt_core::{Extreme, ResponsePattern};
    use irt_estimate::{BatchEstimator, EstimateStatus, ScoringTableBuilder, TraitEstimator};

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_estimates_write_inf_for_undefined_se() {
        let estimates = vec![
            TraitEstimate {
                theta: 0.25,
                se: 0.5,
                status: EstimateStatus::Interior,
                iterations: 4,
            },
            TraitEstimate {
                theta: -6.0,
                se: f64::INFINITY,
                status: EstimateStatus::Extreme(Extreme::Minimum),
                iterations: 0,
            },
        ];
        let out = render(|buf| write_estimates(buf, &estimates));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "person,theta,se,status");
        assert_eq!(lines[1], "0,0.25,0.5,interior");
        assert_eq!(lines[2], "1,-6.0,inf,extreme_minimum");
    }

    #[test]
    fn test_batch_results_mark_failures() {
        let items = seven_item_pcm();
        let patterns = vec![
            ResponsePattern::uniform(&items, 2),
            ResponsePattern::new(&items, vec![None; 7]).unwrap(),
        ];
        let batch = BatchEstimator::sequential(TraitEstimator::default()).estimate_all(&items, &patterns);
        let out = render(|buf| write_batch_results(buf, &batch));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with(",interior"));
        assert_eq!(lines[2], "1,,,error:invalid_input");
    }

    #[test]
    fn test_scoring_table_with_detail() {
        let items = mixed_length_items();
        let table = ScoringTableBuilder::new(&items)
            .with_item_detail(true)
            .build()
            .unwrap();
        let out = render(|buf| write_scoring_table(buf, &items, &table));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "sum_score,theta,se,status,expected_short,expected_medium,expected_long"
        );
        assert_eq!(lines.len(), items.max_score() + 2);
        assert!(lines[1].starts_with("0,-6.0,inf,extreme_minimum,"));
        assert_eq!(lines[1].split(',').count(), 7);
    }

    #[test]
    fn test_table_and_estimates_format_numbers_alike() {
        let items = mixed_length_items();
        let table = ScoringTableBuilder::new(&items).build().unwrap();
        let estimates: Vec<TraitEstimate> = table
            .rows()
            .iter()
            .map(|row| TraitEstimate {
                theta: row.theta,
                se: row.se,
                status: row.status,
                iterations: 0,
            })
            .collect();

        let table_csv = render(|buf| write_scoring_table(buf, &items, &table));
        let estimates_csv = render(|buf| write_estimates(buf, &estimates));
        for (t, e) in table_csv.lines().zip(estimates_csv.lines()).skip(1) {
            assert_eq!(t, e);
        }
        assert!(table_csv.lines().last().unwrap().starts_with("7,6.0,inf,extreme_maximum"));
    }

    #[test]
    fn test_scoring_table_without_detail() {
        let items = mixed_length_items();
        let table = ScoringTableBuilder::new(&items).score_range(1..=2).build().unwrap();
        let out = render(|buf| write_scoring_table(buf, &items, &table));
        assert_eq!(out.lines().next(), Some("sum_score,theta,se,status"));
        assert_eq!(out.lines().count(), 3);
    }
}
