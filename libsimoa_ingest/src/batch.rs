use fxhash::FxHashMap;
use time::Date;

use super::plate::{partition_plates, Plate};
use super::sample_row::SampleRow;

/// One named processing run, spanning one or more plates.
///
/// The date, lot, QC set and standards set are carried for downstream
/// analysis but are not yet computed here; QC-lot validation and
/// calibration-curve math live upstream and are unimplemented. Those fields
/// stay None until that work lands, and downstream code must handle the
/// absence explicitly.
#[derive(Debug, Clone)]
pub struct Batch {
    pub name: String,
    pub date: Option<Date>,
    pub lot: Option<String>,
    pub qcs: Option<Vec<SampleRow>>,
    pub standards: Option<Vec<SampleRow>>,
    /// Maximum fg/ml concentration over the batch, None when every row lacks one
    pub highest_value: Option<f64>,
    pub plates: Vec<Plate>,
}

impl Batch {
    /// Build a batch from its exclusive row subset.
    ///
    /// Derived fields are computed first, then the rows are moved into
    /// per-plate groups; after construction the rows live exactly once,
    /// inside the plates.
    pub fn new(name: impl Into<String>, rows: Vec<SampleRow>) -> Self {
        let name = name.into();
        let highest_value = rows
            .iter()
            .filter_map(|row| row.concentration_fg_ml)
            .fold(None, |max: Option<f64>, value| {
                Some(match max {
                    Some(current) => current.max(value),
                    None => value,
                })
            });
        let plates = partition_plates(&name, rows);
        Batch {
            name,
            date: None,
            lot: None,
            qcs: None,
            standards: None,
            highest_value,
            plates,
        }
    }

    /// All rows in the batch, in plate order.
    pub fn rows(&self) -> impl Iterator<Item = &SampleRow> {
        self.plates.iter().flat_map(|plate| plate.rows().iter())
    }

    pub fn well_count(&self) -> usize {
        self.plates.iter().map(Plate::well_count).sum()
    }

    pub fn set_lot(&mut self, lot: impl Into<String>) {
        self.lot = Some(lot.into());
    }
}

/// Group normalized rows into one Batch per distinct batch name.
///
/// A single pass in first-seen order (reproducible across runs, not
/// hash-order); rows are moved, never copied, so each row belongs to exactly
/// one batch and mutations can never leak between siblings.
pub fn partition_batches(rows: Vec<SampleRow>) -> Vec<Batch> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: FxHashMap<String, Vec<SampleRow>> = FxHashMap::default();
    for row in rows {
        match groups.get_mut(&row.batch_name) {
            Some(group) => group.push(row),
            None => {
                order.push(row.batch_name.clone());
                groups.insert(row.batch_name.clone(), vec![row]);
            }
        }
    }
    order
        .into_iter()
        .map(|name| {
            let rows = groups.remove(&name).unwrap();
            Batch::new(name, rows)
        })
        .collect()
}
