use fxhash::FxHashMap;

use super::sample_row::SampleRow;
use super::template::Template;

/// One physical 8x12 plate within a batch.
///
/// A Plate owns its rows exclusively; applying a design mutates this plate
/// and nothing else.
#[derive(Debug, Clone)]
pub struct Plate {
    pub batch_name: String,
    pub number: u32,
    rows: Vec<SampleRow>,
}

impl Plate {
    pub fn new(batch_name: impl Into<String>, number: u32, rows: Vec<SampleRow>) -> Self {
        Plate {
            batch_name: batch_name.into(),
            number,
            rows,
        }
    }

    pub fn rows(&self) -> &[SampleRow] {
        &self.rows
    }

    pub fn well_count(&self) -> usize {
        self.rows.len()
    }

    /// Annotate every row with its three experiment-design values.
    ///
    /// The templates are independent: each resolves against its own declared
    /// axis, so a plate may key dilutions by row while feeders and replicates
    /// run along columns.
    pub fn apply_design(
        &mut self,
        dilutions: &Template,
        feeders: &Template,
        replicates: &Template,
    ) {
        for row in &mut self.rows {
            row.dilution = dilutions.value_for(&row.well);
            row.feeders = feeders.value_for(&row.well);
            row.replicate = replicates.value_for(&row.well);
        }
    }
}

/// Group a batch's rows into one Plate per distinct plate number.
///
/// A single pass in first-seen order; rows are moved, never copied, so each
/// row lands in exactly one plate and there is no shared table left behind.
pub fn partition_plates(batch_name: &str, rows: Vec<SampleRow>) -> Vec<Plate> {
    let mut order: Vec<u32> = Vec::new();
    let mut groups: FxHashMap<u32, Vec<SampleRow>> = FxHashMap::default();
    for row in rows {
        let number = row.well.plate;
        match groups.get_mut(&number) {
            Some(group) => group.push(row),
            None => {
                order.push(number);
                groups.insert(number, vec![row]);
            }
        }
    }
    order
        .into_iter()
        .map(|number| {
            let rows = groups.remove(&number).unwrap();
            Plate::new(batch_name, number, rows)
        })
        .collect()
}
