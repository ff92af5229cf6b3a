use super::batch::{partition_batches, Batch};
use super::config::Config;
use super::error::{ProcessorError, RowError};
use super::export_file::{read_export, RawTable};
use super::sample_row::SampleRow;
use super::template::Template;

/// Normalize a projected raw table into sample rows.
///
/// In strict mode (the default) the first malformed location aborts the pass;
/// it indicates a corrupt export that should be looked at, not partially
/// ingested. With skip_malformed set, bad rows are logged and dropped
/// instead. Non-numeric measurement fields degrade to absent either way.
pub fn normalize_table(
    table: &RawTable,
    skip_malformed: bool,
) -> Result<Vec<SampleRow>, RowError> {
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut dropped: usize = 0;
    for record in &table.rows {
        match SampleRow::from_record(record) {
            Ok(row) => rows.push(row),
            Err(error) if skip_malformed => {
                log::warn!("Dropping malformed sample row: {error}");
                dropped += 1;
            }
            Err(error) => return Err(error),
        }
    }
    if dropped > 0 {
        log::warn!("Dropped {dropped} malformed rows from the export.");
    }
    Ok(rows)
}

/// The main loop of simoa_ingest.
///
/// Takes in a config and runs the full parsing and structuring pipeline on
/// the export it names: read and project, normalize the fields, partition
/// into batches and plates, then apply the experiment design when templates
/// are configured. An unreadable source yields an empty batch list, not an
/// error.
pub fn process_export(config: &Config) -> Result<Vec<Batch>, ProcessorError> {
    log::info!(
        "Reading export {}...",
        config.export_path.to_string_lossy()
    );
    let table = match read_export(&config.export_path, config.header_rows)? {
        Some(table) => table,
        None => {
            log::warn!("No data produced; nothing to structure.");
            return Ok(Vec::new());
        }
    };
    log::info!("Export contains {} sample rows.", table.rows.len());

    let rows = normalize_table(&table, config.skip_malformed_locations)?;
    let batches = partition_batches(rows);
    log::info!("Partitioned {} rows into {} batches.",
        batches.iter().map(Batch::well_count).sum::<usize>(),
        batches.len()
    );

    apply_design_templates(config, batches)
}

/// Load the three design templates named by the config and apply them to
/// every plate. A partially configured design is skipped with a warning
/// rather than half-applied.
fn apply_design_templates(
    config: &Config,
    mut batches: Vec<Batch>,
) -> Result<Vec<Batch>, ProcessorError> {
    if let (Some(dilution_path), Some(feeder_path), Some(replicate_path)) = (
        &config.dilution_template_path,
        &config.feeder_template_path,
        &config.replicate_template_path,
    ) {
        let dilutions = Template::from_file(dilution_path)?;
        let feeders = Template::from_file(feeder_path)?;
        let replicates = Template::from_file(replicate_path)?;
        log::info!("Applying experiment design to every plate...");
        for batch in &mut batches {
            for plate in &mut batch.plates {
                plate.apply_design(&dilutions, &feeders, &replicates);
            }
        }
    } else if config.has_any_design_template() {
        log::warn!(
            "Design templates are incomplete; dilution, feeder and replicate are all required. Skipping design application."
        );
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocationError;
    use crate::sample_row::DesignValue;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn export_contents() -> String {
        let mut contents = String::from(
            "\
Simoa HD-1 Analyzer,,,,,,
Assay Run Export,,,,,,
Instrument SN 1203,,,,,,
Operator,lab,,,,,
,,,,,,
Sample Barcode,Location,Sample Type,Batch Name,AEB,Concentration,Flags
",
        );
        contents.push_str("1,Plate 1 - Well A1,Specimen,Run A,0.007,0.5,\n");
        contents.push_str("2,Plate 1 - Well A7,Specimen,Run A,0.009,1.5,\n");
        contents.push_str("qc1,Plate 2 - Well B1,QC,Run A,0.1,12.0,\n");
        contents.push_str("3,Plate 1 - Well C4,Specimen,Run B,NaN,,Low AEB\n");
        contents
    }

    #[test]
    fn test_process_export_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let export_path = write_file(&dir, "export.csv", &export_contents());
        let dilution_path = write_file(
            &dir,
            "dilutions.yml",
            "axis: Row\nassignments:\n  A: 0.5\n  B: 0.1\n  C: 0.05\n",
        );
        let feeder_path = write_file(
            &dir,
            "feeders.yml",
            "axis: Column\nassignments:\n  1: FeederOne\n  2: FeederOne\n  3: FeederOne\n  4: FeederOne\n  5: FeederOne\n  6: FeederOne\n  7: FeederTwo\n  8: FeederTwo\n  9: FeederTwo\n  10: FeederTwo\n  11: FeederTwo\n  12: FeederTwo\n",
        );
        let replicate_path = write_file(
            &dir,
            "replicates.yml",
            "axis: Column\nassignments:\n  1: 1\n  7: 1\n",
        );

        let config = Config {
            export_path,
            dilution_template_path: Some(dilution_path),
            feeder_template_path: Some(feeder_path),
            replicate_template_path: Some(replicate_path),
            ..Config::default()
        };

        let batches = process_export(&config).unwrap();
        assert_eq!(batches.len(), 2, "Wrong number of batches");

        let run_a = &batches[0];
        assert_eq!(run_a.name, "Run A");
        assert_eq!(run_a.plates.len(), 2);
        assert_eq!(run_a.well_count(), 3);
        assert_eq!(run_a.highest_value, Some(12000.0));

        let run_b = &batches[1];
        assert_eq!(run_b.name, "Run B");
        assert_eq!(run_b.plates.len(), 1);
        assert_eq!(run_b.well_count(), 1);
        assert_eq!(run_b.highest_value, None);

        // Design application: Run A plate 1 wells A1 and A7
        let plate_one = &run_a.plates[0];
        assert_eq!(plate_one.number, 1);
        let a1 = &plate_one.rows()[0];
        assert_eq!(a1.dilution, DesignValue::Assigned("0.5".to_string()));
        assert_eq!(a1.feeders, DesignValue::Assigned("FeederOne".to_string()));
        assert_eq!(a1.replicate, DesignValue::Assigned("1".to_string()));
        let a7 = &plate_one.rows()[1];
        assert_eq!(a7.feeders, DesignValue::Assigned("FeederTwo".to_string()));
        assert_eq!(a7.replicate, DesignValue::Assigned("1".to_string()));

        // C4 is mapped by the dilution template but not the replicate one
        let c4 = &run_b.plates[0].rows()[0];
        assert_eq!(c4.dilution, DesignValue::Assigned("0.05".to_string()));
        assert_eq!(c4.replicate, DesignValue::Unassigned);
    }

    #[test]
    fn test_process_export_without_templates() {
        let dir = tempfile::TempDir::new().unwrap();
        let export_path = write_file(&dir, "export.csv", &export_contents());
        let config = Config {
            export_path,
            ..Config::default()
        };
        let batches = process_export(&config).unwrap();
        assert_eq!(batches.len(), 2);
        for batch in &batches {
            for row in batch.rows() {
                assert_eq!(row.dilution, DesignValue::Unset);
                assert_eq!(row.feeders, DesignValue::Unset);
                assert_eq!(row.replicate, DesignValue::Unset);
            }
        }
    }

    #[test]
    fn test_process_export_missing_file_yields_no_batches() {
        let config = Config {
            export_path: PathBuf::from("no such export.csv"),
            ..Config::default()
        };
        let batches = process_export(&config).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_normalize_table_strict_and_lenient() {
        let table = RawTable {
            headers: Vec::new(),
            rows: vec![
                vec!["1", "Plate 1 - Well A1", "Specimen", "Run A", "", "", ""]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                vec!["2", "Shelf 9", "Specimen", "Run A", "", "", ""]
                    .into_iter()
                    .map(String::from)
                    .collect(),
            ],
        };

        match normalize_table(&table, false) {
            Err(RowError::Location(LocationError::BadPattern(raw))) => assert_eq!(raw, "Shelf 9"),
            other => panic!("Expected a location error in strict mode, got {other:?}"),
        }

        let rows = normalize_table(&table, true).unwrap();
        assert_eq!(rows.len(), 1, "Lenient mode should drop only the bad row");
        assert_eq!(rows[0].well.plate, 1);
    }
}
