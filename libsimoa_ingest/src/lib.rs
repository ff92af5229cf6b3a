//! # simoa_ingest
//!
//! simoa_ingest is a parsing and structuring pipeline for Simoa bioassay
//! export files, written in Rust. It takes the tabular export produced by the
//! instrument (one row per sample well, across one or more physical assay
//! plates grouped into named batches), normalizes the raw fields, and
//! reconstructs the batch -> plate -> well hierarchy needed for downstream
//! analysis. An externally supplied experiment-design template (dilution,
//! feeder and replicate layout) can then be mapped onto every plate.
//!
//! ## Pipeline
//!
//! 1. The export file is read and projected to the seven columns the
//!    analysis needs (`export_file`). A missing file or an unsupported
//!    format is a normal "no data" outcome, never a crash.
//! 2. Each row is normalized (`sample_row`, `well_location`): the free-text
//!    location decodes to plate/row/column coordinates, barcodes become
//!    numbers or uppercased labels, measurement fields coerce to floats with
//!    blanks degrading to absent, and the pg/ml concentration is mirrored in
//!    fg/ml.
//! 3. Rows are partitioned into batches and per-batch plates (`batch`,
//!    `plate`), each owning its rows exclusively.
//! 4. If configured, the three design templates are applied to every plate
//!    (`template`, `process`).
//!
//! ## Configuration
//!
//! Processing is driven by a YAML configuration (see `config`):
//!
//! ```yml
//! export_path: /data/2018-06-21_20-37-11_-123.csv
//! header_rows: 5
//! skip_malformed_locations: false
//! dilution_template_path: /data/dilutions.yml
//! feeder_template_path: /data/feeders.yml
//! replicate_template_path: /data/replicates.yml
//! ```
//!
//! The template paths may all be `null`, in which case the design fields on
//! every row are left unset. `header_rows` is the number of preamble rows the
//! instrument writes ahead of the header row (5 for the standard export).
//!
//! ## Export format
//!
//! Exports are delimiter-separated text (`.csv` comma, `.tsv`/`.txt` tab).
//! After the preamble, the header row must contain at least the columns
//!
//! ```csv
//! Sample Barcode,Location,Sample Type,Batch Name,AEB,Concentration,Flags
//! ```
//!
//! in any order and position; all other columns are dropped at the boundary.
//! Locations are reported by the instrument as `Plate <N> - Well <L><NN>`,
//! e.g. `Plate 1 - Well A12`.
//!
//! ## Template format
//!
//! A design template is a small YAML mapping with the axis the design runs
//! along and the per-coordinate labels:
//!
//! ```yml
//! axis: Column
//! assignments:
//!   1: FeederOne
//!   2: FeederOne
//!   7: FeederTwo
//! ```
//!
//! Row-keyed templates use the letters `A`-`H`; column-keyed templates use
//! the numbers `1`-`12`. Coordinates a template does not mention resolve to
//! "unassigned" on the affected rows.
pub mod batch;
pub mod config;
pub mod error;
pub mod export_file;
pub mod plate;
pub mod process;
pub mod sample_row;
pub mod template;
pub mod well_location;
