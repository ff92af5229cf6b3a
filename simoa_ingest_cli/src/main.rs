use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::macros::format_description;

use libsimoa_ingest::config::Config;
use libsimoa_ingest::process::process_export;

fn make_template_config(path: &Path) {
    let config = Config::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn log_file_name() -> String {
    let stamp_format = format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    match time::OffsetDateTime::now_utc().format(stamp_format) {
        Ok(stamp) => format!("simoa_ingest_{stamp}.log"),
        Err(_) => String::from("simoa_ingest.log"),
    }
}

fn main() {
    // Create a cli
    let matches = Command::new("simoa_ingest_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback; everything also goes to a log file for sharing
    let log_file =
        File::create(log_file_name()).expect("Could not create log file!");
    let logger = simplelog::CombinedLogger::new(vec![
        simplelog::TermLogger::new(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        ),
        simplelog::WriteLogger::new(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            log_file,
        ),
    ]);

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );

        make_template_config(&config_path);
        log::info!("Done.");
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Export Path: {}", config.export_path.to_string_lossy());
    log::info!("Header Rows: {}", config.header_rows);
    log::info!(
        "Skip Malformed Locations: {}",
        config.skip_malformed_locations
    );
    match (
        &config.dilution_template_path,
        &config.feeder_template_path,
        &config.replicate_template_path,
    ) {
        (Some(dilution), Some(feeder), Some(replicate)) => {
            log::info!("Dilution Template: {}", dilution.to_string_lossy());
            log::info!("Feeder Template: {}", feeder.to_string_lossy());
            log::info!("Replicate Template: {}", replicate.to_string_lossy());
        }
        _ => log::info!("No complete experiment design configured."),
    }

    // Run the pipeline
    let batches = match process_export(&config) {
        Ok(batches) => batches,
        Err(e) => {
            log::error!("Processing failed with error: {e}");
            return;
        }
    };

    if batches.is_empty() {
        log::warn!("No batches were produced.");
        return;
    }

    // Report what was structured
    let pb = pb_manager.add(ProgressBar::new(batches.len() as u64));
    for batch in &batches {
        let highest = match batch.highest_value {
            Some(value) => format!("{value} fg/ml"),
            None => String::from("absent"),
        };
        log::info!(
            "Batch {}: {} plates, {} wells, highest concentration {}",
            batch.name,
            batch.plates.len(),
            batch.well_count(),
            highest
        );
        pb.inc(1);
    }
    pb.finish();

    log::info!("Successfully structured {} batches.", batches.len());
    log::info!("Done.");
}
