use clap::Parser;
use std::path::PathBuf;

use etiketten::error::Error;
use etiketten::labels;
use etiketten::records;
use etiketten::render::render_tray_labels;

#[derive(Parser, Debug)]
#[command(version, about = "Generate unit-tray species labels as a PDF.", long_about = None)]
struct CliArguments {
    /// CSV file with at least a `taxon` column.
    #[arg(short = 'c', long = "csv", value_name = "csv_file")]
    csv_path: PathBuf,
    #[arg(short = 'o', long = "output", value_name = "file_path")]
    output_path: PathBuf,
}

fn main() {
    if let Err(error) = fallible_main() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main() -> Result<(), Error> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let arguments = CliArguments::parse();
    log::debug!("{:?}", arguments);

    log::info!(
        "Creating labels for {:?} -> {:?}",
        arguments.csv_path,
        arguments.output_path
    );

    let rows = records::load_records(&arguments.csv_path)?;
    let tray_labels = labels::build_tray_labels(&rows)?;
    let canvas = render_tray_labels(&tray_labels)?;
    canvas.save(&arguments.output_path)?;

    log::info!(
        "Saved {} labels to {:?}",
        tray_labels.len(),
        arguments.output_path
    );
    Ok(())
}
