use clap::Parser;
use std::path::PathBuf;

use etiketten::error::Error;
use etiketten::labels::{self, EtiquetteSpec};
use etiketten::records;
use etiketten::render::{render_etiquettes, EtiquetteStyle};

/// A small demonstration set, rendered when no CSV file is given. The
/// original sheet was made for the Cassidinae.
const DEMO_SPECIES: [&str; 6] = [
    "Cassida viridis",
    "Cassida rubiginosa",
    "Cassida vibex",
    "Hypocassida subferruginea",
    "Ischyronota conferta",
    "Aspidimorpha sanctaecrucis",
];

#[derive(Parser, Debug)]
#[command(version, about = "Generate species etiquettes as a PDF.", long_about = None)]
struct CliArguments {
    /// CSV file with at least a `taxon` column; without it a built-in
    /// demonstration species list is rendered.
    #[arg(short = 'c', long = "csv", value_name = "csv_file")]
    csv_path: Option<PathBuf>,
    /// JSON file overriding the sheet layout (rows, columns, margins, font
    /// sizes, padding).
    #[arg(long = "config", value_name = "json_file")]
    style_path: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "file_path",
        default_value = "output.pdf"
    )]
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

    let style = match &arguments.style_path {
        Some(style_path) => EtiquetteStyle::from_path(style_path)?,
        None => EtiquetteStyle::default(),
    };

    let specs: Vec<EtiquetteSpec> = match &arguments.csv_path {
        Some(csv_path) => {
            let rows = records::load_records(csv_path)?;
            labels::build_etiquette_specs(&rows)?
        }
        None => {
            log::info!("No CSV file given, rendering the demonstration species list");
            let mut specs = Vec::new();
            for taxon in DEMO_SPECIES {
                labels::specs_from_taxon(taxon, "", "", &mut specs);
            }
            specs
        }
    };

    let canvas = render_etiquettes(&specs, &style)?;
    canvas.save(&arguments.output_path)?;
    log::info!(
        "Saved {} etiquettes to {:?}",
        specs.len(),
        arguments.output_path
    );
    Ok(())
}
