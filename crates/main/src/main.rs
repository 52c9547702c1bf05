use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use log::info;
use monitoreo_reports::{
    build_document, export_async, load_assets, resolve_asset_root, AsOf, GenpdfRenderer,
    ReportConfig, ReportRequest,
};

/// Renders monitoring reports from JSON requests.
///
/// A request is `{"report": "<type>", "data": {...}}` where `<type>` is one of
/// `administrators`, `teachers`, `periods`, `teaching_history`,
/// `student_list` or `statistics`. Fonts and logos are looked up in `--assets`,
/// then `MONITOREO_ASSETS_DIR`, then `assets/` next to the binary.
#[derive(Parser)]
#[command(author, version, about = "Render academic monitoring reports to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a request to a PDF file.
    Render {
        #[command(flatten)]
        common: CommonArgs,

        /// Output path; defaults to the report's file name.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory holding `fonts/` and the header logos.
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Print the document description of a request as JSON.
    Describe {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Request JSON file.
    #[arg(short, long)]
    input: PathBuf,

    /// Configuration JSON file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed long date printed in the report instead of today's.
    #[arg(long, requires = "time")]
    date: Option<String>,

    /// Fixed time paired with `--date`.
    #[arg(long, requires = "date")]
    time: Option<String>,
}

impl CommonArgs {
    fn load(&self) -> Result<(ReportRequest, ReportConfig, AsOf), Box<dyn Error>> {
        let request = ReportRequest::from_json_str(&fs::read_to_string(&self.input)?)?;
        let config = match &self.config {
            Some(path) => ReportConfig::from_json_file(path)?,
            None => ReportConfig::default(),
        };
        let as_of = match (&self.date, &self.time) {
            (Some(date), Some(time)) => AsOf::fixed(date.as_str(), time.as_str()),
            _ => AsOf::now(),
        };
        Ok((request, config, as_of))
    }
}

async fn render(
    common: &CommonArgs,
    output: Option<&Path>,
    assets: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let (request, config, as_of) = common.load()?;
    let bundle = load_assets(resolve_asset_root(assets)?)?;
    let renderer = Arc::new(GenpdfRenderer::from_config(bundle, &config));

    let pdf = export_async(renderer, &request, &config, as_of).await?;
    let output = output.map_or_else(|| PathBuf::from(pdf.file_name), Path::to_path_buf);
    fs::write(&output, &pdf.bytes)?;
    info!("Wrote {} ({} bytes)", output.display(), pdf.bytes.len());
    Ok(())
}

fn describe(common: &CommonArgs) -> Result<(), Box<dyn Error>> {
    let (request, config, as_of) = common.load()?;
    let doc = build_document(&request, &config, as_of);
    println!("{}", doc.to_json()?);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Render {
            common,
            output,
            assets,
        } => render(common, output.as_deref(), assets.as_deref()).await,
        Commands::Describe { common } => describe(common),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
