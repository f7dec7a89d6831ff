use clap::{Parser, Subcommand};
use cloudcover::{
    CloudCover, CloudCoverError, DailyCloudCover, FetchRange, DEFAULT_CHART_FILE,
    DEFAULT_DATA_FILE, DEFAULT_LOCATION,
};
use std::path::PathBuf;

const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "cloudcover")]
#[command(about = "Compare daily cloud cover on weekdays and weekends")]
struct Cli {
    /// CSV table shared by all commands
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// Location passed to the timeline API and shown in the chart title
    #[arg(short, long, global = true, default_value = DEFAULT_LOCATION)]
    location: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download daily cloud cover and merge it into the data table
    Fetch {
        #[arg(long, env = "VISUAL_CROSSING_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Override the timeline API endpoint
        #[arg(long)]
        base_url: Option<String>,

        /// Date range to fetch, repeatable. Defaults to 1990-01-01 through 2025-01-01.
        #[arg(long = "range", value_name = "START:END")]
        ranges: Vec<FetchRange>,
    },
    /// Print group statistics and the t-test verdict
    Compare,
    /// Render the four-panel comparison chart
    Plot {
        #[arg(short, long, default_value = DEFAULT_CHART_FILE)]
        output: PathBuf,

        /// Multiplies the pixel size of bitmap output
        #[arg(long, default_value_t = 1)]
        scale: u32,
    },
}

fn print_rows(rows: &[DailyCloudCover]) {
    for row in rows {
        let cloud_cover = row
            .cloud_cover
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "null".to_string());
        println!(
            "{}  {:>6}  {:<9}  {}",
            row.date, cloud_cover, row.day_of_week, row.label
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), CloudCoverError> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let app = CloudCover::builder()
        .data_file(cli.data)
        .location(cli.location)
        .build();

    match cli.command {
        Commands::Fetch {
            api_key,
            base_url,
            ranges,
        } => {
            let api_key = api_key.ok_or(CloudCoverError::MissingApiKey)?;
            let ranges = (!ranges.is_empty()).then_some(ranges);
            let rows = app
                .fetch()
                .api_key(api_key)
                .maybe_ranges(ranges)
                .maybe_base_url(base_url)
                .call()
                .await?;

            println!(
                "Saved {} total days of cloud cover data to {:?}",
                rows.len(),
                app.data_file()
            );
            println!();
            print_rows(&rows[..rows.len().min(PREVIEW_ROWS)]);
            if rows.len() > PREVIEW_ROWS {
                println!("...");
                print_rows(&rows[rows.len().saturating_sub(PREVIEW_ROWS).max(PREVIEW_ROWS)..]);
            }
        }
        Commands::Compare => {
            let comparison = app.compare().await?;
            println!("{comparison}");
        }
        Commands::Plot { output, scale } => {
            let path = app.plot().output(output).scale(scale).call().await?;
            println!("Chart saved to {}", path.display());
        }
    }
    Ok(())
}
