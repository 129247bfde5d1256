use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "crop-recommend",
    version,
    about = "Recommend a crop from soil and climate measurements"
)]
pub struct Cli {
    /// Artifact bundle: `.json` is read as JSON, anything else as bincode.
    #[arg(long, global = true, env = "CROP_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Recommend a crop for one sample.
    Predict(PredictArgs),
    /// Recommend a crop for every row of a CSV file.
    Batch(BatchArgs),
    /// Show the columns and classes of the loaded artifacts.
    Inspect,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[arg(long, help = "Nitrogen content (kg/ha)")]
    pub nitrogen: f64,

    #[arg(long, help = "Phosphorus content (kg/ha)")]
    pub phosphorus: f64,

    #[arg(long, help = "Potassium content (kg/ha)")]
    pub potassium: f64,

    #[arg(long, allow_negative_numbers = true, help = "Temperature (°C)")]
    pub temperature: f64,

    #[arg(long, help = "Relative humidity (%)")]
    pub humidity: f64,

    #[arg(long, help = "Soil pH")]
    pub ph: f64,

    #[arg(long, help = "Rainfall (mm)")]
    pub rainfall: f64,

    #[arg(long, default_value_t = 3, help = "Number of ranked crops to show")]
    pub top: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[arg(long, help = "CSV file with Nitrogen,Phosphorus,Potassium,Temperature,Humidity,pH_Value,Rainfall columns")]
    pub input: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}
