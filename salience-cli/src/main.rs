use clap::Parser;
use salience::{
    AnalysisConfig, CropOptions, Engine, EngineConfig, Palette, Point, Region, SalienceResult,
    Swatch, SwatchCount,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Salience CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

/// Crop constraint: either exact pixel dimensions or an aspect ratio.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CropConfig {
    Exact { width: usize, height: usize },
    Aspect { aspect: f64 },
}

impl CropConfig {
    fn to_options(&self) -> SalienceResult<CropOptions> {
        match *self {
            CropConfig::Exact { width, height } => CropOptions::exact(width, height),
            CropConfig::Aspect { aspect } => CropOptions::aspect(aspect),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct AnalysisConfigJson {
    max_analysis_edge: usize,
    contrast_radius: usize,
    contrast_weight: f32,
    gradient_weight: f32,
    retained_mass: f64,
    histogram_bits: u32,
    palette_min_edge: usize,
    parallel: bool,
}

impl Default for AnalysisConfigJson {
    fn default() -> Self {
        let cfg = AnalysisConfig::default();
        Self {
            max_analysis_edge: cfg.max_analysis_edge,
            contrast_radius: cfg.contrast_radius,
            contrast_weight: cfg.contrast_weight,
            gradient_weight: cfg.gradient_weight,
            retained_mass: cfg.retained_mass,
            histogram_bits: cfg.histogram_bits,
            palette_min_edge: cfg.palette_min_edge,
            parallel: cfg.parallel,
        }
    }
}

impl From<AnalysisConfigJson> for AnalysisConfig {
    fn from(value: AnalysisConfigJson) -> Self {
        Self {
            max_analysis_edge: value.max_analysis_edge,
            contrast_radius: value.contrast_radius,
            contrast_weight: value.contrast_weight,
            gradient_weight: value.gradient_weight,
            retained_mass: value.retained_mass,
            histogram_bits: value.histogram_bits,
            palette_min_edge: value.palette_min_edge,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    swatches: usize,
    crop: Option<CropConfig>,
    analysis: AnalysisConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            output_path: None,
            swatches: SwatchCount::default().get(),
            crop: None,
            analysis: AnalysisConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RegionRecord {
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
    width: usize,
    height: usize,
    duration_ms: u64,
}

impl From<Region> for RegionRecord {
    fn from(value: Region) -> Self {
        Self {
            top: value.top,
            left: value.left,
            bottom: value.bottom,
            right: value.right,
            width: value.width(),
            height: value.height(),
            duration_ms: value.duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
struct PointRecord {
    x: usize,
    y: usize,
    duration_ms: u64,
}

impl From<Point> for PointRecord {
    fn from(value: Point) -> Self {
        Self {
            x: value.x,
            y: value.y,
            duration_ms: value.duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
struct SwatchRecord {
    css: String,
    r: u8,
    g: u8,
    b: u8,
    population: u64,
}

impl From<Swatch> for SwatchRecord {
    fn from(value: Swatch) -> Self {
        Self {
            css: value.css(),
            r: value.r,
            g: value.g,
            b: value.b,
            population: value.population,
        }
    }
}

#[derive(Debug, Serialize)]
struct PaletteRecord {
    swatches: Vec<SwatchRecord>,
    duration_ms: u64,
}

impl From<Palette> for PaletteRecord {
    fn from(value: Palette) -> Self {
        Self {
            swatches: value.swatches.into_iter().map(SwatchRecord::from).collect(),
            duration_ms: value.duration_ms,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    region: RegionRecord,
    point: PointRecord,
    palette: PaletteRecord,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("salience=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }
    let crop = config
        .crop
        .as_ref()
        .map(CropConfig::to_options)
        .transpose()?;

    let engine = Engine::with_config(EngineConfig {
        analysis: config.analysis.into(),
        ..EngineConfig::default()
    });
    let source = PathBuf::from(&config.image_path);

    let (region, point, palette) = tokio::try_join!(
        engine.region(source.clone(), crop),
        engine.point(source.clone()),
        engine.palette(source, config.swatches),
    )?;

    let output = Output {
        region: region.into(),
        point: point.into(),
        palette: palette.into(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
