//! # food-diary CLI
//!
//! Usage:
//!   food-diary entries.json --days 14 --out-dir reports/
//!   cat entries.json | food-diary - --mode inline
//!   food-diary --example > entries.json

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use base64::Engine;
use chrono::{Duration, Utc};
use clap::{Parser, ValueEnum};

use food_diary::config::ReportConfig;
use food_diary::error::ReportError;
use food_diary::layout::ReportLayoutMode;
use food_diary::model::{DiaryEntry, EntryOrder, Photo};
use food_diary::sink::DirectorySink;

#[derive(Parser)]
#[command(name = "food-diary")]
#[command(author, version, about = "Export food diary entries as a PDF report", long_about = None)]
struct Cli {
    /// JSON array of diary entries; `-` or omitted reads stdin
    input: Option<PathBuf>,

    /// Trailing window in days
    #[arg(long)]
    days: Option<u32>,

    /// Row layout
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Order of meals within a day
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// Report config (JSON); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the PDF is written into
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print a sample entries file and exit
    #[arg(long)]
    example: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Stacked,
    Inline,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Newest,
    Oldest,
}

impl From<ModeArg> for ReportLayoutMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Stacked => ReportLayoutMode::Stacked,
            ModeArg::Inline => ReportLayoutMode::Inline,
        }
    }
}

impl From<OrderArg> for EntryOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Newest => EntryOrder::NewestFirst,
            OrderArg::Oldest => EntryOrder::OldestFirst,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.example {
        match example_entries_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(&e),
        }
        return;
    }

    if let Err(e) = run(&cli) {
        fail(&e);
    }
}

fn run(cli: &Cli) -> Result<(), ReportError> {
    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => ReportConfig::default(),
    };
    if let Some(days) = cli.days {
        config.window_days = days;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(order) = cli.order {
        config.entry_order = order.into();
    }

    let input = read_input(cli.input.as_ref())?;
    let entries: Vec<DiaryEntry> = serde_json::from_str(&input)?;
    log::info!("read {} diary entries", entries.len());

    let mut sink = DirectorySink::new(&cli.out_dir);
    let report = food_diary::export_report(&entries, &config, &mut sink)?;
    eprintln!(
        "✓ Written {} pages ({} bytes) to {}",
        report.page_count,
        report.bytes.len(),
        cli.out_dir.join(&report.filename).display()
    );
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String, ReportError> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn fail(e: &ReportError) -> ! {
    eprintln!("✗ {}", e);
    process::exit(1);
}

/// 1x1 white PNG.
const SAMPLE_PHOTO_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

/// A few days of sample entries ending now, so the default window picks
/// them all up.
fn example_entries_json() -> Result<String, ReportError> {
    let now = Utc::now();
    let photo_bytes = base64::engine::general_purpose::STANDARD
        .decode(SAMPLE_PHOTO_PNG)
        .map_err(|e| ReportError::Config(format!("sample photo: {}", e)))?;

    let mut lunch = DiaryEntry::new(now - Duration::hours(2));
    lunch.id = Some(3);
    lunch.meal_name = "Lunch".to_string();
    lunch.dish_components = "Grilled salmon, brown rice, steamed broccoli".to_string();
    lunch.place = "Kitchen table".to_string();
    lunch.feelings = "Calm, a little rushed at the start".to_string();
    lunch.fullness_before = Some(3);
    lunch.fullness_after = Some(6);
    lunch.photos.push(Photo {
        mime_type: "image/png".to_string(),
        data: photo_bytes,
    });

    let mut breakfast = DiaryEntry::new(now - Duration::hours(6));
    breakfast.id = Some(2);
    breakfast.meal_name = "Breakfast".to_string();
    breakfast.dish_components = "Oatmeal with blueberries".to_string();
    breakfast.comments = "Ate slowly and finished the bowl.".to_string();

    let mut dinner = DiaryEntry::new(now - Duration::days(1));
    dinner.id = Some(1);
    dinner.meal_name = "Dinner".to_string();
    dinner.place = "Restaurant with friends".to_string();
    dinner.ed_behaviors = "None".to_string();
    dinner.fullness_after = Some(7);

    let entries = vec![lunch, breakfast, dinner];
    Ok(serde_json::to_string_pretty(&entries)?)
}
