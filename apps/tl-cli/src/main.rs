use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::fs;

use param_registry as preg;
use state_normalizer as snorm;

#[derive(Parser, Debug)]
#[command(
    name = "tl",
    version,
    about = "Thermalink parameter registry tools",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CategoryArg {
    Writable,
    Sensor,
    Switch,
    Select,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the four catalogs from a register table and print them
    Catalog {
        /// Register table file (fixed-shape CSV)
        #[arg(long)]
        table: String,
        /// Print only one catalog
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,
        /// Locale tag for display names (falls back to the table names)
        #[arg(long)]
        locale: Option<String>,
        /// Emit JSON instead of text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Normalize a recorded poll batch into a device state map
    Normalize {
        /// Poll batch file: JSON array of {code, value, rangeStart, rangeEnd}
        #[arg(long)]
        batch: String,
        /// Device identifier for the state map
        #[arg(long)]
        device: String,
        /// Emit JSON instead of text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Build a registry and print catalog metrics in Prometheus text format
    Metrics {
        /// Register table file (fixed-shape CSV)
        #[arg(long)]
        table: String,
    },
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog {
            table,
            category,
            locale,
            json,
        } => catalog(&table, category, locale.as_deref(), json),
        Commands::Normalize {
            batch,
            device,
            json,
        } => normalize(&batch, &device, json),
        Commands::Metrics { table } => metrics(&table),
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn catalog(
    table: &str,
    category: Option<CategoryArg>,
    locale: Option<&str>,
    json: bool,
) -> Result<()> {
    let rows = preg::load_table_file(table)?;
    let reg = preg::build(&rows);
    let labels = preg::LabelTable::builtin();
    let display = |code: &str, name: &str| -> String {
        locale
            .and_then(|tag| labels.label(code, tag))
            .unwrap_or(name)
            .to_string()
    };

    if json {
        let mut out = serde_json::Map::new();
        if matches!(category, None | Some(CategoryArg::Writable)) {
            let entries: Vec<_> = reg.writables().collect();
            out.insert("writable".into(), serde_json::to_value(entries)?);
        }
        if matches!(category, None | Some(CategoryArg::Sensor)) {
            let entries: Vec<_> = reg.sensors().collect();
            out.insert("sensor".into(), serde_json::to_value(entries)?);
        }
        if matches!(category, None | Some(CategoryArg::Switch)) {
            let entries: Vec<_> = reg.switches().collect();
            out.insert("switch".into(), serde_json::to_value(entries)?);
        }
        if matches!(category, None | Some(CategoryArg::Select)) {
            let entries: Vec<_> = reg.selects().collect();
            out.insert("select".into(), serde_json::to_value(entries)?);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if matches!(category, None | Some(CategoryArg::Writable)) {
        for spec in reg.writables() {
            println!(
                "writable\t{}\t{}\t{}..{} step {} {}",
                spec.code,
                display(&spec.code, &spec.name),
                spec.min,
                spec.max,
                spec.step,
                spec.unit
            );
        }
    }
    if matches!(category, None | Some(CategoryArg::Sensor)) {
        for spec in reg.sensors() {
            let bounds = match (spec.min, spec.max) {
                (Some(lo), Some(hi)) => format!("{lo}..{hi}"),
                _ => "-".to_string(),
            };
            println!(
                "sensor\t{}\t{}\t{} {}",
                spec.code,
                display(&spec.code, &spec.name),
                bounds,
                spec.unit
            );
        }
    }
    if matches!(category, None | Some(CategoryArg::Switch)) {
        for spec in reg.switches() {
            println!("switch\t{}\t{}", spec.code, display(&spec.code, &spec.name));
        }
    }
    if matches!(category, None | Some(CategoryArg::Select)) {
        for spec in reg.selects() {
            let options: Vec<String> = spec
                .options
                .iter()
                .map(|o| format!("{}={}", o.value, o.label))
                .collect();
            println!(
                "select\t{}\t{}\t{}",
                spec.code,
                display(&spec.code, &spec.name),
                options.join("/")
            );
        }
    }
    Ok(())
}

fn normalize(batch: &str, device: &str, json: bool) -> Result<()> {
    let raw = fs::read_to_string(batch).with_context(|| format!("reading poll batch: {batch}"))?;
    let reported: Vec<snorm::Reported> =
        serde_json::from_str(&raw).with_context(|| format!("parsing poll batch: {batch}"))?;

    let table = snorm::TypeTable::builtin();
    let map = snorm::normalize(device, &reported, &table);

    if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    tracing::info!(device = %map.device_id, codes = map.len(), "normalized poll batch");
    for (code, entry) in &map.entries {
        let value = match &entry.value {
            snorm::TypedValue::Numeric(n) => n.to_string(),
            snorm::TypedValue::Text(s) => s.clone(),
            snorm::TypedValue::Absent => "-".to_string(),
        };
        let range = match (entry.range_min, entry.range_max) {
            (Some(lo), Some(hi)) => format!("\t[{lo}..{hi}]"),
            _ => String::new(),
        };
        println!("{code}\t{value}{range}");
    }
    Ok(())
}

fn metrics(table: &str) -> Result<()> {
    let rows = preg::load_table_file(table)?;
    let hub = preg::MetricsHub::new().map_err(anyhow::Error::msg)?;
    let reg = hub.build_recorded(&rows);
    tracing::debug!(params = reg.len(), "registry built for metrics dump");
    print!("{}", hub.encode_text());
    Ok(())
}
