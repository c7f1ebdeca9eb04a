use anyhow::{anyhow, Context, Result};
use insertion::{
    config::Config,
    export,
    init_logging,
    query::{ChoiceLists, Sex},
    source::{self, Source},
    view::{self, BarChart, Selection},
};
use reqwest::Client;
use std::{env, path::PathBuf};
use tracing::{info, warn};

const USAGE: &str = "Usage: insertion [SOURCE] [--config FILE] [--institution NAME] \
[--discipline NAME] [--sex Femmes|Hommes] [--json] [--parquet] [--out DIR]";

#[derive(Debug, Default)]
struct Args {
    source: Option<String>,
    config: Option<PathBuf>,
    institution: Option<String>,
    discipline: Option<String>,
    sex: Option<Sex>,
    json: bool,
    parquet: bool,
    out: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--config" => {
                parsed.config = Some(PathBuf::from(args.next().context("missing value for --config")?))
            }
            "--institution" => {
                parsed.institution = Some(args.next().context("missing value for --institution")?)
            }
            "--discipline" => {
                parsed.discipline = Some(args.next().context("missing value for --discipline")?)
            }
            "--sex" => {
                let v = args.next().context("missing value for --sex")?;
                parsed.sex = Some(Sex::from_label(&v).ok_or_else(|| anyhow!("unknown sex: {}", v))?);
            }
            "--json" => parsed.json = true,
            "--parquet" => parsed.parquet = true,
            "--out" => parsed.out = Some(PathBuf::from(args.next().context("missing value for --out")?)),
            "-h" | "--help" => {
                eprintln!("{}", USAGE);
                std::process::exit(0);
            }
            other if other.starts_with('-') => return Err(anyhow!("unknown arg: {}\n{}", other, USAGE)),
            other => parsed.source = Some(other.to_string()),
        }
    }
    Ok(parsed)
}

fn print_bars(chart: &BarChart) {
    println!("\n--- {} ---", chart.title);
    for bar in &chart.bars {
        match (bar.value, bar.note) {
            (Some(v), _) => println!("{:<50} {:>6.1}", bar.label, v),
            (None, Some(note)) => println!("{:<50} {:>6}", bar.label, note),
            (None, None) => println!("{:<50} {:>6}", bar.label, "-"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) parse args & load config ─────────────────────────────────
    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(s) = args.source {
        config.source = s;
    }
    if let Some(out) = args.out {
        config.output_dir = out;
    }
    config.export.json |= args.json;
    config.export.parquet |= args.parquet;

    // ─── 2) init logging ─────────────────────────────────────────────
    init_logging(&config.log_filter);
    info!("startup");

    // ─── 3) load & extract report ────────────────────────────────────
    let source = Source::parse(&config.source)?;
    let (records, stats) = source::load_records(&Client::new(), &source).await?;
    println!(
        "{} records from {} lines ({} skipped, {} with inconsistent headcount)",
        stats.records,
        stats.lines,
        stats.skipped(),
        stats.inconsistent_headcount
    );

    // ─── 4) pick initial selection ───────────────────────────────────
    let choices = ChoiceLists::from_records(&records);
    let selection = match Selection::first_of(&choices) {
        Some(first) => Selection {
            institution: args.institution.unwrap_or(first.institution),
            discipline: args.discipline.unwrap_or(first.discipline),
            sex: args.sex.unwrap_or(first.sex),
        },
        None => {
            warn!("no records; nothing to render");
            return Ok(());
        }
    };

    // ─── 5) render dashboard ─────────────────────────────────────────
    let dashboard = view::render(&records, &selection);
    for chart in &dashboard.by_discipline {
        print_bars(chart);
    }
    match &dashboard.gender {
        Some(gender) => print_bars(&gender.chart),
        None => warn!(
            institution = %selection.institution,
            discipline = %selection.discipline,
            "no data for this selection"
        ),
    }
    println!("\n{} scatter points", dashboard.scatter.points.len());

    // ─── 6) export ───────────────────────────────────────────────────
    for path in export::export_all(&records, &config.output_dir, &config.export)? {
        println!("wrote {}", path.display());
    }

    info!("all done");
    Ok(())
}
