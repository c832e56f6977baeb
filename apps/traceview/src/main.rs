mod view;

use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use traceview_model::{ActiveView, Summary};
use traceview_results::{Presentation, ResultsView, TableRow, WhoisLinker, WHOIS_LOOKUP_BASE};
use traceview_trace::parse_traceroute;
use view::{render_results, render_summary, run_browser, DrawOpts};

#[derive(Parser)]
#[command(name = "traceview", version, about = "Traceroute results viewer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Show(ShowArgs),
    Summary(SummaryArgs),
    Report(ReportArgs),
    Import(ImportArgs),
    Browse(BrowseArgs),
}

#[derive(Args)]
struct SnapshotArgs {
    /// Results snapshot (JSON list of hops). A missing file means no results.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args)]
struct LookupArgs {
    #[arg(long, env = "TRACEVIEW_LOOKUP_BASE", default_value = WHOIS_LOOKUP_BASE)]
    lookup_base: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Timeline,
    Chart,
    Table,
}

impl From<ViewArg> for ActiveView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Timeline => ActiveView::Timeline,
            ViewArg::Chart => ActiveView::Chart,
            ViewArg::Table => ActiveView::Table,
        }
    }
}

#[derive(Args)]
#[command(about = "Print the summary and one view of a results snapshot")]
struct ShowArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    #[command(flatten)]
    lookup: LookupArgs,

    #[arg(long, value_enum, default_value_t = ViewArg::Timeline)]
    view: ViewArg,

    /// Hop number (1-based) to expand in the timeline.
    #[arg(long)]
    expand: Option<usize>,

    #[arg(long, default_value_t = 80)]
    width: usize,

    #[arg(long, default_value_t = 10)]
    chart_height: usize,

    #[arg(long)]
    plain: bool,
}

#[derive(Args)]
#[command(about = "Print average, max, hop and anomaly counts")]
struct SummaryArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
#[command(about = "Write summary and table rows as a JSON report")]
struct ReportArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Args)]
#[command(about = "Convert raw traceroute output into a results snapshot")]
struct ImportArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Args)]
#[command(about = "Browse a results snapshot interactively")]
struct BrowseArgs {
    #[command(flatten)]
    snapshot: SnapshotArgs,

    #[command(flatten)]
    lookup: LookupArgs,

    #[arg(long, default_value_t = 12)]
    chart_height: usize,

    #[arg(long)]
    plain: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ReportStatus {
    Results,
    NoResults,
}

#[derive(Serialize)]
struct ReportFile {
    version: u32,
    generated_at_utc: String,
    source: PathBuf,
    status: ReportStatus,
    summary: Summary,
    rows: Vec<TableRow>,
}

fn main() {
    init_tracing();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TRACEVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show(args) => run_show(args),
        Commands::Summary(args) => run_summary(args),
        Commands::Report(args) => run_report(args),
        Commands::Import(args) => run_import(args),
        Commands::Browse(args) => run_browse(args),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let mut view = load_view(&args.snapshot.in_path)?;
    let linker = lookup_linker(&args.lookup.lookup_base)?;

    view.select_view(args.view.into());
    let hop_count = view.results().map(|results| results.len());
    if let (Some(hop), Some(hop_count)) = (args.expand, hop_count) {
        if hop == 0 || hop > hop_count {
            return Err(anyhow!(
                "--expand must be a hop number between 1 and {hop_count}"
            ));
        }
        view.toggle_expand(hop - 1);
    }

    let opts = DrawOpts {
        plain: args.plain,
        width: args.width,
        chart_height: args.chart_height,
        cursor: None,
    };
    println!("{}", render_results(&view, &linker, &opts));

    ensure_loadable(&view, &args.snapshot.in_path)
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let view = load_view(&args.snapshot.in_path)?;
    ensure_loadable(&view, &args.snapshot.in_path)?;

    let summary = view.summary().rounded();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let opts = DrawOpts {
            plain: true,
            ..DrawOpts::default()
        };
        for line in render_summary(&summary, &opts) {
            println!("{line}");
        }
    }
    Ok(())
}

fn run_report(args: ReportArgs) -> Result<()> {
    let view = load_view(&args.snapshot.in_path)?;
    ensure_loadable(&view, &args.snapshot.in_path)?;

    let status = match view.presentation() {
        Presentation::Results(_) => ReportStatus::Results,
        _ => ReportStatus::NoResults,
    };

    let report = ReportFile {
        version: 1,
        generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        source: args.snapshot.in_path.clone(),
        status,
        summary: view.summary().rounded(),
        rows: view.table(),
    };

    write_json(&args.out, &report)?;
    eprintln!("report: wrote {} rows to {:?}", report.rows.len(), args.out);
    Ok(())
}

fn run_import(args: ImportArgs) -> Result<()> {
    let text = fs::read_to_string(&args.in_path)
        .map_err(|err| anyhow!("failed to read input {:?}: {}", args.in_path, err))?;
    let trace = parse_traceroute(&text)
        .map_err(|err| anyhow!("failed to parse traceroute {:?}: {}", args.in_path, err))?;

    if trace.hops.is_empty() {
        warn!(input = ?args.in_path, "no answered hops in traceroute output");
    }
    debug!(destination = ?trace.target, hops = trace.hops.len(), "parsed traceroute");

    write_json(&args.out, &trace.hops)?;
    eprintln!("import: wrote {} hops to {:?}", trace.hops.len(), args.out);
    Ok(())
}

fn run_browse(args: BrowseArgs) -> Result<()> {
    let view = load_view(&args.snapshot.in_path)?;
    let linker = lookup_linker(&args.lookup.lookup_base)?;
    let opts = DrawOpts {
        plain: args.plain,
        chart_height: args.chart_height,
        ..DrawOpts::default()
    };

    if !matches!(view.presentation(), Presentation::Results(_)) {
        println!("{}", render_results(&view, &linker, &opts));
        return ensure_loadable(&view, &args.snapshot.in_path);
    }

    run_browser(view, &linker, &opts)
}

fn load_view(path: &Path) -> Result<ResultsView> {
    let raw = read_snapshot(path)?;
    Ok(ResultsView::from_snapshot(raw.as_deref()))
}

fn read_snapshot(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = ?path, "snapshot not found");
            Ok(None)
        }
        Err(err) => Err(anyhow!("failed to read snapshot {:?}: {}", path, err)),
    }
}

fn ensure_loadable(view: &ResultsView, path: &Path) -> Result<()> {
    match view.presentation() {
        Presentation::Unavailable(err) => {
            Err(anyhow!("unable to load results from {:?}: {}", path, err))
        }
        _ => Ok(()),
    }
}

fn lookup_linker(base: &str) -> Result<WhoisLinker> {
    WhoisLinker::new(base).map_err(|err| anyhow!("{err}"))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    atomic_write(path, &json)
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .map_err(|err| anyhow!("failed to create output directory {:?}: {}", parent, err))?;
    }

    let tmp_path = temp_path(path);
    let mut file = fs::File::create(&tmp_path)
        .map_err(|err| anyhow!("failed to create temp file {:?}: {}", tmp_path, err))?;
    file.write_all(data)
        .map_err(|err| anyhow!("failed to write temp file {:?}: {}", tmp_path, err))?;
    file.sync_all()
        .map_err(|err| anyhow!("failed to sync temp file {:?}: {}", tmp_path, err))?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(anyhow!("failed to replace output {:?}: {}", path, err));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    parent.join(format!(".{}.part-{}-{}", file_name, std::process::id(), stamp))
}
