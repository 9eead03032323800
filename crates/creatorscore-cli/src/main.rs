mod bar;
mod config;
mod format;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use creatorscore_core::{load_snapshot, parse_snapshot, ProfileSnapshot, ProfileStats};
use tracing_subscriber::EnvFilter;

use bar::{render_segmented_bar, BarView};
use config::{BreakdownKind, CreatorscoreConfig};
use format::{format_count, format_percentage, format_reward_value};

const MIN_BAR_WIDTH: i64 = 1;
const MAX_BAR_WIDTH: i64 = 400;

#[derive(Parser)]
#[command(name = "creatorscore")]
#[command(author, version, about = "Creator profile stats breakdowns")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    debug: bool,

    #[arg(long, global = true, help = "Disable colored output")]
    no_color: bool,
}

#[derive(Args)]
struct BreakdownArgs {
    #[arg(help = "Profile snapshot JSON file, or - for stdin")]
    snapshot: PathBuf,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Print tables only, without bars")]
    light: bool,

    #[arg(long, help = "Named segments before the rest folds into Other")]
    top_k: Option<usize>,

    #[arg(
        long,
        default_value_t = 40,
        value_parser = clap::value_parser!(u16).range(MIN_BAR_WIDTH..=MAX_BAR_WIDTH),
        help = "Bar width in cells"
    )]
    width: u16,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show earnings, followers and posts breakdowns")]
    Stats(BreakdownArgs),
    #[command(about = "Show earnings per platform")]
    Earnings(BreakdownArgs),
    #[command(about = "Show followers per linked account")]
    Followers(BreakdownArgs),
    #[command(about = "Show posts per platform")]
    Posts(BreakdownArgs),
    #[command(about = "Show platform display labels")]
    Labels {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.debug);
    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Stats(args) => run_breakdowns(&args, &BreakdownKind::ALL),
        Commands::Earnings(args) => run_breakdowns(&args, &[BreakdownKind::Earnings]),
        Commands::Followers(args) => run_breakdowns(&args, &[BreakdownKind::Followers]),
        Commands::Posts(args) => run_breakdowns(&args, &[BreakdownKind::Posts]),
        Commands::Labels { json } => run_labels(json),
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_snapshot(path: &Path) -> Result<ProfileSnapshot> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("could not read snapshot from stdin")?;
        return parse_snapshot(&content).context("could not load snapshot from stdin");
    }

    load_snapshot(path)
        .with_context(|| format!("could not load snapshot from {}", path.display()))
}

fn run_breakdowns(args: &BreakdownArgs, kinds: &[BreakdownKind]) -> Result<()> {
    let config = CreatorscoreConfig::load();
    let snapshot = read_snapshot(&args.snapshot)?;

    let aggregator = config.aggregator(args.top_k);
    let stats = ProfileStats::from_snapshot(&snapshot, &aggregator, &config.labels());
    tracing::debug!(
        top_k = aggregator.top_k(),
        identifier = stats.identifier.as_deref().unwrap_or("-"),
        "computed profile stats"
    );

    if args.json {
        let output = match kinds {
            [BreakdownKind::Earnings] => serde_json::to_string_pretty(&stats.earnings)?,
            [BreakdownKind::Followers] => serde_json::to_string_pretty(&stats.followers)?,
            [BreakdownKind::Posts] => serde_json::to_string_pretty(&stats.posts)?,
            _ => serde_json::to_string_pretty(&stats)?,
        };
        println!("{output}");
        return Ok(());
    }

    if let Some(identifier) = &stats.identifier {
        use colored::Colorize;
        println!("{}\n", format!("  {identifier}").bright_black());
    }

    for (i, kind) in kinds.iter().enumerate() {
        if i > 0 {
            println!();
        }

        let view = bar_view(*kind, &stats, config);
        if args.light {
            print_table(&view);
        } else {
            print!("{}", render_segmented_bar(&view, usize::from(args.width)));
        }
    }

    Ok(())
}

fn bar_view(kind: BreakdownKind, stats: &ProfileStats, config: &CreatorscoreConfig) -> BarView {
    let color = config.color_for(kind);
    match kind {
        BreakdownKind::Earnings => {
            BarView::from_section(kind.title(), &stats.earnings, color, format_reward_value)
        }
        BreakdownKind::Followers => {
            BarView::from_section(kind.title(), &stats.followers, color, format_count)
        }
        BreakdownKind::Posts => {
            BarView::from_section(kind.title(), &stats.posts, color, format_count)
        }
    }
}

fn print_table(view: &BarView) {
    use comfy_table::{ContentArrangement, Table};

    if let Some(error) = &view.error {
        use colored::Colorize;
        println!("{}: {}", view.title, error.as_str().red());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Value", "Share", "Link"]);

    for segment in &view.segments {
        table.add_row(vec![
            segment.name.clone(),
            (view.format_value)(segment.value),
            format_percentage(segment.percentage),
            segment.url.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
    println!("{}: {}", view.title, (view.format_value)(view.total));
}

fn run_labels(json: bool) -> Result<()> {
    let entries = CreatorscoreConfig::load().labels().entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    use comfy_table::{ContentArrangement, Table};

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Platform", "Label"]);
    for (id, label) in &entries {
        table.add_row(vec![id.as_str(), label.as_str()]);
    }
    println!("{table}");

    Ok(())
}
