use anyhow::Result;
use clap::{Parser, ValueEnum};
use lottery::export::{export, write_csv};
use lottery::{
    ArchiveFetcher, CanonicalTable, DrawCollection, Game, config, get_results, update_results,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    Euro,
    Loto,
}

impl From<Source> for Game {
    fn from(source: Source) -> Self {
        match source {
            Source::Euro => Game::EuroMillions,
            Source::Loto => Game::Loto,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

/// Quickly retrieve lottery results.
#[derive(Debug, Parser)]
#[command(name = "lottery", version)]
struct Cli {
    /// Game to fetch
    #[arg(short, long, value_enum)]
    source: Source,

    /// Only print the last N draws
    #[arg(short = 'n', long)]
    lines: Option<usize>,

    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Sort the numbers within each draw
    #[arg(long)]
    sorted: bool,

    /// Also write <game>.csv into this existing directory
    #[arg(short, long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Download the latest archive again before building the table
    #[arg(long)]
    update: bool,

    /// Skip the on-disk archive store
    #[arg(long)]
    no_store: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    run(cli).await.inspect_err(|e| {
        tracing::error!("lottery failed: {:?}", e);
    })
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::load()?;
    if cli.no_store {
        config.use_store = false;
    }

    let fetcher = ArchiveFetcher::from_config(&config)?;
    let game = Game::from(cli.source);

    let mut table = if cli.update {
        update_results(&fetcher, game).await?
    } else {
        get_results(&fetcher, game).await?
    };

    if cli.sorted {
        let mut draws = DrawCollection::from(table);
        draws.sort_all();
        table = draws.to_table();
    }

    if let Some(dir) = &cli.export {
        export(&table, dir)?;
    }

    let shown = match cli.lines {
        Some(n) => CanonicalTable::new(game, table.tail(n).to_vec()),
        None => table,
    };
    print_table(&shown, cli.format)
}

fn print_table(table: &CanonicalTable, format: Format) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        Format::Table => write!(out, "{table}")?,
        Format::Json => writeln!(out, "{}", serde_json::to_string_pretty(table.draws())?)?,
        Format::Csv => write_csv(table, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
