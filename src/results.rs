use futures::future::try_join_all;
use tracing::info;

use crate::anomaly;
use crate::api::ArchiveFetcher;
use crate::archives::archives;
use crate::error::{LotteryError, Result};
use crate::merge::merge;
use crate::normalize::normalize;
use crate::types::{ArchiveSpec, CanonicalTable, Game};

/// Every EuroMillions draw since February 2004.
pub async fn get_euromillions_results(fetcher: &ArchiveFetcher) -> Result<CanonicalTable> {
    get_results(fetcher, Game::EuroMillions).await
}

/// Every Loto draw since October 2008.
pub async fn get_loto_results(fetcher: &ArchiveFetcher) -> Result<CanonicalTable> {
    get_results(fetcher, Game::Loto).await
}

pub async fn get_results(fetcher: &ArchiveFetcher, game: Game) -> Result<CanonicalTable> {
    build_results(fetcher, game, &archives(game)).await
}

/// Downloads the game's latest archive again, then rebuilds the table.
pub async fn update_results(fetcher: &ArchiveFetcher, game: Game) -> Result<CanonicalTable> {
    refresh_latest(fetcher, game, &archives(game)).await
}

/// Fetches, repairs and normalizes each archive, then merges them in `specs` order.
pub async fn build_results(
    fetcher: &ArchiveFetcher,
    game: Game,
    specs: &[ArchiveSpec],
) -> Result<CanonicalTable> {
    info!(%game, archives = specs.len(), "building draw table");
    let tables = try_join_all(specs.iter().map(|spec| load_archive(fetcher, game, spec))).await?;
    let table = merge(tables)?;
    info!(%game, draws = table.len(), "draw table ready");
    Ok(table)
}

pub async fn refresh_latest(
    fetcher: &ArchiveFetcher,
    game: Game,
    specs: &[ArchiveSpec],
) -> Result<CanonicalTable> {
    let latest = specs
        .last()
        .ok_or_else(|| LotteryError::Config(format!("no archives configured for {game}")))?;
    fetcher.refresh(&latest.url).await?;
    build_results(fetcher, game, specs).await
}

async fn load_archive(
    fetcher: &ArchiveFetcher,
    game: Game,
    spec: &ArchiveSpec,
) -> Result<CanonicalTable> {
    let raw = fetcher.fetch(&spec.url).await?;
    match &spec.fix {
        Some(fix) => normalize(&anomaly::apply(&raw, fix)?, game, spec.date_format),
        None => normalize(&raw, game, spec.date_format),
    }
}
