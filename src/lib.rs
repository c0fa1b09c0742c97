// Historical EuroMillions and Loto draws from the FDJ archives
pub mod anomaly;
pub mod api;
pub mod archives;
pub mod config;
pub mod database;
pub mod draws;
pub mod error;
pub mod export;
pub mod merge;
pub mod normalize;
pub mod results;
pub mod types;
pub mod utils;

pub use api::{ArchiveCache, ArchiveFetcher};
pub use config::Config;
pub use database::ArchiveStore;
pub use draws::DrawCollection;
pub use error::{LotteryError, Result};
pub use results::*;
pub use types::*;
