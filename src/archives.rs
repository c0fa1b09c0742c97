//! Published FDJ archives, oldest era first.
//!
//! A new era is one more entry here, with its date format and, if needed,
//! the cell it gets wrong.

use crate::types::{AnomalyFix, ArchiveSpec, Game};

pub const COMPACT_DATE: &str = "%Y%m%d";
pub const DAY_FIRST_DATE: &str = "%d/%m/%Y";
pub const SHORT_YEAR_DATE: &str = "%d/%m/%y";

const LOTO_URLS: [&str; 4] = [
    "https://media.fdj.fr/static-draws/csv/loto/loto_200810.zip",
    "https://media.fdj.fr/static-draws/csv/loto/loto_201703.zip",
    "https://media.fdj.fr/static-draws/csv/loto/loto_201902.zip",
    "https://media.fdj.fr/static-draws/csv/loto/loto_201911.zip",
];

/// First draw of the 2014 EuroMillions archive carries a two-digit year.
pub const EUROMILLIONS_2014_FIRST_ROW: AnomalyFix = AnomalyFix {
    row: 0,
    column: "date_de_tirage",
    from_format: SHORT_YEAR_DATE,
    to_format: DAY_FIRST_DATE,
};

pub fn archives(game: Game) -> Vec<ArchiveSpec> {
    match game {
        Game::EuroMillions => euromillions_archives(),
        Game::Loto => loto_archives(),
    }
}

pub fn euromillions_archives() -> Vec<ArchiveSpec> {
    const BASE: &str = "https://media.fdj.fr/static/csv/euromillions";
    vec![
        ArchiveSpec::new(format!("{BASE}/euromillions_200402.zip"), COMPACT_DATE),
        ArchiveSpec::new(format!("{BASE}/euromillions_201105.zip"), DAY_FIRST_DATE),
        ArchiveSpec::new(format!("{BASE}/euromillions_201402.zip"), DAY_FIRST_DATE)
            .with_fix(EUROMILLIONS_2014_FIRST_ROW),
        ArchiveSpec::new(format!("{BASE}/euromillions_201609.zip"), DAY_FIRST_DATE),
        ArchiveSpec::new(format!("{BASE}/euromillions_201902.zip"), DAY_FIRST_DATE),
        ArchiveSpec::new(format!("{BASE}/euromillions_202002.zip"), DAY_FIRST_DATE),
    ]
}

pub fn loto_archives() -> Vec<ArchiveSpec> {
    LOTO_URLS
        .iter()
        .map(|url| ArchiveSpec::new(*url, DAY_FIRST_DATE))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euromillions_eras_carry_their_quirks() {
        let specs = euromillions_archives();
        assert_eq!(specs.len(), 6);
        assert_eq!(specs[0].date_format, COMPACT_DATE);
        assert_eq!(specs[2].fix, Some(EUROMILLIONS_2014_FIRST_ROW));
        assert!(specs.iter().enumerate().all(|(i, s)| i == 2 || s.fix.is_none()));
        assert!(specs[1..].iter().all(|s| s.date_format == DAY_FIRST_DATE));
    }

    #[test]
    fn loto_eras_share_one_format() {
        let specs = archives(Game::Loto);
        assert_eq!(specs.len(), 4);
        assert!(specs.iter().all(|s| s.date_format == DAY_FIRST_DATE && s.fix.is_none()));
        assert!(specs.iter().all(|s| s.url.ends_with(".zip")));
    }
}
