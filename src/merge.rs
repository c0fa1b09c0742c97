use tracing::debug;

use crate::error::{LotteryError, Result};
use crate::types::CanonicalTable;

/// Concatenates per-archive tables in the given order, then sorts the result by date.
///
/// Dates present in two consecutive eras are kept twice.
pub fn merge(tables: Vec<CanonicalTable>) -> Result<CanonicalTable> {
    let game = match tables.first() {
        Some(first) => first.game(),
        None => return Err(LotteryError::Merge("no tables to merge".to_string())),
    };

    for (idx, table) in tables.iter().enumerate() {
        if table.game() != game {
            return Err(LotteryError::Merge(format!(
                "table {idx} holds {} draws, expected {game}",
                table.game()
            )));
        }
        if !table.has_canonical_shape() {
            return Err(LotteryError::Merge(format!(
                "table {idx} does not match the {game} schema {:?}",
                game.columns()
            )));
        }
    }

    let total = tables.iter().map(CanonicalTable::len).sum();
    let mut draws = Vec::with_capacity(total);
    for table in tables {
        draws.extend(table.into_draws());
    }

    let mut merged = CanonicalTable::new(game, draws);
    merged.sort_by_date();
    debug!(%game, rows = merged.len(), "merged archives");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Draw, Game};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn euro(dates: &[NaiveDate]) -> CanonicalTable {
        let draws = dates
            .iter()
            .map(|&d| Draw::new(d, vec![1, 2, 3, 4, 5], vec![1, 2]))
            .collect();
        CanonicalTable::new(Game::EuroMillions, draws)
    }

    #[test]
    fn sorts_after_concatenation() {
        let merged = merge(vec![euro(&[date(2020, 1, 1)]), euro(&[date(2019, 6, 1)])]).unwrap();
        let dates: Vec<_> = merged.dates().collect();
        assert_eq!(dates, vec![date(2019, 6, 1), date(2020, 1, 1)]);
    }

    #[test]
    fn out_of_order_eras_come_out_non_decreasing() {
        let merged = merge(vec![
            euro(&[date(2016, 9, 27), date(2016, 9, 30)]),
            euro(&[date(2004, 2, 13), date(2011, 5, 10)]),
            euro(&[date(2011, 5, 10), date(2014, 2, 4)]),
        ])
        .unwrap();
        assert_eq!(merged.len(), 6);
        assert!(merged.dates().collect::<Vec<_>>().is_sorted());
    }

    #[test]
    fn boundary_overlap_keeps_both_rows_in_archive_order() {
        let day = date(2011, 5, 10);
        let earlier = CanonicalTable::new(
            Game::EuroMillions,
            vec![Draw::new(day, vec![9, 9, 9, 9, 9], vec![1, 2])],
        );
        let later = CanonicalTable::new(
            Game::EuroMillions,
            vec![Draw::new(day, vec![8, 8, 8, 8, 8], vec![1, 2])],
        );

        let merged = merge(vec![earlier, later]).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.draws()[0].balls[0], 9);
        assert_eq!(merged.draws()[1].balls[0], 8);
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(merge(Vec::new()), Err(LotteryError::Merge(_))));
    }

    #[test]
    fn mixed_games_fail() {
        let loto = CanonicalTable::new(
            Game::Loto,
            vec![Draw::new(date(2019, 1, 1), vec![1, 2, 3, 4, 5], vec![3])],
        );
        assert!(matches!(
            merge(vec![euro(&[date(2019, 1, 2)]), loto]),
            Err(LotteryError::Merge(_))
        ));
    }

    #[test]
    fn malformed_rows_fail() {
        let bad = CanonicalTable::new(
            Game::EuroMillions,
            vec![Draw::new(date(2019, 1, 1), vec![1, 2, 3, 4, 5], vec![3])],
        );
        assert!(matches!(merge(vec![bad]), Err(LotteryError::Merge(_))));
    }
}
