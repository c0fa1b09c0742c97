use tracing::{debug, warn};

use crate::error::{LotteryError, Result};
use crate::types::{BALL_COUNT, CanonicalTable, Draw, Game, RawTable};
use crate::utils::{parse_date, parse_number};

/// Maps a raw archive onto the game's canonical schema.
///
/// Selects the game's source columns, renames them to `Date`, `B1..B5`,
/// `S1[,S2]`, parses dates with `date_format`, converts the numbers and
/// sorts the draws by date (stable, so same-day rows keep archive order).
pub fn normalize(raw: &RawTable, game: Game, date_format: &str) -> Result<CanonicalTable> {
    let sources = game.source_columns();
    let indices = sources
        .iter()
        .map(|name| {
            raw.column_index(name).ok_or_else(|| LotteryError::Schema {
                column: name.to_string(),
                table: format!("{game} archive"),
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut draws = Vec::with_capacity(raw.len());

    for row in 0..raw.len() {
        let location = |source: &str| format!("row {row}, column '{source}'");
        let cell = |pos: usize| raw.cell(row, indices[pos]).unwrap_or_default();

        let date = parse_date(cell(0), date_format, || location(sources[0]))?;

        let mut numbers = Vec::with_capacity(indices.len() - 1);
        for pos in 1..indices.len() {
            numbers.push(parse_number(cell(pos), || location(sources[pos]))?);
        }
        let stars = numbers.split_off(BALL_COUNT);
        let draw = Draw::new(date, numbers, stars);

        if !in_range(game, &draw) {
            warn!(%game, %date, "draw numbers outside the game's range");
        }
        draws.push(draw);
    }

    let mut table = CanonicalTable::new(game, draws);
    table.sort_by_date();
    debug!(%game, rows = table.len(), date_format, "normalized archive");
    Ok(table)
}

fn in_range(game: Game, draw: &Draw) -> bool {
    let balls = game.ball_range();
    let stars = game.star_range();
    draw.balls.iter().all(|b| balls.contains(b)) && draw.stars.iter().all(|s| stars.contains(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EURO_HEADER: &str = "annee_numero_de_tirage;jour_de_tirage;date_de_tirage;date_de_forclusion;boule_1;boule_2;boule_3;boule_4;boule_5;etoile_1;etoile_2;nombre_de_gagnant_au_rang1_en_europe;";

    fn euro_raw(rows: &[&str]) -> RawTable {
        let mut text = String::from(EURO_HEADER);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        RawTable::from_csv(&text).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn compact_dates_of_the_first_era() {
        let raw = euro_raw(&["2004001;VE;20040213;20040413;16;29;32;36;41;7;9;1;"]);
        let table = normalize(&raw, Game::EuroMillions, "%Y%m%d").unwrap();

        assert_eq!(table.columns(), &["Date", "B1", "B2", "B3", "B4", "B5", "S1", "S2"]);
        assert_eq!(table.len(), 1);
        let draw = &table.draws()[0];
        assert_eq!(draw.date, date(2004, 2, 13));
        assert_eq!(draw.balls, vec![16, 29, 32, 36, 41]);
        assert_eq!(draw.stars, vec![7, 9]);
    }

    #[test]
    fn sorts_rows_by_date() {
        let raw = euro_raw(&[
            "2011040;VE;20/05/2011;20/07/2011;1;2;3;4;5;1;2;0;",
            "2011039;MA;13/05/2011;13/07/2011;6;7;8;9;10;3;4;0;",
            "2011041;MA;13/05/2011;13/07/2011;11;12;13;14;15;5;6;0;",
        ]);
        let table = normalize(&raw, Game::EuroMillions, "%d/%m/%Y").unwrap();
        let dates: Vec<_> = table.dates().collect();
        assert_eq!(dates, vec![date(2011, 5, 13), date(2011, 5, 13), date(2011, 5, 20)]);
        // ties keep archive order
        assert_eq!(table.draws()[0].balls[0], 6);
        assert_eq!(table.draws()[1].balls[0], 11);
    }

    #[test]
    fn numbers_stay_within_game_ranges() {
        let raw = euro_raw(&[
            "2016001;MA;27/09/2016;27/11/2016;50;1;23;44;12;12;1;0;",
            "2016002;VE;30/09/2016;30/11/2016;3;18;27;34;49;2;11;0;",
        ]);
        let table = normalize(&raw, Game::EuroMillions, "%d/%m/%Y").unwrap();
        for draw in &table {
            assert!(draw.balls.iter().all(|b| Game::EuroMillions.ball_range().contains(b)));
            assert!(draw.stars.iter().all(|s| Game::EuroMillions.star_range().contains(s)));
        }
    }

    #[test]
    fn loto_maps_lucky_number_to_s1() {
        let text = "annee_numero_de_tirage;jour_de_tirage;date_de_tirage;boule_1;boule_2;boule_3;boule_4;boule_5;numero_chance;\n\
                    2019130;LUNDI;04/11/2019;3;12;44;1;20;6;\n";
        let raw = RawTable::from_csv(text).unwrap();
        let table = normalize(&raw, Game::Loto, "%d/%m/%Y").unwrap();
        assert_eq!(table.columns(), &["Date", "B1", "B2", "B3", "B4", "B5", "S1"]);
        assert_eq!(table.draws()[0].stars, vec![6]);
        assert!(table.has_canonical_shape());
    }

    #[test]
    fn missing_star_column_is_a_schema_error() {
        let text = "date_de_tirage;boule_1;boule_2;boule_3;boule_4;boule_5;etoile_2\n13/02/2004;1;2;3;4;5;6\n";
        let raw = RawTable::from_csv(text).unwrap();
        match normalize(&raw, Game::EuroMillions, "%d/%m/%Y").unwrap_err() {
            LotteryError::Schema { column, .. } => assert_eq!(column, "etoile_1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_date_format_is_a_format_error() {
        let raw = euro_raw(&["2004001;VE;20040213;20040413;16;29;32;36;41;7;9;1;"]);
        assert!(matches!(
            normalize(&raw, Game::EuroMillions, "%d/%m/%Y"),
            Err(LotteryError::Format { .. })
        ));
    }

    #[test]
    fn non_numeric_ball_is_a_format_error() {
        let raw = euro_raw(&["2004001;VE;20040213;20040413;16;x;32;36;41;7;9;1;"]);
        match normalize(&raw, Game::EuroMillions, "%Y%m%d").unwrap_err() {
            LotteryError::Format { location, .. } => {
                assert_eq!(location, "row 0, column 'boule_2'")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
