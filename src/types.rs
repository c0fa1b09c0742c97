use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LotteryError, Result};

/// Number of main balls drawn in both games.
pub const BALL_COUNT: usize = 5;

const EURO_COLUMNS: [&str; 8] = ["Date", "B1", "B2", "B3", "B4", "B5", "S1", "S2"];
const EURO_SOURCE_COLUMNS: [&str; 8] = [
    "date_de_tirage",
    "boule_1",
    "boule_2",
    "boule_3",
    "boule_4",
    "boule_5",
    "etoile_1",
    "etoile_2",
];

const LOTO_COLUMNS: [&str; 7] = ["Date", "B1", "B2", "B3", "B4", "B5", "S1"];
const LOTO_SOURCE_COLUMNS: [&str; 7] = [
    "date_de_tirage",
    "boule_1",
    "boule_2",
    "boule_3",
    "boule_4",
    "boule_5",
    "numero_chance",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    EuroMillions,
    Loto,
}

impl Game {
    /// File stem used for exports.
    pub fn slug(&self) -> &'static str {
        match self {
            Game::EuroMillions => "euromillions",
            Game::Loto => "loto",
        }
    }

    /// Stars for EuroMillions, the lucky number for Loto.
    pub fn star_count(&self) -> usize {
        match self {
            Game::EuroMillions => 2,
            Game::Loto => 1,
        }
    }

    /// Canonical column names, `Date` first.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Game::EuroMillions => &EURO_COLUMNS,
            Game::Loto => &LOTO_COLUMNS,
        }
    }

    /// Native archive column names, positionally matching [`Game::columns`].
    pub fn source_columns(&self) -> &'static [&'static str] {
        match self {
            Game::EuroMillions => &EURO_SOURCE_COLUMNS,
            Game::Loto => &LOTO_SOURCE_COLUMNS,
        }
    }

    pub fn ball_range(&self) -> RangeInclusive<u8> {
        match self {
            Game::EuroMillions => 1..=50,
            Game::Loto => 1..=49,
        }
    }

    pub fn star_range(&self) -> RangeInclusive<u8> {
        match self {
            Game::EuroMillions => 1..=12,
            Game::Loto => 1..=10,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::EuroMillions => write!(f, "EuroMillions"),
            Game::Loto => write!(f, "Loto"),
        }
    }
}

/// A date cell known to be published in the wrong format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyFix {
    pub row: usize,
    pub column: &'static str,
    pub from_format: &'static str,
    pub to_format: &'static str,
}

/// One published era of a game: where to get it and how to read its dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    pub url: String,
    pub date_format: &'static str,
    pub fix: Option<AnomalyFix>,
}

impl ArchiveSpec {
    pub fn new(url: impl Into<String>, date_format: &'static str) -> Self {
        Self {
            url: url.into(),
            date_format,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: AnomalyFix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Untyped CSV content of one archive, in its native column naming.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Parses semicolon-delimited text with a header row. Rows may be ragged.
    pub fn from_csv(text: &str) -> std::result::Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flat form of a draw: the date, then balls followed by stars.
pub type DrawTuple = (NaiveDate, Vec<u8>);

/// One draw: a date plus its balls and stars (the lucky number for Loto).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Draw {
    pub date: NaiveDate,
    pub balls: Vec<u8>,
    pub stars: Vec<u8>,
}

impl Draw {
    pub fn new(date: NaiveDate, balls: Vec<u8>, stars: Vec<u8>) -> Self {
        Self { date, balls, stars }
    }

    /// Sorts balls and stars ascending, in place.
    pub fn sort(&mut self) {
        self.balls.sort_unstable();
        self.stars.sort_unstable();
    }

    pub fn is_sorted(&self) -> bool {
        self.balls.is_sorted() && self.stars.is_sorted()
    }

    pub fn to_tuple(&self) -> DrawTuple {
        let mut numbers = Vec::with_capacity(self.balls.len() + self.stars.len());
        numbers.extend_from_slice(&self.balls);
        numbers.extend_from_slice(&self.stars);
        (self.date, numbers)
    }

    /// Rebuilds a draw from [`Draw::to_tuple`] output. The first five numbers are balls.
    pub fn from_tuple(tuple: DrawTuple) -> Result<Self> {
        let (date, mut numbers) = tuple;
        if numbers.len() < BALL_COUNT {
            return Err(LotteryError::Format {
                value: format!("{} numbers", numbers.len()),
                expected: format!("at least {BALL_COUNT} numbers"),
                location: format!("draw tuple for {date}"),
            });
        }
        let stars = numbers.split_off(BALL_COUNT);
        Ok(Self::new(date, numbers, stars))
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.balls.iter().chain(self.stars.iter()).copied()
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -", self.date.format("%d/%m/%Y"))?;
        for ball in &self.balls {
            write!(f, " {ball}")?;
        }
        write!(f, " *")?;
        for star in &self.stars {
            write!(f, " {star}")?;
        }
        Ok(())
    }
}

/// Normalized draws of one game, keyed and ordered by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalTable {
    game: Game,
    draws: Vec<Draw>,
}

impl CanonicalTable {
    pub fn new(game: Game, draws: Vec<Draw>) -> Self {
        Self { game, draws }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.game.columns()
    }

    pub fn draws(&self) -> &[Draw] {
        &self.draws
    }

    pub fn into_draws(self) -> Vec<Draw> {
        self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.draws.iter().map(|d| d.date)
    }

    /// Last `n` draws, or all of them when `n` exceeds the length.
    pub fn tail(&self, n: usize) -> &[Draw] {
        let start = self.draws.len().saturating_sub(n);
        &self.draws[start..]
    }

    /// First draw recorded for `date`. Relies on ascending date order.
    pub fn find(&self, date: NaiveDate) -> Option<&Draw> {
        let idx = self.draws.partition_point(|d| d.date < date);
        self.draws.get(idx).filter(|d| d.date == date)
    }

    /// Whether every draw carries five balls and the game's star count.
    pub fn has_canonical_shape(&self) -> bool {
        let stars = self.game.star_count();
        self.draws
            .iter()
            .all(|d| d.balls.len() == BALL_COUNT && d.stars.len() == stars)
    }

    pub(crate) fn sort_by_date(&mut self) {
        // stable: ties keep archive order
        self.draws.sort_by_key(|d| d.date);
    }
}

impl fmt::Display for CanonicalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self.columns();
        write!(f, "{:<10}", columns[0])?;
        for name in &columns[1..] {
            write!(f, " {name:>3}")?;
        }
        writeln!(f)?;
        for draw in &self.draws {
            write!(f, "{}", draw.date.format("%Y-%m-%d"))?;
            for n in draw.numbers() {
                write!(f, " {n:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CanonicalTable {
    type Item = &'a Draw;
    type IntoIter = std::slice::Iter<'a, Draw>;

    fn into_iter(self) -> Self::IntoIter {
        self.draws.iter()
    }
}
