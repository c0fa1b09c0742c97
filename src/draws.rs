use std::fmt;

use crate::types::{CanonicalTable, Draw, Game};

/// Object view over a canonical table: one [`Draw`] per row, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCollection {
    game: Game,
    draws: Vec<Draw>,
    is_sorted: bool,
}

impl DrawCollection {
    pub fn from_table(table: &CanonicalTable) -> Self {
        Self {
            game: table.game(),
            draws: table.iter().cloned().collect(),
            is_sorted: false,
        }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Whether [`DrawCollection::sort_all`] has run.
    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    /// Draw at `index`, clamped to the last draw. `None` only when empty.
    pub fn at(&self, index: usize) -> Option<&Draw> {
        let last = self.draws.len().checked_sub(1)?;
        self.draws.get(index.min(last))
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut Draw> {
        let last = self.draws.len().checked_sub(1)?;
        self.draws.get_mut(index.min(last))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Draw> {
        self.draws.iter()
    }

    /// Sorts the numbers of every draw. Draw order is unchanged.
    pub fn sort_all(&mut self) {
        for draw in &mut self.draws {
            draw.sort();
        }
        self.is_sorted = true;
    }

    pub fn to_table(&self) -> CanonicalTable {
        CanonicalTable::new(self.game, self.draws.clone())
    }
}

impl From<CanonicalTable> for DrawCollection {
    fn from(table: CanonicalTable) -> Self {
        Self {
            game: table.game(),
            draws: table.into_draws(),
            is_sorted: false,
        }
    }
}

impl fmt::Display for DrawCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for draw in &self.draws {
            writeln!(f, "{draw}")?;
        }
        Ok(())
    }
}
