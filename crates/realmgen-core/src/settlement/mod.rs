//! Settlements: kinds, per-kind parameter tables, habitability scoring and
//! placement.
pub mod habitability;
pub mod placement;

use serde::{Deserialize, Serialize};

use crate::names::NameKind;

/// Settlement kinds in placement priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettlementKind {
    Capital,
    City,
    Town,
    Village,
    Ruins,
    Dungeon,
    Temple,
    Fortress,
}

impl SettlementKind {
    /// Every kind, highest placement priority first.
    pub const ALL: [SettlementKind; 8] = [
        SettlementKind::Capital,
        SettlementKind::City,
        SettlementKind::Town,
        SettlementKind::Village,
        SettlementKind::Ruins,
        SettlementKind::Dungeon,
        SettlementKind::Temple,
        SettlementKind::Fortress,
    ];

    /// Lowercase configuration key.
    pub fn key(self) -> &'static str {
        match self {
            SettlementKind::Capital => "capital",
            SettlementKind::City => "city",
            SettlementKind::Town => "town",
            SettlementKind::Village => "village",
            SettlementKind::Ruins => "ruins",
            SettlementKind::Dungeon => "dungeon",
            SettlementKind::Temple => "temple",
            SettlementKind::Fortress => "fortress",
        }
    }

    /// Which name model family names this kind.
    pub fn name_kind(self) -> NameKind {
        match self {
            SettlementKind::Capital
            | SettlementKind::City
            | SettlementKind::Town
            | SettlementKind::Village => NameKind::Settlement,
            SettlementKind::Ruins => NameKind::Ruins,
            SettlementKind::Dungeon => NameKind::Dungeon,
            SettlementKind::Temple => NameKind::Temple,
            SettlementKind::Fortress => NameKind::Fortress,
        }
    }

    /// Name used when name synthesis fails.
    pub fn fallback_name(self) -> &'static str {
        match self {
            SettlementKind::Capital => "Capital City",
            SettlementKind::City => "Great City",
            SettlementKind::Town => "Small Town",
            SettlementKind::Village => "Village",
            SettlementKind::Ruins => "Ancient Ruins",
            SettlementKind::Dungeon => "Dark Dungeon",
            SettlementKind::Temple => "Holy Temple",
            SettlementKind::Fortress => "Mighty Fortress",
        }
    }

    /// Population of a settlement of this kind on a perfectly habitable cell.
    pub fn base_population(self) -> u32 {
        match self {
            SettlementKind::Capital => 50_000,
            SettlementKind::City => 20_000,
            SettlementKind::Town => 5_000,
            SettlementKind::Village => 500,
            SettlementKind::Ruins => 0,
            SettlementKind::Dungeon => 0,
            SettlementKind::Temple => 100,
            SettlementKind::Fortress => 1_000,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            SettlementKind::Capital => '@',
            SettlementKind::City => 'C',
            SettlementKind::Town => 't',
            SettlementKind::Village => 'v',
            SettlementKind::Ruins => 'r',
            SettlementKind::Dungeon => 'D',
            SettlementKind::Temple => '+',
            SettlementKind::Fortress => '#',
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            SettlementKind::Capital => [255, 215, 0],
            SettlementKind::City => [220, 20, 60],
            SettlementKind::Town => [255, 140, 0],
            SettlementKind::Village => [160, 82, 45],
            SettlementKind::Ruins => [112, 128, 144],
            SettlementKind::Dungeon => [75, 0, 130],
            SettlementKind::Temple => [255, 255, 224],
            SettlementKind::Fortress => [105, 105, 105],
        }
    }
}

/// One value per settlement kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub capital: T,
    pub city: T,
    pub town: T,
    pub village: T,
    pub ruins: T,
    pub dungeon: T,
    pub temple: T,
    pub fortress: T,
}

impl<T> PerKind<T> {
    pub fn get(&self, kind: SettlementKind) -> &T {
        match kind {
            SettlementKind::Capital => &self.capital,
            SettlementKind::City => &self.city,
            SettlementKind::Town => &self.town,
            SettlementKind::Village => &self.village,
            SettlementKind::Ruins => &self.ruins,
            SettlementKind::Dungeon => &self.dungeon,
            SettlementKind::Temple => &self.temple,
            SettlementKind::Fortress => &self.fortress,
        }
    }

    pub fn get_mut(&mut self, kind: SettlementKind) -> &mut T {
        match kind {
            SettlementKind::Capital => &mut self.capital,
            SettlementKind::City => &mut self.city,
            SettlementKind::Town => &mut self.town,
            SettlementKind::Village => &mut self.village,
            SettlementKind::Ruins => &mut self.ruins,
            SettlementKind::Dungeon => &mut self.dungeon,
            SettlementKind::Temple => &mut self.temple,
            SettlementKind::Fortress => &mut self.fortress,
        }
    }
}

/// A placed settlement. Immutable once placement finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub kind: SettlementKind,
    /// Grid cell as `(row, col)`.
    pub position: (usize, usize),
    pub name: String,
    /// Informational only.
    pub population: u32,
    /// Type-local desirability of the cell when it was accepted.
    pub importance: f64,
}

impl Settlement {
    pub fn new(kind: SettlementKind, position: (usize, usize), name: String, importance: f64) -> Self {
        let population = (kind.base_population() as f64 * importance.clamp(0.0, 1.0)).round() as u32;
        Self { kind, position, name, population, importance }
    }

    /// Euclidean distance in grid cells.
    pub fn distance_to(&self, position: (usize, usize)) -> f64 {
        let dr = self.position.0 as f64 - position.0 as f64;
        let dc = self.position.1 as f64 - position.1 as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_kind_accessors_cover_every_kind() {
        let mut table = PerKind::<usize>::default();
        for (i, kind) in SettlementKind::ALL.into_iter().enumerate() {
            *table.get_mut(kind) = i;
        }
        for (i, kind) in SettlementKind::ALL.into_iter().enumerate() {
            assert_eq!(*table.get(kind), i);
        }
    }

    #[test]
    fn urban_kinds_share_settlement_names() {
        assert_eq!(SettlementKind::Capital.name_kind(), NameKind::Settlement);
        assert_eq!(SettlementKind::Village.name_kind(), NameKind::Settlement);
        assert_eq!(SettlementKind::Temple.name_kind(), NameKind::Temple);
    }

    #[test]
    fn population_scales_with_importance() {
        let s = Settlement::new(SettlementKind::Town, (3, 4), "Ashford".into(), 0.5);
        assert_eq!(s.population, 2_500);
        assert_eq!(s.distance_to((6, 8)), 5.0);
    }
}
