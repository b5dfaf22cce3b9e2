//! Seeded auto-builder that spends gold on towers beside the path.

use pathforge_core::{Action, CellCoord, CellKind, TowerKind};
use pathforge_world::{query, GameMap, World};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug)]
pub(crate) struct AutoBuilder {
    rng: ChaCha8Rng,
    max_towers: usize,
}

impl AutoBuilder {
    pub(crate) fn new(seed: u64, max_towers: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            max_towers,
        }
    }

    /// Picks an affordable tower on a free cell touching the path, if any.
    pub(crate) fn next_action(&mut self, world: &World) -> Option<Action> {
        if query::tower_view(world).len() >= self.max_towers {
            return None;
        }

        let gold = query::gold(world);
        let affordable: Vec<TowerKind> = TowerKind::ALL
            .into_iter()
            .filter(|kind| kind.cost() <= gold)
            .collect();
        let kind = *affordable.choose(&mut self.rng)?;
        let cell = *candidate_cells(query::map(world)).choose(&mut self.rng)?;
        Some(Action::PlaceTower { cell, kind })
    }
}

/// Grass cells with a path cell among their eight neighbours.
fn candidate_cells(map: &GameMap) -> Vec<CellCoord> {
    map.iter()
        .filter(|(_, kind)| *kind == CellKind::Grass)
        .map(|(cell, _)| cell)
        .filter(|cell| {
            (-1..=1).any(|dc| {
                (-1..=1).any(|dr| {
                    let neighbour = CellCoord::new(cell.column() + dc, cell.row() + dr);
                    map.cell_at(neighbour) == CellKind::Path
                })
            })
        })
        .collect()
}
