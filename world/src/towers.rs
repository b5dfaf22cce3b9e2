//! Authoritative tower state management utilities.

use pathforge_core::{
    CellCoord, TowerId, TowerKind, TowerSnapshot, TowerStats, WorldPoint, MAX_TOWER_LEVEL,
};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: CellCoord,
    /// Current level, starting at one.
    pub(crate) level: u32,
    /// Seconds until the next shot is allowed.
    pub(crate) cooldown: f32,
    /// Combat statistics matching `kind` and `level`.
    pub(crate) stats: TowerStats,
}

impl TowerState {
    /// Creates a freshly built level-one tower that may fire immediately.
    pub(crate) fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            level: 1,
            cooldown: 0.0,
            stats: kind.stats_at(1),
        }
    }

    /// Reports whether another level can still be bought.
    pub(crate) fn can_upgrade(&self) -> bool {
        self.level < MAX_TOWER_LEVEL
    }

    /// Returns the tower one level higher with recomputed stats.
    ///
    /// Identity, placement and the running cooldown are preserved.
    pub(crate) fn upgraded(&self) -> Self {
        let level = self.level + 1;
        Self {
            level,
            stats: self.kind.stats_at(level),
            ..self.clone()
        }
    }

    /// Point projectiles are launched from and ranges are measured from.
    pub(crate) fn center(&self) -> WorldPoint {
        self.cell.center()
    }

    pub(crate) fn in_range(&self, point: WorldPoint) -> bool {
        self.center().distance_to(point) <= self.stats.range
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.cell,
            level: self.level,
            cooldown: self.cooldown,
            stats: self.stats,
        }
    }
}
