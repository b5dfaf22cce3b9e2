//! Static battlefield layout: cell classifications and the enemy route.

use pathforge_core::{CellCoord, CellKind, WorldPoint};

/// Number of cell columns in the battlefield.
pub const MAP_COLUMNS: i32 = 10;
/// Number of cell rows in the battlefield.
pub const MAP_ROWS: i32 = 16;

/// Path centerline followed by every enemy, from spawn to exit.
const WAYPOINTS: [WorldPoint; 10] = [
    WorldPoint::new(5.5, 15.5),
    WorldPoint::new(5.5, 11.5),
    WorldPoint::new(8.5, 11.5),
    WorldPoint::new(8.5, 8.5),
    WorldPoint::new(1.5, 8.5),
    WorldPoint::new(1.5, 5.5),
    WorldPoint::new(7.5, 5.5),
    WorldPoint::new(7.5, 2.5),
    WorldPoint::new(4.5, 2.5),
    WorldPoint::new(4.5, 0.5),
];

const PATH_CELLS: [(i32, i32); 35] = [
    (5, 15),
    (5, 14),
    (5, 13),
    (5, 12),
    (5, 11),
    (6, 11),
    (7, 11),
    (8, 11),
    (8, 10),
    (8, 9),
    (8, 8),
    (7, 8),
    (6, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (1, 7),
    (1, 6),
    (1, 5),
    (2, 5),
    (3, 5),
    (4, 5),
    (5, 5),
    (6, 5),
    (7, 5),
    (7, 4),
    (7, 3),
    (7, 2),
    (6, 2),
    (5, 2),
    (4, 2),
    (4, 1),
    (4, 0),
];

const BLOCKED_CELLS: [(i32, i32); 15] = [
    (0, 15),
    (1, 15),
    (9, 15),
    (0, 12),
    (3, 13),
    (9, 13),
    (0, 9),
    (3, 10),
    (6, 13),
    (9, 6),
    (9, 3),
    (0, 3),
    (0, 0),
    (1, 0),
    (9, 0),
];

/// Grid of cell classifications plus the authored enemy route.
///
/// The grid only changes through [`GameMap::place`] and [`GameMap::reset`];
/// the waypoints never change.
#[derive(Clone, Debug)]
pub struct GameMap {
    cells: Vec<CellKind>,
}

impl GameMap {
    /// Creates a map with the authored layout and no towers.
    #[must_use]
    pub fn new() -> Self {
        let mut map = Self {
            cells: Vec::with_capacity((MAP_COLUMNS * MAP_ROWS) as usize),
        };
        map.reset();
        map
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        MAP_COLUMNS
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        MAP_ROWS
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        index(cell).is_some()
    }

    /// Classification of a cell. Anything outside the grid is blocked.
    #[must_use]
    pub fn cell_at(&self, cell: CellCoord) -> CellKind {
        index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Blocked)
    }

    /// Reports whether a tower may be built on the cell.
    #[must_use]
    pub fn can_place(&self, cell: CellCoord) -> bool {
        self.cell_at(cell) == CellKind::Grass
    }

    /// Marks a grass cell as occupied by a tower. Other cells are left alone.
    pub fn place(&mut self, cell: CellCoord) {
        if let Some(slot) = index(cell).and_then(|index| self.cells.get_mut(index)) {
            if *slot == CellKind::Grass {
                *slot = CellKind::Tower;
            }
        }
    }

    /// Restores the authored layout, clearing every tower cell.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.cells
            .resize((MAP_COLUMNS * MAP_ROWS) as usize, CellKind::Grass);
        for (cells, kind) in [
            (&PATH_CELLS[..], CellKind::Path),
            (&BLOCKED_CELLS[..], CellKind::Blocked),
        ] {
            for &(column, row) in cells {
                if let Some(index) = index(CellCoord::new(column, row)) {
                    self.cells[index] = kind;
                }
            }
        }
    }

    /// Ordered path control points, from spawn to exit.
    #[must_use]
    pub fn waypoints(&self) -> &[WorldPoint] {
        &WAYPOINTS
    }

    /// Iterates every cell in row-major order together with its classification.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        self.cells.iter().enumerate().map(|(index, kind)| {
            let index = index as i32;
            (CellCoord::new(index % MAP_COLUMNS, index / MAP_COLUMNS), *kind)
        })
    }
}

impl Default for GameMap {
    fn default() -> Self {
        Self::new()
    }
}

fn index(cell: CellCoord) -> Option<usize> {
    if (0..MAP_COLUMNS).contains(&cell.column()) && (0..MAP_ROWS).contains(&cell.row()) {
        usize::try_from(cell.row() * MAP_COLUMNS + cell.column()).ok()
    } else {
        None
    }
}
