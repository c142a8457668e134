use super::vec2::Vec2;
use crate::game::traits::GameError;

/// A cell coordinate on the board.
///
/// (0,0) is the bottom-left corner,
/// x increases to the right, y increases away from the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Orthogonal neighbour offsets, in scan order: down, up, left, right.
    pub const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn neighbors(&self) -> [GridPos; 4] {
        Self::ORTHOGONAL.map(|(dx, dy)| self.offset(dx, dy))
    }

    pub fn distance(&self, other: &GridPos) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

/// Who a tile belongs to. Agents carry the same tag as their identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Owner {
    #[default]
    Empty,
    Controlled,
    AgentA,
    AgentB,
    AgentC,
}

impl Owner {
    pub const AUTONOMOUS: [Owner; 3] = [Owner::AgentA, Owner::AgentB, Owner::AgentC];

    /// Identity of the autonomous agent in slot `index`.
    pub fn autonomous(index: usize) -> Option<Owner> {
        Self::AUTONOMOUS.get(index).copied()
    }

    /// Stable numeric tag used on the wire.
    pub fn index(&self) -> u32 {
        match self {
            Owner::Empty => 0,
            Owner::Controlled => 1,
            Owner::AgentA => 2,
            Owner::AgentB => 3,
            Owner::AgentC => 4,
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Owner::Empty => "Empty",
            Owner::Controlled => "Controlled",
            Owner::AgentA => "AgentA",
            Owner::AgentB => "AgentB",
            Owner::AgentC => "AgentC",
        };
        f.write_str(name)
    }
}

/// An ownership change on a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileClaimed {
    pub pos: GridPos,
    pub previous: Owner,
    pub owner: Owner,
}

impl TileClaimed {
    /// The tile went from unclaimed to owned.
    pub fn was_fresh(&self) -> bool {
        self.previous == Owner::Empty
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    pos: GridPos,
    owner: Owner,
}

impl Tile {
    fn new(pos: GridPos) -> Self {
        Self {
            pos,
            owner: Owner::Empty,
        }
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn is_empty(&self) -> bool {
        self.owner == Owner::Empty
    }

    /// Empty tiles and the claimant's own tiles can be claimed.
    pub fn can_be_claimed_by(&self, claimant: Owner) -> bool {
        self.owner == Owner::Empty || self.owner == claimant
    }

    /// Walking follows the claim rule: another agent's tile blocks.
    pub fn can_walk_on(&self, walker: Owner) -> bool {
        self.can_be_claimed_by(walker)
    }

    /// Set the owner unconditionally. Returns the change, or `None` when the
    /// tile already belonged to `owner`.
    pub fn claim(&mut self, owner: Owner) -> Option<TileClaimed> {
        if self.owner == owner {
            return None;
        }
        let previous = self.owner;
        self.owner = owner;
        Some(TileClaimed {
            pos: self.pos,
            previous,
            owner,
        })
    }
}

pub struct TileGrid {
    /// Width of the grid
    width: u32,
    /// Height of the grid
    height: u32,
    /// World units per cell
    tile_size: f32,
    /// Row-major tiles, `y * width + x`
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tile_size: f32) -> Result<Self, GameError> {
        if width == 0 || height == 0 || !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(GameError::InvalidGrid {
                width,
                height,
                tile_size,
            });
        }

        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(GridPos::new(x as i32, y as i32)));
            }
        }

        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    pub fn get_grid_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn is_valid(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn pos_to_index(&self, pos: GridPos) -> Option<usize> {
        if self.is_valid(pos) {
            Some((pos.y as u32 * self.width + pos.x as u32) as usize)
        } else {
            None
        }
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<&Tile> {
        self.pos_to_index(pos).map(|idx| &self.tiles[idx])
    }

    pub fn owner_at(&self, pos: GridPos) -> Option<Owner> {
        self.tile_at(pos).map(Tile::owner)
    }

    /// In bounds and walkable by `walker`.
    pub fn is_walkable(&self, pos: GridPos, walker: Owner) -> bool {
        self.tile_at(pos).is_some_and(|tile| tile.can_walk_on(walker))
    }

    /// Unconditional ownership write; callers check the claim rule first.
    pub fn claim(&mut self, pos: GridPos, owner: Owner) -> Option<TileClaimed> {
        let idx = self.pos_to_index(pos)?;
        self.tiles[idx].claim(owner)
    }

    pub fn count_by_owner(&self, owner: Owner) -> usize {
        self.tiles.iter().filter(|t| t.owner == owner).count()
    }

    /// Snapshot scan of the tiles held by `owner`, in row-major order.
    pub fn tiles_by_owner(&self, owner: Owner) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().filter(move |t| t.owner == owner)
    }

    pub fn get_total_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn reset_all(&mut self) {
        for tile in &mut self.tiles {
            tile.owner = Owner::Empty;
        }
    }

    /// True when no tile of `owner` has an in-bounds empty orthogonal
    /// neighbour. Owning nothing counts as boxed in. Own tiles and the board
    /// edge are not expansion room.
    pub fn is_owner_boxed_in(&self, owner: Owner) -> bool {
        for tile in self.tiles_by_owner(owner) {
            for neighbor in tile.pos.neighbors() {
                if self.owner_at(neighbor) == Some(Owner::Empty) {
                    return false;
                }
            }
        }
        true
    }

    /// Quantise a world position to the cell under it (ties round to even).
    pub fn world_to_cell(&self, position: Vec2) -> GridPos {
        GridPos::new(
            (position.x / self.tile_size).round_ties_even() as i32,
            (position.y / self.tile_size).round_ties_even() as i32,
        )
    }

    pub fn cell_to_world(&self, pos: GridPos) -> Vec2 {
        Vec2::new(pos.x as f32 * self.tile_size, pos.y as f32 * self.tile_size)
    }
}

impl std::fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tile_size", &self.tile_size)
            .field("claimed_tiles", &self.tiles.iter().filter(|t| !t.is_empty()).count())
            .finish()
    }
}
