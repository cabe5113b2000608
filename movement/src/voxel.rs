//! Dense voxel block grid.
//!
//! # Model
//! - The grid holds `size.x * size.y * size.z` unit blocks.
//! - World units are meters; each block is `BLOCK_SIZE` on a side.
//! - `origin` is the world position of the minimum corner of block `(0, 0, 0)`.
//!
//! # Encoding
//! Block coordinates are linearized in X-major order:
//! - `index = (x * size.y + y) * size.z + z`
//!
//! The index doubles as the id of the block's static collider definition.

use crate::collision::{LiquidProbe, Vec3};
use crate::constants::BLOCK_SIZE;
use crate::rapier::WorldStaticDef;

pub type BlockIndex = u32;

/// Integer block coordinates inside a grid.
pub type BlockCoords = [u32; 3];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Block {
    #[default]
    Air,
    Solid,
    Liquid,
}

impl Block {
    #[inline]
    pub fn is_liquid(self) -> bool {
        self == Block::Liquid
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self == Block::Solid
    }
}

#[derive(Clone, Debug)]
pub struct VoxelGrid {
    origin: Vec3,
    size: BlockCoords,
    blocks: Vec<Block>,
}

impl VoxelGrid {
    /// Grid of air blocks.
    pub fn new(origin: Vec3, size: BlockCoords) -> Self {
        let count = size.iter().map(|&s| s as usize).product();
        Self {
            origin,
            size,
            blocks: vec![Block::Air; count],
        }
    }

    #[inline]
    pub fn size(&self) -> BlockCoords {
        self.size
    }

    /// Block coordinates containing `point`, or `None` outside the grid.
    pub fn block_coords(&self, point: &Vec3) -> Option<BlockCoords> {
        let local = (point - self.origin) / BLOCK_SIZE;
        let mut coords = [0; 3];
        for axis in 0..3 {
            let cell = local[axis].floor();
            if !(cell >= 0.0 && cell < self.size[axis] as f32) {
                return None;
            }
            coords[axis] = cell as u32;
        }
        Some(coords)
    }

    #[inline]
    pub fn encode_index(&self, [x, y, z]: BlockCoords) -> BlockIndex {
        (x * self.size[1] + y) * self.size[2] + z
    }

    #[inline]
    pub fn decode_index(&self, index: BlockIndex) -> BlockCoords {
        let z = index % self.size[2];
        let rest = index / self.size[2];
        [rest / self.size[1], rest % self.size[1], z]
    }

    /// World position of the block's minimum corner.
    #[inline]
    pub fn block_min_corner(&self, [x, y, z]: BlockCoords) -> Vec3 {
        self.origin + Vec3::new(x as f32, y as f32, z as f32) * BLOCK_SIZE
    }

    fn in_bounds(&self, coords: BlockCoords) -> bool {
        coords.iter().zip(self.size.iter()).all(|(c, s)| c < s)
    }

    /// Block at `coords`; air outside the grid.
    pub fn get(&self, coords: BlockCoords) -> Block {
        if !self.in_bounds(coords) {
            return Block::Air;
        }
        self.blocks[self.encode_index(coords) as usize]
    }

    /// Block containing `point`; air outside the grid.
    pub fn block_at(&self, point: &Vec3) -> Block {
        self.block_coords(point)
            .map_or(Block::Air, |coords| self.get(coords))
    }

    /// Set one block. Out-of-range coordinates are ignored.
    pub fn set(&mut self, coords: BlockCoords, block: Block) {
        if self.in_bounds(coords) {
            let index = self.encode_index(coords) as usize;
            self.blocks[index] = block;
        }
    }

    /// Fill the box `min..max` (exclusive upper bound), clipped to the grid.
    pub fn fill(&mut self, min: BlockCoords, max: BlockCoords, block: Block) {
        for x in min[0]..max[0].min(self.size[0]) {
            for y in min[1]..max[1].min(self.size[1]) {
                for z in min[2]..max[2].min(self.size[2]) {
                    self.set([x, y, z], block);
                }
            }
        }
    }

    /// One cuboid static per solid block, with the block index as id.
    pub fn static_defs(&self) -> Vec<WorldStaticDef> {
        let half = Vec3::repeat(BLOCK_SIZE * 0.5);
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| block.is_solid())
            .map(|(index, _)| {
                let index = index as BlockIndex;
                let center = self.block_min_corner(self.decode_index(index)) + half;
                WorldStaticDef::cuboid(index, center, half)
            })
            .collect()
    }
}

impl LiquidProbe for VoxelGrid {
    fn is_liquid_at(&self, point: &Vec3) -> bool {
        self.block_at(point).is_liquid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> VoxelGrid {
        VoxelGrid::new(Vec3::new(-4.0, -1.0, -4.0), [8, 4, 8])
    }

    #[test]
    fn encode_decode_round_trip_for_block_coords() {
        let grid = grid();
        let samples: &[BlockCoords] = &[[0, 0, 0], [7, 3, 7], [1, 2, 3], [7, 0, 0], [0, 3, 0], [0, 0, 7]];

        for &coords in samples {
            assert_eq!(grid.decode_index(grid.encode_index(coords)), coords);
        }
    }

    #[test]
    fn adjacent_indices_step_along_z_first() {
        let grid = grid();
        assert_eq!(grid.encode_index([0, 0, 1]), 1);
        assert_eq!(grid.encode_index([0, 1, 0]), 8);
        assert_eq!(grid.encode_index([1, 0, 0]), 32);
    }

    #[test]
    fn points_map_to_blocks_through_the_origin_offset() {
        let grid = grid();
        assert_eq!(grid.block_coords(&Vec3::new(-4.0, -1.0, -4.0)), Some([0, 0, 0]));
        assert_eq!(grid.block_coords(&Vec3::new(0.5, 0.5, -3.5)), Some([4, 1, 0]));
        assert_eq!(grid.block_coords(&Vec3::new(4.0, 0.0, 0.0)), None);
        assert_eq!(grid.block_coords(&Vec3::new(0.0, -1.5, 0.0)), None);
    }

    #[test]
    fn liquid_probe_reads_liquid_blocks_only() {
        let mut grid = grid();
        grid.fill([0, 0, 0], [8, 1, 8], Block::Solid);
        grid.fill([2, 1, 2], [4, 3, 4], Block::Liquid);

        assert!(grid.is_liquid_at(&Vec3::new(-1.5, 0.5, -1.5)));
        assert!(!grid.is_liquid_at(&Vec3::new(-1.5, -0.5, -1.5)));
        assert!(!grid.is_liquid_at(&Vec3::new(3.5, 0.5, 3.5)));
        // Outside the grid.
        assert!(!grid.is_liquid_at(&Vec3::new(-1.5, 10.0, -1.5)));
    }

    #[test]
    fn fill_is_clipped_to_the_grid() {
        let mut grid = grid();
        grid.fill([6, 0, 6], [20, 20, 20], Block::Solid);
        assert_eq!(grid.get([7, 3, 7]), Block::Solid);
        assert_eq!(grid.get([5, 3, 7]), Block::Air);
        assert_eq!(grid.get([8, 0, 0]), Block::Air);
    }

    #[test]
    fn static_defs_cover_solid_blocks() {
        let mut grid = grid();
        grid.set([4, 1, 4], Block::Solid);
        grid.set([4, 2, 4], Block::Liquid);

        let defs = grid.static_defs();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, grid.encode_index([4, 1, 4]));
        assert!((defs[0].translation - Vec3::new(0.5, 0.5, 0.5)).norm() < 1.0e-6);
    }
}
