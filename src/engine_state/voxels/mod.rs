//! # Voxel World
//!
//! Block data and everything that produces it.
//!
//! ## Architecture
//!
//! * **Block**: block ids, per-type properties and the six face directions
//! * **Chunk**: dense cubes of block ids
//! * **World**: a fixed grid of chunks with global coordinate mapping, edits,
//!   dirty tracking and raycasting
//! * **Generation**: seeded terrain, biomes, trees, islands, clouds and vegetation
//! * **Tasks**: off-thread world generation
//!
//! ## Coordinates
//!
//! The grid is centred on the origin along X and Z and starts at zero along Y.
//! Global coordinates split into a chunk coordinate and a local coordinate with
//! floor division, so negative positions map to the chunk below. Reads outside
//! the grid return air and writes outside it are refused.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;
