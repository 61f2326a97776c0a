//! # Voxel World Entry Point
//!
//! Generates a world, meshes it and runs a short physics simulation, logging
//! what happens along the way.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_world::run();
}
