//! # Core Module
//!
//! Shared-ownership primitives used by the engine.
//!
//! ## Key Components
//! - `MtResource`: thread-safe reference-counted resource with read-write
//!   locking and whole-value publication
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::MtResource;
//!
//! let world_handle = MtResource::new(0u32);
//! let task_handle = world_handle.clone();
//! task_handle.publish(7);
//! assert_eq!(*world_handle.get(), 7);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
