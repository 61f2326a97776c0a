use cgmath::Point3;
use voxel_world::config::WorldConfig;
use voxel_world::engine_state::rendering::meshing::MeshPass;
use voxel_world::engine_state::voxels::block::block_type::BlockType;
use voxel_world::engine_state::voxels::generation::generate_world;
use voxel_world::engine_state::EngineState;

fn small_config(seed: u64) -> WorldConfig {
    WorldConfig {
        seed: Some(seed),
        world_chunks: [2, 2, 2],
        chunk_size: 16,
        water_level: 12,
        base_offset: 6,
        generation_workers: 2,
        ..WorldConfig::default()
    }
}

#[test]
fn editing_a_block_remeshes_its_chunk() {
    let mut engine = EngineState::new(WorldConfig {
        structures: false,
        vegetation: false,
        ..small_config(3)
    });
    let top = engine.surface_height(-1, 4).expect("column has terrain");
    let above = Point3::new(-1, top + 1, 4);
    let chunk = engine.world().get().split_global(above).0;
    let before = engine.mesh_manager().get(chunk).map(|m| m.face_count()).unwrap_or(0);

    assert!(engine.set_block_at(above, BlockType::Wood.id()));
    assert_eq!(engine.get_block_at(above), BlockType::Wood.id());
    let after = engine.mesh_manager().get(chunk).map(|m| m.face_count()).unwrap_or(0);
    assert!(after > before);
    assert!(engine.world().get_mut().take_dirty_chunks().is_empty());
}

#[test]
fn generate_mesh_honours_passes() {
    let mut engine = EngineState::new(WorldConfig {
        water_level: 0,
        structures: false,
        vegetation: false,
        ..small_config(5)
    });
    let chunk = Point3::new(0, 0, 0);
    let opaque = engine.generate_mesh(chunk, MeshPass::Opaque, true);
    assert!(opaque.is_some());
    assert!(engine.generate_mesh(chunk, MeshPass::Transparent, false).is_none());
    assert!(engine.generate_mesh(Point3::new(9, 9, 9), MeshPass::Transparent, true).is_none());
}

#[test]
fn regenerated_world_is_published_in_one_swap() {
    let mut engine = EngineState::new(small_config(11));
    let handle = engine.world().clone();

    let next = small_config(12);
    engine.regenerate_world(next.clone()).unwrap();
    assert_eq!(engine.pending_tasks(), 1);
    assert_eq!(engine.wait_for_tasks(), 1);
    assert_eq!(engine.pending_tasks(), 0);

    let (expected, _) = generate_world(&next);
    let world = handle.get();
    assert!(handle.shares_with(engine.world()));
    let (min, max) = world.block_bounds();
    for z in (min.z..max.z).step_by(3) {
        for x in (min.x..max.x).step_by(3) {
            for y in min.y..max.y {
                let p = Point3::new(x, y, z);
                assert_eq!(world.get_block_at(p), expected.get_block_at(p));
            }
        }
    }
    drop(world);
    assert_eq!(engine.mesh_manager().len(), 8);
}

#[test]
fn process_tasks_does_not_block() {
    let mut engine = EngineState::new(small_config(21));
    assert_eq!(engine.process_tasks(), 0);
    engine.regenerate_world(small_config(22)).unwrap();
    let mut handled = engine.process_tasks();
    while engine.pending_tasks() > 0 {
        std::thread::yield_now();
        handled += engine.process_tasks();
    }
    assert_eq!(handled, 1);
}
