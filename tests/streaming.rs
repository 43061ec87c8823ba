//! Chunks stream in around subjects and are evicted once every subject has
//! moved away.

use cgmath::Point3;
use voxel_terrain::{
    config::{GeneratorConfig, WorldConfig},
    engine_state::{
        voxels::chunk::{ChunkKey, EntityHandle},
        EngineState,
    },
};

fn config(worker_count: usize) -> WorldConfig {
    WorldConfig {
        chunk_size: 4,
        chunk_height: 8,
        view_distance: 2,
        worker_count: Some(worker_count),
        generator: GeneratorConfig::Flat,
        ..Default::default()
    }
}

fn settle(engine_state: &mut EngineState) {
    engine_state.update();
    engine_state.flush_jobs();
    engine_state.update();
}

#[test]
fn test_requests_are_polled_until_ready() {
    let mut engine_state = EngineState::new(config(0)).unwrap();
    engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));

    for _ in 0..3 {
        assert_eq!(engine_state.update().spawned, 0);
    }
    assert_eq!(engine_state.task_manager().get().num_queued_tasks(), 16);

    engine_state.flush_jobs();
    assert_eq!(engine_state.update().spawned, 16);
    assert_eq!(engine_state.task_manager().get().completed_tasks(), 16);
}

#[test]
fn test_walking_away_evicts_everything_behind() {
    let mut engine_state = EngineState::new(config(0)).unwrap();
    let subject = engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));
    settle(&mut engine_state);

    let world = engine_state.world();
    assert_eq!(world.get().loaded_count(), 16);
    assert!(world.get_mut().add_entity(ChunkKey::new(0, 0), EntityHandle(1)));
    assert!(world.get_mut().add_entity(ChunkKey::new(-2, -2), EntityHandle(2)));

    engine_state.move_subject(subject, Point3::new(1000.0, 0.0, 1000.0));
    let report = engine_state.update();
    assert_eq!(report.evicted, 16);
    assert!(!world.get().is_loaded(ChunkKey::new(0, 0)));

    let registry = engine_state.mesh_registry();
    assert!(registry.get().is_empty());
    assert!(registry.get().is_entity_destroyed(EntityHandle(1)));
    assert!(registry.get().is_entity_destroyed(EntityHandle(2)));

    settle(&mut engine_state);
    assert_eq!(world.get().loaded_count(), 16);
    assert!(world.get().is_loaded(ChunkKey::new(250, 250)));
}

#[test]
fn test_second_subject_keeps_its_area_resident() {
    let mut engine_state = EngineState::new(config(0)).unwrap();
    let first = engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));
    settle(&mut engine_state);

    engine_state.add_subject(Point3::new(2.0, 0.0, 2.0));
    engine_state.move_subject(first, Point3::new(-500.0, 0.0, 0.0));
    settle(&mut engine_state);

    let world = engine_state.world();
    assert!(world.get().is_loaded(ChunkKey::new(0, 0)));
    assert!(world.get().is_loaded(ChunkKey::new(-125, 0)));
    assert_eq!(world.get().loaded_count(), 32);
}

#[test]
fn test_removing_last_subject_freezes_residency() {
    let mut engine_state = EngineState::new(config(0)).unwrap();
    let subject = engine_state.add_subject(Point3::new(0.0, 0.0, 0.0));
    settle(&mut engine_state);

    engine_state.remove_subject(subject);
    let report = engine_state.update();
    assert_eq!(report, Default::default());
    assert_eq!(engine_state.world().get().loaded_count(), 16);
}

#[test]
fn test_threaded_workers_stream_the_same_area() {
    let mut engine_state = EngineState::new(config(3)).unwrap();
    engine_state.add_subject(Point3::new(-3.0, 0.0, 5.0));

    for _ in 0..100_000 {
        engine_state.update();
        if engine_state.world().get().is_settled() {
            break;
        }
        std::thread::yield_now();
    }
    let world = engine_state.world();
    assert!(world.get().is_settled());
    assert_eq!(world.get().loaded_count(), 16);
    for key in world.get().loaded_chunks() {
        let chunk = world.get().chunk_at(key).map(|chunk| chunk.vertices.len());
        assert!(chunk.unwrap_or(0) > 0, "chunk {key} has no mesh");
    }
}
