//! Integration tests: emitters assembled from the standard behaviors.

use flare_arena::SharedAllocator;
use flare_behaviors::{
    ApplyVelocityModifier, LinearColorInterpolationModifier, LinearSizeInterpolationModifier,
    OneShotTrigger, RandomDirectionVelocityInitializer, RandomRegionPositionInitializer, Rgba,
    Size, StaticColorInitializer, StaticSizeInitializer, TimeElapsedTrigger,
};
use flare_core::standard::{
    CURRENT_ALPHA, CURRENT_HEIGHT, CURRENT_RED, CURRENT_WIDTH, IS_ALIVE, POSITION_X, POSITION_Y,
    TIME_ALIVE,
};
use flare_core::{Property, PropertySet, Vec2};
use flare_engine::{Emitter, EmitterConfig};
use flare_test_utils::approx_eq;

/// Values of `property` for alive particles, in slot order.
fn alive_values(emitter: &Emitter, property: Property<f32>) -> Vec<f32> {
    let alloc = emitter.allocator().borrow();
    let readable = PropertySet::empty().with(IS_ALIVE).with(property);
    let view = emitter.view(&alloc, &readable).unwrap();
    let alive = view.read_only_values(&IS_ALIVE).unwrap();
    let values = view.read_only_values(&property).unwrap();
    alive
        .iter()
        .zip(values.iter())
        .filter(|(a, _)| **a)
        .map(|(_, v)| *v)
        .collect()
}

#[test]
fn size_interpolates_over_lifetime() {
    let shared = SharedAllocator::default();
    let sizes = StaticSizeInitializer::new(Size::new(3.0, 4.0), Size::new(10.0, 20.0)).unwrap();
    let config = EmitterConfig::new(OneShotTrigger::new(1))
        .max_particle_lifetime(5.0)
        .initializer(sizes)
        .modifier(LinearSizeInterpolationModifier::new());
    let mut emitter = Emitter::new(&shared, config).unwrap();

    emitter.update(0.0).unwrap();
    assert_eq!(alive_values(&emitter, CURRENT_WIDTH), vec![3.0]);

    emitter.update(3.5).unwrap();
    let width = alive_values(&emitter, CURRENT_WIDTH);
    let height = alive_values(&emitter, CURRENT_HEIGHT);
    assert!(approx_eq(width[0], 7.9), "width {}", width[0]);
    assert!(approx_eq(height[0], 15.2), "height {}", height[0]);

    emitter.update(2.0).unwrap();
    assert_eq!(emitter.alive_count().unwrap(), 0);
}

#[test]
fn color_fades_over_lifetime() {
    let shared = SharedAllocator::default();
    let colors = StaticColorInitializer::new(Rgba::WHITE, Rgba::new(0.0, 0.0, 0.0, 0.0)).unwrap();
    let config = EmitterConfig::new(OneShotTrigger::new(2))
        .max_particle_lifetime(2.0)
        .initializer(colors)
        .modifier(LinearColorInterpolationModifier::new());
    let mut emitter = Emitter::new(&shared, config).unwrap();

    emitter.update(0.0).unwrap();
    emitter.update(1.0).unwrap();
    for value in alive_values(&emitter, CURRENT_RED)
        .into_iter()
        .chain(alive_values(&emitter, CURRENT_ALPHA))
    {
        assert!(approx_eq(value, 0.5), "channel {value}");
    }
}

#[test]
fn particles_spawn_at_world_position_and_move() {
    let shared = SharedAllocator::default();
    let velocity = RandomDirectionVelocityInitializer::builder()
        .angle(0.0, 0.0)
        .speed(10.0, 10.0)
        .build()
        .unwrap();
    let config = EmitterConfig::new(OneShotTrigger::new(3))
        .max_particle_lifetime(10.0)
        .initializer(RandomRegionPositionInitializer::point())
        .initializer(velocity)
        .modifier(ApplyVelocityModifier::new());
    let mut emitter = Emitter::new(&shared, config).unwrap();
    emitter.set_world_position(Vec2::new(100.0, 50.0));

    emitter.update(0.1).unwrap();
    assert_eq!(alive_values(&emitter, POSITION_X), vec![100.0; 3]);
    assert_eq!(alive_values(&emitter, POSITION_Y), vec![50.0; 3]);

    // Moving the emitter leaves existing particles where they are.
    emitter.set_world_position(Vec2::ZERO);
    emitter.update(0.1).unwrap();
    for x in alive_values(&emitter, POSITION_X) {
        assert!(approx_eq(x, 101.0), "x {x}");
    }
    for y in alive_values(&emitter, POSITION_Y) {
        assert!(approx_eq(y, 50.0), "y {y}");
    }
}

#[test]
fn interval_trigger_emits_on_schedule() {
    let shared = SharedAllocator::default();
    let trigger = TimeElapsedTrigger::builder()
        .interval(0.5)
        .particles(3, 3)
        .build()
        .unwrap();
    let config = EmitterConfig::new(trigger).max_particle_lifetime(100.0);
    let mut emitter = Emitter::new(&shared, config).unwrap();

    let mut counts = Vec::new();
    for _ in 0..6 {
        emitter.update(0.25).unwrap();
        counts.push(emitter.alive_count().unwrap());
    }
    assert_eq!(counts, vec![0, 3, 3, 6, 6, 9]);
    assert_eq!(emitter.behavior::<TimeElapsedTrigger>().unwrap().elapsed(), 0.0);
}

#[test]
fn access_plan_covers_standard_behaviors() {
    let shared = SharedAllocator::default();
    let config = EmitterConfig::new(OneShotTrigger::new(1))
        .initializer(StaticSizeInitializer::constant(Size::new(1.0, 1.0)).unwrap())
        .modifier(LinearSizeInterpolationModifier::new());
    let emitter = Emitter::new(&shared, config).unwrap();

    let plan = emitter.access_plan();
    assert_eq!(plan.initializers().len(), 1);
    assert!(plan.initializer(0).unwrap().writes().contains(&CURRENT_WIDTH.key()));
    assert!(plan.modifier(0).unwrap().writes().contains(&CURRENT_WIDTH.key()));
    assert!(plan.modifier(0).unwrap().reads().contains(&TIME_ALIVE.key()));
    let alloc = shared.borrow();
    for key in plan.properties() {
        assert!(alloc.is_registered(key), "{key} not registered");
    }
}
