//! End-to-end engine scenarios driven by a manual clock.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use lumen_flow::{
    DirectionSet, EdgeTypes, FlowConfig, FlowEngine, FlowRule, FnHooks, FrameBuffer, Graph,
    ManualClock, PixelIndex, Rgb, SpawnRule,
};
use lumen_graph::sculpture::{self, SPIRAL_CENTERS};
use lumen_graph::{Edge, TransposeTable};

fn ring(n: u16) -> Arc<Graph> {
    let edges: Vec<Edge> = (0..n)
        .map(|i| Edge::new(i, (i + 1) % n, EdgeTypes::LOOP1 | EdgeTypes::OUTBOUND))
        .collect();
    Arc::new(Graph::build(&edges, usize::from(n), TransposeTable::STANDARD).unwrap())
}

fn manual_config(speed: u16, lifespan: u64, rule: FlowRule) -> FlowConfig {
    FlowConfig {
        spawn_rule: SpawnRule::ManualSpawn,
        flow_rule: rule,
        ..FlowConfig::new(0, speed, lifespan, &[EdgeTypes::OUTBOUND]).unwrap()
    }
}

#[test]
fn particle_walks_chain_then_dies_at_leaf() {
    let graph = Arc::new(
        Graph::build(
            &[
                Edge::new(0, 1, EdgeTypes::LOOP1 | EdgeTypes::OUTBOUND),
                Edge::new(1, 2, EdgeTypes::LOOP1 | EdgeTypes::OUTBOUND),
            ],
            3,
            TransposeTable::STANDARD,
        )
        .unwrap(),
    );
    let clock = ManualClock::new(0);
    let mut config = manual_config(10, 0, FlowRule::Priority);
    config.directions = DirectionSet::single(EdgeTypes::LOOP1);
    let mut engine = FlowEngine::new(graph, config, clock.clone()).unwrap();
    let mut frame = FrameBuffer::new(3);

    let p = engine.add_particle();
    p.position = PixelIndex(0);
    p.directions = DirectionSet::single(EdgeTypes::OUTBOUND);
    engine.update(&mut frame);
    assert_eq!(engine.particles()[0].position, PixelIndex(0));

    clock.set(100);
    engine.update(&mut frame);
    assert_eq!(engine.particles()[0].position, PixelIndex(1));

    clock.set(200);
    engine.update(&mut frame);
    assert_eq!(engine.particles()[0].position, PixelIndex(2));

    clock.set(300);
    engine.update(&mut frame);
    assert_eq!(engine.len(), 0);
}

#[test]
fn spawn_rate_cap_is_not_burst_filled() {
    let clock = ManualClock::new(0);
    let created = Rc::new(Cell::new(0));
    let counter = created.clone();

    let config = FlowConfig {
        max_spawn_per_second: 1,
        ..FlowConfig::new(5, 10, 0, &[EdgeTypes::OUTBOUND]).unwrap()
    };
    let mut engine = FlowEngine::new(ring(10), config, clock.clone())
        .unwrap()
        .with_hooks(FnHooks::new().on_new(move |_, _| counter.set(counter.get() + 1)));
    let mut frame = FrameBuffer::new(10);

    for t in (0..=4_500).step_by(100) {
        clock.set(t);
        engine.update(&mut frame);
    }
    assert_eq!(created.get(), 4);
    assert_eq!(engine.len(), 4);
}

#[test]
fn movement_clock_advances_in_whole_intervals() {
    // 40 px/s: one move every 25 ms, frames at roughly 120 fps.
    let clock = ManualClock::new(0);
    let mut engine =
        FlowEngine::new(ring(16), manual_config(40, 0, FlowRule::Priority), clock.clone()).unwrap();
    let mut frame = FrameBuffer::new(16);

    engine.add_particle().position = PixelIndex(0);
    engine.update(&mut frame);

    let mut moves = 0;
    let mut previous = engine.last_move();
    let steps = [8u64, 8, 9];
    for i in 0..400 {
        let now = clock.advance(steps[i % steps.len()]);
        engine.update(&mut frame);

        let last = engine.last_move();
        assert_eq!(last % 25, 0, "movement clock snapped to a frame time at {}", now);
        assert!(now - last < 25, "movement clock fell behind at {}", now);
        if last != previous {
            assert_eq!(last - previous, 25);
            moves += 1;
            previous = last;
        }
    }
    assert!(moves >= 100, "only {} moves", moves);

    // The first frame was drawn at t=0, so every move took a hop.
    assert_eq!(engine.particles()[0].position, PixelIndex((moves % 16) as u16));
}

#[test]
fn stall_resynchronises_movement_clock() {
    let clock = ManualClock::new(0);
    let mut engine =
        FlowEngine::new(ring(16), manual_config(40, 0, FlowRule::Priority), clock.clone()).unwrap();
    let mut frame = FrameBuffer::new(16);

    for _ in 0..20 {
        clock.advance(8);
        engine.update(&mut frame);
    }

    // 2000 / 40 = 50 ms; a 60 ms gap must not replay missed moves.
    let now = clock.advance(60);
    engine.update(&mut frame);
    assert_eq!(engine.last_move(), now);
}

#[test]
fn lifespan_kills_on_first_move_past_it() {
    let clock = ManualClock::new(0);
    let mut engine =
        FlowEngine::new(ring(8), manual_config(10, 350, FlowRule::Priority), clock.clone()).unwrap();
    let mut frame = FrameBuffer::new(8);
    engine.add_particle();

    for t in (50..400).step_by(50) {
        clock.set(t);
        engine.update(&mut frame);
        assert_eq!(engine.len(), 1, "died early at {}", t);
    }

    clock.set(400);
    engine.update(&mut frame);
    assert_eq!(engine.len(), 0);
}

#[test]
fn split_clones_into_every_branch() {
    let graph = Arc::new(
        Graph::build(
            &[
                Edge::new(0, 1, EdgeTypes::OUTBOUND),
                Edge::new(0, 2, EdgeTypes::OUTBOUND | EdgeTypes::LOOP1),
                Edge::new(0, 3, EdgeTypes::OUTBOUND | EdgeTypes::LOOP2),
                Edge::new(0, 4, EdgeTypes::CLOCKWISE),
            ],
            5,
            TransposeTable::STANDARD,
        )
        .unwrap(),
    );
    let clock = ManualClock::new(0);
    let mut config = manual_config(10, 0, FlowRule::Split);
    config.split_directions = EdgeTypes::OUTBOUND;
    let mut engine = FlowEngine::new(graph, config, clock.clone()).unwrap();
    let mut frame = FrameBuffer::new(5);

    let p = engine.add_particle();
    p.position = PixelIndex(0);
    p.directions = DirectionSet::single(EdgeTypes::all());
    p.color = Rgb::new(1, 2, 3);
    p.brightness = 99;
    p.color_index = 17;
    p.lifespan = 90_000;
    let parent = p.clone();

    engine.update(&mut frame);
    clock.set(100);
    engine.update(&mut frame);

    let mut positions: Vec<u16> = engine.particles().iter().map(|p| p.position.value()).collect();
    positions.sort_unstable();
    assert_eq!(positions, vec![1, 2, 3]);

    for child in engine.particles() {
        assert_eq!(child.directions, parent.directions);
        assert_eq!(child.color, parent.color);
        assert_eq!(child.brightness, parent.brightness);
        assert_eq!(child.color_index, parent.color_index);
        assert_eq!(child.lifespan, parent.lifespan);
        assert_eq!(child.born_at(), parent.born_at());
    }
}

#[test]
fn priority_flow_ignores_the_seed() {
    let graph = Arc::new(sculpture::sculpture_graph().unwrap());
    let directions = DirectionSet::from_slice(&[
        EdgeTypes::OUTBOUND,
        EdgeTypes::LOOP2 | EdgeTypes::COUNTERCLOCKWISE,
    ])
    .unwrap();

    let run = |seed: u64| {
        let clock = ManualClock::new(0);
        let config = FlowConfig {
            seed,
            ..manual_config(42, 0, FlowRule::Priority)
        };
        let mut engine = FlowEngine::new(graph.clone(), config, clock.clone()).unwrap();
        let mut frame = FrameBuffer::new(sculpture::LED_COUNT);
        for centre in SPIRAL_CENTERS {
            let p = engine.add_particle();
            p.position = centre;
            p.directions = directions;
        }
        let mut trail = Vec::new();
        for _ in 0..300 {
            clock.advance(8);
            engine.update(&mut frame);
            trail.push(engine.particles().iter().map(|p| p.position).collect::<Vec<_>>());
        }
        trail
    };

    let first = run(1);
    assert_eq!(first[0].len(), SPIRAL_CENTERS.len());
    assert_eq!(first, run(99));
}

#[test]
fn swarm_on_sculpture_stays_within_population() {
    let graph = Arc::new(sculpture::sculpture_graph().unwrap());
    let clock = ManualClock::new(0);
    let config = FlowConfig {
        fade_down: 2,
        fade_up_distance: 3,
        flow_rule: FlowRule::Priority,
        max_spawn_per_second: 2,
        ..FlowConfig::new(16, 42, 8192, &[EdgeTypes::empty()]).unwrap()
    };
    let hooks = FnHooks::new()
        .on_new(|p, ctx| {
            p.directions = DirectionSet::from_slice(&[
                EdgeTypes::LOOP2 | EdgeTypes::COUNTERCLOCKWISE,
                EdgeTypes::OUTBOUND,
            ])
            .unwrap();
            p.position = SPIRAL_CENTERS[usize::from(p.color_index) % SPIRAL_CENTERS.len()];
            p.color = Rgb::from_hue((ctx.now / 10) as u8);
        })
        .on_update(|p, ctx| {
            let age = p.age(ctx.now);
            let tail = p.lifespan >> 3;
            if age > p.lifespan - tail {
                p.brightness = (255 * (p.lifespan - age) / tail) as u8;
            }
        });
    let mut engine = FlowEngine::new(graph, config, clock.clone())
        .unwrap()
        .with_hooks(hooks);
    let mut frame = FrameBuffer::new(sculpture::LED_COUNT);

    let mut peak = 0;
    for _ in 0..3_000 {
        clock.advance(8);
        engine.update(&mut frame);
        peak = peak.max(engine.len());
        assert!(engine.len() <= 16);
    }
    assert!(peak > 0);
    assert!(frame.lit_count() > 0);
}

#[test]
fn exact_match_mode_narrows_candidates() {
    // 0 -> 1 carries only LOOP1, 0 -> 2 carries LOOP1 | OUTBOUND.
    let graph = Arc::new(
        Graph::build(
            &[
                Edge::new(0, 1, EdgeTypes::LOOP1),
                Edge::new(0, 2, EdgeTypes::LOOP1 | EdgeTypes::OUTBOUND),
            ],
            3,
            TransposeTable::STANDARD,
        )
        .unwrap(),
    );
    let clock = ManualClock::new(0);
    let mut config = manual_config(10, 0, FlowRule::Priority);
    config.require_exact_match = true;
    let mut engine = FlowEngine::new(graph, config, clock.clone()).unwrap();
    let mut frame = FrameBuffer::new(3);

    let p = engine.add_particle();
    p.position = PixelIndex(0);
    p.directions = DirectionSet::single(EdgeTypes::LOOP1 | EdgeTypes::OUTBOUND);
    engine.update(&mut frame);
    clock.set(100);
    engine.update(&mut frame);
    assert_eq!(engine.particles()[0].position, PixelIndex(2));
}
