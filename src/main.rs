use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use log::{debug, info};

use vania_sim::engine::assets::AssetManager;
use vania_sim::engine::game_loop::FixedStepClock;
use vania_sim::engine::input::PlayerInput;
use vania_sim::game::characters::CharacterEvent;
use vania_sim::{Arena, CharacterId, TickInput};

/// Extra simulated time after the script's last event
const TAIL_SECS: f32 = 1.0;

/// Distance at which the grunt stops chasing and swings
const GRUNT_ATTACK_RANGE: f32 = 1.6;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting vania-sim (headless)");

    let asset_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    let mut assets = AssetManager::new(&asset_root);

    let player_config = assets
        .load_character("player")
        .with_context(|| format!("loading player template from {}", asset_root.display()))?
        .clone();
    let grunt_config = assets
        .load_character("grunt")
        .context("loading grunt template")?
        .clone();
    let mut script = assets.load_script("demo").context("loading demo script")?;

    // Floor from x = -15 to 15 with walls at both ends
    let mut arena = Arena::new();
    arena.add_terrain(Vec2::new(0.0, -0.5), Vec2::new(30.0, 1.0));
    arena.add_terrain(Vec2::new(-15.5, 10.0), Vec2::new(1.0, 20.0));
    arena.add_terrain(Vec2::new(15.5, 10.0), Vec2::new(1.0, 20.0));

    let player = arena.spawn_player(player_config, Vec2::new(-5.0, 1.0));
    let grunt = arena.spawn_enemy(grunt_config, Vec2::new(6.0, 0.75));

    let mut input = PlayerInput::new(0);
    let mut clock = FixedStepClock::new();
    let end = script.duration() + TAIL_SECS;

    // Uneven frame times exercise the accumulator
    let frames = [Duration::from_millis(16), Duration::from_millis(17)];
    let mut frame = 0usize;

    while clock.simulated_secs() < end {
        let frame_start = clock.simulated_secs();
        let ticks = clock.advance(frames[frame % frames.len()]);
        frame += 1;

        for tick in 0..ticks {
            let now = frame_start + (tick + 1) as f32 * clock.fixed_timestep();
            script.feed(now, &mut input);

            let alive = arena.get(player).is_some_and(|c| c.death_handler().accepts_input());
            input.set_enabled(alive);

            let mut inputs = HashMap::new();
            inputs.insert(player, input.tick_input());
            if let Some(grunt_input) = grunt_brain(&arena, grunt, player) {
                inputs.insert(grunt, grunt_input);
            }

            for batch in arena.tick(&inputs) {
                report(now, &batch.events, batch.id);
            }
            arena.despawn_dead();
        }
    }

    for id in arena.ids() {
        if let (Some(character), Some(position)) = (arena.get(id), arena.position(id)) {
            let health = character
                .attributes
                .health()
                .map_or(0.0, |h| h.current());
            info!(
                "{} ({}) ended at ({:.2}, {:.2}) in {:?}, health {:.0}",
                character.name(),
                id,
                position.x,
                position.y,
                character.movement.mode(),
                health
            );
        }
    }
    info!(
        "Simulated {:.2}s in {} ticks over {} frames",
        clock.simulated_secs(),
        clock.tick_count(),
        clock.frame_count()
    );

    Ok(())
}

/// Walk towards the target and swing when close
fn grunt_brain(arena: &Arena, grunt: CharacterId, target: CharacterId) -> Option<TickInput> {
    let own = arena.position(grunt)?;
    let other = arena.position(target)?;
    let dx = other.x - own.x;

    if dx.abs() > GRUNT_ATTACK_RANGE {
        Some(TickInput {
            horizontal: dx.signum(),
            ..TickInput::default()
        })
    } else {
        Some(TickInput {
            attack_requested: true,
            ..TickInput::default()
        })
    }
}

fn report(now: f32, events: &[CharacterEvent], id: CharacterId) {
    for event in events {
        match event {
            CharacterEvent::Attribute(attribute) => {
                debug!("[{now:6.3}] {id}: {attribute:?}");
            }
            other => info!("[{now:6.3}] {id}: {other:?}"),
        }
    }
}
