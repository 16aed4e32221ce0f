//! Headless walkthrough driver.
//!
//! Run with: cargo run -p director --bin walkthrough
//!
//! Examples:
//!   cargo run -p director --bin walkthrough -- --seed 7
//!   cargo run -p director --bin walkthrough -- --scene scene.toml --ticks 40000
//!
//! Drives the full step sequence with stub engine ports and a simple
//! autopilot standing in for the player: it walks toward whatever the scene
//! has spawned, honoring the capability gate, and vaults obstacles that
//! block it. Useful for eyeballing the scripted flow end to end without an
//! engine attached.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use director::{default_sequence, Director};
use scene_core::{
    default_scene_toml, CapabilityGate, Scene, SceneConfig, StubEffects, StubNarration,
    StubSpawner, Vaultable, Vec2,
};
use scene_events::EVENT_VAULT;

// Player movement tuning, mirroring the engine-side controller.
const WALK_BASE_SPEED: f32 = 0.5;
const ACCELERATION: f32 = 0.05;
const WALK_MAX_SPEED: f32 = 4.0;
const RUN_MAX_SPEED: f32 = 10.0;

/// How close the autopilot must be to touch an object.
const TOUCH_RADIUS: f32 = 0.75;
/// Trigger radius of a vaultable obstacle.
const CONTACT_RADIUS: f32 = 0.9;
/// Where the autopilot comes to rest against an un-vaulted obstacle.
const WALL_GAP: f32 = 0.5;

/// Headless walkthrough of the narrated scene
#[derive(Parser, Debug)]
#[command(name = "walkthrough")]
#[command(about = "Drives the director sequence with a stub engine and autopilot player")]
struct Args {
    /// Path to a scene TOML file (built-in scene when absent)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Maximum number of ticks to run
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// Stub playback length for every narration clip, in seconds
    #[arg(long, default_value_t = 3.0)]
    narration_seconds: f32,

    /// Seed for scene randomness (overrides the scene file)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the built-in scene TOML and exit
    #[arg(long)]
    print_default_scene: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run(Args::parse()) {
        tracing::error!("walkthrough failed: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.print_default_scene {
        print!("{}", default_scene_toml());
        return Ok(());
    }

    let mut config = match &args.scene {
        Some(path) => SceneConfig::from_file(path)?,
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.tuning.seed = args.seed;
    }

    let narration = StubNarration::shared(args.narration_seconds);
    let effects = StubEffects::shared();
    let spawner = StubSpawner::shared();
    let scene = Scene::from_config(&config, narration.clone(), effects, spawner.clone())?;

    let mut director = Director::new(scene, default_sequence(&config.tuning));
    director.start()?;

    let vaultable_template = director.spawn_template("vaultable")?.clone();
    let mut pilot = Autopilot::new();
    let mut vaultables: Vec<Rc<RefCell<Vaultable>>> = Vec::new();
    let mut seen_vaultables: HashSet<u64> = HashSet::new();
    let mut vault_count = 0u64;

    for tick in 0..args.ticks {
        narration.borrow_mut().advance(args.dt);
        director.update(args.dt)?;

        // Give newly spawned vaultables their behavior.
        let fresh: Vec<_> = spawner
            .borrow()
            .history()
            .iter()
            .filter(|object| {
                object.template == vaultable_template && !seen_vaultables.contains(&object.id.0)
            })
            .map(|object| object.id)
            .collect();
        for id in fresh {
            seen_vaultables.insert(id.0);
            let behavior = Vaultable::activate(
                director.scene_mut(),
                id,
                config.vaultable.grace_window,
                &config.vaultable.clips,
            );
            vaultables.push(behavior);
        }

        tick_vaultables(&mut director, &spawner, &vaultables, args.dt);

        let done_before = vaultables.len();
        vaultables.retain(|behavior| !behavior.borrow().is_done());
        vault_count += (done_before - vaultables.len()) as u64;

        // Vault whenever an obstacle has pinned us.
        if vaultables
            .iter()
            .any(|behavior| behavior.borrow().is_blocking())
        {
            director.scene_mut().emit(EVENT_VAULT);
        }

        pilot.tick(&mut director, &spawner, &vaultables, args.dt);

        if director.current_step() == Some("run")
            && !seen_vaultables.is_empty()
            && vaultables.is_empty()
        {
            tracing::info!("final stretch clear after {} ticks", tick + 1);
            break;
        }
    }

    let position = director.scene().player.position;
    tracing::info!(
        "walkthrough ended on step {:?} at ({:.1}, {:.1}); {} obstacles vaulted, {} narrations played",
        director.current_step(),
        position.x,
        position.y,
        vault_count,
        narration.borrow().play_count()
    );
    Ok(())
}

/// Runs contact tracking and the grace window for every live obstacle.
fn tick_vaultables(
    director: &mut Director,
    spawner: &Rc<RefCell<StubSpawner>>,
    vaultables: &[Rc<RefCell<Vaultable>>],
    dt: f32,
) {
    let player = director.scene().player.position;
    for behavior in vaultables.iter() {
        if behavior.borrow().is_done() {
            continue;
        }
        let id = behavior.borrow().object_id();
        let position = spawner
            .borrow()
            .alive()
            .iter()
            .find(|object| object.id == id)
            .map(|object| object.position);
        let Some(position) = position else { continue };

        let near = (position - player).length_squared() <= CONTACT_RADIUS * CONTACT_RADIUS;
        let in_contact = behavior.borrow().in_contact();
        if near && !in_contact {
            behavior.borrow_mut().contact_enter();
        } else if !near && in_contact {
            behavior.borrow_mut().contact_exit();
        }
        behavior.borrow_mut().update(dt, director.scene_mut());
    }
}

/// Walks the player toward points of interest, honoring the capability gate.
struct Autopilot {
    speed: f32,
    touched: HashSet<u64>,
}

impl Autopilot {
    fn new() -> Self {
        Self {
            speed: WALK_BASE_SPEED,
            touched: HashSet::new(),
        }
    }

    /// Maps a spawn template to the event touching it emits.
    fn touch_event(template: &str) -> Option<&'static str> {
        match template {
            // The autopilot always picks the bell.
            "prefabs/sound_choice" => Some("bell"),
            "prefabs/void" => Some("void"),
            "prefabs/violin" => Some("violin"),
            _ => None,
        }
    }

    fn tick(
        &mut self,
        director: &mut Director,
        spawner: &Rc<RefCell<StubSpawner>>,
        vaultables: &[Rc<RefCell<Vaultable>>],
        dt: f32,
    ) {
        let player = director.scene().player.position;

        // Nearest untouched point of interest.
        let target = spawner
            .borrow()
            .alive()
            .iter()
            .filter(|object| {
                Self::touch_event(&object.template.0).is_some()
                    && !self.touched.contains(&object.id.0)
            })
            .min_by(|a, b| {
                let da = (a.position - player).length_squared();
                let db = (b.position - player).length_squared();
                da.total_cmp(&db)
            })
            .cloned();

        if let Some(object) = &target {
            if (object.position - player).length_squared() <= TOUCH_RADIUS * TOUCH_RADIUS {
                if let Some(event) = Self::touch_event(&object.template.0) {
                    self.touched.insert(object.id.0);
                    tracing::debug!("autopilot touched '{}'", object.template.0);
                    director.scene_mut().emit(event);
                    return;
                }
            }
        }

        let gate = director.scene().player.gate;
        let delta = match &target {
            Some(object) => object.position - player,
            // Nothing to chase; default to pressing on rightward.
            None => Vec2::new(1.0, 0.0),
        };
        let direction = steer(&gate, delta);
        if direction == Vec2::ZERO {
            self.speed = WALK_BASE_SPEED;
            return;
        }

        let cap = if gate.run_enabled {
            RUN_MAX_SPEED
        } else {
            WALK_MAX_SPEED
        };
        self.speed = (self.speed + ACCELERATION).min(cap);

        let step = self.speed * dt;
        let mut next = player;
        next.x += direction.x * step;
        next.y += direction.y * step;

        // Un-vaulted obstacles act as a wall to the right.
        if direction.x > 0.0 {
            let wall = vaultables
                .iter()
                .filter(|behavior| !behavior.borrow().is_done())
                .filter_map(|behavior| {
                    let id = behavior.borrow().object_id();
                    spawner
                        .borrow()
                        .alive()
                        .iter()
                        .find(|object| object.id == id)
                        .map(|object| object.position.x)
                })
                .filter(|x| *x >= player.x)
                .fold(f32::INFINITY, f32::min);
            next.x = next.x.min(wall - WALL_GAP);
        }

        director.scene_mut().player.position = next;
    }
}

/// Picks a unit direction toward `delta` along whichever axes the gate allows.
fn steer(gate: &CapabilityGate, delta: Vec2) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if delta.x > 0.0 && gate.allow_right {
        direction.x = 1.0;
    } else if delta.x < 0.0 && gate.allow_left {
        direction.x = -1.0;
    }
    if delta.y > 0.0 && gate.allow_up {
        direction.y = 1.0;
    } else if delta.y < 0.0 && gate.allow_down {
        direction.y = -1.0;
    }
    direction
}
