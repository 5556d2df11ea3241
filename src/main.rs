//! Animkit main entry point.
//!
//! Runs a headless creature preview:
//!
//! 1. Load the INI configuration and the JSON animation library
//! 2. Build the ECS world with a [`DrawTarget`], [`AnimRng`] and the library
//! 3. Spawn one previewing creature, plus an optional looping effect group
//! 4. Run the animation schedule for the requested number of ticks, logging
//!    every group/frame change
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --library animations.json --animation pikeman --ticks 200
//! ```

mod components;
mod error;
mod events;
mod resources;
mod systems;

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use crate::components::animflags::AnimFlags;
use crate::components::animtype::AnimType;
use crate::components::creatureanim::CreatureAnim;
use crate::components::showableanim::ShowableAnim;
use crate::error::AnimError;
use crate::events::animation::AnimationCompletedEvent;
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::animconfig::AnimConfig;
use crate::resources::drawtarget::DrawTarget;
use crate::resources::random::AnimRng;
use crate::resources::raster::Rect;
use crate::systems::animation::{
    clear_draw_target, show_creatures, show_playback, show_static_images,
};

const TARGET_WIDTH: u32 = 800;
const TARGET_HEIGHT: u32 = 600;

/// Headless sprite animation preview
#[derive(Parser)]
#[command(version, about = "Plays a creature idle preview and logs the frame sequence.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./animkit.ini")]
    config: PathBuf,

    /// Animation library JSON; overrides the configured path.
    #[arg(long, value_name = "PATH")]
    library: Option<PathBuf>,

    /// Name of the animation to preview.
    #[arg(long)]
    animation: String,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 100)]
    ticks: u32,

    /// Seed for the idle preview; overrides the configured seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Use the war machine preview list.
    #[arg(long)]
    war_machine: bool,

    /// Also loop this raw group of the animation at the generic frame delay.
    #[arg(long, value_name = "GROUP")]
    effect_group: Option<usize>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AnimError> {
    let mut config = AnimConfig::with_path(&cli.config);
    if cli.config.exists() {
        config.load_from_file()?;
    } else {
        warn!(
            "Config file {} not found, using defaults",
            cli.config.display()
        );
    }
    if let Some(library) = cli.library {
        config.library_path = library;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.war_machine |= cli.war_machine;

    let library = AnimationLibrary::load_from_file(&config.library_path)?;
    if let Some(def) = library.get(&cli.animation) {
        info!("Animation {}: groups {}", cli.animation, def.summary());
    }

    let mut creature = CreatureAnim::from_source(
        &library,
        &cli.animation,
        0,
        0,
        Rect::default(),
        AnimFlags::default(),
        AnimType::Holding,
    )?;
    config.configure_creature(&mut creature);

    // Raw group playback next to the creature, e.g. a spell effect.
    let effect = match cli.effect_group {
        Some(group) => {
            let mut anim = ShowableAnim::from_source(
                &library,
                &cli.animation,
                0,
                0,
                AnimFlags::default(),
                config.frame_delay,
                group,
            )?;
            config.configure_playback(&mut anim);
            anim.set_completion_notify(true);
            Some(anim)
        }
        None => None,
    };

    let rng = match config.seed {
        Some(seed) => AnimRng::with_seed(seed),
        None => AnimRng::new(),
    };

    let mut world = World::new();
    world.insert_resource(DrawTarget::new(TARGET_WIDTH, TARGET_HEIGHT));
    world.insert_resource(rng);
    world.insert_resource(library);
    let entity = world.spawn(creature).id();
    if let Some(anim) = effect {
        world.spawn(anim);
    }
    world.insert_resource(config);

    world.add_observer(|trigger: On<AnimationCompletedEvent>| {
        info!("Animation completed on {:?}", trigger.event().entity);
    });

    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            clear_draw_target,
            show_static_images,
            show_playback,
            show_creatures,
        )
            .chain(),
    );

    let mut last = None;
    for tick in 0..cli.ticks {
        schedule.run(&mut world);
        let Some(creature) = world.get::<CreatureAnim>(entity) else {
            break;
        };
        let now = (creature.anim().group(), creature.anim().frame());
        if last != Some(now) {
            info!(
                "tick {:>4}: {:?} group {} frame {}",
                tick,
                creature.anim_type(),
                now.0,
                now.1
            );
            last = Some(now);
        }
    }

    world.despawn(entity);
    info!("Preview finished after {} ticks", cli.ticks);
    Ok(())
}
