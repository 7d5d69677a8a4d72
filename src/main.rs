//! Ambulare headless host.
//!
//! Drives the world core without a window: a player entity walks and jumps
//! on a tile floor under scripted input while the camera follows it. Every
//! frame is rendered into a [`HeadlessContext`], so the full update/render
//! contract runs exactly as it would behind a real window.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 600 --config ./config.ini
//! ```

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};

use ambulare::config::EngineConfig;
use ambulare::graphics::headless::HeadlessContext;
use ambulare::graphics::material::{BlendMode, Material};
use ambulare::graphics::msat::MultiStateAnimatedTexture;
use ambulare::graphics::texture::{Texture, TextureHandle};
use ambulare::world::physics::SolidGrid;
use ambulare::world::{Entity, GameObject, ObjectId, World, WorldEvent, WorldObject};

/// Player atlas rows: idle/airborne/moving, each facing left then right.
const PLAYER_STATES: &str = r#"[
    { "frames": 2, "frame_time": 0.5 },
    { "frames": 2, "frame_time": 0.5 },
    { "frames": 1, "frame_time": 1.0 },
    { "frames": 1, "frame_time": 1.0 },
    { "frames": 12, "frame_time": 0.035 },
    { "frames": 12, "frame_time": 0.035 }
]"#;

const GRAVITY: f32 = 20.0;
const WALK_SPEED: f32 = 4.0;
const JUMP_SPEED: f32 = 9.0;

/// Ambulare world core, headless run
#[derive(Parser)]
#[command(version, about = "Runs the Ambulare world core headless with scripted input.")]
struct Cli {
    /// INI configuration file (defaults are used when missing).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of fixed update steps to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,
}

/// Horizontal direction and jump request for a frame.
fn scripted_input(frame: u32) -> (i32, bool) {
    match frame {
        60..=179 => (1, frame == 150),
        240..=359 => (-1, frame == 300),
        _ => (0, false),
    }
}

type HeadlessWorld = World<HeadlessContext, SolidGrid>;

fn build_world(config: &EngineConfig) -> Result<(HeadlessWorld, ObjectId), String> {
    let grid = SolidGrid::new(GRAVITY).with_floor(-40, 40, 0);
    let mut world = World::new(config, HeadlessContext::new(), grid);

    let ground = WorldObject::new(
        WorldObject::rect_model(81.0, 1.0),
        Material::solid([0.35, 0.25, 0.2, 1.0]),
    );
    let ground_id = world.add_object(ground);
    if let Some(ground) = world.get_object_mut(ground_id.0) {
        ground.object_mut().set_position(Vec2::new(0.5, 0.5));
    }

    let torch_texture = Texture::new(TextureHandle(2), 64, 16);
    let torch = WorldObject::new(
        torch_texture.model_coords(16.0),
        Material::textured(torch_texture.animate(4, 0.1, true)?)
            .with_blend([1.0, 0.8, 0.5, 1.0], BlendMode::Multiplicative),
    );
    let torch_id = world.add_object(torch);
    if let Some(torch) = world.get_object_mut(torch_id.0) {
        torch.object_mut().set_position(Vec2::new(3.5, 2.0));
    }

    let msat = MultiStateAnimatedTexture::from_json(
        Texture::new(TextureHandle(1), 384, 192),
        PLAYER_STATES,
    )?;
    let mut player = Entity::new(WorldObject::rect_model(1.0, 2.0), msat)?;
    let body = player.object_mut();
    body.set_bounding_width(0.9);
    body.set_position(Vec2::new(0.5, 3.0));
    body.physics_mut().rigid = true;
    let player_id = world.add_object(player);
    world.camera_mut().follow(player_id);

    Ok((world, player_id))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => EngineConfig::with_path(path),
        None => EngineConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    let config = config;

    info!("Hello, world! This is {}", config.window_title);

    let (mut world, player_id) = match build_world(&config) {
        Ok(built) => built,
        Err(e) => {
            error!("Error building world: {}", e);
            std::process::exit(1);
        }
    };

    let events = world.event_sender();
    let dt = config.update_interval();
    let mut since_report = 0.0f32;
    let mut frames_since_report = 0u32;
    let mut last_state = None;

    for frame in 0..cli.frames {
        // window events arrive asynchronously in a real host
        if frame == 30 {
            let _ = events.send(WorldEvent::Scroll { dy: 1.0 });
        }
        if frame == 400 {
            let _ = events.send(WorldEvent::Resized {
                aspect_ratio: 4.0 / 3.0,
                aspect_ratio_action: true,
            });
            let _ = events.send(WorldEvent::Scroll { dy: -1.0 });
        }

        let (direction, jump) = scripted_input(frame);
        if let Some(player) = world.entity_mut(player_id) {
            let vx = direction as f32 * WALK_SPEED;
            player.object_mut().set_vx(vx);
            if direction == 0 {
                player.set_is_moving(false);
            } else {
                player.set_is_moving(true);
                player.set_facing(direction > 0);
            }
            if jump && player.attempt_jump(JUMP_SPEED) {
                info!("frame {}: jump", frame);
            }
        }

        world.update(dt);
        world.render();

        if let Some(player) = world.get_object(player_id.0).and_then(|o| o.as_entity()) {
            let state = player.state();
            if last_state != Some(state) {
                info!(
                    "frame {}: player state {} at ({:.2}, {:.2})",
                    frame,
                    state,
                    player.position().x,
                    player.position().y
                );
                last_state = Some(state);
            }
        }

        since_report += dt;
        frames_since_report += 1;
        if since_report >= config.fps_report_interval {
            let camera = world.camera();
            info!(
                "{:.1} updates/s | camera ({:.2}, {:.2}) zoom {:.3}",
                frames_since_report as f32 / since_report,
                camera.x(),
                camera.y(),
                camera.zoom()
            );
            since_report = 0.0;
            frames_since_report = 0;
        }
    }

    let draws = world.shader().map_or(0, HeadlessContext::draw_count);
    world.cleanup();
    info!("Simulated {} frames, {} draw calls", cli.frames, draws);
}
