//! Overlay demo
//!
//! Opens a window, feeds a synthetic scene through the frame pipeline and
//! replays the recorded draw commands with SDL2.
//!
//! Controls:
//! - T: toggle player trails
//! - A: switch trails between tactical and analysis teleport display
//! - G: cycle gear display (off, compact, top attributes, detailed)
//! - D: toggle player and NPC details
//! - F5: save the current settings
//! - Escape: quit
//!
//! Set `RUST_LOG=entity_overlay=trace` to see per-frame counters.

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;

mod demo;

use demo::canvas;
use demo::scene::DemoScene;
use entity_overlay::draw::CommandBuffer;
use entity_overlay::settings::{Config, GearDisplayMode, SettingsManager, TeleportMode, TrailDisplayMode};
use entity_overlay::sources::{CameraSource, Clock, SnapshotSource, SystemClock};
use entity_overlay::FramePipeline;
use glam::Vec2;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

/// How often the frame counters are logged
const STATS_INTERVAL_MS: u64 = 5000;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Loads settings, falling back to demo-friendly defaults
///
/// Returns `None` for the manager when no settings directory is usable;
/// the demo still runs, it just can't save.
fn load_settings() -> (Option<SettingsManager>, Config) {
    let manager = match SettingsManager::in_config_dir() {
        Ok(manager) => manager,
        Err(err) => {
            warn!(error = %err, "settings directory unavailable");
            return (None, demo_config());
        }
    };

    if !manager.path().exists() {
        return (Some(manager), demo_config());
    }
    match manager.load() {
        Ok(config) => (Some(manager), config),
        Err(err) => {
            warn!(error = %err, "could not load settings");
            (Some(manager), demo_config())
        }
    }
}

/// Defaults with the more visual features switched on
fn demo_config() -> Config {
    let mut config = Config::default();
    config.players.trails.enabled = true;
    config.players.trails.display_mode = TrailDisplayMode::All;
    config.players.components.render_box = true;
    config.players.components.render_health_bar = true;
    config.npcs.components.render_details = true;
    config
}

fn next_gear_mode(mode: GearDisplayMode) -> GearDisplayMode {
    match mode {
        GearDisplayMode::Off => GearDisplayMode::Compact,
        GearDisplayMode::Compact => GearDisplayMode::TopAttributes,
        GearDisplayMode::TopAttributes => GearDisplayMode::Detailed,
        GearDisplayMode::Detailed => GearDisplayMode::Off,
    }
}

fn main() -> Result<(), String> {
    init_logging();

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("Entity Overlay Demo", WINDOW_WIDTH, WINDOW_HEIGHT)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;

    let (settings, mut config) = load_settings();
    let viewport = Vec2::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32);
    let clock = SystemClock::new();
    let mut scene = DemoScene::new(viewport);
    let mut pipeline = FramePipeline::new();
    let mut snapshots = Vec::new();
    let mut commands = CommandBuffer::new();
    let mut last_stats_log = 0;

    info!(width = WINDOW_WIDTH, height = WINDOW_HEIGHT, "demo started");

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(Keycode::T),
                    ..
                } => {
                    let trails = &mut config.players.trails;
                    trails.enabled = !trails.enabled;
                    info!(enabled = trails.enabled, "trails toggled");
                }
                Event::KeyDown {
                    keycode: Some(Keycode::A),
                    ..
                } => {
                    let trails = &mut config.players.trails;
                    trails.teleport_mode = match trails.teleport_mode {
                        TeleportMode::Tactical => TeleportMode::Analysis,
                        TeleportMode::Analysis => TeleportMode::Tactical,
                    };
                    info!(mode = ?trails.teleport_mode, "teleport display changed");
                }
                Event::KeyDown {
                    keycode: Some(Keycode::G),
                    ..
                } => {
                    config.players.gear_display = next_gear_mode(config.players.gear_display);
                    info!(mode = ?config.players.gear_display, "gear display changed");
                }
                Event::KeyDown {
                    keycode: Some(Keycode::D),
                    ..
                } => {
                    let show = !config.players.components.render_details;
                    config.players.components.render_details = show;
                    config.npcs.components.render_details = show;
                    info!(show, "details toggled");
                }
                Event::KeyDown {
                    keycode: Some(Keycode::F5),
                    ..
                } => match &settings {
                    Some(manager) => {
                        if let Err(err) = manager.save(&config) {
                            warn!(error = %err, "failed to save settings");
                        }
                    }
                    None => warn!("no settings directory, not saving"),
                },
                _ => {}
            }
        }

        let now_ms = clock.now_ms();
        scene.fill_frame(now_ms, &mut snapshots);

        canvas.set_draw_color(Color::RGB(24, 28, 36));
        canvas.clear();

        commands.clear();
        if let Some(camera) = scene.camera(now_ms) {
            let stats = pipeline.render_frame(&snapshots, &camera, viewport, &config, now_ms, &mut commands);
            if now_ms - last_stats_log >= STATS_INTERVAL_MS {
                last_stats_log = now_ms;
                info!(
                    rendered = stats.rendered,
                    culled = stats.culled(),
                    filtered = stats.filtered,
                    commands = commands.len(),
                    far_plane = pipeline.far_plane(),
                    "frame"
                );
            }
        }

        if let Err(err) = canvas::replay(&mut canvas, &commands) {
            warn!(error = %err, "draw failed");
        }
        canvas.present();

        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }

    info!("demo closed");
    Ok(())
}
