mod config;
mod input;
mod interaction;
mod player;
mod raycast;
mod simulation;
mod status;
mod ui;
mod voxel;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use config::SandboxConfig;
use input::DeviceInputPlugin;
use player::PlayerCameraPlugin;
use raycast::HighlightGizmoPlugin;
use simulation::SimulationPlugin;
use ui::UiPlugin;
use voxel::VoxelRenderPlugin;

const SKY_COLOR: Color = Color::srgb(0.482, 0.706, 0.957);

fn main() {
    // 命令行参数优先于环境变量
    let config = SandboxConfig::from_env();

    App::new()
        .insert_resource(config)
        .insert_resource(ClearColor(SKY_COLOR))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Voxcraft".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            SimulationPlugin,
            VoxelRenderPlugin,
            HighlightGizmoPlugin,
            DeviceInputPlugin,
            PlayerCameraPlugin,
            UiPlugin,
            FrameTimeDiagnosticsPlugin::default(),
        ))
        .add_systems(Startup, print_controls)
        .run();
}

fn print_controls() {
    println!("=== Voxcraft Controls ===");
    println!("  WASD       - Move");
    println!("  Space      - Jump");
    println!("  Mouse      - Look around");
    println!("  Left hold  - Mine targeted block");
    println!("  Right      - Place selected block");
    println!("  1-5        - Select hotbar slot");
    println!("  Esc        - Pause menu");
}
