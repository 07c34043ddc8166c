//! 体素系统插件

use bevy::prelude::*;

use crate::config::SandboxConfig;
use crate::simulation::SandboxSet;
use crate::voxel::materials::setup_materials;
use crate::voxel::store::{VoxelWorld, cleanup_changes_system};
use crate::voxel::systems::{RenderedBlocks, generate_world, sync_block_entities};
use crate::voxel::terrain::TerrainSettings;

/// 体素系统插件 - 负责注册体素相关的资源并在启动时生成世界
pub struct VoxelPlugin;

impl Plugin for VoxelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VoxelWorld>()
            .init_resource::<SandboxConfig>()
            .init_resource::<TerrainSettings>()
            .add_systems(Startup, generate_world)
            // 变更日志在一帧的最后清空，保证渲染同步能看到本帧所有变更
            .add_systems(Last, cleanup_changes_system);
    }
}

/// 方块渲染插件 - 把存储投影为立方体实体
pub struct VoxelRenderPlugin;

impl Plugin for VoxelRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RenderedBlocks>()
            .add_systems(Startup, setup_materials)
            .add_systems(Update, sync_block_entities.after(SandboxSet::Post));
    }
}
