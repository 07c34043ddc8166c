//! 体素世界的系统函数

use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::SandboxConfig;
use crate::voxel::change::BlockChange;
use crate::voxel::components::Voxel;
use crate::voxel::ivec3_to_vec3;
use crate::voxel::materials::BlockMaterials;
use crate::voxel::store::VoxelWorld;
use crate::voxel::terrain::{TerrainGenerator, TerrainSettings};

/// 已渲染方块实体表 - 以坐标为键的可丢弃投影
#[derive(Resource, Default)]
pub struct RenderedBlocks {
    pub map: HashMap<IVec3, Entity>,
}

/// 启动时生成世界
/// 只执行一次，之后世界只通过挖掘和放置改变
pub fn generate_world(
    config: Res<SandboxConfig>,
    settings: Res<TerrainSettings>,
    mut voxel_world: ResMut<VoxelWorld>,
) {
    config.log_summary();
    *voxel_world = TerrainGenerator::new(&config.seed, &settings).generate(config.world_size);
    info!("Terrain generated: {} blocks", voxel_world.len());
}

/// 根据变更日志同步方块实体
/// 新增方块生成立方体实体，移除方块销毁对应实体
pub fn sync_block_entities(
    mut commands: Commands,
    voxel_world: Res<VoxelWorld>,
    materials: Option<Res<BlockMaterials>>,
    mut rendered: ResMut<RenderedBlocks>,
) {
    let Some(materials) = materials else {
        return;
    };

    for change in voxel_world.changes() {
        // 同一坐标先移除旧实体，再按需生成新实体
        if let Some(entity) = rendered.map.remove(&change.pos()) {
            commands.entity(entity).despawn();
        }

        match *change {
            BlockChange::Added { pos, kind } => {
                let Some(material) = materials.material(kind) else {
                    warn!("No render material for {:?}", kind);
                    continue;
                };
                let entity = commands
                    .spawn((
                        Mesh3d(materials.cube.clone()),
                        MeshMaterial3d(material),
                        Transform::from_translation(ivec3_to_vec3(pos)),
                        Voxel,
                    ))
                    .id();
                rendered.map.insert(pos, entity);
            }
            BlockChange::Removed { pos, kind } => {
                debug!("Despawned {:?} block at {}", kind, pos);
            }
        }
    }
}
