//! 材质系统

use bevy::prelude::*;
use std::collections::HashMap;

use crate::voxel::voxel_kind::VoxelKind;

/// 方块渲染资源 - 所有方块共享一个立方体网格，每种材质一个材质句柄
#[derive(Resource)]
pub struct BlockMaterials {
    /// 单位立方体网格
    pub cube: Handle<Mesh>,
    /// 每种方块材质对应的渲染材质
    pub by_kind: HashMap<VoxelKind, Handle<StandardMaterial>>,
}

impl BlockMaterials {
    /// 获取指定方块材质的渲染材质句柄
    pub fn material(&self, kind: VoxelKind) -> Option<Handle<StandardMaterial>> {
        self.by_kind.get(&kind).cloned()
    }
}

/// 初始化材质系统
/// 为每种方块创建一个高粗糙度的不透明材质
pub fn setup_materials(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cube = meshes.add(Cuboid::from_length(1.0));

    let by_kind = VoxelKind::ALL
        .iter()
        .map(|&kind| {
            let handle = materials.add(StandardMaterial {
                base_color: kind.def().color,
                perceptual_roughness: 0.9,
                ..default()
            });
            (kind, handle)
        })
        .collect();

    commands.insert_resource(BlockMaterials { cube, by_kind });
}
