//! 体素相关组件

use bevy::prelude::*;

/// 体素标记组件 - 标记渲染投影中代表某个方块的实体
/// 实体只是存储的派生视图，方块的存在与材质以 VoxelWorld 为准，
/// 坐标到实体的映射保存在 `RenderedBlocks` 中
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Voxel;
