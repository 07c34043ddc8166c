//! 体素世界模块
//!
//! 这个模块包含了体素沙盒的世界部分，包括：
//!
//! - **constants**: 常量定义（默认世界大小、基岩层等）
//! - **voxel_kind**: 体素类型定义（方块种类、颜色、挖掘时间）
//! - **seed**: 世界种子与随机数生成器
//! - **store**: 稀疏方块存储（坐标映射 + 遍历序列）
//! - **change**: 方块变更记录
//! - **terrain**: 地形生成器（高度函数、分层材质、树木）
//! - **systems**: ECS系统函数（世界生成、渲染同步）
//! - **materials**: 渲染材质
//! - **components**: 体素相关组件
//! - **plugin**: Bevy插件

pub mod change;
pub mod components;
pub mod constants;
pub mod materials;
pub mod plugin;
pub mod seed;
pub mod store;
pub mod systems;
pub mod terrain;
pub mod voxel_kind;

// 重新导出常用类型，方便外部使用
pub use change::BlockChange;
pub use constants::{BEDROCK_LEVEL, BLOCK_HALF_EXTENT, DEFAULT_WORLD_SIZE};
pub use plugin::{VoxelPlugin, VoxelRenderPlugin};
pub use seed::WorldSeed;
pub use store::{Block, VoxelWorld};
pub use terrain::{TerrainGenerator, TerrainSettings, height_at};
pub use voxel_kind::{VoxelDef, VoxelKind};

// ============================================================================
// 辅助函数
// ============================================================================

use bevy::prelude::*;

/// 将整数向量转换为浮点向量（辅助函数）
pub fn ivec3_to_vec3(pos: IVec3) -> Vec3 {
    Vec3::new(pos.x as f32, pos.y as f32, pos.z as f32)
}
