//! 方块变更记录
//!
//! 存储每次增删方块时追加一条记录，渲染投影据此增量同步实体
use bevy::prelude::IVec3;

use super::voxel_kind::VoxelKind;

/// 单个方块的变更操作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockChange {
    /// 新方块写入
    Added { pos: IVec3, kind: VoxelKind },

    /// 方块被移除
    Removed { pos: IVec3, kind: VoxelKind },
}

impl BlockChange {
    /// 获取影响的方块坐标
    pub fn pos(&self) -> IVec3 {
        match self {
            BlockChange::Added { pos, .. } => *pos,
            BlockChange::Removed { pos, .. } => *pos,
        }
    }
}
