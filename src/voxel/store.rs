//! 稀疏体素存储

use bevy::prelude::*;
use std::collections::HashMap;

use crate::voxel::change::BlockChange;
use crate::voxel::voxel_kind::VoxelKind;

/// 单个方块 - 由整数坐标标识，材质放置后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub pos: IVec3,
    pub kind: VoxelKind,
}

/// 体素世界 - 唯一的实体几何数据来源
///
/// `index` 把坐标映射到 `blocks` 中的下标，`blocks` 是供拾取和渲染遍历的
/// 连续序列。两者始终包含完全相同的成员：坐标存在于 `index` 中当且仅当
/// 该格子被实心方块占据。
#[derive(Resource, Debug, Default)]
pub struct VoxelWorld {
    index: HashMap<IVec3, usize>,
    blocks: Vec<Block>,
    /// 变更日志（用于渲染同步），每帧末尾清空
    changes: Vec<BlockChange>,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在指定坐标写入方块
    /// 如果坐标已被占据则不做任何事并返回 false（地形生成依赖这一点避免覆盖）
    pub fn add(&mut self, pos: IVec3, kind: VoxelKind) -> bool {
        if self.index.contains_key(&pos) {
            return false;
        }
        self.index.insert(pos, self.blocks.len());
        self.blocks.push(Block { pos, kind });
        self.changes.push(BlockChange::Added { pos, kind });
        true
    }

    /// 移除指定坐标的方块，返回被移除的方块
    /// 使用 swap_remove 保持 O(1)，并修正被换位方块的下标
    pub fn remove(&mut self, pos: IVec3) -> Option<Block> {
        let slot = self.index.remove(&pos)?;
        let removed = self.blocks.swap_remove(slot);
        if let Some(moved) = self.blocks.get(slot) {
            self.index.insert(moved.pos, slot);
        }
        self.changes.push(BlockChange::Removed {
            pos,
            kind: removed.kind,
        });
        Some(removed)
    }

    /// 获取指定坐标的方块
    pub fn get(&self, pos: IVec3) -> Option<Block> {
        self.index.get(&pos).map(|&slot| self.blocks[slot])
    }

    pub fn contains(&self, pos: IVec3) -> bool {
        self.index.contains_key(&pos)
    }

    /// 方块总数
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// 遍历所有方块（顺序无意义）
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// 自上次清空以来的变更记录
    pub fn changes(&self) -> &[BlockChange] {
        &self.changes
    }

    /// 清空变更日志
    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }
}

/// 清理变更日志系统
pub fn cleanup_changes_system(mut voxel_world: ResMut<VoxelWorld>) {
    if !voxel_world.changes().is_empty() {
        voxel_world.clear_changes();
    }
}
