//! 背包与快捷栏

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::voxel::VoxelKind;

/// 背包错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("not enough {kind:?}: requested {requested}, have {available}")]
    InsufficientStock {
        kind: VoxelKind,
        requested: u32,
        available: u32,
    },
}

/// 背包 - 每种材质一个非负计数
///
/// 只有挖掘完成（入账）和放置成功（出账）会修改它
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: BTreeMap<VoxelKind, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前数量，从未入账的材质为 0
    pub fn count(&self, kind: VoxelKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// 入账
    pub fn credit(&mut self, kind: VoxelKind, n: u32) {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(n);
    }

    /// 出账
    /// 库存不足时整笔拒绝，不做部分扣减
    pub fn debit(&mut self, kind: VoxelKind, n: u32) -> Result<(), InventoryError> {
        let available = self.count(kind);
        if available < n {
            return Err(InventoryError::InsufficientStock {
                kind,
                requested: n,
                available,
            });
        }
        self.counts.insert(kind, available - n);
        Ok(())
    }
}

/// 快捷栏 - 固定长度的可放置材质列表
#[derive(Resource, Debug, Clone)]
pub struct Hotbar {
    slots: Vec<VoxelKind>,
    selected: usize,
}

impl Default for Hotbar {
    fn default() -> Self {
        Self::new(VoxelKind::ALL.to_vec())
    }
}

impl Hotbar {
    pub fn new(slots: Vec<VoxelKind>) -> Self {
        Self { slots, selected: 0 }
    }

    /// 选择快捷栏格子，越界的选择被忽略并返回 false
    pub fn select(&mut self, slot: usize) -> bool {
        if slot < self.slots.len() {
            self.selected = slot;
            true
        } else {
            false
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// 当前选中的材质
    pub fn selected_kind(&self) -> Option<VoxelKind> {
        self.slots.get(self.selected).copied()
    }

    pub fn slots(&self) -> &[VoxelKind] {
        &self.slots
    }
}
