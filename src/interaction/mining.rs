//! 挖掘进度状态机
//!
//! 状态：`Idle` 与 `Mining { target, kind, elapsed }`
//!
//! - Idle → Mining：按下挖掘且目标不是基岩
//! - Mining → Mining：每帧重新拾取，目标改变时计时归零并重新绑定
//! - Mining → Idle：松开、失去焦点、丢失目标或挖掘完成
//!
//! 计时达到所需时间时移除方块并入账一次，之后立即回到 Idle。

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::InteractionError;
use super::inventory::Inventory;
use crate::raycast::VoxelHit;
use crate::voxel::{BEDROCK_LEVEL, VoxelKind, VoxelWorld};

/// 挖掘时间策略
/// 未在表中覆盖的材质使用材质定义中的默认时间
#[derive(Resource, Debug, Clone, Default)]
pub struct MiningPolicy {
    pub overrides: BTreeMap<VoxelKind, f32>,
}

impl MiningPolicy {
    /// 挖掘指定材质所需的秒数
    pub fn required(&self, kind: VoxelKind) -> f32 {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.mining_duration())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MiningState {
    #[default]
    Idle,
    Mining {
        target: IVec3,
        /// 开始挖掘时的材质快照
        kind: VoxelKind,
        elapsed: f32,
    },
}

/// 挖掘完成的方块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinedBlock {
    pub pos: IVec3,
    pub kind: VoxelKind,
}

#[derive(Resource, Debug, Default)]
pub struct MiningSession {
    state: MiningState,
}

/// 基岩层及以下不可挖掘
pub fn ensure_minable(pos: IVec3) -> Result<(), InteractionError> {
    if pos.y <= BEDROCK_LEVEL {
        return Err(InteractionError::BedrockProtected(pos));
    }
    Ok(())
}

/// 移除方块并入账
/// 世界与背包在同一次调用中一起修改
pub fn harvest(
    world: &mut VoxelWorld,
    inventory: &mut Inventory,
    pos: IVec3,
) -> Result<MinedBlock, InteractionError> {
    ensure_minable(pos)?;
    let block = world.remove(pos).ok_or(InteractionError::NoTarget)?;
    inventory.credit(block.kind, 1);
    Ok(MinedBlock {
        pos,
        kind: block.kind,
    })
}

impl MiningSession {
    pub fn state(&self) -> MiningState {
        self.state
    }

    pub fn is_mining(&self) -> bool {
        matches!(self.state, MiningState::Mining { .. })
    }

    /// 按下挖掘
    pub fn start(&mut self, hit: Option<&VoxelHit>) -> Result<(), InteractionError> {
        let hit = hit.ok_or(InteractionError::NoTarget)?;
        ensure_minable(hit.pos)?;
        self.state = MiningState::Mining {
            target: hit.pos,
            kind: hit.kind,
            elapsed: 0.0,
        };
        Ok(())
    }

    /// 取消挖掘，不产生任何奖励
    pub fn cancel(&mut self) {
        self.state = MiningState::Idle;
    }

    /// 推进一帧
    /// `hit` 是本帧重新拾取的结果；完成时返回被挖掉的方块
    pub fn tick(
        &mut self,
        dt: f32,
        hit: Option<&VoxelHit>,
        policy: &MiningPolicy,
        world: &mut VoxelWorld,
        inventory: &mut Inventory,
    ) -> Option<MinedBlock> {
        let MiningState::Mining {
            target,
            kind,
            elapsed,
        } = self.state
        else {
            return None;
        };

        let Some(hit) = hit else {
            self.cancel();
            return None;
        };

        // 目标改变：计时归零并重新绑定；新目标不可挖则回到 Idle
        let (target, kind, elapsed) = if hit.pos != target {
            if ensure_minable(hit.pos).is_err() {
                self.cancel();
                return None;
            }
            (hit.pos, hit.kind, 0.0)
        } else {
            (target, kind, elapsed)
        };

        let elapsed = elapsed + dt.max(0.0);
        if elapsed < policy.required(kind) {
            self.state = MiningState::Mining {
                target,
                kind,
                elapsed,
            };
            return None;
        }

        self.state = MiningState::Idle;
        match harvest(world, inventory, target) {
            Ok(mined) => Some(mined),
            Err(err) => {
                debug!("Mining finished without a block: {}", err);
                None
            }
        }
    }

    /// 当前挖掘目标的材质与进度 `min(1, elapsed / required)`
    pub fn progress(&self, policy: &MiningPolicy) -> Option<(VoxelKind, f32)> {
        match self.state {
            MiningState::Idle => None,
            MiningState::Mining { kind, elapsed, .. } => {
                let required = policy.required(kind);
                let fraction = if required > 0.0 {
                    (elapsed / required).min(1.0)
                } else {
                    1.0
                };
                Some((kind, fraction))
            }
        }
    }
}
