//! 方块交互模块
//!
//! - **inventory**: 背包计数与快捷栏
//! - **mining**: 挖掘进度状态机
//! - **placement**: 方块放置
//!
//! 所有失败都是局部的拒绝，以 `InteractionError` 返回，不会中断模拟循环。

use bevy::prelude::*;

pub mod inventory;
pub mod mining;
pub mod placement;

pub use inventory::{Hotbar, Inventory, InventoryError};
pub use mining::{MinedBlock, MiningPolicy, MiningSession, MiningState};
pub use placement::place_block;

use crate::input::{InputState, PendingActions};
use crate::player::PlayerState;
use crate::raycast::{AimRay, HighlightState};
use crate::simulation::{SandboxSet, tick_delta};
use crate::voxel::{VoxelKind, VoxelWorld};

/// 交互被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
    #[error("no block targeted")]
    NoTarget,
    #[error("no {0:?} left to place")]
    OutOfStock(VoxelKind),
    #[error("cell {0} is already occupied")]
    CellOccupied(IVec3),
    #[error("cell {0} overlaps the player")]
    WouldIntersectPlayer(IVec3),
    #[error("block at {0} is bedrock")]
    BedrockProtected(IVec3),
}

/// 最近一次被拒绝的交互（供状态栏显示）
#[derive(Resource, Debug, Default)]
pub struct LastRejection(pub Option<InteractionError>);

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Inventory>()
            .init_resource::<Hotbar>()
            .init_resource::<MiningSession>()
            .init_resource::<MiningPolicy>()
            .init_resource::<LastRejection>()
            .add_systems(Update, mining_system.in_set(SandboxSet::Mining))
            .add_systems(Update, placement_system.in_set(SandboxSet::Placement));
    }
}

/// 挖掘系统
/// 先处理按下/松开边沿，再用本帧刚更新的目标推进计时
#[allow(clippy::too_many_arguments)]
fn mining_system(
    time: Res<Time>,
    input: Res<InputState>,
    mut pending: ResMut<PendingActions>,
    highlight: Res<HighlightState>,
    policy: Res<MiningPolicy>,
    mut session: ResMut<MiningSession>,
    mut world: ResMut<VoxelWorld>,
    mut inventory: ResMut<Inventory>,
    mut rejection: ResMut<LastRejection>,
) {
    let edge = pending.mine.take();

    // 失去焦点立即取消，不给部分奖励
    if !input.focused {
        if session.is_mining() {
            debug!("Mining cancelled: input focus lost");
            session.cancel();
        }
        return;
    }

    match edge {
        Some(true) => {
            if let Err(err) = session.start(highlight.current.as_ref()) {
                debug!("Mining rejected: {}", err);
                rejection.0 = Some(err);
            }
        }
        Some(false) => session.cancel(),
        None => {}
    }

    let dt = tick_delta(&time);
    if let Some(mined) = session.tick(
        dt,
        highlight.current.as_ref(),
        &policy,
        &mut world,
        &mut inventory,
    ) {
        debug!("Mined {:?} at {}", mined.kind, mined.pos);
        rejection.0 = None;
    }
}

/// 放置系统 - 每次放置输入只处理一次
#[allow(clippy::too_many_arguments)]
fn placement_system(
    input: Res<InputState>,
    mut pending: ResMut<PendingActions>,
    aim: Res<AimRay>,
    hotbar: Res<Hotbar>,
    player: Res<PlayerState>,
    mut world: ResMut<VoxelWorld>,
    mut inventory: ResMut<Inventory>,
    mut rejection: ResMut<LastRejection>,
) {
    if !std::mem::take(&mut pending.place) || !input.focused {
        return;
    }
    let Some(kind) = hotbar.selected_kind() else {
        return;
    };

    // 挖掘可能刚刚移除了方块，重新拾取以免使用过期的目标
    let hit = aim.pick(&world);
    match place_block(&mut world, &mut inventory, hit.as_ref(), kind, player.position) {
        Ok(pos) => {
            debug!("Placed {:?} at {}", kind, pos);
            rejection.0 = None;
        }
        Err(err) => {
            debug!("Placement rejected: {}", err);
            rejection.0 = Some(err);
        }
    }
}
