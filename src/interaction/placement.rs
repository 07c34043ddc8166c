//! 方块放置

use bevy::prelude::*;

use super::InteractionError;
use super::inventory::Inventory;
use crate::raycast::VoxelHit;
use crate::voxel::{VoxelKind, VoxelWorld};

/// 判断格子是否与玩家身体重叠
/// 玩家位置是眼睛高度，身体向下约两格
pub fn overlaps_player(cell: IVec3, player_pos: Vec3) -> bool {
    (cell.x as f32 - player_pos.x).abs() < 1.0
        && (cell.y as f32 - player_pos.y).abs() < 2.0
        && (cell.z as f32 - player_pos.z).abs() < 1.0
}

/// 在命中面外侧放置一个选中的方块
///
/// 检查顺序（第一个失败的条件决定拒绝原因）：
/// 1. 必须有命中目标
/// 2. 选中材质库存大于 0
/// 3. 目标格子为空
/// 4. 目标格子不与玩家重叠
///
/// 成功时背包扣 1 并写入方块，两者在同一次调用中完成。
pub fn place_block(
    world: &mut VoxelWorld,
    inventory: &mut Inventory,
    hit: Option<&VoxelHit>,
    kind: VoxelKind,
    player_pos: Vec3,
) -> Result<IVec3, InteractionError> {
    let hit = hit.ok_or(InteractionError::NoTarget)?;

    if inventory.count(kind) == 0 {
        return Err(InteractionError::OutOfStock(kind));
    }

    let dest = hit.adjacent();
    if world.contains(dest) {
        return Err(InteractionError::CellOccupied(dest));
    }
    if overlaps_player(dest, player_pos) {
        return Err(InteractionError::WouldIntersectPlayer(dest));
    }

    inventory
        .debit(kind, 1)
        .map_err(|_| InteractionError::OutOfStock(kind))?;
    world.add(dest, kind);
    Ok(dest)
}
