//! 状态快照
//!
//! 每帧在 `SandboxSet::Post` 阶段汇总一次，界面只读取这里的数据。

use bevy::prelude::*;

use crate::interaction::{Hotbar, Inventory, InteractionError, LastRejection, MiningPolicy, MiningSession};
use crate::player::PlayerState;
use crate::raycast::HighlightState;
use crate::simulation::SandboxSet;
use crate::voxel::{VoxelKind, VoxelWorld};

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SandboxStatus {
    pub block_count: usize,
    pub selected_slot: usize,
    pub selected_kind: Option<VoxelKind>,
    /// 按快捷栏顺序排列的库存
    pub inventory: Vec<(VoxelKind, u32)>,
    /// 正在挖掘的材质和进度 [0, 1]
    pub mining: Option<(VoxelKind, f32)>,
    /// 当前注视的方块
    pub target: Option<(IVec3, VoxelKind)>,
    pub player_position: Vec3,
    pub grounded: bool,
    pub last_rejection: Option<InteractionError>,
}

impl SandboxStatus {
    /// 状态栏文本
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Blocks: {}", self.block_count));

        let slots: Vec<String> = self
            .inventory
            .iter()
            .enumerate()
            .map(|(i, (kind, count))| {
                let marker = if i == self.selected_slot { ">" } else { " " };
                format!("{}{} {} x{}", marker, i + 1, kind.name(), count)
            })
            .collect();
        lines.push(slots.join("  "));

        match self.target {
            Some((pos, kind)) => lines.push(format!(
                "Target: {} ({}, {}, {})",
                kind.name(),
                pos.x,
                pos.y,
                pos.z
            )),
            None => lines.push("Target: none".to_string()),
        }

        if let Some((kind, progress)) = self.mining {
            lines.push(format!("Mining {}: {:.0}%", kind.name(), progress * 100.0));
        }

        let p = self.player_position;
        lines.push(format!(
            "Position: ({:.1}, {:.1}, {:.1}){}",
            p.x,
            p.y,
            p.z,
            if self.grounded { "" } else { " airborne" }
        ));

        if let Some(err) = &self.last_rejection {
            lines.push(format!("Rejected: {}", err));
        }

        lines.join("\n")
    }
}

pub struct StatusPlugin;

impl Plugin for StatusPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SandboxStatus>()
            .add_systems(Update, publish_status.in_set(SandboxSet::Post));
    }
}

#[allow(clippy::too_many_arguments)]
fn publish_status(
    world: Res<VoxelWorld>,
    hotbar: Res<Hotbar>,
    inventory: Res<Inventory>,
    session: Res<MiningSession>,
    policy: Res<MiningPolicy>,
    highlight: Res<HighlightState>,
    player: Res<PlayerState>,
    rejection: Res<LastRejection>,
    mut status: ResMut<SandboxStatus>,
) {
    let next = SandboxStatus {
        block_count: world.len(),
        selected_slot: hotbar.selected(),
        selected_kind: hotbar.selected_kind(),
        inventory: hotbar
            .slots()
            .iter()
            .map(|kind| (*kind, inventory.count(*kind)))
            .collect(),
        mining: session.progress(&policy),
        target: highlight.current.map(|hit| (hit.pos, hit.kind)),
        player_position: player.position,
        grounded: player.grounded,
        last_rejection: rejection.0,
    };

    // 只在变化时写入，避免每帧触发变更检测
    status.set_if_neq(next);
}
