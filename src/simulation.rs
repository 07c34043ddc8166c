//! 沙盒模拟主循环
//!
//! 每帧按固定阶段推进，所有核心系统都必须注册到 `SandboxSet` 中：
//! 输入 → 运动学 → 目标拾取 → 挖掘 → 放置 → 后处理。
//! 渲染、相机、界面等设备相关插件只读取这些状态，并排在 `Post` 之后。

use bevy::prelude::*;

use crate::input::InputPlugin;
use crate::interaction::InteractionPlugin;
use crate::player::PlayerPlugin;
use crate::raycast::RaycastPlugin;
use crate::status::StatusPlugin;
use crate::voxel::VoxelPlugin;

/// 单帧最大模拟时长（秒），防止卡顿后一帧穿透地面
pub const MAX_TICK_SECS: f32 = 0.05;

/// 模拟系统执行顺序
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SandboxSet {
    /// 1. 消费输入边沿
    Input,
    /// 2. 玩家运动、地面吸附、瞄准射线
    Kinematics,
    /// 3. 沿瞄准射线拾取目标方块
    Targeting,
    /// 4. 挖掘计时与收获
    Mining,
    /// 5. 方块放置
    Placement,
    /// 6. 汇总状态快照
    Post,
}

/// 本帧模拟时长，截断到 `MAX_TICK_SECS`
pub fn tick_delta(time: &Time) -> f32 {
    time.delta_secs().clamp(0.0, MAX_TICK_SECS)
}

/// 核心模拟插件 - 不依赖窗口和渲染，可在无头环境中运行
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SandboxSet::Input,
                SandboxSet::Kinematics,
                SandboxSet::Targeting,
                SandboxSet::Mining,
                SandboxSet::Placement,
                SandboxSet::Post,
            )
                .chain(),
        )
        .add_plugins((
            VoxelPlugin,
            InputPlugin,
            PlayerPlugin,
            RaycastPlugin,
            InteractionPlugin,
            StatusPlugin,
        ));
    }
}
