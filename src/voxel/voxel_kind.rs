//! 体素（方块）类型定义

use bevy::prelude::*;

/// 体素种类枚举 - 定义游戏中所有可用的方块材质
///
/// 世界是稀疏存储的，空气不是一种材质：不存在的坐标就是空气。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VoxelKind {
    Grass,
    Dirt,
    Stone,
    Wood,
    Leaves,
}

/// 体素定义 - 包含体素的所有基础信息
#[derive(Debug, Clone, Copy)]
pub struct VoxelDef {
    /// 方块名称
    pub name: &'static str,
    /// 方块颜色
    pub color: Color,
    /// 挖掘所需时间（秒）
    pub mine_secs: f32,
}

impl VoxelKind {
    /// 所有材质，按快捷栏默认顺序排列
    pub const ALL: [VoxelKind; 5] = [
        VoxelKind::Grass,
        VoxelKind::Dirt,
        VoxelKind::Wood,
        VoxelKind::Stone,
        VoxelKind::Leaves,
    ];

    /// 获取当前体素种类的完整定义信息
    pub fn def(self) -> VoxelDef {
        match self {
            VoxelKind::Grass => VoxelDef {
                name: "grass",
                color: Color::srgb(0.29, 0.65, 0.27),
                mine_secs: 0.45,
            },
            VoxelKind::Dirt => VoxelDef {
                name: "dirt",
                color: Color::srgb(0.56, 0.37, 0.20),
                mine_secs: 0.35,
            },
            VoxelKind::Stone => VoxelDef {
                name: "stone",
                color: Color::srgb(0.54, 0.56, 0.60),
                mine_secs: 1.6,
            },
            VoxelKind::Wood => VoxelDef {
                name: "wood",
                color: Color::srgb(0.59, 0.40, 0.21),
                mine_secs: 0.9,
            },
            VoxelKind::Leaves => VoxelDef {
                name: "leaves",
                color: Color::srgb(0.22, 0.52, 0.20),
                mine_secs: 0.2,
            },
        }
    }

    /// 挖掘该材质所需的时间（秒）
    pub fn mining_duration(self) -> f32 {
        self.def().mine_secs
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }
}
