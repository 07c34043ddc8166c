//! 体素世界常量定义

/// 默认世界半径（单位：方块）- 地形覆盖 [-size, size]² 的所有列
pub const DEFAULT_WORLD_SIZE: i32 = 24;

/// 基岩层高度 - 该层及以下的方块永远不能被挖掘
pub const BEDROCK_LEVEL: i32 = 0;

/// 方块半边长 - 方块以整数坐标为中心，占据 [c - 0.5, c + 0.5]
pub const BLOCK_HALF_EXTENT: f32 = 0.5;
