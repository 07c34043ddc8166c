//! 地形生成器

use bevy::prelude::*;
use rand::Rng;

use crate::voxel::seed::WorldSeed;
use crate::voxel::store::VoxelWorld;
use crate::voxel::voxel_kind::VoxelKind;

/// 地形生成参数
#[derive(Resource, Debug, Clone)]
pub struct TerrainSettings {
    /// 次表层（深度 2-3）出现泥土的概率
    pub dirt_chance: f64,
    /// 每列生成树木的概率
    pub tree_chance: f64,
    /// 只有高度大于该值的列才会长树
    pub tree_min_height: i32,
    /// 草皮下方是否紧贴一层石头（深度 1 固定为石头）
    pub stone_cap: bool,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            dirt_chance: 0.22,
            tree_chance: 0.015,
            tree_min_height: 4,
            stone_cap: true,
        }
    }
}

/// 计算指定列的地形高度
/// 三层正余弦波叠加，纯函数：同样的输入永远得到同样的结果
pub fn height_at(x: i32, z: i32) -> i32 {
    let fx = x as f64;
    let fz = z as f64;

    // 沿 X 方向的起伏
    let n1 = (fx * 0.23).sin() * 1.5;
    // 沿 Z 方向的起伏
    let n2 = (fz * 0.21).cos() * 1.3;
    // 对角方向的大尺度起伏
    let n3 = ((fx + fz) * 0.08).sin() * 2.0;

    (5.0 + n1 + n2 + n3).floor() as i32
}

/// 地形生成器 - 在启动时一次性生成有限大小的世界
pub struct TerrainGenerator<'a> {
    seed: &'a WorldSeed,
    settings: &'a TerrainSettings,
}

impl<'a> TerrainGenerator<'a> {
    /// 创建新的地形生成器
    pub fn new(seed: &'a WorldSeed, settings: &'a TerrainSettings) -> Self {
        Self { seed, settings }
    }

    /// 根据距地表深度选择方块材质
    /// - 深度 0：草方块
    /// - 深度 1：石头（stone_cap 开启时）
    /// - 深度 1-3：按概率为泥土，否则石头
    /// - 更深：石头
    pub fn material_at_depth(&self, depth: i32, rng: &mut impl Rng) -> VoxelKind {
        match depth {
            0 => VoxelKind::Grass,
            1 if self.settings.stone_cap => VoxelKind::Stone,
            1..=3 if rng.gen_bool(self.settings.dirt_chance) => VoxelKind::Dirt,
            _ => VoxelKind::Stone,
        }
    }

    /// 生成 [-size, size]² 范围内的完整世界
    /// 生成步骤：
    /// 1. 按高度从 y=0 填充每一列
    /// 2. 按概率在较高的列上生成树木
    pub fn generate(&self, size: i32) -> VoxelWorld {
        let mut world = VoxelWorld::new();
        let mut rng = self.seed.rng();

        for x in -size..=size {
            for z in -size..=size {
                let height = height_at(x, z);

                for y in 0..=height {
                    let kind = self.material_at_depth(height - y, &mut rng);
                    world.add(IVec3::new(x, y, z), kind);
                }

                if rng.gen_bool(self.settings.tree_chance)
                    && height > self.settings.tree_min_height
                {
                    self.generate_tree(&mut world, x, height, z, &mut rng);
                }
            }
        }

        world
    }

    /// 在指定列的地表上生成一棵树
    /// 树干高 3 或 4，树冠为三层菱形；已被占据的格子保持不变
    fn generate_tree(
        &self,
        world: &mut VoxelWorld,
        x: i32,
        ground: i32,
        z: i32,
        rng: &mut impl Rng,
    ) {
        let trunk_h: i32 = rng.gen_range(3..=4);

        // 生成树干
        for dy in 1..=trunk_h {
            world.add(IVec3::new(x, ground + dy, z), VoxelKind::Wood);
        }

        // 生成树叶
        for lx in -2..=2_i32 {
            for lz in -2..=2_i32 {
                // 使用曼哈顿距离创建菱形树冠
                if lx.abs() + lz.abs() >= 4 {
                    continue;
                }
                for ly in trunk_h - 1..=trunk_h + 1 {
                    world.add(IVec3::new(x + lx, ground + ly, z + lz), VoxelKind::Leaves);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sorted_blocks(world: &VoxelWorld) -> Vec<(i32, i32, i32, VoxelKind)> {
        let mut blocks: Vec<_> = world
            .iter()
            .map(|b| (b.pos.x, b.pos.y, b.pos.z, b.kind))
            .collect();
        blocks.sort();
        blocks
    }

    #[test]
    fn test_height_is_pure() {
        for x in -30..30 {
            for z in -30..30 {
                assert_eq!(height_at(x, z), height_at(x, z));
            }
        }
        // floor(5 + 0 + 1.3 + 0)
        assert_eq!(height_at(0, 0), 6);
    }

    #[test]
    fn test_height_never_below_bedrock() {
        for x in -100..100 {
            for z in -100..100 {
                assert!(height_at(x, z) >= 0);
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic_for_seed() {
        let seed = WorldSeed::new(42);
        let settings = TerrainSettings::default();
        let a = TerrainGenerator::new(&seed, &settings).generate(8);
        let b = TerrainGenerator::new(&seed, &settings).generate(8);
        assert_eq!(sorted_blocks(&a), sorted_blocks(&b));
    }

    #[test]
    fn test_columns_are_filled_down_to_bedrock() {
        let seed = WorldSeed::new(1);
        let settings = TerrainSettings {
            tree_chance: 0.0,
            ..default()
        };
        let size = 6;
        let world = TerrainGenerator::new(&seed, &settings).generate(size);

        let mut expected = 0;
        for x in -size..=size {
            for z in -size..=size {
                let h = height_at(x, z);
                expected += (h + 1) as usize;
                for y in 0..=h {
                    assert!(world.contains(IVec3::new(x, y, z)));
                }
                assert!(!world.contains(IVec3::new(x, h + 1, z)));
                assert_eq!(
                    world.get(IVec3::new(x, h, z)).map(|b| b.kind),
                    Some(VoxelKind::Grass)
                );
                if h >= 1 {
                    assert_eq!(
                        world.get(IVec3::new(x, h - 1, z)).map(|b| b.kind),
                        Some(VoxelKind::Stone)
                    );
                }
            }
        }
        assert_eq!(world.len(), expected);
    }

    #[test]
    fn test_non_random_shape_is_seed_independent() {
        let settings = TerrainSettings {
            tree_chance: 0.0,
            ..default()
        };
        let a = TerrainGenerator::new(&WorldSeed::new(1), &settings).generate(5);
        let b = TerrainGenerator::new(&WorldSeed::new(2), &settings).generate(5);

        let keys_a: HashSet<IVec3> = a.iter().map(|b| b.pos).collect();
        let keys_b: HashSet<IVec3> = b.iter().map(|b| b.pos).collect();
        assert_eq!(keys_a, keys_b);
    }

    #[test]
    fn test_dirt_only_in_subsurface_band() {
        let settings = TerrainSettings {
            dirt_chance: 1.0,
            tree_chance: 0.0,
            ..default()
        };
        let world = TerrainGenerator::new(&WorldSeed::default(), &settings).generate(6);
        for block in world.iter().filter(|b| b.kind == VoxelKind::Dirt) {
            let depth = height_at(block.pos.x, block.pos.z) - block.pos.y;
            assert!((2..=3).contains(&depth), "dirt at depth {}", depth);
        }
    }

    #[test]
    fn test_without_stone_cap_dirt_may_touch_grass() {
        let settings = TerrainSettings {
            dirt_chance: 1.0,
            tree_chance: 0.0,
            stone_cap: false,
            ..default()
        };
        let seed = WorldSeed::default();
        let generator = TerrainGenerator::new(&seed, &settings);
        let mut rng = WorldSeed::default().rng();
        assert_eq!(generator.material_at_depth(1, &mut rng), VoxelKind::Dirt);
        assert_eq!(generator.material_at_depth(4, &mut rng), VoxelKind::Stone);
    }

    #[test]
    fn test_trees_stand_on_tall_columns() {
        let settings = TerrainSettings {
            tree_chance: 1.0,
            ..default()
        };
        let world = TerrainGenerator::new(&WorldSeed::default(), &settings).generate(10);

        let wood: Vec<_> = world.iter().filter(|b| b.kind == VoxelKind::Wood).collect();
        assert!(!wood.is_empty());
        assert!(world.iter().any(|b| b.kind == VoxelKind::Leaves));

        for block in wood {
            let h = height_at(block.pos.x, block.pos.z);
            assert!(h > settings.tree_min_height);
            assert!(block.pos.y > h && block.pos.y <= h + 4);
        }
    }
}
