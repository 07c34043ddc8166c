use bevy::prelude::*;

use crate::simulation::SandboxSet;
use crate::voxel::{BLOCK_HALF_EXTENT, VoxelKind, VoxelWorld, ivec3_to_vec3};

/// 射线命中结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelHit {
    /// 被命中方块的坐标
    pub pos: IVec3,
    pub kind: VoxelKind,
    /// 被命中面的轴向单位法线
    pub normal: IVec3,
    /// 射线与方块表面的交点
    pub point: Vec3,
    pub distance: f32,
}

impl VoxelHit {
    /// 命中面外侧相邻的格子（放置方块的目标位置）
    pub fn adjacent(&self) -> IVec3 {
        self.pos + self.normal
    }
}

/// 当前瞄准射线 - 由视角推导，每帧在玩家移动后更新
#[derive(Resource, Debug, Clone, Copy)]
pub struct AimRay {
    pub origin: Vec3,
    /// 单位方向向量
    pub direction: Vec3,
    /// 最大拾取距离
    pub reach: f32,
}

impl Default for AimRay {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            reach: 8.0,
        }
    }
}

impl AimRay {
    /// 沿瞄准射线拾取方块
    pub fn pick(&self, world: &VoxelWorld) -> Option<VoxelHit> {
        pick(world, self.origin, self.direction, self.reach)
    }
}

#[derive(Resource, Default)]
pub struct HighlightState {
    pub current: Option<VoxelHit>,
}

pub struct RaycastPlugin;

impl Plugin for RaycastPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AimRay>()
            .init_resource::<HighlightState>()
            .add_systems(Update, raycast_voxels.in_set(SandboxSet::Targeting));
    }
}

/// 目标方块描边（需要渲染）
pub struct HighlightGizmoPlugin;

impl Plugin for HighlightGizmoPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, draw_highlight_gizmo.after(SandboxSet::Post));
    }
}

fn raycast_voxels(
    world: Res<VoxelWorld>,
    aim: Res<AimRay>,
    mut highlight: ResMut<HighlightState>,
) {
    let current = aim.pick(&world);
    if highlight.current != current {
        highlight.current = current;
    }
}

/// 射线与单个方块（轴对齐立方体）求交，使用 slab 算法
/// 返回进入距离和进入面的法线；起点位于方块内部时不算命中
pub fn intersect_block(origin: Vec3, dir: Vec3, pos: IVec3) -> Option<(f32, IVec3)> {
    let center = ivec3_to_vec3(pos);
    let min = center - Vec3::splat(BLOCK_HALF_EXTENT);
    let max = center + Vec3::splat(BLOCK_HALF_EXTENT);

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = IVec3::ZERO;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];

        // 射线与该轴平行：起点必须在 slab 内
        if d.abs() < 1e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_near {
            t_near = t0;
            normal = IVec3::ZERO;
            // 正向射线从最小面进入，法线指向负轴
            normal[axis] = if d > 0.0 { -1 } else { 1 };
        }
        t_far = t_far.min(t1);

        if t_near > t_far {
            return None;
        }
    }

    if t_near < 0.0 || normal == IVec3::ZERO {
        return None;
    }
    Some((t_near, normal))
}

/// 拾取射线命中的最近方块
///
/// DDA (Digital Differential Analyzer) 按格子顺序遍历射线经过的位置，
/// 在稀疏存储中查询，第一个命中的格子即最近的方块。
/// 方块以整数坐标为中心，因此先把起点平移半个方块再取整。
pub fn pick(world: &VoxelWorld, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<VoxelHit> {
    let dir = dir.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let shifted = origin + Vec3::splat(BLOCK_HALF_EXTENT);
    let start = shifted.floor().as_ivec3();
    let mut pos = start;

    // Direction to step in each axis
    let step = IVec3::new(
        if dir.x >= 0.0 { 1 } else { -1 },
        if dir.y >= 0.0 { 1 } else { -1 },
        if dir.z >= 0.0 { 1 } else { -1 },
    );

    // 沿射线穿过一个格子所需的距离
    let mut delta = Vec3::splat(f32::INFINITY);
    // 到下一个格子边界的距离
    let mut t_max = Vec3::splat(f32::INFINITY);
    for axis in 0..3 {
        if dir[axis].abs() < 1e-10 {
            continue;
        }
        delta[axis] = (1.0 / dir[axis]).abs();
        let boundary = if dir[axis] >= 0.0 {
            (pos[axis] + 1) as f32 - shifted[axis]
        } else {
            shifted[axis] - pos[axis] as f32
        };
        t_max[axis] = boundary * delta[axis];
    }

    let mut distance = 0.0;

    while distance <= max_dist {
        // 起点所在格子不参与命中（从方块内部发出的射线看不到它）
        if pos != start {
            if let Some(block) = world.get(pos) {
                if let Some((t, normal)) = intersect_block(origin, dir, pos) {
                    if t > max_dist {
                        return None;
                    }
                    return Some(VoxelHit {
                        pos,
                        kind: block.kind,
                        normal,
                        point: origin + dir * t,
                        distance: t,
                    });
                }
            }
        }

        // Move to next voxel (step along the axis with smallest t_max)
        let axis = if t_max.x < t_max.y && t_max.x < t_max.z {
            0
        } else if t_max.y < t_max.z {
            1
        } else {
            2
        };
        if !t_max[axis].is_finite() {
            break;
        }
        distance = t_max[axis];
        t_max[axis] += delta[axis];
        pos[axis] += step[axis];
    }

    None
}

fn draw_highlight_gizmo(mut gizmos: Gizmos, highlight: Res<HighlightState>) {
    if let Some(hit) = highlight.current {
        let center = ivec3_to_vec3(hit.pos);
        let transform = Transform::from_translation(center).with_scale(Vec3::splat(1.02));
        gizmos.cube(transform, Color::srgb(1.0, 0.95, 0.2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{TerrainGenerator, TerrainSettings, WorldSeed};

    /// 遍历全部方块求最近交点，作为 DDA 的对照
    fn pick_exhaustive(world: &VoxelWorld, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<IVec3> {
        let dir = dir.normalize();
        world
            .iter()
            .filter_map(|b| intersect_block(origin, dir, b.pos).map(|(t, _)| (t, b.pos)))
            .filter(|(t, _)| *t <= max_dist)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, pos)| pos)
    }

    #[test]
    fn test_pick_empty_world() {
        let world = VoxelWorld::new();
        assert!(pick(&world, Vec3::ZERO, Vec3::NEG_Y, 100.0).is_none());
    }

    #[test]
    fn test_pick_straight_down_hits_top_face() {
        let mut world = VoxelWorld::new();
        world.add(IVec3::new(0, 2, 0), VoxelKind::Stone);

        let hit = pick(&world, Vec3::new(0.0, 6.0, 0.0), Vec3::NEG_Y, 10.0).unwrap();
        assert_eq!(hit.pos, IVec3::new(0, 2, 0));
        assert_eq!(hit.kind, VoxelKind::Stone);
        assert_eq!(hit.normal, IVec3::Y);
        assert!((hit.distance - 3.5).abs() < 1e-4);
        assert!((hit.point.y - 2.5).abs() < 1e-4);
        assert_eq!(hit.adjacent(), IVec3::new(0, 3, 0));
    }

    #[test]
    fn test_pick_returns_nearest() {
        let mut world = VoxelWorld::new();
        world.add(IVec3::new(5, 0, 0), VoxelKind::Stone);
        world.add(IVec3::new(3, 0, 0), VoxelKind::Dirt);

        let hit = pick(&world, Vec3::ZERO, Vec3::X, 20.0).unwrap();
        assert_eq!(hit.pos, IVec3::new(3, 0, 0));
        assert_eq!(hit.normal, IVec3::NEG_X);
    }

    #[test]
    fn test_pick_respects_max_distance() {
        let mut world = VoxelWorld::new();
        world.add(IVec3::new(0, 0, -10), VoxelKind::Wood);

        assert!(pick(&world, Vec3::ZERO, Vec3::NEG_Z, 5.0).is_none());
        assert!(pick(&world, Vec3::ZERO, Vec3::NEG_Z, 10.0).is_some());
    }

    #[test]
    fn test_pick_ignores_block_containing_origin() {
        let mut world = VoxelWorld::new();
        world.add(IVec3::ZERO, VoxelKind::Leaves);
        world.add(IVec3::new(0, -2, 0), VoxelKind::Grass);

        let hit = pick(&world, Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Y, 10.0).unwrap();
        assert_eq!(hit.pos, IVec3::new(0, -2, 0));
    }

    #[test]
    fn test_intersect_block_side_face() {
        let (t, normal) = intersect_block(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, IVec3::ZERO).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert_eq!(normal, IVec3::Z);

        assert!(intersect_block(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z, IVec3::ZERO).is_none());
    }

    #[test]
    fn test_dda_matches_exhaustive_scan() {
        let settings = TerrainSettings::default();
        let world = TerrainGenerator::new(&WorldSeed::new(3), &settings).generate(10);

        let origins = [
            Vec3::new(0.3, 14.0, 0.2),
            Vec3::new(-4.7, 12.1, 6.6),
            Vec3::new(8.2, 9.5, -3.9),
        ];
        let dirs = [
            Vec3::new(0.3, -1.0, 0.1),
            Vec3::new(-0.6, -0.5, 0.7),
            Vec3::new(1.0, -0.2, -0.4),
            Vec3::new(0.0, -1.0, 0.0),
        ];

        for origin in origins {
            for dir in dirs {
                let fast = pick(&world, origin, dir, 30.0).map(|h| h.pos);
                let slow = pick_exhaustive(&world, origin, dir, 30.0);
                assert_eq!(fast, slow, "origin {:?} dir {:?}", origin, dir);
            }
        }
    }
}
