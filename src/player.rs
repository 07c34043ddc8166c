use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::input::{InputState, MoveFlags, PendingActions};
use crate::raycast::{AimRay, pick};
use crate::simulation::{MAX_TICK_SECS, SandboxSet, tick_delta};
use crate::ui::MenuState;
use crate::voxel::VoxelWorld;

#[derive(Component)]
pub struct PlayerCamera;

/// 玩家运动状态 - 只由运动学系统每帧修改一次
/// `position` 是眼睛位置，比脚下方块中心高 `eye_height`
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 12.0, 0.0),
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PlayerSettings {
    pub move_speed: f32,
    /// 水平速度阻尼系数
    pub drag: f32,
    /// 移动冲量倍率
    pub impulse_scale: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    /// 眼睛相对脚下方块中心的高度
    pub eye_height: f32,
    /// 落地判定容差
    pub ground_tolerance: f32,
    /// 落地探测射线起点的抬高量
    pub probe_lift: f32,
    /// 落地探测射线长度
    pub probe_reach: f32,
    /// 低于该高度视为掉出世界
    pub respawn_below: f32,
    pub spawn_point: Vec3,
    pub look_sensitivity: f32,
    /// 拾取方块的最大距离
    pub reach: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            move_speed: 10.0,
            drag: 10.0,
            impulse_scale: 10.0,
            gravity: 20.0,
            jump_speed: 7.5,
            eye_height: 1.9,
            ground_tolerance: 0.05,
            probe_lift: 0.2,
            probe_reach: 2.4,
            respawn_below: -10.0,
            spawn_point: Vec3::new(0.0, 14.0, 0.0),
            look_sensitivity: 0.0025,
            reach: 8.0,
        }
    }
}

impl PlayerState {
    /// 起跳，只有站在地面上时生效
    pub fn jump(&mut self, settings: &PlayerSettings) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity.y = settings.jump_speed;
        self.grounded = false;
        true
    }

    /// 推进一帧运动学
    ///
    /// 1. 水平阻尼与重力
    /// 2. 按偏航角把输入方向转到世界坐标并加速
    /// 3. 积分位置
    /// 4. 向下探测地面并吸附
    /// 5. 掉出世界时重生
    pub fn step(
        &mut self,
        dt: f32,
        movement: MoveFlags,
        yaw: f32,
        settings: &PlayerSettings,
        world: &VoxelWorld,
    ) {
        let dt = dt.clamp(0.0, MAX_TICK_SECS);

        self.velocity.x -= self.velocity.x * settings.drag * dt;
        self.velocity.z -= self.velocity.z * settings.drag * dt;
        self.velocity.y -= settings.gravity * dt;

        let direction = Quat::from_axis_angle(Vec3::Y, yaw) * movement.local_direction();
        let impulse = direction * settings.move_speed * dt * settings.impulse_scale;
        self.velocity.x += impulse.x;
        self.velocity.z += impulse.z;

        self.position += self.velocity * dt;

        self.probe_ground(settings, world);

        if self.position.y < settings.respawn_below {
            info!(
                "Player fell out of the world at {:.1}, respawning",
                self.position.y
            );
            self.position = settings.spawn_point;
            self.velocity = Vec3::ZERO;
            self.grounded = false;
        }
    }

    /// 从脚下略高处向下发射射线，命中方块顶部附近时吸附到站立高度
    fn probe_ground(&mut self, settings: &PlayerSettings, world: &VoxelWorld) {
        self.grounded = false;
        // 上升过程中不吸附
        if self.velocity.y > 0.0 {
            return;
        }

        let origin = self.position + Vec3::Y * settings.probe_lift;

        let Some(hit) = pick(world, origin, Vec3::NEG_Y, settings.probe_reach) else {
            return;
        };

        let stand_y = hit.pos.y as f32 + settings.eye_height;
        if self.position.y < stand_y + settings.ground_tolerance {
            self.position.y = stand_y;
            self.velocity.y = self.velocity.y.max(0.0);
            self.grounded = true;
        }
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSettings>()
            .init_resource::<PlayerState>()
            .add_systems(
                Update,
                (
                    (player_jump, player_move).run_if(input_focused),
                    update_aim_ray,
                )
                    .chain()
                    .in_set(SandboxSet::Kinematics),
            );
    }
}

/// 相机插件 - 第一人称相机跟随玩家，鼠标控制视角
pub struct PlayerCameraPlugin;

impl Plugin for PlayerCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_player)
            .add_systems(Update, player_look.before(SandboxSet::Input))
            .add_systems(Update, follow_player.after(SandboxSet::Post));
    }
}

fn input_focused(input: Res<InputState>) -> bool {
    input.focused
}

fn player_jump(
    mut pending: ResMut<PendingActions>,
    settings: Res<PlayerSettings>,
    mut player: ResMut<PlayerState>,
) {
    if std::mem::take(&mut pending.jump) {
        player.jump(&settings);
    }
}

fn player_move(
    time: Res<Time>,
    input: Res<InputState>,
    settings: Res<PlayerSettings>,
    world: Res<VoxelWorld>,
    mut player: ResMut<PlayerState>,
) {
    player.step(
        tick_delta(&time),
        input.movement,
        input.yaw,
        &settings,
        &world,
    );
}

/// 玩家移动后更新瞄准射线，挖掘和放置都基于这条射线
fn update_aim_ray(
    player: Res<PlayerState>,
    input: Res<InputState>,
    settings: Res<PlayerSettings>,
    mut aim: ResMut<AimRay>,
) {
    aim.origin = player.position;
    aim.direction = input.look_rotation() * Vec3::NEG_Z;
    aim.reach = settings.reach;
}

fn setup_player(
    mut commands: Commands,
    mut cursor_options: Single<&mut CursorOptions>,
    player: Res<PlayerState>,
    input: Res<InputState>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(player.position).with_rotation(input.look_rotation()),
        PlayerCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(25.0, 30.0, -18.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    cursor_options.grab_mode = CursorGrabMode::Locked;
    cursor_options.visible = false;
}

fn player_look(
    mouse_motion: Res<AccumulatedMouseMotion>,
    settings: Res<PlayerSettings>,
    menu_state: Res<MenuState>,
    mut input: ResMut<InputState>,
) {
    if menu_state.open {
        return;
    }
    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }
    input.yaw -= delta.x * settings.look_sensitivity;
    input.pitch = (input.pitch - delta.y * settings.look_sensitivity).clamp(-1.54, 1.54);
}

fn follow_player(
    player: Res<PlayerState>,
    input: Res<InputState>,
    mut query: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok(mut transform) = query.single_mut() else {
        return;
    };
    transform.translation = player.position;
    transform.rotation = input.look_rotation();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::VoxelKind;

    fn flat_world(top: i32) -> VoxelWorld {
        let mut world = VoxelWorld::new();
        for x in -3..=3 {
            for z in -3..=3 {
                for y in 0..=top {
                    world.add(IVec3::new(x, y, z), VoxelKind::Stone);
                }
            }
        }
        world
    }

    #[test]
    fn test_lands_on_block_top() {
        let world = flat_world(3);
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(0.0, 3.0 + 1.9, 0.0),
            velocity: Vec3::new(0.0, -4.0, 0.0),
            grounded: false,
        };

        player.step(0.016, MoveFlags::empty(), 0.0, &settings, &world);

        assert!(player.grounded);
        assert!(player.velocity.y >= 0.0);
        assert!((player.position.y - 4.9).abs() < 1e-5);
    }

    #[test]
    fn test_falls_when_above_tolerance() {
        let world = flat_world(3);
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(0.0, 6.0, 0.0),
            velocity: Vec3::ZERO,
            grounded: true,
        };

        player.step(0.016, MoveFlags::empty(), 0.0, &settings, &world);

        assert!(!player.grounded);
        assert!(player.velocity.y < 0.0);
        assert!(player.position.y < 6.0);
    }

    #[test]
    fn test_respawn_when_below_world() {
        let world = VoxelWorld::new();
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(3.0, -10.4, 2.0),
            velocity: Vec3::new(1.0, -2.0, 0.5),
            grounded: false,
        };

        player.step(0.05, MoveFlags::empty(), 0.0, &settings, &world);

        assert_eq!(player.position, settings.spawn_point);
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let settings = PlayerSettings::default();
        let mut player = PlayerState::default();
        assert!(!player.jump(&settings));
        assert_eq!(player.velocity.y, 0.0);

        player.grounded = true;
        assert!(player.jump(&settings));
        assert_eq!(player.velocity.y, settings.jump_speed);
        assert!(!player.grounded);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let world = flat_world(3);
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(0.0, 4.9, 0.0),
            velocity: Vec3::ZERO,
            grounded: true,
        };

        player.jump(&settings);
        for _ in 0..3 {
            player.step(0.016, MoveFlags::empty(), 0.0, &settings, &world);
        }
        assert!(player.position.y > 4.9 + settings.ground_tolerance);
        assert!(!player.grounded);
    }

    #[test]
    fn test_jump_leaves_ground_at_high_frame_rate() {
        let world = flat_world(3);
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(0.0, 4.9, 0.0),
            velocity: Vec3::ZERO,
            grounded: true,
        };
        let dt = 1.0 / 240.0;

        player.jump(&settings);
        player.step(dt, MoveFlags::empty(), 0.0, &settings, &world);
        assert!(!player.grounded);
        assert!(player.position.y > 4.9);

        for _ in 0..20 {
            player.step(dt, MoveFlags::empty(), 0.0, &settings, &world);
        }
        assert!(player.position.y > 4.9 + settings.ground_tolerance);
        assert!(!player.grounded);
    }

    #[test]
    fn test_forward_follows_yaw() {
        let world = flat_world(0);
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(0.0, 1.9, 0.0),
            ..default()
        };

        // 偏航 90° 时前方为 -X
        player.step(0.05, MoveFlags::FORWARD, std::f32::consts::FRAC_PI_2, &settings, &world);

        assert!(player.position.x < 0.0);
        assert!(player.position.z.abs() < 1e-4);
        assert!(player.grounded);
    }

    #[test]
    fn test_large_dt_is_clamped() {
        let world = VoxelWorld::new();
        let settings = PlayerSettings::default();
        let mut clamped = PlayerState::default();
        let mut reference = PlayerState::default();

        clamped.step(1.0, MoveFlags::empty(), 0.0, &settings, &world);
        reference.step(MAX_TICK_SECS, MoveFlags::empty(), 0.0, &settings, &world);

        assert_eq!(clamped, reference);
    }

    #[test]
    fn test_horizontal_velocity_decays() {
        let world = flat_world(0);
        let settings = PlayerSettings::default();
        let mut player = PlayerState {
            position: Vec3::new(0.0, 1.9, 0.0),
            velocity: Vec3::new(4.0, 0.0, 0.0),
            grounded: true,
        };

        player.step(0.02, MoveFlags::empty(), 0.0, &settings, &world);
        assert!(player.velocity.x < 4.0 && player.velocity.x > 0.0);
    }
}
