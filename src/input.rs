//! 输入边界
//!
//! 核心不直接订阅设备事件：设备层把按键转换为 `InputEdge` 消息，
//! 每帧在 `SandboxSet::Input` 阶段被消费一次，连续状态（移动标志、视角）
//! 保存在 `InputState` 中。

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};
use bitflags::bitflags;

use crate::interaction::Hotbar;
use crate::simulation::SandboxSet;
use crate::ui::MenuState;

bitflags! {
    /// 当前按住的移动方向
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveFlags: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl MoveFlags {
    /// 相机局部坐标系下的单位移动方向（-Z 为前方）
    pub fn local_direction(self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.contains(MoveFlags::FORWARD) {
            dir.z -= 1.0;
        }
        if self.contains(MoveFlags::BACKWARD) {
            dir.z += 1.0;
        }
        if self.contains(MoveFlags::LEFT) {
            dir.x -= 1.0;
        }
        if self.contains(MoveFlags::RIGHT) {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// 离散输入边沿
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum InputEdge {
    MineStart,
    MineStop,
    Place,
    Jump,
    /// 快捷栏格子（从 0 开始）
    SelectSlot(usize),
    /// 移动方向按下 / 松开
    Movement(MoveFlags, bool),
    /// 获得 / 失去输入焦点（指针锁定）
    Focus(bool),
}

/// 每帧采样的连续输入状态
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub movement: MoveFlags,
    pub yaw: f32,
    pub pitch: f32,
    pub focused: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            movement: MoveFlags::empty(),
            yaw: 0.0,
            pitch: -0.28,
            focused: true,
        }
    }
}

impl InputState {
    /// 视角旋转：先绕 Y 轴偏航，再绕 X 轴俯仰
    pub fn look_rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch)
    }
}

/// 本帧尚未被消费的离散动作
#[derive(Resource, Debug, Default)]
pub struct PendingActions {
    /// 最后一次挖掘边沿：true 为按下，false 为松开
    pub mine: Option<bool>,
    pub place: bool,
    pub jump: bool,
}

/// 核心输入插件
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<InputEdge>()
            .init_resource::<InputState>()
            .init_resource::<PendingActions>()
            .add_systems(Update, collect_input.in_set(SandboxSet::Input));
    }
}

/// 键鼠输入插件 - 把设备状态转换为输入边沿
pub struct DeviceInputPlugin;

impl Plugin for DeviceInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (track_pointer_focus, keyboard_mouse_edges)
                .chain()
                .before(SandboxSet::Input),
        );
    }
}

/// 根据窗口焦点和指针锁定状态计算焦点边沿
///
/// - 已聚焦时，窗口失焦或指针不再锁定 → `Some(false)`
/// - 未聚焦、菜单关闭、窗口有焦点时点击 → `Some(true)`（调用方负责重新锁定指针）
///
/// 菜单打开时焦点由菜单自己切换，这里不再重复报告。
pub fn pointer_focus_edge(
    focused: bool,
    window_focused: bool,
    cursor_locked: bool,
    menu_open: bool,
    clicked: bool,
) -> Option<bool> {
    if focused {
        if !menu_open && (!window_focused || !cursor_locked) {
            return Some(false);
        }
        return None;
    }
    if !menu_open && window_focused && clicked {
        return Some(true);
    }
    None
}

/// 消费本帧所有输入边沿
fn collect_input(
    mut edges: MessageReader<InputEdge>,
    mut state: ResMut<InputState>,
    mut pending: ResMut<PendingActions>,
    mut hotbar: ResMut<Hotbar>,
) {
    for edge in edges.read() {
        match *edge {
            InputEdge::MineStart => pending.mine = Some(true),
            InputEdge::MineStop => pending.mine = Some(false),
            InputEdge::Place => pending.place = true,
            InputEdge::Jump => pending.jump = true,
            InputEdge::SelectSlot(slot) => {
                if !hotbar.select(slot) {
                    debug!("Ignoring out of range hotbar slot {}", slot);
                }
            }
            InputEdge::Movement(flags, pressed) => state.movement.set(flags, pressed),
            InputEdge::Focus(focused) => {
                state.focused = focused;
                if !focused {
                    // 失去焦点时松开所有按键，并丢弃尚未执行的动作
                    state.movement = MoveFlags::empty();
                    *pending = PendingActions::default();
                }
            }
        }
    }
}

/// 窗口失焦或指针锁定丢失时报告焦点丢失，点击窗口时重新锁定
fn track_pointer_focus(
    window: Single<(&Window, &mut CursorOptions)>,
    mouse: Res<ButtonInput<MouseButton>>,
    menu_state: Res<MenuState>,
    state: Res<InputState>,
    mut writer: MessageWriter<InputEdge>,
) {
    let (window, mut cursor_options) = window.into_inner();
    let edge = pointer_focus_edge(
        state.focused,
        window.focused,
        cursor_options.grab_mode != CursorGrabMode::None,
        menu_state.open,
        mouse.just_pressed(MouseButton::Left),
    );

    match edge {
        Some(false) => {
            info!("Pointer focus lost");
            cursor_options.grab_mode = CursorGrabMode::None;
            cursor_options.visible = true;
            writer.write(InputEdge::Focus(false));
        }
        Some(true) => {
            info!("Pointer focus regained");
            cursor_options.grab_mode = CursorGrabMode::Locked;
            cursor_options.visible = false;
            writer.write(InputEdge::Focus(true));
        }
        None => {}
    }
}

const MOVE_KEYS: [(KeyCode, MoveFlags); 4] = [
    (KeyCode::KeyW, MoveFlags::FORWARD),
    (KeyCode::KeyS, MoveFlags::BACKWARD),
    (KeyCode::KeyA, MoveFlags::LEFT),
    (KeyCode::KeyD, MoveFlags::RIGHT),
];

const SLOT_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

fn keyboard_mouse_edges(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    menu_state: Res<MenuState>,
    state: Res<InputState>,
    mut writer: MessageWriter<InputEdge>,
) {
    // 松开总是转发，避免菜单打开期间按键卡住
    for (key, flag) in MOVE_KEYS {
        if keys.just_released(key) {
            writer.write(InputEdge::Movement(flag, false));
        }
    }
    if mouse.just_released(MouseButton::Left) {
        writer.write(InputEdge::MineStop);
    }

    // 未聚焦时的点击只用于重新锁定指针
    if menu_state.open || !state.focused {
        return;
    }

    for (key, flag) in MOVE_KEYS {
        if keys.just_pressed(key) {
            writer.write(InputEdge::Movement(flag, true));
        }
    }
    if keys.just_pressed(KeyCode::Space) {
        writer.write(InputEdge::Jump);
    }
    for (slot, key) in SLOT_KEYS.iter().enumerate() {
        if keys.just_pressed(*key) {
            writer.write(InputEdge::SelectSlot(slot));
        }
    }
    if mouse.just_pressed(MouseButton::Left) {
        writer.write(InputEdge::MineStart);
    }
    if mouse.just_pressed(MouseButton::Right) {
        writer.write(InputEdge::Place);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_direction_is_normalized() {
        let dir = (MoveFlags::FORWARD | MoveFlags::RIGHT).local_direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.z < 0.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let dir = (MoveFlags::FORWARD | MoveFlags::BACKWARD).local_direction();
        assert_eq!(dir, Vec3::ZERO);
    }

    #[test]
    fn test_window_blur_drops_focus() {
        assert_eq!(pointer_focus_edge(true, false, true, false, false), Some(false));
        // 合成器释放了指针锁定
        assert_eq!(pointer_focus_edge(true, true, false, false, false), Some(false));
        assert_eq!(pointer_focus_edge(true, true, true, false, true), None);
    }

    #[test]
    fn test_click_regains_focus_only_when_menu_closed() {
        assert_eq!(pointer_focus_edge(false, true, false, false, true), Some(true));
        assert_eq!(pointer_focus_edge(false, true, false, false, false), None);
        assert_eq!(pointer_focus_edge(false, true, false, true, true), None);
        assert_eq!(pointer_focus_edge(false, false, false, false, true), None);
    }

    #[test]
    fn test_menu_handles_its_own_focus() {
        assert_eq!(pointer_focus_edge(true, true, false, true, false), None);
    }

    #[test]
    fn test_look_rotation_forward() {
        let state = InputState {
            pitch: 0.0,
            ..default()
        };
        let forward = state.look_rotation() * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
    }
}
