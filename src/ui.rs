use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::input::InputEdge;
use crate::interaction::Hotbar;
use crate::simulation::SandboxSet;
use crate::status::SandboxStatus;

const MENU_BG: Color = Color::srgba(0.08, 0.09, 0.12, 0.92);
const MENU_OVERLAY: Color = Color::srgba(0.0, 0.0, 0.0, 0.45);
const INFO_BG: Color = Color::srgba(0.06, 0.08, 0.12, 0.78);
const SLOT_BG: Color = Color::srgba(0.10, 0.11, 0.14, 0.80);
const SLOT_BORDER: Color = Color::srgb(0.35, 0.38, 0.45);
const SLOT_SELECTED: Color = Color::srgb(0.95, 0.85, 0.35);
const PROGRESS_FILL: Color = Color::srgb(0.92, 0.92, 0.92);
const BUTTON_NORMAL: Color = Color::srgb(0.20, 0.22, 0.28);
const BUTTON_HOVER: Color = Color::srgb(0.28, 0.30, 0.38);
const BUTTON_PRESSED: Color = Color::srgb(0.36, 0.12, 0.12);

/// 暂停菜单状态，菜单打开时不接受游戏输入
#[derive(Resource, Default)]
pub struct MenuState {
    pub open: bool,
}

#[derive(Component)]
struct StatusText;

/// 快捷栏格子，保存格子序号
#[derive(Component)]
struct HotbarSlot(usize);

#[derive(Component)]
struct HotbarSlotLabel(usize);

#[derive(Component)]
struct MiningBar;

#[derive(Component)]
struct MiningBarFill;

#[derive(Component)]
struct ExitMenuRoot;

#[derive(Component)]
struct ExitButton;

#[derive(Component)]
struct Crosshair;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuState>()
            .add_systems(Startup, setup_ui)
            .add_systems(Update, toggle_pause_menu.before(SandboxSet::Input))
            .add_systems(
                Update,
                (update_status_text, update_hotbar, update_mining_bar, exit_button_system)
                    .after(SandboxSet::Post),
            );
    }
}

fn text_font(size: f32) -> TextFont {
    TextFont {
        font_size: size,
        ..default()
    }
}

fn setup_ui(mut commands: Commands, status: Res<SandboxStatus>, hotbar: Res<Hotbar>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: px(14.0),
                top: px(14.0),
                width: px(300.0),
                padding: UiRect::all(px(12.0)),
                ..default()
            },
            BackgroundColor(INFO_BG),
        ))
        .with_child((
            Text::new(status.summary()),
            text_font(14.0),
            TextColor(Color::WHITE),
            StatusText,
        ));

    // 十字准星
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: percent(100.0),
                height: percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            Crosshair,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: px(16.0),
                    height: px(2.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
            ));
            parent.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    width: px(2.0),
                    height: px(16.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.8)),
            ));
        });

    // 底部快捷栏 + 挖掘进度条
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: percent(100.0),
            bottom: px(18.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            row_gap: px(8.0),
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: px(220.0),
                        height: px(6.0),
                        ..default()
                    },
                    BackgroundColor(SLOT_BG),
                    Visibility::Hidden,
                    MiningBar,
                ))
                .with_child((
                    Node {
                        width: percent(0.0),
                        height: percent(100.0),
                        ..default()
                    },
                    BackgroundColor(PROGRESS_FILL),
                    MiningBarFill,
                ));

            parent
                .spawn(Node {
                    column_gap: px(6.0),
                    ..default()
                })
                .with_children(|row| {
                    for (i, kind) in hotbar.slots().iter().enumerate() {
                        row.spawn((
                            Node {
                                width: px(72.0),
                                height: px(52.0),
                                border: UiRect::all(px(2.0)),
                                flex_direction: FlexDirection::Column,
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BackgroundColor(SLOT_BG),
                            BorderColor::all(SLOT_BORDER),
                            HotbarSlot(i),
                        ))
                        .with_children(|slot| {
                            slot.spawn((
                                Node {
                                    width: px(16.0),
                                    height: px(16.0),
                                    ..default()
                                },
                                BackgroundColor(kind.def().color),
                            ));
                            slot.spawn((
                                Text::new(format!("{} {} x0", i + 1, kind.name())),
                                text_font(12.0),
                                TextColor(Color::WHITE),
                                HotbarSlotLabel(i),
                            ));
                        });
                    }
                });
        });

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: percent(100.0),
                height: percent(100.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(MENU_OVERLAY),
            Visibility::Hidden,
            ExitMenuRoot,
        ))
        .with_child((
            Node {
                width: px(320.0),
                padding: UiRect::all(px(18.0)),
                row_gap: px(12.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(MENU_BG),
            BorderColor::all(Color::srgb(0.5, 0.55, 0.62)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Paused"),
                text_font(22.0),
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                Text::new("Press Esc to resume"),
                text_font(14.0),
                TextColor(Color::srgb(0.8, 0.82, 0.9)),
            ));

            parent
                .spawn((
                    Button,
                    ExitButton,
                    Node {
                        width: percent(100.0),
                        height: px(44.0),
                        border: UiRect::all(px(1.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(BUTTON_NORMAL),
                    BorderColor::all(Color::srgb(0.55, 0.6, 0.7)),
                ))
                .with_child((
                    Text::new("Quit"),
                    text_font(18.0),
                    TextColor(Color::WHITE),
                ));
        });
}

fn update_status_text(
    status: Res<SandboxStatus>,
    mut text_q: Query<&mut Text, With<StatusText>>,
) {
    if !status.is_changed() {
        return;
    }
    let Ok(mut text) = text_q.single_mut() else {
        return;
    };
    text.0 = status.summary();
}

fn update_hotbar(
    status: Res<SandboxStatus>,
    mut slot_q: Query<(&HotbarSlot, &mut BorderColor)>,
    mut label_q: Query<(&HotbarSlotLabel, &mut Text)>,
) {
    if !status.is_changed() {
        return;
    }
    for (slot, mut border) in &mut slot_q {
        let color = if slot.0 == status.selected_slot {
            SLOT_SELECTED
        } else {
            SLOT_BORDER
        };
        *border = BorderColor::all(color);
    }
    for (label, mut text) in &mut label_q {
        if let Some((kind, count)) = status.inventory.get(label.0) {
            text.0 = format!("{} {} x{}", label.0 + 1, kind.name(), count);
        }
    }
}

fn update_mining_bar(
    status: Res<SandboxStatus>,
    mut bar_q: Query<&mut Visibility, With<MiningBar>>,
    mut fill_q: Query<&mut Node, With<MiningBarFill>>,
) {
    if !status.is_changed() {
        return;
    }
    let (Ok(mut visibility), Ok(mut fill)) = (bar_q.single_mut(), fill_q.single_mut()) else {
        return;
    };
    match status.mining {
        Some((_, progress)) => {
            *visibility = Visibility::Visible;
            fill.width = percent(progress * 100.0);
        }
        None => *visibility = Visibility::Hidden,
    }
}

/// Esc 切换暂停菜单，同时切换指针锁定并通知核心输入焦点变化
fn toggle_pause_menu(
    keys: Res<ButtonInput<KeyCode>>,
    mut menu_state: ResMut<MenuState>,
    mut menu_q: Query<&mut Visibility, With<ExitMenuRoot>>,
    mut crosshair_q: Query<&mut Visibility, (With<Crosshair>, Without<ExitMenuRoot>)>,
    mut cursor_options: Single<&mut CursorOptions>,
    mut edges: MessageWriter<InputEdge>,
) {
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }

    menu_state.open = !menu_state.open;
    edges.write(InputEdge::Focus(!menu_state.open));
    info!(
        "Pause menu {}",
        if menu_state.open { "opened" } else { "closed" }
    );

    if menu_state.open {
        cursor_options.visible = true;
        cursor_options.grab_mode = CursorGrabMode::None;
    } else {
        cursor_options.visible = false;
        cursor_options.grab_mode = CursorGrabMode::Locked;
    }

    let Ok(mut visibility) = menu_q.single_mut() else {
        return;
    };
    let Ok(mut crosshair_visibility) = crosshair_q.single_mut() else {
        return;
    };
    if menu_state.open {
        *visibility = Visibility::Visible;
        *crosshair_visibility = Visibility::Hidden;
    } else {
        *visibility = Visibility::Hidden;
        *crosshair_visibility = Visibility::Visible;
    }
}

fn exit_button_system(
    mut interaction_q: Query<
        (&Interaction, &mut BackgroundColor, &Children),
        (Changed<Interaction>, With<ExitButton>),
    >,
    mut text_q: Query<&mut Text>,
    mut app_exit_writer: MessageWriter<AppExit>,
) {
    for (interaction, mut color, children) in &mut interaction_q {
        let Ok(mut text) = text_q.get_mut(children[0]) else {
            continue;
        };
        match *interaction {
            Interaction::Pressed => {
                *color = BUTTON_PRESSED.into();
                text.0 = "Quitting...".to_string();
                info!("Exit requested from pause menu");
                app_exit_writer.write(AppExit::Success);
            }
            Interaction::Hovered => {
                *color = BUTTON_HOVER.into();
                text.0 = "Quit".to_string();
            }
            Interaction::None => {
                *color = BUTTON_NORMAL.into();
                text.0 = "Quit".to_string();
            }
        }
    }
}
