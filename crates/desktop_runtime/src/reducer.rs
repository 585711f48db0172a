//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use desktop_app_contract::{AppId, LaunchParams, UnknownAppId, WindowLifecycleEvent};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    drag::{DragChannels, DragError, DragPayload, EasterEgg, ProtectedItem, ProtectionReason},
    file_registry::FileRegistryError,
    grid::DesktopGrid,
    model::{
        DesktopState, FileKind, FileLocation, FileRecord, IconRef, Position, RecycleEntry,
        SystemFolderState, WindowSize,
    },
    notices::{self, Notice, RejectedVerb},
    seed::{SeedError, SeedTables},
};

/// Display name of the floppy drive entry in My Computer.
pub const FLOPPY_DRIVE_NAME: &str = "3½ Floppy (A:)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
/// Where a drag ended.
pub enum DropTarget {
    /// Empty desktop surface. `pointer` is relative to the desktop's top-left corner.
    Desktop { pointer: Position },
    /// A location icon or folder window: recycle bin, floppy drive or C: drive.
    Location { location: FileLocation },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open (or re-open) an application window and raise it.
    OpenWindow { app_id: AppId },
    /// Open an application window for a specific file.
    OpenWindowWith {
        app_id: AppId,
        launch_params: LaunchParams,
    },
    /// Open an application named by its external token, e.g. from a start menu entry.
    OpenApp { token: String },
    CloseWindow { app_id: AppId },
    MinimizeWindow { app_id: AppId },
    /// Raise a window, restoring it first if it is minimized.
    FocusWindow { app_id: AppId },
    /// Taskbar button click: restore, minimize or focus depending on the window state.
    ToggleTaskbarWindow { app_id: AppId },
    SetWindowTitle { app_id: AppId, title: String },
    SetWindowPosition { app_id: AppId, position: Position },
    SetWindowSize { app_id: AppId, size: WindowSize },
    ToggleStartMenu,
    CloseStartMenu,
    /// Double-click on a desktop or folder icon.
    ActivateIcon { icon: IconRef },
    /// Double-click on a drive or system file inside My Computer.
    OpenProtectedItem { item: ProtectedItem },
    /// Click on an icon; `additive` is set for ctrl/cmd clicks.
    SelectIcon { icon: IconRef, additive: bool },
    /// Click on the empty desktop surface.
    ClickDesktop,
    /// Drop of an already resolved payload.
    Drop {
        payload: DragPayload,
        target: DropTarget,
    },
    /// Drop carrying raw drag channels, resolved before anything is touched.
    DropChannels {
        channels: DragChannels,
        target: DropTarget,
    },
    /// Lay out shortcuts then desktop files column-major on the grid.
    ArrangeIcons { viewport_height: i32 },
    CreateFile { record: FileRecord },
    /// Soft delete, e.g. from a file's context menu.
    DeleteFile { file_id: String },
    RestoreFromRecycleBin { entry: RecycleEntry },
    /// Ask for confirmation before purging one recycle bin entry. `step` counts the
    /// System32 warnings already accepted.
    RequestPurge {
        entry: RecycleEntry,
        #[serde(default)]
        step: u8,
    },
    /// Permanently delete one recycle bin entry.
    PurgeFromRecycleBin { entry: RecycleEntry },
    /// Ask for confirmation before emptying the recycle bin. `step` counts the System32
    /// warnings already accepted.
    RequestEmptyRecycleBin {
        #[serde(default)]
        step: u8,
    },
    EmptyRecycleBin,
    /// Confirmation of the System32 drop onto the recycle bin.
    ConfirmSystemFolderRecycle,
    ShowDesktopProperties,
    AnswerSoundPrompt { enable_sound: bool },
    CompleteBios,
    /// Escape on the BIOS or boot screen.
    SkipToDesktop { now_ms: u64 },
    CompleteBoot { now_ms: u64 },
    /// Pointer or keyboard activity anywhere in the session.
    RecordActivity { now_ms: u64 },
    /// Periodic timer delivering the current time.
    Tick { now_ms: u64 },
    ToggleSound,
    /// Discard everything and rebuild the session from the seed tables.
    ResetSession,
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the presentation layer to execute.
pub enum RuntimeEffect {
    /// A window changed lifecycle state.
    WindowLifecycle {
        app_id: AppId,
        event: WindowLifecycleEvent,
    },
    /// Play a named UI sound effect. Only emitted while sound is enabled.
    PlaySound(&'static str),
    /// Show a message box.
    ShowNotice(Notice),
    /// Start the looping boot soundtrack.
    StartBootAudio,
    /// Stop the boot soundtrack.
    StopBootAudio,
    ShowScreensaver,
    HideScreensaver,
    /// System32 was deleted; the presentation layer takes over with the crash screen.
    SystemCrashed,
}

#[derive(Debug, Error)]
/// Reducer errors for invalid actions.
pub enum ReducerError {
    #[error(transparent)]
    UnknownApp(#[from] UnknownAppId),
    #[error("invalid drag payload: {0}")]
    Drag(#[from] DragError),
    #[error(transparent)]
    File(#[from] FileRegistryError),
    #[error("failed to rebuild session: {0}")]
    Seed(#[from] SeedError),
}

/// Applies a [`DesktopAction`] to the desktop state and collects resulting side effects.
///
/// Every action validates its inputs before mutating anything, so an `Err` leaves `state`
/// untouched. Stale file ids are not errors; they resolve to no effects. Once the session has
/// crashed only [`DesktopAction::ResetSession`] is honoured.
///
/// # Errors
///
/// Returns [`ReducerError`] for unknown app tokens, malformed drag channels, duplicate file ids
/// and seed tables that fail to rebuild.
pub fn reduce_desktop(
    state: &mut DesktopState,
    seed: &SeedTables,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();

    if state.session.is_crashed() && !matches!(action, DesktopAction::ResetSession) {
        debug!("session crashed, ignoring {action:?}");
        return Ok(effects);
    }

    match action {
        DesktopAction::OpenWindow { app_id } => {
            open_window(state, &mut effects, app_id, None);
        }
        DesktopAction::OpenWindowWith {
            app_id,
            launch_params,
        } => {
            open_window(state, &mut effects, app_id, Some(launch_params));
        }
        DesktopAction::OpenApp { token } => {
            let app_id: AppId = token.parse()?;
            open_window(state, &mut effects, app_id, None);
        }
        DesktopAction::CloseWindow { app_id } => {
            let event = state.windows.close(app_id);
            push_lifecycle(state, &mut effects, app_id, event);
        }
        DesktopAction::MinimizeWindow { app_id } => {
            let event = state.windows.minimize(app_id);
            push_lifecycle(state, &mut effects, app_id, event);
        }
        DesktopAction::FocusWindow { app_id } => {
            let event = state.windows.focus(app_id);
            state.start_menu_open = false;
            // a closed window is raised but stays off screen
            let event = state.windows.is_open(app_id).then_some(event);
            push_lifecycle(state, &mut effects, app_id, event);
        }
        DesktopAction::ToggleTaskbarWindow { app_id } => {
            let event = state.windows.toggle_taskbar(app_id);
            push_lifecycle(state, &mut effects, app_id, event);
        }
        DesktopAction::SetWindowTitle { app_id, title } => {
            state.windows.set_title(app_id, title);
        }
        DesktopAction::SetWindowPosition { app_id, position } => {
            state.windows.set_position(app_id, position);
        }
        DesktopAction::SetWindowSize { app_id, size } => {
            state.windows.set_size(app_id, size);
        }
        DesktopAction::ToggleStartMenu => {
            state.start_menu_open = !state.start_menu_open;
            if state.start_menu_open {
                push_sound(state, &mut effects, "menu-open");
            }
        }
        DesktopAction::CloseStartMenu => {
            state.start_menu_open = false;
        }
        DesktopAction::ActivateIcon { icon } => {
            activate_icon(state, &mut effects, &icon);
        }
        DesktopAction::OpenProtectedItem { item } => match item.reason {
            ProtectionReason::Drive if item.name == FLOPPY_DRIVE_NAME => {
                open_window(state, &mut effects, AppId::FloppyDrive, None);
            }
            ProtectionReason::Drive => debug!("drive {} is browsed in place", item.name),
            ProtectionReason::SystemFile(class) => {
                effects.push(RuntimeEffect::ShowNotice(notices::cannot_open(
                    &item.name, class,
                )));
            }
        },
        DesktopAction::SelectIcon { icon, additive } => {
            state.icons.select(icon, additive);
        }
        DesktopAction::ClickDesktop => {
            state.icons.clear_selection();
            state.start_menu_open = false;
        }
        DesktopAction::Drop { payload, target } => {
            drop_payload(state, &mut effects, payload, target);
        }
        DesktopAction::DropChannels { channels, target } => match channels.resolve()? {
            Some(payload) => drop_payload(state, &mut effects, payload, target),
            None => debug!("drop without a recognisable payload"),
        },
        DesktopAction::ArrangeIcons { viewport_height } => {
            arrange_icons(state, viewport_height);
        }
        DesktopAction::CreateFile { record } => {
            state.files.create(record)?;
        }
        DesktopAction::DeleteFile { file_id } => {
            if state.files.soft_delete(&file_id) {
                state.icons.deselect(&IconRef::File(file_id));
            }
        }
        DesktopAction::RestoreFromRecycleBin { entry } => {
            restore_entry(state, &mut effects, &entry);
        }
        DesktopAction::RequestPurge { entry, step } => {
            if let Some(name) = recycled_entry_name(state, &entry) {
                effects.push(RuntimeEffect::ShowNotice(notices::confirm_purge(
                    &name, entry, step,
                )));
            }
        }
        DesktopAction::PurgeFromRecycleBin { entry } => {
            purge_entry(state, &mut effects, &entry);
        }
        DesktopAction::RequestEmptyRecycleBin { step } => {
            let entries = state.recycle_entries();
            let notice = if entries.is_empty() {
                notices::recycle_bin_already_empty()
            } else {
                notices::confirm_empty_recycle_bin(
                    entries.len(),
                    entries.contains(&RecycleEntry::SystemFolder),
                    step,
                )
            };
            effects.push(RuntimeEffect::ShowNotice(notice));
        }
        DesktopAction::EmptyRecycleBin => {
            let purged = state.files.purge_recycled();
            for file in &purged {
                state.icons.deselect(&IconRef::File(file.id.clone()));
            }
            if state.system_folder == SystemFolderState::Recycled {
                crash(state, &mut effects);
            }
        }
        DesktopAction::ConfirmSystemFolderRecycle => {
            if state.system_folder == SystemFolderState::InPlace {
                state.system_folder = SystemFolderState::Recycled;
                effects.push(RuntimeEffect::ShowNotice(notices::system_folder_recycled()));
                open_window(state, &mut effects, AppId::RecycleBin, None);
            }
        }
        DesktopAction::ShowDesktopProperties => {
            effects.push(RuntimeEffect::ShowNotice(notices::desktop_properties()));
        }
        DesktopAction::AnswerSoundPrompt { enable_sound } => {
            if state.session.answer_sound_prompt(enable_sound) && enable_sound {
                effects.push(RuntimeEffect::StartBootAudio);
            }
        }
        DesktopAction::CompleteBios => {
            state.session.complete_bios();
        }
        DesktopAction::SkipToDesktop { now_ms } => {
            if state.session.skip_to_desktop(now_ms) {
                effects.push(RuntimeEffect::StopBootAudio);
            }
        }
        DesktopAction::CompleteBoot { now_ms } => {
            if state.session.complete_boot(now_ms) {
                effects.push(RuntimeEffect::StopBootAudio);
            }
        }
        DesktopAction::RecordActivity { now_ms } => {
            if state.session.record_activity(now_ms) {
                effects.push(RuntimeEffect::HideScreensaver);
            }
        }
        DesktopAction::Tick { now_ms } => {
            if state.session.tick(now_ms) {
                effects.push(RuntimeEffect::ShowScreensaver);
            }
        }
        DesktopAction::ToggleSound => {
            if state.session.toggle_sound() {
                effects.push(RuntimeEffect::PlaySound("click"));
            }
        }
        DesktopAction::ResetSession => {
            *state = DesktopState::from_seed(seed)?;
        }
    }

    Ok(effects)
}

fn open_window(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    app_id: AppId,
    launch_params: Option<LaunchParams>,
) {
    let event = state.windows.open_with(app_id, launch_params);
    state.start_menu_open = false;
    push_lifecycle(state, effects, app_id, Some(event));
}

fn push_lifecycle(
    state: &DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    app_id: AppId,
    event: Option<WindowLifecycleEvent>,
) {
    let Some(event) = event else {
        return;
    };
    effects.push(RuntimeEffect::WindowLifecycle { app_id, event });
    if let Some(cue) = event.sound_cue() {
        push_sound(state, effects, cue);
    }
}

fn push_sound(state: &DesktopState, effects: &mut Vec<RuntimeEffect>, cue: &'static str) {
    if state.session.sound_enabled {
        effects.push(RuntimeEffect::PlaySound(cue));
    }
}

fn activate_icon(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>, icon: &IconRef) {
    let file_id = match icon {
        IconRef::App(app_id) => {
            open_window(state, effects, *app_id, None);
            return;
        }
        IconRef::File(file_id) => file_id,
    };
    let Some(file) = state.files.get(file_id) else {
        debug!("ignoring activation of unknown file {file_id}");
        return;
    };

    let launch = match (file.kind, &file.url) {
        (FileKind::Image, Some(url)) => Some((
            AppId::ImageViewer,
            LaunchParams::Image {
                image_url: url.clone(),
                file_name: file.name.clone(),
            },
            None,
        )),
        (FileKind::Text, _) => Some((
            AppId::Textcraft,
            LaunchParams::TextDocument {
                file_id: file.id.clone(),
                file_name: file.name.clone(),
                content: file.content.clone(),
            },
            Some(format!("TextCraft - {}", file.name)),
        )),
        _ => None,
    };

    match launch {
        Some((app_id, params, title)) => {
            if let Some(title) = title {
                state.windows.set_title(app_id, title);
            }
            open_window(state, effects, app_id, Some(params));
        }
        None => debug!("no viewer for {file_id} ({:?})", file.kind),
    }
}

fn drop_payload(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    payload: DragPayload,
    target: DropTarget,
) {
    let grid = DesktopGrid::from_config(&state.config.grid);
    match (payload, target) {
        (DragPayload::PlainFile { file_id }, DropTarget::Desktop { pointer }) => {
            let snapped = grid.snap_drop(pointer);
            match state.files.get(&file_id).map(|file| file.location) {
                Some(FileLocation::Desktop) => {
                    state.files.update_position(&file_id, snapped);
                }
                Some(_) => {
                    state
                        .files
                        .move_file(&file_id, FileLocation::Desktop, Some(snapped));
                }
                None => debug!("ignoring drop of unknown file {file_id}"),
            }
        }
        (DragPayload::PlainFile { file_id }, DropTarget::Location { location }) => {
            if state.files.move_file(&file_id, location, None)
                && location == FileLocation::RecycleBin
            {
                state.icons.deselect(&IconRef::File(file_id));
            }
        }
        (DragPayload::Protected(item), target) => {
            let verb = match target {
                DropTarget::Location {
                    location: FileLocation::RecycleBin,
                } => RejectedVerb::Delete,
                _ => RejectedVerb::Move,
            };
            warn!("rejected drop of protected item {}", item.name);
            effects.push(RuntimeEffect::ShowNotice(notices::rejected_drop(&item, verb)));
        }
        (DragPayload::AppIcon { app_id }, DropTarget::Desktop { pointer }) => {
            if !state.icons.set_position(app_id, grid.snap_drop(pointer)) {
                debug!("{app_id} has no desktop shortcut to reposition");
            }
        }
        (DragPayload::AppIcon { app_id }, DropTarget::Location { location }) => {
            debug!("ignoring drop of {app_id} shortcut on {location}");
        }
        (
            DragPayload::EasterEgg {
                egg: egg @ EasterEgg::SystemFolder,
            },
            DropTarget::Location {
                location: FileLocation::RecycleBin,
            },
        ) => {
            if state.system_folder == SystemFolderState::InPlace {
                effects.push(RuntimeEffect::ShowNotice(notices::confirm_recycle(egg)));
            }
        }
        (DragPayload::EasterEgg { egg }, _) => {
            debug!("{} can only be dropped on the recycle bin", egg.display_name());
        }
    }
}

fn arrange_icons(state: &mut DesktopState, viewport_height: i32) {
    let grid = DesktopGrid::from_config(&state.config.grid);
    let apps: Vec<AppId> = state
        .icons
        .shortcuts()
        .iter()
        .map(|shortcut| shortcut.app_id)
        .collect();
    let files: Vec<String> = state
        .files
        .query(FileLocation::Desktop)
        .map(|file| file.id.clone())
        .collect();
    let mut slots = grid
        .arrange(apps.len() + files.len(), viewport_height)
        .into_iter();

    for (app_id, slot) in apps.into_iter().zip(slots.by_ref()) {
        state.icons.set_position(app_id, slot);
    }
    for (file_id, slot) in files.iter().zip(slots) {
        state.files.update_position(file_id, slot);
    }
}

fn recycled_entry_name(state: &DesktopState, entry: &RecycleEntry) -> Option<String> {
    match entry {
        RecycleEntry::File(file_id) => state
            .files
            .get(file_id)
            .filter(|file| file.location == FileLocation::RecycleBin)
            .map(|file| file.name.clone()),
        RecycleEntry::SystemFolder => (state.system_folder == SystemFolderState::Recycled)
            .then(|| EasterEgg::SystemFolder.display_name().to_string()),
    }
}

fn restore_entry(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    entry: &RecycleEntry,
) {
    if recycled_entry_name(state, entry).is_none() {
        debug!("ignoring restore of {entry:?}, not in the recycle bin");
        return;
    }
    match entry {
        RecycleEntry::File(file_id) => {
            state.files.restore(file_id, FileLocation::Desktop);
            effects.push(RuntimeEffect::ShowNotice(notices::file_restored()));
        }
        RecycleEntry::SystemFolder => {
            state.system_folder = SystemFolderState::InPlace;
            effects.push(RuntimeEffect::ShowNotice(notices::system_folder_restored()));
        }
    }
}

fn purge_entry(
    state: &mut DesktopState,
    effects: &mut Vec<RuntimeEffect>,
    entry: &RecycleEntry,
) {
    if recycled_entry_name(state, entry).is_none() {
        debug!("ignoring purge of {entry:?}, not in the recycle bin");
        return;
    }
    match entry {
        RecycleEntry::File(file_id) => {
            state.files.purge(file_id);
            state.icons.deselect(&IconRef::File(file_id.clone()));
        }
        RecycleEntry::SystemFolder => crash(state, effects),
    }
}

fn crash(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>) {
    warn!("System32 purged from the recycle bin, crashing session");
    state.system_folder = SystemFolderState::InPlace;
    state.start_menu_open = false;
    state.session.crash();
    effects.push(RuntimeEffect::SystemCrashed);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::drag::{CHANNEL_FILE, CHANNEL_ICON, CHANNEL_PROTECTED};

    fn session() -> (DesktopState, SeedTables) {
        let seed = SeedTables::builtin().expect("builtin seed");
        let state = DesktopState::from_seed(&seed).expect("state");
        (state, seed)
    }

    fn reduce(
        state: &mut DesktopState,
        seed: &SeedTables,
        action: DesktopAction,
    ) -> Vec<RuntimeEffect> {
        reduce_desktop(state, seed, action).expect("reduce")
    }

    fn shown_notices(effects: &[RuntimeEffect]) -> Vec<&Notice> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                RuntimeEffect::ShowNotice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_emits_lifecycle_and_sound_only_when_enabled() {
        let (mut state, seed) = session();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::OpenWindow {
                app_id: AppId::MyComputer,
            },
        );
        assert_eq!(
            effects,
            vec![RuntimeEffect::WindowLifecycle {
                app_id: AppId::MyComputer,
                event: WindowLifecycleEvent::Opened,
            }]
        );

        state.session.sound_enabled = true;
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::CloseWindow {
                app_id: AppId::MyComputer,
            },
        );
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::WindowLifecycle {
                    app_id: AppId::MyComputer,
                    event: WindowLifecycleEvent::Closed,
                },
                RuntimeEffect::PlaySound("close"),
            ]
        );
    }

    #[test]
    fn unknown_app_token_is_a_typed_error_and_changes_nothing() {
        let (mut state, seed) = session();
        let before = state.clone();
        let err = reduce_desktop(
            &mut state,
            &seed,
            DesktopAction::OpenApp {
                token: "SOLITAIRE".to_string(),
            },
        )
        .expect_err("unknown app");
        assert!(matches!(err, ReducerError::UnknownApp(UnknownAppId(ref id)) if id == "SOLITAIRE"));
        assert_eq!(state, before);
    }

    #[test]
    fn dropping_a_floppy_file_on_the_desktop_snaps_and_moves_it() {
        let (mut state, seed) = session();
        reduce(
            &mut state,
            &seed,
            DesktopAction::Drop {
                payload: DragPayload::plain_file("readme"),
                target: DropTarget::Desktop {
                    pointer: Position::new(130, 340),
                },
            },
        );
        let readme = state.files.get("readme").expect("readme");
        assert_eq!(readme.location, FileLocation::Desktop);
        assert_eq!(readme.position, Some(Position::new(103, 273)));
    }

    #[test]
    fn dropping_a_desktop_file_on_the_desktop_only_repositions_it() {
        let (mut state, seed) = session();
        reduce(
            &mut state,
            &seed,
            DesktopAction::Drop {
                payload: DragPayload::plain_file("magical_nedrysaurus"),
                target: DropTarget::Desktop {
                    pointer: Position::new(300, 60),
                },
            },
        );
        let file = state.files.get("magical_nedrysaurus").expect("file");
        assert_eq!(file.location, FileLocation::Desktop);
        assert_eq!(file.position, Some(Position::new(273, 18)));
    }

    #[test]
    fn protected_items_are_rejected_with_a_notice() {
        let (mut state, seed) = session();
        let before = state.clone();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::DropChannels {
                channels: DragChannels::new()
                    .with(CHANNEL_PROTECTED, r#"{"name":"C:","is_drive":true}"#)
                    .with(CHANNEL_FILE, "readme"),
                target: DropTarget::Location {
                    location: FileLocation::RecycleBin,
                },
            },
        );
        assert_eq!(state, before);
        let shown = shown_notices(&effects);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Error Deleting File");
    }

    #[test]
    fn malformed_icon_channel_is_an_error_without_side_effects() {
        let (mut state, seed) = session();
        let before = state.clone();
        let result = reduce_desktop(
            &mut state,
            &seed,
            DesktopAction::DropChannels {
                channels: DragChannels::new().with(CHANNEL_ICON, "NOT_AN_APP"),
                target: DropTarget::Desktop {
                    pointer: Position::new(200, 200),
                },
            },
        );
        assert!(matches!(result, Err(ReducerError::Drag(DragError::UnknownApp(_)))));
        assert_eq!(state, before);
    }

    #[test]
    fn app_icons_only_move_on_the_desktop() {
        let (mut state, seed) = session();
        reduce(
            &mut state,
            &seed,
            DesktopAction::Drop {
                payload: DragPayload::AppIcon {
                    app_id: AppId::Textcraft,
                },
                target: DropTarget::Desktop {
                    pointer: Position::new(400, 400),
                },
            },
        );
        assert_eq!(
            state.icons.position(AppId::Textcraft),
            Some(Position::new(358, 358))
        );

        let before = state.clone();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::Drop {
                payload: DragPayload::AppIcon {
                    app_id: AppId::Textcraft,
                },
                target: DropTarget::Location {
                    location: FileLocation::RecycleBin,
                },
            },
        );
        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn activating_files_opens_the_matching_viewer() {
        let (mut state, seed) = session();
        reduce(
            &mut state,
            &seed,
            DesktopAction::ActivateIcon {
                icon: IconRef::File("magical_nedrysaurus".to_string()),
            },
        );
        let viewer = state.windows.get(AppId::ImageViewer);
        assert!(viewer.is_open);
        assert_eq!(
            viewer.launch_params,
            Some(LaunchParams::Image {
                image_url: "https://youtu.be/fmz-K2hLwSI".to_string(),
                file_name: "Magical Nedrysaurus.gif".to_string(),
            })
        );

        reduce(
            &mut state,
            &seed,
            DesktopAction::ActivateIcon {
                icon: IconRef::File("readme".to_string()),
            },
        );
        let editor = state.windows.get(AppId::Textcraft);
        assert!(editor.is_open);
        assert_eq!(editor.title, "TextCraft - README.TXT");
        assert_eq!(state.focused_app(), Some(AppId::Textcraft));

        // image without a url has no viewer
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::ActivateIcon {
                icon: IconRef::File("troll_face".to_string()),
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn protected_system_files_explain_why_they_cannot_open() {
        let (mut state, seed) = session();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::OpenProtectedItem {
                item: ProtectedItem::system_file("KRNL386.EXE"),
            },
        );
        assert!(shown_notices(&effects)[0].message.starts_with("Cannot run 'KRNL386.EXE'"));

        reduce(
            &mut state,
            &seed,
            DesktopAction::OpenProtectedItem {
                item: ProtectedItem::drive(FLOPPY_DRIVE_NAME),
            },
        );
        assert!(state.windows.is_open(AppId::FloppyDrive));
    }

    #[test]
    fn arrange_places_shortcuts_then_desktop_files() {
        let (mut state, seed) = session();
        // 370px viewport leaves room for three rows
        reduce(
            &mut state,
            &seed,
            DesktopAction::ArrangeIcons {
                viewport_height: 370,
            },
        );
        assert_eq!(
            state.icons.position(AppId::MyComputer),
            Some(Position::new(18, 18))
        );
        assert_eq!(
            state.icons.position(AppId::WebBrowser),
            Some(Position::new(18, 188))
        );
        assert_eq!(
            state.icons.position(AppId::Textcraft),
            Some(Position::new(103, 18))
        );
        assert_eq!(
            state
                .files
                .get("magical_nedrysaurus")
                .and_then(|file| file.position),
            Some(Position::new(103, 188))
        );
    }

    #[test]
    fn start_menu_closes_when_a_window_opens_or_the_desktop_is_clicked() {
        let (mut state, seed) = session();
        state.session.sound_enabled = true;
        let effects = reduce(&mut state, &seed, DesktopAction::ToggleStartMenu);
        assert!(state.start_menu_open);
        assert_eq!(effects, vec![RuntimeEffect::PlaySound("menu-open")]);

        reduce(
            &mut state,
            &seed,
            DesktopAction::OpenWindow {
                app_id: AppId::About,
            },
        );
        assert!(!state.start_menu_open);

        reduce(&mut state, &seed, DesktopAction::ToggleStartMenu);
        reduce(
            &mut state,
            &seed,
            DesktopAction::SelectIcon {
                icon: IconRef::App(AppId::MyComputer),
                additive: false,
            },
        );
        reduce(&mut state, &seed, DesktopAction::ClickDesktop);
        assert!(!state.start_menu_open);
        assert_eq!(state.icons.selection().count(), 0);
    }

    #[test]
    fn empty_request_reports_an_empty_bin() {
        let (mut state, seed) = session();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::RequestEmptyRecycleBin { step: 0 },
        );
        assert_eq!(shown_notices(&effects)[0].message, "The Recycle Bin is already empty.");
    }

    fn confirm_button(effects: &[RuntimeEffect]) -> DesktopAction {
        let shown = shown_notices(effects);
        assert_eq!(shown.len(), 1);
        let cancel = &shown[0].buttons[1];
        assert!(cancel.primary && cancel.action.is_none());
        shown[0].buttons[0].action.clone().expect("confirm action")
    }

    #[test]
    fn emptying_with_system32_walks_three_warnings_before_crashing() {
        let (mut state, seed) = session();
        reduce(&mut state, &seed, DesktopAction::ConfirmSystemFolderRecycle);
        reduce(
            &mut state,
            &seed,
            DesktopAction::DeleteFile {
                file_id: "readme".to_string(),
            },
        );

        let mut action = DesktopAction::RequestEmptyRecycleBin { step: 0 };
        let mut titles = Vec::new();
        for _ in 0..notices::SYSTEM_FOLDER_WARNINGS {
            let before = state.clone();
            let effects = reduce(&mut state, &seed, action);
            // declining at this point would dispatch nothing
            assert_eq!(state, before);
            titles.push(shown_notices(&effects)[0].title.clone());
            action = confirm_button(&effects);
        }
        assert_eq!(
            titles,
            vec!["CRITICAL SYSTEM WARNING", "SERIOUSLY?!", "FINAL WARNING"]
        );
        assert_eq!(action, DesktopAction::EmptyRecycleBin);

        let effects = reduce(&mut state, &seed, action);
        assert_eq!(effects, vec![RuntimeEffect::SystemCrashed]);
        assert!(state.files.get("readme").is_none());
    }

    #[test]
    fn purging_system32_walks_three_warnings_and_plain_files_one() {
        let (mut state, seed) = session();
        reduce(&mut state, &seed, DesktopAction::ConfirmSystemFolderRecycle);

        let mut action = DesktopAction::RequestPurge {
            entry: RecycleEntry::SystemFolder,
            step: 0,
        };
        for step in 1..=notices::SYSTEM_FOLDER_WARNINGS {
            let before = state.clone();
            let effects = reduce(&mut state, &seed, action);
            assert_eq!(state, before);
            action = confirm_button(&effects);
            if step < notices::SYSTEM_FOLDER_WARNINGS {
                assert_eq!(
                    action,
                    DesktopAction::RequestPurge {
                        entry: RecycleEntry::SystemFolder,
                        step,
                    }
                );
            }
        }
        assert_eq!(
            action,
            DesktopAction::PurgeFromRecycleBin {
                entry: RecycleEntry::SystemFolder
            }
        );

        reduce(
            &mut state,
            &seed,
            DesktopAction::DeleteFile {
                file_id: "readme".to_string(),
            },
        );
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::RequestPurge {
                entry: RecycleEntry::File("readme".to_string()),
                step: 0,
            },
        );
        assert_eq!(
            confirm_button(&effects),
            DesktopAction::PurgeFromRecycleBin {
                entry: RecycleEntry::File("readme".to_string())
            }
        );
    }

    #[test]
    fn focusing_a_closed_window_reports_nothing() {
        let (mut state, seed) = session();
        state.start_menu_open = true;
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::FocusWindow {
                app_id: AppId::Trivia,
            },
        );
        assert!(effects.is_empty());
        assert!(!state.windows.is_open(AppId::Trivia));
        assert!(!state.start_menu_open);
    }

    #[test]
    fn extreme_pointer_and_viewport_values_do_not_overflow() {
        let (mut state, seed) = session();
        reduce(
            &mut state,
            &seed,
            DesktopAction::ArrangeIcons {
                viewport_height: i32::MIN,
            },
        );
        let column: Vec<Position> = state
            .icons
            .shortcuts()
            .iter()
            .filter_map(|shortcut| state.icons.position(shortcut.app_id))
            .take(2)
            .collect();
        assert_eq!(column, vec![Position::new(18, 18), Position::new(103, 18)]);

        reduce(
            &mut state,
            &seed,
            DesktopAction::Drop {
                payload: DragPayload::plain_file("magical_nedrysaurus"),
                target: DropTarget::Desktop {
                    pointer: Position::new(i32::MAX, 300),
                },
            },
        );
        let position = state
            .files
            .get("magical_nedrysaurus")
            .and_then(|file| file.position)
            .expect("desktop position");
        assert_eq!(position.y, 273);
        assert!(position.x > i32::MAX - 85);
    }

    #[test]
    fn crashed_session_ignores_everything_but_reset() {
        let (mut state, seed) = session();
        state.session.crash();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::OpenWindow {
                app_id: AppId::Trivia,
            },
        );
        assert!(effects.is_empty());
        assert!(!state.windows.is_open(AppId::Trivia));

        reduce(&mut state, &seed, DesktopAction::ResetSession);
        assert_eq!(state, DesktopState::from_seed(&seed).expect("fresh"));
    }

    #[test]
    fn boot_audio_follows_the_sound_prompt() {
        let (mut state, seed) = session();
        let effects = reduce(
            &mut state,
            &seed,
            DesktopAction::AnswerSoundPrompt { enable_sound: true },
        );
        assert_eq!(effects, vec![RuntimeEffect::StartBootAudio]);

        let effects = reduce(&mut state, &seed, DesktopAction::SkipToDesktop { now_ms: 5 });
        assert_eq!(effects, vec![RuntimeEffect::StopBootAudio]);
        assert!(state.session.is_booted());

        let effects = reduce(&mut state, &seed, DesktopAction::ToggleSound);
        assert!(effects.is_empty());
        let effects = reduce(&mut state, &seed, DesktopAction::ToggleSound);
        assert_eq!(effects, vec![RuntimeEffect::PlaySound("click")]);
    }
}
