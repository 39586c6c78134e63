// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

use crate::model::{Route, WorkspaceRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    SearchPalette,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub role: WorkspaceRole,
    pub overlay: Overlay,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Dashboard,
            role: WorkspaceRole::Admin,
            overlay: Overlay::None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    OpenSearchPalette,
    OpenHelp,
    CloseOverlay,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    RouteDenied(Route),
    OverlayChanged(Overlay),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => {
                // Cosmetic gate only: the data is still in memory either way.
                if route.requires_admin() && !self.role.can_view_admin() {
                    return vec![
                        AppEvent::RouteDenied(route),
                        self.set_status("admin only"),
                    ];
                }
                self.route = route;
                self.overlay = Overlay::None;
                vec![
                    AppEvent::RouteChanged(route),
                    AppEvent::OverlayChanged(self.overlay),
                    self.set_status(route.path()),
                ]
            }
            AppCommand::OpenSearchPalette => {
                self.overlay = Overlay::SearchPalette;
                vec![AppEvent::OverlayChanged(self.overlay)]
            }
            AppCommand::OpenHelp => {
                self.overlay = Overlay::Help;
                vec![AppEvent::OverlayChanged(self.overlay)]
            }
            AppCommand::CloseOverlay => {
                self.overlay = Overlay::None;
                vec![AppEvent::OverlayChanged(self.overlay)]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, Overlay};
    use crate::model::{Route, WorkspaceRole};

    #[test]
    fn navigation_updates_route_and_status() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::Navigate(Route::Contacts));
        assert_eq!(state.route, Route::Contacts);
        assert_eq!(
            events,
            vec![
                AppEvent::RouteChanged(Route::Contacts),
                AppEvent::OverlayChanged(Overlay::None),
                AppEvent::StatusUpdated("/contacts".to_owned()),
            ],
        );
    }

    #[test]
    fn navigation_closes_open_overlay() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::OpenSearchPalette);
        assert_eq!(state.overlay, Overlay::SearchPalette);

        state.dispatch(AppCommand::Navigate(Route::Billing));
        assert_eq!(state.overlay, Overlay::None);
    }

    #[test]
    fn admin_route_is_denied_for_members() {
        let mut state = AppState {
            role: WorkspaceRole::Member,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::Navigate(Route::AdminUsers));
        assert_eq!(state.route, Route::Dashboard);
        assert_eq!(
            events,
            vec![
                AppEvent::RouteDenied(Route::AdminUsers),
                AppEvent::StatusUpdated("admin only".to_owned()),
            ],
        );
    }

    #[test]
    fn admin_route_is_allowed_for_admins() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::Navigate(Route::AdminUserHistory));
        assert_eq!(state.route, Route::AdminUserHistory);
    }

    #[test]
    fn overlays_open_and_close() {
        let mut state = AppState::default();

        let opened = state.dispatch(AppCommand::OpenHelp);
        assert_eq!(state.overlay, Overlay::Help);
        assert_eq!(opened, vec![AppEvent::OverlayChanged(Overlay::Help)]);

        let closed = state.dispatch(AppCommand::CloseOverlay);
        assert_eq!(state.overlay, Overlay::None);
        assert_eq!(closed, vec![AppEvent::OverlayChanged(Overlay::None)]);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetStatus("hello".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("hello"));

        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status_line, None);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
    }
}
