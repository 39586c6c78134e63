// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

//! Terminal shell for the dashboard. Raw crossterm key events are mapped
//! into the core dispatcher's input type and offered to the chord state
//! first; only keys the dispatcher leaves alone reach the active view.
//! Each list view owns a [`QueryState`] and renders the page the query
//! engine computes, so this crate holds no filtering or sorting logic of
//! its own.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use hyperdash_app::{
    AdminUser, AppCommand, AppEvent, AppState, ChordState, Company, Contact, FieldValue,
    FilterDef, FilterKind, FilterValue, FocusContext, Key, KeyPress, LeadStatus, Overlay,
    QuerySchema, QueryState, Route, ShortcutAction, SortDirection, SortField, SortSpec,
    UserHistoryEvent, WorkspaceRole, run_query,
};
use hyperdash_data::Workspace;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const FINDER_MATCH_LIMIT: usize = 10;
const LINKEDIN_PROFILE_LIMIT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One line of the AI chat transcript. Persisted between sessions by the
/// runtime, so it carries serde derives the rest of this crate does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub body: String,
}

impl ChatEntry {
    pub fn user(body: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            body: body.into(),
        }
    }

    pub fn assistant(body: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Chunk { request_id: u64, content: String },
    Completed { request_id: u64, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Chat(ChatEvent),
}

/// Everything the shell needs from the outside world. Implemented by the
/// CLI so this crate stays free of HTTP and filesystem concerns. The
/// text-returning methods never fail; a degraded runtime answers with its
/// fallback string instead.
pub trait AppRuntime {
    fn chat_reply(&mut self, history: &[ChatEntry]) -> String;
    fn company_summary(&mut self, company: &Company) -> String;
    fn email_risk(&mut self, email: &str) -> String;
    fn load_transcript(&mut self) -> Result<Vec<ChatEntry>>;
    fn save_transcript(&mut self, transcript: &[ChatEntry]) -> Result<()>;

    /// Answers a chat submission off the input thread when the runtime can.
    /// The default computes synchronously and reports a single completion.
    fn spawn_chat_reply(
        &mut self,
        request_id: u64,
        history: &[ChatEntry],
        tx: Sender<InternalEvent>,
    ) {
        let body = self.chat_reply(history);
        let _ = tx.send(InternalEvent::Chat(ChatEvent::Completed { request_id, body }));
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TableUiState {
    query: QueryState,
    selected: usize,
}

impl TableUiState {
    fn new(page_size: usize) -> Self {
        Self {
            query: QueryState::new(page_size),
            selected: 0,
        }
    }

    fn with_sort(page_size: usize, sort: SortSpec) -> Self {
        Self {
            query: QueryState::with_sort(page_size, sort),
            selected: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct InputUiState {
    value: String,
    focused: bool,
}

#[derive(Debug, Clone, Default)]
struct VerifierUiState {
    input: InputUiState,
    verdict: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct ChatUiState {
    transcript: Vec<ChatEntry>,
    input: InputUiState,
    in_flight: Option<u64>,
    next_request_id: u64,
}

#[derive(Debug, Clone)]
struct ViewData {
    chord: ChordState,
    contacts: TableUiState,
    companies: TableUiState,
    admin_users: TableUiState,
    history: TableUiState,
    search_input: String,
    finder: InputUiState,
    verifier: VerifierUiState,
    chat: ChatUiState,
    company_summary: Option<String>,
    status_token: u64,
}

impl ViewData {
    fn new(page_size: usize) -> Self {
        Self {
            chord: ChordState::default(),
            contacts: TableUiState::with_sort(
                page_size,
                SortSpec {
                    field: "name",
                    direction: SortDirection::Asc,
                },
            ),
            companies: TableUiState::new(page_size),
            admin_users: TableUiState::new(page_size),
            history: TableUiState::with_sort(
                page_size,
                SortSpec {
                    field: "occurred",
                    direction: SortDirection::Desc,
                },
            ),
            search_input: String::new(),
            finder: InputUiState::default(),
            verifier: VerifierUiState::default(),
            chat: ChatUiState::default(),
            company_summary: None,
            status_token: 0,
        }
    }
}

fn contact_schema() -> QuerySchema<Contact> {
    QuerySchema {
        search_fields: vec![
            |c: &Contact| c.name.clone(),
            |c: &Contact| c.email.clone(),
            |c: &Contact| c.company.clone(),
            |c: &Contact| c.role.as_str().to_owned(),
        ],
        sort_fields: vec![
            SortField {
                name: "name",
                get: |c: &Contact| FieldValue::Text(c.name.clone()),
            },
            SortField {
                name: "company",
                get: |c: &Contact| FieldValue::Text(c.company.clone()),
            },
            SortField {
                name: "score",
                get: |c: &Contact| FieldValue::Integer(c.score),
            },
            SortField {
                name: "created",
                get: |c: &Contact| FieldValue::Integer(c.created_at.unix_timestamp()),
            },
        ],
        filters: vec![
            FilterDef {
                name: "role",
                kind: FilterKind::Categorical {
                    get: |c: &Contact| c.role.as_str().to_owned(),
                },
            },
            FilterDef {
                name: "status",
                kind: FilterKind::Categorical {
                    get: |c: &Contact| c.status.as_str().to_owned(),
                },
            },
            FilterDef {
                name: "score",
                kind: FilterKind::NumericRange {
                    get: |c: &Contact| c.score,
                    full_range: (0, 100),
                },
            },
        ],
    }
}

fn company_schema() -> QuerySchema<Company> {
    QuerySchema {
        search_fields: vec![
            |c: &Company| c.name.clone(),
            |c: &Company| c.domain.clone(),
            |c: &Company| c.industry.as_str().to_owned(),
            |c: &Company| c.location.clone(),
        ],
        sort_fields: vec![
            SortField {
                name: "name",
                get: |c: &Company| FieldValue::Text(c.name.clone()),
            },
            SortField {
                name: "employees",
                get: |c: &Company| FieldValue::Integer(c.employees),
            },
            SortField {
                name: "created",
                get: |c: &Company| FieldValue::Integer(c.created_at.unix_timestamp()),
            },
        ],
        filters: vec![
            FilterDef {
                name: "industry",
                kind: FilterKind::Categorical {
                    get: |c: &Company| c.industry.as_str().to_owned(),
                },
            },
            FilterDef {
                name: "employees",
                kind: FilterKind::NumericRange {
                    get: |c: &Company| c.employees,
                    full_range: (0, 5_000),
                },
            },
        ],
    }
}

fn admin_user_schema() -> QuerySchema<AdminUser> {
    QuerySchema {
        search_fields: vec![
            |u: &AdminUser| u.name.clone(),
            |u: &AdminUser| u.email.clone(),
        ],
        sort_fields: vec![
            SortField {
                name: "name",
                get: |u: &AdminUser| FieldValue::Text(u.name.clone()),
            },
            SortField {
                name: "last seen",
                get: |u: &AdminUser| FieldValue::Integer(u.last_seen.unix_timestamp()),
            },
        ],
        filters: vec![
            FilterDef {
                name: "role",
                kind: FilterKind::Categorical {
                    get: |u: &AdminUser| u.role.as_str().to_owned(),
                },
            },
            FilterDef {
                name: "status",
                kind: FilterKind::Categorical {
                    get: |u: &AdminUser| u.status.as_str().to_owned(),
                },
            },
        ],
    }
}

fn history_schema() -> QuerySchema<UserHistoryEvent> {
    QuerySchema {
        search_fields: vec![
            |e: &UserHistoryEvent| e.user_name.clone(),
            |e: &UserHistoryEvent| e.detail.clone(),
            |e: &UserHistoryEvent| e.action.as_str().to_owned(),
        ],
        sort_fields: vec![
            SortField {
                name: "occurred",
                get: |e: &UserHistoryEvent| FieldValue::Integer(e.occurred_at.unix_timestamp()),
            },
            SortField {
                name: "user",
                get: |e: &UserHistoryEvent| FieldValue::Text(e.user_name.clone()),
            },
        ],
        filters: vec![FilterDef {
            name: "action",
            kind: FilterKind::Categorical {
                get: |e: &UserHistoryEvent| e.action.as_str().to_owned(),
            },
        }],
    }
}

const CONTACT_ROLE_OPTIONS: [&str; 5] = ["Manager", "Director", "VP", "Founder", "Analyst"];
const INDUSTRY_OPTIONS: [&str; 6] = [
    "software",
    "finance",
    "healthcare",
    "retail",
    "manufacturing",
    "media",
];
const USER_ROLE_OPTIONS: [&str; 3] = ["admin", "member", "viewer"];
const HISTORY_ACTION_OPTIONS: [&str; 5] =
    ["sign_in", "export", "plan_change", "invite_sent", "search"];

fn sort_cycle(route: Route) -> &'static [&'static str] {
    match route {
        Route::Contacts => &["name", "company", "score", "created"],
        Route::Companies => &["name", "employees", "created"],
        Route::AdminUsers => &["name", "last seen"],
        Route::AdminUserHistory => &["occurred", "user"],
        _ => &[],
    }
}

/// The categorical filter the digit keys toggle, with its value labels in
/// display order.
fn primary_filter(route: Route) -> Option<(&'static str, &'static [&'static str])> {
    match route {
        Route::Contacts => Some(("role", &CONTACT_ROLE_OPTIONS)),
        Route::Companies => Some(("industry", &INDUSTRY_OPTIONS)),
        Route::AdminUsers => Some(("role", &USER_ROLE_OPTIONS)),
        Route::AdminUserHistory => Some(("action", &HISTORY_ACTION_OPTIONS)),
        _ => None,
    }
}

/// The numeric filter the `<`/`>` keys adjust: name, full range, step.
fn range_filter(route: Route) -> Option<(&'static str, (i64, i64), i64)> {
    match route {
        Route::Contacts => Some(("score", (0, 100), 10)),
        Route::Companies => Some(("employees", (0, 5_000), 500)),
        _ => None,
    }
}

fn filter_names(route: Route) -> &'static [&'static str] {
    match route {
        Route::Contacts => &["role", "status", "score"],
        Route::Companies => &["industry", "employees"],
        Route::AdminUsers => &["role", "status"],
        Route::AdminUserHistory => &["action"],
        _ => &[],
    }
}

const fn is_list_route(route: Route) -> bool {
    matches!(
        route,
        Route::Contacts | Route::Companies | Route::AdminUsers | Route::AdminUserHistory
    )
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    workspace: &Workspace,
    runtime: &mut R,
    page_size: usize,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(page_size);
    let (internal_tx, internal_rx) = mpsc::channel();

    match runtime.load_transcript() {
        Ok(transcript) => view_data.chat.transcript = transcript,
        Err(error) => {
            emit_status(
                state,
                &mut view_data,
                &internal_tx,
                format!("chat history unavailable: {error}"),
            );
        }
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, workspace, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, workspace, &mut view_data, &internal_tx, key)
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Chat(event) => handle_chat_event(runtime, view_data, event),
        }
    }
}

fn handle_chat_event<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData, event: ChatEvent) {
    let Some(in_flight) = view_data.chat.in_flight else {
        return;
    };
    let Some(entry) = view_data.chat.transcript.last_mut() else {
        view_data.chat.in_flight = None;
        return;
    };

    match event {
        ChatEvent::Chunk { request_id, content } if request_id == in_flight => {
            entry.body.push_str(&content);
        }
        ChatEvent::Completed { request_id, body } if request_id == in_flight => {
            entry.body = body;
            view_data.chat.in_flight = None;
            // Best effort: a failed save only costs next session's history.
            let _ = runtime.save_transcript(&view_data.chat.transcript);
        }
        ChatEvent::Chunk { .. } | ChatEvent::Completed { .. } => {}
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_app(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn key_press_from_event(key: KeyEvent) -> KeyPress {
    let code = match key.code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        _ => Key::Other,
    };
    KeyPress {
        key: code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        meta: key.modifiers.contains(KeyModifiers::SUPER),
    }
}

fn focus_context(state: &AppState, view_data: &ViewData) -> FocusContext {
    if state.overlay == Overlay::SearchPalette {
        return FocusContext::Editable;
    }
    let editable = match state.route {
        Route::Finder => view_data.finder.focused,
        Route::Verifier => view_data.verifier.input.focused,
        Route::AiChat => view_data.chat.input.focused,
        _ => false,
    };
    if editable {
        FocusContext::Editable
    } else {
        FocusContext::General
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    workspace: &Workspace,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    let press = key_press_from_event(key);
    let focus = focus_context(state, view_data);
    let now = OffsetDateTime::now_utc();
    if let Some(action) = view_data.chord.handle(press, focus, now) {
        apply_shortcut_action(state, view_data, internal_tx, action);
        return false;
    }

    match state.overlay {
        Overlay::SearchPalette => {
            handle_palette_key(state, view_data, internal_tx, key);
            return false;
        }
        Overlay::Help => return false,
        Overlay::None => {}
    }

    if key.code == KeyCode::Char('/') && focus == FocusContext::General {
        apply_shortcut_action(state, view_data, internal_tx, ShortcutAction::OpenSearch);
        return false;
    }

    match state.route {
        Route::Contacts | Route::Companies | Route::AdminUsers | Route::AdminUserHistory => {
            handle_table_key(state, runtime, workspace, view_data, internal_tx, key);
        }
        Route::Finder => handle_finder_key(view_data, key),
        Route::Verifier => handle_verifier_key(runtime, view_data, key),
        Route::AiChat => handle_chat_key(runtime, view_data, internal_tx, key),
        Route::Settings => handle_settings_key(state, view_data, internal_tx, key),
        Route::Dashboard | Route::Billing | Route::Linkedin => {}
    }
    false
}

fn apply_shortcut_action(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: ShortcutAction,
) {
    match action {
        ShortcutAction::OpenSearch => {
            view_data.search_input = active_search_term(state, view_data);
            dispatch_app(state, view_data, internal_tx, AppCommand::OpenSearchPalette);
        }
        ShortcutAction::OpenHelp => {
            let command = if state.overlay == Overlay::Help {
                AppCommand::CloseOverlay
            } else {
                AppCommand::OpenHelp
            };
            dispatch_app(state, view_data, internal_tx, command);
        }
        ShortcutAction::Close => {
            dispatch_app(state, view_data, internal_tx, AppCommand::CloseOverlay);
        }
        ShortcutAction::BlurField => {
            if state.overlay == Overlay::SearchPalette {
                dispatch_app(state, view_data, internal_tx, AppCommand::CloseOverlay);
            } else {
                match state.route {
                    Route::Finder => view_data.finder.focused = false,
                    Route::Verifier => view_data.verifier.input.focused = false,
                    Route::AiChat => view_data.chat.input.focused = false,
                    _ => {}
                }
            }
        }
        ShortcutAction::Navigate(route) => {
            dispatch_app(state, view_data, internal_tx, AppCommand::Navigate(route));
        }
    }
}

fn active_search_term(state: &AppState, view_data: &ViewData) -> String {
    table_view(view_data, state.route)
        .map(|view| view.query.search_term().to_owned())
        .unwrap_or_default()
}

fn table_view(view_data: &ViewData, route: Route) -> Option<&TableUiState> {
    match route {
        Route::Contacts => Some(&view_data.contacts),
        Route::Companies => Some(&view_data.companies),
        Route::AdminUsers => Some(&view_data.admin_users),
        Route::AdminUserHistory => Some(&view_data.history),
        _ => None,
    }
}

fn table_view_mut(view_data: &mut ViewData, route: Route) -> Option<&mut TableUiState> {
    match route {
        Route::Contacts => Some(&mut view_data.contacts),
        Route::Companies => Some(&mut view_data.companies),
        Route::AdminUsers => Some(&mut view_data.admin_users),
        Route::AdminUserHistory => Some(&mut view_data.history),
        _ => None,
    }
}

fn handle_palette_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => {
            if !is_list_route(state.route) {
                // On non-list views the palette is a jump to contacts.
                let term = view_data.search_input.clone();
                view_data.contacts.query.set_search_term(term);
                dispatch_app(
                    state,
                    view_data,
                    internal_tx,
                    AppCommand::Navigate(Route::Contacts),
                );
            } else {
                dispatch_app(state, view_data, internal_tx, AppCommand::CloseOverlay);
            }
        }
        KeyCode::Backspace => {
            view_data.search_input.pop();
            apply_palette_term(state, view_data);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.search_input.push(ch);
            apply_palette_term(state, view_data);
        }
        _ => {}
    }
}

/// Live search: every edit lands in the active list view's query state,
/// which snaps the view back to page 1.
fn apply_palette_term(state: &AppState, view_data: &mut ViewData) {
    let term = view_data.search_input.clone();
    let route = state.route;
    if let Some(view) = table_view_mut(view_data, route) {
        view.query.set_search_term(term);
        view.selected = 0;
    }
}

fn page_metrics(workspace: &Workspace, view_data: &ViewData, route: Route) -> (usize, usize) {
    match route {
        Route::Contacts => {
            let result = run_query(
                &workspace.contacts,
                &contact_schema(),
                &view_data.contacts.query,
            );
            (result.page_count, result.page.len())
        }
        Route::Companies => {
            let result = run_query(
                &workspace.companies,
                &company_schema(),
                &view_data.companies.query,
            );
            (result.page_count, result.page.len())
        }
        Route::AdminUsers => {
            let result = run_query(
                &workspace.admin_users,
                &admin_user_schema(),
                &view_data.admin_users.query,
            );
            (result.page_count, result.page.len())
        }
        Route::AdminUserHistory => {
            let result = run_query(
                &workspace.history,
                &history_schema(),
                &view_data.history.query,
            );
            (result.page_count, result.page.len())
        }
        _ => (0, 0),
    }
}

fn handle_table_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    workspace: &Workspace,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let route = state.route;
    let (page_count, page_len) = page_metrics(workspace, view_data, route);

    if key.code == KeyCode::Char('r') {
        if let Some(view) = table_view_mut(view_data, route) {
            view.query.clear_filters();
            view.query.set_search_term("");
            view.selected = 0;
        }
        emit_status(state, view_data, internal_tx, "filters reset");
        return;
    }

    if route == Route::Companies && key.code == KeyCode::Char('y') {
        let result = run_query(
            &workspace.companies,
            &company_schema(),
            &view_data.companies.query,
        );
        let selected = view_data.companies.selected.min(page_len.saturating_sub(1));
        if let Some(company) = result.page.get(selected) {
            let summary = runtime.company_summary(company);
            let name = company.name.clone();
            view_data.company_summary = Some(summary);
            emit_status(state, view_data, internal_tx, format!("summary: {name}"));
        } else {
            emit_status(state, view_data, internal_tx, "no company selected");
        }
        return;
    }

    let Some(view) = table_view_mut(view_data, route) else {
        return;
    };

    match key.code {
        // The engine never clamps pages, so the boundary check lives here.
        KeyCode::Char(']') => {
            if view.query.current_page() < page_count {
                view.query.set_page(view.query.current_page() + 1);
                view.selected = 0;
            }
        }
        KeyCode::Char('[') => {
            if view.query.current_page() > 1 {
                view.query.set_page(view.query.current_page() - 1);
                view.selected = 0;
            }
        }
        KeyCode::Char('s') => {
            cycle_sort(view, sort_cycle(route));
            view.selected = 0;
        }
        KeyCode::Char('S') => {
            if let Some(spec) = view.query.sort() {
                view.query.set_sort(Some(SortSpec {
                    field: spec.field,
                    direction: spec.direction.flipped(),
                }));
            }
        }
        KeyCode::Char('<') => {
            if let Some((name, full, step)) = range_filter(route) {
                let (min, max) = current_range(&view.query, name, full);
                view.query
                    .set_filter(name, FilterValue::Range(min, (max - step).max(min)));
            }
        }
        KeyCode::Char('>') => {
            if let Some((name, full, step)) = range_filter(route) {
                let (min, max) = current_range(&view.query, name, full);
                view.query
                    .set_filter(name, FilterValue::Range(min, (max + step).min(full.1)));
            }
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() && ch != '0' => {
            if let Some((name, options)) = primary_filter(route) {
                let index = (ch as usize) - ('1' as usize);
                if let Some(option) = options.get(index) {
                    toggle_filter_option(&mut view.query, name, option);
                    view.selected = 0;
                }
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if page_len > 0 {
                view.selected = (view.selected + 1).min(page_len - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view.selected = view.selected.saturating_sub(1);
        }
        _ => {}
    }
}

fn cycle_sort(view: &mut TableUiState, names: &[&'static str]) {
    let next = match view.query.sort() {
        None => names.first().copied(),
        Some(spec) => match names.iter().position(|name| *name == spec.field) {
            Some(index) if index + 1 < names.len() => Some(names[index + 1]),
            _ => None,
        },
    };
    view.query.set_sort(next.map(|field| SortSpec {
        field,
        direction: SortDirection::Asc,
    }));
}

fn current_range(query: &QueryState, name: &str, full: (i64, i64)) -> (i64, i64) {
    match query.filter_value(name) {
        Some(FilterValue::Range(min, max)) => (*min, *max),
        _ => full,
    }
}

fn toggle_filter_option(query: &mut QueryState, name: &'static str, option: &str) {
    let mut selected = match query.filter_value(name) {
        Some(FilterValue::Selected(values)) => values.clone(),
        _ => Default::default(),
    };
    if !selected.remove(option) {
        selected.insert(option.to_owned());
    }
    query.set_filter(name, FilterValue::Selected(selected));
}

fn handle_finder_key(view_data: &mut ViewData, key: KeyEvent) {
    if !view_data.finder.focused {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('i')) {
            view_data.finder.focused = true;
        }
        return;
    }
    match key.code {
        KeyCode::Backspace => {
            view_data.finder.value.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.finder.value.push(ch);
        }
        _ => {}
    }
}

fn handle_verifier_key<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData, key: KeyEvent) {
    if !view_data.verifier.input.focused {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('i')) {
            view_data.verifier.input.focused = true;
        }
        return;
    }
    match key.code {
        KeyCode::Enter => {
            let email = view_data.verifier.input.value.trim().to_owned();
            if !email.is_empty() {
                view_data.verifier.verdict = Some(runtime.email_risk(&email));
            }
        }
        KeyCode::Backspace => {
            view_data.verifier.input.value.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.verifier.input.value.push(ch);
        }
        _ => {}
    }
}

fn handle_chat_key<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if !view_data.chat.input.focused {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char('i')) {
            view_data.chat.input.focused = true;
        }
        return;
    }
    match key.code {
        KeyCode::Enter => submit_chat_input(runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            view_data.chat.input.value.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.chat.input.value.push(ch);
        }
        _ => {}
    }
}

fn submit_chat_input<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let input = view_data.chat.input.value.trim().to_owned();
    if input.is_empty() || view_data.chat.in_flight.is_some() {
        return;
    }
    view_data.chat.input.value.clear();
    view_data.chat.transcript.push(ChatEntry::user(input));
    let history = view_data.chat.transcript.clone();
    view_data.chat.transcript.push(ChatEntry::assistant(""));

    view_data.chat.next_request_id = view_data.chat.next_request_id.wrapping_add(1);
    let request_id = view_data.chat.next_request_id;
    view_data.chat.in_flight = Some(request_id);
    runtime.spawn_chat_reply(request_id, &history, internal_tx.clone());
}

fn handle_settings_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('u') => {
            dispatch_app(
                state,
                view_data,
                internal_tx,
                AppCommand::Navigate(Route::AdminUsers),
            );
        }
        KeyCode::Char('h') => {
            dispatch_app(
                state,
                view_data,
                internal_tx,
                AppCommand::Navigate(Route::AdminUserHistory),
            );
        }
        KeyCode::Char('m') => {
            state.role = match state.role {
                WorkspaceRole::Admin => WorkspaceRole::Member,
                WorkspaceRole::Member => WorkspaceRole::Admin,
            };
            let label = if state.role.can_view_admin() {
                "role: admin"
            } else {
                "role: member"
            };
            emit_status(state, view_data, internal_tx, label);
        }
        _ => {}
    }
}

struct TableProjection {
    title: String,
    columns: &'static [&'static str],
    rows: Vec<Vec<String>>,
    footer: String,
    selected: usize,
}

fn footer_text(current_page: usize, page_count: usize, total_count: usize) -> String {
    format!("page {current_page}/{page_count} ({total_count} records)")
}

fn table_title(route: Route, query: &QueryState) -> String {
    let mut title = route.label().to_owned();
    if !query.search_term().is_empty() {
        title.push_str(&format!(" /{}", query.search_term()));
    }
    if let Some(sort) = query.sort() {
        let direction = match sort.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        title.push_str(&format!(" [{} {}]", sort.field, direction));
    }
    let active = filter_names(route)
        .iter()
        .filter(|name| query.filter_value(name).is_some())
        .count();
    if active > 0 {
        title.push_str(" [filtered]");
    }
    title
}

fn format_date(at: OffsetDateTime) -> String {
    at.date().to_string()
}

fn projection_for_route(
    route: Route,
    workspace: &Workspace,
    view_data: &ViewData,
) -> Option<TableProjection> {
    match route {
        Route::Contacts => {
            let view = &view_data.contacts;
            let result = run_query(&workspace.contacts, &contact_schema(), &view.query);
            let rows = result
                .page
                .iter()
                .map(|c| {
                    vec![
                        c.name.clone(),
                        c.email.clone(),
                        c.company.clone(),
                        c.role.as_str().to_owned(),
                        c.status.as_str().to_owned(),
                        c.score.to_string(),
                        format_date(c.created_at),
                    ]
                })
                .collect::<Vec<_>>();
            Some(TableProjection {
                title: table_title(route, &view.query),
                columns: &["name", "email", "company", "role", "status", "score", "created"],
                footer: footer_text(result.current_page, result.page_count, result.total_count),
                selected: view.selected.min(rows.len().saturating_sub(1)),
                rows,
            })
        }
        Route::Companies => {
            let view = &view_data.companies;
            let result = run_query(&workspace.companies, &company_schema(), &view.query);
            let rows = result
                .page
                .iter()
                .map(|c| {
                    vec![
                        c.name.clone(),
                        c.domain.clone(),
                        c.industry.as_str().to_owned(),
                        c.employees.to_string(),
                        c.location.clone(),
                        format_date(c.created_at),
                    ]
                })
                .collect::<Vec<_>>();
            Some(TableProjection {
                title: table_title(route, &view.query),
                columns: &["name", "domain", "industry", "employees", "location", "created"],
                footer: footer_text(result.current_page, result.page_count, result.total_count),
                selected: view.selected.min(rows.len().saturating_sub(1)),
                rows,
            })
        }
        Route::AdminUsers => {
            let view = &view_data.admin_users;
            let result = run_query(&workspace.admin_users, &admin_user_schema(), &view.query);
            let rows = result
                .page
                .iter()
                .map(|u| {
                    vec![
                        u.name.clone(),
                        u.email.clone(),
                        u.role.as_str().to_owned(),
                        u.status.as_str().to_owned(),
                        format_date(u.last_seen),
                    ]
                })
                .collect::<Vec<_>>();
            Some(TableProjection {
                title: table_title(route, &view.query),
                columns: &["name", "email", "role", "status", "last seen"],
                footer: footer_text(result.current_page, result.page_count, result.total_count),
                selected: view.selected.min(rows.len().saturating_sub(1)),
                rows,
            })
        }
        Route::AdminUserHistory => {
            let view = &view_data.history;
            let result = run_query(&workspace.history, &history_schema(), &view.query);
            let rows = result
                .page
                .iter()
                .map(|e| {
                    vec![
                        format_date(e.occurred_at),
                        e.user_name.clone(),
                        e.action.as_str().to_owned(),
                        e.detail.clone(),
                    ]
                })
                .collect::<Vec<_>>();
            Some(TableProjection {
                title: table_title(route, &view.query),
                columns: &["occurred", "user", "action", "detail"],
                footer: footer_text(result.current_page, result.page_count, result.total_count),
                selected: view.selected.min(rows.len().saturating_sub(1)),
                rows,
            })
        }
        _ => None,
    }
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    workspace: &Workspace,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = Route::NAV
        .iter()
        .position(|route| *route == state.route)
        // Admin views hang off settings, so the settings tab stays lit.
        .unwrap_or_else(|| {
            Route::NAV
                .iter()
                .position(|route| *route == Route::Settings)
                .unwrap_or(0)
        });
    let tab_titles = Route::NAV
        .iter()
        .map(|route| route.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("hyperdash").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    if let Some(projection) = projection_for_route(state.route, workspace, view_data) {
        render_table(frame, layout[1], &projection);
    } else {
        let body = body_text(state, workspace, view_data);
        let paragraph = Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.route.label()),
        );
        frame.render_widget(paragraph, layout[1]);
    }

    let status = status_text(state, view_data);
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if state.overlay == Overlay::SearchPalette {
        let area = centered_rect(60, 20, frame.area());
        frame.render_widget(Clear, area);
        let palette = Paragraph::new(render_palette_text(view_data))
            .block(Block::default().title("search").borders(Borders::ALL));
        frame.render_widget(palette, area);
    }

    if state.overlay == Overlay::Help {
        let area = centered_rect(72, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, projection: &TableProjection) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let widths = vec![Constraint::Min(8); projection.columns.len()];
    let header = Row::new(projection.columns.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = projection.rows.iter().enumerate().map(|(index, cells)| {
        let style = if index == projection.selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(cells.iter().map(|cell| Cell::from(cell.clone()))).style(style)
    });

    let table = Table::new(rows, widths).header(header).column_spacing(1).block(
        Block::default()
            .title(projection.title.clone())
            .borders(Borders::ALL),
    );
    frame.render_widget(table, parts[0]);

    let footer = Paragraph::new(projection.footer.clone()).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, parts[1]);
}

fn body_text(state: &AppState, workspace: &Workspace, view_data: &ViewData) -> String {
    match state.route {
        Route::Dashboard => render_dashboard_text(workspace),
        Route::Billing => render_billing_text(workspace),
        Route::Settings => render_settings_text(state),
        Route::Linkedin => render_linkedin_text(workspace),
        Route::Finder => render_finder_text(workspace, view_data),
        Route::Verifier => render_verifier_text(view_data),
        Route::AiChat => render_chat_text(view_data),
        _ => String::new(),
    }
}

fn render_dashboard_text(workspace: &Workspace) -> String {
    let won = workspace
        .contacts
        .iter()
        .filter(|c| c.status == LeadStatus::Won)
        .count();
    let average_score = if workspace.contacts.is_empty() {
        0
    } else {
        workspace.contacts.iter().map(|c| c.score).sum::<i64>()
            / workspace.contacts.len() as i64
    };
    [
        format!("contacts: {}", workspace.contacts.len()),
        format!("companies: {}", workspace.companies.len()),
        format!("won leads: {won}"),
        format!("average lead score: {average_score}"),
        String::new(),
        "g+letter jumps between views; ? lists every key".to_owned(),
    ]
    .join("\n")
}

fn render_billing_text(workspace: &Workspace) -> String {
    let mut lines = Vec::new();
    for plan in &workspace.plans {
        lines.push(format!(
            "{}  {}  up to {} seats",
            plan.name,
            format_price(plan.price_cents),
            plan.seat_limit
        ));
        for feature in &plan.features {
            lines.push(format!("  - {feature}"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn format_price(cents: i64) -> String {
    if cents == 0 {
        "free".to_owned()
    } else {
        format!("${}.{:02}/mo", cents / 100, cents % 100)
    }
}

fn render_settings_text(state: &AppState) -> String {
    let role = if state.role.can_view_admin() {
        "admin"
    } else {
        "member"
    };
    [
        format!("workspace role: {role}"),
        String::new(),
        "u  admin user list".to_owned(),
        "h  admin user history".to_owned(),
        "m  toggle workspace role".to_owned(),
    ]
    .join("\n")
}

fn render_linkedin_text(workspace: &Workspace) -> String {
    let mut lines = vec!["profile lookups for your newest contacts:".to_owned(), String::new()];
    for contact in workspace.contacts.iter().take(LINKEDIN_PROFILE_LIMIT) {
        lines.push(format!(
            "{}  linkedin.example.com/in/{}",
            contact.name,
            profile_slug(&contact.name)
        ));
    }
    lines.join("\n")
}

fn profile_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn render_finder_text(workspace: &Workspace, view_data: &ViewData) -> String {
    let cursor = if view_data.finder.focused { "_" } else { "" };
    let mut lines = vec![
        format!("find emails by name or company: {}{cursor}", view_data.finder.value),
        String::new(),
    ];
    if view_data.finder.value.trim().is_empty() {
        lines.push("press enter to start typing".to_owned());
        return lines.join("\n");
    }

    let mut query = QueryState::new(FINDER_MATCH_LIMIT);
    query.set_search_term(view_data.finder.value.clone());
    let result = run_query(&workspace.contacts, &contact_schema(), &query);
    if result.page.is_empty() {
        lines.push("no matches".to_owned());
    }
    for contact in &result.page {
        lines.push(format!(
            "{}  <{}>  {}",
            contact.name, contact.email, contact.company
        ));
    }
    if result.total_count > result.page.len() {
        lines.push(format!("... and {} more", result.total_count - result.page.len()));
    }
    lines.join("\n")
}

fn render_verifier_text(view_data: &ViewData) -> String {
    let cursor = if view_data.verifier.input.focused { "_" } else { "" };
    let mut lines = vec![
        format!("email to verify: {}{cursor}", view_data.verifier.input.value),
        String::new(),
    ];
    match &view_data.verifier.verdict {
        Some(verdict) => lines.push(verdict.clone()),
        None => lines.push("press enter to focus the field, enter again to verify".to_owned()),
    }
    lines.join("\n")
}

fn render_chat_text(view_data: &ViewData) -> String {
    let mut lines = Vec::new();
    for entry in &view_data.chat.transcript {
        let prefix = match entry.role {
            ChatRole::User => "you",
            ChatRole::Assistant => "assistant",
        };
        let body = if entry.body.is_empty() && view_data.chat.in_flight.is_some() {
            "..."
        } else {
            entry.body.as_str()
        };
        lines.push(format!("{prefix}: {body}"));
    }
    if lines.is_empty() {
        lines.push("ask about your pipeline; replies come from the configured model".to_owned());
    }
    lines.push(String::new());
    let cursor = if view_data.chat.input.focused { "_" } else { "" };
    lines.push(format!("> {}{cursor}", view_data.chat.input.value));
    lines.join("\n")
}

fn render_palette_text(view_data: &ViewData) -> String {
    format!(
        "{}_\n\ntype to filter the current list, enter to confirm, esc to close",
        view_data.search_input
    )
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    if view_data.chord.is_pending() {
        return "g ...".to_owned();
    }
    match state.route {
        route if is_list_route(route) => {
            "/ search  [ ] pages  s sort  S direction  1-9 filter  r reset  ? help".to_owned()
        }
        _ => "ctrl+k search  g+letter navigate  ? help  ctrl+q quit".to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    concat!(
        "global\n",
        "  ctrl+k or /   search palette\n",
        "  esc           blur input / close overlay\n",
        "  ?             this help\n",
        "  ctrl+q        quit\n",
        "\n",
        "go-to chords (g, then one of)\n",
        "  d dashboard   c contacts   o companies\n",
        "  f finder      v verifier   b billing\n",
        "  s settings    l linkedin   a ai chat\n",
        "\n",
        "list views\n",
        "  [ ]           previous / next page\n",
        "  s / S         cycle sort field / flip direction\n",
        "  1-9           toggle filter value\n",
        "  < >           narrow / widen numeric filter\n",
        "  r             reset search and filters\n",
        "  j k           move selection\n",
        "\n",
        "companies: y summarizes the selected company with AI\n",
        "settings: u users, h history, m toggle role\n",
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, ChatEntry, ViewData, footer_text, handle_key_event, help_overlay_text,
        key_press_from_event, process_internal_events, projection_for_route, table_title,
    };
    use anyhow::Result;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use hyperdash_app::{
        AppState, Company, FilterValue, Key, Overlay, Route, SortDirection, WorkspaceRole,
    };
    use hyperdash_data::{CrmFaker, Workspace, WorkspaceCounts};
    use std::sync::mpsc::{self, Receiver, Sender};

    #[derive(Default)]
    struct StubRuntime {
        risk_calls: Vec<String>,
        saved: usize,
    }

    impl AppRuntime for StubRuntime {
        fn chat_reply(&mut self, _history: &[ChatEntry]) -> String {
            "stub reply".to_owned()
        }

        fn company_summary(&mut self, company: &Company) -> String {
            format!("summary of {}", company.name)
        }

        fn email_risk(&mut self, email: &str) -> String {
            self.risk_calls.push(email.to_owned());
            "risky: free-mail domain".to_owned()
        }

        fn load_transcript(&mut self) -> Result<Vec<ChatEntry>> {
            Ok(Vec::new())
        }

        fn save_transcript(&mut self, _transcript: &[ChatEntry]) -> Result<()> {
            self.saved += 1;
            Ok(())
        }
    }

    struct Fixture {
        state: AppState,
        workspace: Workspace,
        view_data: ViewData,
        runtime: StubRuntime,
        tx: Sender<super::InternalEvent>,
        rx: Receiver<super::InternalEvent>,
    }

    fn fixture() -> Fixture {
        let workspace = CrmFaker::new(1).workspace(WorkspaceCounts {
            contacts: 23,
            companies: 8,
            admin_users: 5,
            history_events: 12,
        });
        let (tx, rx) = mpsc::channel();
        Fixture {
            state: AppState::default(),
            workspace,
            view_data: ViewData::new(10),
            runtime: StubRuntime::default(),
            tx,
            rx,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(fixture: &mut Fixture, event: KeyEvent) -> bool {
        handle_key_event(
            &mut fixture.state,
            &mut fixture.runtime,
            &fixture.workspace,
            &mut fixture.view_data,
            &fixture.tx,
            event,
        )
    }

    #[test]
    fn key_press_translation_covers_modifiers() {
        let plain = key_press_from_event(key(KeyCode::Char('g')));
        assert_eq!(plain.key, Key::Char('g'));
        assert!(!plain.ctrl && !plain.meta);

        let ctrl_k = key_press_from_event(KeyEvent::new(
            KeyCode::Char('k'),
            KeyModifiers::CONTROL,
        ));
        assert!(ctrl_k.ctrl);

        let meta_k = key_press_from_event(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER));
        assert!(meta_k.meta);

        let esc = key_press_from_event(key(KeyCode::Esc));
        assert_eq!(esc.key, Key::Escape);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut fx = fixture();
        assert!(press(
            &mut fx,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)
        ));
    }

    #[test]
    fn chord_navigates_between_views() {
        let mut fx = fixture();
        assert!(!press(&mut fx, key(KeyCode::Char('g'))));
        assert!(!press(&mut fx, key(KeyCode::Char('c'))));
        assert_eq!(fx.state.route, Route::Contacts);

        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('b')));
        assert_eq!(fx.state.route, Route::Billing);
    }

    #[test]
    fn ctrl_k_opens_palette_and_typing_filters_the_list() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));

        press(
            &mut fx,
            KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL),
        );
        assert_eq!(fx.state.overlay, Overlay::SearchPalette);

        fx.view_data.contacts.query.set_page(2);
        press(&mut fx, key(KeyCode::Char('a')));
        assert_eq!(fx.view_data.contacts.query.search_term(), "a");
        assert_eq!(fx.view_data.contacts.query.current_page(), 1);

        press(&mut fx, key(KeyCode::Enter));
        assert_eq!(fx.state.overlay, Overlay::None);
        assert_eq!(fx.view_data.contacts.query.search_term(), "a");
    }

    #[test]
    fn escape_in_palette_blurs_it_closed() {
        let mut fx = fixture();
        press(
            &mut fx,
            KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL),
        );
        assert_eq!(fx.state.overlay, Overlay::SearchPalette);
        press(&mut fx, key(KeyCode::Esc));
        assert_eq!(fx.state.overlay, Overlay::None);
    }

    #[test]
    fn slash_opens_the_palette_outside_editable_focus() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));

        press(&mut fx, key(KeyCode::Char('/')));
        assert_eq!(fx.state.overlay, Overlay::SearchPalette);

        press(&mut fx, key(KeyCode::Esc));
        assert_eq!(fx.state.overlay, Overlay::None);

        // In a focused text input the slash is just a character.
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('f')));
        press(&mut fx, key(KeyCode::Enter));
        press(&mut fx, key(KeyCode::Char('/')));
        assert_eq!(fx.state.overlay, Overlay::None);
        assert_eq!(fx.view_data.finder.value, "/");
    }

    #[test]
    fn page_keys_clamp_at_boundaries() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));

        // 23 contacts at page size 10 is 3 pages.
        press(&mut fx, key(KeyCode::Char('[')));
        assert_eq!(fx.view_data.contacts.query.current_page(), 1);

        for _ in 0..5 {
            press(&mut fx, key(KeyCode::Char(']')));
        }
        assert_eq!(fx.view_data.contacts.query.current_page(), 3);
    }

    #[test]
    fn digit_keys_toggle_the_role_filter() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));

        press(&mut fx, key(KeyCode::Char('1')));
        match fx.view_data.contacts.query.filter_value("role") {
            Some(FilterValue::Selected(values)) => {
                assert!(values.contains("Manager"));
            }
            other => panic!("unexpected filter value: {other:?}"),
        }

        press(&mut fx, key(KeyCode::Char('1')));
        match fx.view_data.contacts.query.filter_value("role") {
            Some(FilterValue::Selected(values)) => assert!(values.is_empty()),
            other => panic!("unexpected filter value: {other:?}"),
        }

        press(&mut fx, key(KeyCode::Char('2')));
        press(&mut fx, key(KeyCode::Char('r')));
        assert!(fx.view_data.contacts.query.filter_value("role").is_none());
    }

    #[test]
    fn sort_keys_cycle_fields_and_flip_direction() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));

        // Contacts start sorted by name ascending.
        let start = fx.view_data.contacts.query.sort().expect("default sort");
        assert_eq!(start.field, "name");
        assert_eq!(start.direction, SortDirection::Asc);

        press(&mut fx, key(KeyCode::Char('s')));
        let next = fx.view_data.contacts.query.sort().expect("cycled sort");
        assert_eq!(next.field, "company");

        press(&mut fx, key(KeyCode::Char('S')));
        let flipped = fx.view_data.contacts.query.sort().expect("flipped sort");
        assert_eq!(flipped.direction, SortDirection::Desc);
    }

    #[test]
    fn settings_opens_admin_views_for_admins_only() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('s')));
        assert_eq!(fx.state.route, Route::Settings);

        press(&mut fx, key(KeyCode::Char('u')));
        assert_eq!(fx.state.route, Route::AdminUsers);

        fx.state.role = WorkspaceRole::Member;
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('s')));
        press(&mut fx, key(KeyCode::Char('h')));
        assert_eq!(fx.state.route, Route::Settings);
        assert_eq!(fx.state.status_line.as_deref(), Some("admin only"));
    }

    #[test]
    fn verifier_submits_the_typed_address() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('v')));
        assert_eq!(fx.state.route, Route::Verifier);

        press(&mut fx, key(KeyCode::Enter));
        for ch in "jo@acme.example.com".chars() {
            press(&mut fx, key(KeyCode::Char(ch)));
        }
        press(&mut fx, key(KeyCode::Enter));

        assert_eq!(fx.runtime.risk_calls, vec!["jo@acme.example.com".to_owned()]);
        assert_eq!(
            fx.view_data.verifier.verdict.as_deref(),
            Some("risky: free-mail domain")
        );
    }

    #[test]
    fn typed_g_in_editable_input_is_text_not_a_chord() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('f')));
        assert_eq!(fx.state.route, Route::Finder);

        press(&mut fx, key(KeyCode::Enter));
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));
        assert_eq!(fx.state.route, Route::Finder);
        assert_eq!(fx.view_data.finder.value, "gc");

        // Escape blurs the field; the chord works again afterwards.
        press(&mut fx, key(KeyCode::Esc));
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('c')));
        assert_eq!(fx.state.route, Route::Contacts);
    }

    #[test]
    fn chat_submission_round_trips_through_the_runtime() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('a')));
        assert_eq!(fx.state.route, Route::AiChat);

        press(&mut fx, key(KeyCode::Enter));
        for ch in "hello".chars() {
            press(&mut fx, key(KeyCode::Char(ch)));
        }
        press(&mut fx, key(KeyCode::Enter));

        assert_eq!(fx.view_data.chat.transcript.len(), 2);
        assert!(fx.view_data.chat.in_flight.is_some());

        process_internal_events(&mut fx.state, &mut fx.runtime, &mut fx.view_data, &fx.rx);
        assert!(fx.view_data.chat.in_flight.is_none());
        assert_eq!(fx.view_data.chat.transcript[1].body, "stub reply");
        assert_eq!(fx.runtime.saved, 1);
    }

    #[test]
    fn company_summary_requests_the_selected_row() {
        let mut fx = fixture();
        press(&mut fx, key(KeyCode::Char('g')));
        press(&mut fx, key(KeyCode::Char('o')));
        assert_eq!(fx.state.route, Route::Companies);

        press(&mut fx, key(KeyCode::Char('y')));
        let summary = fx.view_data.company_summary.as_deref().expect("summary");
        assert!(summary.starts_with("summary of "));
    }

    #[test]
    fn projection_footer_reports_exact_pagination() {
        let fx = fixture();
        let projection =
            projection_for_route(Route::Contacts, &fx.workspace, &fx.view_data).expect("projection");
        assert_eq!(projection.footer, "page 1/3 (23 records)");
        assert_eq!(projection.rows.len(), 10);
        assert_eq!(footer_text(4, 3, 23), "page 4/3 (23 records)");
    }

    #[test]
    fn table_title_marks_search_sort_and_filters() {
        let mut fx = fixture();
        fx.view_data.contacts.query.set_search_term("ada");
        fx.view_data
            .contacts
            .query
            .set_filter("role", FilterValue::selected(["Manager"]));
        let title = table_title(Route::Contacts, &fx.view_data.contacts.query);
        assert!(title.contains("/ada"));
        assert!(title.contains("[filtered]"));
    }

    #[test]
    fn help_lists_every_chord_letter() {
        let help = help_overlay_text();
        for line in ["d dashboard", "c contacts", "o companies", "a ai chat"] {
            assert!(help.contains(line), "missing {line}");
        }
    }
}
