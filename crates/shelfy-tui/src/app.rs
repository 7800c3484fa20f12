//! Application core: the event loop, route guard, and action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use shelfy_core::{Context, RouteDecision};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::screens::widgets::centered;
use crate::store::{self, TokenStore};
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

pub struct App {
    ctx: Context,
    /// Config profile the session belongs to.
    profile: String,
    /// Email of the last login, pre-filled on the login screen.
    email: Option<String>,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    notification: Option<(Notification, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops the session bridge.
    bridge_cancel: CancellationToken,
}

impl App {
    pub fn new(ctx: Context, profile: String, email: Option<String>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&ctx, email.clone());
        let mut app = Self {
            ctx,
            profile,
            email,
            active_screen: ScreenId::Login,
            screens,
            running: true,
            help_visible: false,
            notification: None,
            action_tx,
            action_rx,
            bridge_cancel: CancellationToken::new(),
        };
        app.active_screen = app.route(ScreenId::HOME);
        app
    }

    /// Where a request for `target` actually lands under the session guard.
    fn route(&self, target: ScreenId) -> ScreenId {
        match self.ctx.session().guard(target.kind()) {
            RouteDecision::Render => target,
            RouteDecision::RedirectToLogin => ScreenId::Login,
            RouteDecision::RedirectToHome => ScreenId::HOME,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    fn active(&self) -> Option<&dyn Component> {
        self.screens.get(&self.active_screen).map(|s| &**s)
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let session = self.ctx.session().clone();
        let tx = self.action_tx.clone();
        let cancel = self.bridge_cancel.clone();
        tokio::spawn(async move {
            crate::session_bridge::run_session_bridge(session, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(profile = %self.profile, screen = %self.active_screen, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => {
                    if let Some(action) = self.handle_paste(&text)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.bridge_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Keys ────────────────────────────────────────────────────────

    /// Pastes only reach screens with an open text field; the help
    /// overlay swallows them.
    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_paste(text),
            None => Ok(None),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let captured = self.active().is_some_and(|s| s.captures_input());
        if !captured {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
                (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                    let screen = c
                        .to_digit(10)
                        .and_then(|d| u8::try_from(d).ok())
                        .and_then(ScreenId::from_number);
                    if let Some(screen) = screen {
                        return Ok(Some(Action::SwitchScreen(screen)));
                    }
                }
                (KeyModifiers::NONE, KeyCode::Tab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
                }
                (_, KeyCode::BackTab) => {
                    return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
                }
                (_, KeyCode::Char('L')) if self.active_screen != ScreenId::Login => {
                    return Ok(Some(Action::Logout));
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    // ── Actions ─────────────────────────────────────────────────────

    fn switch_to(&mut self, target: ScreenId) {
        let target = self.route(target);
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Rebuild every screen for a new session. The old screens are
    /// dropped, which cancels their in-flight requests.
    fn reset_screens(&mut self, authenticated: bool) -> Result<()> {
        self.screens = create_screens(&self.ctx, self.email.clone());
        let target = if authenticated {
            ScreenId::HOME
        } else {
            ScreenId::Login
        };
        self.active_screen = self.route(target);
        self.init_screens()
    }

    fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    fn login_finished(&mut self, email: &str, token: &SecretString) {
        self.email = Some(email.to_owned());
        self.notify(Notification::success(format!("Signed in as {email}")));

        let profile = self.profile.clone();
        let server = self
            .ctx
            .api()
            .base_url()
            .as_str()
            .trim_end_matches('/')
            .to_owned();
        let email = email.to_owned();
        let token = token.clone();
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            match store::persist_login(&profile, &server, &email, &token) {
                Ok(TokenStore::Keyring) => {}
                Ok(TokenStore::Plaintext) => {
                    let _ = tx.send(Action::Notify(Notification::info(
                        "Keyring unavailable; token saved in the config file",
                    )));
                }
                Err(err) => {
                    warn!(error = %err, "failed to save login");
                    let _ = tx.send(Action::Notify(Notification::error(format!(
                        "Login not saved: {err}"
                    ))));
                }
            }
        });
    }

    fn logout(&mut self) {
        self.ctx.logout();
        self.notify(Notification::info("Logged out"));

        let profile = self.profile.clone();
        let tx = self.action_tx.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(err) = store::forget_login(&profile) {
                warn!(error = %err, "failed to forget login");
                let _ = tx.send(Action::Notify(Notification::error(format!(
                    "Stored token not removed: {err}"
                ))));
            }
        });
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => self.switch_to(*target),

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Render => {}

            Action::Tick => {
                let expired = self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL);
                if expired {
                    self.notification = None;
                }
            }

            Action::LoginFinished { email, result } => {
                if let Ok(token) = result {
                    self.login_finished(email, token);
                }
                if let Some(screen) = self.screens.get_mut(&ScreenId::Login) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::SessionChanged { authenticated } => {
                info!(authenticated, "session changed, rebuilding screens");
                self.reset_screens(*authenticated)?;
            }

            Action::Logout => self.logout(),

            Action::Notify(notification) => self.notify(notification.clone()),

            Action::Books(_) | Action::Categories(_) | Action::Reviews(_) => {
                let Some(target) = action.target() else {
                    return Ok(());
                };
                if let Some(screen) = self.screens.get_mut(&target) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content, tabs, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.active() {
            screen.render(frame, content);
        }
        if self.active_screen != ScreenId::Login {
            self.render_tab_bar(frame, tabs);
        }
        self.render_status_bar(frame, status);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::TABS
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let lead = match &self.notification {
            Some((n, _)) => {
                let (icon, style) = match n.level {
                    NotificationLevel::Success => ("✓", theme::success()),
                    NotificationLevel::Error => ("✗", theme::error()),
                    NotificationLevel::Info => ("·", theme::value()),
                };
                Span::styled(format!(" {icon} {} ", n.message), style)
            }
            None => {
                let who = self.email.as_deref().unwrap_or("anonymous");
                Span::styled(
                    format!(" {} · {who} ", self.profile),
                    theme::label(),
                )
            }
        };

        let screen_hints = self.active().map(|s| s.hints()).unwrap_or_default();
        let global = if self.active_screen == ScreenId::Login {
            ""
        } else {
            "  L logout  ? help  q quit"
        };
        let line = Line::from(vec![
            lead,
            Span::styled(format!("│ {screen_hints}{global}"), theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let rect = centered(area, 60, 20);
        frame.render_widget(Clear, rect);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let entry = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<12}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };
        let heading = |text: &'static str| Line::from(Span::styled(text, theme::title_style()));

        let lines = vec![
            heading("  Navigation"),
            entry("1-3 Tab", "Switch screen"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("g/G", "Top / bottom"),
            entry("[ ]", "Previous / next page"),
            entry("r", "Reload"),
            Line::from(""),
            heading("  Records"),
            entry("Enter", "Open detail"),
            entry("n", "New record"),
            entry("e", "Edit"),
            entry("d", "Delete (asks y/n)"),
            entry("f / F", "Cycle / clear book filter (reviews)"),
            entry("Ctrl-S", "Save form"),
            entry("Esc", "Close"),
            Line::from(""),
            heading("  Global"),
            entry("L", "Log out"),
            entry("q Ctrl-C", "Quit"),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
