//! Login screen, the only public screen.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use secrecy::SecretString;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use shelfy_core::Context;

use crate::action::Action;
use crate::component::Component;
use crate::screens::widgets::{centered, hint_line, input_request, paste_into};
use crate::theme;

const LABEL_WIDTH: u16 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

pub struct LoginScreen {
    ctx: Context,
    email: Input,
    password: Input,
    field: Field,
    submitting: bool,
    error: Option<String>,
    action_tx: Option<UnboundedSender<Action>>,
}

impl LoginScreen {
    /// `email` pre-fills the form, usually from the active profile.
    pub fn new(ctx: Context, email: Option<String>) -> Self {
        let field = if email.is_some() {
            Field::Password
        } else {
            Field::Email
        };
        Self {
            ctx,
            email: Input::new(email.unwrap_or_default()),
            password: Input::default(),
            field,
            submitting: false,
            error: None,
            action_tx: None,
        }
    }

    fn focused_input(&mut self) -> &mut Input {
        match self.field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    fn submit(&mut self) {
        let email = self.email.value().trim().to_owned();
        if email.is_empty() || self.password.value().is_empty() {
            self.error = Some("Email and password are required".into());
            return;
        }
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.submitting = true;
        self.error = None;

        let ctx = self.ctx.clone();
        let password = SecretString::from(self.password.value().to_owned());
        tokio::spawn(async move {
            let result = ctx.login(&email, &password).await;
            let _ = tx.send(Action::LoginFinished { email, result });
        });
    }
}

impl Component for LoginScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::Quit)),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_field(),
            KeyCode::Enter if self.field == Field::Email => self.field = Field::Password,
            KeyCode::Enter => self.submit(),
            _ => {
                if let Some(request) = input_request(key) {
                    self.focused_input().handle(request);
                }
            }
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if !self.submitting {
            paste_into(self.focused_input(), text);
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::LoginFinished { result, .. } = action {
            self.submitting = false;
            self.password.reset();
            self.error = result
                .as_ref()
                .err()
                .map(|err| err.user_message("Login failed"));
            self.field = Field::Password;
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rect = centered(area, 50, 10);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(" Sign in ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let masked = "•".repeat(self.password.value().chars().count());
        let row = |label: &str, value: String, field: Field| {
            let style = if field == self.field {
                theme::label_focused()
            } else {
                theme::label()
            };
            Line::from(vec![
                Span::styled(
                    format!("{label:<width$}", width = usize::from(LABEL_WIDTH)),
                    style,
                ),
                Span::styled(value, theme::value()),
            ])
        };

        let mut lines = vec![
            Line::from(Span::styled(
                self.ctx.api().base_url().to_string(),
                theme::key_hint(),
            )),
            Line::from(""),
            row("Email", self.email.value().to_owned(), Field::Email),
            row("Password", masked, Field::Password),
            Line::from(""),
        ];
        if self.submitting {
            lines.push(Line::from(Span::styled("Signing in…", theme::key_hint())));
        } else if let Some(err) = &self.error {
            lines.push(Line::from(Span::styled(err.clone(), theme::error())));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(hint_line(&[("Tab", "switch"), ("Enter", "sign in"), ("Esc", "quit")]));
        frame.render_widget(Paragraph::new(lines), inner);

        if !self.submitting {
            let (input, offset) = match self.field {
                Field::Email => (&self.email, 2),
                Field::Password => (&self.password, 3),
            };
            let cursor = u16::try_from(input.visual_cursor()).unwrap_or(u16::MAX);
            let x = inner
                .x
                .saturating_add(LABEL_WIDTH)
                .saturating_add(cursor)
                .min(inner.right().saturating_sub(1));
            frame.set_cursor_position((x, inner.y.saturating_add(offset)));
        }
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn hints(&self) -> &'static str {
        "Tab switch  Enter sign in  Esc quit"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use shelfy_core::{ClientConfig, CoreError, Session};

    use super::*;

    fn screen(email: Option<&str>) -> LoginScreen {
        let config = ClientConfig::new("http://127.0.0.1:9".parse().unwrap());
        let ctx = Context::new(&config, Session::anonymous()).unwrap();
        LoginScreen::new(ctx, email.map(str::to_owned))
    }

    fn press(screen: &mut LoginScreen, code: KeyCode) {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    #[test]
    fn known_email_starts_on_password() {
        let s = screen(Some("ana@example.com"));
        assert_eq!(s.field, Field::Password);
        assert_eq!(s.email.value(), "ana@example.com");
        assert_eq!(screen(None).field, Field::Email);
    }

    #[test]
    fn enter_moves_from_email_to_password() {
        let mut s = screen(None);
        for c in "a@b.c".chars() {
            press(&mut s, KeyCode::Char(c));
        }
        press(&mut s, KeyCode::Enter);
        press(&mut s, KeyCode::Char('x'));
        assert_eq!(s.email.value(), "a@b.c");
        assert_eq!(s.password.value(), "x");
    }

    #[test]
    fn empty_credentials_are_rejected_locally() {
        let mut s = screen(Some("a@b.c"));
        press(&mut s, KeyCode::Enter);
        assert!(!s.submitting);
        assert_eq!(s.error.as_deref(), Some("Email and password are required"));
    }

    #[test]
    fn failed_login_shows_the_server_message() {
        let mut s = screen(Some("a@b.c"));
        s.submitting = true;
        s.password = Input::new("wrong".into());
        let action = Action::LoginFinished {
            email: "a@b.c".into(),
            result: Err(CoreError::AuthenticationFailed {
                message: "Invalid credentials".into(),
            }),
        };
        s.update(&action).unwrap();
        assert!(!s.submitting);
        assert_eq!(s.password.value(), "");
        assert_eq!(s.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn paste_goes_to_the_focused_field() {
        let mut s = screen(None);
        s.handle_paste("ana@example.com").unwrap();
        assert_eq!(s.email.value(), "ana@example.com");
        assert_eq!(s.password.value(), "");
    }

    #[test]
    fn escape_quits() {
        let mut s = screen(None);
        let action = s
            .handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(action, Some(Action::Quit)));
    }
}
