//! One screen type for every resource: a paged table, a detail modal
//! with delete confirmation, and a create/edit form modal.

use std::future::Future;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use tui_input::Input;

use shelfy_core::{
    Context, Draft, EntityId, FieldKind, FieldSpec, FormController, LoadState, ResourceScreen,
    Selection,
};

use crate::action::{Action, Notification, ResourceMsg};
use crate::component::Component;
use crate::screens::resources::{ResourceUi, cycle_option, option_label};
use crate::screens::widgets::{centered, hint_line, input_request, paste_into};
use crate::theme;

const LABEL_WIDTH: u16 = 14;

pub struct ResourceView<R: ResourceUi> {
    screen: ResourceScreen<R>,
    table_state: TableState,
    /// One input per draft field while a form is open.
    inputs: Vec<Input>,
    field_idx: usize,
    focused: bool,
    started: bool,
    action_tx: Option<UnboundedSender<Action>>,
}

impl<R: ResourceUi> ResourceView<R> {
    pub fn new(ctx: Context) -> Self {
        Self {
            screen: ResourceScreen::new(ctx),
            table_state: TableState::default(),
            inputs: Vec::new(),
            field_idx: 0,
            focused: false,
            started: false,
            action_tx: None,
        }
    }

    fn fields() -> &'static [FieldSpec] {
        <R::Draft as Draft>::fields()
    }

    // ── Background work ─────────────────────────────────────────

    fn spawn<F>(&self, work: F)
    where
        F: Future<Output = ResourceMsg<R>> + Send + 'static,
    {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        tokio::spawn(async move {
            let msg = work.await;
            let _ = tx.send(R::wrap(msg));
        });
    }

    fn load(&mut self) {
        match self.screen.begin_load() {
            Ok(ticket) => self.spawn(async move { ResourceMsg::Loaded(ticket.run().await) }),
            Err(err) => warn!(resource = %R::KIND, error = %err, "cannot load list"),
        }
    }

    fn load_options(&mut self) {
        match self.screen.begin_options() {
            Ok(ticket) => self.spawn(async move { ResourceMsg::Options(ticket.run().await) }),
            Err(err) => warn!(resource = %R::KIND, error = %err, "cannot load reference options"),
        }
    }

    fn submit(&mut self) {
        match self.screen.begin_submit() {
            Ok(ticket) => self.spawn(async move { ResourceMsg::Saved(ticket.run().await) }),
            // Validation and session errors are already on the form.
            Err(err) => debug!(resource = %R::KIND, error = %err, "save refused"),
        }
    }

    fn confirm_delete(&mut self) {
        match self.screen.begin_delete() {
            Ok(ticket) => self.spawn(async move { ResourceMsg::Deleted(ticket.run().await) }),
            Err(err) => debug!(resource = %R::KIND, error = %err, "delete refused"),
        }
    }

    // ── Selection ───────────────────────────────────────────────

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        let len = self.screen.list().items().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let next = self.selected_index().saturating_add_signed(delta);
        self.select(next);
    }

    fn selected_entity(&self) -> Option<R::Entity> {
        self.screen.list().items().get(self.selected_index()).cloned()
    }

    // ── Form inputs ─────────────────────────────────────────────

    /// Rebuild the inputs from the open form's draft.
    fn reset_inputs(&mut self) {
        self.field_idx = 0;
        self.inputs = match self.screen.form() {
            Some(form) => Self::fields()
                .iter()
                .map(|f| Input::new(form.draft().value(f.name).unwrap_or_default()))
                .collect(),
            None => Vec::new(),
        };
    }

    /// Pick up draft values changed outside the inputs (reseeded
    /// references), keeping the cursor of untouched fields.
    fn sync_inputs(&mut self) {
        let Some(form) = self.screen.form() else {
            return;
        };
        for (input, spec) in self.inputs.iter_mut().zip(Self::fields()) {
            let value = form.draft().value(spec.name).unwrap_or_default();
            if input.value() != value {
                *input = Input::new(value);
            }
        }
    }

    fn set_current_field(&mut self) {
        let Some(spec) = Self::fields().get(self.field_idx) else {
            return;
        };
        let Some(input) = self.inputs.get(self.field_idx) else {
            return;
        };
        if let Some(form) = self.screen.form_mut() {
            if let Err(err) = form.set_field(spec.name, input.value()) {
                debug!(field = spec.name, error = %err, "field rejected");
            }
        }
    }

    fn cycle_reference(&mut self) {
        let current = self
            .inputs
            .get(self.field_idx)
            .and_then(|i| i.value().parse::<EntityId>().ok());
        let Some(next) = cycle_option(current, self.screen.options()) else {
            return;
        };
        if let Some(input) = self.inputs.get_mut(self.field_idx) {
            *input = Input::new(next.to_string());
        }
        self.set_current_field();
    }

    fn clear_reference(&mut self) {
        if let Some(input) = self.inputs.get_mut(self.field_idx) {
            *input = Input::default();
        }
        self.set_current_field();
    }

    // ── Key handling ────────────────────────────────────────────

    fn handle_form_key(&mut self, key: KeyEvent) {
        let submitting = self
            .screen
            .form()
            .is_some_and(FormController::is_submitting);
        let count = Self::fields().len();
        let kind = Self::fields().get(self.field_idx).map(|f| f.kind);

        match key.code {
            KeyCode::Esc => {
                self.screen.close();
                self.reset_inputs();
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            _ if submitting => {}
            KeyCode::Tab | KeyCode::Down => self.field_idx = (self.field_idx + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.field_idx = (self.field_idx + count - 1) % count,
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Right
                if kind == Some(FieldKind::Reference) =>
            {
                self.cycle_reference();
            }
            KeyCode::Backspace | KeyCode::Delete if kind == Some(FieldKind::Reference) => {
                self.clear_reference();
            }
            _ if kind == Some(FieldKind::Reference) => {}
            KeyCode::Enter if self.field_idx + 1 == count => self.submit(),
            KeyCode::Enter => self.field_idx += 1,
            _ => {
                let Some(request) = input_request(key) else {
                    return;
                };
                let changed = self
                    .inputs
                    .get_mut(self.field_idx)
                    .and_then(|input| input.handle(request))
                    .is_some_and(|state| state.value);
                if changed {
                    self.set_current_field();
                }
            }
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        if self.screen.deletion().is_confirming() {
            match key.code {
                KeyCode::Char('y' | 'Y') => self.confirm_delete(),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.screen.cancel_delete(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('e') => {
                if self.screen.edit_selected() {
                    self.reset_inputs();
                }
            }
            KeyCode::Char('d') => {
                self.screen.request_delete();
            }
            KeyCode::Esc | KeyCode::Enter => {
                self.screen.close();
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Char(']') | KeyCode::PageDown => {
                if self.screen.list_mut().change_page(1) {
                    self.load();
                }
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                if self.screen.list_mut().change_page(-1) {
                    self.load();
                }
            }
            KeyCode::Char('r') => {
                self.load();
                self.load_options();
            }
            KeyCode::Enter => {
                if let Some(entity) = self.selected_entity() {
                    self.screen.view(entity);
                }
            }
            KeyCode::Char('e') => {
                if let Some(entity) = self.selected_entity() {
                    if self.screen.edit(entity) {
                        self.reset_inputs();
                    }
                }
            }
            KeyCode::Char('n') => {
                if self.screen.create() {
                    self.reset_inputs();
                }
            }
            KeyCode::Char('f') => {
                let next = R::next_filter(self.screen.list().filter(), self.screen.options());
                if let Some(filter) = next {
                    if self.screen.list_mut().set_filter(filter) {
                        self.load();
                    }
                }
            }
            KeyCode::Char('F') => {
                if self.screen.list_mut().clear_filter() {
                    self.load();
                }
            }
            _ => {}
        }
    }

    // ── Results ─────────────────────────────────────────────────

    fn apply(&mut self, msg: ResourceMsg<R>) -> Option<Action> {
        match msg {
            ResourceMsg::Loaded(outcome) => {
                if self.screen.list_mut().finish_load(outcome) {
                    self.select(self.selected_index());
                }
                None
            }
            ResourceMsg::Saved(outcome) => {
                let saved = outcome.result.is_ok() && self.screen.form().is_some();
                if let Some(ticket) = self.screen.finish_submit(outcome) {
                    self.spawn(async move { ResourceMsg::Loaded(ticket.run().await) });
                }
                if saved && self.screen.form().is_none() {
                    self.reset_inputs();
                    return Some(Action::Notify(Notification::success(format!(
                        "Saved {}",
                        R::KIND
                    ))));
                }
                None
            }
            ResourceMsg::Deleted(outcome) => {
                let ticket = self.screen.finish_delete(outcome)?;
                self.spawn(async move { ResourceMsg::Loaded(ticket.run().await) });
                Some(Action::Notify(Notification::success(format!("Deleted {}", R::KIND))))
            }
            ResourceMsg::Options(outcome) => {
                self.screen.finish_options(outcome);
                self.sync_inputs();
                None
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let list = self.screen.list();
        let mut spans = vec![
            Span::styled(format!(" {} ", R::KIND.plural()), theme::title_style()),
            Span::styled(format!(" page {} ", list.page()), theme::label()),
        ];
        if let Some(label) = R::filter_label(list.filter(), self.screen.options()) {
            spans.push(Span::styled(format!(" {label} "), theme::value()));
        }
        match list.state() {
            LoadState::Loading => spans.push(Span::styled(" loading… ", theme::key_hint())),
            LoadState::Failed { message } => {
                spans.push(Span::styled(format!(" {message} "), theme::error()));
            }
            LoadState::Idle | LoadState::Loaded => {}
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let items = self.screen.list().items();
        if items.is_empty() {
            let text = match self.screen.list().state() {
                LoadState::Idle | LoadState::Loading => {
                    Span::styled("Loading…", theme::key_hint())
                }
                LoadState::Failed { message } => Span::styled(message.clone(), theme::error()),
                LoadState::Loaded => Span::styled(
                    format!(
                        "No {} on this page. Press n to add one.",
                        R::KIND.plural().to_lowercase()
                    ),
                    theme::key_hint(),
                ),
            };
            frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
            return;
        }

        let header = Row::new(R::HEADERS.iter().copied()).style(theme::table_header());
        let rows = items
            .iter()
            .map(|e| Row::new(R::row(e)).style(theme::table_row()));
        let table = Table::new(rows, R::widths())
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(table, area, &mut self.table_state.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, entity: &R::Entity) {
        let rect = centered(area, 70, 18);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(format!(" {} ", R::title(entity)))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut lines: Vec<Line> = R::detail(entity)
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<width$}", width = usize::from(LABEL_WIDTH)), theme::label()),
                    Span::styled(value, theme::value()),
                ])
            })
            .collect();
        lines.push(Line::from(""));

        let deletion = self.screen.deletion();
        if deletion.is_confirming() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("Delete {}? ", R::title(entity)),
                    theme::error().add_modifier(Modifier::BOLD),
                ),
                Span::styled("y", theme::key_hint_key()),
                Span::styled(" yes  ", theme::key_hint()),
                Span::styled("n", theme::key_hint_key()),
                Span::styled(" no", theme::key_hint()),
            ]));
        } else if deletion.is_deleting() {
            lines.push(Line::from(Span::styled("Deleting…", theme::key_hint())));
        } else {
            if let Some(err) = deletion.error() {
                lines.push(Line::from(Span::styled(err.to_owned(), theme::error())));
            }
            lines.push(hint_line(&[("e", "edit"), ("d", "delete"), ("Esc", "close")]));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, form: &FormController<R>) {
        let fields = Self::fields();
        let height = u16::try_from(fields.len()).unwrap_or(u16::MAX).saturating_add(7);
        let rect = centered(area, 70, height);
        frame.render_widget(Clear, rect);

        let title = if form.is_edit() {
            format!(" Edit {} ", R::KIND)
        } else {
            format!(" New {} ", R::KIND)
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme::border_focused());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut lines = Vec::with_capacity(fields.len() + 4);
        for (idx, spec) in fields.iter().enumerate() {
            let focused = idx == self.field_idx;
            let style = if focused {
                theme::label_focused()
            } else {
                theme::label()
            };
            let marker = if focused { "▸ " } else { "  " };
            let required = if spec.required { "*" } else { " " };
            let raw = self.inputs.get(idx).map(Input::value).unwrap_or_default();
            let value = match spec.kind {
                FieldKind::Reference => {
                    let id = raw.parse::<EntityId>().ok();
                    let label = option_label(id, self.screen.options());
                    if label.is_empty() {
                        "(none)".to_owned()
                    } else {
                        format!("◂ {label} ▸")
                    }
                }
                FieldKind::Text | FieldKind::LongText => raw.to_owned(),
            };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(
                    format!("{:<width$}", format!("{}{required}", spec.label), width = usize::from(LABEL_WIDTH)),
                    style,
                ),
                Span::styled(value, theme::value()),
            ]));
        }

        lines.push(Line::from(""));
        if form.is_submitting() {
            lines.push(Line::from(Span::styled("Saving…", theme::key_hint())));
        } else if let Some(err) = form.error() {
            lines.push(Line::from(Span::styled(err.to_owned(), theme::error())));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(hint_line(&[
            ("Tab", "next"),
            ("Enter", "pick/next"),
            ("Ctrl-S", "save"),
            ("Esc", "cancel"),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);

        let on_text = fields
            .get(self.field_idx)
            .is_some_and(|f| f.kind != FieldKind::Reference);
        if on_text && !form.is_submitting() {
            if let Some(input) = self.inputs.get(self.field_idx) {
                let offset = u16::try_from(input.visual_cursor()).unwrap_or(u16::MAX);
                let x = inner
                    .x
                    .saturating_add(2 + LABEL_WIDTH)
                    .saturating_add(offset)
                    .min(inner.right().saturating_sub(1));
                let row = u16::try_from(self.field_idx).unwrap_or(0);
                frame.set_cursor_position((x, inner.y.saturating_add(row)));
            }
        }
    }
}

impl<R: ResourceUi> Component for ResourceView<R> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.screen.form().is_some() {
            self.handle_form_key(key);
        } else if self.screen.selection().is_detail_open() {
            self.handle_detail_key(key);
        } else {
            self.handle_list_key(key);
        }
        Ok(None)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        let editable = self
            .screen
            .form()
            .is_some_and(|form| !form.is_submitting());
        let is_text = Self::fields()
            .get(self.field_idx)
            .is_some_and(|spec| spec.kind != FieldKind::Reference);
        if editable && is_text {
            let changed = self
                .inputs
                .get_mut(self.field_idx)
                .is_some_and(|input| paste_into(input, text));
            if changed {
                self.set_current_field();
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match R::unwrap(action) {
            Some(msg) => Ok(self.apply(msg.clone())),
            None => Ok(None),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        self.render_header(frame, header);
        self.render_table(frame, body);

        if let Some(form) = self.screen.form() {
            self.render_form(frame, area, form);
        } else if let Selection::Viewing(entity) = self.screen.selection() {
            self.render_detail(frame, area, entity);
        }
    }

    fn captures_input(&self) -> bool {
        self.screen.form().is_some() || self.screen.selection().is_detail_open()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused && !self.started {
            self.started = true;
            self.load();
            self.load_options();
        }
    }

    fn hints(&self) -> &'static str {
        if self.screen.form().is_some() {
            "Tab next  Ctrl-S save  Esc cancel"
        } else if self.screen.selection().is_detail_open() {
            "e edit  d delete  Esc close"
        } else {
            R::LIST_HINTS
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use shelfy_core::{Books, Categories, Category, ClientConfig, EntityId, Reviews, Session};

    use super::*;

    fn ctx() -> Context {
        let config = ClientConfig::new("http://127.0.0.1:9".parse().unwrap());
        Context::new(&config, Session::with_token(SecretString::from("t0ken"))).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<R: ResourceUi>(view: &mut ResourceView<R>, text: &str) {
        for c in text.chars() {
            view.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn draft_value<R: ResourceUi>(view: &ResourceView<R>, name: &str) -> String {
        view.screen.form().unwrap().draft().value(name).unwrap()
    }

    #[test]
    fn typing_fills_the_create_form() {
        let mut view = ResourceView::<Books>::new(ctx());
        assert!(!view.captures_input());

        view.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(view.captures_input());
        type_text(&mut view, "Dune");
        view.handle_key_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut view, "Frank Herbert");

        assert_eq!(draft_value(&view, "title"), "Dune");
        assert_eq!(draft_value(&view, "author"), "Frank Herbert");
    }

    #[test]
    fn backspace_edits_the_draft() {
        let mut view = ResourceView::<Categories>::new(ctx());
        view.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        type_text(&mut view, "Poetx");
        view.handle_key_event(key(KeyCode::Backspace)).unwrap();
        assert_eq!(draft_value(&view, "name"), "Poet");
    }

    #[test]
    fn invalid_save_keeps_the_form_open_with_an_error() {
        let mut view = ResourceView::<Books>::new(ctx());
        view.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        view.handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();

        let form = view.screen.form().unwrap();
        assert!(!form.is_submitting());
        assert!(form.error().unwrap().contains("required"));
    }

    #[test]
    fn escape_discards_the_form() {
        let mut view = ResourceView::<Categories>::new(ctx());
        view.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        type_text(&mut view, "Drama");
        view.handle_key_event(key(KeyCode::Esc)).unwrap();

        assert!(view.screen.form().is_none());
        assert!(view.inputs.is_empty());
        assert!(!view.captures_input());
    }

    #[test]
    fn reference_fields_ignore_typed_text() {
        let mut view = ResourceView::<Reviews>::new(ctx());
        view.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        // The book picker comes first and has no options yet.
        type_text(&mut view, "12");
        assert_eq!(draft_value(&view, "bookId"), "");

        view.handle_key_event(key(KeyCode::Tab)).unwrap();
        type_text(&mut view, "Loved it");
        assert_eq!(draft_value(&view, "ulasan"), "Loved it");
    }

    #[test]
    fn paste_fills_text_fields_only() {
        let mut view = ResourceView::<Reviews>::new(ctx());
        view.handle_paste("Ignored").unwrap();
        assert!(view.screen.form().is_none());

        view.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        view.handle_paste("12").unwrap();
        assert_eq!(draft_value(&view, "bookId"), "");

        view.handle_key_event(key(KeyCode::Tab)).unwrap();
        view.handle_paste("A slow start, but worth it.").unwrap();
        assert_eq!(draft_value(&view, "ulasan"), "A slow start, but worth it.");
    }

    #[test]
    fn list_keys_without_items_are_harmless() {
        let mut view = ResourceView::<Books>::new(ctx());
        for code in [KeyCode::Char('j'), KeyCode::Char('G'), KeyCode::Enter, KeyCode::Char('e')] {
            view.handle_key_event(key(code)).unwrap();
        }
        assert_eq!(view.screen.selection(), &Selection::Idle);
        assert_eq!(view.table_state.selected(), None);
    }

    #[test]
    fn previous_page_stops_at_one() {
        let mut view = ResourceView::<Books>::new(ctx());
        view.handle_key_event(key(KeyCode::Char('['))).unwrap();
        assert_eq!(view.screen.list().page(), 1);
        view.handle_key_event(key(KeyCode::Char(']'))).unwrap();
        assert_eq!(view.screen.list().page(), 2);
    }

    fn drama() -> Category {
        Category {
            id: EntityId::new(3),
            name: "Drama".into(),
            description: String::new(),
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    async fn delete_outcome(view: &mut ResourceView<Categories>) -> shelfy_core::DeleteOutcome {
        view.screen.view(drama());
        view.screen.request_delete();
        let mut outcome = view.screen.begin_delete().unwrap().run().await;
        outcome.result = Ok(());
        outcome
    }

    #[tokio::test]
    async fn applied_delete_is_announced() {
        let mut view = ResourceView::<Categories>::new(ctx());
        let outcome = delete_outcome(&mut view).await;
        let action = view.apply(ResourceMsg::Deleted(outcome));
        assert!(matches!(action, Some(Action::Notify(_))));
        assert_eq!(view.screen.selection(), &Selection::Idle);
    }

    #[tokio::test]
    async fn ignored_delete_is_not_announced() {
        let mut view = ResourceView::<Categories>::new(ctx());
        let outcome = delete_outcome(&mut view).await;
        view.screen.dispose();
        assert!(view.apply(ResourceMsg::Deleted(outcome)).is_none());
    }
}
