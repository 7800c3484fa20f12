//! Per-resource presentation: table columns, detail rows, and how each
//! resource's results travel through the action channel.

use ratatui::layout::Constraint;

use shelfy_core::{
    Book, Books, Categories, Category, EntityId, RefOption, Resource, Review, ReviewFilter, Reviews,
};

use crate::action::{Action, ResourceMsg};
use crate::screen::ScreenId;

/// What the generic resource view needs to know beyond [`Resource`].
pub trait ResourceUi: Resource {
    const SCREEN: ScreenId;
    const HEADERS: &'static [&'static str];
    const LIST_HINTS: &'static str = "j/k move  Enter view  n new  [ ] page  r refresh";

    fn widths() -> Vec<Constraint>;

    fn row(entity: &Self::Entity) -> Vec<String>;

    /// Label/value pairs for the detail modal. Empty values are skipped.
    fn detail(entity: &Self::Entity) -> Vec<(&'static str, String)>;

    /// Short name used in modal titles and prompts.
    fn title(entity: &Self::Entity) -> String;

    fn wrap(msg: ResourceMsg<Self>) -> Action;

    fn unwrap(action: &Action) -> Option<&ResourceMsg<Self>>;

    /// The filter after pressing `f`, or `None` when the resource has no
    /// filter to cycle.
    fn next_filter(_current: &Self::Filter, _options: &[RefOption]) -> Option<Self::Filter> {
        None
    }

    /// Header text for an active filter.
    fn filter_label(_filter: &Self::Filter, _options: &[RefOption]) -> Option<String> {
        None
    }
}

/// The option after `current` in `options`, wrapping to the first.
/// Unknown or unset ids start from the first option.
pub fn cycle_option(current: Option<EntityId>, options: &[RefOption]) -> Option<EntityId> {
    let next = current
        .and_then(|id| options.iter().position(|o| o.id == id))
        .map_or(0, |idx| (idx + 1) % options.len());
    options.get(next).map(|o| o.id)
}

pub fn option_label(id: Option<EntityId>, options: &[RefOption]) -> String {
    match id {
        None => String::new(),
        Some(id) => options
            .iter()
            .find(|o| o.id == id)
            .map_or_else(|| format!("#{id}"), |o| o.label.clone()),
    }
}

fn timestamp(t: Option<chrono::DateTime<chrono::Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

// ── Books ────────────────────────────────────────────────────────────

impl ResourceUi for Books {
    const SCREEN: ScreenId = ScreenId::Books;
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Author", "Category"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Percentage(45),
            Constraint::Percentage(30),
            Constraint::Fill(1),
        ]
    }

    fn row(b: &Book) -> Vec<String> {
        vec![
            b.id.to_string(),
            b.title.clone(),
            b.author.clone(),
            b.category_label().to_owned(),
        ]
    }

    fn detail(b: &Book) -> Vec<(&'static str, String)> {
        let updated = if b.was_updated() {
            timestamp(b.updated_at)
        } else {
            String::new()
        };
        vec![
            ("Title", b.title.clone()),
            ("Author", b.author.clone()),
            ("Category", b.category_label().to_owned()),
            ("Image", b.image_url.clone().unwrap_or_default()),
            ("Description", b.description.clone().unwrap_or_default()),
            ("Created", timestamp(b.created_at)),
            ("Updated", updated),
        ]
    }

    fn title(b: &Book) -> String {
        b.title.clone()
    }

    fn wrap(msg: ResourceMsg<Self>) -> Action {
        Action::Books(msg)
    }

    fn unwrap(action: &Action) -> Option<&ResourceMsg<Self>> {
        match action {
            Action::Books(msg) => Some(msg),
            _ => None,
        }
    }
}

// ── Categories ───────────────────────────────────────────────────────

impl ResourceUi for Categories {
    const SCREEN: ScreenId = ScreenId::Categories;
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description"];

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Fill(1),
        ]
    }

    fn row(c: &Category) -> Vec<String> {
        vec![c.id.to_string(), c.name.clone(), c.description.replace('\n', " ")]
    }

    fn detail(c: &Category) -> Vec<(&'static str, String)> {
        vec![
            ("Name", c.name.clone()),
            ("Description", c.description.clone()),
            ("Created", timestamp(c.created_at)),
        ]
    }

    fn title(c: &Category) -> String {
        c.name.clone()
    }

    fn wrap(msg: ResourceMsg<Self>) -> Action {
        Action::Categories(msg)
    }

    fn unwrap(action: &Action) -> Option<&ResourceMsg<Self>> {
        match action {
            Action::Categories(msg) => Some(msg),
            _ => None,
        }
    }
}

// ── Reviews ──────────────────────────────────────────────────────────

impl ResourceUi for Reviews {
    const SCREEN: ScreenId = ScreenId::Reviews;
    const HEADERS: &'static [&'static str] = &["ID", "Book", "Category", "Review"];
    const LIST_HINTS: &'static str =
        "j/k move  Enter view  n new  [ ] page  r refresh  f/F book filter";

    fn widths() -> Vec<Constraint> {
        vec![
            Constraint::Length(6),
            Constraint::Percentage(30),
            Constraint::Percentage(20),
            Constraint::Fill(1),
        ]
    }

    fn row(r: &Review) -> Vec<String> {
        vec![
            r.id.to_string(),
            r.book_title(),
            r.category_label().to_owned(),
            r.ulasan.replace('\n', " "),
        ]
    }

    fn detail(r: &Review) -> Vec<(&'static str, String)> {
        vec![
            ("Book", r.book_title()),
            ("Category", r.category_label().to_owned()),
            ("Review", r.ulasan.clone()),
            ("Posted", timestamp(r.created_at)),
        ]
    }

    fn title(r: &Review) -> String {
        format!("review of {}", r.book_title())
    }

    fn wrap(msg: ResourceMsg<Self>) -> Action {
        Action::Reviews(msg)
    }

    fn unwrap(action: &Action) -> Option<&ResourceMsg<Self>> {
        match action {
            Action::Reviews(msg) => Some(msg),
            _ => None,
        }
    }

    // Review options are the books, so `f` steps through them.
    fn next_filter(current: &ReviewFilter, options: &[RefOption]) -> Option<ReviewFilter> {
        cycle_option(current.book, options).map(ReviewFilter::book)
    }

    fn filter_label(filter: &ReviewFilter, options: &[RefOption]) -> Option<String> {
        filter
            .book
            .map(|id| format!("book: {}", option_label(Some(id), options)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn options() -> Vec<RefOption> {
        [(2, "Dune"), (5, "Emma"), (9, "Ulysses")]
            .into_iter()
            .map(|(id, label)| RefOption {
                id: EntityId::new(id),
                label: label.into(),
            })
            .collect()
    }

    #[test]
    fn cycling_starts_at_first_and_wraps() {
        let opts = options();
        assert_eq!(cycle_option(None, &opts), Some(EntityId::new(2)));
        assert_eq!(
            cycle_option(Some(EntityId::new(5)), &opts),
            Some(EntityId::new(9))
        );
        assert_eq!(
            cycle_option(Some(EntityId::new(9)), &opts),
            Some(EntityId::new(2))
        );
        assert_eq!(
            cycle_option(Some(EntityId::new(42)), &opts),
            Some(EntityId::new(2))
        );
        assert_eq!(cycle_option(None, &[]), None);
    }

    #[test]
    fn labels_fall_back_to_id() {
        let opts = options();
        assert_eq!(option_label(Some(EntityId::new(5)), &opts), "Emma");
        assert_eq!(option_label(Some(EntityId::new(7)), &opts), "#7");
        assert_eq!(option_label(None, &opts), "");
    }

    #[test]
    fn review_filter_steps_through_books() {
        let opts = options();
        let first = Reviews::next_filter(&ReviewFilter::default(), &opts);
        assert_eq!(first, Some(ReviewFilter::book(EntityId::new(2))));
        assert_eq!(
            Reviews::filter_label(&ReviewFilter::book(EntityId::new(2)), &opts).as_deref(),
            Some("book: Dune")
        );
        assert_eq!(Books::next_filter(&(), &opts), None);
    }
}
