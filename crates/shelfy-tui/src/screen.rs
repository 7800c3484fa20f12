//! Screen identifiers and their route kinds.

use std::fmt;

use shelfy_core::RouteKind;

/// Each top-level TUI screen. The three private screens are tab-switched
/// with the number keys 1-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Login,
    Books,
    Categories,
    Reviews,
}

impl ScreenId {
    /// Screens in tab-bar order.
    pub const TABS: [ScreenId; 3] = [Self::Books, Self::Categories, Self::Reviews];

    /// Where a logged-in session lands.
    pub const HOME: ScreenId = Self::Books;

    pub fn kind(self) -> RouteKind {
        match self {
            Self::Login => RouteKind::Public,
            Self::Books | Self::Categories | Self::Reviews => RouteKind::Private,
        }
    }

    /// Numeric key for this tab. Login has none.
    pub fn number(self) -> u8 {
        match self {
            Self::Login => 0,
            Self::Books => 1,
            Self::Categories => 2,
            Self::Reviews => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Books),
            2 => Some(Self::Categories),
            3 => Some(Self::Reviews),
            _ => None,
        }
    }

    /// Next tab (wraps around). Login stays put.
    pub fn next(self) -> Self {
        match Self::TABS.iter().position(|&s| s == self) {
            Some(idx) => Self::TABS[(idx + 1) % Self::TABS.len()],
            None => self,
        }
    }

    pub fn prev(self) -> Self {
        match Self::TABS.iter().position(|&s| s == self) {
            Some(idx) => Self::TABS[(idx + Self::TABS.len() - 1) % Self::TABS.len()],
            None => self,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Books => "Books",
            Self::Categories => "Categories",
            Self::Reviews => "Reviews",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip_for_tabs() {
        for id in ScreenId::TABS {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn tab_cycling_wraps_and_skips_login() {
        assert_eq!(ScreenId::Reviews.next(), ScreenId::Books);
        assert_eq!(ScreenId::Books.prev(), ScreenId::Reviews);
        assert_eq!(ScreenId::Login.next(), ScreenId::Login);
    }

    #[test]
    fn only_login_is_public() {
        assert_eq!(ScreenId::Login.kind(), RouteKind::Public);
        assert!(
            ScreenId::TABS
                .iter()
                .all(|s| s.kind() == RouteKind::Private)
        );
    }
}
