//! Console page catalog.

use serde::{Deserialize, Serialize};

/// Navigable console pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Clients,
    Connections,
    Builder,
    Notifications,
    Profile,
    Screens,
    Blocked,
    Updates,
    Servers,
}

/// All pages in sidebar order.
pub const ALL_PAGES: [Page; 9] = [
    Page::Clients,
    Page::Connections,
    Page::Builder,
    Page::Notifications,
    Page::Profile,
    Page::Screens,
    Page::Blocked,
    Page::Updates,
    Page::Servers,
];

/// Default landing page.
pub const DEFAULT_PAGE: Page = Page::Clients;

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Connections => "connections",
            Self::Builder => "builder",
            Self::Notifications => "notifications",
            Self::Profile => "profile",
            Self::Screens => "screens",
            Self::Blocked => "blocked",
            Self::Updates => "updates",
            Self::Servers => "servers",
        }
    }

    /// Material icon shown next to the page in the sidebar.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clients => "people",
            Self::Connections => "link",
            Self::Builder => "build",
            Self::Notifications => "notifications",
            Self::Profile => "person",
            Self::Screens => "screenshot",
            Self::Blocked => "block",
            Self::Updates => "update",
            Self::Servers => "dns",
        }
    }

    /// Static body for pages without a live data source.
    pub fn placeholder_text(&self) -> Option<&'static str> {
        match self {
            Self::Builder => Some("Package builder is not available in this deployment."),
            Self::Screens => Some("Screen capture feature coming soon."),
            Self::Blocked => Some("Blocked devices list coming soon."),
            Self::Updates => Some("No updates yet."),
            Self::Servers => Some("Contact Admin."),
            _ => None,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PAGES
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| format!("Unknown page: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip_all_pages() {
        for page in ALL_PAGES {
            assert_eq!(Page::from_str(page.as_str()).unwrap(), page);
        }
        assert!(Page::from_str("logout").is_err());
    }

    #[test]
    fn test_icons_match_sidebar() {
        assert_eq!(Page::Clients.icon(), "people");
        assert_eq!(Page::Connections.icon(), "link");
        assert_eq!(Page::Notifications.icon(), "notifications");
        assert_eq!(Page::Servers.icon(), "dns");
    }

    #[test]
    fn test_live_pages_have_no_placeholder() {
        for page in [Page::Clients, Page::Connections, Page::Notifications, Page::Profile] {
            assert!(page.placeholder_text().is_none());
        }
        assert!(Page::Screens.placeholder_text().is_some());
    }
}
