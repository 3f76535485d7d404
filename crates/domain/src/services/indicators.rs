//! Sidebar badge indicators.
//!
//! Two independent flags per operator session, one for the notifications
//! page and one for the connections page. A flag is raised by its signal
//! while the corresponding page is not the active one and cleared when the
//! operator opens that page. Session-scoped, never persisted: a fresh
//! (re)attach starts with both flags down.

use serde::Serialize;

use crate::models::page::Page;

/// Badge state for one operator session.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub notifications: bool,
    pub connections: bool,
}

impl Indicators {
    /// Clears the flag belonging to a page the operator just opened.
    /// Pages without a badge are unaffected.
    pub fn clear_for(&mut self, page: Page) {
        match page {
            Page::Notifications => self.notifications = false,
            Page::Connections => self.connections = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_cleared() {
        assert_eq!(Indicators::default(), Indicators { notifications: false, connections: false });
    }

    #[test]
    fn test_clear_for_matching_page_only() {
        let mut indicators = Indicators {
            notifications: true,
            connections: true,
        };
        indicators.clear_for(Page::Clients);
        assert!(indicators.notifications && indicators.connections);

        indicators.clear_for(Page::Notifications);
        assert!(!indicators.notifications);
        assert!(indicators.connections);

        indicators.clear_for(Page::Connections);
        assert!(!indicators.connections);
    }
}
