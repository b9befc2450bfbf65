//! Links

use chrono::DateTime;
use chrono::Utc;

/// A short code pointing to a destination URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// External identifier, used verbatim as path segment
    pub code: String,

    /// Location the link redirects to
    pub url: String,

    /// Number of redirects served for this link
    pub click_count: u64,

    /// Moment of the last redirect, `None` until the first one
    pub last_clicked: Option<DateTime<Utc>>,

    /// Creation date
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Register a click on the link
    ///
    /// `last_clicked` never moves backwards and never precedes `created_at`
    pub fn register_click(&mut self, clicked_at: DateTime<Utc>) {
        let previous = self.last_clicked.unwrap_or(self.created_at);

        self.click_count = self.click_count.saturating_add(1);
        self.last_clicked = Some(previous.max(clicked_at));
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn link(created_at: DateTime<Utc>) -> Link {
        Link {
            code: "abc123".to_string(),
            url: "https://www.example.com/".to_string(),
            click_count: 0,
            last_clicked: None,
            created_at,
        }
    }

    #[test]
    fn test_register_click() {
        let created_at = Utc::now();
        let mut link = link(created_at);

        let clicked_at = created_at + TimeDelta::seconds(5);
        link.register_click(clicked_at);
        assert_eq!(1, link.click_count);
        assert_eq!(Some(clicked_at), link.last_clicked);

        // a clock going backwards does not move the timestamp back
        link.register_click(created_at + TimeDelta::seconds(1));
        assert_eq!(2, link.click_count);
        assert_eq!(Some(clicked_at), link.last_clicked);
    }

    #[test]
    fn test_register_click_before_creation() {
        let created_at = Utc::now();
        let mut link = link(created_at);

        link.register_click(created_at - TimeDelta::seconds(10));
        assert_eq!(1, link.click_count);
        assert_eq!(Some(created_at), link.last_clicked);
    }
}
