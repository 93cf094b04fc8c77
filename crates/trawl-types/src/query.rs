//! Query templates and time-window clause rendering.

use crate::TimeWindow;

/// Timestamp format used by the query DSL's `SINCE`/`UNTIL` clauses.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marker substituted with the window clause when present in the template.
const WINDOW_PLACEHOLDER: &str = "{window}";

/// An opaque query with a time-window clause.
///
/// The extractor never parses the query's semantics; it only scopes it to a
/// window. Rendering substitutes a `{window}` placeholder when the template
/// contains one, and otherwise appends a `SINCE ... UNTIL ...` clause, the
/// convention the source DSL uses for trailing time bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
}

impl QueryTemplate {
    /// Creates a template from raw query text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Renders the query scoped to the given window.
    ///
    /// Timestamps are rendered in UTC at second resolution; `UNTIL` is
    /// exclusive, matching the half-open [`TimeWindow`]. The DSL cannot
    /// address sub-second instants, so bounds with sub-second precision
    /// are truncated to the whole second: the rendered clause covers
    /// `[floor(start), floor(end))`. Pass second-aligned bounds when the
    /// exact interval matters.
    #[must_use]
    pub fn render(&self, window: &TimeWindow) -> String {
        let clause = format!(
            "SINCE '{}' UNTIL '{}'",
            window.start.format(TIMESTAMP_FORMAT),
            window.end.format(TIMESTAMP_FORMAT)
        );
        if self.text.contains(WINDOW_PLACEHOLDER) {
            self.text.replace(WINDOW_PLACEHOLDER, &clause)
        } else {
            format!("{} {}", self.text, clause)
        }
    }
}

impl std::fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_render_appends_clause() {
        let template = QueryTemplate::new("FROM Log SELECT store LIMIT MAX");
        assert_eq!(
            template.render(&window()),
            "FROM Log SELECT store LIMIT MAX \
             SINCE '2024-06-01 00:00:00' UNTIL '2024-06-01 12:30:00'"
        );
    }

    #[test]
    fn test_render_truncates_subsecond_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
            + TimeDelta::milliseconds(400);
        let end = Utc.with_ymd_and_hms(2024, 6, 1, 1, 0, 0).unwrap()
            + TimeDelta::milliseconds(900);
        let window = TimeWindow::new(start, end).unwrap();

        let template = QueryTemplate::new("FROM Log SELECT store");
        assert_eq!(
            template.render(&window),
            "FROM Log SELECT store \
             SINCE '2024-06-01 00:00:00' UNTIL '2024-06-01 01:00:00'"
        );
    }

    #[test]
    fn test_render_substitutes_placeholder() {
        let template = QueryTemplate::new("FROM Log SELECT store {window} LIMIT MAX");
        assert_eq!(
            template.render(&window()),
            "FROM Log SELECT store \
             SINCE '2024-06-01 00:00:00' UNTIL '2024-06-01 12:30:00' LIMIT MAX"
        );
    }
}
