//! Static magnitude legend.

use std::fmt::Write;

use serde::Serialize;

use crate::markers::escape_html;
use crate::style::{Color, choose_color};

/// Bucket labels with the magnitude used to color each one.
const BUCKETS: [(&str, f64); 6] = [
    ("0-1", 0.5),
    ("1-2", 1.5),
    ("2-3", 2.5),
    ("3-4", 3.5),
    ("4-5", 4.5),
    ("5+", 5.5),
];

pub const LEGEND_TITLE: &str = "Magnitude";
pub const LEGEND_POSITION: &str = "bottomright";

/// One swatch in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    pub color: Color,
}

/// Legend control attached to the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    pub title: &'static str,
    pub position: &'static str,
    pub entries: [LegendEntry; 6],
}

impl Legend {
    /// Legend body as the HTML placed inside the control's container.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong><ul>", escape_html(self.title));
        for entry in &self.entries {
            // writing to a String cannot fail
            let _ = write!(
                html,
                "<li style=\"background-color: {}\"> {} </li>",
                entry.color, entry.label
            );
        }
        html.push_str("</ul>");
        html
    }
}

/// Build the legend. Independent of live data.
#[must_use]
pub fn create_legend() -> Legend {
    Legend {
        title: LEGEND_TITLE,
        position: LEGEND_POSITION,
        entries: BUCKETS.map(|(label, midpoint)| LegendEntry {
            label,
            color: choose_color(midpoint),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{GREEN, ORANGE, ORANGE_RED, RED, YELLOW, YELLOW_GREEN};

    #[test]
    fn test_six_buckets_in_order() {
        let legend = create_legend();
        let labels: Vec<_> = legend.entries.iter().map(|e| e.label).collect();
        assert_eq!(labels, ["0-1", "1-2", "2-3", "3-4", "4-5", "5+"]);
    }

    #[test]
    fn test_bucket_colors_follow_style_ladder() {
        let colors: Vec<_> = create_legend().entries.iter().map(|e| e.color).collect();
        assert_eq!(
            colors,
            [GREEN, YELLOW_GREEN, YELLOW, ORANGE, ORANGE_RED, RED]
        );
    }

    #[test]
    fn test_legend_is_static() {
        assert_eq!(create_legend(), create_legend());
    }

    #[test]
    fn test_legend_html() {
        let html = create_legend().to_html();

        assert!(html.starts_with("<strong>Magnitude</strong><ul>"));
        assert!(html.contains("<li style=\"background-color: #72f542\"> 0-1 </li>"));
        assert!(html.ends_with("<li style=\"background-color: #f54542\"> 5+ </li></ul>"));
        assert_eq!(html.matches("<li ").count(), 6);
    }
}
