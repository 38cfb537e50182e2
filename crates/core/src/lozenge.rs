//! Lozenge style colors for attribute content.
//!
//! The space API has no native lozenge rendering, so attribute content is
//! emphasized with a colored font decoration instead. The table below is the
//! fixed mapping from lozenge style name to hex color.

/// Color used for unrecognized styles (including plain `lozenge`).
const DEFAULT_COLOR: &str = "#333";

const LOZENGE_COLORS: &[(&str, &str)] = &[
    ("lozenge-current", "#594300"),
    ("lozenge-error", "#d04437"),
    ("lozenge-success", "#14892c"),
    ("lozenge-complete", "#4a6785"),
    ("lozenge-moved", "#815b3a"),
];

/// Resolve a lozenge style name to its hex color.
pub fn color_for(style: &str) -> &'static str {
    LOZENGE_COLORS
        .iter()
        .find(|(name, _)| *name == style)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Wrap `content` in the font-color decoration for `style`.
pub fn styled_content(content: &str, style: &str) -> String {
    format!("<font color=\"{}\">{}</font>", color_for(style), content)
}
