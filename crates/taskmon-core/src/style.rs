//! Typed theme and styled-row output.
//!
//! The composer emits rows of [`StyledSpan`]s tagged with a [`ColorRole`]
//! rather than concrete colors; a [`Theme`] resolves roles once per frame.
//! [`StyledLine::to_ansi`] serializes a row for direct terminal write, and
//! embedders (the TUI) can map spans into their own styled-text types.

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Semantic color slot a span is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    /// Chrome: borders, panel titles, the header bar.
    Primary,
    /// Graph traces and table accents.
    Secondary,
    /// The current-value readout inside panel titles.
    Value,
    /// Plain text.
    Text,
    /// De-emphasized text (hints, placeholders).
    Dim,
}

/// Named color set resolved once per frame. No string-keyed lookups.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub background: Rgb,
    pub value: Rgb,
    pub dim: Rgb,
    /// Low/high stops for gauge-style gradients.
    pub gradient: [Rgb; 2],
}

impl Theme {
    pub fn resolve(&self, role: ColorRole) -> Rgb {
        match role {
            ColorRole::Primary => self.primary,
            ColorRole::Secondary => self.secondary,
            ColorRole::Value => self.value,
            ColorRole::Text => Rgb(0xc9, 0xd1, 0xd9),
            ColorRole::Dim => self.dim,
        }
    }
}

impl Default for Theme {
    /// Matrix-green default, matching the stock dashboard look.
    fn default() -> Self {
        Self {
            primary: Rgb(0x3f, 0xb9, 0x50),
            secondary: Rgb(0x56, 0xd3, 0x64),
            background: Rgb(0x0d, 0x11, 0x17),
            value: Rgb(0xf8, 0x51, 0x49),
            dim: Rgb(0x8b, 0x94, 0x9e),
            gradient: [Rgb(0x23, 0x86, 0x36), Rgb(0x56, 0xd3, 0x64)],
        }
    }
}

/// A run of text drawn in a single role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub role: ColorRole,
    pub bold: bool,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, role: ColorRole) -> Self {
        Self {
            text: text.into(),
            role,
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>, role: ColorRole) -> Self {
        Self {
            text: text.into(),
            role,
            bold: true,
        }
    }
}

/// One terminal row of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn new(spans: Vec<StyledSpan>) -> Self {
        Self { spans }
    }

    /// Plain text content, styling stripped.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Display width in character cells.
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    /// Serialize with 24-bit SGR escapes, reset at end of line.
    pub fn to_ansi(&self, theme: &Theme) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for span in &self.spans {
            let Rgb(r, g, b) = theme.resolve(span.role);
            let bold = if span.bold { "1;" } else { "" };
            let _ = write!(out, "\x1b[{bold}38;2;{r};{g};{b}m{}", span.text);
        }
        out.push_str("\x1b[0m");
        out
    }
}

impl From<StyledSpan> for StyledLine {
    fn from(span: StyledSpan) -> Self {
        Self { spans: vec![span] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_concatenates_span_text() {
        let line = StyledLine::new(vec![
            StyledSpan::new("CPU: ", ColorRole::Primary),
            StyledSpan::bold("42.0%", ColorRole::Value),
        ]);
        assert_eq!(line.plain(), "CPU: 42.0%");
        assert_eq!(line.width(), 10);
    }

    #[test]
    fn ansi_embeds_resolved_color_and_reset() {
        let theme = Theme::default();
        let line: StyledLine = StyledSpan::new("x", ColorRole::Primary).into();
        let ansi = line.to_ansi(&theme);
        let Rgb(r, g, b) = theme.primary;
        assert!(ansi.contains(&format!("38;2;{r};{g};{b}m")));
        assert!(ansi.ends_with("\x1b[0m"));
    }

    #[test]
    fn ansi_bold_flag_emits_bold_sgr() {
        let theme = Theme::default();
        let line: StyledLine = StyledSpan::bold("x", ColorRole::Value).into();
        assert!(line.to_ansi(&theme).contains("\x1b[1;38;2;"));
    }

    #[test]
    fn width_counts_wide_glyphs_as_chars() {
        let line: StyledLine = StyledSpan::new("▁▂█", ColorRole::Secondary).into();
        assert_eq!(line.width(), 3);
    }
}
