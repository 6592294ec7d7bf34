//! # Theme
//!
//! Style values provided once at the top of a screen and read by any widget below it through
//! [`ThemeContext`].
use ratatui::style::{Color, Style};

use crate::config::ThemeConfig;
use crate::error::{Error, Result};

pub mod context;

pub use context::{ThemeContext, ThemeScope};

/// Style values exposed to descendants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ThemeStyles {
    /// Background for themed containers such as section headers
    pub background_color: Option<Color>,
    /// Color for text that does not set its own
    pub text_color: Option<Color>,
}

impl ThemeStyles {
    /// Style delta for the background, if one is set
    pub fn background_style(&self) -> Option<Style> {
        self.background_color.map(|color| Style::default().bg(color))
    }

    /// Style delta for inherited text, if a text color is set
    pub fn text_style(&self) -> Option<Style> {
        self.text_color.map(|color| Style::default().fg(color))
    }
}

/// A theme owned by the screen that provides it
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Theme {
    /// Style values
    pub styles: ThemeStyles,
}

impl Theme {
    /// Create a theme from its style values
    pub fn new(styles: ThemeStyles) -> Self {
        Self { styles }
    }

    /// The theme seen when nothing has been provided: every value unset
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Set the background color
    pub fn with_background(mut self, color: Color) -> Self {
        self.styles.background_color = Some(color);
        self
    }

    /// Set the text color
    pub fn with_text_color(mut self, color: Color) -> Self {
        self.styles.text_color = Some(color);
        self
    }

    /// Build a theme from the CSS color strings in the configuration
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        Ok(Self::new(ThemeStyles {
            background_color: ThemeConfig::color(config.background_color.as_deref())?,
            text_color: ThemeConfig::color(config.text_color.as_deref())?,
        }))
    }
}

/// Parse a CSS color (`#rrggbb`, `rgb()`, `rgba()`, named colors) into a terminal color.
///
/// Terminals have no alpha channel, so a fully transparent color becomes the terminal default
/// and any other alpha is dropped.
pub fn parse_color(value: &str) -> Result<Color> {
    let parsed = value
        .trim()
        .parse::<css_color_parser::Color>()
        .map_err(|_| Error::InvalidColor(value.to_string()))?;

    if parsed.a <= 0.0 {
        Ok(Color::Reset)
    } else {
        Ok(Color::Rgb(parsed.r, parsed.g, parsed.b))
    }
}
