pub use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorScheme {
    pub foreground: Option<ColorWrapper>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub dimmed: bool,
}

// Wrapper type for Color that implements Serialize/Deserialize
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ColorWrapper(Color);

impl From<ColorWrapper> for String {
    fn from(wrapper: ColorWrapper) -> Self {
        format!("{:?}", wrapper.0)
    }
}

impl From<String> for ColorWrapper {
    fn from(s: String) -> Self {
        ColorWrapper(Color::from_str(&s).unwrap_or(Color::White))
    }
}

impl From<Color> for ColorWrapper {
    fn from(color: Color) -> Self {
        ColorWrapper(color)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub header: ColorScheme,
    pub command: ColorScheme,
    pub explanation: ColorScheme,
    pub stderr: ColorScheme,
    pub warning: ColorScheme,
    pub muted: ColorScheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: ColorScheme {
                foreground: Some(ColorWrapper(Color::Blue)),
                bold: true,
                dimmed: false,
            },
            command: ColorScheme {
                foreground: Some(ColorWrapper(Color::Green)),
                ..Default::default()
            },
            explanation: ColorScheme {
                foreground: Some(ColorWrapper(Color::Yellow)),
                ..Default::default()
            },
            stderr: ColorScheme {
                foreground: Some(ColorWrapper(Color::Red)),
                ..Default::default()
            },
            warning: ColorScheme {
                foreground: Some(ColorWrapper(Color::Red)),
                bold: true,
                dimmed: false,
            },
            muted: ColorScheme {
                foreground: None,
                bold: false,
                dimmed: true,
            },
        }
    }
}

impl ColorScheme {
    pub fn apply(&self, text: &str) -> colored::ColoredString {
        let mut colored_text: colored::ColoredString = text.into();

        if let Some(fg) = &self.foreground {
            colored_text = colored_text.color(fg.0);
        }
        if self.bold {
            colored_text = colored_text.bold();
        }
        if self.dimmed {
            colored_text = colored_text.dimmed();
        }

        colored_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_deserializes_color_names() {
        let scheme: ColorScheme = toml::from_str(r#"foreground = "magenta""#).unwrap();
        assert!(matches!(scheme.foreground, Some(ColorWrapper(Color::Magenta))));
        assert!(!scheme.bold);
    }

    #[test]
    fn test_unknown_color_falls_back_to_white() {
        let wrapper = ColorWrapper::from("not-a-color".to_string());
        assert!(matches!(wrapper, ColorWrapper(Color::White)));
    }
}
