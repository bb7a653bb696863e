use colored::*;

/// Colour roles for the assistant's console output
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Theme {
    #[default]
    Color,
    Plain,
}

impl Theme {
    pub fn from_flag(no_color: bool) -> Self {
        if no_color {
            Theme::Plain
        } else {
            Theme::Color
        }
    }

    /// Make the choice global for every `colored` call in the process
    pub fn apply(&self) {
        match self {
            Theme::Plain => colored::control::set_override(false),
            Theme::Color => colored::control::unset_override(),
        }
    }
}

pub fn heading(text: &str) -> ColoredString {
    text.bold().blue()
}

pub fn success(text: &str) -> ColoredString {
    text.green()
}

pub fn warning(text: &str) -> ColoredString {
    text.yellow()
}

pub fn error(text: &str) -> ColoredString {
    text.red()
}

pub fn detail(text: &str) -> ColoredString {
    text.dimmed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_selects_theme() {
        assert_eq!(Theme::default(), Theme::Color);
        assert_eq!(Theme::from_flag(false), Theme::Color);
        assert_eq!(Theme::from_flag(true), Theme::Plain);
    }
}
