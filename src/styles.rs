//! Styles for console output. Color is used only when asked for, or when
//! standard output is a terminal that supports it.
use anstyle::{AnsiColor, Color, Style};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use std::fmt;

/// When to color the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color if standard output supports it
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

const GREEN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
const YELLOW: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
const CYAN: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
const BOLD_RED: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold();
const PLAIN: Style = Style::new();

static STDOUT_TAKES_COLOR: Lazy<bool> = Lazy::new(|| {
    use enable_ansi_support::enable_ansi_support;
    use supports_color::Stream;
    enable_ansi_support().is_ok() && supports_color::on(Stream::Stdout).is_some()
});

/// Chooses the style of each kind of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colored: bool,
}

impl Palette {
    /// Decides once, from `choice`, whether to color.
    #[must_use]
    pub fn new(choice: ColorChoice) -> Self {
        let colored = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => *STDOUT_TAKES_COLOR,
        };
        Palette { colored }
    }

    /// Never colors.
    #[must_use]
    pub fn plain() -> Self {
        Palette { colored: false }
    }

    fn styled<T: fmt::Display>(self, style: Style, content: T) -> Styled<T> {
        Styled { style: if self.colored { style } else { PLAIN }, content }
    }

    /// File names
    pub fn file<T: fmt::Display>(self, content: T) -> Styled<T> {
        self.styled(GREEN, content)
    }
    /// Headings and questions
    pub fn title<T: fmt::Display>(self, content: T) -> Styled<T> {
        self.styled(YELLOW, content)
    }
    /// Lines of the input files
    pub fn line<T: fmt::Display>(self, content: T) -> Styled<T> {
        self.styled(CYAN, content)
    }
    /// Warnings and complaints about answers
    pub fn warning<T: fmt::Display>(self, content: T) -> Styled<T> {
        self.styled(BOLD_RED, content)
    }
}

/// Content to be displayed in a style
pub struct Styled<T> {
    style: Style,
    content: T,
}

impl<T: fmt::Display> fmt::Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.style == PLAIN {
            write!(f, "{}", self.content)
        } else {
            write!(f, "{}{}{}", self.style.render(), self.content, self.style.render_reset())
        }
    }
}
