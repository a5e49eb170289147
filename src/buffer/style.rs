//! Style: colours and text attributes, and their SGR serialisation.
//!
//! A [`Style`] is an immutable value. The `with_*` methods return modified
//! copies, and equality is structural so the diff renderer can compare
//! styles cell by cell.
//!
//! ```text
//! Color::Basic   ESC[30-37m / ESC[90-97m     ESC[40-47m / ESC[100-107m
//! Color::Indexed ESC[38;5;nm                 ESC[48;5;nm
//! Color::Rgb     ESC[38;2;r;g;bm             ESC[48;2;r;g;bm
//! ```

use bitflags::bitflags;
use std::io::Write;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

/// The sixteen standard terminal colours, plus the terminal's own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BasicColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// Whatever the terminal uses when no colour is set (SGR 39 / 49).
    Default,
}

impl BasicColor {
    /// Palette index 0-15, or `None` for [`BasicColor::Default`].
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Default => None,
            // Discriminants follow palette order.
            other => Some(other as u8),
        }
    }

    /// Look up a colour by its palette index (0-15).
    pub const fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Black,
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Blue,
            5 => Self::Magenta,
            6 => Self::Cyan,
            7 => Self::White,
            8 => Self::BrightBlack,
            9 => Self::BrightRed,
            10 => Self::BrightGreen,
            11 => Self::BrightYellow,
            12 => Self::BrightBlue,
            13 => Self::BrightMagenta,
            14 => Self::BrightCyan,
            15 => Self::BrightWhite,
            _ => return None,
        })
    }

    /// SGR parameter for this colour. `base` is 30 for foreground, 40 for background.
    const fn sgr(self, base: u8) -> u8 {
        match self.index() {
            None => base + 9,
            Some(i) if i < 8 => base + i,
            Some(i) => base + 60 + (i - 8),
        }
    }
}

/// A terminal colour in one of the three addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// One of the 16 standard colours or the terminal default.
    Basic(BasicColor),
    /// A 256-colour palette entry.
    Indexed(u8),
    /// 24-bit true colour.
    Rgb(Rgb),
}

impl Color {
    /// The terminal's default colour.
    pub const DEFAULT: Self = Self::Basic(BasicColor::Default);

    /// Shorthand for a true-colour value.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// Write the foreground SGR sequence for this colour.
    pub fn write_fg(self, out: &mut Vec<u8>) {
        self.write_sgr(out, 30, 38);
    }

    /// Write the background SGR sequence for this colour.
    pub fn write_bg(self, out: &mut Vec<u8>) {
        self.write_sgr(out, 40, 48);
    }

    fn write_sgr(self, out: &mut Vec<u8>, base: u8, extended: u8) {
        // Writes into a Vec cannot fail.
        let _ = match self {
            Self::Basic(c) => write!(out, "\x1b[{}m", c.sgr(base)),
            Self::Indexed(n) => write!(out, "\x1b[{extended};5;{n}m"),
            Self::Rgb(c) => write!(out, "\x1b[{extended};2;{};{};{}m", c.r, c.g, c.b),
        };
    }
}

impl From<BasicColor> for Color {
    fn from(c: BasicColor) -> Self {
        Self::Basic(c)
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Self::Rgb(c)
    }
}

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use stratum::Modifiers;
    /// let style = Modifiers::BOLD | Modifiers::ITALIC;
    /// assert!(style.contains(Modifiers::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Dim/faint text
        const DIM = 0b0000_0010;
        /// Italic text
        const ITALIC = 0b0000_0100;
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Blinking text
        const BLINK = 0b0001_0000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
        /// Strikethrough text
        const STRIKETHROUGH = 0b0100_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// SGR parameter for each modifier, in emission order.
const MODIFIER_CODES: [(Modifiers, u8); 7] = [
    (Modifiers::BOLD, 1),
    (Modifiers::DIM, 2),
    (Modifiers::ITALIC, 3),
    (Modifiers::UNDERLINE, 4),
    (Modifiers::BLINK, 5),
    (Modifiers::REVERSED, 7),
    (Modifiers::STRIKETHROUGH, 9),
];

/// Foreground/background colour plus text attributes.
///
/// `None` colours leave the terminal's current colour untouched, which after
/// the leading reset of [`Style::write_sgr`] means the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground colour.
    pub fg: Option<Color>,
    /// Background colour.
    pub bg: Option<Color>,
    /// Text attributes.
    pub modifiers: Modifiers,
}

impl Style {
    /// No colours and no attributes.
    pub const DEFAULT: Self = Self {
        fg: None,
        bg: None,
        modifiers: Modifiers::empty(),
    };

    /// Create a style with the given foreground colour.
    #[inline]
    pub const fn foreground(color: Color) -> Self {
        Self::DEFAULT.with_fg(color)
    }

    /// Copy with a different foreground colour.
    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Copy with a different background colour.
    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Copy with the given modifiers added.
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.union(modifiers);
        self
    }

    /// Copy with the given modifiers removed.
    #[inline]
    #[must_use]
    pub const fn without_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = self.modifiers.difference(modifiers);
        self
    }

    /// Copy with bold enabled.
    #[must_use]
    pub const fn with_bold(self) -> Self {
        self.with_modifiers(Modifiers::BOLD)
    }

    /// Copy with dim enabled.
    #[must_use]
    pub const fn with_dim(self) -> Self {
        self.with_modifiers(Modifiers::DIM)
    }

    /// Copy with italic enabled.
    #[must_use]
    pub const fn with_italic(self) -> Self {
        self.with_modifiers(Modifiers::ITALIC)
    }

    /// Copy with underline enabled.
    #[must_use]
    pub const fn with_underline(self) -> Self {
        self.with_modifiers(Modifiers::UNDERLINE)
    }

    /// Copy with blink enabled.
    #[must_use]
    pub const fn with_blink(self) -> Self {
        self.with_modifiers(Modifiers::BLINK)
    }

    /// Copy with reverse video enabled.
    #[must_use]
    pub const fn with_reverse(self) -> Self {
        self.with_modifiers(Modifiers::REVERSED)
    }

    /// Copy with strikethrough enabled.
    #[must_use]
    pub const fn with_strike(self) -> Self {
        self.with_modifiers(Modifiers::STRIKETHROUGH)
    }

    /// Write the complete SGR sequence for this style.
    ///
    /// The sequence always starts with a reset (`ESC[0m`), so it fully
    /// determines the terminal's attribute state regardless of what was
    /// emitted before.
    pub fn write_sgr(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"\x1b[0m");
        if let Some(fg) = self.fg {
            fg.write_fg(out);
        }
        if let Some(bg) = self.bg {
            bg.write_bg(out);
        }
        for (flag, code) in MODIFIER_CODES {
            if self.modifiers.contains(flag) {
                let _ = write!(out, "\x1b[{code}m");
            }
        }
    }

    /// The SGR sequence as a `String`.
    pub fn sequence(&self) -> String {
        let mut out = Vec::with_capacity(32);
        self.write_sgr(&mut out);
        // Only ASCII is ever written above.
        String::from_utf8_lossy(&out).into_owned()
    }
}
