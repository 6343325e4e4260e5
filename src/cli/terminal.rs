//! Colour and layout decisions for terminal output.
//!
//! Risk ratings are coloured by band: extreme in bold red, high in orange,
//! medium in blue and low in green. Everything is printed plain when stdout
//! is not a colour-capable terminal.

use hazards::RiskBand;
use owo_colors::{OwoColorize, Style, colors::css};

fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Narrow terminals get the two-line table layout.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 80)
}

/// Styles text for the terminal.
pub trait Colorize {
    /// Low risk, or a completed action.
    fn success(&self) -> String;
    /// High risk, or a recoverable problem the user should notice.
    fn warning(&self) -> String;
    /// Extreme risk.
    fn danger(&self) -> String;
    /// Medium risk, headings and highlighted values.
    fn info(&self) -> String;
    /// Secondary text such as section titles and hints.
    fn dim(&self) -> String;

    /// The colour used for a risk band.
    fn band(&self, band: RiskBand) -> String {
        match band {
            RiskBand::Extreme => self.danger(),
            RiskBand::High => self.warning(),
            RiskBand::Medium => self.info(),
            RiskBand::Low => self.success(),
        }
    }
}

fn paint(text: &str, style: Style) -> String {
    if color_enabled() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Green>())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Orange>())
    }

    fn danger(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Red>().bold())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::LightBlue>())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(RiskBand::Extreme; "extreme")]
    #[test_case(RiskBand::High; "high")]
    #[test_case(RiskBand::Medium; "medium")]
    #[test_case(RiskBand::Low; "low")]
    fn band_colouring_keeps_the_text(band: RiskBand) {
        assert!("16 Extreme".band(band).contains("16 Extreme"));
    }
}
