//! # Fonts
//!
//! The report only ever sets text in Helvetica, regular or bold. Both are
//! standard PDF fonts, so nothing gets embedded: we need widths for wrapping
//! and a PDF name for the font dictionary, and that is all.

pub mod metrics;

pub use metrics::StandardFontMetrics;

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Font weight used by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// The standard PDF fonts the report draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    pub fn for_weight(weight: FontWeight) -> Self {
        match weight {
            FontWeight::Normal => Self::Helvetica,
            FontWeight::Bold => Self::HelveticaBold,
        }
    }

    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
        }
    }

    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
        }
    }
}

/// Weight and size (in points) of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub size: f64,
}

impl FontSpec {
    pub const fn normal(size: f64) -> Self {
        Self {
            weight: FontWeight::Normal,
            size,
        }
    }

    pub const fn bold(size: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            size,
        }
    }

    pub fn font(&self) -> StandardFont {
        StandardFont::for_weight(self.weight)
    }

    /// Width of `text` in millimetres.
    pub fn measure_mm(&self, text: &str) -> f64 {
        self.font().metrics().measure_string(text, self.size) / PT_PER_MM
    }

    /// Width of a single character in millimetres.
    pub fn char_width_mm(&self, ch: char) -> f64 {
        self.font().metrics().char_width(ch, self.size) / PT_PER_MM
    }

    /// Cap height above the baseline, in millimetres.
    pub fn ascent_mm(&self) -> f64 {
        // Helvetica ascender is 718/1000 em.
        0.718 * self.size / PT_PER_MM
    }

    /// Depth below the baseline, in millimetres.
    pub fn descent_mm(&self) -> f64 {
        // Helvetica descender is -207/1000 em.
        0.207 * self.size / PT_PER_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_wider_than_regular() {
        let regular = FontSpec::normal(10.0).measure_mm("Breakfast");
        let bold = FontSpec::bold(10.0).measure_mm("Breakfast");
        assert!(bold > regular, "Bold should measure wider than regular");
    }

    #[test]
    fn measure_in_millimetres() {
        // 72pt is one inch, so a 278/1000 em space is 0.278 in.
        let w = FontSpec::normal(72.0).measure_mm(" ");
        assert!((w - 0.278 * 25.4).abs() < 1e-9);
    }

    #[test]
    fn pdf_names() {
        assert_eq!(StandardFont::Helvetica.pdf_name(), "Helvetica");
        assert_eq!(StandardFont::for_weight(FontWeight::Bold).pdf_name(), "Helvetica-Bold");
    }
}
