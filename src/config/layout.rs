use crate::foundation::{
    core::Rgb8,
    error::{PageStackError, PageStackResult},
};

/// Built-in canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 900.0;
/// Built-in white space above the first image.
pub const DEFAULT_TOP_MARGIN: f64 = 80.0;
/// Built-in white space between consecutive images.
pub const DEFAULT_GAP: f64 = 70.0;
/// Built-in white space at the bottom of the canvas, below the footer band when one is present.
pub const DEFAULT_BOTTOM_MARGIN: f64 = 120.0;
/// Built-in space between the last image and the footer anchor.
pub const DEFAULT_FOOTER_MARGIN_TOP: f64 = 40.0;
/// Built-in footer font size in pixels.
pub const DEFAULT_FOOTER_FONT_SIZE: f64 = 18.0;
/// Built-in footer copy.
pub const DEFAULT_FOOTER_TEXT: &str = "© MISHARP. All rights reserved.  |  misharp.co.kr";
/// Built-in footer text color.
pub const DEFAULT_FOOTER_COLOR: Rgb8 = [80, 80, 80];
/// Built-in canvas background.
pub const DEFAULT_BACKGROUND: Rgb8 = [255, 255, 255];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Geometry parameters consumed by [`crate::plan_layout`].
///
/// Lengths are in pixels and may be fractional; the planner rounds each one once to a whole
/// pixel before stacking.
pub struct LayoutConfig {
    /// Target canvas width. Every image is scaled to exactly this width.
    pub canvas_width: f64,
    /// White space above the first image.
    #[serde(default)]
    pub top_margin: f64,
    /// White space between consecutive images (not after the last one).
    #[serde(default)]
    pub gap: f64,
    /// White space below the last image.
    #[serde(default)]
    pub bottom_margin: f64,
    /// Optional trailing footer band.
    #[serde(default)]
    pub footer: Option<FooterConfig>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Footer geometry. Text rendering itself belongs to the compositing sink.
pub struct FooterConfig {
    /// Whether the footer contributes to the canvas at all.
    pub enabled: bool,
    /// Distance from the bottom of the last image to the footer anchor.
    pub margin_top: f64,
    /// Height reserved for the footer text; stands in for real font metrics.
    pub text_height_estimate: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// How a text-capable sink should draw the footer.
pub struct FooterStyle {
    /// Footer copy.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Text color.
    pub color: Rgb8,
}

#[derive(Clone, Debug, PartialEq)]
/// Everything needed to compose one page: geometry plus presentation.
pub struct PageSettings {
    /// Planner geometry.
    pub layout: LayoutConfig,
    /// Footer presentation.
    pub footer_style: FooterStyle,
    /// Canvas fill color.
    pub background: Rgb8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            top_margin: DEFAULT_TOP_MARGIN,
            gap: DEFAULT_GAP,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
            footer: Some(FooterConfig::for_font_size(DEFAULT_FOOTER_FONT_SIZE)),
        }
    }
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self {
            text: DEFAULT_FOOTER_TEXT.to_string(),
            font_size: DEFAULT_FOOTER_FONT_SIZE,
            color: DEFAULT_FOOTER_COLOR,
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            footer_style: FooterStyle::default(),
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl FooterConfig {
    /// Enabled footer whose text height is estimated as two lines of `font_size`.
    pub fn for_font_size(font_size: f64) -> Self {
        Self {
            enabled: true,
            margin_top: DEFAULT_FOOTER_MARGIN_TOP,
            text_height_estimate: font_size * 2.0,
        }
    }
}

impl LayoutConfig {
    /// Config with the given width, no margins, no gap and no footer.
    pub fn new(canvas_width: f64) -> Self {
        Self {
            canvas_width,
            top_margin: 0.0,
            gap: 0.0,
            bottom_margin: 0.0,
            footer: None,
        }
    }

    /// Replace the footer.
    pub fn with_footer(mut self, footer: Option<FooterConfig>) -> Self {
        self.footer = footer;
        self
    }

    /// The footer, if present and enabled.
    pub fn active_footer(&self) -> Option<&FooterConfig> {
        self.footer.as_ref().filter(|f| f.enabled)
    }

    /// Reject widths, margins and footer lengths the planner cannot use.
    pub fn validate(&self) -> PageStackResult<()> {
        if !(self.canvas_width.is_finite() && self.canvas_width > 0.0) {
            return Err(PageStackError::invalid_input(format!(
                "canvas_width must be > 0 (got {})",
                self.canvas_width
            )));
        }
        if self.canvas_width.round() < 1.0 {
            return Err(PageStackError::invalid_input(format!(
                "canvas_width must round to at least 1px (got {})",
                self.canvas_width
            )));
        }
        check_px_len("canvas_width", self.canvas_width)?;
        check_px_len("top_margin", self.top_margin)?;
        check_px_len("gap", self.gap)?;
        check_px_len("bottom_margin", self.bottom_margin)?;

        if let Some(footer) = self.active_footer() {
            check_px_len("footer.margin_top", footer.margin_top)?;
            check_px_len("footer.text_height_estimate", footer.text_height_estimate)?;
            if footer.text_height_estimate <= 0.0 {
                return Err(PageStackError::invalid_input(format!(
                    "footer.text_height_estimate must be > 0 (got {})",
                    footer.text_height_estimate
                )));
            }
        }
        Ok(())
    }
}

fn check_px_len(name: &str, v: f64) -> PageStackResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(PageStackError::invalid_input(format!(
            "{name} must be a finite value >= 0 (got {v})"
        )));
    }
    if v.round() > f64::from(u32::MAX) {
        return Err(PageStackError::invalid_input(format!(
            "{name} exceeds {} px",
            u32::MAX
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Partial layout record. Present fields replace the corresponding base values.
///
/// Field aliases accept the short names used by `job.json` files (`width`, `top`, `bottom`).
pub struct LayoutOverrides {
    /// Replacement canvas width.
    #[serde(default, alias = "width")]
    pub canvas_width: Option<f64>,
    /// Replacement top margin.
    #[serde(default, alias = "top")]
    pub top_margin: Option<f64>,
    /// Replacement gap.
    #[serde(default)]
    pub gap: Option<f64>,
    /// Replacement bottom margin.
    #[serde(default, alias = "bottom")]
    pub bottom_margin: Option<f64>,
    /// Replacement background, as `#RRGGBB`.
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Partial footer record layered over [`FooterConfig`] and [`FooterStyle`].
pub struct FooterOverrides {
    /// Turn the footer on or off.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Replacement footer margin.
    #[serde(default)]
    pub margin_top: Option<f64>,
    /// Replacement text height estimate.
    #[serde(default)]
    pub text_height_estimate: Option<f64>,
    /// Replacement footer copy.
    #[serde(default)]
    pub text: Option<String>,
    /// Replacement font size. Re-derives the height estimate unless one is given.
    #[serde(default)]
    pub font_size: Option<f64>,
    /// Replacement text color.
    #[serde(default)]
    pub color: Option<Rgb8>,
}

impl LayoutOverrides {
    /// Layer present fields over `base`. Values are not validated here; the planner does that.
    pub fn apply(&self, base: &LayoutConfig) -> LayoutConfig {
        LayoutConfig {
            canvas_width: self.canvas_width.unwrap_or(base.canvas_width),
            top_margin: self.top_margin.unwrap_or(base.top_margin),
            gap: self.gap.unwrap_or(base.gap),
            bottom_margin: self.bottom_margin.unwrap_or(base.bottom_margin),
            footer: base.footer,
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl FooterOverrides {
    /// Layer present fields over a base footer and style.
    ///
    /// Enabling a footer on a base without one starts from [`FooterConfig::for_font_size`].
    pub fn apply(
        &self,
        base: Option<&FooterConfig>,
        style: &FooterStyle,
    ) -> (Option<FooterConfig>, FooterStyle) {
        let mut style = style.clone();
        if let Some(text) = &self.text {
            style.text = text.clone();
        }
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(color) = self.color {
            style.color = color;
        }

        let mut footer = match (base, self.enabled) {
            (Some(f), enabled) => {
                let mut f = *f;
                if let Some(enabled) = enabled {
                    f.enabled = enabled;
                }
                f
            }
            (None, Some(true)) => FooterConfig::for_font_size(style.font_size),
            (None, _) => return (None, style),
        };

        if let Some(m) = self.margin_top {
            footer.margin_top = m;
        }
        match (self.text_height_estimate, self.font_size) {
            (Some(h), _) => footer.text_height_estimate = h,
            (None, Some(size)) => footer.text_height_estimate = size * 2.0,
            (None, None) => {}
        }
        (Some(footer), style)
    }
}

impl PageSettings {
    /// Apply layout then footer overrides, returning new settings.
    pub fn with_overrides(
        &self,
        layout: &LayoutOverrides,
        footer: &FooterOverrides,
    ) -> PageStackResult<Self> {
        let mut out = self.clone();
        out.layout = layout.apply(&self.layout);
        if let Some(bg) = &layout.background {
            out.background = parse_hex_rgb(bg)?;
        }
        let (f, style) = footer.apply(self.layout.footer.as_ref(), &self.footer_style);
        out.layout.footer = f;
        out.footer_style = style;
        Ok(out)
    }
}

/// Parse `#RRGGBB` (leading `#` optional) into RGB8.
pub fn parse_hex_rgb(s: &str) -> PageStackResult<Rgb8> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(PageStackError::config(format!(
            "color must look like #RRGGBB (got '{s}')"
        )));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| PageStackError::config(format!("invalid hex color '{s}'")))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
#[path = "../../tests/unit/config/layout.rs"]
mod tests;
