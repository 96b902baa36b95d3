use crate::foundation::error::{PageStackError, PageStackResult};

/// Intrinsic pixel dimensions of one source image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageSize {
    /// Width in pixels; must be > 0.
    pub width: f64,
    /// Height in pixels; must be > 0.
    pub height: f64,
}

impl ImageSize {
    /// Build a checked size. Both dimensions must be finite and positive.
    pub fn new(width: f64, height: f64) -> PageStackResult<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Size as decoded from an image header.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Height / width.
    pub fn aspect(self) -> f64 {
        self.height / self.width
    }

    pub(crate) fn validate(self) -> PageStackResult<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(PageStackError::invalid_input(format!(
                "image width must be > 0 (got {})",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(PageStackError::invalid_input(format!(
                "image height must be > 0 (got {})",
                self.height
            )));
        }
        Ok(())
    }
}

impl From<(u32, u32)> for ImageSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::from_pixels(width, height)
    }
}

/// Opaque RGB8 color, used for canvas backgrounds and footer text.
pub type Rgb8 = [u8; 3];

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
