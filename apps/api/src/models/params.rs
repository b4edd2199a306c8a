use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::font_metrics::{FontFamily, FontSize};
use crate::templates::TemplateId;

/// Named accent colours offered by the editor.
pub const ACCENT_PALETTE: [&str; 6] = ["slate", "indigo", "teal", "rose", "amber", "emerald"];

/// Template parameters. Any change to them triggers a new layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParams {
    #[serde(default)]
    pub template: TemplateId,
    /// Palette name or `#rgb` / `#rrggbb`. Does not affect layout, but the
    /// renderer needs it with the pages.
    #[serde(default = "default_accent")]
    pub accent_color: String,
    #[serde(default)]
    pub font: FontFamily,
    #[serde(default)]
    pub font_size: FontSize,
}

fn default_accent() -> String {
    ACCENT_PALETTE[0].to_string()
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            template: TemplateId::default(),
            accent_color: default_accent(),
            font: FontFamily::default(),
            font_size: FontSize::default(),
        }
    }
}

impl TemplateParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if is_valid_accent(&self.accent_color) {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "accent_color '{}' is neither a palette name nor a hex colour",
                self.accent_color
            )))
        }
    }
}

fn is_valid_accent(value: &str) -> bool {
    if ACCENT_PALETTE.contains(&value) {
        return true;
    }
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
