//! Everything a block generator needs besides the CV itself.

use crate::layout::font_metrics::TextStyle;
use crate::models::params::TemplateParams;
use crate::templates::images::ImageUrlCache;

pub struct RenderContext<'a> {
    pub params: &'a TemplateParams,
    pub images: &'a ImageUrlCache,
}

impl<'a> RenderContext<'a> {
    pub fn new(params: &'a TemplateParams, images: &'a ImageUrlCache) -> Self {
        Self { params, images }
    }

    fn style(&self, scale: f32, line_height: f32, bold: bool) -> TextStyle {
        TextStyle {
            font: self.params.font,
            size_px: self.params.font_size.body_px() * scale,
            line_height,
            bold,
        }
    }

    pub fn body(&self) -> TextStyle {
        self.style(1.0, 1.45, false)
    }

    pub fn strong(&self) -> TextStyle {
        self.style(1.0, 1.45, true)
    }

    pub fn small(&self) -> TextStyle {
        self.style(0.88, 1.4, false)
    }

    pub fn heading(&self) -> TextStyle {
        self.style(1.15, 1.3, true)
    }

    pub fn name(&self) -> TextStyle {
        self.style(2.0, 1.2, true)
    }

    pub fn title(&self) -> TextStyle {
        self.style(1.2, 1.3, false)
    }
}
