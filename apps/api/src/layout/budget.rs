//! Page geometry and usable-height budgets.

use serde::{Deserialize, Serialize};

use crate::layout::blocks::ColumnId;

/// A4 at 96 DPI.
pub const A4_WIDTH_PX: f32 = 794.0;
pub const A4_HEIGHT_PX: f32 = 1123.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnGeometry {
    pub column: ColumnId,
    /// Left edge relative to the page.
    pub offset_x: f32,
    pub width: f32,
}

/// Fixed page geometry of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub padding_x: f32,
    /// Space between the page-0 header and the column content.
    pub header_gap: f32,
    pub columns: Vec<ColumnGeometry>,
}

impl PageGeometry {
    /// A4 page with a single full-width main column.
    pub fn a4_single(padding_y: f32, padding_x: f32, header_gap: f32) -> Self {
        Self {
            width: A4_WIDTH_PX,
            height: A4_HEIGHT_PX,
            padding_top: padding_y,
            padding_bottom: padding_y,
            padding_x,
            header_gap,
            columns: vec![ColumnGeometry {
                column: ColumnId::Main,
                offset_x: padding_x,
                width: A4_WIDTH_PX - 2.0 * padding_x,
            }],
        }
    }

    pub fn vertical_padding(&self) -> f32 {
        self.padding_top + self.padding_bottom
    }

    /// Full content width between the horizontal paddings. The header spans it.
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.padding_x).max(0.0)
    }

    pub fn column(&self, column: ColumnId) -> Option<&ColumnGeometry> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Usable content height of page `page_index`.
///
/// Page 0 loses the header height; later pages do not repeat the header. A
/// header height of 0 makes both formulas agree.
pub fn usable_height(page_index: usize, geometry: &PageGeometry, header_height: f32) -> f32 {
    let base = geometry.height - geometry.vertical_padding();
    let height = if page_index == 0 {
        base - header_height
    } else {
        base
    };
    height.max(0.0)
}

/// Budgets for one layout pass, fixed once the header is measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBudget {
    pub first_page: f32,
    pub other_pages: f32,
}

impl PageBudget {
    pub fn new(geometry: &PageGeometry, header_height: f32) -> Self {
        Self {
            first_page: usable_height(0, geometry, header_height),
            other_pages: usable_height(1, geometry, header_height),
        }
    }

    #[cfg(test)]
    pub fn uniform(height: f32) -> Self {
        Self {
            first_page: height,
            other_pages: height,
        }
    }

    pub fn for_page(&self, page_index: usize) -> f32 {
        if page_index == 0 {
            self.first_page
        } else {
            self.other_pages
        }
    }
}
