//! Templates: swappable block generators.
//!
//! A template maps a CV into content blocks per column and fixes the page
//! geometry. The pagination pipeline is the same for every template.

pub mod classic;
pub mod images;
pub mod render_context;
pub mod sections;
pub mod sidebar;

use serde::{Deserialize, Serialize};

use crate::layout::blocks::{ColumnId, ContentBlock, SectionTag};
use crate::layout::budget::PageGeometry;
use crate::models::cv::CvData;
use crate::templates::classic::ClassicTemplate;
use crate::templates::render_context::RenderContext;
use crate::templates::sidebar::SidebarTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    /// Single column.
    #[default]
    Classic,
    /// Sidebar plus main column.
    Sidebar,
}

pub const ALL_TEMPLATES: [TemplateId; 2] = [TemplateId::Classic, TemplateId::Sidebar];

/// A section the balancer may move between columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub section: SectionTag,
    pub from: ColumnId,
    pub to: ColumnId,
}

/// Generator output, not yet measured.
#[derive(Debug, Clone)]
pub struct TemplateBlocks {
    /// Spans the full content width on page 0.
    pub header: Option<ContentBlock>,
    /// In slot order.
    pub columns: Vec<(ColumnId, Vec<ContentBlock>)>,
    pub relocation: Option<Relocation>,
}

pub trait BlockGenerator: Send + Sync {
    fn id(&self) -> TemplateId;

    fn geometry(&self) -> PageGeometry;

    /// Pure: the same CV and context always give the same blocks.
    fn generate(&self, cv: &CvData, ctx: &RenderContext<'_>) -> TemplateBlocks;
}

/// Returns the generator for a template id.
pub fn template_for(id: TemplateId) -> &'static dyn BlockGenerator {
    match id {
        TemplateId::Classic => &ClassicTemplate,
        TemplateId::Sidebar => &SidebarTemplate,
    }
}
