//! Sidebar: narrow left column (contact, skills, education) beside the main
//! column (experience). Education may move to the main column when the
//! sidebar would overflow the first page.

use crate::layout::blocks::{ColumnId, Element, SectionTag};
use crate::layout::budget::{ColumnGeometry, PageGeometry, A4_HEIGHT_PX, A4_WIDTH_PX};
use crate::models::cv::{non_empty, CvData};
use crate::templates::render_context::RenderContext;
use crate::templates::sections::{
    contact_block, education_section, experience_section, header_block, skills_section,
    Spacing,
};
use crate::templates::{BlockGenerator, Relocation, TemplateBlocks, TemplateId};

const PADDING_Y: f32 = 40.0;
const PADDING_X: f32 = 36.0;
const SIDEBAR_WIDTH: f32 = 220.0;
const GUTTER: f32 = 24.0;
const HEADER_GAP: f32 = 24.0;

const SPACING: Spacing = Spacing {
    heading_top: 12.0,
    heading_bottom: 6.0,
    entry_bottom: 10.0,
};

pub struct SidebarTemplate;

impl BlockGenerator for SidebarTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Sidebar
    }

    fn geometry(&self) -> PageGeometry {
        let main_offset = PADDING_X + SIDEBAR_WIDTH + GUTTER;
        PageGeometry {
            width: A4_WIDTH_PX,
            height: A4_HEIGHT_PX,
            padding_top: PADDING_Y,
            padding_bottom: PADDING_Y,
            padding_x: PADDING_X,
            header_gap: HEADER_GAP,
            columns: vec![
                ColumnGeometry {
                    column: ColumnId::Sidebar,
                    offset_x: PADDING_X,
                    width: SIDEBAR_WIDTH,
                },
                ColumnGeometry {
                    column: ColumnId::Main,
                    offset_x: main_offset,
                    width: A4_WIDTH_PX - PADDING_X - main_offset,
                },
            ],
        }
    }

    fn generate(&self, cv: &CvData, ctx: &RenderContext<'_>) -> TemplateBlocks {
        // the summary lives in the header here, so its length moves the
        // first-page budget of both columns
        let summary: Vec<Element> = non_empty(cv.personal.summary.as_deref())
            .map(|summary| Element::Text {
                text: summary.to_string(),
                style: ctx.body(),
                indent_px: 0.0,
            })
            .into_iter()
            .collect();
        let header = header_block(&cv.personal, summary, ctx, HEADER_GAP);

        let mut sidebar = Vec::new();
        sidebar.extend(contact_block(&cv.personal, ctx, SPACING));
        sidebar.extend(skills_section(&cv.skill_groups, ctx, SPACING));
        sidebar.extend(education_section(&cv.education, ctx, SPACING));

        let main = experience_section(&cv.experience, ctx, SPACING);

        TemplateBlocks {
            header,
            columns: vec![(ColumnId::Sidebar, sidebar), (ColumnId::Main, main)],
            relocation: Some(Relocation {
                section: SectionTag::Education,
                from: ColumnId::Sidebar,
                to: ColumnId::Main,
            }),
        }
    }
}
