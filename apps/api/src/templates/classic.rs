//! Classic: one full-width column, contact details in the header.

use crate::layout::blocks::{ColumnId, SectionTag};
use crate::layout::budget::PageGeometry;
use crate::models::cv::CvData;
use crate::templates::render_context::RenderContext;
use crate::templates::sections::{
    contact_line, education_section, experience_section, header_block, section_heading,
    skills_section, summary_block, Spacing,
};
use crate::templates::{BlockGenerator, TemplateBlocks, TemplateId};

const PADDING_Y: f32 = 48.0;
const PADDING_X: f32 = 56.0;
const HEADER_GAP: f32 = 20.0;

const SPACING: Spacing = Spacing {
    heading_top: 14.0,
    heading_bottom: 6.0,
    entry_bottom: 12.0,
};

pub struct ClassicTemplate;

impl BlockGenerator for ClassicTemplate {
    fn id(&self) -> TemplateId {
        TemplateId::Classic
    }

    fn geometry(&self) -> PageGeometry {
        PageGeometry::a4_single(PADDING_Y, PADDING_X, HEADER_GAP)
    }

    fn generate(&self, cv: &CvData, ctx: &RenderContext<'_>) -> TemplateBlocks {
        let header = header_block(
            &cv.personal,
            contact_line(&cv.personal, ctx).into_iter().collect(),
            ctx,
            HEADER_GAP,
        );

        let mut main = Vec::new();
        if let Some(summary) = summary_block(&cv.personal, ctx, SPACING) {
            main.push(section_heading(SectionTag::Summary, "Profile", ctx, SPACING));
            main.push(summary);
        }
        main.extend(experience_section(&cv.experience, ctx, SPACING));
        main.extend(education_section(&cv.education, ctx, SPACING));
        main.extend(skills_section(&cv.skill_groups, ctx, SPACING));

        TemplateBlocks {
            header,
            columns: vec![(ColumnId::Main, main)],
            relocation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::BlockKind;
    use crate::models::cv::{EducationEntry, ExperienceEntry, PersonalInfo};
    use crate::models::params::TemplateParams;
    use crate::templates::images::ImageUrlCache;

    fn sample_cv() -> CvData {
        CvData {
            personal: PersonalInfo {
                full_name: "Ada Lovelace".to_string(),
                email: Some("ada@example.com".to_string()),
                summary: Some("Analyst of engines.".to_string()),
                ..Default::default()
            },
            experience: vec![ExperienceEntry {
                role: "Analyst".to_string(),
                company: "Analytical Engine Co".to_string(),
                ..Default::default()
            }],
            education: vec![EducationEntry {
                institution: "Home tutoring".to_string(),
                degree: "Mathematics".to_string(),
                ..Default::default()
            }],
            skill_groups: Vec::new(),
        }
    }

    #[test]
    fn test_classic_single_column_section_order() {
        let params = TemplateParams::default();
        let images = ImageUrlCache::new("https://storage.example");
        let blocks = ClassicTemplate.generate(&sample_cv(), &RenderContext::new(&params, &images));

        assert!(blocks.header.is_some());
        assert!(blocks.relocation.is_none());
        assert_eq!(blocks.columns.len(), 1);
        let (column, main) = &blocks.columns[0];
        assert_eq!(*column, ColumnId::Main);
        let keys: Vec<&str> = main.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "summary-heading",
                "summary",
                "experience-heading",
                "experience-0",
                "education-heading",
                "education-0",
            ]
        );
        assert_eq!(main[0].kind, BlockKind::SectionHeading);
    }

    #[test]
    fn test_header_carries_gap_as_bottom_margin() {
        let params = TemplateParams::default();
        let images = ImageUrlCache::new("https://storage.example");
        let blocks = ClassicTemplate.generate(&sample_cv(), &RenderContext::new(&params, &images));
        let header = blocks.header.expect("header");
        assert_eq!(header.margin_bottom, HEADER_GAP);
        // name + contact line
        assert_eq!(header.elements.len(), 2);
    }

    #[test]
    fn test_geometry_is_a4_single_column() {
        let geometry = ClassicTemplate.geometry();
        assert_eq!(geometry.columns.len(), 1);
        assert_eq!(geometry.column(ColumnId::Main).map(|c| c.width), Some(682.0));
    }
}
