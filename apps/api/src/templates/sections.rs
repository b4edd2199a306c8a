//! Block builders shared by the templates. Templates pick margins; the
//! content of a section is the same everywhere.

use std::collections::HashSet;

use uuid::Uuid;

use crate::layout::blocks::{BlockKind, ContentBlock, Element, SectionTag};
use crate::layout::font_metrics::TextStyle;
use crate::models::cv::{
    format_date_range, non_empty, EducationEntry, ExperienceEntry, PersonalInfo, SkillGroup,
};
use crate::templates::render_context::RenderContext;

const HIGHLIGHT_INDENT_PX: f32 = 12.0;
const CHIP_PADDING_X: f32 = 6.0;
const CHIP_GAP: f32 = 4.0;
const AVATAR_HEIGHT: f32 = 96.0;

/// Vertical spacing a template applies to its blocks.
#[derive(Debug, Clone, Copy)]
pub struct Spacing {
    pub heading_top: f32,
    pub heading_bottom: f32,
    pub entry_bottom: f32,
}

/// Stable key per entry: the entry id when the editor sent one, else its
/// position. A repeated id gets its position appended so keys stay unique.
pub fn entry_keys(prefix: &str, ids: impl IntoIterator<Item = Option<Uuid>>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .enumerate()
        .map(|(index, id)| match id {
            Some(id) if seen.insert(id) => format!("{prefix}-{id}"),
            Some(id) => format!("{prefix}-{id}-{index}"),
            None => format!("{prefix}-{index}"),
        })
        .collect()
}

fn text(text: impl Into<String>, style: TextStyle) -> Element {
    Element::Text {
        text: text.into(),
        style,
        indent_px: 0.0,
    }
}

pub fn section_heading(
    section: SectionTag,
    title: &str,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> ContentBlock {
    let key = format!("{}-heading", section_slug(section));
    let mut block = ContentBlock::new(key, section, BlockKind::SectionHeading)
        .with_margins(spacing.heading_top, spacing.heading_bottom);
    block.push(text(title.to_uppercase(), ctx.heading()));
    block
}

/// Name and job title, plus whatever extra lines the template wants on top.
pub fn header_block(
    personal: &PersonalInfo,
    extra: Vec<Element>,
    ctx: &RenderContext<'_>,
    gap: f32,
) -> Option<ContentBlock> {
    let name = non_empty(Some(personal.full_name.as_str()));
    let job_title = non_empty(personal.job_title.as_deref());
    if name.is_none() && job_title.is_none() && extra.is_empty() {
        return None;
    }

    let mut block =
        ContentBlock::new("header", SectionTag::Header, BlockKind::Header).with_margins(0.0, gap);
    if let Some(name) = name {
        block.push(text(name, ctx.name()));
    }
    if let Some(job_title) = job_title {
        block.push(text(job_title, ctx.title()));
    }
    for element in extra {
        block.push(element);
    }
    Some(block)
}

/// One line of contact items separated by bars.
pub fn contact_line(personal: &PersonalInfo, ctx: &RenderContext<'_>) -> Option<Element> {
    let items = personal.contact_items();
    if items.is_empty() {
        None
    } else {
        Some(text(items.join(" | "), ctx.small()))
    }
}

/// Avatar (if it resolves) and one contact item per line.
pub fn contact_block(
    personal: &PersonalInfo,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Option<ContentBlock> {
    let avatar = personal
        .avatar_path
        .as_deref()
        .and_then(|path| ctx.images.resolve(path));
    let items = personal.contact_items();
    if avatar.is_none() && items.is_empty() {
        return None;
    }

    let mut block = ContentBlock::new("contact", SectionTag::Contact, BlockKind::Entry)
        .with_margins(0.0, spacing.entry_bottom);
    if let Some(url) = avatar {
        block.push(Element::Image {
            url,
            height: AVATAR_HEIGHT,
        });
        block.push(Element::Spacer { height: 8.0 });
    }
    for item in items {
        block.push(text(item, ctx.small()));
    }
    Some(block)
}

pub fn summary_block(
    personal: &PersonalInfo,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Option<ContentBlock> {
    let summary = non_empty(personal.summary.as_deref())?;
    let mut block = ContentBlock::new("summary", SectionTag::Summary, BlockKind::Paragraph)
        .with_margins(0.0, spacing.entry_bottom);
    block.push(text(summary, ctx.body()));
    Some(block)
}

/// Heading plus one block per non-blank entry; empty when nothing is left.
pub fn experience_section(
    entries: &[ExperienceEntry],
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Vec<ContentBlock> {
    let keys = entry_keys("experience", entries.iter().map(|entry| entry.id));
    let blocks: Vec<ContentBlock> = entries
        .iter()
        .zip(keys)
        .filter_map(|(entry, key)| experience_block(key, entry, ctx, spacing))
        .collect();
    with_heading(SectionTag::Experience, "Experience", blocks, ctx, spacing)
}

fn experience_block(
    key: String,
    entry: &ExperienceEntry,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Option<ContentBlock> {
    let role = non_empty(Some(entry.role.as_str()));
    let company = non_empty(Some(entry.company.as_str()));
    let description = non_empty(entry.description.as_deref());
    let highlights: Vec<&str> = entry
        .highlights
        .iter()
        .filter_map(|h| non_empty(Some(h.as_str())))
        .collect();
    if role.is_none() && company.is_none() && description.is_none() && highlights.is_empty() {
        return None;
    }

    let mut block = ContentBlock::new(key, SectionTag::Experience, BlockKind::Entry)
        .with_margins(0.0, spacing.entry_bottom);

    if let Some(role) = role {
        block.push(text(role, ctx.strong()));
    }
    let place: Vec<&str> = [company, non_empty(entry.location.as_deref())]
        .into_iter()
        .flatten()
        .collect();
    if !place.is_empty() {
        block.push(text(place.join(" | "), ctx.body()));
    }
    if let Some(dates) = format_date_range(entry.date_start, entry.date_end) {
        block.push(text(dates, ctx.small()));
    }
    if let Some(description) = description {
        block.push(text(description, ctx.body()));
    }
    for highlight in highlights {
        block.push(Element::Text {
            text: format!("• {highlight}"),
            style: ctx.body(),
            indent_px: HIGHLIGHT_INDENT_PX,
        });
    }
    Some(block)
}

pub fn education_section(
    entries: &[EducationEntry],
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Vec<ContentBlock> {
    let keys = entry_keys("education", entries.iter().map(|entry| entry.id));
    let blocks: Vec<ContentBlock> = entries
        .iter()
        .zip(keys)
        .filter_map(|(entry, key)| education_block(key, entry, ctx, spacing))
        .collect();
    with_heading(SectionTag::Education, "Education", blocks, ctx, spacing)
}

fn education_block(
    key: String,
    entry: &EducationEntry,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Option<ContentBlock> {
    let institution = non_empty(Some(entry.institution.as_str()));
    let degree = non_empty(Some(entry.degree.as_str()));
    if institution.is_none() && degree.is_none() {
        return None;
    }

    let mut block = ContentBlock::new(key, SectionTag::Education, BlockKind::Entry)
        .with_margins(0.0, spacing.entry_bottom);

    let qualification: Vec<&str> = [degree, non_empty(entry.field.as_deref())]
        .into_iter()
        .flatten()
        .collect();
    if !qualification.is_empty() {
        block.push(text(qualification.join(", "), ctx.strong()));
    }
    if let Some(institution) = institution {
        block.push(text(institution, ctx.body()));
    }
    if let Some(dates) = format_date_range(entry.date_start, entry.date_end) {
        block.push(text(dates, ctx.small()));
    }
    if let Some(description) = non_empty(entry.description.as_deref()) {
        block.push(text(description, ctx.body()));
    }
    Some(block)
}

pub fn skills_section(
    groups: &[SkillGroup],
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Vec<ContentBlock> {
    let keys = entry_keys("skills", groups.iter().map(|group| group.id));
    let blocks: Vec<ContentBlock> = groups
        .iter()
        .zip(keys)
        .filter_map(|(group, key)| skill_group_block(key, group, ctx, spacing))
        .collect();
    with_heading(SectionTag::Skills, "Skills", blocks, ctx, spacing)
}

fn skill_group_block(
    key: String,
    group: &SkillGroup,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Option<ContentBlock> {
    let skills: Vec<String> = group
        .skills
        .iter()
        .filter_map(|s| non_empty(Some(s.as_str())))
        .map(str::to_string)
        .collect();
    let name = non_empty(Some(group.name.as_str()));
    if skills.is_empty() && name.is_none() {
        return None;
    }

    let mut block = ContentBlock::new(key, SectionTag::Skills, BlockKind::SkillGroup)
        .with_margins(0.0, spacing.entry_bottom);
    if let Some(name) = name {
        block.push(text(name, ctx.strong()));
    }
    if !skills.is_empty() {
        let style = ctx.small();
        block.push(Element::Chips {
            items: skills,
            chip_height: (style.line_px() + 4.0).round(),
            style,
            padding_x: CHIP_PADDING_X,
            gap: CHIP_GAP,
        });
    }
    Some(block)
}

fn with_heading(
    section: SectionTag,
    title: &str,
    blocks: Vec<ContentBlock>,
    ctx: &RenderContext<'_>,
    spacing: Spacing,
) -> Vec<ContentBlock> {
    if blocks.is_empty() {
        return blocks;
    }
    let mut out = Vec::with_capacity(blocks.len() + 1);
    out.push(section_heading(section, title, ctx, spacing));
    out.extend(blocks);
    out
}

fn section_slug(section: SectionTag) -> &'static str {
    match section {
        SectionTag::Header => "header",
        SectionTag::Contact => "contact",
        SectionTag::Summary => "summary",
        SectionTag::Experience => "experience",
        SectionTag::Education => "education",
        SectionTag::Skills => "skills",
    }
}
