//! Column Balancer: one-shot relocation of a movable section between columns.
//!
//! Runs once per pass on measured heights, before pagination. The section
//! moves from the sidebar to the main column only when the sidebar would
//! overflow the first page with it and the main column would not.

use serde::Serialize;
use tracing::debug;

use crate::layout::blocks::{MeasuredBlock, SectionTag};

/// Heights the relocation decision is made on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceInputs {
    /// Sidebar blocks excluding the relocatable section.
    pub sidebar_fixed: f32,
    /// The section measured at sidebar width.
    pub relocatable_in_sidebar: f32,
    /// The section measured at main width.
    pub relocatable_in_main: f32,
    pub main: f32,
    pub first_page_budget: f32,
}

pub fn should_relocate(inputs: &BalanceInputs) -> bool {
    let sidebar_overflows =
        inputs.sidebar_fixed + inputs.relocatable_in_sidebar > inputs.first_page_budget;
    let main_absorbs = inputs.main + inputs.relocatable_in_main <= inputs.first_page_budget;
    sidebar_overflows && main_absorbs
}

/// Outcome reported alongside the pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceDecision {
    pub section: SectionTag,
    pub relocated: bool,
    pub inputs: BalanceInputs,
}

#[derive(Debug, Clone)]
pub struct BalancedColumns {
    pub sidebar: Vec<MeasuredBlock>,
    pub main: Vec<MeasuredBlock>,
    pub decision: BalanceDecision,
}

/// Decides once whether `section` leaves the sidebar.
///
/// `section_at_main_width` holds the same section blocks, in the same order,
/// measured at the main column width. When the section moves it is appended
/// to the end of `main` with those heights; otherwise both columns come back
/// unchanged.
pub fn balance_columns(
    sidebar: Vec<MeasuredBlock>,
    main: Vec<MeasuredBlock>,
    section: SectionTag,
    section_at_main_width: Vec<MeasuredBlock>,
    first_page_budget: f32,
) -> BalancedColumns {
    let (movable, fixed): (Vec<&MeasuredBlock>, Vec<&MeasuredBlock>) =
        sidebar.iter().partition(|b| b.section() == section);

    let inputs = BalanceInputs {
        sidebar_fixed: fixed.iter().map(|b| b.height).sum(),
        relocatable_in_sidebar: movable.iter().map(|b| b.height).sum(),
        relocatable_in_main: section_at_main_width.iter().map(|b| b.height).sum(),
        main: main.iter().map(|b| b.height).sum(),
        first_page_budget,
    };
    let relocated = !movable.is_empty() && should_relocate(&inputs);

    debug!(
        ?section,
        relocated,
        sidebar_fixed = inputs.sidebar_fixed,
        section_height = inputs.relocatable_in_sidebar,
        main_height = inputs.main,
        budget = first_page_budget,
        "Column balance decided"
    );

    let decision = BalanceDecision {
        section,
        relocated,
        inputs,
    };

    if relocated {
        let sidebar = sidebar
            .into_iter()
            .filter(|b| b.section() != section)
            .collect();
        let mut main = main;
        main.extend(section_at_main_width);
        BalancedColumns {
            sidebar,
            main,
            decision,
        }
    } else {
        BalancedColumns {
            sidebar,
            main,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::{measured, BlockKind};

    fn inputs(sidebar_fixed: f32, section: f32, main: f32, budget: f32) -> BalanceInputs {
        BalanceInputs {
            sidebar_fixed,
            relocatable_in_sidebar: section,
            relocatable_in_main: section,
            main,
            first_page_budget: budget,
        }
    }

    #[test]
    fn test_relocates_when_sidebar_overflows_and_main_absorbs() {
        // 900 + 300 = 1200 > 1000, 400 + 300 = 700 <= 1000
        assert!(should_relocate(&inputs(900.0, 300.0, 400.0, 1000.0)));
    }

    #[test]
    fn test_stays_when_sidebar_fits() {
        assert!(!should_relocate(&inputs(600.0, 300.0, 100.0, 1000.0)));
    }

    #[test]
    fn test_stays_when_main_would_overflow() {
        assert!(!should_relocate(&inputs(900.0, 300.0, 800.0, 1000.0)));
    }

    #[test]
    fn test_equality_counts_as_fitting() {
        // sidebar exactly full: no overflow, no move
        assert!(!should_relocate(&inputs(700.0, 300.0, 100.0, 1000.0)));
        // main exactly full after the move: allowed
        assert!(should_relocate(&inputs(900.0, 300.0, 700.0, 1000.0)));
    }

    #[test]
    fn test_uses_main_width_height_for_main_check() {
        let i = BalanceInputs {
            sidebar_fixed: 900.0,
            relocatable_in_sidebar: 300.0,
            relocatable_in_main: 150.0,
            main: 800.0,
            first_page_budget: 1000.0,
        };
        assert!(should_relocate(&i));
    }

    fn sidebar() -> Vec<MeasuredBlock> {
        vec![
            measured("contact", SectionTag::Contact, BlockKind::Entry, 300.0),
            measured("edu-h", SectionTag::Education, BlockKind::SectionHeading, 40.0),
            measured("edu-1", SectionTag::Education, BlockKind::Entry, 260.0),
            measured("skills", SectionTag::Skills, BlockKind::SkillGroup, 600.0),
        ]
    }

    fn education_at_main_width() -> Vec<MeasuredBlock> {
        vec![
            measured("edu-h", SectionTag::Education, BlockKind::SectionHeading, 40.0),
            measured("edu-1", SectionTag::Education, BlockKind::Entry, 200.0),
        ]
    }

    #[test]
    fn test_balance_moves_whole_section_to_end_of_main() {
        let main = vec![measured("exp", SectionTag::Experience, BlockKind::Entry, 400.0)];
        let balanced = balance_columns(
            sidebar(),
            main,
            SectionTag::Education,
            education_at_main_width(),
            1000.0,
        );
        assert!(balanced.decision.relocated);
        let sidebar_keys: Vec<&str> = balanced.sidebar.iter().map(|b| b.key()).collect();
        let main_keys: Vec<&str> = balanced.main.iter().map(|b| b.key()).collect();
        assert_eq!(sidebar_keys, vec!["contact", "skills"]);
        assert_eq!(main_keys, vec!["exp", "edu-h", "edu-1"]);
        // relocated blocks carry their main-width heights
        assert_eq!(balanced.main[2].height, 200.0);
    }

    #[test]
    fn test_balance_leaves_columns_untouched_when_not_needed() {
        let main = vec![measured("exp", SectionTag::Experience, BlockKind::Entry, 900.0)];
        let balanced = balance_columns(
            sidebar(),
            main.clone(),
            SectionTag::Education,
            education_at_main_width(),
            1000.0,
        );
        assert!(!balanced.decision.relocated);
        assert_eq!(balanced.sidebar, sidebar());
        assert_eq!(balanced.main, main);
    }

    #[test]
    fn test_balance_without_section_is_noop() {
        let sidebar = vec![measured("skills", SectionTag::Skills, BlockKind::SkillGroup, 1200.0)];
        let balanced = balance_columns(
            sidebar.clone(),
            Vec::new(),
            SectionTag::Education,
            Vec::new(),
            1000.0,
        );
        assert!(!balanced.decision.relocated);
        assert_eq!(balanced.sidebar, sidebar);
        assert!(balanced.main.is_empty());
    }
}
