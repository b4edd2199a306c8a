//! Page Assembler: zips per-column page lists into final pages.

use serde::Serialize;

use crate::layout::blocks::{ColumnId, MeasuredBlock};
use crate::layout::budget::PageBudget;
use crate::layout::fill::{analyze_fill, FillReport, FillVerdict};

/// One column's fragment of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSlot {
    pub column: ColumnId,
    pub blocks: Vec<MeasuredBlock>,
    pub fill: FillReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    /// Only ever set on page 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<MeasuredBlock>,
    pub slots: Vec<ColumnSlot>,
}

impl Page {
    #[cfg(test)]
    pub fn slot(&self, column: ColumnId) -> Option<&ColumnSlot> {
        self.slots.iter().find(|s| s.column == column)
    }

    pub fn overflows(&self) -> bool {
        self.slots
            .iter()
            .any(|s| s.fill.verdict == FillVerdict::Overflow)
    }
}

/// Builds `max(column page counts)` pages. Page `i` holds each column's page
/// `i`, or an empty fragment when that column ran out. Slots keep the order
/// of `columns`. A header with no column content still gets its page.
pub fn assemble_pages(
    columns: Vec<(ColumnId, Vec<Vec<MeasuredBlock>>)>,
    header: Option<MeasuredBlock>,
    budget: &PageBudget,
) -> Vec<Page> {
    let page_count = columns
        .iter()
        .map(|(_, pages)| pages.len())
        .max()
        .unwrap_or(0)
        .max(usize::from(header.is_some()));

    let mut iters: Vec<(ColumnId, std::vec::IntoIter<Vec<MeasuredBlock>>)> = columns
        .into_iter()
        .map(|(column, pages)| (column, pages.into_iter()))
        .collect();

    let mut header = header;
    let mut pages = Vec::with_capacity(page_count);
    for index in 0..page_count {
        let page_budget = budget.for_page(index);
        let slots = iters
            .iter_mut()
            .map(|(column, column_pages)| {
                let blocks = column_pages.next().unwrap_or_default();
                let fill = analyze_fill(&blocks, page_budget);
                ColumnSlot {
                    column: *column,
                    blocks,
                    fill,
                }
            })
            .collect();
        pages.push(Page {
            index,
            header: if index == 0 { header.take() } else { None },
            slots,
        });
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::{measured, BlockKind, SectionTag};

    fn page_of(n: usize) -> Vec<MeasuredBlock> {
        (0..n)
            .map(|i| measured(&format!("b{i}"), SectionTag::Experience, BlockKind::Entry, 100.0))
            .collect()
    }

    fn header() -> MeasuredBlock {
        measured("header", SectionTag::Header, BlockKind::Header, 150.0)
    }

    #[test]
    fn test_page_count_is_max_of_columns() {
        let columns = vec![
            (ColumnId::Sidebar, vec![page_of(2), page_of(1)]),
            (ColumnId::Main, vec![page_of(3), page_of(3), page_of(1)]),
        ];
        let pages = assemble_pages(columns, Some(header()), &PageBudget::uniform(1000.0));
        assert_eq!(pages.len(), 3);

        let last_sidebar = pages[2].slot(ColumnId::Sidebar).expect("sidebar slot");
        assert!(last_sidebar.blocks.is_empty());
        assert_eq!(last_sidebar.fill.verdict, FillVerdict::Empty);
        assert_eq!(pages[2].slot(ColumnId::Main).map(|s| s.blocks.len()), Some(1));
    }

    #[test]
    fn test_header_only_on_first_page() {
        let columns = vec![(ColumnId::Main, vec![page_of(1), page_of(1)])];
        let pages = assemble_pages(columns, Some(header()), &PageBudget::uniform(1000.0));
        assert!(pages[0].header.is_some());
        assert!(pages[1].header.is_none());
    }

    #[test]
    fn test_slots_keep_column_order() {
        let columns = vec![
            (ColumnId::Sidebar, vec![page_of(1)]),
            (ColumnId::Main, vec![page_of(1)]),
        ];
        let pages = assemble_pages(columns, None, &PageBudget::uniform(1000.0));
        let order: Vec<ColumnId> = pages[0].slots.iter().map(|s| s.column).collect();
        assert_eq!(order, vec![ColumnId::Sidebar, ColumnId::Main]);
        assert_eq!(pages[0].index, 0);
    }

    #[test]
    fn test_no_columns_no_pages() {
        let pages = assemble_pages(Vec::new(), None, &PageBudget::uniform(1000.0));
        assert!(pages.is_empty());
    }

    #[test]
    fn test_header_alone_gets_a_page() {
        let columns = vec![(ColumnId::Main, Vec::new())];
        let pages = assemble_pages(columns, Some(header()), &PageBudget::uniform(1000.0));
        assert_eq!(pages.len(), 1);
        assert!(pages[0].header.is_some());
        assert_eq!(pages[0].slots[0].fill.verdict, FillVerdict::Empty);
    }

    #[test]
    fn test_fill_uses_per_page_budget() {
        let budget = PageBudget {
            first_page: 200.0,
            other_pages: 1000.0,
        };
        let columns = vec![(ColumnId::Main, vec![page_of(2), page_of(2)])];
        let pages = assemble_pages(columns, None, &budget);
        assert_eq!(pages[0].slots[0].fill.verdict, FillVerdict::Filled);
        assert_eq!(pages[1].slots[0].fill.verdict, FillVerdict::Sparse);
        assert!(!pages[0].overflows());
    }
}
