//! Column Paginator: greedy first-fit distribution of blocks into pages.
//!
//! # Rules
//! - A block that does not fit closes the current page, unless the page is
//!   empty: an oversized block sits alone on its page and overflows it.
//! - A section heading is kept with what follows it: if the heading plus the
//!   next block (extended across consecutive headings to the first non-heading
//!   block) does not fit, the page breaks before the heading.
//! - Equality fits.
//!
//! Single pass, no backtracking, no splitting inside a block.

use crate::layout::blocks::MeasuredBlock;

/// Splits `blocks` into pages. `budget(i)` is the usable height of page `i`.
///
/// Every input block appears exactly once, in input order.
pub fn paginate<F>(blocks: Vec<MeasuredBlock>, budget: F) -> Vec<Vec<MeasuredBlock>>
where
    F: Fn(usize) -> f32,
{
    let heights: Vec<f32> = blocks.iter().map(|b| b.height).collect();
    let headings: Vec<bool> = blocks.iter().map(MeasuredBlock::is_heading).collect();

    let mut pages: Vec<Vec<MeasuredBlock>> = Vec::new();
    let mut current: Vec<MeasuredBlock> = Vec::new();
    let mut accumulated = 0.0_f32;
    let mut page_index = 0usize;

    for (i, block) in blocks.into_iter().enumerate() {
        // page height after this block (and, for a heading, after everything
        // it is kept with), summed in placement order so the heading check and
        // the following fit checks see the same f32 values
        let reaches = if headings[i] {
            keep_with_next_end(accumulated, &heights, &headings, i)
        } else {
            accumulated + heights[i]
        };

        if !current.is_empty() && reaches > budget(page_index) {
            pages.push(std::mem::take(&mut current));
            page_index += 1;
            accumulated = 0.0;
        }

        accumulated += heights[i];
        current.push(block);
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Running page height from `accumulated` through the heading at `start`,
/// every heading directly after it and the first non-heading block, if any.
fn keep_with_next_end(accumulated: f32, heights: &[f32], headings: &[bool], start: usize) -> f32 {
    let mut end = accumulated;
    for j in start..heights.len() {
        end += heights[j];
        if !headings[j] {
            break;
        }
    }
    end
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
