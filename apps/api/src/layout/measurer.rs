//! Block measurement.
//!
//! Heights come from a pluggable [`TextMeasurer`] reached through a
//! [`MeasurementSurface`]. The surface has an explicit readiness signal: a
//! [`BlockMeasurer`] can only be obtained from a ready surface, so no layout
//! decision is ever made on default or zero heights.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

use crate::layout::blocks::{ContentBlock, Element, MeasuredBlock};
use crate::layout::font_metrics::{get_metrics, TextStyle, ALL_FONTS};
use crate::layout::LayoutError;

// ────────────────────────────────────────────────────────────────────────────
// Text measurement collaborator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub lines: u32,
    pub height_px: f32,
}

/// Measures text at a fixed width. Swap implementations without touching the
/// paginator.
pub trait TextMeasurer: Send + Sync {
    /// Unwrapped width of `text` in px.
    fn text_width(&self, text: &str, style: &TextStyle) -> f32;

    /// Wrapped line count and height of `text` at `width_px`.
    fn measure(&self, text: &str, style: &TextStyle, width_px: f32) -> TextMetrics;
}

/// Default measurer backed by the static font tables.
pub struct MetricTableMeasurer;

impl TextMeasurer for MetricTableMeasurer {
    fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        get_metrics(&style.font).measure_str(text, style.bold) * style.size_px
    }

    fn measure(&self, text: &str, style: &TextStyle, width_px: f32) -> TextMetrics {
        if style.size_px <= 0.0 {
            return TextMetrics {
                lines: 0,
                height_px: 0.0,
            };
        }
        let width_em = width_px.max(0.0) / style.size_px;
        let lines = get_metrics(&style.font).wrapped_lines(text, width_em, style.bold);
        TextMetrics {
            lines,
            height_px: lines as f32 * style.line_px(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement surface
// ────────────────────────────────────────────────────────────────────────────

/// Where measurement happens. Readiness is signalled, never polled on a timer.
#[async_trait]
pub trait MeasurementSurface: Send + Sync {
    fn is_ready(&self) -> bool;

    /// Resolves once the surface can measure.
    async fn ready(&self) -> Result<(), LayoutError>;

    fn text_measurer(&self) -> Arc<dyn TextMeasurer>;
}

/// Surface whose readiness is driven by a [`SurfaceReadyHandle`].
pub struct SignalledSurface {
    measurer: Arc<dyn TextMeasurer>,
    ready_rx: watch::Receiver<bool>,
}

/// Owner side of a [`SignalledSurface`]'s ready signal.
pub struct SurfaceReadyHandle {
    ready_tx: watch::Sender<bool>,
}

impl SurfaceReadyHandle {
    pub fn mark_ready(&self) {
        self.ready_tx.send_replace(true);
    }
}

/// Creates a surface in the not-ready state plus the handle that readies it.
pub fn signalled_surface(measurer: Arc<dyn TextMeasurer>) -> (SignalledSurface, SurfaceReadyHandle) {
    let (ready_tx, ready_rx) = watch::channel(false);
    (
        SignalledSurface { measurer, ready_rx },
        SurfaceReadyHandle { ready_tx },
    )
}

/// Builds the metric-table surface and readies it once every table has been
/// touched.
pub fn metric_table_surface() -> SignalledSurface {
    let (surface, handle) = signalled_surface(Arc::new(MetricTableMeasurer));
    let warmed = ALL_FONTS
        .iter()
        .filter(|font| {
            let table = get_metrics(font);
            table.font == **font && table.measure_str("Ag", false) > 0.0
        })
        .count();
    debug!(fonts = warmed, "Font metric tables loaded");
    handle.mark_ready();
    surface
}

#[async_trait]
impl MeasurementSurface for SignalledSurface {
    fn is_ready(&self) -> bool {
        *self.ready_rx.borrow()
    }

    async fn ready(&self) -> Result<(), LayoutError> {
        if self.is_ready() {
            return Ok(());
        }
        let mut rx = self.ready_rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| LayoutError::SurfaceClosed)
    }

    fn text_measurer(&self) -> Arc<dyn TextMeasurer> {
        Arc::clone(&self.measurer)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block measurer
// ────────────────────────────────────────────────────────────────────────────

/// Measures blocks at a given content width. Owned, so it can be moved into
/// `spawn_blocking`.
#[derive(Clone)]
pub struct BlockMeasurer {
    text: Arc<dyn TextMeasurer>,
}

impl BlockMeasurer {
    /// Fails with [`LayoutError::SurfaceNotReady`] instead of measuring on an
    /// unready surface.
    pub fn new(surface: &dyn MeasurementSurface) -> Result<Self, LayoutError> {
        if !surface.is_ready() {
            return Err(LayoutError::SurfaceNotReady);
        }
        Ok(Self {
            text: surface.text_measurer(),
        })
    }

    /// Total vertical extent: intrinsic height plus both margins.
    pub fn extent(&self, block: &ContentBlock, width_px: f32) -> f32 {
        self.intrinsic_height(block, width_px) + block.margin_top + block.margin_bottom
    }

    pub fn measure(&self, block: ContentBlock, width_px: f32) -> MeasuredBlock {
        let height = self.extent(&block, width_px);
        MeasuredBlock { block, height }
    }

    /// Measures every block in order at the same width.
    pub fn measure_all(&self, blocks: Vec<ContentBlock>, width_px: f32) -> Vec<MeasuredBlock> {
        blocks
            .into_iter()
            .map(|block| self.measure(block, width_px))
            .collect()
    }

    fn intrinsic_height(&self, block: &ContentBlock, width_px: f32) -> f32 {
        block
            .elements
            .iter()
            .map(|element| self.element_height(element, width_px))
            .sum()
    }

    fn element_height(&self, element: &Element, width_px: f32) -> f32 {
        match element {
            Element::Text {
                text,
                style,
                indent_px,
            } => self.text.measure(text, style, width_px - indent_px).height_px,
            Element::Chips {
                items,
                style,
                padding_x,
                chip_height,
                gap,
            } => {
                let rows = self.chip_rows(items, style, *padding_x, *gap, width_px);
                if rows == 0 {
                    0.0
                } else {
                    rows as f32 * chip_height + (rows - 1) as f32 * gap
                }
            }
            Element::Image { height, .. } => *height,
            Element::Spacer { height } => *height,
        }
    }

    /// Greedy row flow, same rule as word wrap: a chip that does not fit
    /// starts a new row unless the row is empty.
    fn chip_rows(
        &self,
        items: &[String],
        style: &TextStyle,
        padding_x: f32,
        gap: f32,
        width_px: f32,
    ) -> u32 {
        let mut rows = 0u32;
        let mut row_width = 0.0_f32;
        for item in items.iter().filter(|item| !item.trim().is_empty()) {
            let chip_w = self.text.text_width(item.trim(), style) + 2.0 * padding_x;
            if rows == 0 {
                rows = 1;
                row_width = chip_w;
            } else if row_width + gap + chip_w > width_px {
                rows += 1;
                row_width = chip_w;
            } else {
                row_width += gap + chip_w;
            }
        }
        rows
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::blocks::{BlockKind, SectionTag};
    use crate::layout::font_metrics::FontFamily;

    fn style() -> TextStyle {
        TextStyle {
            font: FontFamily::Inter,
            size_px: 10.0,
            line_height: 1.5,
            bold: false,
        }
    }

    fn ready_measurer() -> BlockMeasurer {
        let surface = metric_table_surface();
        BlockMeasurer::new(&surface).expect("surface is ready")
    }

    #[test]
    fn test_unready_surface_refuses_to_measure() {
        let (surface, _handle) = signalled_surface(Arc::new(MetricTableMeasurer));
        assert!(!surface.is_ready());
        assert!(matches!(
            BlockMeasurer::new(&surface),
            Err(LayoutError::SurfaceNotReady)
        ));
    }

    #[tokio::test]
    async fn test_ready_future_resolves_after_signal() {
        let (surface, handle) = signalled_surface(Arc::new(MetricTableMeasurer));
        let surface = Arc::new(surface);
        let waiter = {
            let surface = Arc::clone(&surface);
            tokio::spawn(async move { surface.ready().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());
        handle.mark_ready();
        waiter.await.expect("join").expect("ready");
        assert!(BlockMeasurer::new(surface.as_ref()).is_ok());
    }

    #[tokio::test]
    async fn test_ready_fails_when_handle_dropped() {
        let (surface, handle) = signalled_surface(Arc::new(MetricTableMeasurer));
        drop(handle);
        assert!(matches!(
            surface.ready().await,
            Err(LayoutError::SurfaceClosed)
        ));
    }

    #[test]
    fn test_extent_includes_margins() {
        let measurer = ready_measurer();
        let mut block =
            ContentBlock::new("b", SectionTag::Summary, BlockKind::Paragraph).with_margins(4.0, 6.0);
        block.push(Element::Text {
            text: "Short".to_string(),
            style: style(),
            indent_px: 0.0,
        });
        // one line of 10px * 1.5
        assert!((measurer.extent(&block, 300.0) - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_narrower_width_is_taller() {
        let measurer = ready_measurer();
        let mut block = ContentBlock::new("b", SectionTag::Summary, BlockKind::Paragraph);
        block.push(Element::Text {
            text: "Built and operated the billing platform for three regions ".repeat(3),
            style: style(),
            indent_px: 0.0,
        });
        assert!(measurer.extent(&block, 150.0) > measurer.extent(&block, 600.0));
    }

    #[test]
    fn test_chips_flow_into_rows() {
        let measurer = ready_measurer();
        let items: Vec<String> = ["Rust", "Go", "Kubernetes", "PostgreSQL", "Kafka"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut block = ContentBlock::new("s", SectionTag::Skills, BlockKind::SkillGroup);
        block.push(Element::Chips {
            items,
            style: style(),
            padding_x: 6.0,
            chip_height: 20.0,
            gap: 4.0,
        });
        let one_row = measurer.extent(&block, 2000.0);
        let many_rows = measurer.extent(&block, 40.0);
        assert!((one_row - 20.0).abs() < 1e-4);
        // every chip on its own row: 5 * 20 + 4 * 4
        assert!((many_rows - 116.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_chips_have_no_height() {
        let measurer = ready_measurer();
        let mut block = ContentBlock::new("s", SectionTag::Skills, BlockKind::SkillGroup);
        block.push(Element::Chips {
            items: vec![" ".to_string()],
            style: style(),
            padding_x: 6.0,
            chip_height: 20.0,
            gap: 4.0,
        });
        assert_eq!(measurer.extent(&block, 200.0), 0.0);
    }

    #[test]
    fn test_fixed_elements_add_up() {
        let measurer = ready_measurer();
        let mut block = ContentBlock::new("c", SectionTag::Contact, BlockKind::Entry);
        block.push(Element::Image {
            url: "https://cdn.example/avatar.png".to_string(),
            height: 96.0,
        });
        block.push(Element::Spacer { height: 8.0 });
        assert!((measurer.extent(&block, 200.0) - 104.0).abs() < 1e-4);
    }
}
