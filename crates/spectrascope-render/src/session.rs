//! Chart session
//!
//! A session encapsulates:
//! - The selection store shared by every chart
//! - The color configuration and the current color context
//! - The registered charts, each with its own gesture controller
//! - Frame scheduling
//!
//! Colors are resolved once per frame for each encoding some chart needs,
//! and the same results are fanned out to every chart using that encoding.

use std::collections::BTreeMap;

use spectrascope_core::{
    ColorContext, ColorEncoding, ColorResolver, ColorResult, GlobalColorConfig, LegendEntry,
    Viewport,
};
use spectrascope_selection::{PointerEvent, PointerOutcome, SelectionController, SelectionStore};
use tracing::{debug, info};

use crate::adapter::RendererAdapter;
use crate::error::{RenderError, RenderResult};
use crate::scheduler::{Frame, FrameScheduler, RepaintReason};

struct Chart {
    adapter: Box<dyn RendererAdapter>,
    controller: SelectionController,
}

/// Linked charts over one dataset
pub struct ChartSession {
    store: SelectionStore,
    scheduler: FrameScheduler,
    color_config: GlobalColorConfig,
    context: ColorContext,
    charts: BTreeMap<String, Chart>,
    symbolic: Vec<ColorResult>,
    gpu: Vec<ColorResult>,
}

impl ChartSession {
    /// Create a session for the dataset described by `context`
    pub fn new(context: ColorContext, color_config: GlobalColorConfig) -> RenderResult<Self> {
        color_config.validate()?;
        let scheduler = FrameScheduler::new();
        let mut store = SelectionStore::new(context.sample_count);

        let requester = scheduler.requester();
        store.subscribe(move |_, change| {
            if let Some(reason) = RepaintReason::for_selection_change(change) {
                requester.request(reason);
            }
        });
        scheduler.request(RepaintReason::Data);

        info!(
            samples = context.sample_count,
            mode = color_config.mode.name(),
            "chart session created"
        );
        Ok(Self {
            store,
            scheduler,
            color_config,
            context,
            charts: BTreeMap::new(),
            symbolic: Vec::new(),
            gpu: Vec::new(),
        })
    }

    // MARK: - Charts

    /// Register a chart; its samples must match the dataset
    pub fn add_chart(
        &mut self,
        id: impl Into<String>,
        adapter: Box<dyn RendererAdapter>,
    ) -> RenderResult<()> {
        let id = id.into();
        if self.charts.contains_key(&id) {
            return Err(RenderError::DuplicateChart { id });
        }
        if adapter.sample_count() != self.context.sample_count {
            return Err(RenderError::FrameMismatch {
                expected: self.context.sample_count,
                actual: adapter.sample_count(),
            });
        }

        let controller = SelectionController::new(adapter.viewport())?;
        debug!(chart = %id, backend = adapter.backend().name(), "chart added");
        self.charts.insert(id, Chart { adapter, controller });
        self.scheduler.request(RepaintReason::Data);
        Ok(())
    }

    pub fn remove_chart(&mut self, id: &str) -> RenderResult<Box<dyn RendererAdapter>> {
        let chart = self.charts.remove(id).ok_or_else(|| unknown(id))?;
        Ok(chart.adapter)
    }

    pub fn chart(&self, id: &str) -> RenderResult<&dyn RendererAdapter> {
        self.charts
            .get(id)
            .map(|c| c.adapter.as_ref())
            .ok_or_else(|| unknown(id))
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    pub fn set_viewport(&mut self, id: &str, viewport: Viewport) -> RenderResult<()> {
        let chart = self.charts.get_mut(id).ok_or_else(|| unknown(id))?;
        chart.adapter.set_viewport(viewport)?;
        chart.controller.set_viewport(viewport)?;
        self.scheduler.request(RepaintReason::Viewport);
        Ok(())
    }

    // MARK: - Input

    /// Route a pointer event from one chart through its gesture controller
    pub fn handle_pointer(
        &mut self,
        id: &str,
        event: &PointerEvent,
    ) -> RenderResult<Option<PointerOutcome>> {
        let chart = self.charts.get_mut(id).ok_or_else(|| unknown(id))?;
        Ok(chart
            .controller
            .handle_pointer(event, &mut self.store, chart.adapter.as_ref()))
    }

    // MARK: - Selection and color state

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Selection mutation API for toolbars and saved selections
    pub fn store_mut(&mut self) -> &mut SelectionStore {
        &mut self.store
    }

    pub fn color_config(&self) -> &GlobalColorConfig {
        &self.color_config
    }

    pub fn set_color_config(&mut self, config: GlobalColorConfig) -> RenderResult<()> {
        config.validate()?;
        self.color_config = config;
        self.scheduler.request(RepaintReason::Colors);
        Ok(())
    }

    pub fn context(&self) -> &ColorContext {
        &self.context
    }

    /// Swap in a rebuilt context for the same dataset
    pub fn set_context(&mut self, context: ColorContext) -> RenderResult<()> {
        if context.sample_count != self.context.sample_count {
            return Err(RenderError::FrameMismatch {
                expected: self.context.sample_count,
                actual: context.sample_count,
            });
        }
        self.context = context;
        self.scheduler.request(RepaintReason::Colors);
        Ok(())
    }

    /// Switch to a different dataset: charts are dropped and selection cleared
    pub fn replace_dataset(&mut self, context: ColorContext) {
        info!(samples = context.sample_count, "dataset replaced");
        self.charts.clear();
        self.symbolic.clear();
        self.gpu.clear();
        self.store.set_sample_count(context.sample_count);
        self.context = context;
        self.scheduler.request(RepaintReason::Data);
    }

    /// Legend for the active color mode
    pub fn legend(&self, encoding: ColorEncoding) -> Vec<LegendEntry> {
        ColorResolver::new(&self.color_config, &self.context).legend(encoding)
    }

    /// Colors of the last frame in one encoding
    pub fn frame_colors(&self, encoding: ColorEncoding) -> &[ColorResult] {
        match encoding {
            ColorEncoding::Symbolic => &self.symbolic,
            ColorEncoding::GpuSafe => &self.gpu,
        }
    }

    // MARK: - Frames

    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn frame_count(&self) -> u64 {
        self.scheduler.frame_count()
    }

    /// Render the pending frame, if any; call once per animation tick
    ///
    /// Colors observe the store as it stands now, after every mutation since
    /// the last frame has been applied.
    pub fn render_frame(&mut self) -> RenderResult<Option<Frame>> {
        let Some(frame) = self.scheduler.begin_frame() else {
            return Ok(None);
        };

        let n = self.context.sample_count;
        let wants = |encoding: ColorEncoding| {
            self.charts
                .values()
                .any(|c| c.adapter.encoding() == encoding)
        };
        let want_symbolic = wants(ColorEncoding::Symbolic);
        let want_gpu = wants(ColorEncoding::GpuSafe);
        let stale = |cached: &[ColorResult], wanted: bool| wanted && cached.len() != n;

        if frame.reason.needs_colors()
            || stale(&self.symbolic, want_symbolic)
            || stale(&self.gpu, want_gpu)
        {
            self.context.sync_selection(
                self.store.selected().clone(),
                self.store.pinned().clone(),
                self.store.hovered(),
            );
            let resolver = ColorResolver::new(&self.color_config, &self.context);
            self.symbolic = if want_symbolic {
                resolver.resolve_all(ColorEncoding::Symbolic)
            } else {
                Vec::new()
            };
            self.gpu = if want_gpu {
                resolver.resolve_all(ColorEncoding::GpuSafe)
            } else {
                Vec::new()
            };
        }

        for chart in self.charts.values_mut() {
            let colors = match chart.adapter.encoding() {
                ColorEncoding::Symbolic => &self.symbolic,
                ColorEncoding::GpuSafe => &self.gpu,
            };
            chart.adapter.paint(colors)?;
        }

        debug!(
            frame = frame.number,
            reason = ?frame.reason,
            charts = self.charts.len(),
            revision = self.store.revision(),
            "frame painted"
        );
        Ok(Some(frame))
    }
}

fn unknown(id: &str) -> RenderError {
    RenderError::UnknownChart { id: id.to_string() }
}

#[cfg(test)]
mod tests {
    use spectrascope_core::{ColorMode, Point2};
    use spectrascope_selection::{Modifiers, SelectMode};

    use super::*;
    use crate::config::RenderConfig;
    use crate::vector::VectorAdapter;

    fn session() -> ChartSession {
        let context = ColorContext::new(3);
        let mut session =
            ChartSession::new(context, GlobalColorConfig::new(ColorMode::Selection)).unwrap();
        let points = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0), Point2::new(10.0, 10.0)];
        let adapter =
            VectorAdapter::new(points, Viewport::new(100.0, 100.0), RenderConfig::default())
                .unwrap();
        session.add_chart("pca", Box::new(adapter)).unwrap();
        session
    }

    #[test]
    fn test_duplicate_and_unknown_charts() {
        let mut s = session();
        let points = vec![Point2::new(0.0, 0.0); 3];
        let again =
            VectorAdapter::new(points, Viewport::new(10.0, 10.0), RenderConfig::default())
                .unwrap();
        assert!(matches!(
            s.add_chart("pca", Box::new(again)),
            Err(RenderError::DuplicateChart { .. })
        ));
        assert!(matches!(s.chart("umap"), Err(RenderError::UnknownChart { .. })));
    }

    #[test]
    fn test_sample_count_must_match() {
        let mut s = session();
        let short = VectorAdapter::new(
            vec![Point2::new(0.0, 0.0)],
            Viewport::new(10.0, 10.0),
            RenderConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            s.add_chart("short", Box::new(short)),
            Err(RenderError::FrameMismatch { expected: 3, actual: 1 })
        ));
    }

    #[test]
    fn test_mutations_coalesce_into_one_frame() {
        let mut s = session();
        s.render_frame().unwrap();
        assert!(!s.needs_frame());

        s.store_mut().select([0], SelectMode::Replace);
        s.store_mut().select([1], SelectMode::Add);
        s.store_mut().pin([2]);
        let frame = s.render_frame().unwrap().unwrap();
        assert_eq!(frame.coalesced, 3);
        assert_eq!(s.render_frame().unwrap(), None);
        assert_eq!(s.frame_count(), 2);
    }

    #[test]
    fn test_tool_change_needs_no_frame() {
        let mut s = session();
        s.render_frame().unwrap();
        s.store_mut().set_tool_mode(spectrascope_selection::ToolMode::Lasso);
        assert!(!s.needs_frame());
    }

    #[test]
    fn test_click_through_session_reaches_colors() {
        let mut s = session();
        s.render_frame().unwrap();
        let at = Point2::new(50.0, 50.0);
        s.handle_pointer("pca", &PointerEvent::press(at, Modifiers::new())).unwrap();
        s.handle_pointer("pca", &PointerEvent::release(at, Modifiers::new())).unwrap();
        assert!(s.store().state().is_selected(1));

        s.render_frame().unwrap();
        let colors = s.frame_colors(ColorEncoding::Symbolic);
        assert_eq!(colors[1].opacity, 1.0);
        assert!(colors[0].opacity < 1.0);
        assert!(s.frame_colors(ColorEncoding::GpuSafe).is_empty());
    }

    #[test]
    fn test_replace_dataset_resets() {
        let mut s = session();
        s.store_mut().select([1], SelectMode::Replace);
        s.replace_dataset(ColorContext::new(10));
        assert!(s.store().selected().is_empty());
        assert_eq!(s.chart_ids().count(), 0);
        assert_eq!(s.store().sample_count(), 10);
    }
}
