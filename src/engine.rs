//! Composition root: owns geometry, clock, scheduler, the active expression,
//! and the interaction bridge, and exposes the host-facing refresh entry point.

use crate::bridge::InteractionBridge;
use crate::clock::{Clock, increment_for_grid};
use crate::config::EngineConfig;
use crate::expression::compile::EvalScratch;
use crate::expression::slot::{ExpressionSlot, SwapOutcome};
use crate::foundation::core::Canvas;
use crate::foundation::error::{TixelError, TixelResult};
use crate::grid::GridLayout;
use crate::render::frame::{FrameStats, Palette, render_frame};
use crate::render::surface::DotSurface;
use crate::scheduler::{RefreshScheduler, RepeatingTask};
use crate::viewport::Viewport;

/// Work registered with the refresh scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineTask {
    /// Advance animation time.
    ClockTick,
    /// Repaint the surface.
    RenderPass,
}

/// Headless animation engine driven by [`Engine::refresh`].
#[derive(Debug)]
pub struct Engine {
    layout: GridLayout,
    clock: Clock,
    scheduler: RefreshScheduler<EngineTask>,
    clock_task: RepeatingTask<EngineTask>,
    render_task: RepeatingTask<EngineTask>,
    slot: ExpressionSlot,
    bridge: InteractionBridge,
    palette: Palette,
    scratch: EvalScratch,
}

impl Engine {
    /// Build an engine from a validated configuration. The engine starts
    /// stopped; call [`Engine::start`] to arm the refresh tasks.
    #[tracing::instrument(skip(config), fields(grid_size = config.grid_size))]
    pub fn new(config: EngineConfig) -> TixelResult<Self> {
        config.validate()?;
        let canvas = config.canvas()?;
        let layout = GridLayout::new(
            config.grid_size,
            f64::from(canvas.width),
            f64::from(canvas.height),
        )?;

        let mut clock = Clock::for_grid(config.grid_size)?;
        if config.start_paused {
            clock.pause();
        }

        let slot = ExpressionSlot::new(&config.initial_expression).map_err(|r| {
            TixelError::compile(format!(
                "initial expression '{}': {r}",
                config.initial_expression
            ))
        })?;
        let bridge = InteractionBridge::new(
            config.initial_expression.clone(),
            config.preset_library()?,
        );

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            presets = bridge.presets().len(),
            "engine ready"
        );

        Ok(Self {
            layout,
            clock,
            scheduler: RefreshScheduler::new(),
            clock_task: RepeatingTask::new(EngineTask::ClockTick),
            render_task: RepeatingTask::new(EngineTask::RenderPass),
            slot,
            bridge,
            palette: config.palette,
            scratch: EvalScratch::new(),
        })
    }

    /// Arm the clock and render tasks. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        let clock = self.clock_task.start(&mut self.scheduler);
        let render = self.render_task.start(&mut self.scheduler);
        clock || render
    }

    /// Cancel both tasks. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        let clock = self.clock_task.stop(&mut self.scheduler);
        let render = self.render_task.stop(&mut self.scheduler);
        clock || render
    }

    pub fn is_running(&self) -> bool {
        self.clock_task.is_running() || self.render_task.is_running()
    }

    /// One host refresh: run every task due now, in registration order.
    ///
    /// Returns the stats of the render pass, if one ran.
    pub fn refresh<S: DotSurface + ?Sized>(&mut self, surface: &mut S) -> Option<FrameStats> {
        let mut stats = None;
        for (id, task) in self.scheduler.begin_refresh() {
            match task {
                EngineTask::ClockTick => {
                    if self.clock_task.fire(id, &mut self.scheduler) {
                        self.clock.tick();
                    }
                }
                EngineTask::RenderPass => {
                    if self.render_task.fire(id, &mut self.scheduler) {
                        stats = Some(self.paint(surface));
                    }
                }
            }
        }
        stats
    }

    /// Paint the current state immediately, outside the refresh cycle.
    pub fn paint<S: DotSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        render_frame(
            surface,
            self.layout.cells(),
            &self.slot.handle(),
            self.clock.time(),
            self.layout.config().max_radius(),
            &self.palette,
            &mut self.scratch,
        )
    }

    /// Offer new expression text.
    pub fn set_expression(&mut self, text: &str) -> SwapOutcome {
        let source = self.bridge.set_expression(text);
        self.slot.offer(source)
    }

    /// Reset time and offer the next preset.
    pub fn cycle_example(&mut self) -> SwapOutcome {
        let source = self.bridge.cycle_example(&mut self.clock);
        self.slot.offer(source)
    }

    /// Lay the grid out on the canvas derived from `viewport`.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> TixelResult<Canvas> {
        let canvas = viewport.raster_canvas()?;
        self.resize_canvas(f64::from(canvas.width), f64::from(canvas.height))?;
        Ok(canvas)
    }

    /// Lay the grid out on a canvas of the given size.
    pub fn resize_canvas(&mut self, width: f64, height: f64) -> TixelResult<()> {
        self.layout.resize(width, height)
    }

    /// Change cells per side; the clock increment follows.
    pub fn set_grid_size(&mut self, grid_size: u32) -> TixelResult<()> {
        self.layout.set_grid_size(grid_size)?;
        self.clock.set_incr(increment_for_grid(grid_size))
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Current animation time.
    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable clock access, for pause/resume.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Source of the active expression.
    pub fn active_source(&self) -> &str {
        self.slot.active_source()
    }

    /// Text most recently supplied through the bridge, accepted or not.
    pub fn pending_source(&self) -> &str {
        self.bridge.pending()
    }

    /// Successful expression replacements so far.
    pub fn generation(&self) -> u64 {
        self.slot.generation()
    }

    /// Preset index the next cycle loads.
    pub fn cursor(&self) -> usize {
        self.bridge.cursor()
    }

    /// Registrations waiting for the next refresh.
    pub fn pending_refreshes(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn slot(&self) -> &ExpressionSlot {
        &self.slot
    }

    pub fn bridge(&self) -> &InteractionBridge {
        &self.bridge
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
