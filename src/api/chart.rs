use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::{
    ChartBehavior, ChartElements, ChartEvent, ChartId, DataTable, DrawContext, Environment,
    HookContext, HostElement,
};
use crate::core::layout::title_font;
use crate::core::{
    AnimationClock, Cartesian, ChartTitle, CsvTable, DEFAULT_TITLE_FONT_SIZE, Dimensions, Layout,
    Margins, Theme, ThemeColor, compute_layout,
};
use crate::error::ChartResult;
use crate::interaction::{DisplayRect, PointerTracker, TooltipController, TooltipState};
use crate::render::{Canvas, Paint, TextBaseline, TextHAlign};

/// Static description of a chart: its menu name, title and plot insets.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub name: String,
    pub title: ChartTitle,
    pub margins: Margins,
    pub title_font_size: f64,
    /// Animation step in milliseconds before reduced motion is applied.
    pub animation_cycle_ms: f64,
}

impl ChartOptions {
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<ChartTitle>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            margins: Margins::default(),
            title_font_size: DEFAULT_TITLE_FONT_SIZE,
            animation_cycle_ms: 40.0,
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_title_font_size(mut self, size_px: f64) -> Self {
        self.title_font_size = size_px;
        self
    }

    #[must_use]
    pub fn with_animation_cycle_ms(mut self, cycle_ms: f64) -> Self {
        self.animation_cycle_ms = cycle_ms;
        self
    }
}

/// Where a chart is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartLifecycle {
    Constructed,
    Preloaded,
    Active,
    Inactive,
}

/// One chart: a canvas, its data, and the behavior that draws it.
///
/// The engine owns everything the behavior should not have to manage itself:
/// layout, the title, pointer tracking, the animation clock, the tooltip and
/// the host elements mounted while the chart is active.
pub struct Chart<C: Canvas> {
    canvas: C,
    options: ChartOptions,
    data: CsvTable,
    behavior: Box<dyn ChartBehavior>,
    env: Rc<dyn Environment>,
    theme: Rc<Theme>,
    dimensions: Dimensions,
    layout: Layout,
    pointer: PointerTracker,
    clock: AnimationClock,
    tooltip: TooltipController,
    elements: ChartElements,
    lifecycle: ChartLifecycle,
    id: Option<ChartId>,
}

impl<C: Canvas> Chart<C> {
    /// Creates a chart and computes its layout from the canvas size, the
    /// margins and the measured title.
    pub fn new(
        mut canvas: C,
        options: ChartOptions,
        data: CsvTable,
        behavior: Box<dyn ChartBehavior>,
        env: Rc<dyn Environment>,
        theme: Rc<Theme>,
    ) -> ChartResult<Self> {
        let dimensions = Dimensions::new(canvas.width(), canvas.height());
        let layout = compute_layout(
            &mut canvas,
            dimensions,
            options.margins,
            &options.title,
            options.title_font_size,
        )?;
        debug!(name = %options.name, ?layout, rows = data.row_count(), "chart created");

        Ok(Self {
            canvas,
            data,
            behavior,
            env,
            theme,
            dimensions,
            layout,
            pointer: PointerTracker::new(dimensions, layout),
            clock: AnimationClock::new(),
            tooltip: TooltipController::new(),
            elements: ChartElements::new(dimensions),
            lifecycle: ChartLifecycle::Constructed,
            id: None,
            options,
        })
    }

    /// Builds the accessible table and runs the preload hook. Runs once.
    ///
    /// The table is appended after anything the hook adds, so it is always
    /// the last element.
    pub fn preload(&mut self) -> ChartResult<()> {
        if self.lifecycle != ChartLifecycle::Constructed {
            trace!(name = %self.options.name, "chart already preloaded");
            return Ok(());
        }
        let table = self.behavior.build_table(&self.data)?;
        let (behavior, mut ctx) = self.hook_parts();
        behavior.preload(&mut ctx)?;
        self.elements.push(HostElement::DataTable(table));
        self.lifecycle = ChartLifecycle::Preloaded;
        debug!(name = %self.options.name, elements = self.elements.len(), "chart preloaded");
        Ok(())
    }

    /// Mounts the chart under `id` and starts its animations from zero.
    pub fn setup(&mut self, id: ChartId) -> ChartResult<()> {
        if self.lifecycle == ChartLifecycle::Constructed {
            self.preload()?;
        }
        self.id = Some(id);
        self.elements.mount(id);
        self.pointer.attach_listeners();
        self.tooltip.reset();
        self.clock.reset();

        let (behavior, mut ctx) = self.hook_parts();
        behavior.setup(&mut ctx)?;
        self.lifecycle = ChartLifecycle::Active;
        debug!(name = %self.options.name, %id, "chart set up");
        Ok(())
    }

    /// Unmounts the chart and stops listening for pointer input.
    ///
    /// Safe before `setup`: a chart that is not active only runs the
    /// behavior's destroy hook and keeps its lifecycle state.
    pub fn destroy(&mut self) -> ChartResult<()> {
        let active = self.lifecycle == ChartLifecycle::Active;
        if active {
            self.elements.unmount();
            if self.pointer.is_attached() {
                self.pointer.detach_listeners();
            }
        } else {
            warn!(name = %self.options.name, lifecycle = ?self.lifecycle, "destroying a chart that is not active");
        }
        let (behavior, mut ctx) = self.hook_parts();
        behavior.destroy(&mut ctx)?;
        if active {
            self.lifecycle = ChartLifecycle::Inactive;
            debug!(name = %self.options.name, "chart destroyed");
        }
        Ok(())
    }

    /// Draws one frame `dt` milliseconds after the previous one.
    pub fn draw(&mut self, dt: f64) -> ChartResult<()> {
        self.clock.update(dt);
        self.canvas.clear()?;
        self.draw_title()?;

        // Pending hover targets from the last frame are stale.
        self.tooltip.reset_queue();

        let env = self.env.as_ref();
        let theme = self.theme.as_ref();
        let animation_cycle = if env.prefers_reduced_motion() {
            0.0
        } else {
            self.options.animation_cycle_ms
        };
        let request = {
            let mut ctx = DrawContext {
                canvas: &mut self.canvas,
                dt,
                elapsed_time: self.clock.elapsed_time(),
                animation_cycle,
                layout: self.layout,
                dimensions: self.dimensions,
                pointer: &self.pointer,
                data: &self.data,
                elements: &mut self.elements,
                env,
                theme,
            };
            self.behavior.draw(&mut ctx)?
        };

        match request {
            None => {
                self.tooltip.reset();
                Ok(())
            }
            Some(request) => self.tooltip.draw(
                &mut self.canvas,
                &self.layout,
                &self.clock,
                env,
                theme,
                &request,
            ),
        }
    }

    /// Applies host input to the chart's elements, then hands it to the behavior.
    ///
    /// Events that leave the elements unchanged are not forwarded.
    pub fn dispatch(&mut self, event: ChartEvent) -> ChartResult<()> {
        let changed = match event {
            ChartEvent::SelectionChanged { index } => match self.elements.select_mut() {
                Some(select) => select.select(index)?,
                None => {
                    warn!(name = %self.options.name, index, "selection event for a chart without a select");
                    false
                }
            },
            ChartEvent::RangeChanged { start, end } => match self.elements.slider_mut() {
                Some(slider) => slider.set([start, end]),
                None => {
                    warn!(name = %self.options.name, start, end, "range event for a chart without a slider");
                    false
                }
            },
            ChartEvent::Resized { display_scale } => {
                if let Some(slider) = self.elements.slider_mut() {
                    slider.update_pip_density(display_scale);
                }
                true
            }
        };
        if !changed {
            return Ok(());
        }
        trace!(name = %self.options.name, ?event, "dispatching chart event");
        let (behavior, mut ctx) = self.hook_parts();
        behavior.on_event(event, &mut ctx)
    }

    pub fn pointer_move(&mut self, raw: Cartesian, display: DisplayRect) {
        self.pointer.on_pointer_move(raw, display);
    }

    pub fn pointer_leave(&mut self) {
        self.pointer.on_pointer_leave();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.options.name
    }

    /// Resolves the current title.
    #[must_use]
    pub fn title(&self) -> String {
        self.options.title.resolve()
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    #[must_use]
    pub fn lifecycle(&self) -> ChartLifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn id(&self) -> Option<ChartId> {
        self.id
    }

    #[must_use]
    pub fn elements(&self) -> &ChartElements {
        &self.elements
    }

    #[must_use]
    pub fn data_table(&self) -> Option<&DataTable> {
        self.elements.data_table()
    }

    #[must_use]
    pub fn tooltip_state(&self) -> TooltipState {
        self.tooltip.state()
    }

    #[must_use]
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    #[must_use]
    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    #[must_use]
    pub fn data(&self) -> &CsvTable {
        &self.data
    }

    #[must_use]
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    fn draw_title(&mut self) -> ChartResult<()> {
        let title = self.options.title.resolve();
        let color = self.theme.color(self.env.as_ref(), ThemeColor::Text);
        self.canvas.save();
        self.canvas.set_font(title_font(self.options.title_font_size));
        self.canvas.set_fill(Paint::Solid(color));
        self.canvas.set_text_align(TextHAlign::Center);
        self.canvas.set_text_baseline(TextBaseline::Top);
        let drawn = self.canvas.fill_text(&title, self.layout.center_x(), 0.0);
        self.canvas.restore();
        drawn
    }

    fn hook_parts(&mut self) -> (&mut dyn ChartBehavior, HookContext<'_>) {
        let ctx = HookContext {
            data: &self.data,
            layout: self.layout,
            dimensions: self.dimensions,
            env: self.env.as_ref(),
            theme: self.theme.as_ref(),
            elements: &mut self.elements,
            clock: &mut self.clock,
        };
        (self.behavior.as_mut(), ctx)
    }
}

impl<C: Canvas> std::fmt::Debug for Chart<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("name", &self.options.name)
            .field("layout", &self.layout)
            .field("lifecycle", &self.lifecycle)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::api::StaticEnvironment;
    use crate::interaction::TooltipRequest;
    use crate::render::RecordingCanvas;

    #[derive(Default)]
    struct Journal {
        calls: Vec<&'static str>,
    }

    struct Recorder(Rc<RefCell<Journal>>);

    impl ChartBehavior for Recorder {
        fn draw(&mut self, _ctx: &mut DrawContext<'_>) -> ChartResult<Option<TooltipRequest>> {
            self.0.borrow_mut().calls.push("draw");
            Ok(None)
        }

        fn build_table(&self, _data: &CsvTable) -> ChartResult<DataTable> {
            self.0.borrow_mut().calls.push("build_table");
            Ok(DataTable::new("Show data", "Data"))
        }

        fn preload(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
            self.0.borrow_mut().calls.push("preload");
            Ok(())
        }

        fn setup(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
            self.0.borrow_mut().calls.push("setup");
            Ok(())
        }

        fn destroy(&mut self, _ctx: &mut HookContext<'_>) -> ChartResult<()> {
            self.0.borrow_mut().calls.push("destroy");
            Ok(())
        }
    }

    fn chart(journal: &Rc<RefCell<Journal>>) -> Chart<RecordingCanvas> {
        let canvas = RecordingCanvas::new(400.0, 300.0).expect("canvas");
        let data = CsvTable::parse("year,value\n2000,1\n").expect("data");
        Chart::new(
            canvas,
            ChartOptions::new("Test", "Test chart").with_margins(Margins::uniform(10.0)),
            data,
            Box::new(Recorder(Rc::clone(journal))),
            Rc::new(StaticEnvironment::default()),
            Rc::new(Theme::default()),
        )
        .expect("chart")
    }

    #[test]
    fn lifecycle_runs_hooks_in_order() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut chart = chart(&journal);

        chart.preload().expect("preload");
        chart.preload().expect("preload twice");
        chart.setup(ChartId::new(0)).expect("setup");
        chart.draw(0.0).expect("draw");
        chart.destroy().expect("destroy");

        assert_eq!(
            journal.borrow().calls,
            vec!["build_table", "preload", "setup", "draw", "destroy"]
        );
        assert_eq!(chart.lifecycle(), ChartLifecycle::Inactive);
        assert!(!chart.pointer().is_attached());
    }

    #[test]
    fn table_is_the_last_element() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut chart = chart(&journal);
        chart.preload().expect("preload");
        assert!(matches!(
            chart.elements().iter().last(),
            Some(HostElement::DataTable(_))
        ));
        assert!(matches!(
            chart.elements().iter().next(),
            Some(HostElement::Canvas(_))
        ));
    }

    #[test]
    fn draw_renders_the_title_and_balances_state() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut chart = chart(&journal);
        chart.setup(ChartId::new(1)).expect("setup");
        chart.draw(16.0).expect("draw");

        assert_eq!(chart.clock().elapsed_time(), 16.0);
        assert!(chart.canvas().frame().texts().any(|text| text == "Test chart"));
        assert_eq!(chart.canvas().save_depth(), 0);
    }

    #[test]
    fn setup_resets_the_clock() {
        let journal = Rc::new(RefCell::new(Journal::default()));
        let mut chart = chart(&journal);
        chart.setup(ChartId::new(0)).expect("setup");
        chart.draw(100.0).expect("draw");
        chart.destroy().expect("destroy");
        chart.setup(ChartId::new(0)).expect("setup again");
        assert_eq!(chart.clock().elapsed_time(), 0.0);
    }
}
