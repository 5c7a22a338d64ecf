//! GTK4 host for a gallery drawn through [`CairoCanvas`].
//!
//! The host owns the widgets the browser would otherwise provide: the drawing
//! area, the navigation menu, the per-chart controls (company select, year
//! range) and the data table. Every chart draws into its own off-screen
//! surface, which is painted scaled to the drawing area's allocation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::{trace, warn};

use crate::api::{ChartEvent, ChartId, DataTable, FrameLoop, Gallery, HostElement};
use crate::core::Cartesian;
use crate::error::ChartResult;
use crate::interaction::DisplayRect;
use crate::render::CairoCanvas;

pub type SharedGallery = Rc<RefCell<Gallery<CairoCanvas>>>;

/// Widget tree hosting a gallery.
pub struct GtkGalleryHost {
    gallery: SharedGallery,
    root: gtk::Box,
    drawing_area: gtk::DrawingArea,
    navigation: gtk::Box,
    controls: gtk::Box,
    table: gtk::Expander,
}

impl GtkGalleryHost {
    /// Builds the widgets, activates `initial` and starts the frame loop.
    pub fn new(gallery: Gallery<CairoCanvas>, initial: ChartId) -> ChartResult<Rc<Self>> {
        let gallery = Rc::new(RefCell::new(gallery));
        gallery.borrow_mut().activate(initial)?;

        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);
        drawing_area.set_focusable(true);

        let navigation = gtk::Box::new(gtk::Orientation::Vertical, 4);
        let controls = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let table = gtk::Expander::new(None);
        let toggle = gtk::Button::with_label("Charts");

        let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
        content.append(&drawing_area);
        content.append(&controls);
        content.append(&table);

        let sidebar = gtk::Box::new(gtk::Orientation::Vertical, 8);
        sidebar.append(&toggle);
        sidebar.append(&navigation);
        navigation.set_visible(gallery.borrow().is_navigation_open());

        let root = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        root.append(&sidebar);
        root.append(&content);

        let host = Rc::new(Self {
            gallery,
            root,
            drawing_area,
            navigation,
            controls,
            table,
        });

        toggle.connect_clicked({
            let host = Rc::clone(&host);
            move |_| {
                if let Ok(mut gallery) = host.gallery.try_borrow_mut() {
                    let open = gallery.toggle_navigation();
                    host.navigation.set_visible(open);
                }
            }
        });

        host.attach_draw_func();
        host.attach_pointer();
        host.attach_frame_clock();
        host.rebuild_chrome();
        Ok(host)
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    #[must_use]
    pub fn gallery(&self) -> SharedGallery {
        Rc::clone(&self.gallery)
    }

    fn attach_draw_func(&self) {
        let gallery = Rc::clone(&self.gallery);
        let last_scale = Cell::new(f64::NAN);
        self.drawing_area.set_draw_func(move |_area, context, width, height| {
            if width <= 0 || height <= 0 {
                return;
            }
            let Ok(mut gallery) = gallery.try_borrow_mut() else {
                return;
            };
            let Some(chart) = gallery.active_chart_mut() else {
                return;
            };
            let dimensions = chart.dimensions();
            let display_scale = f64::from(width) / dimensions.width;
            if last_scale.replace(display_scale) != display_scale
                && let Err(err) = chart.dispatch(ChartEvent::Resized { display_scale })
            {
                warn!(%err, "resize event failed");
            }

            let scale = display_scale.min(f64::from(height) / dimensions.height);
            context.scale(scale, scale);
            let painted = context
                .set_source_surface(chart.canvas().surface(), 0.0, 0.0)
                .and_then(|()| context.paint());
            if let Err(err) = painted {
                warn!(%err, "failed to paint chart surface");
            }
        });
    }

    fn attach_pointer(&self) {
        let motion = gtk::EventControllerMotion::new();
        {
            let gallery = Rc::clone(&self.gallery);
            let drawing_area = self.drawing_area.clone();
            motion.connect_motion(move |_, x, y| {
                let Ok(mut gallery) = gallery.try_borrow_mut() else {
                    return;
                };
                if let Some(chart) = gallery.active_chart_mut() {
                    let display = fitted_rect(&drawing_area, chart.dimensions().width, chart.dimensions().height);
                    chart.pointer_move(Cartesian::new(x, y), display);
                }
            });
        }
        {
            let gallery = Rc::clone(&self.gallery);
            motion.connect_leave(move |_| {
                if let Ok(mut gallery) = gallery.try_borrow_mut()
                    && let Some(chart) = gallery.active_chart_mut()
                {
                    chart.pointer_leave();
                }
            });
        }
        self.drawing_area.add_controller(motion);
    }

    fn attach_frame_clock(&self) {
        let gallery = Rc::clone(&self.gallery);
        let frame_loop = Rc::new(RefCell::new(FrameLoop::new()));
        frame_loop.borrow_mut().start();
        self.drawing_area.add_tick_callback(move |area, clock| {
            // Frame time is in microseconds.
            let timestamp = clock.frame_time() as f64 / 1000.0;
            if let Ok(mut gallery) = gallery.try_borrow_mut() {
                match frame_loop.borrow_mut().tick(timestamp, &mut gallery) {
                    Ok(dt) => trace!(?dt, "gallery frame"),
                    Err(err) => {
                        warn!(%err, "chart draw failed, stopping the frame loop");
                        return gtk::glib::ControlFlow::Break;
                    }
                }
            }
            area.queue_draw();
            gtk::glib::ControlFlow::Continue
        });
    }

    /// Rebuilds the menu, the controls and the table for the active chart.
    fn rebuild_chrome(self: &Rc<Self>) {
        clear_children(&self.navigation);
        clear_children(&self.controls);

        let Ok(gallery) = self.gallery.try_borrow() else {
            return;
        };
        for entry in gallery.menu() {
            let button = gtk::ToggleButton::with_label(&entry.label);
            button.set_active(entry.selected);
            let host = Rc::clone(self);
            button.connect_clicked(move |_| host.activate(entry.id));
            self.navigation.append(&button);
        }

        let Some(chart) = gallery.active_chart() else {
            return;
        };
        for element in chart.elements().iter() {
            match element {
                HostElement::Select(select) => {
                    let options: Vec<&str> = select.options().iter().map(String::as_str).collect();
                    let dropdown = gtk::DropDown::from_strings(&options);
                    dropdown.set_selected(select.selected_index() as u32);
                    let gallery = Rc::clone(&self.gallery);
                    dropdown.connect_selected_notify(move |dropdown| {
                        let index = dropdown.selected() as usize;
                        dispatch(&gallery, ChartEvent::SelectionChanged { index });
                    });
                    self.controls.append(&dropdown);
                }
                HostElement::RangeSlider(slider) => {
                    let (min, max) = slider.bounds();
                    let [start, end] = slider.get();
                    let start_scale = year_scale(min, max, slider.step(), start);
                    let end_scale = year_scale(min, max, slider.step(), end);
                    for scale in [&start_scale, &end_scale] {
                        let gallery = Rc::clone(&self.gallery);
                        let (start_scale, end_scale) = (start_scale.clone(), end_scale.clone());
                        scale.connect_value_changed(move |_| {
                            let event = ChartEvent::RangeChanged {
                                start: start_scale.value(),
                                end: end_scale.value(),
                            };
                            if let Some([start, end]) = dispatch(&gallery, event) {
                                start_scale.set_value(start);
                                end_scale.set_value(end);
                            }
                        });
                    }
                    self.controls.append(&start_scale);
                    self.controls.append(&end_scale);
                }
                HostElement::Canvas(_) | HostElement::DataTable(_) => {}
            }
        }
        if let Some(table) = chart.data_table() {
            fill_table(&self.table, table);
        }
    }

    fn activate(self: &Rc<Self>, id: ChartId) {
        let activated = self
            .gallery
            .try_borrow_mut()
            .map(|mut gallery| gallery.select_from_menu(id));
        match activated {
            Ok(Ok(())) => self.rebuild_chrome(),
            Ok(Err(err)) => warn!(%id, %err, "failed to activate chart"),
            Err(_) => warn!(%id, "gallery busy, ignoring menu selection"),
        }
    }
}

/// Sends `event` to the active chart and returns the slider values it
/// settled on, if the chart has a slider.
fn dispatch(gallery: &SharedGallery, event: ChartEvent) -> Option<[f64; 2]> {
    let mut gallery = gallery.try_borrow_mut().ok()?;
    let chart = gallery.active_chart_mut()?;
    if let Err(err) = chart.dispatch(event) {
        warn!(%err, ?event, "chart event failed");
    }
    chart.elements().slider().map(|slider| slider.get())
}

fn year_scale(min: f64, max: f64, step: f64, value: f64) -> gtk::Scale {
    let scale = gtk::Scale::with_range(gtk::Orientation::Horizontal, min, max, step);
    scale.set_value(value);
    scale.set_digits(0);
    scale.set_draw_value(true);
    scale.set_hexpand(true);
    scale
}

fn fill_table(expander: &gtk::Expander, table: &DataTable) {
    expander.set_label(Some(table.summary.as_str()));
    let grid = gtk::Grid::new();
    grid.set_column_spacing(16);
    grid.set_row_spacing(4);
    for (column, header) in table.headers.iter().enumerate() {
        let label = gtk::Label::new(None);
        label.set_markup(&format!("<b>{}</b>", gtk::glib::markup_escape_text(header)));
        grid.attach(&label, column as i32, 0, 1, 1);
    }
    for (row, cells) in table.rows.iter().enumerate() {
        for (column, cell) in cells.iter().enumerate() {
            let label = gtk::Label::new(Some(cell.as_str()));
            label.set_xalign(0.0);
            grid.attach(&label, column as i32, row as i32 + 1, 1, 1);
        }
    }
    let scroller = gtk::ScrolledWindow::new();
    scroller.set_min_content_height(200);
    scroller.set_child(Some(&grid));
    expander.set_child(Some(&scroller));
}

fn clear_children(container: &gtk::Box) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }
}

/// Where the chart surface ends up inside `area` once scaled to fit.
fn fitted_rect(area: &gtk::DrawingArea, width: f64, height: f64) -> DisplayRect {
    let area_width = f64::from(area.width());
    let area_height = f64::from(area.height());
    let scale = (area_width / width).min(area_height / height);
    DisplayRect::new(0.0, 0.0, width * scale, height * scale)
}
