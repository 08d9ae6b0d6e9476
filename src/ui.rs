use crate::{
    ColorField, Command, EditorConfig, EditorSession, LabelForm, LabelStyle, Link, LinkForm,
    NodeForm, Shape, ShapeKind, StatusKind,
};
use chrono::Utc;
use egui::{
    epaint::PathShape, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2,
};
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::time::Duration;
use ulid::Ulid;

/// Main application state
pub struct DiagramEditorApp {
    /// Editing session holding the store, ids, view and status
    session: EditorSession,

    /// Input buffers of the side panel forms
    forms: FormState,

    /// Canvas interaction state
    ui_state: UiState,
}

/// Raw form input, kept between frames
struct FormState {
    node: NodeForm,
    node_color: ColorField,

    label: LabelForm,
    label_style: LabelStyle,
    label_color: ColorField,

    link_source: Option<Ulid>,
    link_target: Option<Ulid>,
    link_label: String,
    link_color: ColorField,

    export_dir: String,
}

impl FormState {
    fn new(config: &EditorConfig) -> Self {
        Self {
            node: NodeForm::with_defaults(config),
            node_color: ColorField::new(&config.node.color),
            label: LabelForm::with_defaults(config),
            label_style: LabelStyle::default(),
            label_color: ColorField::new(&config.label.color),
            link_source: None,
            link_target: None,
            link_label: String::new(),
            link_color: ColorField::new(&config.link.color),
            export_dir: ".".to_string(),
        }
    }
}

#[derive(Default)]
struct UiState {
    /// Shape being dragged
    dragging_shape: Option<Ulid>,

    /// Offset from pointer to shape origin when the drag started
    drag_offset: Option<Vec2>,

    /// Shape under the pointer, for the tooltip overlay
    hovered_shape: Option<Ulid>,

    /// Link under the pointer
    hovered_link: Option<Ulid>,
}

impl Default for DiagramEditorApp {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl DiagramEditorApp {
    pub fn new(config: EditorConfig) -> Self {
        let forms = FormState::new(&config);
        Self {
            session: EditorSession::new(config),
            forms,
            ui_state: UiState::default(),
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    // ========== Form submission ==========

    fn submit_node(&mut self) {
        let mut form = self.forms.node.clone();
        form.color = self.forms.node_color.value();

        let status = self.session.execute(Command::AddNode(form));
        if status.kind == StatusKind::Success {
            self.forms.node.text.clear();
            self.forms.node.tooltip.clear();
        }
    }

    fn submit_label(&mut self) {
        let mut form = self.forms.label.clone();
        form.style = self.forms.label_style.as_str().to_string();
        form.color = self.forms.label_color.value();

        let status = self.session.execute(Command::AddLabel(form));
        if status.kind == StatusKind::Success {
            self.forms.label.text.clear();
        }
    }

    fn submit_link(&mut self) {
        let form = LinkForm {
            source: self.forms.link_source,
            target: self.forms.link_target,
            label: self.forms.link_label.clone(),
            color: self.forms.link_color.value(),
        };

        let status = self.session.execute(Command::CreateLink(form));
        if status.kind == StatusKind::Success {
            self.forms.link_label.clear();
        }
    }

    fn export(&mut self) {
        let directory = PathBuf::from(self.forms.export_dir.trim());
        self.session.execute(Command::Export { directory });
    }

    // ========== Panels ==========

    /// Render the entire UI
    fn render_ui(&mut self, ctx: &egui::Context) {
        if let Some(banner) = self.session.banner() {
            let banner = banner.to_string();
            egui::TopBottomPanel::top("error_banner").show(ctx, |ui| {
                ui.colored_label(Color32::from_rgb(200, 40, 40), format!("⚠ {}", banner));
            });
        }

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🔍+ Zoom In").clicked() {
                    self.session.execute(Command::ZoomIn);
                }
                if ui.button("🔍- Zoom Out").clicked() {
                    self.session.execute(Command::ZoomOut);
                }
                if ui.button("⟲ Reset View").clicked() {
                    self.session.execute(Command::ResetView);
                }

                ui.separator();

                ui.label("Export to:");
                let dir_response = ui.add(
                    egui::TextEdit::singleline(&mut self.forms.export_dir).desired_width(160.0),
                );
                if dir_response.changed() {
                    self.session.dismiss_banner();
                }
                // Export stays disabled until the directory is edited
                let can_export = self.session.banner().is_none();
                if ui
                    .add_enabled(can_export, egui::Button::new("📊 Export to Excel"))
                    .clicked()
                {
                    self.export();
                }

                ui.separator();

                let store = self.session.store();
                ui.label(format!("Shapes: {}", store.shape_count()));
                ui.label(format!("Links: {}", store.link_count()));
                ui.label(format!("Zoom: {:.0}%", self.session.view().scale() * 100.0));
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| match self.session.visible_status(Utc::now()) {
                Some(status) => {
                    let color = match status.kind {
                        StatusKind::Success => Color32::from_rgb(46, 125, 50),
                        StatusKind::Warning => Color32::from_rgb(230, 120, 0),
                        StatusKind::Error => Color32::from_rgb(200, 40, 40),
                    };
                    ui.colored_label(color, status.text.as_str());
                }
                None => {
                    ui.label("");
                }
            });
        });

        // Forms
        egui::SidePanel::left("forms_panel")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_node_form(ui);
                    ui.separator();
                    self.render_label_form(ui);
                    ui.separator();
                    self.render_link_form(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });

        // Keep repainting while a status is on screen so it disappears on time
        if self.session.visible_status(Utc::now()).is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn render_node_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add Node");

        ui.label("Label:");
        let text_response = ui.text_edit_singleline(&mut self.forms.node.text);
        ui.label("Notes/Tooltip:");
        ui.text_edit_multiline(&mut self.forms.node.tooltip);

        ui.horizontal(|ui| {
            ui.label("W:");
            ui.add(egui::TextEdit::singleline(&mut self.forms.node.width).desired_width(50.0));
            ui.label("H:");
            ui.add(egui::TextEdit::singleline(&mut self.forms.node.height).desired_width(50.0));
        });

        color_row(ui, "Color:", &mut self.forms.node_color);

        let enter = text_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("➕ Add Node").clicked() || enter {
            self.submit_node();
        }
    }

    fn render_label_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add Label");

        ui.label("Text:");
        let text_response = ui.text_edit_singleline(&mut self.forms.label.text);

        ui.horizontal(|ui| {
            ui.label("Font size:");
            ui.add(egui::TextEdit::singleline(&mut self.forms.label.font_size).desired_width(40.0));
        });

        ui.horizontal(|ui| {
            ui.label("Style:");
            egui::ComboBox::from_id_salt("label_style")
                .selected_text(self.forms.label_style.as_str())
                .show_ui(ui, |ui| {
                    for style in LabelStyle::ALL {
                        ui.selectable_value(&mut self.forms.label_style, style, style.as_str());
                    }
                });
        });

        color_row(ui, "Color:", &mut self.forms.label_color);

        let enter = text_response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("➕ Add Label").clicked() || enter {
            self.submit_label();
        }
    }

    fn render_link_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Create Link");

        // Drop selections whose shape no longer has an option
        let selectors = self.session.selectors();
        for chosen in [&mut self.forms.link_source, &mut self.forms.link_target] {
            if selectors.option_text(*chosen).is_none() {
                *chosen = None;
            }
        }

        ui.label("Source:");
        endpoint_combo(
            ui,
            "link_source",
            selectors.source_options(),
            &mut self.forms.link_source,
        );
        ui.label("Target:");
        endpoint_combo(
            ui,
            "link_target",
            selectors.target_options(),
            &mut self.forms.link_target,
        );

        ui.label("Link label:");
        ui.text_edit_singleline(&mut self.forms.link_label);

        color_row(ui, "Color:", &mut self.forms.link_color);

        if ui.button("🔗 Create Link").clicked() {
            self.submit_link();
        }
    }

    // ========== Canvas ==========

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;

        painter.rect_filled(canvas_rect, 0.0, Color32::from_rgb(250, 250, 250));

        let pointer_canvas = response
            .hover_pos()
            .map(|p| self.screen_to_canvas(p, canvas_rect));

        let hovered_shape = pointer_canvas.and_then(|p| self.shape_at(p));
        let hovered_link = match (hovered_shape, response.hover_pos()) {
            (None, Some(p)) => self.link_at(p, canvas_rect),
            _ => None,
        };
        self.ui_state.hovered_shape = hovered_shape;
        self.ui_state.hovered_link = hovered_link;

        // Start dragging a shape, or pan when the press is on empty space
        if response.drag_started() {
            let pressed = response
                .interact_pointer_pos()
                .map(|p| self.screen_to_canvas(p, canvas_rect));
            if let Some(p) = pressed {
                if let Some(handle) = self.shape_at(p) {
                    if let Some(shape) = self.session.store().get_shape(handle) {
                        self.ui_state.dragging_shape = Some(handle);
                        self.ui_state.drag_offset =
                            Some(vec2(p.x - shape.bounds.x, p.y - shape.bounds.y));
                    }
                }
            }
        }

        if response.dragged() {
            match (self.ui_state.dragging_shape, self.ui_state.drag_offset) {
                (Some(handle), Some(offset)) => {
                    let pointer = response
                        .interact_pointer_pos()
                        .map(|p| self.screen_to_canvas(p, canvas_rect));
                    if let Some(p) = pointer {
                        if let Err(e) = self.session.move_shape(handle, p.x - offset.x, p.y - offset.y)
                        {
                            log::warn!("Drag failed: {:#}", e);
                            self.ui_state.dragging_shape = None;
                        }
                    }
                }
                _ => {
                    let delta = response.drag_delta();
                    self.session.view_mut().pan(delta.x, delta.y);
                }
            }
        }

        if response.drag_stopped() {
            self.ui_state.dragging_shape = None;
            self.ui_state.drag_offset = None;
        }

        // Links under shapes
        let store = self.session.store();
        for link in store.links() {
            self.draw_link(&painter, canvas_rect, link);
        }
        for shape in store.shapes() {
            self.draw_shape(&painter, canvas_rect, shape);
        }

        if store.is_empty() {
            painter.text(
                canvas_rect.center(),
                Align2::CENTER_CENTER,
                "Add a node or label to get started",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
        }

        if let Some(pointer) = response.hover_pos() {
            self.draw_tooltip(&painter, pointer);
        }
    }

    fn draw_shape(&self, painter: &egui::Painter, canvas_rect: Rect, shape: &Shape) {
        let rect = self.canvas_to_screen_rect(shape, canvas_rect);
        let fill = hex_to_color32(&shape.fill_color);
        let highlighted = self.ui_state.hovered_shape == Some(shape.handle)
            || self.ui_state.dragging_shape == Some(shape.handle);
        let stroke = if highlighted {
            Stroke::new(3.0, Color32::from_rgb(255, 193, 7))
        } else {
            Stroke::new(1.5, Color32::from_gray(60))
        };

        match shape.kind {
            ShapeKind::Node => {
                painter.rect(rect, 6.0, fill, stroke);
            }
            ShapeKind::Label { style } => match style {
                LabelStyle::Rectangle => {
                    painter.rect(rect, 2.0, fill, stroke);
                }
                LabelStyle::Circle => {
                    painter.circle(rect.center(), rect.width().min(rect.height()) / 2.0, fill, stroke);
                }
                LabelStyle::Ellipse => {
                    painter.add(PathShape::convex_polygon(ellipse_points(rect), fill, stroke));
                }
                LabelStyle::Cloud => {
                    for (center, radius) in cloud_puffs(rect) {
                        painter.circle(center, radius, fill, stroke);
                    }
                    // Second pass hides the inner outlines
                    for (center, radius) in cloud_puffs(rect) {
                        painter.circle_filled(center, (radius - stroke.width).max(0.0), fill);
                    }
                }
            },
        }

        let scale = self.session.view().scale();
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            &shape.text,
            FontId::proportional(shape.font_size as f32 * scale),
            text_color_for(fill),
        );

        painter.text(
            rect.left_top() + vec2(4.0, 2.0),
            Align2::LEFT_TOP,
            shape.sequential_id.to_string(),
            FontId::monospace(10.0 * scale),
            text_color_for(fill).gamma_multiply(0.7),
        );
    }

    fn draw_link(&self, painter: &egui::Painter, canvas_rect: Rect, link: &Link) {
        let store = self.session.store();
        let (Some(source), Some(target)) = (store.get_shape(link.source), store.get_shape(link.target))
        else {
            return;
        };

        let from_rect = self.canvas_to_screen_rect(source, canvas_rect);
        let to_rect = self.canvas_to_screen_rect(target, canvas_rect);
        let from_center = from_rect.center();
        let to_center = to_rect.center();

        let color = hex_to_color32(&link.color);
        let width = if self.ui_state.hovered_link == Some(link.handle) {
            3.5
        } else {
            2.0
        };
        let stroke = Stroke::new(width, color);

        painter.line_segment([from_center, to_center], stroke);

        // Arrowhead at the target's boundary
        let dir = (to_center - from_center).normalized();
        if dir.is_finite() {
            let perpendicular = vec2(-dir.y, dir.x);
            let arrow_size = 10.0;
            let arrow_tip = to_center - dir * to_rect.width().min(to_rect.height()) * 0.5;

            let arrow_point1 = arrow_tip - dir * arrow_size + perpendicular * arrow_size * 0.5;
            let arrow_point2 = arrow_tip - dir * arrow_size - perpendicular * arrow_size * 0.5;

            painter.add(PathShape::convex_polygon(
                vec![arrow_tip, arrow_point1, arrow_point2],
                color,
                stroke,
            ));
        }

        if let Some(label) = &link.custom_label {
            let mid = from_center + (to_center - from_center) * 0.5;
            painter.text(
                mid + vec2(0.0, -8.0),
                Align2::CENTER_BOTTOM,
                label,
                FontId::proportional(12.0 * self.session.view().scale()),
                Color32::from_gray(40),
            );
        }
    }

    /// Tooltip overlay following the pointer
    fn draw_tooltip(&self, painter: &egui::Painter, pointer: Pos2) {
        let store = self.session.store();
        let text = match (self.ui_state.hovered_shape, self.ui_state.hovered_link) {
            (Some(handle), _) => store.get_shape(handle).map(|s| s.tooltip.as_str()),
            (None, Some(handle)) => store.get_link(handle).map(|l| l.tooltip.as_str()),
            (None, None) => None,
        };
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return;
        };

        let galley = painter.layout_no_wrap(text.to_string(), FontId::proportional(12.0), Color32::WHITE);
        let padding = vec2(6.0, 4.0);
        let rect = Rect::from_min_size(pointer + vec2(14.0, 14.0), galley.size() + padding * 2.0);
        painter.rect_filled(rect, 4.0, Color32::from_black_alpha(220));
        painter.galley(rect.min + padding, galley, Color32::WHITE);
    }

    /// Topmost shape containing a canvas point
    fn shape_at(&self, point: Pos2) -> Option<Ulid> {
        let shapes: Vec<_> = self.session.store().shapes().collect();
        shapes
            .into_iter()
            .rev()
            .find(|s| s.bounds.contains_point(point.x, point.y))
            .map(|s| s.handle)
    }

    /// Link whose segment passes near a screen point
    fn link_at(&self, pointer: Pos2, canvas_rect: Rect) -> Option<Ulid> {
        let store = self.session.store();
        store
            .links()
            .find(|link| {
                let (Some(source), Some(target)) =
                    (store.get_shape(link.source), store.get_shape(link.target))
                else {
                    return false;
                };
                let a = self.canvas_to_screen_rect(source, canvas_rect).center();
                let b = self.canvas_to_screen_rect(target, canvas_rect).center();
                distance_to_segment(pointer, a, b) <= 5.0
            })
            .map(|link| link.handle)
    }

    // ========== Coordinates ==========

    fn canvas_to_screen(&self, pos: Pos2, canvas_rect: Rect) -> Pos2 {
        let (x, y) = self.session.view().to_screen(pos.x, pos.y);
        canvas_rect.left_top() + vec2(x, y)
    }

    fn screen_to_canvas(&self, pos: Pos2, canvas_rect: Rect) -> Pos2 {
        let relative = pos - canvas_rect.left_top();
        let (x, y) = self.session.view().to_canvas(relative.x, relative.y);
        pos2(x, y)
    }

    fn canvas_to_screen_rect(&self, shape: &Shape, canvas_rect: Rect) -> Rect {
        let b = &shape.bounds;
        let top_left = self.canvas_to_screen(pos2(b.x, b.y), canvas_rect);
        let bottom_right = self.canvas_to_screen(pos2(b.right(), b.bottom()), canvas_rect);
        Rect::from_two_pos(top_left, bottom_right)
    }
}

/// Picker plus hex text field for one color input
fn color_row(ui: &mut egui::Ui, label: &str, field: &mut ColorField) {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut rgb = field.rgb();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            field.on_picker_input(rgb);
        }
        let response =
            ui.add(egui::TextEdit::singleline(field.hex_text_mut()).desired_width(70.0));
        if response.changed() {
            field.commit_hex_text();
        }
    });
}

fn endpoint_combo(
    ui: &mut egui::Ui,
    id_salt: &str,
    options: &[crate::SelectorOption],
    chosen: &mut Option<Ulid>,
) {
    let selected_text = options
        .iter()
        .find(|opt| opt.value == *chosen)
        .or_else(|| options.first())
        .map(|opt| opt.text.clone())
        .unwrap_or_default();

    egui::ComboBox::from_id_salt(id_salt)
        .width(220.0)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for option in options {
                ui.add_enabled_ui(!option.disabled, |ui| {
                    ui.selectable_value(chosen, option.value, option.text.as_str());
                });
            }
        });
}

fn hex_to_color32(hex: &str) -> Color32 {
    match crate::color::parse_rgb(hex) {
        Some([r, g, b]) => Color32::from_rgb(r, g, b),
        None => Color32::GRAY,
    }
}

/// Black or white, whichever reads better on `fill`
fn text_color_for(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn ellipse_points(rect: Rect) -> Vec<Pos2> {
    let center = rect.center();
    let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
    (0..48)
        .map(|i| {
            let t = i as f32 / 48.0 * TAU;
            pos2(center.x + rx * t.cos(), center.y + ry * t.sin())
        })
        .collect()
}

/// Overlapping circles approximating a cloud outline
fn cloud_puffs(rect: Rect) -> Vec<(Pos2, f32)> {
    let w = rect.width();
    let h = rect.height();
    let at = |fx: f32, fy: f32| rect.left_top() + vec2(w * fx, h * fy);
    let r = h.min(w) * 0.3;
    vec![
        (at(0.25, 0.6), r),
        (at(0.45, 0.4), r * 1.2),
        (at(0.68, 0.45), r * 1.05),
        (at(0.8, 0.65), r * 0.85),
        (at(0.5, 0.68), r),
    ]
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl eframe::App for DiagramEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_ui(ctx);
    }
}
