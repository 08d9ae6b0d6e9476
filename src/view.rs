use crate::config::ViewConfig;

/// Scale and translation of the drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct ViewController {
    scale: f32,
    translate: (f32, f32),
    zoom_in_factor: f32,
    zoom_out_factor: f32,
}

impl ViewController {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            scale: 1.0,
            translate: (0.0, 0.0),
            zoom_in_factor: config.zoom_in_factor,
            zoom_out_factor: config.zoom_out_factor,
        }
    }

    pub fn zoom_in(&mut self) {
        self.scale *= self.zoom_in_factor;
    }

    pub fn zoom_out(&mut self) {
        self.scale *= self.zoom_out_factor;
    }

    /// Back to scale 1 at the origin
    pub fn reset(&mut self) {
        self.translate = (0.0, 0.0);
        self.scale = 1.0;
    }

    /// Shift the view by a screen-space delta
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.translate.0 += dx;
        self.translate.1 += dy;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate(&self) -> (f32, f32) {
        self.translate
    }

    /// Convert canvas coordinates to coordinates relative to the view origin
    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x * self.scale + self.translate.0,
            y * self.scale + self.translate.1,
        )
    }

    /// Inverse of [`ViewController::to_screen`]
    pub fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.translate.0) / self.scale,
            (y - self.translate.1) / self.scale,
        )
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(&ViewConfig::default())
    }
}
