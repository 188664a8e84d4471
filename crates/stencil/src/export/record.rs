//! Display-list backend.
//!
//! [`RecordingContext`] stores every drawing call as a [`DrawCommand`], in
//! call order. Embedders replay the list onto their own canvas; tests
//! inspect it to check what a renderer drew.

use stencil_core::{
    color::Color,
    draw::{FontSpec, Stroke, TextStyle},
    geometry::{Bounds, Point, Size},
};

use crate::{
    context::{DrawError, RenderContext},
    measure::{HeuristicMeasurer, TextMeasurer},
};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Rectangle {
        bounds: Bounds,
        stroke: Stroke,
    },
    FillRectangle {
        bounds: Bounds,
        color: Color,
    },
    RoundedRectangle {
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        stroke: Stroke,
    },
    FillRoundedRectangle {
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    },
    Ellipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        stroke: Stroke,
    },
    FillEllipse {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    },
    Polygon {
        points: Vec<Point>,
        stroke: Stroke,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Color,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Bezier {
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        stroke: Stroke,
    },
    Arc {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: Stroke,
    },
    Pie {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: Stroke,
    },
    FillPie {
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        color: Color,
    },
    Text {
        text: String,
        position: Point,
        style: TextStyle,
    },
    Image {
        bounds: Bounds,
        data: Vec<u8>,
    },
    SetClip {
        bounds: Bounds,
    },
    ResetClip,
    SaveState,
    RestoreState,
    Translate {
        dx: f32,
        dy: f32,
    },
    Rotate {
        degrees: f32,
    },
    Scale {
        sx: f32,
        sy: f32,
    },
}

impl DrawCommand {
    /// True for calls that put marks on the canvas.
    pub fn is_drawing(&self) -> bool {
        !matches!(
            self,
            Self::SetClip { .. }
                | Self::ResetClip
                | Self::SaveState
                | Self::RestoreState
                | Self::Translate { .. }
                | Self::Rotate { .. }
                | Self::Scale { .. }
        )
    }
}

/// A [`RenderContext`] that records calls instead of drawing.
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    depth: usize,
    clip_depth: usize,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for RecordingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingContext")
            .field("commands", &self.commands.len())
            .field("depth", &self.depth)
            .field("clip_depth", &self.clip_depth)
            .finish_non_exhaustive()
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            depth: 0,
            clip_depth: 0,
            measurer: Box::new(HeuristicMeasurer),
        }
    }

    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current `save_state` nesting.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the recorded commands.
    ///
    /// # Errors
    ///
    /// Returns [`DrawError::Unbalanced`] if a saved state or clip is still
    /// open.
    pub fn finish(self) -> Result<Vec<DrawCommand>, DrawError> {
        let depth = self.depth + self.clip_depth;
        if depth > 0 {
            return Err(DrawError::Unbalanced { depth });
        }
        Ok(self.commands)
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), DrawError> {
        self.commands.push(command);
        Ok(())
    }
}

impl RenderContext for RecordingContext {
    fn clear(&mut self, color: Color) -> Result<(), DrawError> {
        self.record(DrawCommand::Clear { color })
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), DrawError> {
        self.record(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        })
    }

    fn draw_rectangle(&mut self, bounds: Bounds, stroke: &Stroke) -> Result<(), DrawError> {
        self.record(DrawCommand::Rectangle {
            bounds,
            stroke: *stroke,
        })
    }

    fn fill_rectangle(&mut self, bounds: Bounds, color: Color) -> Result<(), DrawError> {
        self.record(DrawCommand::FillRectangle { bounds, color })
    }

    fn draw_rounded_rectangle(
        &mut self,
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::RoundedRectangle {
            bounds,
            radius_x,
            radius_y,
            stroke: *stroke,
        })
    }

    fn fill_rounded_rectangle(
        &mut self,
        bounds: Bounds,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::FillRoundedRectangle {
            bounds,
            radius_x,
            radius_y,
            color,
        })
    }

    fn draw_ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            stroke: *stroke,
        })
    }

    fn fill_ellipse(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::FillEllipse {
            center,
            radius_x,
            radius_y,
            color,
        })
    }

    fn draw_polygon(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), DrawError> {
        self.record(DrawCommand::Polygon {
            points: points.to_vec(),
            stroke: *stroke,
        })
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) -> Result<(), DrawError> {
        self.record(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        })
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: &Stroke) -> Result<(), DrawError> {
        self.record(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke: *stroke,
        })
    }

    fn draw_bezier(
        &mut self,
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::Bezier {
            start,
            control1,
            control2,
            end,
            stroke: *stroke,
        })
    }

    fn draw_arc(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::Arc {
            center,
            radius_x,
            radius_y,
            start_angle,
            sweep_angle,
            stroke: *stroke,
        })
    }

    fn draw_pie(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        stroke: &Stroke,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::Pie {
            center,
            radius_x,
            radius_y,
            start_angle,
            sweep_angle,
            stroke: *stroke,
        })
    }

    fn fill_pie(
        &mut self,
        center: Point,
        radius_x: f32,
        radius_y: f32,
        start_angle: f32,
        sweep_angle: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::FillPie {
            center,
            radius_x,
            radius_y,
            start_angle,
            sweep_angle,
            color,
        })
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Point,
        style: &TextStyle,
    ) -> Result<(), DrawError> {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            position,
            style: style.clone(),
        })
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> Size {
        self.measurer.measure(text, font)
    }

    fn draw_image(&mut self, bounds: Bounds, data: &[u8]) -> Result<(), DrawError> {
        self.record(DrawCommand::Image {
            bounds,
            data: data.to_vec(),
        })
    }

    fn set_clip_rect(&mut self, bounds: Bounds) -> Result<(), DrawError> {
        self.clip_depth += 1;
        self.record(DrawCommand::SetClip { bounds })
    }

    fn reset_clip(&mut self) -> Result<(), DrawError> {
        if self.clip_depth == 0 {
            return Err(DrawError::ResetWithoutClip);
        }
        self.clip_depth -= 1;
        self.record(DrawCommand::ResetClip)
    }

    fn save_state(&mut self) -> Result<(), DrawError> {
        self.depth += 1;
        self.record(DrawCommand::SaveState)
    }

    fn restore_state(&mut self) -> Result<(), DrawError> {
        if self.depth == 0 {
            return Err(DrawError::RestoreWithoutSave);
        }
        self.depth -= 1;
        self.record(DrawCommand::RestoreState)
    }

    fn translate(&mut self, dx: f32, dy: f32) -> Result<(), DrawError> {
        self.record(DrawCommand::Translate { dx, dy })
    }

    fn rotate(&mut self, degrees: f32) -> Result<(), DrawError> {
        self.record(DrawCommand::Rotate { degrees })
    }

    fn scale(&mut self, sx: f32, sy: f32) -> Result<(), DrawError> {
        self.record(DrawCommand::Scale { sx, sy })
    }
}
