//! Headless renderer that logs draw commands.

use kurbo::Shape;
use pinmark_core::render::{DrawCommand, Renderer};
use pinmark_core::shapes::SerializableColor;

/// Counts and logs every command it receives.
#[derive(Debug, Default)]
pub struct LogRenderer {
    pub fills: usize,
    pub strokes: usize,
    pub texts: usize,
    pub frames: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the end of a frame.
    pub fn end_frame(&mut self) {
        self.frames += 1;
        log::debug!(
            "Frame {}: {} fills, {} strokes, {} texts so far",
            self.frames,
            self.fills,
            self.strokes,
            self.texts
        );
    }

    pub fn total(&self) -> usize {
        self.fills + self.strokes + self.texts
    }
}

impl Renderer for LogRenderer {
    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Fill { path, color } => {
                self.fills += 1;
                log::trace!("fill {:?} {:?}", path.bounding_box(), SerializableColor::from(*color));
            }
            DrawCommand::Stroke { path, color, width, dashed } => {
                self.strokes += 1;
                log::trace!(
                    "stroke {:?} {:?} width={} dashed={}",
                    path.bounding_box(),
                    SerializableColor::from(*color),
                    width,
                    dashed
                );
            }
            DrawCommand::Text { text, anchor, size, .. } => {
                self.texts += 1;
                log::trace!("text {:?} at {:?} size={}", text, anchor, size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect};
    use peniko::Color;
    use pinmark_core::render::render_scene;

    #[test]
    fn test_counts_commands() {
        let path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1);
        let commands = vec![
            DrawCommand::Fill { path: path.clone(), color: Color::from_rgba8(0, 0, 255, 255) },
            DrawCommand::Stroke {
                path,
                color: Color::from_rgba8(0, 0, 0, 255),
                width: 3.0,
                dashed: true,
            },
            DrawCommand::Text {
                text: "1".to_string(),
                anchor: Point::new(5.0, 5.0),
                color: Color::from_rgba8(255, 255, 0, 255),
                size: 10.0,
            },
        ];

        let mut renderer = LogRenderer::new();
        render_scene(&mut renderer, &commands);
        renderer.end_frame();

        assert_eq!((renderer.fills, renderer.strokes, renderer.texts), (1, 1, 1));
        assert_eq!(renderer.total(), 3);
        assert_eq!(renderer.frames, 1);
    }
}
