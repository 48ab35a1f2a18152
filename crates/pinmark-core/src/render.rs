//! Host-agnostic scene description.
//!
//! The core never paints. Scene builders turn models into a flat list of
//! [`DrawCommand`]s, and the host feeds them to its own [`Renderer`].

use crate::collection::MarkerCollection;
use crate::config::EditorConfig;
use crate::curve::CurveModel;
use crate::marker::Marker;
use kurbo::{BezPath, Circle, Point, Rect, Shape};
use peniko::Color;

/// Width of the stroke around grip squares.
const GRIP_STROKE_WIDTH: f64 = 1.0;
/// Font size of control point labels.
const CONTROL_LABEL_SIZE: f64 = 10.0;
/// Radius of the painted control point disk.
const CONTROL_POINT_DOT_RADIUS: f64 = 9.0;

/// A single paint operation.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        dashed: bool,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
    /// Text centered on `anchor`.
    Text {
        text: String,
        anchor: Point,
        color: Color,
        size: f64,
    },
}

/// Paint backend implemented by the host.
pub trait Renderer {
    fn draw(&mut self, command: &DrawCommand);
}

/// Feed every command to `renderer`, in order.
pub fn render_scene<R: Renderer + ?Sized>(renderer: &mut R, commands: &[DrawCommand]) {
    for command in commands {
        renderer.draw(command);
    }
}

/// Scene for all markers, bottom to top.
pub fn marker_scene(collection: &MarkerCollection, config: &EditorConfig) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    for marker in collection.iter() {
        push_marker(&mut commands, marker, config);
    }
    commands
}

fn push_marker(commands: &mut Vec<DrawCommand>, marker: &Marker, config: &EditorConfig) {
    let colors = &config.colors;
    let rect = marker.rect();
    let kind = marker.kind;

    commands.push(DrawCommand::Fill {
        path: marker.outline(),
        color: colors.marker_fill.into(),
    });

    let anchor = kind.label_anchor(rect);
    let size = kind.label_size();
    if kind.label_plate() {
        let plate = Rect::from_center_size(anchor, (size * 2.0, size * 1.4));
        commands.push(DrawCommand::Fill {
            path: plate.to_path(0.1),
            color: colors.label_plate.into(),
        });
    }
    commands.push(DrawCommand::Text {
        text: marker.number().to_string(),
        anchor,
        color: colors.marker_label.into(),
        size,
    });

    if marker.selected {
        for region in marker.regions().iter() {
            let path = region.rect.to_path(0.1);
            commands.push(DrawCommand::Fill {
                path: path.clone(),
                color: colors.grip_fill.into(),
            });
            commands.push(DrawCommand::Stroke {
                path,
                color: colors.grip_stroke.into(),
                width: GRIP_STROKE_WIDTH,
                dashed: false,
            });
        }
    }
}

/// Scene for a curve: reference outline, sampled curve, then control points.
pub fn curve_scene(model: &CurveModel, config: &EditorConfig) -> Vec<DrawCommand> {
    let colors = &config.colors;
    let mut commands = Vec::with_capacity(2 + model.len() * 2);

    if model.len() > 1 {
        commands.push(DrawCommand::Stroke {
            path: model.outline_path(),
            color: colors.outline.into(),
            width: config.path_width,
            dashed: true,
        });
        commands.push(DrawCommand::Stroke {
            path: model.curve_path(),
            color: colors.curve.into(),
            width: config.path_width,
            dashed: true,
        });
    }

    for point in model.control_points() {
        commands.push(DrawCommand::Fill {
            path: Circle::new(point.position, CONTROL_POINT_DOT_RADIUS).to_path(0.1),
            color: colors.control_point.into(),
        });
        commands.push(DrawCommand::Text {
            text: point.label(),
            anchor: point.position,
            color: colors.control_label.into(),
            size: CONTROL_LABEL_SIZE,
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{MarkerKind, SerializableColor};
    use kurbo::Size;

    #[derive(Default)]
    struct Recorder {
        fills: usize,
        strokes: usize,
        texts: Vec<String>,
    }

    impl Renderer for Recorder {
        fn draw(&mut self, command: &DrawCommand) {
            match command {
                DrawCommand::Fill { .. } => self.fills += 1,
                DrawCommand::Stroke { .. } => self.strokes += 1,
                DrawCommand::Text { text, .. } => self.texts.push(text.clone()),
            }
        }
    }

    #[test]
    fn test_marker_scene_labels_in_order() {
        let mut collection = MarkerCollection::new();
        collection.add_marker(Point::new(0.0, 0.0), Size::new(40.0, 40.0));
        collection.add_marker(Point::new(50.0, 0.0), Size::new(40.0, 40.0));

        let mut recorder = Recorder::default();
        render_scene(&mut recorder, &marker_scene(&collection, &EditorConfig::default()));
        assert_eq!(recorder.texts, vec!["1", "2"]);
        assert_eq!(recorder.fills, 2);
        assert_eq!(recorder.strokes, 0);
    }

    #[test]
    fn test_selected_marker_draws_grips() {
        let mut collection = MarkerCollection::new();
        let id = collection.add_marker(Point::new(0.0, 0.0), Size::new(40.0, 40.0));
        collection.select(id).unwrap();

        let mut recorder = Recorder::default();
        render_scene(&mut recorder, &marker_scene(&collection, &EditorConfig::default()));
        assert_eq!(recorder.fills, 1 + 8);
        assert_eq!(recorder.strokes, 8);
    }

    #[test]
    fn test_label_kind_draws_plate() {
        let mut collection = MarkerCollection::new();
        collection.add_marker_with_kind(Point::ZERO, Size::new(60.0, 30.0), MarkerKind::Label);
        let commands = marker_scene(&collection, &EditorConfig::default());
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[1], DrawCommand::Fill { .. }));
    }

    #[test]
    fn test_curve_scene() {
        let model = CurveModel::from_points(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            0.5,
        );
        let config = EditorConfig::default();
        let commands = curve_scene(&model, &config);

        match &commands[1] {
            DrawCommand::Stroke { color, width, dashed, .. } => {
                assert_eq!(SerializableColor::from(*color), config.colors.curve);
                assert!((*width - 3.0).abs() < f64::EPSILON);
                assert!(*dashed);
            }
            other => panic!("expected curve stroke, got {other:?}"),
        }

        let labels: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_single_point_curve_has_no_paths() {
        let model = CurveModel::from_points(vec![Point::new(1.0, 1.0)], 0.05);
        let commands = curve_scene(&model, &EditorConfig::default());
        assert_eq!(commands.len(), 2);
    }
}
