use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::buffer::{Color, PixelBuffer, Point};
use crate::draw::{Brush, DrawOp, Shape};
use crate::error::Result;
use crate::filters::{Filter, Levels};

/// One step of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Draw(DrawOp),
    Filter(Filter),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Draw(op) => op.name(),
            Step::Filter(f) => f.name(),
        }
    }
}

impl From<DrawOp> for Step {
    fn from(op: DrawOp) -> Self {
        Step::Draw(op)
    }
}

impl From<Filter> for Step {
    fn from(filter: Filter) -> Self {
        Step::Filter(filter)
    }
}

fn default_background() -> Color {
    Color::WHITE
}

/// A canvas plus the ordered drawing and filter steps applied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: Color,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            background: default_background(),
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: impl Into<Step>) {
        self.steps.push(step.into());
    }

    pub fn with(mut self, step: impl Into<Step>) -> Self {
        self.push(step);
        self
    }

    /// Blank starting canvas
    pub fn canvas(&self) -> Result<PixelBuffer> {
        PixelBuffer::filled(self.width, self.height, self.background)
    }

    /// Run every step on a fresh canvas
    pub fn run(&self) -> Result<PixelBuffer> {
        self.run_on(self.canvas()?)
    }

    /// Run every step starting from `buffer`
    pub fn run_on(&self, mut buffer: PixelBuffer) -> Result<PixelBuffer> {
        info!("recipe '{}': {} steps", self.name, self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            debug!("step {} ({})", i, step.name());
            buffer = match step {
                Step::Draw(op) => {
                    op.apply(&mut buffer)?;
                    buffer
                }
                Step::Filter(filter) => filter.apply(&buffer)?,
            };
        }
        Ok(buffer)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save recipe to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load recipe from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Built-in sample: a filled star, an outline and a few filters
    pub fn demo() -> Self {
        let red = Brush::new(Color::rgb(200, 30, 40), 1);
        let blue = Brush::new(Color::rgb(20, 60, 220), 3);
        Recipe::new("demo", 240, 180)
            .with(DrawOp::Star {
                center: Point::new(120, 90),
                shape: Shape::default(),
                brush: red,
            })
            .with(DrawOp::Fill {
                seed: Point::new(120, 90),
                color: Color::rgb(250, 200, 40),
            })
            .with(DrawOp::Polygon {
                center: Point::new(120, 90),
                shape: Shape {
                    vertices: 6,
                    radius: 85.0,
                    rotation_deg: 30.0,
                },
                brush: blue,
            })
            .with(DrawOp::Line {
                from: Point::new(0, 179),
                to: Point::new(239, 0),
                brush: Brush::eraser(5),
            })
            .with(Filter::Blur { size: 3 })
            .with(Filter::Twirl { degrees: 60.0 })
            .with(Filter::OrderedDither {
                levels: Levels::uniform(4),
                matrix_size: None,
            })
    }
}

impl Default for Recipe {
    fn default() -> Self {
        Self::new("untitled", 640, 480)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_minimal_recipe() {
        let recipe = Recipe::from_json(
            r#"{
                "name": "tiny",
                "width": 3,
                "height": 2,
                "steps": [
                    {"draw": {"op": "line", "from": {"x": 0, "y": 0}, "to": {"x": 2, "y": 0}}},
                    {"filter": {"op": "inverse"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(recipe.background, Color::WHITE);
        assert_eq!(recipe.steps.len(), 2);

        let out = recipe.run().unwrap();
        // Black line inverted to white, white background inverted to black
        for x in 0..3 {
            assert_eq!(out.at(x, 0), Color::WHITE);
            assert_eq!(out.at(x, 1), Color::BLACK);
        }
    }

    #[test]
    fn test_step_tags() {
        let step = Step::from(Filter::Sharpen);
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["filter"]["op"], "sharpen");
        assert_eq!(step.name(), "sharpen");
    }

    #[test]
    fn test_failing_step_aborts_run() {
        let recipe = Recipe::new("bad", 4, 4).with(Filter::Blur { size: 4 });
        assert!(matches!(recipe.run(), Err(Error::InvalidKernel(_))));
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let recipe = Recipe::new("empty", 0, 4);
        assert!(matches!(recipe.canvas(), Err(Error::EmptyBuffer { .. })));
    }

    #[test]
    fn test_bad_json_is_reported() {
        assert!(matches!(Recipe::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_demo_runs() {
        let recipe = Recipe::demo();
        let out = recipe.run().unwrap();
        assert_eq!((out.width(), out.height()), (recipe.width, recipe.height));
    }
}
