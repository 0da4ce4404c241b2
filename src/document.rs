//! In-memory presentation document model
//!
//! This is the object tree shared by templates and rendered decks: layouts
//! with placeholders and free shapes, slides instantiated from layouts, and
//! the text/table/chart artifacts the renderer appends. Documents round-trip
//! through JSON; binary office formats are out of scope.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A plan referenced a layout index the template does not have
    #[error("layout index {index} out of range ({count} layouts)")]
    LayoutOutOfRange { index: usize, count: usize },
}

/// A rectangle in slide coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Run-level font attributes; absent attributes inherit from the theme
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Hex color without leading '#', e.g. "1a1a1a"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A contiguous span of uniformly formatted text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub font: FontProps,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontProps::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,
}

/// Text content of a placeholder or text box
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextFrame {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// One unformatted paragraph per line of `text`
    pub fn plain(text: &str) -> Self {
        Self {
            paragraphs: text
                .lines()
                .map(|line| Paragraph {
                    runs: vec![Run::plain(line)],
                })
                .collect(),
        }
    }

    /// Concatenated text, paragraphs joined with newlines
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| {
                p.runs
                    .iter()
                    .map(|r| r.text.as_str())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First run of the first paragraph, if any
    pub fn first_run(&self) -> Option<&Run> {
        self.paragraphs.first().and_then(|p| p.runs.first())
    }

    pub fn clear(&mut self) {
        self.paragraphs.clear();
    }
}

/// What a placeholder is for, as authored in the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderRole {
    Title,
    Subtitle,
    Body,
    Date,
    PageNumber,
    #[default]
    Other,
}

/// A fillable slot inherited from a layout
///
/// `idx` is the layout-scoped stable identity: a slide-level instance may
/// carry a drifted `name`, but its `idx` always points back at the defining
/// layout placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub idx: u32,
    pub name: String,
    #[serde(default)]
    pub role: PlaceholderRole,
    #[serde(default)]
    pub text: TextFrame,
}

/// The concrete content of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    TextBox { frame: TextFrame },
    Table { table: Table },
    Chart { chart: Chart },
    /// Embedded media; blob extraction is out of scope
    Picture,
    Group { children: Vec<Shape> },
    Other,
}

/// A free (non-placeholder) shape on a layout or slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub name: String,
    #[serde(default)]
    pub bounds: Bounds,
    pub kind: ShapeKind,
}

/// A rendered table; `cells` is rectangular, short source rows are padded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub style_id: String,
    pub font_size: f64,
    pub header_bold: bool,
    pub cells: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
    Area,
}

/// One named value sequence of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// A rendered chart; `categories` and every series are the same length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub chart_type: ChartType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub legend: bool,
}

/// A template-defined slide pattern
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlideLayout {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// A slide instantiated from a layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub layout_index: usize,
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// A presentation document: layouts plus the slides built on them
///
/// A template is a `Presentation` used read-only; rendering clones it and
/// appends slides, so the original slide list is never mutated.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Presentation {
    pub layouts: Vec<SlideLayout>,
    pub slides: Vec<Slide>,
}

/// Raw mirror used for lenient loading: layouts are decoded one by one so a
/// single malformed layout cannot poison the whole document.
#[derive(Deserialize)]
struct RawPresentation {
    #[serde(default)]
    layouts: Vec<serde_json::Value>,
    #[serde(default)]
    slides: Vec<Slide>,
}

impl Presentation {
    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a document from JSON
    ///
    /// A malformed entry in `layouts` is replaced with an empty layout at the
    /// same position so later layout indices stay valid; a malformed top
    /// level is fatal.
    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        let raw: RawPresentation = serde_json::from_str(content)?;
        let layouts = raw
            .layouts
            .into_iter()
            .enumerate()
            .map(|(index, value)| match serde_json::from_value(value) {
                Ok(layout) => layout,
                Err(error) => {
                    tracing::warn!(index, %error, "skipping malformed layout");
                    SlideLayout::default()
                }
            })
            .collect();
        Ok(Self {
            layouts,
            slides: raw.slides,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn layout(&self, index: usize) -> Result<&SlideLayout, DocumentError> {
        self.layouts
            .get(index)
            .ok_or(DocumentError::LayoutOutOfRange {
                index,
                count: self.layouts.len(),
            })
    }

    /// Append a slide instantiated from the given layout
    ///
    /// The layout's placeholders are cloned onto the slide, template text and
    /// styling intact; the slide starts with no free shapes.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<&mut Slide, DocumentError> {
        let layout = self.layout(layout_index)?;
        let slide = Slide {
            layout_index,
            placeholders: layout.placeholders.clone(),
            shapes: Vec::new(),
        };
        self.slides.push(slide);
        Ok(self.slides.last_mut().expect("slide was just pushed"))
    }
}
