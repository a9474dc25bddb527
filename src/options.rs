//! Option layers
//!
//! Small value types holding independently settable formatting attributes.
//! Every entity that needs a layer embeds it as a field and implements the
//! matching `*Options` trait, which supplies the chainable setters. A layer
//! whose attributes are all unset renders to the empty string.

use crate::format::{self, join_fragments, keyword_value, num, quoted};

/// Default color for text elements and borders.
pub const DEFAULT_TEXT_COLOR: &str = "#404040";
/// Default line width for drawn series.
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Anything that renders to a fragment of script text.
pub trait Layer {
    fn repr(&self) -> String;
}

/// Concatenate layer fragments in the given order.
pub fn merge_layers(layers: &[&dyn Layer]) -> String {
    join_fragments(layers.iter().map(|l| l.repr()))
}

// =============================================================================
// Line
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSpecs {
    pub style: Option<usize>,
    pub kind: Option<i32>,
    pub width: Option<f64>,
    pub color: Option<String>,
    pub dash: Option<i32>,
}

impl Layer for LineSpecs {
    fn repr(&self) -> String {
        join_fragments([
            keyword_value("linestyle", self.style.map(|v| v.to_string()).as_deref()),
            keyword_value("linetype", self.kind.map(|v| v.to_string()).as_deref()),
            keyword_value("linewidth", self.width.map(num).as_deref()),
            keyword_value("linecolor", self.color.as_ref().map(quoted).as_deref()),
            keyword_value("dashtype", self.dash.map(|v| v.to_string()).as_deref()),
        ])
    }
}

pub trait LineOptions: Sized {
    fn line_specs(&mut self) -> &mut LineSpecs;

    fn line_style(&mut self, value: usize) -> &mut Self {
        self.line_specs().style = Some(value);
        self
    }

    fn line_type(&mut self, value: i32) -> &mut Self {
        self.line_specs().kind = Some(value);
        self
    }

    fn line_width(&mut self, value: f64) -> &mut Self {
        self.line_specs().width = Some(value);
        self
    }

    fn line_color(&mut self, value: impl Into<String>) -> &mut Self {
        self.line_specs().color = Some(value.into());
        self
    }

    fn dash_type(&mut self, value: i32) -> &mut Self {
        self.line_specs().dash = Some(value);
        self
    }
}

// =============================================================================
// Point
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSpecs {
    pub kind: Option<i32>,
    pub size: Option<f64>,
}

impl Layer for PointSpecs {
    fn repr(&self) -> String {
        join_fragments([
            keyword_value("pointtype", self.kind.map(|v| v.to_string()).as_deref()),
            keyword_value("pointsize", self.size.map(num).as_deref()),
        ])
    }
}

pub trait PointOptions: Sized {
    fn point_specs(&mut self) -> &mut PointSpecs;

    fn point_type(&mut self, value: i32) -> &mut Self {
        self.point_specs().kind = Some(value);
        self
    }

    fn point_size(&mut self, value: f64) -> &mut Self {
        self.point_specs().size = Some(value);
        self
    }
}

// =============================================================================
// Fill
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FillMode {
    Empty,
    Solid(Option<f64>),
    Pattern(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillBorder {
    Shown { color: Option<String>, width: Option<f64> },
    Hidden,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillSpecs {
    pub mode: Option<FillMode>,
    pub color: Option<String>,
    pub transparent: bool,
    pub border: Option<FillBorder>,
}

impl FillSpecs {
    /// The fill style body without the `fillstyle` keyword, as used by
    /// `set style fill`.
    pub fn style_body(&self) -> String {
        let transparent = if self.transparent { "transparent" } else { "" };
        let mode = match &self.mode {
            Some(FillMode::Solid(density)) => {
                join_fragments([transparent, "solid", &density.map(num).unwrap_or_default()])
            }
            Some(FillMode::Pattern(n)) => join_fragments([transparent, "pattern", &n.to_string()]),
            Some(FillMode::Empty) => "empty".to_string(),
            None => String::new(),
        };
        let border = match &self.border {
            Some(FillBorder::Shown { color, width }) => join_fragments([
                "border".to_string(),
                keyword_value("linecolor", color.as_ref().map(quoted).as_deref()),
                keyword_value("linewidth", width.map(num).as_deref()),
            ]),
            Some(FillBorder::Hidden) => "noborder".to_string(),
            None => String::new(),
        };
        join_fragments([mode, border])
    }
}

impl Layer for FillSpecs {
    fn repr(&self) -> String {
        let body = self.style_body();
        join_fragments([
            keyword_value("fillcolor", self.color.as_ref().map(quoted).as_deref()),
            keyword_value("fillstyle", Some(body.as_str())),
        ])
    }
}

pub trait FillOptions: Sized {
    fn fill_specs(&mut self) -> &mut FillSpecs;

    fn fill_empty(&mut self) -> &mut Self {
        self.fill_specs().mode = Some(FillMode::Empty);
        self
    }

    fn fill_solid(&mut self) -> &mut Self {
        self.fill_specs().mode = Some(FillMode::Solid(None));
        self
    }

    fn fill_pattern(&mut self, number: u32) -> &mut Self {
        self.fill_specs().mode = Some(FillMode::Pattern(number));
        self
    }

    /// Solid fill with the given density, clamped to `[0, 1]`.
    fn fill_intensity(&mut self, value: f64) -> &mut Self {
        let value = if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) };
        self.fill_specs().mode = Some(FillMode::Solid(Some(value)));
        self
    }

    fn fill_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.fill_specs().color = Some(color.into());
        self
    }

    fn fill_transparent(&mut self, active: bool) -> &mut Self {
        let specs = self.fill_specs();
        specs.transparent = active;
        if specs.mode.is_none() {
            specs.mode = Some(FillMode::Solid(None));
        }
        self
    }

    fn border_show(&mut self) -> &mut Self {
        let specs = self.fill_specs();
        if !matches!(specs.border, Some(FillBorder::Shown { .. })) {
            specs.border = Some(FillBorder::Shown { color: None, width: None });
        }
        self
    }

    fn border_hide(&mut self) -> &mut Self {
        self.fill_specs().border = Some(FillBorder::Hidden);
        self
    }

    fn border_line_color(&mut self, color: impl Into<String>) -> &mut Self {
        let color = color.into();
        match &mut self.fill_specs().border {
            Some(FillBorder::Shown { color: c, .. }) => *c = Some(color),
            border => *border = Some(FillBorder::Shown { color: Some(color), width: None }),
        }
        self
    }

    fn border_line_width(&mut self, value: f64) -> &mut Self {
        match &mut self.fill_specs().border {
            Some(FillBorder::Shown { width, .. }) => *width = Some(value),
            border => *border = Some(FillBorder::Shown { color: None, width: Some(value) }),
        }
        self
    }
}

impl FillOptions for FillSpecs {
    fn fill_specs(&mut self) -> &mut FillSpecs {
        self
    }
}

// =============================================================================
// Font / Text
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSpecs {
    pub name: Option<String>,
    pub size: Option<u32>,
}

impl FontSpecs {
    pub fn is_set(&self) -> bool {
        self.name.is_some() || self.size.is_some()
    }

    /// Fill in unset fields from a less specific font.
    pub fn inherit(&self, parent: &FontSpecs) -> FontSpecs {
        FontSpecs {
            name: self.name.clone().or_else(|| parent.name.clone()),
            size: self.size.or(parent.size),
        }
    }
}

impl Layer for FontSpecs {
    fn repr(&self) -> String {
        if !self.is_set() {
            return String::new();
        }
        let name = self.name.as_deref().unwrap_or("");
        let size = self.size.map(|s| s.to_string()).unwrap_or_default();
        format!("font '{},{}'", name, size)
    }
}

pub trait FontOptions: Sized {
    fn font_specs(&mut self) -> &mut FontSpecs;

    fn font_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.font_specs().name = Some(name.into());
        self
    }

    fn font_size(&mut self, size: u32) -> &mut Self {
        self.font_specs().size = Some(size);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSpecs {
    pub enhanced: Option<bool>,
    pub color: Option<String>,
    pub font: FontSpecs,
}

impl TextSpecs {
    /// Enhanced text in the default text color.
    pub fn standard() -> Self {
        Self {
            enhanced: Some(true),
            color: Some(DEFAULT_TEXT_COLOR.to_string()),
            font: FontSpecs::default(),
        }
    }

    /// Render with unset font fields taken from `parent`.
    pub fn repr_with_font(&self, parent: &FontSpecs) -> String {
        let enhanced = match self.enhanced {
            Some(true) => "enhanced",
            Some(false) => "noenhanced",
            None => "",
        };
        join_fragments([
            enhanced.to_string(),
            keyword_value("textcolor", self.color.as_ref().map(quoted).as_deref()),
            self.font.inherit(parent).repr(),
        ])
    }
}

impl Layer for TextSpecs {
    fn repr(&self) -> String {
        self.repr_with_font(&FontSpecs::default())
    }
}

pub trait TextOptions: Sized {
    fn text_specs(&mut self) -> &mut TextSpecs;

    fn text_color(&mut self, color: impl Into<String>) -> &mut Self {
        self.text_specs().color = Some(color.into());
        self
    }

    /// Toggle enhanced text mode (`a^x`, `a_x` markup).
    fn enhanced(&mut self, value: bool) -> &mut Self {
        self.text_specs().enhanced = Some(value);
        self
    }

    fn font_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.text_specs().font.name = Some(name.into());
        self
    }

    fn font_size(&mut self, size: u32) -> &mut Self {
        self.text_specs().font.size = Some(size);
        self
    }
}

// =============================================================================
// Offset
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    Chars(f64),
    Graph(f64),
    Screen(f64),
}

impl Offset {
    fn repr(&self) -> String {
        match self {
            Offset::Chars(v) => num(*v),
            Offset::Graph(v) => format!("graph {}", num(*v)),
            Offset::Screen(v) => format!("screen {}", num(*v)),
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, Offset::Chars(v) if *v == 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetSpecs {
    pub x: Option<Offset>,
    pub y: Option<Offset>,
}

impl Layer for OffsetSpecs {
    fn repr(&self) -> String {
        let active = |o: &Option<Offset>| o.map(|o| !o.is_zero()).unwrap_or(false);
        if !active(&self.x) && !active(&self.y) {
            return String::new();
        }
        let x = self.x.map(|o| o.repr()).unwrap_or_else(|| "0".to_string());
        let y = self.y.map(|o| o.repr()).unwrap_or_else(|| "0".to_string());
        format!("offset {}, {}", x, y)
    }
}

pub trait OffsetOptions: Sized {
    fn offset_specs(&mut self) -> &mut OffsetSpecs;

    /// Shift along x by a number of characters (fractions allowed).
    fn shift_along_x(&mut self, chars: f64) -> &mut Self {
        self.offset_specs().x = Some(Offset::Chars(chars));
        self
    }

    fn shift_along_y(&mut self, chars: f64) -> &mut Self {
        self.offset_specs().y = Some(Offset::Chars(chars));
        self
    }

    fn shift_along_graph_x(&mut self, value: f64) -> &mut Self {
        self.offset_specs().x = Some(Offset::Graph(value));
        self
    }

    fn shift_along_graph_y(&mut self, value: f64) -> &mut Self {
        self.offset_specs().y = Some(Offset::Graph(value));
        self
    }

    fn shift_along_screen_x(&mut self, value: f64) -> &mut Self {
        self.offset_specs().x = Some(Offset::Screen(value));
        self
    }

    fn shift_along_screen_y(&mut self, value: f64) -> &mut Self {
        self.offset_specs().y = Some(Offset::Screen(value));
        self
    }
}

// =============================================================================
// Depth
// =============================================================================

/// Placement of an element relative to the plotted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Front,
    Back,
    Behind,
}

impl Layer for Depth {
    fn repr(&self) -> String {
        match self {
            Depth::Front => "front",
            Depth::Back => "back",
            Depth::Behind => "behind",
        }
        .to_string()
    }
}

impl Layer for Option<Depth> {
    fn repr(&self) -> String {
        self.map(|d| d.repr()).unwrap_or_default()
    }
}

// =============================================================================
// Title
// =============================================================================

/// Quoted text plus its text, rotation and offset attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSpecs {
    pub text: Option<String>,
    pub text_specs: TextSpecs,
    pub rotate: Option<String>,
    pub offset: OffsetSpecs,
}

impl Default for TitleSpecs {
    fn default() -> Self {
        Self {
            text: None,
            text_specs: TextSpecs::standard(),
            rotate: None,
            offset: OffsetSpecs::default(),
        }
    }
}

impl TitleSpecs {
    pub fn repr_with_font(&self, parent: &FontSpecs) -> String {
        join_fragments([
            self.text.as_ref().map(quoted).unwrap_or_default(),
            self.text_specs.repr_with_font(parent),
            self.rotate.clone().unwrap_or_default(),
            self.offset.repr(),
        ])
    }
}

impl Layer for TitleSpecs {
    fn repr(&self) -> String {
        self.repr_with_font(&FontSpecs::default())
    }
}

impl TextOptions for TitleSpecs {
    fn text_specs(&mut self) -> &mut TextSpecs {
        &mut self.text_specs
    }
}

impl OffsetOptions for TitleSpecs {
    fn offset_specs(&mut self) -> &mut OffsetSpecs {
        &mut self.offset
    }
}

impl TitleSpecs {
    pub fn text(&mut self, value: impl Into<String>) -> &mut Self {
        self.text = Some(value.into());
        self
    }

    pub fn rotate_by(&mut self, degrees: f64) -> &mut Self {
        self.rotate = Some(format!("rotate by {}", format::num(degrees)));
        self
    }
}
