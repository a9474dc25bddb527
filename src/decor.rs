//! Axis labels, tics, grid lines, border and legend of a plot.
//!
//! Every decoration renders to complete script lines. A decoration with
//! nothing to say renders to the empty string and is skipped by the plot.

use anyhow::{bail, Result};

use crate::format::{join_fragments, num, quoted};
use crate::options::{
    Depth, FontSpecs, Layer, LineOptions, LineSpecs, OffsetOptions, OffsetSpecs, TextOptions,
    TextSpecs, TitleSpecs, DEFAULT_TEXT_COLOR,
};

pub const DEFAULT_GRID_COLOR: &str = "#d6d7d9";
pub const DEFAULT_TICS_SCALE_MAJOR: f64 = 0.5;
pub const DEFAULT_TICS_SCALE_MINOR: f64 = 0.25;

// =============================================================================
// Axis label
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    axis: String,
    title: TitleSpecs,
}

impl AxisLabel {
    pub fn new(axis: &str) -> Self {
        Self {
            axis: axis.to_string(),
            title: TitleSpecs::default(),
        }
    }

    pub fn text(&mut self, value: impl Into<String>) -> &mut Self {
        self.title.text(value);
        self
    }

    pub fn rotate_by(&mut self, degrees: f64) -> &mut Self {
        self.title.rotate_by(degrees);
        self
    }

    pub fn rotate_axis_parallel(&mut self) -> &mut Self {
        self.title.rotate = Some("rotate parallel".to_string());
        self
    }

    pub fn rotate_none(&mut self) -> &mut Self {
        self.title.rotate = Some("norotate".to_string());
        self
    }

    pub fn repr_with_font(&self, font: &FontSpecs) -> String {
        if self.title.text.is_none() && self.title.rotate.is_none() {
            return String::new();
        }
        format!("set {}label {}", self.axis, self.title.repr_with_font(font))
    }
}

impl TextOptions for AxisLabel {
    fn text_specs(&mut self) -> &mut TextSpecs {
        &mut self.title.text_specs
    }
}

impl OffsetOptions for AxisLabel {
    fn offset_specs(&mut self) -> &mut OffsetSpecs {
        &mut self.title.offset
    }
}

// =============================================================================
// Tics
// =============================================================================

/// Attributes shared by the global tics and the per-axis major tics.
#[derive(Debug, Clone, PartialEq)]
pub struct TicsBase {
    along_axis: bool,
    mirror: bool,
    inside: bool,
    rotate: String,
    scale_major: f64,
    scale_minor: f64,
    format: Option<String>,
    shown: bool,
    text: TextSpecs,
    offset: OffsetSpecs,
}

impl Default for TicsBase {
    fn default() -> Self {
        Self {
            along_axis: false,
            mirror: false,
            inside: false,
            rotate: "norotate".to_string(),
            scale_major: DEFAULT_TICS_SCALE_MAJOR,
            scale_minor: DEFAULT_TICS_SCALE_MINOR,
            format: None,
            shown: true,
            text: TextSpecs::standard(),
            offset: OffsetSpecs::default(),
        }
    }
}

impl TicsBase {
    fn repr(&self, axis: &str, depth: Option<Depth>, font: &FontSpecs) -> String {
        if !self.shown {
            return format!("unset {}tics", axis);
        }
        join_fragments([
            format!("set {}tics", axis),
            (if self.along_axis { "axis" } else { "border" }).to_string(),
            (if self.mirror { "mirror" } else { "nomirror" }).to_string(),
            depth.repr(),
            (if self.inside { "in" } else { "out" }).to_string(),
            format!("scale {},{}", num(self.scale_major), num(self.scale_minor)),
            self.rotate.clone(),
            self.offset.repr(),
            self.text.repr_with_font(font),
            self.format.as_ref().map(quoted).unwrap_or_default(),
        ])
    }
}

/// Setters common to every tics decoration.
pub trait TicsOptions: Sized {
    fn tics_base(&mut self) -> &mut TicsBase;

    fn show(&mut self) -> &mut Self {
        self.tics_base().shown = true;
        self
    }

    fn hide(&mut self) -> &mut Self {
        self.tics_base().shown = false;
        self
    }

    fn along_axis(&mut self) -> &mut Self {
        self.tics_base().along_axis = true;
        self
    }

    fn along_border(&mut self) -> &mut Self {
        self.tics_base().along_axis = false;
        self
    }

    fn mirror(&mut self, value: bool) -> &mut Self {
        self.tics_base().mirror = value;
        self
    }

    fn inside_graph(&mut self) -> &mut Self {
        self.tics_base().inside = true;
        self
    }

    fn outside_graph(&mut self) -> &mut Self {
        self.tics_base().inside = false;
        self
    }

    fn rotate(&mut self, value: bool) -> &mut Self {
        self.tics_base().rotate = if value { "rotate" } else { "norotate" }.to_string();
        self
    }

    fn rotate_by(&mut self, degrees: f64) -> &mut Self {
        self.tics_base().rotate = format!("rotate by {}", num(degrees));
        self
    }

    fn scale_major_by(&mut self, value: f64) -> &mut Self {
        self.tics_base().scale_major = value;
        self
    }

    fn scale_minor_by(&mut self, value: f64) -> &mut Self {
        self.tics_base().scale_minor = value;
        self
    }

    /// printf-like label format, e.g. `%.2f`.
    fn format(&mut self, fmt: impl Into<String>) -> &mut Self {
        self.tics_base().format = Some(fmt.into());
        self
    }
}

/// Tics settings applied to every axis at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Tics {
    base: TicsBase,
    depth: Depth,
}

impl Default for Tics {
    fn default() -> Self {
        Self {
            base: TicsBase::default(),
            depth: Depth::Front,
        }
    }
}

impl Tics {
    pub fn stack_front(&mut self) -> &mut Self {
        self.depth = Depth::Front;
        self
    }

    pub fn stack_back(&mut self) -> &mut Self {
        self.depth = Depth::Back;
        self
    }

    pub fn repr_with_font(&self, font: &FontSpecs) -> String {
        self.base.repr("", Some(self.depth), font)
    }
}

/// Major tics on one side of the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTics {
    axis: String,
    base: TicsBase,
    logscale: Option<u32>,
    positions: Option<String>,
    extra: Option<String>,
}

fn tic_list(values: &[f64], labels: Option<&[String]>) -> String {
    let entries: Vec<String> = match labels {
        Some(labels) => values
            .iter()
            .zip(labels)
            .map(|(v, l)| format!("{} {}", quoted(l), num(*v)))
            .collect(),
        None => values.iter().map(|v| num(*v)).collect(),
    };
    format!("({})", entries.join(", "))
}

impl AxisTics {
    pub fn new(axis: &str) -> Self {
        Self {
            axis: axis.to_string(),
            base: TicsBase::default(),
            logscale: None,
            positions: None,
            extra: None,
        }
    }

    pub fn hidden(axis: &str) -> Self {
        let mut tics = Self::new(axis);
        tics.hide();
        tics
    }

    pub fn is_hidden(&self) -> bool {
        !self.base.shown
    }

    /// Let the renderer place the tics.
    pub fn automatic(&mut self) -> &mut Self {
        self.positions = None;
        self.extra = None;
        self
    }

    /// Tics from `start` every `increment` up to `end`.
    pub fn interval(&mut self, start: f64, increment: f64, end: f64) -> Result<&mut Self> {
        if !(start.is_finite() && increment.is_finite() && end.is_finite()) {
            bail!("Tics interval bounds must be finite numbers");
        }
        if increment <= 0.0 {
            bail!("Tics interval increment must be positive, got {}", num(increment));
        }
        if end <= start {
            bail!(
                "Tics interval end ({}) must be greater than start ({})",
                num(end),
                num(start)
            );
        }
        self.positions = Some(format!("{}, {}, {}", num(start), num(increment), num(end)));
        Ok(self)
    }

    pub fn at(&mut self, values: &[f64]) -> &mut Self {
        self.positions = Some(tic_list(values, None));
        self
    }

    /// Labelled tics; extra values or labels beyond the shorter list are ignored.
    pub fn at_labeled(&mut self, values: &[f64], labels: &[String]) -> &mut Self {
        self.positions = Some(tic_list(values, Some(labels)));
        self
    }

    /// Tics added on top of the regular ones.
    pub fn add(&mut self, values: &[f64]) -> &mut Self {
        self.extra = Some(format!("add {}", tic_list(values, None)));
        self
    }

    pub fn add_labeled(&mut self, values: &[f64], labels: &[String]) -> &mut Self {
        self.extra = Some(format!("add {}", tic_list(values, Some(labels))));
        self
    }

    /// Logarithmic scale on this axis.
    pub fn logscale(&mut self, base: u32) -> &mut Self {
        self.logscale = Some(base);
        self
    }

    pub fn repr_with_font(&self, font: &FontSpecs) -> String {
        let base = self.base.repr(&self.axis, None, font);
        if !self.base.shown {
            return base;
        }
        let tics = join_fragments([
            base,
            self.positions.clone().unwrap_or_default(),
            self.extra.clone().unwrap_or_default(),
        ]);
        match self.logscale {
            Some(b) => format!("set logscale {} {}\n{}", self.axis, b, tics),
            None => tics,
        }
    }
}

impl TicsOptions for Tics {
    fn tics_base(&mut self) -> &mut TicsBase {
        &mut self.base
    }
}

impl TicsOptions for AxisTics {
    fn tics_base(&mut self) -> &mut TicsBase {
        &mut self.base
    }
}

macro_rules! tics_text_options {
    ($($ty:ty),*) => {
        $(
            impl TextOptions for $ty {
                fn text_specs(&mut self) -> &mut TextSpecs {
                    &mut self.base.text
                }
            }

            impl OffsetOptions for $ty {
                fn offset_specs(&mut self) -> &mut OffsetSpecs {
                    &mut self.base.offset
                }
            }
        )*
    };
}

tics_text_options!(Tics, AxisTics);

/// Minor tics on one side of the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct MinorTics {
    axis: String,
    shown: bool,
    frequency: Option<u32>,
}

impl MinorTics {
    pub fn new(axis: &str, shown: bool) -> Self {
        Self {
            axis: axis.to_string(),
            shown,
            frequency: None,
        }
    }

    pub fn show(&mut self) -> &mut Self {
        self.shown = true;
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.shown = false;
        self
    }

    pub fn automatic(&mut self) -> &mut Self {
        self.frequency = None;
        self
    }

    /// Number of minor tics between two major ones.
    pub fn number(&mut self, count: u32) -> &mut Self {
        self.frequency = Some(count + 1);
        self
    }

    pub fn repr(&self) -> String {
        if !self.shown {
            return format!("unset m{}tics", self.axis);
        }
        join_fragments([
            format!("set m{}tics", self.axis),
            self.frequency.map(|f| f.to_string()).unwrap_or_default(),
        ])
    }
}

// =============================================================================
// Grid
// =============================================================================

/// Grid lines, either global or bound to one set of tics.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLines {
    tics: Option<String>,
    major: bool,
    shown: bool,
    depth: Depth,
    line: LineSpecs,
}

impl GridLines {
    fn new(tics: Option<&str>, major: bool) -> Self {
        Self {
            tics: tics.map(str::to_string),
            major,
            shown: false,
            depth: Depth::Back,
            line: LineSpecs {
                style: None,
                kind: Some(1),
                width: Some(1.0),
                color: Some(DEFAULT_GRID_COLOR.to_string()),
                dash: Some(0),
            },
        }
    }

    pub fn show(&mut self, value: bool) -> &mut Self {
        self.shown = value;
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.show(false)
    }

    pub fn front(&mut self) -> &mut Self {
        self.depth = Depth::Front;
        self
    }

    pub fn back(&mut self) -> &mut Self {
        self.depth = Depth::Back;
        self
    }

    pub fn repr(&self) -> String {
        match (&self.tics, self.shown) {
            (None, false) => "unset grid".to_string(),
            (Some(tics), false) => format!("set grid no{}", tics),
            (tics, true) => {
                let line = self.line.repr();
                let line = if self.major { line } else { format!(", {}", line) };
                join_fragments([
                    "set grid".to_string(),
                    tics.clone().unwrap_or_default(),
                    self.depth.repr(),
                    line,
                ])
            }
        }
    }
}

impl LineOptions for GridLines {
    fn line_specs(&mut self) -> &mut LineSpecs {
        &mut self.line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    global: GridLines,
    per_tics: Vec<GridLines>,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            global: GridLines::new(None, true),
            per_tics: Vec::new(),
        }
    }
}

impl Grid {
    /// Settings of the grid as a whole.
    pub fn lines(&mut self) -> &mut GridLines {
        &mut self.global
    }

    pub fn show(&mut self) -> &mut Self {
        self.global.show(true);
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.global.show(false);
        self
    }

    fn push(&mut self, tics: &str, major: bool) -> &mut GridLines {
        let mut lines = GridLines::new(Some(tics), major);
        lines.show(true);
        self.per_tics.push(lines);
        let last = self.per_tics.len() - 1;
        &mut self.per_tics[last]
    }

    pub fn xtics(&mut self) -> &mut GridLines {
        self.push("xtics", true)
    }

    pub fn ytics(&mut self) -> &mut GridLines {
        self.push("ytics", true)
    }

    pub fn ztics(&mut self) -> &mut GridLines {
        self.push("ztics", true)
    }

    pub fn x2tics(&mut self) -> &mut GridLines {
        self.push("x2tics", true)
    }

    pub fn y2tics(&mut self) -> &mut GridLines {
        self.push("y2tics", true)
    }

    pub fn mxtics(&mut self) -> &mut GridLines {
        self.push("mxtics", false)
    }

    pub fn mytics(&mut self) -> &mut GridLines {
        self.push("mytics", false)
    }

    pub fn mztics(&mut self) -> &mut GridLines {
        self.push("mztics", false)
    }

    pub fn mx2tics(&mut self) -> &mut GridLines {
        self.push("mx2tics", false)
    }

    pub fn my2tics(&mut self) -> &mut GridLines {
        self.push("my2tics", false)
    }

    /// Empty when the grid is hidden and nothing was configured per tics.
    pub fn repr(&self) -> String {
        if !self.global.shown && self.per_tics.is_empty() {
            return String::new();
        }
        std::iter::once(&self.global)
            .chain(&self.per_tics)
            .map(|g| g.repr())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Border
// =============================================================================

/// Edge bits as understood by `set border`.
pub mod edges {
    pub const BOTTOM: u16 = 1 << 0;
    pub const LEFT: u16 = 1 << 1;
    pub const TOP: u16 = 1 << 2;
    pub const RIGHT: u16 = 1 << 3;
    pub const BOTTOM_LEFT_FRONT: u16 = 1 << 0;
    pub const BOTTOM_LEFT_BACK: u16 = 1 << 1;
    pub const BOTTOM_RIGHT_FRONT: u16 = 1 << 2;
    pub const BOTTOM_RIGHT_BACK: u16 = 1 << 3;
    pub const LEFT_VERTICAL: u16 = 1 << 4;
    pub const BACK_VERTICAL: u16 = 1 << 5;
    pub const RIGHT_VERTICAL: u16 = 1 << 6;
    pub const FRONT_VERTICAL: u16 = 1 << 7;
    pub const TOP_LEFT_BACK: u16 = 1 << 8;
    pub const TOP_RIGHT_BACK: u16 = 1 << 9;
    pub const TOP_LEFT_FRONT: u16 = 1 << 10;
    pub const TOP_RIGHT_FRONT: u16 = 1 << 11;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    edges: u16,
    depth: Depth,
    line: LineSpecs,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            edges: edges::LEFT | edges::BOTTOM,
            depth: Depth::Front,
            line: LineSpecs {
                style: None,
                kind: Some(1),
                width: Some(2.0),
                color: Some(DEFAULT_TEXT_COLOR.to_string()),
                dash: None,
            },
        }
    }
}

impl Border {
    pub fn clear(&mut self) -> &mut Self {
        self.edges = 0;
        self
    }

    pub fn none(&mut self) -> &mut Self {
        self.clear()
    }

    /// Add the given edge bits, see [`edges`].
    pub fn edge(&mut self, bits: u16) -> &mut Self {
        self.edges |= bits;
        self
    }

    pub fn bottom(&mut self) -> &mut Self {
        self.edge(edges::BOTTOM)
    }

    pub fn left(&mut self) -> &mut Self {
        self.edge(edges::LEFT)
    }

    pub fn top(&mut self) -> &mut Self {
        self.edge(edges::TOP)
    }

    pub fn right(&mut self) -> &mut Self {
        self.edge(edges::RIGHT)
    }

    pub fn polar(&mut self) -> &mut Self {
        self.edge(edges::TOP)
    }

    pub fn front(&mut self) -> &mut Self {
        self.depth = Depth::Front;
        self
    }

    pub fn back(&mut self) -> &mut Self {
        self.depth = Depth::Back;
        self
    }

    pub fn behind(&mut self) -> &mut Self {
        self.depth = Depth::Behind;
        self
    }

    pub fn repr(&self) -> String {
        join_fragments([
            format!("set border {}", self.edges),
            self.depth.repr(),
            self.line.repr(),
        ])
    }
}

impl LineOptions for Border {
    fn line_specs(&mut self) -> &mut LineSpecs {
        &mut self.line
    }
}

// =============================================================================
// Legend
// =============================================================================

/// Frame drawn around the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendFrame {
    shown: bool,
    line: LineSpecs,
}

impl Default for LegendFrame {
    fn default() -> Self {
        Self {
            shown: false,
            line: LineSpecs {
                style: None,
                kind: Some(1),
                width: Some(1.0),
                color: Some(DEFAULT_GRID_COLOR.to_string()),
                dash: None,
            },
        }
    }
}

impl LegendFrame {
    pub fn show(&mut self, value: bool) -> &mut Self {
        self.shown = value;
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.show(false)
    }

    fn repr(&self) -> String {
        if !self.shown {
            return "nobox".to_string();
        }
        join_fragments(["box".to_string(), self.line.repr()])
    }
}

impl LineOptions for LegendFrame {
    fn line_specs(&mut self) -> &mut LineSpecs {
        &mut self.line
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    shown: bool,
    placement: &'static str,
    opaque: bool,
    frame: LegendFrame,
    header: TitleSpecs,
    horizontal: bool,
    justify_right: bool,
    invert: bool,
    reverse: bool,
    width_increment: i32,
    height_increment: i32,
    sample_length: u32,
    spacing: u32,
    text: TextSpecs,
    max_rows: Option<u32>,
    max_cols: Option<u32>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            shown: true,
            placement: "inside right top",
            opaque: false,
            frame: LegendFrame::default(),
            header: TitleSpecs::default(),
            horizontal: false,
            justify_right: false,
            invert: false,
            reverse: true,
            width_increment: 0,
            height_increment: 0,
            sample_length: 4,
            spacing: 1,
            text: TextSpecs::standard(),
            max_rows: None,
            max_cols: None,
        }
    }
}

macro_rules! placements {
    ($($name:ident => $value:expr),* $(,)?) => {
        $(
            pub fn $name(&mut self) -> &mut Self {
                self.placement = $value;
                self
            }
        )*
    };
}

impl Legend {
    placements! {
        at_left => "inside left",
        at_right => "inside right",
        at_center => "inside center",
        at_top => "inside center top",
        at_top_left => "inside left top",
        at_top_right => "inside right top",
        at_bottom => "inside center bottom",
        at_bottom_left => "inside left bottom",
        at_bottom_right => "inside right bottom",
        at_outside_left => "lmargin center",
        at_outside_left_top => "lmargin top",
        at_outside_left_bottom => "lmargin bottom",
        at_outside_right => "rmargin center",
        at_outside_right_top => "rmargin top",
        at_outside_right_bottom => "rmargin bottom",
        at_outside_bottom => "bmargin center",
        at_outside_bottom_left => "bmargin left",
        at_outside_bottom_right => "bmargin right",
        at_outside_top => "tmargin center",
        at_outside_top_left => "tmargin left",
        at_outside_top_right => "tmargin right",
    }

    pub fn show(&mut self) -> &mut Self {
        self.shown = true;
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.shown = false;
        self
    }

    pub fn opaque(&mut self) -> &mut Self {
        self.opaque = true;
        self
    }

    pub fn transparent(&mut self) -> &mut Self {
        self.opaque = false;
        self
    }

    pub fn frame(&mut self) -> &mut LegendFrame {
        &mut self.frame
    }

    pub fn header(&mut self, text: impl Into<String>) -> &mut TitleSpecs {
        self.header.text(text)
    }

    pub fn vertical_display(&mut self) -> &mut Self {
        self.horizontal = false;
        self
    }

    pub fn vertical_max_rows(&mut self, rows: u32) -> &mut Self {
        self.max_rows = Some(rows);
        self
    }

    pub fn horizontal_display(&mut self) -> &mut Self {
        self.horizontal = true;
        self
    }

    pub fn horizontal_max_cols(&mut self, cols: u32) -> &mut Self {
        self.max_cols = Some(cols);
        self
    }

    pub fn labels_before_symbols(&mut self) -> &mut Self {
        self.reverse = false;
        self
    }

    pub fn labels_after_symbols(&mut self) -> &mut Self {
        self.reverse = true;
        self
    }

    pub fn labels_left_justify(&mut self) -> &mut Self {
        self.justify_right = false;
        self
    }

    pub fn labels_right_justify(&mut self) -> &mut Self {
        self.justify_right = true;
        self
    }

    pub fn start_from_first(&mut self) -> &mut Self {
        self.invert = false;
        self
    }

    pub fn start_from_last(&mut self) -> &mut Self {
        self.invert = true;
        self
    }

    pub fn increment_width(&mut self, value: i32) -> &mut Self {
        self.width_increment = value;
        self
    }

    pub fn increment_height(&mut self, value: i32) -> &mut Self {
        self.height_increment = value;
        self
    }

    pub fn symbol_length(&mut self, value: u32) -> &mut Self {
        self.sample_length = value;
        self
    }

    pub fn spacing(&mut self, value: u32) -> &mut Self {
        self.spacing = value;
        self
    }

    /// Unset font fields fall back to `font`, normally the plot's.
    pub fn repr_with_font(&self, font: &FontSpecs) -> String {
        if !self.shown {
            return "unset key".to_string();
        }
        let own_font = self.text.font.inherit(font);
        let header = match &self.header.text {
            Some(_) => format!("title {}", self.header.repr_with_font(&own_font)),
            None => String::new(),
        };
        let limit = |v: Option<u32>| v.map(|n| n.to_string()).unwrap_or_else(|| "auto".into());
        join_fragments([
            "set key".to_string(),
            self.placement.to_string(),
            (if self.opaque { "opaque" } else { "noopaque" }).to_string(),
            self.frame.repr(),
            (if self.horizontal { "horizontal" } else { "vertical" }).to_string(),
            (if self.justify_right { "Right" } else { "Left" }).to_string(),
            (if self.invert { "invert" } else { "noinvert" }).to_string(),
            (if self.reverse { "reverse" } else { "noreverse" }).to_string(),
            format!("width {}", self.width_increment),
            format!("height {}", self.height_increment),
            format!("samplen {}", self.sample_length),
            format!("spacing {}", self.spacing),
            self.text.repr_with_font(font),
            header,
            format!("maxrows {}", limit(self.max_rows)),
            format!("maxcols {}", limit(self.max_cols)),
        ])
    }
}

impl TextOptions for Legend {
    fn text_specs(&mut self) -> &mut TextSpecs {
        &mut self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_font() -> FontSpecs {
        FontSpecs::default()
    }

    #[test]
    fn test_axis_label_omitted_until_set() {
        let mut label = AxisLabel::new("x");
        assert_eq!(label.repr_with_font(&no_font()), "");
        label.text("Time").rotate_by(90.0);
        assert_eq!(
            label.repr_with_font(&no_font()),
            "set xlabel 'Time' enhanced textcolor '#404040' rotate by 90"
        );
    }

    #[test]
    fn test_axis_label_inherits_font() {
        let mut label = AxisLabel::new("y");
        label.text("Speed").font_size(8);
        let plot_font = FontSpecs { name: Some("Georgia".into()), size: Some(12) };
        assert!(label.repr_with_font(&plot_font).ends_with("font 'Georgia,8'"));
    }

    #[test]
    fn test_default_tics() {
        let tics = Tics::default();
        assert_eq!(
            tics.repr_with_font(&no_font()),
            "set tics border nomirror front out scale 0.5,0.25 norotate enhanced textcolor '#404040'"
        );
    }

    #[test]
    fn test_axis_tics_positions_and_logscale() {
        let mut tics = AxisTics::new("x");
        tics.at_labeled(&[1.0, 2.0], &["one".to_string(), "two".to_string()])
            .add(&[3.5])
            .logscale(10)
            .mirror(true);
        let text = tics.repr_with_font(&no_font());
        assert!(text.starts_with("set logscale x 10\nset xtics border mirror out"));
        assert!(text.ends_with("('one' 1, 'two' 2) add (3.5)"));
    }

    #[test]
    fn test_interval_validation() {
        let mut tics = AxisTics::new("y");
        assert!(tics.interval(0.0, 0.0, 1.0).is_err());
        assert!(tics.interval(2.0, 1.0, 1.0).is_err());
        assert!(tics.interval(0.0, f64::NAN, 1.0).is_err());
        tics.interval(0.0, 0.5, 2.0).unwrap();
        assert!(tics.repr_with_font(&no_font()).ends_with("0, 0.5, 2"));
    }

    #[test]
    fn test_hidden_tics() {
        assert_eq!(AxisTics::hidden("x2").repr_with_font(&no_font()), "unset x2tics");
        let mut minor = MinorTics::new("y", true);
        assert_eq!(minor.repr(), "set mytics");
        minor.number(4);
        assert_eq!(minor.repr(), "set mytics 5");
        minor.hide();
        assert_eq!(minor.repr(), "unset mytics");
    }

    #[test]
    fn test_grid() {
        let mut grid = Grid::default();
        assert_eq!(grid.repr(), "");
        grid.show();
        assert_eq!(
            grid.repr(),
            "set grid back linetype 1 linewidth 1 linecolor '#d6d7d9' dashtype 0"
        );
        grid.mxtics().line_width(0.5);
        assert!(grid.repr().ends_with(
            "set grid mxtics back , linetype 1 linewidth 0.5 linecolor '#d6d7d9' dashtype 0"
        ));
    }

    #[test]
    fn test_grid_per_tics_only() {
        let mut grid = Grid::default();
        grid.ytics().front();
        assert_eq!(
            grid.repr(),
            "unset grid\nset grid ytics front linetype 1 linewidth 1 linecolor '#d6d7d9' dashtype 0"
        );
    }

    #[test]
    fn test_border_bits() {
        let mut border = Border::default();
        assert_eq!(
            border.repr(),
            "set border 3 front linetype 1 linewidth 2 linecolor '#404040'"
        );
        border.clear().top().right().back();
        assert!(border.repr().starts_with("set border 12 back"));
    }

    #[test]
    fn test_default_legend() {
        let legend = Legend::default();
        assert_eq!(
            legend.repr_with_font(&no_font()),
            "set key inside right top noopaque nobox vertical Left noinvert reverse \
             width 0 height 0 samplen 4 spacing 1 enhanced textcolor '#404040' \
             maxrows auto maxcols auto"
        );
    }

    #[test]
    fn test_legend_options() {
        let mut legend = Legend::default();
        legend.at_outside_bottom().horizontal_display().horizontal_max_cols(3);
        legend.frame().show(true);
        legend.header("Series");
        let text = legend.repr_with_font(&FontSpecs { name: Some("Arial".into()), size: None });
        assert!(text.starts_with("set key bmargin center noopaque box linetype 1"));
        assert!(text.contains("horizontal"));
        assert!(text.contains("font 'Arial,' title 'Series' enhanced textcolor '#404040' font 'Arial,'"));
        assert!(text.ends_with("maxrows auto maxcols 3"));
    }

    #[test]
    fn test_hidden_legend() {
        let mut legend = Legend::default();
        legend.hide();
        assert_eq!(legend.repr_with_font(&no_font()), "unset key");
    }
}
