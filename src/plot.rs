//! Plots: an ordered list of draw specifications plus the axes, decorations
//! and data file they share.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use anyhow::{bail, Result};
use log::debug;

use crate::dataset::{ColumnData, DataFile};
use crate::decor::{edges, AxisLabel, AxisTics, Border, Grid, Legend, MinorTics, Tics};
use crate::draw::{ColumnIndex, DrawSpec, DrawStyle};
use crate::format::{banner, num, MISSING_VALUE};
use crate::options::{FillBorder, FillMode, FillSpecs, FontOptions, FontSpecs, LineOptions};
use crate::palette::PaletteCatalog;
use crate::session::Session;

/// Number of line styles cleared before a plot installs its own palette.
const PALETTE_STYLE_SLOTS: usize = 20;

// =============================================================================
// Axis ranges
// =============================================================================

/// One end of an axis range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Value(f64),
    /// Autoscale, written as `*`.
    Auto,
    /// Leave the current value untouched, written as nothing.
    Keep,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Value(v) => write!(f, "{}", num(*v)),
            Bound::Auto => write!(f, "*"),
            Bound::Keep => Ok(()),
        }
    }
}

impl From<f64> for Bound {
    fn from(v: f64) -> Self {
        Bound::Value(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: Bound,
    pub max: Bound,
}

impl Range {
    /// Both bounds must be finite when given as numbers.
    pub fn new(min: impl Into<Bound>, max: impl Into<Bound>) -> Result<Self> {
        let range = Self {
            min: min.into(),
            max: max.into(),
        };
        for bound in [range.min, range.max] {
            if let Bound::Value(v) = bound {
                if !v.is_finite() {
                    bail!("Axis range bounds must be finite, got {}", v);
                }
            }
        }
        Ok(range)
    }

    pub fn auto() -> Self {
        Self {
            min: Bound::Auto,
            max: Bound::Auto,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.min, self.max)
    }
}

// =============================================================================
// Plot
// =============================================================================

#[derive(Debug, Clone)]
pub struct Plot {
    data: DataFile,
    palette: Option<String>,
    inherited_palette: Option<String>,
    font: FontSpecs,
    xrange: Option<Range>,
    yrange: Option<Range>,
    xlabel: AxisLabel,
    ylabel: AxisLabel,
    border: Border,
    grid: Grid,
    style_fill: FillSpecs,
    tics: Tics,
    xtics_bottom: AxisTics,
    xtics_top: AxisTics,
    ytics_left: AxisTics,
    ytics_right: AxisTics,
    mxtics_bottom: MinorTics,
    mxtics_top: MinorTics,
    mytics_left: MinorTics,
    mytics_right: MinorTics,
    legend: Legend,
    boxwidth: Option<String>,
    samples: Option<u32>,
    draws: Vec<DrawSpec>,
    commands: Vec<String>,
}

macro_rules! two_column_draws {
    ($($(#[$meta:meta])* $name:ident => $style:expr;)*) => {
        $(
            $(#[$meta])*
            pub fn $name<'a>(
                &mut self,
                x: impl Into<ColumnData<'a>>,
                y: impl Into<ColumnData<'a>>,
            ) -> Result<&mut DrawSpec> {
                self.add_draw_from_vectors($style, &[x.into(), y.into()])
            }
        )*
    };
}

macro_rules! three_column_draws {
    ($($name:ident => $style:expr;)*) => {
        $(
            pub fn $name<'a>(
                &mut self,
                x: impl Into<ColumnData<'a>>,
                y: impl Into<ColumnData<'a>>,
                delta: impl Into<ColumnData<'a>>,
            ) -> Result<&mut DrawSpec> {
                self.add_draw_from_vectors($style, &[x.into(), y.into(), delta.into()])
            }
        )*
    };
}

impl Plot {
    pub fn new(session: &Session) -> Self {
        Self {
            data: DataFile::new(session),
            palette: None,
            inherited_palette: None,
            font: FontSpecs::default(),
            xrange: None,
            yrange: None,
            xlabel: AxisLabel::new("x"),
            ylabel: AxisLabel::new("y"),
            border: Border::default(),
            grid: Grid::default(),
            style_fill: FillSpecs {
                mode: Some(FillMode::Solid(None)),
                border: Some(FillBorder::Hidden),
                ..FillSpecs::default()
            },
            tics: Tics::default(),
            xtics_bottom: AxisTics::new("x"),
            xtics_top: AxisTics::hidden("x2"),
            ytics_left: AxisTics::new("y"),
            ytics_right: AxisTics::hidden("y2"),
            mxtics_bottom: MinorTics::new("x", true),
            mxtics_top: MinorTics::new("x2", false),
            mytics_left: MinorTics::new("y", true),
            mytics_right: MinorTics::new("y2", false),
            legend: Legend::default(),
            boxwidth: Some("0.9 relative".to_string()),
            samples: None,
            draws: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Identifier shared with the plot's data file name.
    pub fn id(&self) -> usize {
        self.data.id()
    }

    pub fn data_path(&self) -> &Path {
        self.data.path()
    }

    pub fn data_file(&self) -> &DataFile {
        &self.data
    }

    pub fn flush_data(&mut self) -> Result<()> {
        self.data.flush()
    }

    // -------------------------------------------------------------------------
    // Draws
    // -------------------------------------------------------------------------

    /// Append a draw specification that already has a source. Unless the
    /// caller picked one, its line style becomes its 1-based position.
    pub fn add_draw(&mut self, mut spec: DrawSpec) -> Result<&mut DrawSpec> {
        if spec.source().is_none() {
            bail!("Draw specification has no source; attach an expression, file or dataset first");
        }
        if spec.line().style.is_none() {
            spec.line_style(self.draws.len() + 1);
        }
        self.draws.push(spec);
        let last = self.draws.len() - 1;
        Ok(&mut self.draws[last])
    }

    /// Draw a function such as `sin(x)`.
    pub fn add_draw_from_expression(&mut self, expression: &str) -> Result<&mut DrawSpec> {
        let mut spec = DrawSpec::new(DrawStyle::Lines);
        spec.attach_expression(expression)?;
        self.add_draw(spec)
    }

    /// Write `columns` as a new dataset block and draw from it.
    ///
    /// When the first column holds labels they become x tic labels and the
    /// row number serves as x.
    pub fn add_draw_from_vectors(
        &mut self,
        style: DrawStyle,
        columns: &[ColumnData],
    ) -> Result<&mut DrawSpec> {
        if columns.is_empty() {
            bail!("Drawing from vectors needs at least one column");
        }
        let mut using: Vec<String> = (1..=columns.len()).map(|i| i.to_string()).collect();
        if columns[0].is_labels() {
            using[0] = "0".to_string();
            using.push("xtic(1)".to_string());
        }
        let index = self.data.append_block(columns)?;
        let mut spec = DrawSpec::new(style);
        spec.attach_dataset(index, Some(using.join(":")))?;
        self.add_draw(spec)
    }

    pub fn add_draw_from_file(
        &mut self,
        path: &str,
        style: DrawStyle,
        columns: &[ColumnIndex],
    ) -> Result<&mut DrawSpec> {
        let mut spec = DrawSpec::new(style);
        spec.attach_file_columns(path, columns)?;
        self.add_draw(spec)
    }

    two_column_draws! {
        draw_curve => DrawStyle::Lines;
        draw_curve_with_points => DrawStyle::LinesPoints;
        draw_points => DrawStyle::Points;
        draw_dots => DrawStyle::Dots;
        draw_impulses => DrawStyle::Impulses;
        draw_boxes => DrawStyle::Boxes;
        draw_steps => DrawStyle::Steps;
        /// Steps that change y before x.
        draw_steps_change_first_y => DrawStyle::FSteps;
        draw_steps_histogram => DrawStyle::HiSteps;
        draw_steps_filled => DrawStyle::FillSteps;
        draw_curve_filled => DrawStyle::FilledCurves;
    }

    three_column_draws! {
        draw_error_bars_x => DrawStyle::XErrorBars;
        draw_error_bars_y => DrawStyle::YErrorBars;
        draw_curve_with_error_bars_x => DrawStyle::XErrorLines;
        draw_curve_with_error_bars_y => DrawStyle::YErrorLines;
        draw_boxes_with_error_bars_y => DrawStyle::BoxErrorBars;
    }

    pub fn draw_error_bars_xy<'a>(
        &mut self,
        x: impl Into<ColumnData<'a>>,
        y: impl Into<ColumnData<'a>>,
        xdelta: impl Into<ColumnData<'a>>,
        ydelta: impl Into<ColumnData<'a>>,
    ) -> Result<&mut DrawSpec> {
        let columns = [x.into(), y.into(), xdelta.into(), ydelta.into()];
        self.add_draw_from_vectors(DrawStyle::XYErrorBars, &columns)
    }

    pub fn draw_curve_with_error_bars_xy<'a>(
        &mut self,
        x: impl Into<ColumnData<'a>>,
        y: impl Into<ColumnData<'a>>,
        xdelta: impl Into<ColumnData<'a>>,
        ydelta: impl Into<ColumnData<'a>>,
    ) -> Result<&mut DrawSpec> {
        let columns = [x.into(), y.into(), xdelta.into(), ydelta.into()];
        self.add_draw_from_vectors(DrawStyle::XYErrorLines, &columns)
    }

    /// One bar per value, laid out by `set style data histogram`.
    pub fn draw_histogram<'a>(&mut self, values: impl Into<ColumnData<'a>>) -> Result<&mut DrawSpec> {
        self.add_draw_from_vectors(DrawStyle::Histograms, &[values.into()])
    }

    /// Remove the draw at `index`. Dataset blocks and the line styles of the
    /// remaining draws are left as they are.
    pub fn remove_draw(&mut self, index: usize) -> Option<DrawSpec> {
        if index < self.draws.len() {
            Some(self.draws.remove(index))
        } else {
            None
        }
    }

    /// Drop every draw and custom command.
    pub fn clear(&mut self) -> &mut Self {
        self.draws.clear();
        self.commands.clear();
        self
    }

    pub fn draws(&self) -> &[DrawSpec] {
        &self.draws
    }

    pub fn draw_mut(&mut self, index: usize) -> Option<&mut DrawSpec> {
        self.draws.get_mut(index)
    }

    // -------------------------------------------------------------------------
    // Axes and decorations
    // -------------------------------------------------------------------------

    pub fn xrange(&mut self, min: impl Into<Bound>, max: impl Into<Bound>) -> Result<&mut Self> {
        self.xrange = Some(Range::new(min, max)?);
        Ok(self)
    }

    pub fn yrange(&mut self, min: impl Into<Bound>, max: impl Into<Bound>) -> Result<&mut Self> {
        self.yrange = Some(Range::new(min, max)?);
        Ok(self)
    }

    pub fn set_xrange(&mut self, range: Range) -> &mut Self {
        self.xrange = Some(range);
        self
    }

    pub fn set_yrange(&mut self, range: Range) -> &mut Self {
        self.yrange = Some(range);
        self
    }

    pub fn xlabel(&mut self, text: impl Into<String>) -> &mut AxisLabel {
        self.xlabel.text(text)
    }

    pub fn ylabel(&mut self, text: impl Into<String>) -> &mut AxisLabel {
        self.ylabel.text(text)
    }

    pub fn border(&mut self) -> &mut Border {
        &mut self.border
    }

    pub fn grid(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn legend(&mut self) -> &mut Legend {
        &mut self.legend
    }

    /// Settings shared by the tics of every axis.
    pub fn tics(&mut self) -> &mut Tics {
        &mut self.tics
    }

    pub fn xtics(&mut self) -> &mut AxisTics {
        &mut self.xtics_bottom
    }

    pub fn ytics(&mut self) -> &mut AxisTics {
        &mut self.ytics_left
    }

    pub fn xtics_top(&mut self) -> &mut AxisTics {
        &mut self.xtics_top
    }

    pub fn ytics_right(&mut self) -> &mut AxisTics {
        &mut self.ytics_right
    }

    pub fn mxtics(&mut self) -> &mut MinorTics {
        &mut self.mxtics_bottom
    }

    pub fn mytics(&mut self) -> &mut MinorTics {
        &mut self.mytics_left
    }

    pub fn mxtics_top(&mut self) -> &mut MinorTics {
        &mut self.mxtics_top
    }

    pub fn mytics_right(&mut self) -> &mut MinorTics {
        &mut self.mytics_right
    }

    /// Fill style applied to every filled series of the plot.
    pub fn style_fill(&mut self) -> &mut FillSpecs {
        &mut self.style_fill
    }

    pub fn boxwidth_absolute(&mut self, value: f64) -> &mut Self {
        self.boxwidth = Some(format!("{} absolute", num(value)));
        self
    }

    pub fn boxwidth_relative(&mut self, value: f64) -> &mut Self {
        self.boxwidth = Some(format!("{} relative", num(value)));
        self
    }

    /// Sampling rate for function expressions.
    pub fn samples(&mut self, count: u32) -> &mut Self {
        self.samples = Some(count);
        self
    }

    /// Append a raw command, emitted verbatim after the generated setup.
    pub fn gnuplot(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.push(command.into());
        self
    }

    // -------------------------------------------------------------------------
    // Palette
    // -------------------------------------------------------------------------

    /// Use the named palette for this plot. Takes precedence over a palette
    /// set on the enclosing figure.
    pub fn palette(&mut self, name: &str) -> Result<&mut Self> {
        if name.trim().is_empty() {
            bail!("Palette name must not be empty");
        }
        self.palette = Some(name.to_string());
        Ok(self)
    }

    /// The palette this plot will install, if any.
    pub fn palette_name(&self) -> Option<&str> {
        self.palette.as_deref().or(self.inherited_palette.as_deref())
    }

    pub(crate) fn inherit_palette(&mut self, name: &str) {
        self.inherited_palette = Some(name.to_string());
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    /// Script text for this plot alone. Fails when the palette is unknown to
    /// `palettes`.
    pub fn serialize(&self, palettes: &dyn PaletteCatalog) -> Result<String> {
        self.compose(palettes, &FontSpecs::default(), None)
    }

    pub(crate) fn compose(
        &self,
        palettes: &dyn PaletteCatalog,
        parent_font: &FontSpecs,
        three: Option<&ThreeD>,
    ) -> Result<String> {
        let font = self.font.inherit(parent_font);
        let mut out = String::new();

        if let Some(name) = self.palette_name() {
            let text = palettes.lookup(name)?;
            out.push_str(&banner(&format!("PALETTE ({})", name)));
            out.push_str(&format!(
                "do for [i=1:{}] {{ unset style line i }}\n",
                PALETTE_STYLE_SLOTS
            ));
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }

        let mut setup: Vec<String> = Vec::new();
        if let Some(range) = &self.xrange {
            setup.push(format!("set xrange {}", range));
        }
        if let Some(range) = &self.yrange {
            setup.push(format!("set yrange {}", range));
        }
        if let Some(range) = three.and_then(|t| t.zrange.as_ref()) {
            setup.push(format!("set zrange {}", range));
        }
        setup.push(self.xlabel.repr_with_font(&font));
        setup.push(self.ylabel.repr_with_font(&font));
        if let Some(three) = three {
            setup.push(three.zlabel.repr_with_font(&font));
        }
        setup.push(self.border.repr());
        setup.push(self.grid.repr());
        let fill = self.style_fill.style_body();
        if !fill.is_empty() {
            setup.push(format!("set style fill {}", fill));
        }
        if self.draws.iter().any(|d| d.style() == DrawStyle::Histograms) {
            setup.push("set style data histogram".to_string());
        }
        setup.push(self.tics.repr_with_font(&font));
        for tics in [
            &self.xtics_bottom,
            &self.xtics_top,
            &self.ytics_left,
            &self.ytics_right,
        ] {
            setup.push(tics.repr_with_font(&font));
        }
        for minor in [
            &self.mxtics_bottom,
            &self.mxtics_top,
            &self.mytics_left,
            &self.mytics_right,
        ] {
            setup.push(minor.repr());
        }
        if let Some(three) = three {
            setup.push(three.ztics.repr_with_font(&font));
            setup.push(three.mztics.repr());
            if let Some((rot_x, rot_z)) = three.view {
                setup.push(format!("set view {},{}", num(rot_x), num(rot_z)));
            }
        }
        setup.push(self.legend.repr_with_font(&font));
        if let Some(width) = &self.boxwidth {
            setup.push(format!("set boxwidth {}", width));
        }
        if let Some(samples) = self.samples {
            setup.push(format!("set samples {}", samples));
        }
        if self.data.block_count() > 0 {
            setup.push(format!("set datafile missing {}", MISSING_VALUE));
        }

        out.push_str(&banner("SETUP COMMANDS"));
        for line in setup.iter().filter(|l| !l.is_empty()) {
            out.push_str(line);
            out.push('\n');
        }

        if !self.commands.is_empty() {
            out.push_str(&banner("CUSTOM EXPLICIT GNUPLOT COMMANDS"));
            for command in &self.commands {
                out.push_str(command);
                out.push('\n');
            }
        }

        out.push_str(&banner("PLOT COMMANDS"));
        if !self.draws.is_empty() {
            let keyword = if three.is_some() { "splot" } else { "plot" };
            let entries: Vec<String> = self
                .draws
                .iter()
                .map(|d| d.serialize(self.data.path()))
                .collect();
            out.push_str(&format!("{} {}\n", keyword, entries.join(", ")));
        }
        debug!("composed plot {} with {} draws", self.id(), self.draws.len());
        Ok(out)
    }
}

impl FontOptions for Plot {
    fn font_specs(&mut self) -> &mut FontSpecs {
        &mut self.font
    }
}

// =============================================================================
// 3D
// =============================================================================

/// Settings that only exist for plots with a z axis.
#[derive(Debug, Clone)]
pub struct ThreeD {
    zrange: Option<Range>,
    zlabel: AxisLabel,
    ztics: AxisTics,
    mztics: MinorTics,
    view: Option<(f64, f64)>,
}

impl Default for ThreeD {
    fn default() -> Self {
        Self {
            zrange: None,
            zlabel: AxisLabel::new("z"),
            ztics: AxisTics::new("z"),
            mztics: MinorTics::new("z", true),
            view: None,
        }
    }
}

/// A plot drawn with `splot`. Dereferences to [`Plot`] for everything the
/// two kinds share.
#[derive(Debug, Clone)]
pub struct Plot3D {
    plot: Plot,
    three: ThreeD,
}

impl Plot3D {
    pub fn new(session: &Session) -> Self {
        let mut plot = Plot::new(session);
        plot.border().clear().edge(
            edges::BOTTOM_LEFT_FRONT
                | edges::BOTTOM_LEFT_BACK
                | edges::BOTTOM_RIGHT_FRONT
                | edges::BOTTOM_RIGHT_BACK
                | edges::LEFT_VERTICAL,
        );
        Self {
            plot,
            three: ThreeD::default(),
        }
    }

    pub fn zrange(&mut self, min: impl Into<Bound>, max: impl Into<Bound>) -> Result<&mut Self> {
        self.three.zrange = Some(Range::new(min, max)?);
        Ok(self)
    }

    pub fn zlabel(&mut self, text: impl Into<String>) -> &mut AxisLabel {
        self.three.zlabel.text(text)
    }

    pub fn ztics(&mut self) -> &mut AxisTics {
        &mut self.three.ztics
    }

    pub fn mztics(&mut self) -> &mut MinorTics {
        &mut self.three.mztics
    }

    /// Viewing angles in degrees, rotation about x then about z.
    pub fn view(&mut self, rot_x: f64, rot_z: f64) -> &mut Self {
        self.three.view = Some((rot_x, rot_z));
        self
    }

    pub fn serialize(&self, palettes: &dyn PaletteCatalog) -> Result<String> {
        self.compose(palettes, &FontSpecs::default())
    }

    pub(crate) fn compose(&self, palettes: &dyn PaletteCatalog, parent_font: &FontSpecs) -> Result<String> {
        self.plot.compose(palettes, parent_font, Some(&self.three))
    }
}

impl Deref for Plot3D {
    type Target = Plot;

    fn deref(&self) -> &Plot {
        &self.plot
    }
}

impl DerefMut for Plot3D {
    fn deref_mut(&mut self) -> &mut Plot {
        &mut self.plot
    }
}
