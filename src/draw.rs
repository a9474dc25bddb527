//! Draw specifications: one plotted series each.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::format::{collapse_whitespace, join_fragments, keyword_value, quoted};
use crate::options::{
    merge_layers, FillOptions, FillSpecs, LineOptions, LineSpecs, PointOptions, PointSpecs,
    DEFAULT_LINE_WIDTH,
};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStyle {
    Lines,
    LinesPoints,
    Points,
    Dots,
    Impulses,
    Boxes,
    BoxErrorBars,
    Steps,
    FSteps,
    HiSteps,
    FillSteps,
    FilledCurves,
    XErrorBars,
    YErrorBars,
    XYErrorBars,
    XErrorLines,
    YErrorLines,
    XYErrorLines,
    /// Drawn through `set style data histogram`, so no `with` clause.
    Histograms,
}

impl DrawStyle {
    pub fn keyword(&self) -> &'static str {
        match self {
            DrawStyle::Lines => "lines",
            DrawStyle::LinesPoints => "linespoints",
            DrawStyle::Points => "points",
            DrawStyle::Dots => "dots",
            DrawStyle::Impulses => "impulses",
            DrawStyle::Boxes => "boxes",
            DrawStyle::BoxErrorBars => "boxerrorbars",
            DrawStyle::Steps => "steps",
            DrawStyle::FSteps => "fsteps",
            DrawStyle::HiSteps => "histeps",
            DrawStyle::FillSteps => "fillsteps",
            DrawStyle::FilledCurves => "filledcurves",
            DrawStyle::XErrorBars => "xerrorbars",
            DrawStyle::YErrorBars => "yerrorbars",
            DrawStyle::XYErrorBars => "xyerrorbars",
            DrawStyle::XErrorLines => "xerrorlines",
            DrawStyle::YErrorLines => "yerrorlines",
            DrawStyle::XYErrorLines => "xyerrorlines",
            DrawStyle::Histograms => "",
        }
    }
}

impl FromStr for DrawStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let style = match s.trim().to_ascii_lowercase().as_str() {
            "lines" => DrawStyle::Lines,
            "linespoints" => DrawStyle::LinesPoints,
            "points" => DrawStyle::Points,
            "dots" => DrawStyle::Dots,
            "impulses" => DrawStyle::Impulses,
            "boxes" => DrawStyle::Boxes,
            "boxerrorbars" => DrawStyle::BoxErrorBars,
            "steps" => DrawStyle::Steps,
            "fsteps" => DrawStyle::FSteps,
            "histeps" => DrawStyle::HiSteps,
            "fillsteps" => DrawStyle::FillSteps,
            "filledcurves" => DrawStyle::FilledCurves,
            "xerrorbars" => DrawStyle::XErrorBars,
            "yerrorbars" => DrawStyle::YErrorBars,
            "xyerrorbars" => DrawStyle::XYErrorBars,
            "xerrorlines" => DrawStyle::XErrorLines,
            "yerrorlines" => DrawStyle::YErrorLines,
            "xyerrorlines" => DrawStyle::XYErrorLines,
            "histogram" | "histograms" => DrawStyle::Histograms,
            other => bail!("Unknown draw style '{}'", other),
        };
        Ok(style)
    }
}

/// Region filled by a `filledcurves` series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilledCurvesMode {
    Above,
    Below,
}

/// Legend entry of a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Label {
    /// Let the renderer pick one from the source.
    #[default]
    Default,
    Text(String),
    ColumnHeader(Option<usize>),
    None,
}

impl Label {
    fn repr(&self) -> String {
        match self {
            Label::Default => String::new(),
            Label::Text(text) => format!("title {}", quoted(text)),
            Label::ColumnHeader(None) => "title columnheader".to_string(),
            Label::ColumnHeader(Some(n)) => format!("title columnheader({})", n),
            Label::None => "notitle".to_string(),
        }
    }
}

/// Column selector within a data source.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnIndex {
    /// 1-based column number; 0 is the renderer's row counter.
    Number(usize),
    /// Column picked by its header.
    Name(String),
    /// Expression over columns, such as `$2*10`.
    Expr(String),
}

impl fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnIndex::Number(n) => write!(f, "{}", n),
            ColumnIndex::Name(name) => write!(f, "'{}'", name),
            ColumnIndex::Expr(expr) => write!(f, "({})", expr),
        }
    }
}

impl From<usize> for ColumnIndex {
    fn from(n: usize) -> Self {
        ColumnIndex::Number(n)
    }
}

impl From<&str> for ColumnIndex {
    fn from(name: &str) -> Self {
        ColumnIndex::Name(name.to_string())
    }
}

/// Join selectors into a `using` clause body.
pub fn using_columns(columns: &[ColumnIndex]) -> String {
    columns.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(":")
}

/// Where the values of a series come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Expression(String),
    File(String),
    /// Block of the owning plot's data file.
    Dataset(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawSpec {
    source: Option<DataSource>,
    using: Option<String>,
    style: DrawStyle,
    label: Label,
    xtic: Option<ColumnIndex>,
    ytic: Option<ColumnIndex>,
    filled: Option<FilledCurvesMode>,
    line: LineSpecs,
    point: PointSpecs,
    fill: FillSpecs,
}

impl Default for DrawSpec {
    fn default() -> Self {
        Self::new(DrawStyle::Lines)
    }
}

impl DrawSpec {
    pub fn new(style: DrawStyle) -> Self {
        Self {
            source: None,
            using: None,
            style,
            label: Label::Default,
            xtic: None,
            ytic: None,
            filled: None,
            line: LineSpecs {
                width: Some(DEFAULT_LINE_WIDTH),
                ..LineSpecs::default()
            },
            point: PointSpecs::default(),
            fill: FillSpecs::default(),
        }
    }

    fn set_source(&mut self, source: DataSource, using: Option<String>) -> Result<&mut Self> {
        if let Some(existing) = &self.source {
            bail!(
                "Draw specification already has a source ({:?}); refusing to attach {:?}",
                existing,
                source
            );
        }
        self.source = Some(source);
        self.using = using.filter(|u| !u.is_empty());
        Ok(self)
    }

    pub fn attach_expression(&mut self, expression: &str) -> Result<&mut Self> {
        if expression.trim().is_empty() {
            bail!("Expression for a draw specification must not be empty");
        }
        self.set_source(DataSource::Expression(expression.to_string()), None)
    }

    pub fn attach_file_columns(&mut self, path: &str, columns: &[ColumnIndex]) -> Result<&mut Self> {
        if path.trim().is_empty() {
            bail!("Data file path for a draw specification must not be empty");
        }
        self.set_source(DataSource::File(path.to_string()), Some(using_columns(columns)))
    }

    /// Point at block `index` of the owning plot's data file.
    pub fn attach_dataset(&mut self, index: usize, using: Option<String>) -> Result<&mut Self> {
        self.set_source(DataSource::Dataset(index), using)
    }

    pub fn source(&self) -> Option<&DataSource> {
        self.source.as_ref()
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    pub fn line(&self) -> &LineSpecs {
        &self.line
    }

    pub fn with_style(&mut self, style: DrawStyle) -> &mut Self {
        self.style = style;
        self
    }

    pub fn label(&mut self, text: impl Into<String>) -> &mut Self {
        self.label = Label::Text(text.into());
        self
    }

    pub fn label_from_column_header(&mut self) -> &mut Self {
        self.label = Label::ColumnHeader(None);
        self
    }

    pub fn label_from_column(&mut self, column: usize) -> &mut Self {
        self.label = Label::ColumnHeader(Some(column));
        self
    }

    pub fn label_none(&mut self) -> &mut Self {
        self.label = Label::None;
        self
    }

    pub fn label_default(&mut self) -> &mut Self {
        self.label = Label::Default;
        self
    }

    /// Take x tic labels from a column of the source.
    pub fn xtics(&mut self, column: impl Into<ColumnIndex>) -> &mut Self {
        self.xtic = Some(column.into());
        self
    }

    pub fn ytics(&mut self, column: impl Into<ColumnIndex>) -> &mut Self {
        self.ytic = Some(column.into());
        self
    }

    pub fn fill_above(&mut self) -> &mut Self {
        self.filled = Some(FilledCurvesMode::Above);
        self
    }

    pub fn fill_below(&mut self) -> &mut Self {
        self.filled = Some(FilledCurvesMode::Below);
        self
    }

    /// Render as one entry of a `plot` command. Dataset sources resolve
    /// against `data_path`.
    pub fn serialize(&self, data_path: &Path) -> String {
        let what = match &self.source {
            Some(DataSource::Expression(expr)) => expr.clone(),
            Some(DataSource::File(path)) => quoted(path),
            Some(DataSource::Dataset(index)) => {
                format!("{} index {}", quoted(data_path.display()), index)
            }
            None => String::new(),
        };
        let mut using: Vec<String> = self.using.iter().cloned().collect();
        if let Some(col) = &self.xtic {
            using.push(format!("xtic(stringcolumn({}))", col));
        }
        if let Some(col) = &self.ytic {
            using.push(format!("ytic(stringcolumn({}))", col));
        }
        let using = using.join(":");
        let filled = match self.filled {
            Some(FilledCurvesMode::Above) => "above",
            Some(FilledCurvesMode::Below) => "below",
            None => "",
        };
        collapse_whitespace(&join_fragments([
            what,
            keyword_value("using", Some(using.as_str())),
            self.label.repr(),
            keyword_value("with", Some(self.style.keyword())),
            filled.to_string(),
            merge_layers(&[&self.line, &self.point, &self.fill]),
        ]))
    }
}

impl LineOptions for DrawSpec {
    fn line_specs(&mut self) -> &mut LineSpecs {
        &mut self.line
    }
}

impl PointOptions for DrawSpec {
    fn point_specs(&mut self) -> &mut PointSpecs {
        &mut self.point
    }
}

impl FillOptions for DrawSpec {
    fn fill_specs(&mut self) -> &mut FillSpecs {
        &mut self.fill
    }
}
