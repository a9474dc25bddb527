use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};

use plotscript::data::PlotData;
use plotscript::{
    parser, Canvas, ColumnData, ColumnIndex, DrawStyle, Figure, Plot, RenderConfig, RenderTarget,
    Session,
};

#[derive(Parser, Debug)]
#[command(name = "plotscript")]
#[command(about = "Plot columns of CSV or JSON data read from stdin through gnuplot", long_about = None)]
struct Args {
    /// Column used for x, by number or header name
    #[arg(long, default_value = "1")]
    x: String,

    /// Columns drawn against x. Defaults to every other numeric column
    #[arg(long)]
    y: Vec<String>,

    /// Column list for a single draw, e.g. "1:3" or "'time':'temp'". Overrides --x and --y
    #[arg(long)]
    using: Option<String>,

    /// Draw style (lines, points, linespoints, boxes, steps, ...)
    #[arg(long, default_value = "lines")]
    style: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    xlabel: Option<String>,

    #[arg(long)]
    ylabel: Option<String>,

    /// Range such as "[0:10]", "[*:5]" or "[:2]"
    #[arg(long)]
    xrange: Option<String>,

    #[arg(long)]
    yrange: Option<String>,

    /// Palette name, e.g. dark2, set1 or viridis
    #[arg(long)]
    palette: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// JSON file with render settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save to this file; the extension picks the format
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the generated script instead of rendering it
    #[arg(long)]
    emit_script: bool,

    /// Read stdin as a JSON array of objects instead of CSV
    #[arg(long)]
    json: bool,
}

/// A bare number picks by position, anything else by header.
fn selector(text: &str) -> ColumnIndex {
    match text.trim().parse::<usize>() {
        Ok(n) => ColumnIndex::Number(n),
        Err(_) => ColumnIndex::Name(text.trim().to_string()),
    }
}

fn read_input(json: bool) -> Result<PlotData> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read data from stdin")?;
    if json {
        let value: serde_json::Value =
            serde_json::from_str(&input).context("Failed to parse JSON from stdin")?;
        PlotData::from_json(&value)
    } else {
        PlotData::from_csv_reader(input.as_bytes())
    }
}

/// Values of the x column: numbers when they all parse, labels otherwise.
enum XColumn {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

impl XColumn {
    fn read(data: &PlotData, selector: &ColumnIndex) -> Result<Self> {
        if data.is_numeric(selector)? {
            Ok(XColumn::Numbers(data.numeric_column(selector)?))
        } else {
            Ok(XColumn::Labels(data.text_column(selector)?))
        }
    }

    fn as_column(&self) -> ColumnData<'_> {
        match self {
            XColumn::Numbers(v) => ColumnData::Numbers(v),
            XColumn::Labels(v) => ColumnData::Labels(v),
        }
    }
}

fn add_draws(plot: &mut Plot, data: &PlotData, args: &Args, style: DrawStyle) -> Result<()> {
    if let Some(using) = &args.using {
        let selectors = parser::columns(using)?;
        let x = XColumn::read(data, &selectors[0])?;
        let rest: Vec<Vec<f64>> = selectors[1..]
            .iter()
            .map(|s| data.numeric_column(s))
            .collect::<Result<_>>()?;
        let mut columns = vec![x.as_column()];
        columns.extend(rest.iter().map(|v| ColumnData::Numbers(v)));
        let label = match selectors.get(1) {
            Some(s) => data.header(s)?.to_string(),
            None => data.header(&selectors[0])?.to_string(),
        };
        plot.add_draw_from_vectors(style, &columns)?.label(label);
        return Ok(());
    }

    let x_selector = selector(&args.x);
    let x_position = data.column_position(&x_selector)?;
    let y_selectors: Vec<ColumnIndex> = if args.y.is_empty() {
        let mut found = Vec::new();
        for position in (0..data.headers.len()).filter(|&p| p != x_position) {
            let candidate = ColumnIndex::Number(position + 1);
            if data.is_numeric(&candidate)? {
                found.push(candidate);
            } else {
                debug!("skipping non-numeric column '{}'", data.headers[position]);
            }
        }
        found
    } else {
        args.y.iter().map(|s| selector(s)).collect()
    };
    if y_selectors.is_empty() {
        bail!("No numeric columns to plot against '{}'", data.headers[x_position]);
    }

    let x = XColumn::read(data, &x_selector)?;
    for y_selector in &y_selectors {
        let y = data.numeric_column(y_selector)?;
        let label = data.header(y_selector)?.to_string();
        plot.add_draw_from_vectors(style, &[x.as_column(), ColumnData::Numbers(&y)])?
            .label(label);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    let session = Session::new(config);

    let data = read_input(args.json)?;
    info!("read {} rows with columns {:?}", data.rows.len(), data.headers);

    let style: DrawStyle = args.style.parse()?;
    let mut plot = Plot::new(&session);
    add_draws(&mut plot, &data, &args, style)?;

    if let Some(text) = &args.xlabel {
        plot.xlabel(text.as_str());
    }
    if let Some(text) = &args.ylabel {
        plot.ylabel(text.as_str());
    }
    if let Some(range) = &args.xrange {
        plot.set_xrange(parser::range(range)?);
    }
    if let Some(range) = &args.yrange {
        plot.set_yrange(parser::range(range)?);
    }

    let mut figure = Figure::from_grid(vec![vec![plot]]);
    if let Some(title) = &args.title {
        figure.title(title.as_str());
    }
    if let Some(name) = &args.palette {
        figure.palette(name)?;
    }

    let mut canvas = Canvas::new(&session, vec![vec![figure]]);
    let (width, height) = (
        args.width.unwrap_or(session.config().width),
        args.height.unwrap_or(session.config().height),
    );
    canvas.size(width, height);

    if args.emit_script {
        let target = match &args.output {
            Some(path) => RenderTarget::File(path.clone()),
            None => RenderTarget::Interactive,
        };
        print!("{}", canvas.script(&target)?);
        return Ok(());
    }

    match &args.output {
        Some(path) => canvas
            .save(path)
            .with_context(|| format!("Failed to save plot to '{}'", path.display()))?,
        None => canvas.show().context("Failed to show plot")?,
    }
    Ok(())
}
