//! Figures: a grid of plots drawn together on one page.

use anyhow::{bail, Result};

use crate::format::{banner, quoted};
use crate::options::{FontOptions, FontSpecs};
use crate::palette::PaletteCatalog;
use crate::plot::{Plot, Plot3D};

/// The kinds of plot a figure can hold.
#[derive(Debug, Clone)]
pub enum PlotCell {
    Plot(Plot),
    Plot3D(Plot3D),
}

impl PlotCell {
    /// The shared 2D part of the cell.
    pub fn plot(&self) -> &Plot {
        match self {
            PlotCell::Plot(plot) => plot,
            PlotCell::Plot3D(plot) => &**plot,
        }
    }

    pub fn plot_mut(&mut self) -> &mut Plot {
        match self {
            PlotCell::Plot(plot) => plot,
            PlotCell::Plot3D(plot) => &mut **plot,
        }
    }

    fn compose(&self, palettes: &dyn PaletteCatalog, font: &FontSpecs) -> Result<String> {
        match self {
            PlotCell::Plot(plot) => plot.compose(palettes, font, None),
            PlotCell::Plot3D(plot) => plot.compose(palettes, font),
        }
    }
}

impl From<Plot> for PlotCell {
    fn from(plot: Plot) -> Self {
        PlotCell::Plot(plot)
    }
}

impl From<Plot3D> for PlotCell {
    fn from(plot: Plot3D) -> Self {
        PlotCell::Plot3D(plot)
    }
}

/// Copies the plot; the copy gets its own data file.
impl From<&Plot> for PlotCell {
    fn from(plot: &Plot) -> Self {
        PlotCell::Plot(plot.clone())
    }
}

impl From<&Plot3D> for PlotCell {
    fn from(plot: &Plot3D) -> Self {
        PlotCell::Plot3D(plot.clone())
    }
}

#[derive(Debug, Clone)]
pub struct Figure {
    cells: Vec<Vec<PlotCell>>,
    rows: usize,
    cols: usize,
    title: Option<String>,
    palette: Option<String>,
    font: FontSpecs,
}

impl Figure {
    /// Build a figure from rows of plots. The column count is the length of
    /// the longest row.
    pub fn from_grid<P: Into<PlotCell>>(grid: Vec<Vec<P>>) -> Self {
        let cells: Vec<Vec<PlotCell>> = grid
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let rows = cells.len();
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            cells,
            rows,
            cols,
            title: None,
            palette: None,
            font: FontSpecs::default(),
        }
    }

    /// Rows and columns of the layout.
    pub fn layout(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Palette for every plot that does not name its own.
    pub fn palette(&mut self, name: &str) -> Result<&mut Self> {
        if name.trim().is_empty() {
            bail!("Palette name must not be empty");
        }
        self.palette = Some(name.to_string());
        for cell in self.cells.iter_mut().flatten() {
            cell.plot_mut().inherit_palette(name);
        }
        Ok(self)
    }

    pub fn palette_name(&self) -> Option<&str> {
        self.palette.as_deref()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&PlotCell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut PlotCell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn cells(&self) -> impl Iterator<Item = &PlotCell> {
        self.cells.iter().flatten()
    }

    pub fn flush_data(&mut self) -> Result<()> {
        for cell in self.cells.iter_mut().flatten() {
            cell.plot_mut().flush_data()?;
        }
        Ok(())
    }

    /// Script text of every plot, wrapped in a multiplot block when there
    /// is more than one.
    pub fn serialize(&self, palettes: &dyn PaletteCatalog) -> Result<String> {
        let multiplot = self.cell_count() > 1;
        let mut out = String::new();
        if multiplot {
            out.push_str(&banner("MULTIPLOT"));
            out.push_str(&format!(
                "set multiplot layout {},{} rowsfirst downwards",
                self.rows, self.cols
            ));
            if let Some(title) = &self.title {
                out.push_str(&format!(" title {}", quoted(title)));
            }
            out.push('\n');
        } else if let Some(title) = &self.title {
            out.push_str(&format!("set title {}\n", quoted(title)));
        }
        for cell in self.cells() {
            out.push_str(&cell.compose(palettes, &self.font)?);
        }
        if multiplot {
            out.push_str("unset multiplot\n");
        }
        Ok(out)
    }
}

/// Font for every plot that does not set its own.
impl FontOptions for Figure {
    fn font_specs(&mut self) -> &mut FontSpecs {
        &mut self.font
    }
}
