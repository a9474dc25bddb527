//! The top-level grid of figures and the render entry points.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};

use crate::figure::Figure;
use crate::format::{banner, num, quoted, sanitize_path};
use crate::options::{FontOptions, FontSpecs, Layer};
use crate::renderer::{GnuplotRenderer, Renderer};
use crate::session::Session;

/// Points per inch, used for terminals sized in inches.
const POINTS_PER_INCH: f64 = 72.0;

/// Where a canvas is rendered to.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderTarget {
    Interactive,
    File(PathBuf),
}

/// File formats picked from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Eps,
    Svg,
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        let format = match ext.to_ascii_lowercase().as_str() {
            "pdf" => OutputFormat::Pdf,
            "eps" => OutputFormat::Eps,
            "svg" => OutputFormat::Svg,
            "png" => OutputFormat::Png,
            "jpeg" | "jpg" => OutputFormat::Jpeg,
            _ => bail!("Unsupported output format '{}'", ext),
        };
        Ok(format)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn terminal(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdfcairo",
            OutputFormat::Eps => "epscairo",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "pngcairo",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// `width,height`, in inches for PDF and in points otherwise.
    pub fn size(&self, width: u32, height: u32) -> String {
        match self {
            OutputFormat::Pdf => format!(
                "{}in,{}in",
                num(f64::from(width) / POINTS_PER_INCH),
                num(f64::from(height) / POINTS_PER_INCH)
            ),
            _ => format!("{},{}", width, height),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.terminal())
    }
}

pub struct Canvas {
    session: Session,
    script_path: PathBuf,
    figures: Vec<Vec<Figure>>,
    width: u32,
    height: u32,
    title: Option<String>,
    font: FontSpecs,
    default_palette: String,
    autoclean: bool,
}

impl Canvas {
    /// Build a canvas from rows of figures. Size, default palette and
    /// autoclean start from the session's configuration.
    pub fn new(session: &Session, figures: Vec<Vec<Figure>>) -> Self {
        let config = session.config();
        let id = session.next_id();
        Self {
            session: session.clone(),
            script_path: session.script_path(id),
            figures,
            width: config.width,
            height: config.height,
            title: None,
            font: FontSpecs::default(),
            default_palette: config.default_palette.clone(),
            autoclean: config.autoclean,
        }
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn size(&mut self, width: u32, height: u32) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Window title. Only interactive rendering shows it.
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Palette installed before any figure. An empty name installs none.
    pub fn default_palette(&mut self, name: impl Into<String>) -> &mut Self {
        self.default_palette = name.into();
        self
    }

    /// Remove the generated script and data files after rendering.
    pub fn autoclean(&mut self, enable: bool) -> &mut Self {
        self.autoclean = enable;
        self
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Figure> {
        self.figures.get(row).and_then(|r| r.get(col))
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Figure> {
        self.figures.get_mut(row).and_then(|r| r.get_mut(col))
    }

    fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.figures.iter().flatten()
    }

    fn terminal_section(&self, target: &RenderTarget) -> Result<String> {
        let mut out = banner("TERMINAL");
        match target {
            RenderTarget::Interactive => {
                out.push_str("set termoption enhanced\n");
                if self.font.is_set() {
                    out.push_str(&format!("set termoption {}\n", self.font.repr()));
                }
                let mut line = format!("set terminal GNUTERM size {},{}", self.width, self.height);
                if let Some(title) = &self.title {
                    line.push_str(&format!(" title {}", quoted(title)));
                }
                out.push_str(&line);
                out.push('\n');
                out.push_str("set encoding utf8\n");
            }
            RenderTarget::File(path) => {
                let cleaned = sanitize_path(&path.to_string_lossy());
                let format = OutputFormat::from_path(Path::new(&cleaned))?;
                if self.title.is_some() {
                    debug!("canvas title is not shown when rendering to {}", cleaned);
                }
                let line = format!(
                    "set terminal {} size {} enhanced rounded {}",
                    format.terminal(),
                    format.size(self.width, self.height),
                    self.font.repr()
                );
                out.push_str(line.trim_end());
                out.push('\n');
                out.push_str("set encoding utf8\n");
                out.push_str(&banner("OUTPUT"));
                out.push_str(&format!("set output {}\n", quoted(&cleaned)));
            }
        }
        Ok(out)
    }

    /// Compose the full script for `target` without writing anything.
    pub fn script(&self, target: &RenderTarget) -> Result<String> {
        let palettes = self.session.palettes();
        let mut out = String::new();
        if !self.default_palette.is_empty() {
            let text = palettes.lookup(&self.default_palette)?;
            out.push_str(&banner(&format!("PALETTE ({})", self.default_palette)));
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str(&self.terminal_section(target)?);
        for figure in self.figures() {
            out.push_str(&figure.serialize(palettes)?);
        }
        if let RenderTarget::File(_) = target {
            out.push_str("set output\n");
        }
        Ok(out)
    }

    /// Write data and script, then run `renderer` on the script.
    pub fn render_with(&mut self, target: &RenderTarget, renderer: &dyn Renderer) -> Result<()> {
        for figure in self.figures.iter_mut().flatten() {
            figure.flush_data()?;
        }
        let canvas = &*self;
        let _cleanup = canvas.autoclean.then(|| CleanupGuard { canvas });

        let script = canvas.script(target)?;
        fs::write(&canvas.script_path, &script).with_context(|| {
            format!("Failed to write script '{}'", canvas.script_path.display())
        })?;
        info!(
            "wrote {} ({} bytes) for {}",
            canvas.script_path.display(),
            script.len(),
            match target {
                RenderTarget::Interactive => "interactive display".to_string(),
                RenderTarget::File(path) => path.display().to_string(),
            }
        );

        let interactive = matches!(target, RenderTarget::Interactive);
        if !renderer.run(&canvas.script_path, interactive)? {
            bail!(
                "Renderer reported failure for script '{}'",
                canvas.script_path.display()
            );
        }
        Ok(())
    }

    /// Render through the configured gnuplot binary.
    pub fn render(&mut self, target: &RenderTarget) -> Result<()> {
        let renderer = GnuplotRenderer::from_config(self.session.config());
        self.render_with(target, &renderer)
    }

    pub fn show(&mut self) -> Result<()> {
        self.render(&RenderTarget::Interactive)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.render(&RenderTarget::File(path.as_ref().to_path_buf()))
    }

    /// Remove the script, every data file of the contained plots and any
    /// other data file the session wrote, such as those of plots that were
    /// copied into a figure. Plots that draw again rewrite their file.
    /// Failures are logged only.
    pub fn cleanup(&self) {
        let mut paths: BTreeSet<PathBuf> = self.session.take_generated_files().into_iter().collect();
        paths.insert(self.script_path.clone());
        let plots = self.figures().flat_map(|f| f.cells()).map(|c| c.plot());
        paths.extend(plots.map(|p| p.data_path().to_path_buf()));
        for path in &paths {
            match fs::remove_file(path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => {
                    warn!("failed to remove {}: {}", path.display(), e)
                }
                _ => {}
            }
        }
    }
}

impl FontOptions for Canvas {
    fn font_specs(&mut self) -> &mut FontSpecs {
        &mut self.font
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("script_path", &self.script_path)
            .field("figures", &self.figures.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

struct CleanupGuard<'a> {
    canvas: &'a Canvas,
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        self.canvas.cleanup();
    }
}
