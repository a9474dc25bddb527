use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;
use plotscript::{
    Canvas, ColumnData, DrawStyle, Figure, LineOptions, Plot, Plot3D, RenderConfig, RenderTarget,
    Renderer, Session,
};
use tempfile::TempDir;

/// What the renderer saw when it was invoked.
#[derive(Debug, Clone)]
struct Rendered {
    script: String,
    data_files: Vec<(PathBuf, String)>,
    interactive: bool,
}

/// Stands in for gnuplot: records the script and every data file next to it.
struct RecordingRenderer {
    succeed: bool,
    calls: RefCell<Vec<Rendered>>,
}

impl RecordingRenderer {
    fn new() -> Self {
        Self { succeed: true, calls: RefCell::new(Vec::new()) }
    }

    fn failing() -> Self {
        Self { succeed: false, calls: RefCell::new(Vec::new()) }
    }

    fn last(&self) -> Rendered {
        self.calls.borrow().last().cloned().expect("renderer was not invoked")
    }
}

impl Renderer for RecordingRenderer {
    fn run(&self, script: &Path, interactive: bool) -> Result<bool> {
        let dir = script.parent().unwrap_or(Path::new("."));
        let mut data_files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "dat") {
                let contents = fs::read_to_string(&path)?;
                data_files.push((path, contents));
            }
        }
        data_files.sort();
        self.calls.borrow_mut().push(Rendered {
            script: fs::read_to_string(script)?,
            data_files,
            interactive,
        });
        Ok(self.succeed)
    }
}

fn session_in(dir: &TempDir) -> Session {
    Session::new(RenderConfig {
        workdir: Some(dir.path().to_path_buf()),
        ..RenderConfig::default()
    })
}

fn single(plot: Plot) -> Vec<Vec<Figure>> {
    vec![vec![Figure::from_grid(vec![vec![plot]])]]
}

fn files_in(dir: &TempDir) -> Vec<PathBuf> {
    fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[test_log::test]
fn test_vectors_reach_the_data_file_and_script() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.draw_curve(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0])
        .unwrap()
        .label("squares");
    let data_path = plot.data_path().to_path_buf();

    let mut canvas = Canvas::new(&session, single(plot));
    let renderer = RecordingRenderer::new();
    let target = RenderTarget::File(dir.path().join("out.png"));
    canvas.render_with(&target, &renderer).unwrap();

    let rendered = renderer.last();
    assert!(!rendered.interactive);
    assert_eq!(rendered.data_files.len(), 1);
    let (path, contents) = &rendered.data_files[0];
    assert_eq!(path, &data_path);
    assert!(contents.contains("# DATASET #0\n"));
    assert!(contents.contains("0 0\n1 1\n2 4\n"));

    let script = &rendered.script;
    assert!(script.contains("set terminal pngcairo size 324,200 enhanced rounded"));
    assert!(script.contains(&format!("plot '{}' index 0 using 1:2 title 'squares' with lines", data_path.display())));
    assert!(script.contains("set datafile missing \"?\""));
    assert!(script.trim_end().ends_with("set output"));
}

#[test]
fn test_dataset_indices_and_line_styles_follow_insertion_order() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    let x = [1.0, 2.0, 3.0];
    plot.draw_curve(&x, &[1.0, 2.0, 3.0]).unwrap();
    plot.draw_points(&x, &[3.0, 2.0, 1.0]).unwrap();
    plot.add_draw_from_expression("sin(x)").unwrap();
    plot.draw_boxes(&x, &[2.0, 2.0, 2.0]).unwrap().line_style(7);

    let script = plot.serialize(session.palettes()).unwrap();
    let plot_line = script.lines().find(|l| l.starts_with("plot ")).unwrap();
    let entries: Vec<&str> = plot_line.split(", ").collect();
    assert_eq!(entries.len(), 4);
    assert!(entries[0].contains("index 0") && entries[0].contains("linestyle 1"));
    assert!(entries[1].contains("index 1") && entries[1].contains("linestyle 2"));
    assert!(entries[2].starts_with("sin(x)") && entries[2].contains("linestyle 3"));
    assert!(entries[3].contains("index 2") && entries[3].contains("linestyle 7"));
}

#[test]
fn test_ranges_only_when_set() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.add_draw_from_expression("x**2").unwrap();
    let script = plot.serialize(session.palettes()).unwrap();
    assert!(!script.contains("set xrange"));
    assert!(!script.contains("set yrange"));

    plot.xrange(0.0, 10.0).unwrap();
    plot.set_yrange(plotscript::parser::range("[*:5]").unwrap());
    let script = plot.serialize(session.palettes()).unwrap();
    assert!(script.contains("set xrange [0:10]\n"));
    assert!(script.contains("set yrange [*:5]\n"));
}

#[test]
fn test_figure_palette_reaches_plots_without_their_own() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut first = Plot::new(&session);
    first.add_draw_from_expression("x").unwrap();
    let mut second = Plot::new(&session);
    second.add_draw_from_expression("-x").unwrap();
    second.palette("viridis").unwrap();

    let mut figure = Figure::from_grid(vec![vec![first, second]]);
    figure.palette("set1").unwrap();
    let script = figure.serialize(session.palettes()).unwrap();

    assert!(script.contains("set multiplot layout 1,2 rowsfirst downwards\n"));
    assert!(script.contains("unset multiplot\n"));
    let set1 = script.find("# PALETTE (set1)").unwrap();
    let viridis = script.find("# PALETTE (viridis)").unwrap();
    assert!(set1 < viridis);
    assert_eq!(script.matches("# PALETTE (").count(), 2);
    assert!(script.contains("#E41A1C"));
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.add_draw_from_expression("x").unwrap();
    let mut canvas = Canvas::new(&session, single(plot));
    let renderer = RecordingRenderer::new();

    let err = canvas
        .render_with(&RenderTarget::File(dir.path().join("figure.xyz")), &renderer)
        .unwrap_err();
    assert!(err.to_string().contains("Unsupported output format 'xyz'"));
    assert!(renderer.calls.borrow().is_empty());
}

#[test]
fn test_autoclean_removes_generated_files() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.draw_curve(&[0.0, 1.0], &[1.0, 0.0]).unwrap();
    let mut canvas = Canvas::new(&session, single(plot));
    let renderer = RecordingRenderer::new();

    canvas.render_with(&RenderTarget::Interactive, &renderer).unwrap();
    assert!(renderer.last().interactive);
    assert!(files_in(&dir).is_empty());

    // Data removed by the previous render is written again.
    canvas.render_with(&RenderTarget::Interactive, &renderer).unwrap();
    assert_eq!(renderer.calls.borrow().len(), 2);
    assert_eq!(renderer.last().data_files.len(), 1);
}

#[test]
fn test_sessions_sharing_a_workdir_keep_their_own_data() {
    let dir = TempDir::new().unwrap();
    let (first, second) = (session_in(&dir), session_in(&dir));
    let mut a = Plot::new(&first);
    a.draw_curve(&[0.0, 1.0], &[10.0, 11.0]).unwrap();
    let mut b = Plot::new(&second);
    b.draw_curve(&[0.0, 1.0], &[20.0, 21.0]).unwrap();

    assert_ne!(a.data_path(), b.data_path());
    let a_data = fs::read_to_string(a.data_path()).unwrap();
    let b_data = fs::read_to_string(b.data_path()).unwrap();
    assert!(a_data.contains("0 10\n1 11\n"));
    assert!(b_data.contains("0 20\n1 21\n"));
}

#[test]
fn test_autoclean_removes_data_of_plots_copied_into_figures() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.draw_curve(&[0.0, 1.0], &[1.0, 2.0]).unwrap();
    assert!(plot.data_path().exists());

    let figure = Figure::from_grid(vec![vec![&plot]]);
    let mut canvas = Canvas::new(&session, vec![vec![figure]]);
    canvas
        .render_with(&RenderTarget::Interactive, &RecordingRenderer::new())
        .unwrap();
    assert!(files_in(&dir).is_empty(), "left after autoclean: {:?}", files_in(&dir));

    // The original plot still owns its data and writes it again on demand.
    plot.draw_points(&[2.0], &[3.0]).unwrap();
    let data = fs::read_to_string(plot.data_path()).unwrap();
    assert_eq!(data.matches("# DATASET #").count(), 2);
}

#[test]
fn test_files_stay_without_autoclean() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.draw_points(&[0.0], &[1.0]).unwrap();
    let mut canvas = Canvas::new(&session, single(plot));
    canvas.autoclean(false);
    canvas
        .render_with(&RenderTarget::Interactive, &RecordingRenderer::new())
        .unwrap();

    assert!(canvas.script_path().exists());
    assert_eq!(files_in(&dir).len(), 2);
    canvas.cleanup();
    assert!(files_in(&dir).is_empty());
}

#[test_log::test]
fn test_renderer_failure_is_reported_and_cleaned_up() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.add_draw_from_expression("x").unwrap();
    let mut canvas = Canvas::new(&session, single(plot));

    let err = canvas
        .render_with(&RenderTarget::Interactive, &RecordingRenderer::failing())
        .unwrap_err();
    assert!(err.to_string().starts_with("Renderer reported failure for script"));
    assert!(!canvas.script_path().exists());
}

#[test]
fn test_unknown_palette_fails_at_render_time() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot::new(&session);
    plot.add_draw_from_expression("x").unwrap();
    plot.palette("no-such-palette").unwrap();
    let mut canvas = Canvas::new(&session, single(plot));
    let renderer = RecordingRenderer::new();

    let err = canvas
        .render_with(&RenderTarget::Interactive, &renderer)
        .unwrap_err();
    assert!(err.to_string().contains("Unknown palette 'no-such-palette'"));
    assert!(renderer.calls.borrow().is_empty());
}

#[test]
fn test_cloned_plot_is_independent() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut original = Plot::new(&session);
    original.draw_curve(&[0.0, 1.0], &[5.0, 6.0]).unwrap();
    let mut copy = original.clone();
    copy.draw_curve(&[0.0, 1.0], &[7.0, 8.0]).unwrap();
    assert_ne!(original.data_path(), copy.data_path());
    assert_eq!(original.draws().len(), 1);
    assert_eq!(copy.draws().len(), 2);

    let figure = Figure::from_grid(vec![vec![original], vec![copy]]);
    let mut canvas = Canvas::new(&session, vec![vec![figure]]);
    let renderer = RecordingRenderer::new();
    canvas.render_with(&RenderTarget::Interactive, &renderer).unwrap();

    let rendered = renderer.last();
    assert_eq!(rendered.data_files.len(), 2);
    let blocks: Vec<usize> = rendered
        .data_files
        .iter()
        .map(|(_, c)| c.matches("# DATASET #").count())
        .collect();
    assert!(blocks.contains(&1) && blocks.contains(&2));
    assert!(rendered.script.contains("set multiplot layout 2,1 rowsfirst downwards"));
}

#[test]
fn test_plot3d_uses_splot() {
    let dir = TempDir::new().unwrap();
    let session = session_in(&dir);
    let mut plot = Plot3D::new(&session);
    let (x, y, z) = ([0.0, 1.0], [0.0, 1.0], [1.0, 2.0]);
    plot.add_draw_from_vectors(
        DrawStyle::Points,
        &[ColumnData::Numbers(&x), ColumnData::Numbers(&y), ColumnData::Numbers(&z)],
    )
    .unwrap();
    plot.view(60.0, 30.0);
    plot.zrange(0.0, 3.0).unwrap();
    plot.zlabel("height");

    let script = plot.serialize(session.palettes()).unwrap();
    assert!(script.contains("set zrange [0:3]\n"));
    assert!(script.contains("set zlabel 'height'"));
    assert!(script.contains("set view 60,30\n"));
    assert!(script.contains("splot '"));
    assert!(script.contains("using 1:2:3"));
}

#[test]
fn test_config_file_drives_session() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("render.json");
    let workdir = dir.path().join("out");
    fs::create_dir(&workdir).unwrap();
    fs::write(
        &config_path,
        format!(
            r#"{{"width": 500, "height": 300, "autoclean": false, "default_palette": "", "workdir": {:?}}}"#,
            workdir.display().to_string()
        ),
    )
    .unwrap();

    let session = Session::new(RenderConfig::from_json_file(&config_path).unwrap());
    let mut plot = Plot::new(&session);
    plot.draw_curve(&[0.0], &[0.0]).unwrap();
    let canvas = Canvas::new(&session, single(plot));
    let script = canvas.script(&RenderTarget::Interactive).unwrap();

    assert!(script.contains("set terminal GNUTERM size 500,300"));
    assert!(!script.contains("# PALETTE"));
    assert!(canvas.script_path().starts_with(&workdir));
}

fn run_cli(dir: &TempDir, args: &[&str], stdin: &str) -> Result<String, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_plotscript"))
        .args(args)
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut input) = child.stdin.take() {
        input
            .write_all(stdin.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

#[test]
fn test_cli_emits_script() {
    let dir = TempDir::new().unwrap();
    let csv = "x,y,label\n0,0,a\n1,1,b\n2,4,c\n";
    let script = run_cli(
        &dir,
        &["--emit-script", "-o", "out.png", "--title", "Squares", "--xrange", "[0:2]"],
        csv,
    )
    .unwrap();

    assert!(script.contains("set terminal pngcairo"));
    assert!(script.contains("set output 'out.png'"));
    assert!(script.contains("set title 'Squares'"));
    assert!(script.contains("set xrange [0:2]"));
    assert!(script.contains(".dat' index 0 using 1:2 title 'y' with lines"));
    assert!(!script.contains("title 'label'"));

    let data_files: Vec<PathBuf> = files_in(&dir)
        .into_iter()
        .filter(|p| p.extension().map_or(false, |e| e == "dat"))
        .collect();
    assert_eq!(data_files.len(), 1);
    let name = data_files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(script.contains(&name));
    let data = fs::read_to_string(&data_files[0]).unwrap();
    assert!(data.contains("0 0\n1 1\n2 4\n"));
}

#[test]
fn test_cli_using_and_json_input() {
    let dir = TempDir::new().unwrap();
    let json = r#"[{"t": 1, "v": 10}, {"t": 2, "v": 20}]"#;
    let script = run_cli(
        &dir,
        &["--json", "--emit-script", "--using", "'t':'v'", "--style", "points"],
        json,
    )
    .unwrap();
    assert!(script.contains("set terminal GNUTERM"));
    assert!(script.contains("title 'v' with points"));
}

#[test]
fn test_cli_errors() {
    let dir = TempDir::new().unwrap();
    let err = run_cli(&dir, &["--emit-script", "--style", "bogus"], "x,y\n1,2\n").unwrap_err();
    assert!(err.contains("Unknown draw style 'bogus'"));

    let err = run_cli(&dir, &["--emit-script", "--y", "missing"], "x,y\n1,2\n").unwrap_err();
    assert!(err.contains("Column 'missing' not found"));

    let err = run_cli(&dir, &["--emit-script", "-o", "out.xyz"], "x,y\n1,2\n").unwrap_err();
    assert!(err.contains("Unsupported output format 'xyz'"));
}
