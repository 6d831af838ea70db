use cohortflow::render::raster::{ExportFormat, RasterOptions, save_figure};
use cohortflow::{
    CohortStep, FlowRenderOptions, SurfaceTarget, plan_flow_diagram, render_flow_diagram,
};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Flow(cohortflow::FlowError),
    Raster(cohortflow::render::raster::RasterError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Flow(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<cohortflow::FlowError> for CliError {
    fn from(value: cohortflow::FlowError) -> Self {
        Self::Flow(value)
    }
}

impl From<cohortflow::render::raster::RasterError> for CliError {
    fn from(value: cohortflow::render::raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Layout,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    style: Option<String>,
    config: Option<String>,
    title: Option<String>,
    transparent: bool,
    formats: Vec<ExportFormat>,
    out_dir: Option<String>,
    name: Option<String>,
    dpi: Option<u32>,
    figsize: Option<(f64, f64)>,
    pretty: bool,
}

fn usage() -> &'static str {
    "cohortflow-cli\n\
\n\
USAGE:\n\
  cohortflow-cli [render] [--style white|colorful] [--config <style.toml>] [--title <text>] [--transparent] [--format png,svg,pdf,...] [--out-dir <dir>] [--name <basename>] [--dpi <n>] [--figsize <WxH>] [<steps.json>|-]\n\
  cohortflow-cli layout [--style white|colorful] [--config <style.toml>] [--pretty] [<steps.json>|-]\n\
\n\
NOTES:\n\
  - If <steps.json> is omitted or '-', input is read from stdin.\n\
  - Input is a JSON array of step records; each needs a count (\"count\", \"n\" or \"N\").\n\
  - render writes <basename>.<format> per requested format (default: png).\n\
  - The default basename is the input file stem, or 'cohort_flow' for stdin.\n\
  - layout prints the planned geometry as JSON without drawing.\n\
"
}

fn parse_figsize(raw: &str) -> Option<(f64, f64)> {
    let (w, h) = raw.split_once(['x', 'X'])?;
    let w = w.trim().parse::<f64>().ok()?;
    let h = h.trim().parse::<f64>().ok()?;
    if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 {
        Some((w, h))
    } else {
        None
    }
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "--transparent" => args.transparent = true,
            "--pretty" => args.pretty = true,
            "--style" => {
                let Some(style) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.style = Some(style.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--title" => {
                let Some(title) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.title = Some(title.clone());
            }
            "--format" => {
                let Some(list) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                for token in list.split(',').filter(|t| !t.trim().is_empty()) {
                    let format = token
                        .parse::<ExportFormat>()
                        .map_err(|_| CliError::Usage(usage()))?;
                    args.formats.push(format);
                }
            }
            "--out-dir" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out_dir = Some(dir.clone());
            }
            "--name" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.name = Some(name.clone());
            }
            "--dpi" => {
                let Some(dpi) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.dpi = Some(dpi.parse::<u32>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--figsize" => {
                let Some(raw) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.figsize = Some(parse_figsize(raw).ok_or(CliError::Usage(usage()))?);
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    if args.formats.is_empty() {
        args.formats.push(ExportFormat::Png);
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn default_basename(input: Option<&str>) -> String {
    match input {
        Some(path) if path != "-" => Path::new(path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "cohort_flow".to_string()),
        _ => "cohort_flow".to_string(),
    }
}

fn flow_options(args: &Args) -> FlowRenderOptions {
    let mut options = FlowRenderOptions::default();
    if let Some(style) = &args.style {
        options.style = style.clone();
    }
    options.style_config_path = args.config.as_ref().map(PathBuf::from);
    options.figure_title = args.title.clone();
    options.transparent = args.transparent;
    options.dpi = args.dpi;
    options.figsize = args.figsize;
    options
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let steps: Vec<CohortStep> = serde_json::from_str(&text)?;
    let options = flow_options(&args);

    match args.command {
        Command::Layout => {
            let layout = plan_flow_diagram(&steps, &options)?;
            if args.pretty {
                serde_json::to_writer_pretty(std::io::stdout().lock(), &layout)?;
            } else {
                serde_json::to_writer(std::io::stdout().lock(), &layout)?;
            }
            println!();
            Ok(())
        }
        Command::Render => {
            let rendered = render_flow_diagram(&steps, SurfaceTarget::Owned, &options)?;
            let written = save_figure(
                &rendered.canvas,
                args.out_dir.as_deref().map(Path::new),
                &args.name.unwrap_or_else(|| default_basename(args.input.as_deref())),
                &args.formats,
                &RasterOptions::default(),
            )?;
            for path in written {
                println!("Saved: {}", path.display());
            }
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
