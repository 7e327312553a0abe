use futures::executor::block_on;
use serde::Serialize;
use serde_json::json;
use std::io::{Read, Write};
use std::str::FromStr;
use verbviz::render::HeadlessRenderer;
use verbviz::render::raster::{self, RasterError, RasterOptions};
use verbviz::{BuildOptions, DiagramFormat, DotDialect, Schema, Theme, VerbvizConfig};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Verbviz(verbviz::Error),
    Headless(verbviz::render::HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    NoDiagram,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Verbviz(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoDiagram => write!(f, "No diagram available (layout engine failed)"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<verbviz::Error> for CliError {
    fn from(value: verbviz::Error) -> Self {
        Self::Verbviz(value)
    }
}

impl From<verbviz::render::HeadlessError> for CliError {
    fn from(value: verbviz::render::HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Dot,
    Flowchart,
    Elements,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    dialect: DotDialect,
    exclude: Vec<String>,
    theme: Option<Theme>,
    select: Option<String>,
    pretty: bool,
    focus: Option<String>,
    zoom: i32,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    engine: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "verbviz-cli\n\
\n\
USAGE:\n\
  verbviz-cli [dot] [--dialect a|b] [--exclude <module>]... [--config <path>] [--out <path>] [<path>|-]\n\
  verbviz-cli flowchart [--exclude <module>]... [--config <path>] [--out <path>] [<path>|-]\n\
  verbviz-cli elements [--theme light|dark] [--select <id>] [--pretty] [--exclude <module>]... [--config <path>] [<path>|-]\n\
  verbviz-cli render [--dialect a|b] [--focus <id>] [--zoom <steps>] [--format svg|png|pdf] [--scale <n>] [--background <color>] [--engine <binary>] [--exclude <module>]... [--config <path>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the schema JSON is read from stdin.\n\
  - --config points at a JSON file merged onto the defaults; --exclude adds to graph.excludeModules.\n\
  - render runs Graphviz (`dot -Tsvg` unless configured) and prints SVG to stdout by default.\n\
  - --zoom applies zoom-in (positive) or zoom-out (negative) steps after --focus.\n\
  - PNG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - Set VERBVIZ_LOG (e.g. VERBVIZ_LOG=debug) to control diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "dot" => args.command = Command::Dot,
            "flowchart" => args.command = Command::Flowchart,
            "elements" => args.command = Command::Elements,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--dialect" => {
                args.dialect = next_value(&mut it)?
                    .parse::<DotDialect>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--exclude" => args.exclude.push(next_value(&mut it)?.clone()),
            "--theme" => {
                args.theme = Some(
                    next_value(&mut it)?
                        .parse::<Theme>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--select" => args.select = Some(next_value(&mut it)?.clone()),
            "--focus" => args.focus = Some(next_value(&mut it)?.clone()),
            "--zoom" => {
                args.zoom = next_value(&mut it)?
                    .parse::<i32>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--engine" => args.engine = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
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

fn load_config(args: &Args) -> Result<VerbvizConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => VerbvizConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => VerbvizConfig::default(),
    };
    if !args.exclude.is_empty() {
        let mut exclude = config.build_options()?.exclude_modules;
        exclude.extend(args.exclude.iter().cloned());
        config.set_value("graph.excludeModules", json!(exclude));
    }
    if let Some(engine) = &args.engine {
        config.set_value("render.engine", json!(engine));
    }
    if let Some(theme) = args.theme {
        config.set_value("theme", json!(theme));
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: Option<&str>, input: Option<&str>, ext: &str) -> Result<(), CliError> {
    let out = out.map(str::to_string).unwrap_or_else(|| {
        default_raster_out_path(input, ext)
            .to_string_lossy()
            .to_string()
    });
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let schema = Schema::from_json(&read_input(args.input.as_deref())?)?;
    let build = config.build_options()?;

    match args.command {
        Command::Dot => {
            let text = verbviz::generate(&schema, DiagramFormat::from(args.dialect), &build);
            write_text(&text, args.out.as_deref())
        }
        Command::Flowchart => {
            let text = verbviz::generate(&schema, DiagramFormat::Flowchart, &build);
            write_text(&text, args.out.as_deref())
        }
        Command::Elements => {
            let graph = verbviz::build_decl_graph(&schema, &build);
            let els = verbviz::presentation::elements(
                &graph,
                config.theme()?,
                args.select.as_deref(),
            );
            write_json(&els, args.pretty)
        }
        Command::Render => render(&args, &config, &schema, build),
    }
}

fn render(
    args: &Args,
    config: &VerbvizConfig,
    schema: &Schema,
    build: BuildOptions,
) -> Result<(), CliError> {
    let renderer = HeadlessRenderer::from_config(config)?
        .with_dialect(args.dialect)
        .with_build_options(build);
    let Some(mut viewport) = block_on(renderer.mount(schema)) else {
        return Err(CliError::NoDiagram);
    };

    if let Some(id) = &args.focus {
        if !viewport.zoom_to(id) {
            tracing::warn!(id = %id, "focus target not present in the rendered diagram");
        }
    }
    for _ in 0..args.zoom.unsigned_abs() {
        if args.zoom > 0 {
            viewport.zoom_in();
        } else {
            viewport.zoom_out();
        }
    }

    let raster_options = RasterOptions {
        scale: args.render_scale,
        background: args.background.clone(),
    };
    match args.render_format {
        RenderFormat::Svg => write_text(&viewport.to_svg(), args.out.as_deref()),
        RenderFormat::Png => {
            let bytes = raster::viewport_to_png(&viewport, &raster_options)?;
            write_bytes(&bytes, args.out.as_deref(), args.input.as_deref(), "png")
        }
        RenderFormat::Pdf => {
            let bytes = raster::viewport_to_pdf(&viewport)?;
            write_bytes(&bytes, args.out.as_deref(), args.input.as_deref(), "pdf")
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("VERBVIZ_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

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
        Err(CliError::NoDiagram) => {
            eprintln!("{}", CliError::NoDiagram);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
