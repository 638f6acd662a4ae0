//! Command implementations and argument parsing for the `dendra` CLI.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dendra_core::{
    Color, DendraError, Explorer, ExplorerBuilder, Palette, PointRecord, Scene, ViewMode,
    Viewport, WireError, wire::ClusteringResponse,
};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "dendra", about = "Explore agglomerative clustering results.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cut the merge tree at a height.
    Cut(CutCommand),
    /// Replay the merge log up to a step.
    Replay(ReplayCommand),
}

/// Options accepted by the `cut` command.
#[derive(Debug, Args, Clone)]
pub struct CutCommand {
    /// Session file holding the points and the clustering response.
    pub session: PathBuf,

    /// Cut height; defaults to 60% of the tree height.
    #[arg(long)]
    pub height: Option<f64>,

    /// Viewport options.
    #[command(flatten)]
    pub view: ViewArgs,
}

/// Options accepted by the `replay` command.
#[derive(Debug, Args, Clone)]
pub struct ReplayCommand {
    /// Session file holding the points and the clustering response.
    pub session: PathBuf,

    /// Replay counter; defaults to the fully merged state.
    #[arg(long)]
    pub step: Option<usize>,

    /// Viewport options.
    #[command(flatten)]
    pub view: ViewArgs,
}

/// Viewport and palette shared by every command.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Scatter plot width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: f64,

    /// Scatter plot height in pixels.
    #[arg(long = "height-px", default_value_t = DEFAULT_HEIGHT)]
    pub height_px: f64,

    /// JSON array of CSS `hsl()` colors used for the first clusters.
    #[arg(long)]
    pub palette: Option<PathBuf>,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height_px: DEFAULT_HEIGHT,
            palette: None,
        }
    }
}

/// Contents of a session file.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Points in dataset order.
    pub points: Vec<PointRecord>,
    /// Clustering service response for those points.
    #[serde(default)]
    pub response: ClusteringResponse,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input file failed.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An input file was not the expected JSON document.
    #[error("failed to parse `{path}`: {source}")]
    Json {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The explorer rejected the session.
    #[error(transparent)]
    Core(#[from] DendraError),
    /// The clustering response was unusable.
    #[error(transparent)]
    Wire(#[from] WireError),
}

impl CliError {
    /// Stable machine-readable code of the failure.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Io { .. } => Some("CLI_IO"),
            Self::Json { .. } => Some("CLI_JSON"),
            Self::Core(err) => Some(err.code().as_str()),
            Self::Wire(err) => Some(err.code().as_str()),
        }
    }
}

/// Outcome of a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Session name derived from the file name.
    pub session: String,
    /// Scene computed for the requested view.
    pub scene: Scene,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read or is rejected.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dendra_cli::cli::{Cli, Command, CutCommand, ViewArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{ "points": [ { "id": "a", "x": 0, "y": 0 }, { "id": "b", "x": 3, "y": 4 } ] }"#,
/// )?;
/// let cli = Cli {
///     command: Command::Cut(CutCommand {
///         session: file.path().to_path_buf(),
///         height: Some(1.0),
///         view: ViewArgs::default(),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert!(summary.scene.partition.is_none());
/// assert_eq!(summary.scene.point_pixels.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Cut(cut) => {
            span.record("command", field::display("cut"));
            run_cut(cut)
        }
        Command::Replay(replay) => {
            span.record("command", field::display("replay"));
            run_replay(replay)
        }
    }
}

#[instrument(
    name = "cli.cut",
    err,
    skip(command),
    fields(path = %command.session.display(), height = field::Empty, clusters = field::Empty),
)]
pub(super) fn run_cut(command: CutCommand) -> Result<ExecutionSummary, CliError> {
    let CutCommand {
        session,
        height,
        view,
    } = command;
    let explorer = load_explorer(&session, &view)?;
    let cut = height.unwrap_or_else(|| explorer.default_cut_height());
    let span = Span::current();
    span.record("height", cut);
    let scene = explorer.scene(ViewMode::Cut { height: cut });
    span.record("clusters", scene.cluster_count());
    finish(&session, scene)
}

#[instrument(
    name = "cli.replay",
    err,
    skip(command),
    fields(path = %command.session.display(), step = field::Empty, clusters = field::Empty),
)]
pub(super) fn run_replay(command: ReplayCommand) -> Result<ExecutionSummary, CliError> {
    let ReplayCommand {
        session,
        step,
        view,
    } = command;
    let explorer = load_explorer(&session, &view)?;
    let counter = step.unwrap_or_else(|| explorer.replayable_step_count());
    let span = Span::current();
    span.record("step", counter);
    let scene = explorer.scene(ViewMode::Replay { step: counter });
    span.record("clusters", scene.cluster_count());
    finish(&session, scene)
}

fn finish(path: &Path, scene: Scene) -> Result<ExecutionSummary, CliError> {
    let summary = ExecutionSummary {
        session: derive_session_name(path),
        scene,
    };
    info!(
        session = summary.session.as_str(),
        clusters = summary.scene.cluster_count(),
        "command completed"
    );
    Ok(summary)
}

fn load_explorer(path: &Path, view: &ViewArgs) -> Result<Explorer, CliError> {
    let Session { points, response } = read_json(path)?;
    let mut builder = ExplorerBuilder::new(points)
        .with_steps(response.merge_steps()?)
        .with_viewport(Viewport::new(view.width, view.height_px));
    if let Some(tree) = response.tree()? {
        builder = builder.with_tree(tree);
    }
    if let Some(palette_path) = &view.palette {
        let colors: Vec<Color> = read_json(palette_path)?;
        builder = builder.with_palette(colors.into_iter().collect::<Palette>());
    }
    Ok(builder.build()?)
}

#[instrument(name = "cli.read_json", err, skip_all, fields(path = %path.display()))]
pub(super) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn derive_session_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "session".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer`: the session, the view mode, the cluster
/// count, then one tab-separated line per cluster circle with its index,
/// color, center, radius and members.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let scene = &summary.scene;
    writeln!(writer, "session: {}", summary.session)?;
    match scene.mode {
        ViewMode::Cut { height } => writeln!(writer, "mode: cut height={height}")?,
        ViewMode::Replay { step } => writeln!(writer, "mode: replay step={step}")?,
    }
    writeln!(writer, "clusters: {}", scene.cluster_count())?;
    for visual in &scene.layout {
        let members: Vec<String> = visual.members.iter().map(ToString::to_string).collect();
        writeln!(
            writer,
            "{}\t{}\t({:.1}, {:.1})\t{:.1}\t{}",
            visual.cluster,
            visual.color,
            visual.center.x,
            visual.center.y,
            visual.radius,
            members.join(","),
        )?;
    }
    Ok(())
}
