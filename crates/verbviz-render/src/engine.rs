use std::io::{self, Write as _};
use std::process::{Command, Stdio};

use verbviz_core::VerbvizConfig;

use crate::svg::SvgError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to run layout engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("layout engine exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
    #[error("layout engine produced non-UTF-8 output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Svg(#[from] SvgError),
    #[error("invalid engine configuration: {0}")]
    Config(#[from] verbviz_core::Error),
}

/// Turns a DOT description into SVG text.
///
/// Implementations are synchronous; [`crate::RenderAdapter`] owns the asynchronous surface and
/// the stale-result bookkeeping.
pub trait LayoutEngine {
    fn render_svg(&self, dot: &str) -> Result<String, EngineError>;
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for &E {
    fn render_svg(&self, dot: &str) -> Result<String, EngineError> {
        (**self).render_svg(dot)
    }
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for Box<E> {
    fn render_svg(&self, dot: &str) -> Result<String, EngineError> {
        (**self).render_svg(dot)
    }
}

/// Runs an external Graphviz binary, feeding DOT on stdin and reading SVG from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphvizEngine {
    pub command: String,
    pub args: Vec<String>,
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self {
            command: "dot".to_string(),
            args: vec!["-Tsvg".to_string()],
        }
    }
}

impl GraphvizEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Reads `render.engine` and `render.args`, falling back to `dot -Tsvg`.
    pub fn from_config(config: &VerbvizConfig) -> Result<Self, EngineError> {
        let mut engine = Self::default();
        if let Some(command) = config.get_str("render.engine") {
            engine.command = command.to_string();
        }
        if config.get("render.args").is_some() {
            engine.args = config.get_str_list("render.args")?;
        }
        Ok(engine)
    }
}

impl LayoutEngine for GraphvizEngine {
    fn render_svg(&self, dot: &str) -> Result<String, EngineError> {
        let spawn_err = |source| EngineError::Spawn {
            command: self.command.clone(),
            source,
        };

        tracing::debug!(command = %self.command, args = ?self.args, "spawning layout engine");
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // The engine may write output before it has read all of its input, so stdin is fed from
        // a separate thread while both output pipes drain. Dropping stdin closes it (EOF).
        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(dot.as_bytes())));
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (written, output)
        });
        let output = output.map_err(spawn_err)?;

        let exit_error = || EngineError::Exit {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        if !output.status.success() {
            return Err(exit_error());
        }
        match written {
            Ok(()) => {}
            // Exited without consuming the whole graph.
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!(command = %self.command, "layout engine closed stdin early");
                return Err(exit_error());
            }
            Err(err) => return Err(spawn_err(err)),
        }
        Ok(String::from_utf8(output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_to_dot_tsvg() {
        let engine = GraphvizEngine::from_config(&VerbvizConfig::default()).unwrap();
        assert_eq!(engine, GraphvizEngine::default());
        assert_eq!(engine.command, "dot");
        assert_eq!(engine.args, vec!["-Tsvg"]);
    }

    #[test]
    fn config_overrides_binary_and_args() {
        let mut config = VerbvizConfig::default();
        config.set_value("render.engine", json!("/opt/graphviz/bin/dot"));
        config.set_value("render.args", json!(["-Tsvg", "-Gdpi=72"]));
        let engine = GraphvizEngine::from_config(&config).unwrap();
        assert_eq!(
            engine,
            GraphvizEngine::new("/opt/graphviz/bin/dot").with_args(["-Tsvg", "-Gdpi=72"])
        );

        config.set_value("render.args", json!("-Tsvg"));
        assert!(matches!(
            GraphvizEngine::from_config(&config),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let engine = GraphvizEngine::new("verbviz-test-no-such-layout-binary");
        match engine.render_svg("digraph {}") {
            Err(EngineError::Spawn { command, .. }) => {
                assert_eq!(command, "verbviz-test-no-such-layout-binary");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn large_input_streams_through_without_blocking() {
        let dot = "x".repeat(4 << 20);
        let echoed = GraphvizEngine::new("cat")
            .with_args(Vec::<String>::new())
            .render_svg(&dot)
            .unwrap();
        assert_eq!(echoed.len(), dot.len());
    }

    #[cfg(unix)]
    #[test]
    fn early_exit_is_an_exit_error_with_stderr() {
        let engine =
            GraphvizEngine::new("sh").with_args(["-c", "echo 'syntax error in line 1' >&2; exit 3"]);
        match engine.render_svg(&"x".repeat(4 << 20)) {
            Err(EngineError::Exit { status, stderr }) => {
                assert!(status.contains('3'), "{status}");
                assert_eq!(stderr, "syntax error in line 1");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn engine_that_ignores_its_input_is_an_exit_error() {
        let engine = GraphvizEngine::new("sh").with_args(["-c", "exit 0"]);
        assert!(matches!(
            engine.render_svg(&"x".repeat(4 << 20)),
            Err(EngineError::Exit { .. })
        ));
    }
}
