//! `programme-site` command-line surface: headless page rendering, static
//! export, and search.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use programme_core::config::{find_config_file, LoggingConfig, SiteConfig, DEFAULT_CONFIG_FILE};
use programme_core::error::{ConfigError, LoadError};
use programme_core::store::{DocumentStore, ProgramSource};

use crate::app::App;
use crate::router::theme_fragment;
use crate::search::{perform_search, SearchBox, SearchReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Everything the CLI needs from the host: files, environment, logging.
pub trait SiteBackend {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
    fn find_config(&self, dir: &Path) -> Option<PathBuf>;
    fn create_dir_all(&self, path: &Path) -> Result<(), String>;
    fn write_file(&self, path: &Path, contents: &str) -> Result<(), String>;
    fn env_var(&self, key: &str) -> Option<String>;
    fn current_dir(&self) -> Result<PathBuf, String>;
    fn init_logging(&self, logging: &LoggingConfig);
}

pub struct FilesystemSiteBackend;

impl SiteBackend for FilesystemSiteBackend {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn find_config(&self, dir: &Path) -> Option<PathBuf> {
        find_config_file(dir)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), String> {
        fs::create_dir_all(path)
            .map_err(|err| format!("failed to create {}: {err}", path.display()))
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), String> {
        fs::write(path, contents).map_err(|err| format!("failed to write {}: {err}", path.display()))
    }

    fn env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }

    fn current_dir(&self) -> Result<PathBuf, String> {
        env::current_dir().map_err(|err| format!("failed to get current directory: {err}"))
    }

    fn init_logging(&self, logging: &LoggingConfig) {
        // Keeps the first subscriber when one is already installed.
        let _ = init_tracing(logging);
    }
}

#[derive(Default)]
pub struct InMemorySiteBackend {
    pub cwd: PathBuf,
    pub files: HashMap<PathBuf, String>,
    pub env: HashMap<String, String>,
    pub created_dirs: RefCell<Vec<PathBuf>>,
    pub written_files: RefCell<Vec<(PathBuf, String)>>,
}

impl InMemorySiteBackend {
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files.insert(path.into(), contents.to_owned());
        self
    }

    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Contents of the last write to `path`.
    #[must_use]
    pub fn written(&self, path: &Path) -> Option<String> {
        self.written_files
            .borrow()
            .iter()
            .rev()
            .find(|(written, _)| written == path)
            .map(|(_, contents)| contents.clone())
    }
}

impl SiteBackend for InMemorySiteBackend {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn find_config(&self, dir: &Path) -> Option<PathBuf> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        self.files.contains_key(&candidate).then_some(candidate)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), String> {
        self.created_dirs.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), String> {
        self.written_files
            .borrow_mut()
            .push((path.to_path_buf(), contents.to_owned()));
        Ok(())
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }

    fn current_dir(&self) -> Result<PathBuf, String> {
        Ok(self.cwd.clone())
    }

    fn init_logging(&self, _logging: &LoggingConfig) {}
}

/// Programme file read through a [`SiteBackend`].
struct BackendSource<'a> {
    backend: &'a dyn SiteBackend,
    path: PathBuf,
}

impl ProgramSource for BackendSource<'_> {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, LoadError> {
        self.backend
            .read_to_string(&self.path)
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// configured level; output goes to stderr.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|err| format!("invalid log filter: {err}"))?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(io::stderr))
            .try_init()
    };
    installed.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
    name = "programme-site",
    version,
    about = "Render, export and search a municipal programme site"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Programme JSON document (overrides config and PROGRAMME_DATA).
    #[arg(long)]
    data: Option<PathBuf>,
    /// Site configuration file (default: ./programme-site.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the full page for a location fragment.
    Render {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "")]
        fragment: String,
    },
    /// Write index.html and one page per theme into a directory.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the propositions matching a query, grouped by theme.
    Search {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        json: bool,
        query: String,
    },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn run_from_env() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    run_with_backend(&args, &FilesystemSiteBackend, &mut stdout, &mut stderr)
}

pub fn run_for_test(args: &[&str], backend: &dyn SiteBackend) -> CommandOutput {
    let owned_args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = run_with_backend(&owned_args, backend, &mut stdout, &mut stderr);
    let stdout = match String::from_utf8(stdout) {
        Ok(value) => value,
        Err(err) => panic!("stdout should be utf-8: {err}"),
    };
    let stderr = match String::from_utf8(stderr) {
        Ok(value) => value,
        Err(err) => panic!("stderr should be utf-8: {err}"),
    };
    CommandOutput {
        stdout,
        stderr,
        exit_code,
    }
}

pub fn run_with_backend(
    args: &[String],
    backend: &dyn SiteBackend,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let argv = std::iter::once("programme-site".to_owned()).chain(args.iter().cloned());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = write!(stdout, "{err}");
                    0
                }
                _ => {
                    let _ = write!(stderr, "{err}");
                    2
                }
            };
        }
    };

    match execute(cli.command, backend, stdout) {
        Ok(()) => 0,
        Err(message) => {
            let _ = writeln!(stderr, "{message}");
            1
        }
    }
}

fn execute(
    command: Commands,
    backend: &dyn SiteBackend,
    stdout: &mut dyn Write,
) -> Result<(), String> {
    match command {
        Commands::Render { source, fragment } => {
            let config = prepare(&source, backend)?;
            let data = PathBuf::from(&config.data.path);
            let mut app = App::new(config);
            app.set_initial_fragment(&fragment);
            let loaded = app.load(&BackendSource { backend, path: data });
            app.run_until_idle();
            write!(stdout, "{}", app.page_html()).map_err(|err| err.to_string())?;
            loaded.map_err(|err| err.to_string())
        }
        Commands::Export { source, out } => {
            let config = prepare(&source, backend)?;
            let store = load_store(&config, backend)?;
            backend.create_dir_all(&out)?;

            let mut pages = vec![(String::new(), out.join("index.html"))];
            let mut taken = HashSet::new();
            for theme in store.themes() {
                pages.push((
                    theme_fragment(&theme.id),
                    out.join(unique_page_name(&theme.id, &mut taken)),
                ));
            }
            for (fragment, path) in &pages {
                let mut app = App::new(config.clone());
                app.set_initial_fragment(fragment);
                app.install(store.clone());
                app.run_until_idle();
                backend.write_file(path, &app.page_html())?;
                writeln!(stdout, "wrote {}", path.display()).map_err(|err| err.to_string())?;
            }
            tracing::info!(pages = pages.len(), out = %out.display(), "export complete");
            Ok(())
        }
        Commands::Search {
            source,
            json,
            query,
        } => {
            let config = prepare(&source, backend)?;
            let query = query.trim();
            let min_chars = config.search.min_query_chars;
            if !SearchBox::is_searchable(query, min_chars) {
                return Err(format!(
                    "search query must be at least {min_chars} characters"
                ));
            }
            let store = load_store(&config, backend)?;
            let groups = perform_search(&store, query);
            let report = SearchReport::from_groups(query, &groups);
            if json {
                write_json(stdout, &report)
            } else {
                write_search_text(stdout, &report).map_err(|err| err.to_string())
            }
        }
    }
}

/// Resolve, override, and validate the configuration, then start logging.
fn prepare(source: &SourceArgs, backend: &dyn SiteBackend) -> Result<SiteConfig, String> {
    let path = match &source.config {
        Some(path) => Some(path.clone()),
        None => backend.find_config(&backend.current_dir()?),
    };
    let mut config = match &path {
        Some(path) => {
            let raw = backend.read_to_string(path).map_err(|err| ConfigError::Io {
                path: path.clone(),
                source: err,
            });
            raw.and_then(|raw| SiteConfig::from_toml_str(&raw))
                .map_err(|err| err.to_string())?
        }
        None => SiteConfig::default(),
    };
    config.apply_env_overrides(|key| backend.env_var(key));
    if let Some(data) = &source.data {
        config.data.path = data.display().to_string();
    }
    config.validate().map_err(|err| err.to_string())?;
    backend.init_logging(&config.logging);
    tracing::debug!(config = ?path, data = %config.data.path, "configuration resolved");
    Ok(config)
}

fn load_store(config: &SiteConfig, backend: &dyn SiteBackend) -> Result<DocumentStore, String> {
    let source = BackendSource {
        backend,
        path: PathBuf::from(&config.data.path),
    };
    DocumentStore::load(&source).map_err(|err| {
        tracing::error!(error = %err, "failed to load programme");
        err.to_string()
    })
}

fn write_json<T: Serialize>(stdout: &mut dyn Write, value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    writeln!(stdout, "{text}").map_err(|err| err.to_string())
}

fn write_search_text(stdout: &mut dyn Write, report: &SearchReport) -> io::Result<()> {
    if report.groups.is_empty() {
        return writeln!(stdout, "No results for \"{}\"", report.query);
    }
    for group in &report.groups {
        writeln!(
            stdout,
            "{} ({})",
            group.theme_title,
            group.propositions.len()
        )?;
        for hit in &group.propositions {
            writeln!(stdout, "  #theme/{}/{}  {}", group.theme_id, hit.id, hit.title)?;
        }
    }
    writeln!(
        stdout,
        "{} result{}",
        report.total,
        programme_core::text::plural_suffix(report.total)
    )
}

/// `theme-<slug>.html`, suffixed with `-2`, `-3`, ... when an earlier id
/// already claimed the same slug.
fn unique_page_name(theme_id: &str, taken: &mut HashSet<String>) -> String {
    let slug = slugify(theme_id);
    let mut name = format!("theme-{slug}.html");
    let mut n = 2;
    while !taken.insert(name.clone()) {
        name = format!("theme-{slug}-{n}.html");
        n += 1;
    }
    if n > 2 {
        tracing::warn!(theme = theme_id, page = %name, "theme slug collides with an earlier theme");
    }
    name
}

/// File-name-safe form of a theme id.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut out = String::new();
    let mut last_dash = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
            continue;
        }
        if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    if out.is_empty() {
        "theme".to_owned()
    } else {
        out.trim_matches('-').to_owned()
    }
}
