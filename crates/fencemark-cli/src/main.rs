use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use fencemark_config::Config;
use fencemark_engine::annotations::AnnotationRules;
use fencemark_engine::render::RenderConfig;
use fencemark_engine::{
    CodeBlockDocument, LexicalHighlighter, RoundTripMismatch, assign_block_ids, check_round_trip,
    from_code_fence_to_code_block_document, parse_mdx, render_mdx, validate_content_dir,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fencemark")]
#[command(about = "Render and check annotated code blocks in MDX content")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ~/.config/fencemark/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every code block of a content file
    Render {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },
    /// Print the parsed code block documents of a content file as JSON
    Documents { file: PathBuf },
    /// Verify that every code block survives a parse/serialize round trip
    Check {
        /// Files to check (defaults to the configured content files)
        paths: Vec<PathBuf>,
    },
    /// Give code blocks without an `id=` attribute a stable id
    AssignIds {
        /// Files to update (defaults to the configured content files)
        paths: Vec<PathBuf>,
        /// Write the ids back instead of only reporting them
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    Json,
}

/// Rules and presentation from the config file, or the built-in defaults.
struct Settings {
    config: Option<Config>,
    config_path: PathBuf,
}

impl Settings {
    fn load(path: Option<PathBuf>) -> Result<Self> {
        let (config, config_path) = match path {
            Some(path) => (Config::load_from_path(&path), path),
            None => (Config::load(), Config::config_path()),
        };
        let config = config
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        if config.is_none() {
            log::debug!("No config at {}, using defaults", config_path.display());
        }
        Ok(Self {
            config,
            config_path,
        })
    }

    fn rules(&self) -> AnnotationRules {
        self.config
            .as_ref()
            .map(|c| c.annotations.clone())
            .unwrap_or_default()
    }

    fn render(&self) -> RenderConfig {
        self.config
            .as_ref()
            .map(|c| c.render.clone())
            .unwrap_or_default()
    }

    /// Explicit paths win; otherwise every configured content file.
    fn files(&self, paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        if !paths.is_empty() {
            return Ok(paths);
        }
        let Some(config) = &self.config else {
            bail!(
                "No paths given and no config file found. Create one at {}",
                self.config_path.display()
            );
        };
        validate_content_dir(&config.content_path).with_context(|| {
            format!(
                "Content path '{}' from config file '{}' is invalid",
                config.content_path.display(),
                self.config_path.display()
            )
        })?;
        config.content_files().with_context(|| {
            format!(
                "Failed to list content files under '{}'",
                config.content_path.display()
            )
        })
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn render_file(path: &Path, format: Format, settings: &Settings) -> Result<String> {
    let source = read_source(path)?;
    let render = settings.render();
    let page = render_mdx(&source, &settings.rules(), &render, &LexicalHighlighter);
    if page.fallback_count() > 0 {
        log::warn!(
            "{}: {} code blocks rendered without annotations",
            path.display(),
            page.fallback_count()
        );
    }
    Ok(match format {
        Format::Html => page.to_html(&render),
        Format::Json => serde_json::to_string_pretty(&page)?,
    })
}

fn documents(path: &Path, rules: &AnnotationRules) -> Result<Vec<CodeBlockDocument>> {
    let document = parse_mdx(&read_source(path)?);
    Ok(document
        .fences()
        .map(|fence| from_code_fence_to_code_block_document(fence, rules))
        .collect())
}

/// Round-trip failures in one file, keyed by the fence's 1-based position.
fn check_file(path: &Path, rules: &AnnotationRules) -> Result<Vec<(usize, RoundTripMismatch)>> {
    let document = parse_mdx(&read_source(path)?);
    Ok(document
        .fences()
        .enumerate()
        .filter_map(|(index, fence)| {
            check_round_trip(fence, rules)
                .err()
                .map(|mismatch| (index + 1, mismatch))
        })
        .collect())
}

/// Returns how many fences lacked an id.
fn assign_ids_in_file(path: &Path, write: bool) -> Result<usize> {
    let mut document = parse_mdx(&read_source(path)?);
    let assigned = assign_block_ids(&mut document);
    if write && assigned > 0 {
        fs::write(path, document.to_markdown())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(assigned)
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load(cli.config)?;

    match cli.command {
        Command::Render { file, format } => {
            println!("{}", render_file(&file, format, &settings)?);
        }
        Command::Documents { file } => {
            let documents = documents(&file, &settings.rules())?;
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }
        Command::Check { paths } => {
            let rules = settings.rules();
            let mut failures = 0;
            for path in settings.files(paths)? {
                for (fence, mismatch) in check_file(&path, &rules)? {
                    println!("{}: code block {fence}: {mismatch}", path.display());
                    failures += 1;
                }
            }
            if failures > 0 {
                log::error!("{failures} code blocks do not round-trip");
                return Ok(ExitCode::FAILURE);
            }
            log::info!("All code blocks round-trip");
        }
        Command::AssignIds { paths, write } => {
            for path in settings.files(paths)? {
                let assigned = assign_ids_in_file(&path, write)?;
                if assigned > 0 {
                    let verb = if write { "assigned" } else { "would assign" };
                    println!("{}: {verb} {assigned} ids", path.display());
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(Cli::parse())
}
