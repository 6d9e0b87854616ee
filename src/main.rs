//! newsumm CLI: extractive news summarization.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use newsumm::article::ArticleLoader;
use newsumm::config::SummConfig;
use newsumm::document::ContentFormat;
use newsumm::error::ConfigError;
use newsumm::language::Language;
use newsumm::parser::detect_format;
use newsumm::paths::SummPaths;
use newsumm::resources::EnsureOutcome;
use newsumm::service::SummaryService;
use newsumm::summarizer::SentenceCount;

#[derive(Parser)]
#[command(name = "newsumm", version, about = "Extractive news summarization")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/newsumm/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the tokenizer resources.
    #[arg(long, global = true)]
    resources_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a local HTML or text document.
    Summarize {
        /// Input file, or `-` / nothing for stdin.
        file: Option<PathBuf>,

        /// Input format (detected from the file extension when omitted).
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Document language: a name or ISO 639 code.
        #[arg(long)]
        language: Option<String>,

        /// Sentences to keep: a count (e.g. 5) or a share (e.g. 20%).
        #[arg(long)]
        sentences: Option<String>,

        /// Print JSON instead of one sentence per line.
        #[arg(long)]
        json: bool,
    },

    /// Fetch a web article and summarize it.
    Article {
        url: String,

        /// Do not follow the page's AMP alternate.
        #[arg(long)]
        no_amp: bool,

        /// Sentences to keep (default: `article.sentences` from config).
        #[arg(long)]
        sentences: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Manage the tokenizer resource bundle.
    Resources {
        #[command(subcommand)]
        action: ResourcesAction,
    },

    /// List supported languages.
    Languages,

    /// Inspect or create the config file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ResourcesAction {
    /// Download and install the bundle if it is missing.
    Ensure {
        /// Install from a local punkt_tab.zip instead of downloading.
        #[arg(long)]
        archive: Option<PathBuf>,
    },
    /// Show where the bundle lives and which languages it covers.
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Text,
}

impl From<FormatArg> for ContentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => ContentFormat::Html,
            FormatArg::Text => ContentFormat::PlainText,
        }
    }
}

/// Resolved locations and configuration for one invocation.
struct Context {
    config_path: PathBuf,
    config: SummConfig,
    resources_dir: PathBuf,
}

impl Context {
    fn resolve(cli: &Cli) -> Result<Self> {
        let paths = SummPaths::resolve().ok();

        let config_path = match (&cli.config, &paths) {
            (Some(path), _) => path.clone(),
            (None, Some(paths)) => paths.config_file(),
            (None, None) => return Err(ConfigError::NoHome.into()),
        };
        let config = SummConfig::load_or_default(&config_path)?;

        let resources_dir = match (&cli.resources_dir, &config.resources.dir, &paths) {
            (Some(dir), _, _) | (None, Some(dir), _) => dir.clone(),
            (None, None, Some(paths)) => paths.resources_dir(),
            (None, None, None) => return Err(ConfigError::NoHome.into()),
        };

        Ok(Self {
            config_path,
            config,
            resources_dir,
        })
    }

    fn service(&self) -> SummaryService {
        SummaryService::new(self.config.resource_store(self.resources_dir.clone()))
            .with_max_input_bytes(self.config.max_input_bytes)
            .with_extra_stop_words(self.config.extra_stop_words.clone())
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::resolve(&cli)?;

    match cli.command {
        Commands::Summarize {
            file,
            format,
            language,
            sentences,
            json,
        } => {
            let language = match language {
                Some(name) => Language::parse(&name)?,
                None => ctx.config.default_language()?,
            };
            let count = match sentences {
                Some(count) => count.parse::<SentenceCount>()?,
                None => ctx.config.sentence_count()?,
            };

            let path = file.filter(|p| p.as_os_str() != "-");
            let format = format
                .map(ContentFormat::from)
                .or_else(|| path.as_deref().and_then(|p| detect_format(&p.to_string_lossy())))
                .unwrap_or(ContentFormat::PlainText);
            let data = read_input(path.as_deref())?;

            let service = ctx.service();
            let summary = service.pipeline(language)?.summarize_bytes(format, &data, count)?;

            if json {
                let out = serde_json::json!({
                    "language": language.code(),
                    "format": format.as_str(),
                    "sentences": summary,
                });
                println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
            } else {
                for sentence in &summary {
                    println!("{sentence}");
                }
            }
        }

        Commands::Article {
            url,
            no_amp,
            sentences,
            json,
        } => {
            let service = Arc::new(ctx.service());
            let mut loader = ArticleLoader::new(service, &ctx.config.article)?;
            if no_amp {
                loader = loader.without_amp();
            }
            if let Some(count) = sentences {
                loader = loader.with_sentences(count.parse()?);
            }

            let article = loader.load(&url)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&article).into_diagnostic()?);
            } else {
                println!("{}", article.title);
                println!("{} [{}]", article.url, article.language);
                println!();
                for sentence in &article.sentences {
                    println!("{sentence}");
                }
            }
        }

        Commands::Resources { action } => {
            let service = ctx.service();
            match action {
                ResourcesAction::Ensure { archive: Some(archive) } => {
                    let data = std::fs::read(&archive).into_diagnostic()?;
                    service.store().install_from_archive(&data)?;
                    println!(
                        "Installed {} into {}",
                        archive.display(),
                        service.store().bundle_dir().display()
                    );
                }
                ResourcesAction::Ensure { archive: None } => match service.store().ensure()? {
                    EnsureOutcome::AlreadyInstalled => {
                        println!("Resources already installed in {}", service.store().bundle_dir().display());
                    }
                    EnsureOutcome::Downloaded => {
                        println!(
                            "Downloaded {} into {}",
                            service.store().url(),
                            service.store().bundle_dir().display()
                        );
                    }
                },
                ResourcesAction::Status => {
                    let status = service.store().status();
                    println!("Root:      {}", status.root.display());
                    println!("Installed: {}", status.installed);
                    if status.installed {
                        let names: Vec<_> = status.languages.iter().map(Language::name).collect();
                        println!("Languages: {}", names.join(", "));
                    }
                }
            }
        }

        Commands::Languages => {
            let status = ctx.service().store().status();
            println!("{:<12} {:<5} {}", "LANGUAGE", "CODE", "PUNKT DATA");
            for language in Language::ALL {
                let punkt = if status.languages.contains(&language) {
                    "installed"
                } else {
                    "-"
                };
                println!("{:<12} {:<5} {}", language.name(), language.code(), punkt);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", ctx.config.to_toml()?);
            }
            ConfigAction::Init { force } => {
                if ctx.config_path.exists() && !force {
                    miette::bail!(
                        "config file {} already exists (use --force to overwrite)",
                        ctx.config_path.display()
                    );
                }
                SummConfig::default().save(&ctx.config_path)?;
                println!("Wrote {}", ctx.config_path.display());
            }
        },
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).into_diagnostic(),
        None => {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data).into_diagnostic()?;
            Ok(data)
        }
    }
}
