use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config::{ConfigError, PanelConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Comment panel client: list, post, delete and translate comments", long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every front end; each one overrides the matching config file entry.
#[derive(ClapArgs, Debug, Default)]
pub struct SettingsArgs {
    /// TOML file with panel settings (base_url, user, user_id, admin, language, timeout_secs, log_level)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Comment service URL. Defaults to http://127.0.0.1:8080
    #[arg(short = 's', long, global = true)]
    pub base_url: Option<String>,

    /// Username for new comments (blank posts as Anonymous)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Your user id; comments with the same owner id get a delete control
    #[arg(long, global = true)]
    pub user_id: Option<String>,

    /// Show delete controls on every comment
    #[arg(long, default_value_t = false, global = true)]
    pub admin: bool,

    /// Display language id {en, zh, es, fr, ar, it, pt, de, ko, ja}
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Logging level for all subsystems {off, error, warn, info, debug, trace}
    ///  -- You may also specify `<subsystem>=<level>,<subsystem2>=<level>,...` to set the log level for individual subsystems
    #[arg(long = "loglevel", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the current page of comments
    List,
    /// Post a comment as --user in --language
    Post {
        #[arg(short, long)]
        text: String,
    },
    /// Delete one comment by id
    Delete { id: String },
    /// Delete every comment
    DeleteAll,
    /// Move by DELTA pages from the first page (negative goes back)
    ///
    /// Each invocation starts from page 0, so `page 2` always lands on page 2
    /// (clamped to the last page) rather than advancing from a previous run.
    Page {
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Set how many comments a page holds
    PageSize { max_comments: u32 },
    /// Translate text into --language
    Translate {
        #[arg(short, long)]
        text: String,
    },
    /// List the display languages
    Languages,
}

impl SettingsArgs {
    /// Loads `--config` if given, then applies the command-line overrides.
    pub fn load_config(&self) -> Result<PanelConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => PanelConfig::from_file(path)?,
            None => PanelConfig::default(),
        };
        let cfg = self.merge_into_config(base);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn merge_into_config(&self, mut cfg: PanelConfig) -> PanelConfig {
        if let Some(v) = &self.base_url {
            cfg.base_url = v.clone();
        }
        if let Some(v) = &self.user {
            cfg.user = v.clone();
        }
        if let Some(v) = &self.user_id {
            cfg.user_id = Some(v.clone());
        }
        if self.admin {
            cfg.admin = true;
        }
        if let Some(v) = &self.language {
            cfg.language = v.clone();
        }
        if let Some(v) = self.timeout_secs {
            cfg.timeout_secs = v;
        }
        if let Some(v) = &self.log_level {
            cfg.log_level = v.clone();
        }
        cfg
    }
}
