use crate::core::orchestrator::{assemble_context, refresh_readme};
use crate::core::prompt_builder::build_prompt;
use crate::domain::models::{
    DEFAULT_API_BASE, DEFAULT_EXCLUDES, DEFAULT_EXTENSIONS, DEFAULT_MAX_LINES, DEFAULT_MODEL,
    DEFAULT_PER_DIR, DEFAULT_TIMEOUT_SECS, RunConfig, SamplingLimits, ScanConfig,
};
use crate::infra::generator::GeminiClient;
use crate::infra::logger::setup_logger;
use crate::infra::output::{create_writer, print_status};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "readme-refresh")]
#[command(about = "Regenerate a repository README with a generative AI service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Repository root to scan
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub root: PathBuf,

    /// README to refresh, relative to the root unless absolute
    #[arg(long, default_value = "README.md")]
    pub readme: PathBuf,

    /// Package manifest, relative to the root unless absolute
    #[arg(long, default_value = "package.json")]
    pub manifest: PathBuf,

    #[arg(long, default_value = DEFAULT_EXTENSIONS)]
    pub ext: String,

    #[arg(long, default_value = DEFAULT_EXCLUDES)]
    pub exclude: String,

    /// Leading lines kept per sampled file
    #[arg(long, default_value_t = DEFAULT_MAX_LINES)]
    pub max_lines: usize,

    /// Files sampled per top-level directory
    #[arg(long, default_value_t = DEFAULT_PER_DIR)]
    pub per_dir: usize,
}

impl ContextArgs {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::for_root(&self.root);
        config.readme_path = self.root.join(&self.readme);
        config.manifest_path = self.root.join(&self.manifest);
        config.scan = ScanConfig::new(self.ext.split(','), self.exclude.split(','));
        config.limits = SamplingLimits {
            max_lines: self.max_lines,
            per_dir: self.per_dir,
        };
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate README content and write it back
    Update {
        #[command(flatten)]
        context: ContextArgs,

        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        #[arg(long, default_value = DEFAULT_API_BASE)]
        api_base: String,

        /// Total request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Print the assembled prompt without calling the generation service
    Prompt {
        #[command(flatten)]
        context: ContextArgs,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logger(cli.verbose)?;

    match cli.command {
        Commands::Update {
            context,
            model,
            api_base,
            timeout,
            api_key,
        } => {
            info!("Starting update command");
            let mut config = context.into_config();
            config.model = model;
            config.api_base = api_base;
            config.timeout_secs = timeout;
            config.api_key = api_key;
            update_readme(&config)?;
        }
        Commands::Prompt { context, output } => {
            info!("Starting prompt command");
            let config = context.into_config();
            write_prompt(&config, output)?;
        }
    }
    Ok(())
}

fn log_config(config: &RunConfig) {
    debug!(
        "Run parameters: root={}, readme={}, manifest={}, limits={:?}, model={}",
        config.root.display(),
        config.readme_path.display(),
        config.manifest_path.display(),
        config.limits,
        config.model
    );
}

fn update_readme(config: &RunConfig) -> anyhow::Result<()> {
    let api_key = config.api_key()?;
    log_config(config);

    let client = GeminiClient::new(&config.api_base, &config.model, api_key, config.timeout_secs)?;
    let outcome = refresh_readme(config, &client)?;

    print_status(&outcome, &config.readme_path)
}

fn write_prompt(config: &RunConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    log_config(config);

    let context = assemble_context(config)?;
    let prompt = build_prompt(&context);

    create_writer(output.as_deref()).write(&prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RefreshError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parsing_update() {
        let cli = Cli::try_parse_from([
            "readme-refresh",
            "-vv",
            "update",
            "--root",
            "./repo",
            "--ext",
            ".rs,.md",
            "--exclude",
            "target",
            "--per-dir",
            "2",
            "--api-key",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Update {
                context,
                model,
                api_key,
                timeout,
                ..
            } => {
                assert_eq!(model, DEFAULT_MODEL);
                assert_eq!(api_key.as_deref(), Some("secret"));
                assert_eq!(timeout, DEFAULT_TIMEOUT_SECS);

                let config = context.into_config();
                assert_eq!(config.root, PathBuf::from("./repo"));
                assert_eq!(config.readme_path, Path::new("./repo").join("README.md"));
                assert_eq!(config.limits.per_dir, 2);
                assert_eq!(config.limits.max_lines, DEFAULT_MAX_LINES);
                assert!(config.scan.allows_extension("rs"));
                assert!(!config.scan.allows_extension("js"));
                assert!(config.scan.is_excluded("target"));
            }
            Commands::Prompt { .. } => panic!("expected update command"),
        }
    }

    #[test]
    fn test_cli_parsing_prompt() {
        let cli = Cli::try_parse_from([
            "readme-refresh",
            "prompt",
            "--root",
            "/work",
            "--manifest",
            "/elsewhere/package.json",
            "--output",
            "prompt.txt",
        ])
        .unwrap();

        match cli.command {
            Commands::Prompt { context, output } => {
                assert_eq!(output, Some(PathBuf::from("prompt.txt")));
                let config = context.into_config();
                assert_eq!(config.manifest_path, PathBuf::from("/elsewhere/package.json"));
            }
            Commands::Update { .. } => panic!("expected prompt command"),
        }
    }

    #[test]
    fn test_update_requires_credential() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{}").unwrap();
        let config = RunConfig::for_root(temp_dir.path());

        let err = update_readme(&config).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RefreshError>(),
            Some(RefreshError::MissingCredential)
        ));
        assert!(!config.readme_path.exists());
    }

    #[test]
    fn test_write_prompt_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/index.ts"), "export const answer = 42;\n").unwrap();
        fs::write(root.join("package.json"), r#"{"name":"demo"}"#).unwrap();
        let output = root.join("prompt.txt");

        write_prompt(&RunConfig::for_root(root), Some(output.clone())).unwrap();

        let prompt = fs::read_to_string(output).unwrap();
        assert!(prompt.contains("src/index.ts"));
        assert!(prompt.contains("export const answer = 42;"));
        assert!(prompt.contains(r#"{"name":"demo"}"#));
    }
}
