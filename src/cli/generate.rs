//! `basic` and `repo` commands

use clap::Args;
use implgen::config::{ExplicitFlags, ProjectConfig};
use implgen::parse::{load_package, module_import_path};
use implgen::writer::{OverwritePolicy, Writer};
use implgen::{GenerateOptions, Result, Strategy};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options shared by the generating commands
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Go source file, or a YAML/JSON package model
    #[arg(short, long)]
    pub src: PathBuf,

    /// Destination directory (default: from implgen.yaml, else .)
    #[arg(short, long)]
    pub dst: Option<PathBuf>,

    /// Only implement this interface
    #[arg(long)]
    pub interface_name: Option<String>,

    /// Name of the generated struct (default: Implementation)
    #[arg(long)]
    pub implementation_name: Option<String>,

    /// Package name of the implementation; needs --interface-name
    #[arg(long, requires = "interface_name")]
    pub package_name: Option<String>,

    /// Put the struct and all methods into one file
    #[arg(long)]
    pub single_file: bool,

    /// Go module path of the destination (default: from go.mod)
    #[arg(long)]
    pub module_path: Option<String>,

    /// Overwrite existing files without asking
    #[arg(long, conflicts_with = "keep")]
    pub force: bool,

    /// Never overwrite existing files
    #[arg(long)]
    pub keep: bool,

    /// Skip goimports/gofmt
    #[arg(long)]
    pub no_format: bool,

    /// Print the files that would be written
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file (default: ./implgen.yaml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl GenerateArgs {
    fn policy(&self) -> OverwritePolicy {
        if self.force {
            OverwritePolicy::Overwrite
        } else if self.keep {
            OverwritePolicy::Keep
        } else {
            OverwritePolicy::Ask
        }
    }

    fn options(&self, tracing: bool) -> (GenerateOptions, ExplicitFlags) {
        let defaults = GenerateOptions::default();
        let opts = GenerateOptions {
            destination: self.dst.clone().unwrap_or(defaults.destination),
            interface_name: self.interface_name.clone(),
            implementation_name: self
                .implementation_name
                .clone()
                .unwrap_or(defaults.implementation_name),
            package_name: self.package_name.clone(),
            single_file: self.single_file,
            tracing,
            module_path: self.module_path.clone(),
            ..Default::default()
        };
        let explicit = ExplicitFlags {
            destination: self.dst.is_some(),
            implementation_name: self.implementation_name.is_some(),
            single_file: self.single_file,
            tracing,
        };
        (opts, explicit)
    }
}

pub fn cmd_generate(strategy: Strategy, args: &GenerateArgs, tracing: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => ProjectConfig::load(path)?,
        None => ProjectConfig::load_from_dir(Path::new("."))?.unwrap_or_default(),
    };

    let (mut opts, explicit) = args.options(tracing);
    config.apply(&mut opts, &explicit);
    if opts.module_path.is_none() {
        opts.module_path = module_import_path(&std::env::current_dir()?)?;
    }
    opts.validate()?;
    debug!(?opts, "generation options");

    let pkg = load_package(&args.src)?;
    let files = strategy.generate(&pkg, &opts)?;

    if args.dry_run {
        for file in &files {
            println!("{}", file.path.display());
        }
        return Ok(());
    }

    let format = !args.no_format && config.format_enabled();
    let report = Writer::new(args.policy(), format).write_all(&files)?;
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "{} generation finished",
        strategy
    );
    Ok(())
}
