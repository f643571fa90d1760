use clap::{Parser, ValueEnum};
use sfc_extract::{ComponentSource, LuaEngine, PrintConfig, SfcError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

/// Extract sections, methods and font-face rules from component files.
#[derive(Debug, Parser)]
#[command(name = "sfc-extract", version)]
struct Args {
    /// Component files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// YAML file with `engine` and `font_faces` settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the style section with @font-face rules replaced for print
    #[arg(long)]
    print_style: bool,

    /// Also compile every method and the mounted hook with the Luau engine
    #[arg(long)]
    synthesize: bool,

    /// Output format for extracted components
    #[arg(long, value_enum, default_value = "yaml")]
    format: Format,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            process::exit(2);
        }
    };

    let mut exit_code = 0;
    for path in &args.files {
        match process_file(path, &args, &config) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("✗ {} has errors:", path.display());
                eprintln!("  {}", e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn load_config(path: Option<&Path>) -> Result<PrintConfig, SfcError> {
    let yaml = path.map(fs::read_to_string).transpose()?;
    PrintConfig::load(yaml.as_deref())
}

fn process_file(path: &Path, args: &Args, config: &PrintConfig) -> Result<String, SfcError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SfcError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    let source = ComponentSource::new(&content);

    if args.print_style {
        return Ok(source.print_style(&config.font_faces));
    }

    let component = source.extract()?;
    if args.synthesize {
        let engine = LuaEngine::new(config.engine);
        let methods = component.synthesize_methods(&engine)?;
        let hook = component.synthesize_mounted(&engine)?;
        log::info!(
            "{}: synthesized {} method(s){}",
            path.display(),
            methods.len(),
            if hook.is_some() { " and mounted hook" } else { "" }
        );
    }

    let rendered = match args.format {
        Format::Yaml => {
            serde_yaml::to_string(&component).map_err(|e| SfcError::Io(e.to_string()))?
        }
        Format::Json => serde_json::to_string_pretty(&component)
            .map_err(|e| SfcError::Io(e.to_string()))?,
    };
    Ok(rendered)
}
