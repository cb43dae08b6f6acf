use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use gcodegen::config::{self, Command, Config, ValidateArgs};
use gcodegen::help::help_text;
use gcodegen::i18n::MessageCatalog;
use gcodegen::post::PostProcessor;
use gcodegen::toolpath::{generate_face, generate_round_pocket, generate_square_pocket};
use gcodegen::validation::{ValidationOptions, validate_program};

fn main() -> Result<ExitCode> {
    let catalog = MessageCatalog::builtin();

    let args = match config::parse_localized(std::env::args_os(), &catalog) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };
    let config = Config::from_args(&args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
    log::debug!("Resolved configuration: {:?}", config);

    match args.command {
        Command::Face(face) => {
            let post = load_post(&config)?;
            let code = generate_face(&face.to_params(), &post)?;
            emit(&code, face.output.as_deref())?;
        }
        Command::Round(round) => {
            let post = load_post(&config)?;
            let code = generate_round_pocket(&round.to_params(), &post)?;
            emit(&code, round.output.as_deref())?;
        }
        Command::Square(square) => {
            let post = load_post(&config)?;
            let code = generate_square_pocket(&square.to_params(), &post)?;
            emit(&code, square.output.as_deref())?;
        }
        Command::Validate(validate) => {
            return run_validate(&validate, &catalog, &config.lang);
        }
        Command::Help { topic } => {
            println!("{}", help_text(&catalog, &config.lang, topic.as_deref()));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_post(config: &Config) -> Result<PostProcessor> {
    let style = config.load_style().with_context(|| match &config.style_path {
        Some(path) => format!("Failed to load post-processor style {}", path.display()),
        None => "Failed to load default post-processor style".to_string(),
    })?;
    Ok(PostProcessor::new(style))
}

/// Write generated text to `output`, or stdout when none is given
fn emit(code: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} bytes to {}", code.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(code.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn run_validate(args: &ValidateArgs, catalog: &MessageCatalog, lang: &str) -> Result<ExitCode> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let options = ValidationOptions {
        safe_height: args.safe_height,
    };
    let messages = validate_program(&text, catalog, lang, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if messages.is_empty() {
        println!("{}", catalog.get(lang, "validate_ok"));
    } else {
        println!("{}", catalog.get(lang, "validate_title"));
        for (i, message) in messages.iter().enumerate() {
            println!("{:>3}. {}", i + 1, message);
        }
    }

    Ok(if messages.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
