//! Configuration management for the G-code generator.
//!
//! Handles:
//! - Command-line argument parsing with localized help
//! - Language and post-processor style resolution

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::StyleError;
use crate::i18n::{DEFAULT_LOCALE, MessageCatalog, normalize_locale};
use crate::post::{ArcDirection, StyleConfig};
use crate::toolpath::{
    CuttingParams, FaceParams, Point, RasterAxis, RoundPocketParams, SquarePocketParams,
};

/// Environment variable selecting the message language
pub const LANG_ENV: &str = "GCODEGEN_LANG";

/// Command-line arguments for the G-code generator
#[derive(Debug, Parser)]
#[command(name = "gcodegen")]
#[command(about = "G-code generator for face and pocket milling")]
#[command(version, disable_help_subcommand = true)]
pub struct Args {
    /// Message language
    #[arg(long, global = true, help = "Message language (ru, en)")]
    pub lang: Option<String>,

    /// Post-processor style file
    #[arg(long, global = true, help = "Post-processor style file (TOML or JSON)")]
    pub post: Option<PathBuf>,

    /// Log level for diagnostics on stderr
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Face milling program
    Face(FaceArgs),
    /// Round pocket program
    Round(RoundArgs),
    /// Square pocket program
    Square(SquareArgs),
    /// Check a program for common mistakes
    Validate(ValidateArgs),
    /// Describe the generators
    Help {
        topic: Option<String>,
    },
}

/// Cutting options shared by every generator
#[derive(Debug, Clone, clap::Args)]
pub struct CuttingArgs {
    #[arg(long)]
    pub depth: f64,

    #[arg(long, default_value_t = 0.5)]
    pub step_down: f64,

    #[arg(long, default_value_t = 800.0)]
    pub feed: f64,

    #[arg(long, default_value_t = 10000)]
    pub spindle: u32,

    #[arg(long, default_value_t = 10.0)]
    pub tool_diam: f64,

    #[arg(long, default_value_t = 5.0)]
    pub safe: f64,
}

impl CuttingArgs {
    pub fn to_params(&self) -> CuttingParams {
        CuttingParams {
            depth: self.depth,
            step_down: self.step_down,
            feed: self.feed,
            spindle: self.spindle,
            tool_diameter: self.tool_diam,
            safe_z: self.safe,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct FaceArgs {
    #[arg(long)]
    pub width: f64,

    #[arg(long)]
    pub length: f64,

    #[command(flatten)]
    pub cutting: CuttingArgs,

    /// Minimum X of the stock
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_x: f64,

    /// Minimum Y of the stock
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_y: f64,

    /// Overrun past each edge, fraction of the tool diameter
    #[arg(long, default_value_t = 0.5)]
    pub overlap: f64,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl FaceArgs {
    pub fn to_params(&self) -> FaceParams {
        FaceParams {
            start: Point::new(self.start_x, self.start_y),
            overlap: self.overlap,
            ..FaceParams::new(self.width, self.length, self.cutting.to_params())
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RoundArgs {
    #[arg(long)]
    pub diameter: f64,

    #[command(flatten)]
    pub cutting: CuttingArgs,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub center_x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub center_y: f64,

    /// Ring spacing, fraction of the tool diameter
    #[arg(long, default_value_t = 0.6)]
    pub stepover_ratio: f64,

    /// Clockwise rings (G2), the default
    #[arg(long, overrides_with = "ccw")]
    pub cw: bool,

    /// Counter-clockwise rings (G3)
    #[arg(long, overrides_with = "cw")]
    pub ccw: bool,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl RoundArgs {
    pub fn direction(&self) -> ArcDirection {
        if self.ccw {
            ArcDirection::CounterClockwise
        } else {
            ArcDirection::Clockwise
        }
    }

    pub fn to_params(&self) -> RoundPocketParams {
        RoundPocketParams {
            center: Point::new(self.center_x, self.center_y),
            stepover_ratio: self.stepover_ratio,
            direction: self.direction(),
            ..RoundPocketParams::new(self.diameter, self.cutting.to_params())
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct SquareArgs {
    #[arg(long)]
    pub width: f64,

    #[arg(long)]
    pub length: f64,

    #[command(flatten)]
    pub cutting: CuttingArgs,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub start_y: f64,

    #[arg(long, default_value_t = 0.6)]
    pub stepover_ratio: f64,

    #[arg(long, default_value_t = 0.5)]
    pub overlap: f64,

    /// Axis the raster rows travel along
    #[arg(long, value_enum, default_value_t = RasterAxis::X)]
    pub raster_axis: RasterAxis,

    /// Skip the perimeter pass at each depth
    #[arg(long)]
    pub no_contour: bool,

    /// Output file (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl SquareArgs {
    pub fn to_params(&self) -> SquarePocketParams {
        SquarePocketParams {
            start: Point::new(self.start_x, self.start_y),
            stepover_ratio: self.stepover_ratio,
            overlap: self.overlap,
            finish_contour: !self.no_contour,
            raster_axis: self.raster_axis,
            ..SquarePocketParams::new(self.width, self.length, self.cutting.to_params())
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct ValidateArgs {
    /// Program file to check
    pub file: PathBuf,

    /// Print diagnostics as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Lowest Z that counts as a safe retract
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub safe_height: f64,
}

/// Help keys for the cutting options of every generator subcommand
const CUTTING_HELP: [(&str, &str); 6] = [
    ("depth", "opt_depth"),
    ("step_down", "opt_step_down"),
    ("feed", "opt_feed"),
    ("spindle", "opt_spindle"),
    ("tool_diam", "opt_tool_diam"),
    ("safe", "opt_safe"),
];

/// The clap command tree with help texts taken from the catalog
pub fn localized_command(catalog: &MessageCatalog, locale: &str) -> clap::Command {
    let text = |key: &str| catalog.get(locale, key).trim().to_string();

    let generator = |cmd: clap::Command, about_key: &str, sized: bool| {
        let cmd = CUTTING_HELP
            .iter()
            .fold(cmd.about(text(about_key)), |cmd, &(id, key)| {
                cmd.mut_arg(id, |arg| arg.help(text(key)))
            });
        if sized {
            cmd.mut_arg("width", |arg| arg.help(text("opt_width")))
                .mut_arg("length", |arg| arg.help(text("opt_length")))
        } else {
            cmd
        }
    };

    Args::command()
        .about(text("app_help"))
        .mut_subcommand("face", |cmd| generator(cmd, "cmd_face_help", true))
        .mut_subcommand("round", |cmd| generator(cmd, "cmd_round_help", false))
        .mut_subcommand("square", |cmd| generator(cmd, "cmd_square_help", true))
        .mut_subcommand("validate", |cmd| cmd.about(text("cmd_validate_help")))
        .mut_subcommand("help", |cmd| cmd.about(text("cmd_help_help")))
}

/// Value of `--lang` if present on the raw command line
pub fn lang_hint<I, T>(argv: I) -> Option<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv = argv
        .into_iter()
        .map(|arg| Into::<OsString>::into(arg).to_string_lossy().into_owned());

    while let Some(arg) = argv.next() {
        if arg == "--" {
            break;
        }
        if arg == "--lang" {
            return argv.next();
        }
        if let Some(value) = arg.strip_prefix("--lang=") {
            return Some(value.to_string());
        }
    }
    None
}

/// Parse arguments, rendering help in the language they select
pub fn parse_localized<I, T>(argv: I, catalog: &MessageCatalog) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    let locale = resolve_lang(
        lang_hint(argv.iter().cloned()).as_deref(),
        std::env::var(LANG_ENV).ok().as_deref(),
    );

    let matches = localized_command(catalog, &locale).try_get_matches_from(argv)?;
    Args::from_arg_matches(&matches)
}

/// Language from the command line, else the environment, else the default
pub fn resolve_lang(cli: Option<&str>, env: Option<&str>) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(normalize_locale)
        .find(|lang| !lang.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Normalized message language
    pub lang: String,
    /// Style file to load; built-in defaults when `None`
    pub style_path: Option<PathBuf>,
    /// Log filter
    pub log_level: String,
}

impl Config {
    /// Create configuration from parsed arguments and the environment
    pub fn from_args(args: &Args) -> Result<Self> {
        Ok(Self::resolve(
            args,
            std::env::var(LANG_ENV).ok().as_deref(),
            Self::user_style_path().as_deref(),
        ))
    }

    /// Create configuration from explicit sources (useful for testing)
    pub fn resolve(args: &Args, env_lang: Option<&str>, user_style: Option<&Path>) -> Self {
        let style_path = args
            .post
            .clone()
            .or_else(|| user_style.map(Path::to_path_buf));

        Config {
            lang: resolve_lang(args.lang.as_deref(), env_lang),
            style_path,
            log_level: args.log_level.clone(),
        }
    }

    /// `<config dir>/gcodegen/post.toml`, if that file exists
    pub fn user_style_path() -> Option<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gcodegen").join("post.toml"))
            .filter(|path| path.is_file())
    }

    /// Load the configured style, or the built-in one
    pub fn load_style(&self) -> Result<StyleConfig, StyleError> {
        match &self.style_path {
            Some(path) => StyleConfig::from_path(path),
            None => Ok(StyleConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).expect("arguments parse")
    }

    #[test]
    fn test_command_tree_is_consistent() {
        Args::command().debug_assert();
        let catalog = MessageCatalog::builtin();
        localized_command(&catalog, "en").debug_assert();
        localized_command(&catalog, "ru").debug_assert();
    }

    #[test]
    fn test_face_defaults() {
        let args = parse(&[
            "gcodegen", "face", "--width", "100", "--length", "50", "--depth", "1",
        ]);
        let Command::Face(face) = args.command else {
            panic!("expected face");
        };
        assert!(face.output.is_none());

        let params = face.to_params();
        assert_eq!(params.width, 100.0);
        assert_eq!(params.overlap, 0.5);
        assert_eq!(
            params.cutting,
            CuttingParams {
                depth: 1.0,
                ..CuttingParams::default()
            }
        );
    }

    #[test]
    fn test_round_direction_flags() {
        let args = parse(&[
            "gcodegen", "round", "--diameter", "40", "--depth", "2", "--ccw",
        ]);
        let Command::Round(round) = args.command else {
            panic!("expected round");
        };
        assert_eq!(round.to_params().direction, ArcDirection::CounterClockwise);

        let args = parse(&[
            "gcodegen", "round", "--diameter", "40", "--depth", "2", "--ccw", "--cw",
        ]);
        let Command::Round(round) = args.command else {
            panic!("expected round");
        };
        assert_eq!(round.direction(), ArcDirection::Clockwise);
    }

    #[test]
    fn test_square_options() {
        let args = parse(&[
            "gcodegen",
            "square",
            "--width",
            "30",
            "--length",
            "20",
            "--depth",
            "3",
            "--raster-axis",
            "y",
            "--no-contour",
            "--start-x",
            "-15",
        ]);
        let Command::Square(square) = args.command else {
            panic!("expected square");
        };
        let params = square.to_params();
        assert_eq!(params.raster_axis, RasterAxis::Y);
        assert!(!params.finish_contour);
        assert_eq!(params.start, Point::new(-15.0, 0.0));
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = parse(&["gcodegen", "validate", "prog.nc", "--json", "--lang", "en"]);
        assert_eq!(args.lang.as_deref(), Some("en"));
        let Command::Validate(validate) = args.command else {
            panic!("expected validate");
        };
        assert_eq!(validate.file, PathBuf::from("prog.nc"));
        assert!(validate.json);
        assert_eq!(validate.safe_height, 0.0);
    }

    #[test]
    fn test_help_topic() {
        let args = parse(&["gcodegen", "help", "face"]);
        assert!(matches!(args.command, Command::Help { topic: Some(t) } if t == "face"));
    }

    #[test]
    fn test_lang_resolution_order() {
        assert_eq!(resolve_lang(Some("EN"), Some("ru")), "en");
        assert_eq!(resolve_lang(None, Some("en_US.UTF-8")), "en");
        assert_eq!(resolve_lang(None, None), "ru");
        assert_eq!(resolve_lang(Some(""), None), "ru");
    }

    #[test]
    fn test_lang_hint() {
        assert_eq!(
            lang_hint(["gcodegen", "--lang", "en", "face"]),
            Some("en".to_string())
        );
        assert_eq!(
            lang_hint(["gcodegen", "help", "--lang=ru"]),
            Some("ru".to_string())
        );
        assert_eq!(lang_hint(["gcodegen", "--", "--lang", "en"]), None);
    }

    #[test]
    fn test_localized_help() {
        let catalog = MessageCatalog::builtin();
        let mut cmd = localized_command(&catalog, "en");
        let face = cmd.find_subcommand_mut("face").expect("face subcommand");
        let help = face.render_help().to_string();
        assert!(help.contains(catalog.get("en", "opt_width").trim()));
        assert!(help.contains(catalog.get("en", "cmd_face_help").trim()));
    }

    #[test]
    fn test_parse_localized() {
        let catalog = MessageCatalog::builtin();
        let args =
            parse_localized(["gcodegen", "--lang", "en", "help"], &catalog).expect("parses");
        assert!(matches!(args.command, Command::Help { topic: None }));
    }

    #[test]
    fn test_style_path_resolution() {
        let user = PathBuf::from("/home/u/.config/gcodegen/post.toml");

        let args = parse(&["gcodegen", "help"]);
        let config = Config::resolve(&args, None, Some(&user));
        assert_eq!(config.style_path, Some(user.clone()));
        assert_eq!(config.lang, "ru");
        assert_eq!(config.log_level, "warn");

        let args = parse(&["gcodegen", "--post", "mine.json", "help"]);
        let config = Config::resolve(&args, Some("en"), Some(&user));
        assert_eq!(config.style_path, Some(PathBuf::from("mine.json")));
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn test_load_default_style() {
        let args = parse(&["gcodegen", "help"]);
        let config = Config::resolve(&args, None, None);
        assert_eq!(
            config.load_style().expect("default style"),
            StyleConfig::default()
        );
    }
}
