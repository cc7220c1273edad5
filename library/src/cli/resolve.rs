//! `launchpad resolve` - print the launch plan for one item.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;

use launchpad_core::config::Config;
use launchpad_core::{Engine, ResolveError, Resolved, registry};
use launchpad_shared::{FeatureValue, MediaType, PlayableItem, UnknownMediaType};

/// Arguments for the resolve command
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the item (file, folder or archive)
    pub path: PathBuf,

    /// Platform the item belongs to (e.g. nes, psx, windows)
    #[arg(short, long)]
    pub platform: String,

    /// Candidate runner, in order (defaults to the configured list for the platform)
    #[arg(short, long = "runner")]
    pub runners: Vec<String>,

    /// Parsed attribute of the item, as KEY=VALUE
    #[arg(short, long = "feature", value_parser = parse_feature)]
    pub features: Vec<(String, FeatureValue)>,

    /// Treat the path as a folder-based game
    #[arg(long)]
    pub folder: bool,

    /// The path is an archive; launch this member of it, as KIND:ENTRY
    #[arg(long, value_parser = parse_archive)]
    pub archive: Option<(String, String)>,

    /// Physical media type (cartridge, disc, floppy, tape, digital, executable)
    #[arg(long, value_parser = parse_media)]
    pub media: Option<MediaType>,

    /// Print the plan as JSON instead of a shell line
    #[arg(long)]
    pub json: bool,
}

/// Parse `KEY=VALUE` into a feature entry.
pub fn parse_feature(raw: &str) -> Result<(String, FeatureValue), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => {
            Ok((key.to_string(), FeatureValue::parse(value)))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Parse `KIND:ENTRY` into an archive kind and member name.
pub fn parse_archive(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((kind, entry)) if !kind.is_empty() && !entry.is_empty() => {
            Ok((kind.to_ascii_lowercase(), entry.to_string()))
        }
        _ => Err(format!("expected KIND:ENTRY, got '{}'", raw)),
    }
}

pub fn parse_media(raw: &str) -> Result<MediaType, String> {
    raw.parse().map_err(|e: UnknownMediaType| e.to_string())
}

/// Build the item described by the arguments.
pub fn build_item(args: &ResolveArgs) -> Result<PlayableItem> {
    if args.folder && args.archive.is_some() {
        bail!("--folder and --archive cannot be combined");
    }

    let mut item = if args.folder {
        PlayableItem::folder(&args.path, args.platform.as_str())
    } else {
        PlayableItem::new(&args.path, args.platform.as_str())
    };
    if let Some((kind, entry)) = &args.archive {
        item = item.in_container(kind.as_str(), entry.as_str());
    }
    if let Some(media) = args.media {
        item = item.media(media);
    }
    for (key, value) in &args.features {
        item = item.feature(key.as_str(), value.clone());
    }
    Ok(item)
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs, config: &Config, verbose: bool) -> Result<ExitCode> {
    let item = build_item(&args)?;
    let engine = Engine::new(registry::builtin(), config);

    let result = if args.runners.is_empty() {
        engine.resolve_item(&item)
    } else {
        tracing::debug!("Trying {} runner(s) given on the command line", args.runners.len());
        engine.resolve(&item, &args.runners)
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    report(&result, args.json, verbose, &mut stdout.lock(), &mut stderr.lock())
}

/// Write the outcome: the plan on `out`, diagnostics on `err`.
pub fn report(
    result: &Result<Resolved, ResolveError>,
    json: bool,
    verbose: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<ExitCode> {
    match result {
        Ok(resolved) => {
            if verbose {
                for record in &resolved.rejections {
                    writeln!(err, "skipped {}", record)?;
                }
                writeln!(err, "resolved with {}", resolved.runner)?;
            }
            if json {
                let text = serde_json::to_string_pretty(&resolved.plan)
                    .context("Failed to serialize launch plan")?;
                writeln!(out, "{}", text)?;
            } else {
                writeln!(out, "{}", resolved.plan.to_shell_line())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ResolveError::NotLaunchable { runner, reason }) => {
            writeln!(err, "{}: not launchable: {}", runner, reason)?;
            Ok(ExitCode::from(2))
        }
        Err(error @ ResolveError::Exhausted(records)) => {
            writeln!(err, "{}", error)?;
            for record in records {
                writeln!(err, "  {}", record)?;
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::{Rejection, RejectionRecord};
    use launchpad_shared::{LaunchCommand, LaunchPlan};

    fn args(path: &str, platform: &str) -> ResolveArgs {
        ResolveArgs {
            path: PathBuf::from(path),
            platform: platform.to_string(),
            runners: Vec::new(),
            features: Vec::new(),
            folder: false,
            archive: None,
            media: None,
            json: false,
        }
    }

    fn run(result: &Result<Resolved, ResolveError>, json: bool) -> (ExitCode, String, String) {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = report(result, json, true, &mut out, &mut err).unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_parse_feature() {
        assert_eq!(
            parse_feature("Mapper=MBC5").unwrap(),
            ("Mapper".to_string(), FeatureValue::Text("MBC5".into()))
        );
        assert_eq!(
            parse_feature("RomSize=1024").unwrap().1,
            FeatureValue::Int(1024)
        );
        assert!(parse_feature("Mapper").is_err());
        assert!(parse_feature("=x").is_err());
    }

    #[test]
    fn test_parse_archive() {
        assert_eq!(
            parse_archive("7Z:game.sfc").unwrap(),
            ("7z".to_string(), "game.sfc".to_string())
        );
        assert!(parse_archive("zip").is_err());
        assert!(parse_archive("zip:").is_err());
    }

    #[test]
    fn test_parse_media() {
        assert_eq!(parse_media("Tape").unwrap(), MediaType::Tape);
        assert_eq!(
            parse_media("laserdisc").unwrap_err(),
            "unknown media type 'laserdisc'"
        );
    }

    #[test]
    fn test_build_item_from_args() {
        let mut a = args("/roms/snes/smw.7z", "snes");
        a.archive = Some(("7z".into(), "smw.sfc".into()));
        a.features.push(("Region".into(), FeatureValue::Text("NTSC".into())));

        let item = build_item(&a).unwrap();
        assert_eq!(item.extension, "sfc");
        assert_eq!(item.container.as_ref().map(|c| c.kind.as_str()), Some("7z"));
        assert_eq!(item.feature_text("Region"), Some("NTSC"));
    }

    #[test]
    fn test_build_item_rejects_folder_archive() {
        let mut a = args("/games/doom", "dos");
        a.folder = true;
        a.archive = Some(("zip".into(), "doom.exe".into()));
        assert!(build_item(&a).is_err());
    }

    #[test]
    fn test_report_success_shell_line() {
        let resolved = Resolved {
            runner: "mesen".into(),
            plan: LaunchPlan::Single(LaunchCommand::new("mesen", ["/roms/a b.nes"])),
            rejections: vec![RejectionRecord {
                runner: "fceumm_libretro".into(),
                reason: Rejection::FrontendNotConfigured {
                    core: "fceumm_libretro".into(),
                },
            }],
        };
        let (code, out, err) = run(&Ok(resolved), false);
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "mesen '/roms/a b.nes'\n");
        assert!(err.contains("fceumm_libretro: no frontend configured"));
        assert!(err.contains("resolved with mesen"));
    }

    #[test]
    fn test_report_success_json() {
        let resolved = Resolved {
            runner: "mesen".into(),
            plan: LaunchPlan::Single(LaunchCommand::new("mesen", ["/roms/smb.nes"])),
            rejections: Vec::new(),
        };
        let (_, out, _) = run(&Ok(resolved), true);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["kind"], "single");
    }

    #[test]
    fn test_report_exhaustion_lists_reasons() {
        let error = ResolveError::Exhausted(vec![RejectionRecord {
            runner: "duckstation".into(),
            reason: Rejection::missing("bios_dir"),
        }]);
        let (code, out, err) = run(&Err(error), false);
        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("duckstation: bios_dir is not configured"));
    }

    #[test]
    fn test_report_not_launchable() {
        let error = ResolveError::NotLaunchable {
            runner: "ryujinx".into(),
            reason: "update".into(),
        };
        let (code, _, err) = run(&Err(error), false);
        assert_eq!(code, ExitCode::from(2));
        assert!(err.starts_with("ryujinx: not launchable"));
    }
}
