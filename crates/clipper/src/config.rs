// Author: Dustin Pilgrim
// License: MIT

use std::env;
use std::path::Path;

use rune_cfg::RuneConfig;

use clipper_core::template::{DEFAULT_IMGOUT_FORMAT, DEFAULT_VIDOUT_FORMAT};

use crate::cli::Args;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipperConfig {
    pub imgout_format: String,
    pub vidout_format: String,
    pub outline_colour: u32,    // ARGB
    pub background_colour: u32, // ARGB
}

impl Default for ClipperConfig {
    fn default() -> Self {
        Self {
            imgout_format: DEFAULT_IMGOUT_FORMAT.to_string(),
            vidout_format: DEFAULT_VIDOUT_FORMAT.to_string(),
            outline_colour: 0xFFFF_FF00,
            background_colour: 0xFF10_1010,
        }
    }
}

impl ClipperConfig {
    /// Outline colour as RGB bytes for drawing into frames.
    pub fn outline_rgb(&self) -> [u8; 3] {
        argb_to_rgb(self.outline_colour)
    }
}

/// Output templates after applying CLI > config > built-in precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub image: String,
    pub video: String,
}

impl Templates {
    pub fn resolve(args: &Args, cfg: &ClipperConfig) -> Self {
        if let Some(both) = args.output_format.as_deref() {
            let both = expand_env(both);
            return Self {
                image: both.clone(),
                video: both,
            };
        }
        Self {
            image: expand_env(args.imgout_format.as_deref().unwrap_or(&cfg.imgout_format)),
            video: expand_env(args.vidout_format.as_deref().unwrap_or(&cfg.vidout_format)),
        }
    }
}

/// Missing file means defaults.
pub fn load(path: &Path) -> Result<ClipperConfig, String> {
    if !path.exists() {
        return Ok(ClipperConfig::default());
    }

    let rc = RuneConfig::from_file(path).map_err(|e| format!("failed to read config: {e}"))?;
    parse_config(&rc)
}

fn parse_config(rc: &RuneConfig) -> Result<ClipperConfig, String> {
    let mut cfg = ClipperConfig::default();

    if !rc.has("clipper") {
        return Ok(cfg);
    }

    if let Some(v) = get_string(rc, "clipper.imgout_format")? {
        cfg.imgout_format = v;
    }
    if let Some(v) = get_string(rc, "clipper.vidout_format")? {
        cfg.vidout_format = v;
    }
    if let Some(v) = get_string(rc, "clipper.outline_colour")? {
        cfg.outline_colour = parse_hex_colour(&v)
            .map_err(|e| format!("config error at clipper.outline_colour: {e}"))?;
    }
    if let Some(v) = get_string(rc, "clipper.background_colour")? {
        cfg.background_colour = parse_hex_colour(&v)
            .map_err(|e| format!("config error at clipper.background_colour: {e}"))?;
    }

    Ok(cfg)
}

fn get_string(rc: &RuneConfig, key: &str) -> Result<Option<String>, String> {
    rc.get_optional::<String>(key)
        .map_err(|e| format!("config error at {key}: {e}"))
}

/// `#RRGGBB` to opaque ARGB.
pub fn parse_hex_colour(s: &str) -> Result<u32, String> {
    let hex = s
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| "colour must start with #".to_string())?;

    if hex.len() != 6 {
        return Err("colour must be 6 hex digits (RRGGBB)".into());
    }

    let rgb = u32::from_str_radix(hex, 16).map_err(|_| "invalid hex colour".to_string())?;
    Ok(0xFF00_0000 | rgb)
}

pub fn argb_to_rgb(argb: u32) -> [u8; 3] {
    [(argb >> 16) as u8, (argb >> 8) as u8, argb as u8]
}

fn expand_env(s: &str) -> String {
    if !s.contains("$env.HOME") {
        return s.to_string();
    }
    match env::var("HOME") {
        Ok(home) => s.replace("$env.HOME", &home),
        Err(_) => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_colour("#FFFF00"), Ok(0xFFFF_FF00));
        assert_eq!(parse_hex_colour(" #101010 "), Ok(0xFF10_1010));
        assert!(parse_hex_colour("FFFF00").is_err());
        assert!(parse_hex_colour("#FFF").is_err());
        assert!(parse_hex_colour("#GGGGGG").is_err());
        assert_eq!(argb_to_rgb(0xFF12_3456), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(&dir.path().join("nope.rune")).unwrap();
        assert_eq!(cfg, ClipperConfig::default());
        assert_eq!(cfg.outline_rgb(), [255, 255, 0]);
    }

    #[test]
    fn cli_overrides_config() {
        let cfg = ClipperConfig {
            imgout_format: "cfg-img".into(),
            vidout_format: "cfg-vid".into(),
            ..ClipperConfig::default()
        };

        let args = Args::try_parse_from(["clipper", "-i", "cli-img"]).unwrap();
        let t = Templates::resolve(&args, &cfg);
        assert_eq!(t.image, "cli-img");
        assert_eq!(t.video, "cfg-vid");

        let args = Args::try_parse_from(["clipper", "-i", "cli-img", "-o", "both"]).unwrap();
        let t = Templates::resolve(&args, &cfg);
        assert_eq!((t.image.as_str(), t.video.as_str()), ("both", "both"));
    }
}
