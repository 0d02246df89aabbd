// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "clipper",
    version,
    about = "Clipper: crop rotated and sheared regions out of images and video frames"
)]
pub struct Args {
    /// Directory, image file or video file to clip from
    #[arg(default_value = ".")]
    pub reference: PathBuf,

    /// Output template for both image and video input (overrides -i and -v)
    #[arg(short = 'o', long)]
    pub output_format: Option<String>,

    /// Output template for image input
    /// (default: %d/imageclipper/%i.%e_%04r_%04x_%04y_%04w_%04h.png)
    #[arg(short = 'i', long)]
    pub imgout_format: Option<String>,

    /// Output template for video input
    /// (default: %d/imageclipper/%i.%e_%04f_%04r_%04x_%04y_%04w_%04h.png)
    #[arg(short = 'v', long)]
    pub vidout_format: Option<String>,

    /// Frame to start at, 1-based (index into the sorted file list for images)
    #[arg(short = 'f', long)]
    pub frame: Option<u64>,

    /// Wayland output to show the viewer on (e.g. DP-1)
    #[arg(long)]
    pub output: Option<String>,

    /// Log to stderr (in addition to the log file)
    #[arg(long)]
    pub verbose: bool,

    /// Override log file path (default: $XDG_STATE_HOME/clipper/clipper.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
pub enum Cmd {
    /// Print Haar-training annotation lines for a directory of clips
    Annotate {
        /// Directory holding clips written with the default image template
        clipdir: PathBuf,

        /// Prefix joined in front of each source image name
        #[arg(long, default_value = "")]
        path: PathBuf,
    },
}
