use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    /// Initial window width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,
    /// Initial window height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,
    /// Window title
    #[arg(long, default_value = "hello-triangle")]
    pub title: String,
    /// Vertex shader file, uses the embedded shader when omitted
    #[arg(long)]
    pub vert: Option<PathBuf>,
    /// Fragment shader file, uses the embedded shader when omitted
    #[arg(long)]
    pub frag: Option<PathBuf>,
}
