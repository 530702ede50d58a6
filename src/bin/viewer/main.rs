use clap::Parser;

mod app;
mod args;

use app::{App, AppError};
use args::Args;

use hello_triangle::session::SessionConfig;

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = <Args as Parser>::parse();

    // Shader paths are resolved here; the session only ever sees source text.
    let vert = match &args.vert {
        Some(path) => std::fs::read_to_string(path)?,
        None => include_str!("gl_shaders/triangle.vert").to_owned(),
    };
    let frag = match &args.frag {
        Some(path) => std::fs::read_to_string(path)?,
        None => include_str!("gl_shaders/triangle.frag").to_owned(),
    };

    let config = SessionConfig::new(&vert, &frag);

    let app = App::new(&args);

    app.run(config)
}
