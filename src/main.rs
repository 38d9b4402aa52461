mod app;
mod input;
mod render;
mod telemetry;
mod terminal_view;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
