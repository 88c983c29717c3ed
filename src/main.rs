mod cli;
mod config;
mod coordinator;
mod error;
mod geometry;
mod gestures;
mod input;
mod logging;
mod params;
mod publisher;
mod tracker;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
