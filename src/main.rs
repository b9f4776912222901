mod app;
mod config;
mod ingest;
mod logging;
mod playback;
mod playlist;
mod runtime;
mod session;
mod storage;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
