use anyhow::Result;

use magpie::app::App;
use magpie::config::Config;

fn main() -> Result<()> {
    init_logging();

    // Load configuration
    let config = Config::load()?;

    // Initialize the application
    let mut app = App::new(config)?;

    // Run the application
    app.run()?;

    Ok(())
}

/// Route tracing output to a file when MAGPIE_LOG names one; the alternate
/// screen owns the terminal while the panel runs, so stderr is not usable.
fn init_logging() {
    let Ok(path) = std::env::var("MAGPIE_LOG") else {
        return;
    };
    let Ok(file) = std::fs::File::create(&path) else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MAGPIE_LOG_LEVEL")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}
