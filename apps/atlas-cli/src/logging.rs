use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Install the global logger: `RUST_LOG` decides the level unless `verbose`
/// forces debug output. With `log_file` every line goes to that file instead of
/// stderr.
pub fn init(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    );
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {}: {}",
            buf.timestamp_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {e}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .map_err(|e| anyhow::anyhow!("Logger already initialized: {e}"))
}
