use std::io::Write;

fn default_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Initialise env_logger. `RUST_LOG` wins over the `--debug` flag.
pub fn init_logging(debug: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter(debug)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
