/// `RUST_LOG` overrides the default `info` level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Routes `tracing` events to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    dioxus::logger::initialize_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_keeps_first_subscriber() {
        init_logging();
        init_logging();
        tracing::info!("logging initialised twice");
    }
}
