use anyhow::{Context, Result};

mod app;
mod domain {
    pub mod entities {
        pub mod cell_mapping;
        pub mod column_spec;
        pub mod dataset;
        pub mod import;
        pub mod session;
        pub mod validation;
    }
}
mod infra {
    pub mod config;
    pub mod logging;
    pub mod http {
        pub mod client;
        pub mod interceptor;
    }
}
mod ui {
    pub mod feedback;
    pub mod route;
    pub mod widgets;
    pub mod pages {
        pub mod account;
        pub mod cell_mapping;
        pub mod data_view;
        pub mod header_mapping;
        pub mod import;
    }
    pub mod state {
        pub mod app_state;
    }
}
mod usecase {
    pub mod ports {
        pub mod api;
    }
    pub mod services {
        pub mod account_service;
        pub mod cell_mapping;
        pub mod data_view;
        pub mod generation;
        pub mod header_renderer;
        pub mod import_service;
        pub mod mapping_editor;
        pub mod source_keys;
        pub mod submit;
    }
}

use crate::app::App;
use crate::infra::config::load_config;
use crate::infra::http::client::HttpApi;
use crate::infra::logging::init_logging;

fn main() -> Result<()> {
    init_logging();
    let config = load_config()?;
    let api = HttpApi::new(config.api_base_url).context("failed to create HTTP client")?;

    let builder = dioxus::LaunchBuilder::new().with_context(api);
    #[cfg(feature = "desktop")]
    let builder = builder.with_cfg(desktop_config()?);
    builder.launch(App);
    Ok(())
}

#[cfg(feature = "desktop")]
fn desktop_config() -> Result<dioxus::desktop::Config> {
    let dirs = crate::infra::config::project_dirs()?;
    let webview_dir = dirs.data_local_dir().join("webview");
    std::fs::create_dir_all(&webview_dir).with_context(|| {
        format!("failed to create webview dir: {}", webview_dir.display())
    })?;
    Ok(dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("Table Admin"))
        .with_data_directory(webview_dir))
}

#[cfg(test)]
mod tests;
