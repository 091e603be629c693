// Only the wasm build mounts the views; native builds compile the state
// modules for `cargo test`.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod api;
mod browser;
mod config;
mod connectivity;
mod settings;
mod state;
mod tasks;
mod types;

#[cfg(test)]
mod test_support;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod log;
#[cfg(target_arch = "wasm32")]
mod pages;

#[cfg(target_arch = "wasm32")]
fn main() {
    use std::rc::Rc;

    console_error_panic_hook::set_once();
    let config = config::Config::from_window();
    log::init(config.log_level);
    tracing::info!(
        api_base = %config.api_base,
        version = env!("CARGO_PKG_VERSION"),
        target = env!("VERGEN_CARGO_TARGET_TRIPLE"),
        rustc = env!("VERGEN_RUSTC_SEMVER"),
        "starting comic-crawler-ui"
    );

    yew::Renderer::<app::App>::with_props(app::AppProps { config: Rc::new(config) }).render();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!(
        "This crate targets WebAssembly. Use `trunk serve` to run the frontend. Do not `cargo run` this crate natively."
    );
    std::process::exit(1);
}
