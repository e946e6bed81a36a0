use dioxus::{
    desktop::{Config, WindowBuilder},
    logger::tracing,
    prelude::*,
};
use dioxus_router::prelude::*;
use tracing_subscriber::EnvFilter;
use vr_tracker_common::config::poll_config;

use components::Navbar;
use tracker::{TrackerContext, TrackerLaunch};
use views::{Home, Settings};

mod components;
mod shutdown;
mod styles;
mod tracker;
mod views;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("RUST_LOG")
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = match poll_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load poll config: {}", e);
            std::process::exit(1);
        }
    };

    let (poller, receiver) = match vr_tracker_server::start_polling(&config) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Failed to start tracker: {:#}", e);
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::new()
        .with_cfg(
            Config::default().with_menu(None).with_window(
                WindowBuilder::new()
                    .with_title("VR Tracker")
                    .with_inner_size(dioxus::desktop::tao::dpi::LogicalSize::new(900.0, 760.0)),
            ),
        )
        .with_context(TrackerLaunch::new(config, poller, receiver))
        .launch(app);
}

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Home {},
    #[route("/settings")]
    Settings {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
fn app() -> Element {
    let launch = use_context::<TrackerLaunch>();
    let tracker = use_context_provider(|| Signal::new(TrackerContext::new()));

    use_future({
        let launch = launch.clone();
        move || {
            let launch = launch.clone();
            async move {
                if let Some(receiver) = launch.take_receiver() {
                    let mut tracker = tracker();
                    tracker.run(receiver).await;
                }
            }
        }
    });

    shutdown::init(launch);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        div {
            Router::<Route> {}
        }
    }
}
