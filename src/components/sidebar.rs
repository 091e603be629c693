use yew::prelude::*;
use yew_icons::{Icon, IconId};

use crate::connectivity::Connectivity;
use crate::state::{AppAction, Page, ShutdownState};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_DATE: &str = env!("VERGEN_BUILD_DATE");

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub page: Page,
    pub connectivity: Connectivity,
    pub shutdown: ShutdownState,
    pub dispatch: Callback<AppAction>,
    pub on_shutdown: Callback<()>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    let nav = |target: Page, icon: IconId| {
        let dispatch = props.dispatch.clone();
        let onclick = Callback::from(move |_| {
            tracing::debug!(to = target.title(), "navigate");
            dispatch.emit(AppAction::Navigate(target));
        });
        let class = if props.page == target { "nav-btn active" } else { "nav-btn" };
        html! {
            <button {class} {onclick} title={target.title()}>
                <Icon icon_id={icon} width={"28"} height={"28"} />
            </button>
        }
    };

    let status_class = match props.connectivity {
        Connectivity::Connected => "status-dot connected",
        Connectivity::Disconnected => "status-dot disconnected",
        Connectivity::Unknown => "status-dot",
    };

    let on_shutdown = {
        let cb = props.on_shutdown.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let (shutdown_label, shutdown_disabled) = match props.shutdown {
        ShutdownState::Idle => ("Stop service", false),
        ShutdownState::Sending => ("Stopping...", true),
        ShutdownState::Sent => ("Stopped", true),
    };

    html! {
        <aside class="sidebar">
            { nav(Page::Download, IconId::LucideDownload) }
            { nav(Page::Pack, IconId::LucideLibrary) }
            { nav(Page::Settings, IconId::LucideSettings) }

            <div class="sidebar-footer">
                <div class="connection" title={props.connectivity.label()}>
                    <span class={status_class}></span>
                    <span>{ props.connectivity.label() }</span>
                </div>
                <button class="danger" onclick={on_shutdown} disabled={shutdown_disabled}>
                    { shutdown_label }
                </button>
                <small class="version">{ format!("v{VERSION} ({BUILD_DATE})") }</small>
            </div>
        </aside>
    }
}
