use yew::prelude::*;
use yew_icons::{Icon, IconId};

use crate::browser::DirectoryBrowser;
use crate::state::{AppAction, BrowserNav};

#[derive(Properties, PartialEq)]
pub struct BrowserModalProps {
    pub browser: DirectoryBrowser,
    pub dispatch: Callback<AppAction>,
}

#[function_component(BrowserModal)]
pub fn browser_modal(props: &BrowserModalProps) -> Html {
    let nav = |step: BrowserNav| {
        let dispatch = props.dispatch.clone();
        Callback::from(move |_: MouseEvent| dispatch.emit(AppAction::Browser(step.clone())))
    };

    let browser = &props.browser;
    let loading = browser.pending().is_some();

    let body = if let Some(err) = browser.error() {
        html! { <div class="browser-error">{ err.to_string() }</div> }
    } else if browser.listing().is_none() {
        html! { <div class="browser-empty">{"Loading..."}</div> }
    } else {
        let entries = browser.entries();
        if entries.is_empty() {
            html! { <div class="browser-empty">{"No subdirectories"}</div> }
        } else {
            html! {
                <ul class="browser-list">
                    { for entries.into_iter().map(|item| html! {
                        <li class="browser-item" onclick={nav(BrowserNav::Enter(item.path.clone()))} title={item.path.clone()}>
                            <Icon icon_id={IconId::LucideFolder} width={"16"} height={"16"} />
                            <span>{ item.name.clone() }</span>
                        </li>
                    }) }
                </ul>
            }
        }
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal browser-modal">
                <div class="browser-toolbar">
                    <button onclick={nav(BrowserNav::Back)} disabled={!browser.can_go_back() || loading} title="Back">
                        {"Back"}
                    </button>
                    <button onclick={nav(BrowserNav::Home)} disabled={loading} title="Home">
                        <Icon icon_id={IconId::LucideHome} width={"16"} height={"16"} />
                    </button>
                    <span class="browser-path">{ browser.current_label().to_string() }</span>
                    if loading {
                        <span class="browser-loading">{"..."}</span>
                    }
                </div>
                { body }
                <div class="modal-actions">
                    <button onclick={nav(BrowserNav::Close)}>{"Cancel"}</button>
                    <button class="primary" onclick={nav(BrowserNav::Select)} disabled={loading}>
                        {"Select this directory"}
                    </button>
                </div>
            </div>
        </div>
    }
}
