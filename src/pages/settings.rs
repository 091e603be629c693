use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_icons::{Icon, IconId};

use crate::browser::PickTarget;
use crate::state::{AppAction, SettingsField};
use crate::tasks::submit::parse_count;
use crate::types::{Settings, CLIENT_TYPES, IMAGE_FORMATS};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub draft: Settings,
    pub dirty: bool,
    pub can_reset: bool,
    pub dispatch: Callback<AppAction>,
    pub on_save: Callback<()>,
    pub on_browse: Callback<(String, PickTarget)>,
}

#[function_component(SettingsPage)]
pub fn settings_page(props: &Props) -> Html {
    let text_input = |make: fn(String) -> SettingsField| {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            dispatch.emit(AppAction::EditSettings(make(value)));
        })
    };
    let select = |make: fn(String) -> SettingsField| {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            dispatch.emit(AppAction::EditSettings(make(value)));
        })
    };
    let on_threads = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: Event| {
            let raw = e.target_unchecked_into::<HtmlInputElement>().value();
            match parse_count("Threads", &raw) {
                Ok(n) => dispatch.emit(AppAction::EditSettings(SettingsField::Threads(n.max(1)))),
                Err(err) => dispatch.emit(AppAction::Invalid(err.to_string())),
            }
        })
    };
    let browse = |target: PickTarget, current: &str| {
        let on_browse = props.on_browse.clone();
        let current = current.to_string();
        Callback::from(move |_: MouseEvent| on_browse.emit((current.clone(), target)))
    };
    let on_reset = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |_| dispatch.emit(AppAction::ResetSettings))
    };
    let on_save = {
        let cb = props.on_save.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let draft = &props.draft;

    html! {
        <section class="page settings-form">
            <div class="form-group">
                <label for="settings-download-path">{"Default download directory"}</label>
                <div class="input-group">
                    <input type="text" id="settings-download-path" value={draft.download_path.clone()}
                        oninput={text_input(SettingsField::DownloadPath)} />
                    <button onclick={browse(PickTarget::SettingsDownloadPath, &draft.download_path)}>
                        <Icon icon_id={IconId::LucideFolder} width={"18"} height={"18"} />
                    </button>
                </div>
            </div>

            <div class="form-group row">
                <label for="settings-threads">{"Download threads"}</label>
                <input type="number" id="settings-threads" min="1" value={draft.thread_count.to_string()} onchange={on_threads} />
            </div>

            <div class="form-group row">
                <label for="settings-format">{"Image format"}</label>
                <select id="settings-format" onchange={select(SettingsField::ImageFormat)}>
                    { for IMAGE_FORMATS.iter().map(|f| html! {
                        <option value={*f} selected={draft.image_format == *f}>{ *f }</option>
                    }) }
                </select>
            </div>

            <div class="form-group row">
                <label for="settings-client">{"Client"}</label>
                <select id="settings-client" onchange={select(SettingsField::ClientType)}>
                    { for CLIENT_TYPES.iter().map(|c| html! {
                        <option value={*c} selected={draft.client_type == *c}>{ *c }</option>
                    }) }
                </select>
            </div>

            <div class="form-group">
                <label for="settings-kavita">{"Kavita library directory"}</label>
                <div class="input-group">
                    <input type="text" id="settings-kavita" value={draft.kavita_output_dir.clone()}
                        oninput={text_input(SettingsField::KavitaOutput)} />
                    <button onclick={browse(PickTarget::SettingsKavitaOutput, &draft.kavita_output_dir)}>
                        <Icon icon_id={IconId::LucideFolder} width={"18"} height={"18"} />
                    </button>
                </div>
            </div>

            <div class="form-group center">
                <button onclick={on_reset} disabled={!props.can_reset} title="Restore defaults">
                    <Icon icon_id={IconId::LucideRotateCcw} width={"18"} height={"18"} />
                </button>
                <button class="primary" onclick={on_save}>{"Save"}</button>
                if props.dirty {
                    <span class="unsaved">{"Unsaved changes"}</span>
                }
            </div>
        </section>
    }
}
