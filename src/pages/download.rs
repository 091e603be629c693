use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_icons::{Icon, IconId};

use crate::browser::PickTarget;
use crate::components::task_panel::TaskPanelView;
use crate::state::{AppAction, DownloadField};
use crate::tasks::panel::TaskPanel;
use crate::tasks::submit::{parse_count, DownloadForm};
use crate::types::{Settings, CLIENT_TYPES, IMAGE_FORMATS};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub form: DownloadForm,
    pub settings: Settings,
    pub panel: TaskPanel,
    pub dispatch: Callback<AppAction>,
    pub on_submit: Callback<()>,
    pub on_browse: Callback<(String, PickTarget)>,
}

#[function_component(DownloadPage)]
pub fn download_page(props: &Props) -> Html {
    let edit = |make: fn(String) -> DownloadField| {
        let dispatch = props.dispatch.clone();
        move |value: String| dispatch.emit(AppAction::EditDownload(make(value)))
    };

    let on_albums = {
        let edit = edit(DownloadField::Albums);
        Callback::from(move |e: InputEvent| edit(e.target_unchecked_into::<HtmlTextAreaElement>().value()))
    };
    let on_path = {
        let edit = edit(DownloadField::Path);
        Callback::from(move |e: InputEvent| edit(e.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_format = {
        let edit = edit(DownloadField::ImageFormat);
        Callback::from(move |e: Event| edit(e.target_unchecked_into::<HtmlSelectElement>().value()))
    };
    let on_client = {
        let edit = edit(DownloadField::ClientType);
        Callback::from(move |e: Event| edit(e.target_unchecked_into::<HtmlSelectElement>().value()))
    };
    let on_threads = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let raw = e.target_unchecked_into::<HtmlInputElement>().value();
            match parse_count("Threads", &raw) {
                Ok(n) => dispatch.emit(AppAction::EditDownload(DownloadField::Threads(n))),
                Err(err) => dispatch.emit(AppAction::Invalid(err.to_string())),
            }
        })
    };
    let on_clear = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |_| dispatch.emit(AppAction::ClearAlbums))
    };
    let on_browse = {
        let on_browse = props.on_browse.clone();
        let current = props.form.download_path(&props.settings).to_string();
        Callback::from(move |_| on_browse.emit((current.clone(), PickTarget::DownloadPath)))
    };
    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |_| on_submit.emit(()))
    };

    let busy = props.panel.is_busy();
    let threads = props.form.thread_count(&props.settings);
    let format = props.form.image_format(&props.settings).to_string();
    let client = props.form.client_type(&props.settings).to_string();

    html! {
        <section class="page">
            <div class="form-group">
                <label for="album-ids">{"Album ids (one per line)"}</label>
                <textarea id="album-ids" rows="6" value={props.form.album_text.clone()} oninput={on_albums} />
                <div class="input-group">
                    <button class="icon-btn" onclick={on_clear} title="Clear">
                        <Icon icon_id={IconId::LucideTrash2} width={"18"} height={"18"} />
                    </button>
                </div>
            </div>

            <div class="form-group">
                <label for="download-path">{"Download directory"}</label>
                <div class="input-group">
                    <input type="text" id="download-path" value={props.form.download_path(&props.settings).to_string()} oninput={on_path} />
                    <button onclick={on_browse}>
                        <Icon icon_id={IconId::LucideFolder} width={"18"} height={"18"} />
                    </button>
                </div>
            </div>

            <div class="form-group row">
                <label for="thread-count">{ format!("Threads: {threads}") }</label>
                <input type="range" id="thread-count" min="1" max="20" value={threads.to_string()} oninput={on_threads} />
            </div>

            <div class="form-group row">
                <label for="image-format">{"Image format"}</label>
                <select id="image-format" onchange={on_format}>
                    { for IMAGE_FORMATS.iter().map(|f| html! {
                        <option value={*f} selected={format == *f}>{ *f }</option>
                    }) }
                </select>
            </div>

            <div class="form-group row">
                <label for="client-type">{"Client"}</label>
                <select id="client-type" onchange={on_client}>
                    { for CLIENT_TYPES.iter().map(|c| html! {
                        <option value={*c} selected={client == *c}>{ *c }</option>
                    }) }
                </select>
            </div>

            <div class="form-group center">
                <button class="primary" disabled={busy} onclick={on_submit}>
                    <Icon icon_id={IconId::LucideDownload} width={"18"} height={"18"} />
                    { if busy { " Downloading..." } else { " Start download" } }
                </button>
            </div>

            <TaskPanelView panel={props.panel.clone()} />
        </section>
    }
}
