use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_icons::{Icon, IconId};

use crate::browser::PickTarget;
use crate::components::task_panel::TaskPanelView;
use crate::state::{AppAction, PackField};
use crate::tasks::panel::TaskPanel;
use crate::tasks::submit::PackForm;
use crate::types::Settings;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub form: PackForm,
    pub settings: Settings,
    pub panel: TaskPanel,
    pub dispatch: Callback<AppAction>,
    pub on_submit: Callback<()>,
    /// Persist the current output directory as the default.
    pub on_save_default: Callback<()>,
    pub on_browse: Callback<(String, PickTarget)>,
}

#[function_component(PackPage)]
pub fn pack_page(props: &Props) -> Html {
    let output = props.form.output_dir(&props.settings).to_string();

    let on_source = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            dispatch.emit(AppAction::EditPack(PackField::Source(value)));
        })
    };
    let on_output = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            dispatch.emit(AppAction::EditPack(PackField::Output(value)));
        })
    };
    let on_overwrite = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: Event| {
            let checked = e.target_unchecked_into::<HtmlInputElement>().checked();
            dispatch.emit(AppAction::EditPack(PackField::Overwrite(checked)));
        })
    };
    let on_level = {
        let dispatch = props.dispatch.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            match value.parse::<u32>() {
                Ok(level) => dispatch.emit(AppAction::EditPack(PackField::CompressLevel(level))),
                Err(_) => dispatch.emit(AppAction::Invalid("Compression level must be a whole number".into())),
            }
        })
    };
    let browse = |target: PickTarget, current: String| {
        let on_browse = props.on_browse.clone();
        Callback::from(move |_: MouseEvent| on_browse.emit((current.clone(), target)))
    };
    let on_save_default = {
        let cb = props.on_save_default.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_submit = {
        let cb = props.on_submit.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let busy = props.panel.is_busy();
    let level = props.form.compress_level;

    html! {
        <section class="page">
            <div class="form-group">
                <label for="source-dir">{"Source directory (downloaded albums)"}</label>
                <div class="input-group">
                    <input type="text" id="source-dir" value={props.form.source_dir.clone()} oninput={on_source} />
                    <button onclick={browse(PickTarget::PackSource, props.form.source_dir.clone())}>
                        <Icon icon_id={IconId::LucideFolder} width={"18"} height={"18"} />
                    </button>
                </div>
            </div>

            <div class="form-group">
                <label for="output-dir">{"Kavita library directory"}</label>
                <div class="input-group">
                    <input type="text" id="output-dir" value={output.clone()} oninput={on_output} />
                    <button onclick={browse(PickTarget::PackOutput, output)}>
                        <Icon icon_id={IconId::LucideFolder} width={"18"} height={"18"} />
                    </button>
                    <button onclick={on_save_default} title="Save as default">{"Save as default"}</button>
                </div>
            </div>

            <div class="form-group row">
                <label for="overwrite">{"Overwrite existing archives"}</label>
                <input type="checkbox" id="overwrite" checked={props.form.overwrite} onchange={on_overwrite} />
            </div>

            <div class="form-group row">
                <label for="compress-level">{"Compression level"}</label>
                <select id="compress-level" onchange={on_level}>
                    { for (0..=PackForm::MAX_COMPRESS_LEVEL).map(|n| html! {
                        <option value={n.to_string()} selected={level == n}>{ n.to_string() }</option>
                    }) }
                </select>
            </div>

            <div class="form-group center">
                <button class="primary" disabled={busy} onclick={on_submit}>
                    <Icon icon_id={IconId::LucideLibrary} width={"18"} height={"18"} />
                    { if busy { " Packing..." } else { " Start packing" } }
                </button>
            </div>

            <TaskPanelView panel={props.panel.clone()} />
        </section>
    }
}
