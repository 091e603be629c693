use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::api::http::HttpBackend;
use crate::api::Backend;
use crate::browser::{self, PickTarget};
use crate::components::browser_modal::BrowserModal;
use crate::components::sidebar::Sidebar;
use crate::config::Config;
use crate::connectivity::probe;
use crate::pages;
use crate::settings;
use crate::state::{AppAction, AppState, BrowserNav, NoticeKind, Page};
use crate::tasks::poller::{BrowserTimer, CancelToken, PollIntervals};
use crate::tasks::run_task;
use crate::types::{JobRequest, Settings, TaskKind};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<Config>,
}

/// Starts tasks and owns one cancel token per task kind.
#[derive(Clone)]
struct Launcher {
    backend: HttpBackend,
    intervals: PollIntervals,
    tokens: Rc<RefCell<HashMap<TaskKind, CancelToken>>>,
    dispatcher: UseReducerDispatcher<AppState>,
}

impl Launcher {
    /// A new task of a kind stops the poller of the previous one.
    fn launch(&self, job: JobRequest, intro: String) {
        let kind = job.kind();
        let token = CancelToken::new();
        if let Some(previous) = self.tokens.borrow_mut().insert(kind, token.clone()) {
            previous.cancel();
        }
        self.dispatcher.dispatch(AppAction::TaskStarting { kind, intro });

        let this = self.clone();
        spawn_local(async move {
            let dispatcher = this.dispatcher.clone();
            run_task(&this.backend, &BrowserTimer, this.intervals, &job, &token, |event| {
                dispatcher.dispatch(AppAction::Task { kind, event })
            })
            .await;
        });
    }

    fn cancel_all(&self) {
        for token in self.tokens.borrow().values() {
            token.cancel();
        }
    }
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let state = use_reducer(AppState::default);
    let backend = (*use_memo(props.config.clone(), |config| HttpBackend::new(config.clone()))).clone();
    let tokens = use_mut_ref(HashMap::<TaskKind, CancelToken>::new);
    let launcher = Launcher {
        backend: backend.clone(),
        intervals: PollIntervals::from(&*props.config),
        tokens,
        dispatcher: state.dispatcher(),
    };

    // Leaving the app stops every outstanding poller.
    {
        let launcher = launcher.clone();
        use_effect_with((), move |_| move || launcher.cancel_all());
    }

    // Connectivity: once at startup, then on the health interval.
    let check_health = {
        let backend = backend.clone();
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| {
            let backend = backend.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                dispatcher.dispatch(AppAction::Connectivity(probe(&backend).await));
            });
        })
    };
    {
        let check_health = check_health.clone();
        use_effect_with((), move |_| {
            check_health.emit(());
            || ()
        });
    }
    {
        let millis = props.config.health_interval.as_millis() as u32;
        use_interval(move || check_health.emit(()), millis);
    }

    // Settings: at startup and whenever the settings page is entered.
    {
        let backend = backend.clone();
        let dispatcher = state.dispatcher();
        let loaded = state.settings.is_loaded();
        use_effect_with(state.page, move |page| {
            if *page == Page::Settings || !loaded {
                spawn_local(async move {
                    match settings::fetch(&backend).await {
                        Ok(s) => dispatcher.dispatch(AppAction::SettingsLoaded(s)),
                        Err(err) => {
                            tracing::warn!(%err, "using default settings");
                            dispatcher.dispatch(AppAction::SettingsUnavailable(err));
                        }
                    }
                });
            }
            || ()
        });
    }

    // Directory browser: fetch whatever step is pending.
    {
        let backend = backend.clone();
        let dispatcher = state.dispatcher();
        use_effect_with(state.browser.pending().cloned(), move |pending| {
            if let Some(step) = pending.clone() {
                spawn_local(async move {
                    let (seq, result) = browser::fetch_step(&backend, &step).await;
                    dispatcher.dispatch(AppAction::BrowserLoaded { seq, result });
                });
            }
            || ()
        });
    }

    let dispatch = {
        let dispatcher = state.dispatcher();
        Callback::from(move |action: AppAction| dispatcher.dispatch(action))
    };

    let on_browse = {
        let dispatch = dispatch.clone();
        Callback::from(move |(initial, target): (String, PickTarget)| {
            dispatch.emit(AppAction::Browser(BrowserNav::Open { initial, target }))
        })
    };

    // Invalid input never reaches the backend.
    let submit = |kind: TaskKind| {
        let state = state.clone();
        let launcher = launcher.clone();
        Callback::from(move |_: ()| match state.prepare_job(kind) {
            Ok((job, intro)) => launcher.launch(job, intro),
            Err(err) => state.dispatch(AppAction::Invalid(err.to_string())),
        })
    };
    let on_download = submit(TaskKind::Download);
    let on_pack = submit(TaskKind::Pack);

    let save = {
        let backend = backend.clone();
        let dispatcher = state.dispatcher();
        Callback::from(move |next: Settings| {
            let backend = backend.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                match settings::persist(&backend, next).await {
                    Ok(saved) => dispatcher.dispatch(AppAction::SettingsSaved(saved)),
                    Err(err) => dispatcher.dispatch(AppAction::SettingsFailed(err)),
                }
            });
        })
    };

    let on_save_settings = {
        let state = state.clone();
        let save = save.clone();
        Callback::from(move |_: ()| save.emit(state.settings.draft().clone()))
    };

    let on_save_kavita = {
        let state = state.clone();
        Callback::from(move |_: ()| {
            let canonical = state.settings.canonical();
            let output = state.pack_form.output_dir(canonical);
            save.emit(settings::with_kavita_output(canonical, output));
        })
    };

    let on_shutdown = {
        let backend = backend.clone();
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message("Stop the backend service? It has to be started again before further use.")
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            dispatcher.dispatch(AppAction::ShutdownSending);
            let backend = backend.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                dispatcher.dispatch(AppAction::ShutdownFinished(backend.shutdown().await));
            });
        })
    };

    let notice = state.notice.as_ref().map(|notice| {
        let class = match notice.kind {
            NoticeKind::Info => "notice notice-info",
            NoticeKind::Error => "notice notice-error",
        };
        let on_dismiss = {
            let dispatch = dispatch.clone();
            Callback::from(move |_| dispatch.emit(AppAction::DismissNotice))
        };
        html! {
            <div class={class} onclick={on_dismiss}>{ notice.text.clone() }</div>
        }
    });

    let body = match state.page {
        Page::Download => html! {
            <pages::download::DownloadPage
                form={state.download_form.clone()}
                settings={state.settings.canonical().clone()}
                panel={state.download.clone()}
                dispatch={dispatch.clone()}
                on_submit={on_download}
                on_browse={on_browse.clone()}
            />
        },
        Page::Pack => html! {
            <pages::pack::PackPage
                form={state.pack_form.clone()}
                settings={state.settings.canonical().clone()}
                panel={state.pack.clone()}
                dispatch={dispatch.clone()}
                on_submit={on_pack}
                on_save_default={on_save_kavita}
                on_browse={on_browse.clone()}
            />
        },
        Page::Settings => html! {
            <pages::settings::SettingsPage
                draft={state.settings.draft().clone()}
                dirty={state.settings.is_dirty()}
                can_reset={state.settings.can_reset()}
                dispatch={dispatch.clone()}
                on_save={on_save_settings}
                on_browse={on_browse}
            />
        },
    };

    html! {
        <>
            <Sidebar
                page={state.page}
                connectivity={state.connectivity}
                shutdown={state.shutdown}
                dispatch={dispatch.clone()}
                on_shutdown={on_shutdown}
            />
            <main class="container">
                <h1 class="page-title">{ state.page.title() }</h1>
                { for notice }
                { body }
            </main>
            if state.browser.is_open() {
                <BrowserModal browser={state.browser.clone()} dispatch={dispatch} />
            }
        </>
    }
}
