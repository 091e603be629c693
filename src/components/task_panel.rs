use yew::prelude::*;

use crate::tasks::panel::{escape_terminal_line, TaskPanel, TERMINAL_PLACEHOLDER};
use crate::types::LogLevel;

#[derive(Properties, PartialEq)]
pub struct TaskPanelProps {
    pub panel: TaskPanel,
}

fn level_class(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Success => "log-line log-success",
        LogLevel::Warning => "log-line log-warning",
        LogLevel::Error => "log-line log-error",
        LogLevel::Info | LogLevel::Other => "log-line log-info",
    }
}

/// Progress bar, client log and raw terminal output of one task.
#[function_component(TaskPanelView)]
pub fn task_panel_view(props: &TaskPanelProps) -> Html {
    let panel = &props.panel;
    if !panel.is_visible() {
        return html! {};
    }

    let progress = panel.progress();
    let percent = progress.percent();

    let terminal = match panel.terminal() {
        Some(lines) if !lines.is_empty() => html! {
            <>
                { for lines.iter().map(|line| html! {
                    <div class="terminal-line">
                        { Html::from_html_unchecked(format!("&gt; {}", escape_terminal_line(line)).into()) }
                    </div>
                }) }
            </>
        },
        _ => html! { <div class="terminal-line placeholder">{ TERMINAL_PLACEHOLDER }</div> },
    };

    html! {
        <div class="task-panel">
            <div class="progress-header">
                <span class="status">{ panel.status_label() }</span>
                <span class="counts">
                    { format!("{} / {} ({} failed)", progress.completed, progress.total, progress.failed) }
                </span>
            </div>
            <div class="progress-bar">
                <div class="progress-fill" style={format!("width: {percent}%")}></div>
            </div>
            <span class="progress-text">{ format!("{percent}%") }</span>

            <div class="log-box">
                { for panel.logs().iter().map(|line| html! {
                    <div class={level_class(line.level)}>
                        <span class="log-time">{ format!("[{}]", line.time) }</span>
                        <span class="log-level">{ line.level.label() }</span>
                        <span class="log-message">{ line.message.clone() }</span>
                    </div>
                }) }
            </div>

            <div class="terminal">{ terminal }</div>
        </div>
    }
}
