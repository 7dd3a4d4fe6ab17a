//! UI components for the visualizer.

use stepviz::{
    Annotation, AnnotationKind, Operation, Params, PlaybackState, PlaybackStatus, Step, Topic,
    Value, parse_list,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Topic and operation pickers.
#[derive(Properties, PartialEq)]
pub struct SelectorBarProps {
    pub topic: Option<Topic>,
    pub operation: Option<Operation>,
    pub on_topic: Callback<Topic>,
    pub on_operation: Callback<Operation>,
}

#[function_component(SelectorBar)]
pub fn selector_bar(props: &SelectorBarProps) -> Html {
    let on_topic_change = {
        let on_topic = props.on_topic.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(topic) = target.value().parse::<Topic>() {
                on_topic.emit(topic);
            }
        })
    };

    let on_operation_change = {
        let on_operation = props.on_operation.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(op) = target.value().parse::<Operation>() {
                on_operation.emit(op);
            }
        })
    };

    let operations = props.topic.map(Topic::operations).unwrap_or(&[]);

    html! {
        <div class="selector-bar">
            <select class="topic-select" onchange={on_topic_change}>
                <option value="" selected={props.topic.is_none()}>{ "Choose a topic" }</option>
                { for Topic::ALL.iter().map(|t| html! {
                    <option value={t.key()} selected={props.topic == Some(*t)}>{ t.title() }</option>
                })}
            </select>
            <select class="operation-select" onchange={on_operation_change} disabled={props.topic.is_none()}>
                <option value="" selected={props.operation.is_none()}>{ "Choose an operation" }</option>
                { for operations.iter().map(|op| html! {
                    <option value={op.name()} selected={props.operation == Some(*op)}>{ op.name() }</option>
                })}
            </select>
        </div>
    }
}

/// Parameter inputs. Empty fields fall back to the operation's defaults.
#[derive(Properties, PartialEq)]
pub struct ParamsFormProps {
    pub params: Params,
    pub on_apply: Callback<Result<Params, String>>,
}

fn field_text<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_field<T: std::str::FromStr>(name: &str, text: &str) -> Result<Option<T>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| format!("{name}: '{text}' is not a number"))
}

#[function_component(ParamsForm)]
pub fn params_form(props: &ParamsFormProps) -> Html {
    let index = use_state(|| field_text(props.params.index));
    let value = use_state(|| field_text(props.params.value));
    let target = use_state(|| field_text(props.params.target));
    let input = use_state(|| {
        props
            .params
            .input
            .as_ref()
            .map(|items| {
                items
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default()
    });

    let bind = |handle: UseStateHandle<String>| {
        Callback::from(move |e: InputEvent| {
            let el: HtmlInputElement = e.target_unchecked_into();
            handle.set(el.value());
        })
    };

    let on_apply_click = {
        let (index, value, target, input) =
            (index.clone(), value.clone(), target.clone(), input.clone());
        let on_apply = props.on_apply.clone();
        Callback::from(move |_: MouseEvent| {
            let parsed = (|| -> Result<Params, String> {
                let list = input.trim();
                Ok(Params {
                    index: parse_field("index", &index)?,
                    value: parse_field("value", &value)?,
                    target: parse_field("target", &target)?,
                    input: if list.is_empty() {
                        None
                    } else {
                        Some(parse_list(list)?)
                    },
                })
            })();
            on_apply.emit(parsed);
        })
    };

    html! {
        <div class="params-form">
            <label>{ "index" }<input type="text" value={(*index).clone()} oninput={bind(index.clone())} /></label>
            <label>{ "value" }<input type="text" value={(*value).clone()} oninput={bind(value.clone())} /></label>
            <label>{ "target" }<input type="text" value={(*target).clone()} oninput={bind(target.clone())} /></label>
            <label class="wide">{ "input" }<input type="text" placeholder="5,2,8,1" value={(*input).clone()} oninput={bind(input.clone())} /></label>
            <button class="apply-button" onclick={on_apply_click}>{ "Apply" }</button>
        </div>
    }
}

/// Playback buttons, scrubber and speed dial.
#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub state: PlaybackState,
    pub last_index: Option<usize>,
    pub min_speed: u32,
    pub max_speed: u32,
    pub on_toggle: Callback<()>,
    pub on_step_back: Callback<()>,
    pub on_step_forward: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_jump: Callback<usize>,
    pub on_speed: Callback<u32>,
}

#[function_component(Controls)]
pub fn controls(props: &ControlsProps) -> Html {
    let idle = props.state.status == PlaybackStatus::Idle;
    let click = |cb: &Callback<()>| cb.reform(|_: MouseEvent| ());

    let on_scrub = {
        let on_jump = props.on_jump.clone();
        Callback::from(move |e: InputEvent| {
            let el: HtmlInputElement = e.target_unchecked_into();
            if let Ok(i) = el.value().parse::<usize>() {
                on_jump.emit(i);
            }
        })
    };

    let on_speed_input = {
        let on_speed = props.on_speed.clone();
        Callback::from(move |e: InputEvent| {
            let el: HtmlInputElement = e.target_unchecked_into();
            if let Ok(v) = el.value().parse::<u32>() {
                on_speed.emit(v);
            }
        })
    };

    let position = match props.last_index {
        Some(last) => format!("Step {} / {}", props.state.current_index + 1, last + 1),
        None => "No sequence".to_string(),
    };

    html! {
        <div class="controls">
            <button class="debug-btn" onclick={click(&props.on_reset)}>{ "⏮ Reset" }</button>
            <button class="debug-btn" onclick={click(&props.on_step_back)} disabled={idle}>{ "◀ Back" }</button>
            <button class="debug-btn" onclick={click(&props.on_toggle)} disabled={idle}>
                { if props.state.is_running { "⏸ Pause" } else { "▶ Play" } }
            </button>
            <button class="debug-btn" onclick={click(&props.on_step_forward)} disabled={idle}>{ "Forward ▶" }</button>
            <input
                type="range"
                class="scrubber"
                min="0"
                max={props.last_index.unwrap_or(0).to_string()}
                value={props.state.current_index.to_string()}
                oninput={on_scrub}
                disabled={idle}
            />
            <span class="current-step-display">{ position }</span>
            <div class="speed-control">
                <label class="speed-label">{ "Speed:" }</label>
                <input
                    type="range"
                    class="speed-slider"
                    min={props.min_speed.to_string()}
                    max={props.max_speed.to_string()}
                    value={props.state.speed.to_string()}
                    oninput={on_speed_input}
                />
                <span class="speed-value">{ props.state.speed }</span>
            </div>
        </div>
    }
}

fn annotation_badge(note: &Annotation) -> Html {
    let (class, label) = match note.kind {
        AnnotationKind::For => ("badge for", "for"),
        AnnotationKind::While => ("badge while", "while"),
        AnnotationKind::Recursion => ("badge recursion", "depth"),
    };
    html! {
        <span class={class}>
            { format!("{label} {} · {}", note.iteration, note.condition) }
        </span>
    }
}

/// Code listing with the current line highlighted.
#[derive(Properties, PartialEq)]
pub struct CodePanelProps {
    pub code: &'static [&'static str],
    pub step: Option<Step>,
}

#[function_component(CodePanel)]
pub fn code_panel(props: &CodePanelProps) -> Html {
    let line = props.step.as_ref().map(|s| s.source_line as usize);
    html! {
        <div class="panel code-panel">
            <div class="panel-header">
                <h2>{ "Code" }</h2>
                if let Some(note) = props.step.as_ref().and_then(|s| s.annotation.as_ref()) {
                    { annotation_badge(note) }
                }
            </div>
            <pre class="code-listing">
                { for props.code.iter().enumerate().map(|(i, text)| html! {
                    <div class={classes!("code-line", (line == Some(i + 1)).then_some("current"))}>
                        <span class="line-no">{ format!("{:>2}", i + 1) }</span>
                        <span class="line-text">{ *text }</span>
                    </div>
                })}
            </pre>
        </div>
    }
}

fn value_html(value: &Value) -> Html {
    match value {
        Value::List(items) => html! {
            <span class="cells">
                { for items.iter().enumerate().map(|(i, item)| html! {
                    <span class="cell" title={i.to_string()}>{ item.to_string() }</span>
                })}
            </span>
        },
        other => html! { <span class="scalar">{ other.to_string() }</span> },
    }
}

/// Variable snapshot and narration for the current step.
#[derive(Properties, PartialEq)]
pub struct StatePanelProps {
    pub step: Option<Step>,
}

#[function_component(StatePanel)]
pub fn state_panel(props: &StatePanelProps) -> Html {
    let Some(step) = &props.step else {
        return html! {
            <div class="panel state-panel">
                <span class="no-data">{ "Pick a topic and an operation to begin." }</span>
            </div>
        };
    };

    html! {
        <div class="panel state-panel">
            <div class="panel-header">
                <h2>{ "State" }</h2>
            </div>
            <p class="step-description">{ &step.description }</p>
            <table class="snapshot">
                { for step.snapshot.iter().map(|(name, value)| html! {
                    <tr>
                        <td class="var-name">{ name }</td>
                        <td class="var-value">{ value_html(value) }</td>
                    </tr>
                })}
            </table>
        </div>
    }
}
