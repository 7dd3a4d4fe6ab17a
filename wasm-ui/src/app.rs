//! Main application component.
//!
//! The visualizer lives inside the component and owns a [`GlooScheduler`]
//! whose timeouts post [`Msg::Tick`] back through the component link. Stale
//! ticks are filtered by the controller, so the view only re-renders when a
//! tick actually advanced playback.

use stepviz::{Access, Operation, Params, TickToken, Topic, Visualizer, check_access};
use yew::prelude::*;

use crate::components::{CodePanel, Controls, ParamsForm, SelectorBar, StatePanel};
use crate::session::LocalStorageGate;
use crate::timer::GlooScheduler;

pub enum Msg {
    SelectTopic(Topic),
    SelectOperation(Operation),
    ApplyParams(Result<Params, String>),
    Toggle,
    StepBack,
    StepForward,
    Jump(usize),
    Reset,
    SetSpeed(u32),
    Tick(TickToken),
    LogIn,
    LogOut,
}

pub struct App {
    viz: Visualizer<GlooScheduler>,
    gate: LocalStorageGate,
    logged_in: bool,
    error: Option<String>,
    /// Bumped on every selection so the params form remounts with fresh
    /// field values.
    form_key: u32,
}

impl App {
    fn report(&mut self, result: Result<(), stepviz::VizError>) {
        match result {
            Ok(()) => self.error = None,
            Err(e) => {
                gloo::console::warn!(e.to_string());
                self.error = Some(e.to_string());
            }
        }
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let scheduler = GlooScheduler::new(ctx.link().callback(Msg::Tick));
        let mut viz = Visualizer::new(scheduler);
        viz.select_topic(Topic::Arrays);
        let gate = LocalStorageGate;
        Self {
            viz,
            logged_in: check_access(&gate, "visualizer") == Access::Granted,
            gate,
            error: None,
            form_key: 0,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Msg) -> bool {
        match msg {
            Msg::SelectTopic(topic) => {
                self.viz.select_topic(topic);
                self.error = None;
                self.form_key += 1;
            }
            Msg::SelectOperation(op) => {
                let result = self.viz.select_operation(op);
                self.report(result);
            }
            Msg::ApplyParams(Ok(params)) => {
                let result = self.viz.set_params(params);
                self.report(result);
            }
            Msg::ApplyParams(Err(message)) => self.error = Some(message),
            Msg::Toggle => self.viz.toggle(),
            Msg::StepBack => self.viz.step_back(),
            Msg::StepForward => self.viz.step_forward(),
            Msg::Jump(i) => self.viz.jump_to(i),
            Msg::Reset => {
                self.viz.reset();
                let result = self.viz.reload();
                self.report(result);
            }
            Msg::SetSpeed(speed) => {
                self.viz.set_speed(speed);
            }
            Msg::Tick(token) => return self.viz.tick(token),
            Msg::LogIn => {
                self.gate.log_in();
                self.logged_in = check_access(&self.gate, "visualizer") == Access::Granted;
            }
            Msg::LogOut => {
                self.gate.log_out();
                self.viz.reset();
                self.logged_in = false;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="app">
                <header class="header">
                    <div class="header-left">
                        <h1>{ "stepviz" }</h1>
                        <p class="subtitle">{ "Data structures and algorithms, one step at a time" }</p>
                    </div>
                    <div class="header-right">
                        if self.logged_in {
                            <button class="logout-button" onclick={link.callback(|_| Msg::LogOut)}>
                                { "Log out" }
                            </button>
                        }
                    </div>
                </header>

                <main class="main">
                    if self.logged_in {
                        { self.view_visualizer(ctx) }
                    } else {
                        <div class="login-gate">
                            <h2>{ "Sign in to use the visualizer" }</h2>
                            <button class="login-button" onclick={link.callback(|_| Msg::LogIn)}>
                                { "Sign in" }
                            </button>
                        </div>
                    }
                </main>

                <footer class="footer">
                    <span class="footer-build">
                        { format!("Build: {}@{} {}", env!("BUILD_HOST"), env!("BUILD_COMMIT"), env!("BUILD_TIMESTAMP")) }
                    </span>
                </footer>
            </div>
        }
    }
}

impl App {
    fn view_visualizer(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let config = self.viz.controller().config();
        let step = self.viz.current_step().cloned();
        let code = self.viz.sequence().map(|s| s.code()).unwrap_or(&[]);

        html! {
            <>
                <SelectorBar
                    topic={self.viz.topic()}
                    operation={self.viz.operation()}
                    on_topic={link.callback(Msg::SelectTopic)}
                    on_operation={link.callback(Msg::SelectOperation)}
                />
                if self.viz.operation().is_some() {
                    <ParamsForm
                        key={self.form_key.to_string()}
                        params={self.viz.params().clone()}
                        on_apply={link.callback(Msg::ApplyParams)}
                    />
                }
                if let Some(error) = &self.error {
                    <div class="error">{ error }</div>
                }
                <Controls
                    state={self.viz.state()}
                    last_index={self.viz.sequence().map(|s| s.last_index())}
                    min_speed={config.min_speed}
                    max_speed={config.max_speed}
                    on_toggle={link.callback(|_| Msg::Toggle)}
                    on_step_back={link.callback(|_| Msg::StepBack)}
                    on_step_forward={link.callback(|_| Msg::StepForward)}
                    on_reset={link.callback(|_| Msg::Reset)}
                    on_jump={link.callback(Msg::Jump)}
                    on_speed={link.callback(Msg::SetSpeed)}
                />
                <div class="panels">
                    <CodePanel code={code} step={step.clone()} />
                    <StatePanel step={step} />
                </div>
            </>
        }
    }
}
