//! Main application component.

use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use compository::{
    AppAction, AppState, BootstrapError, Navigation, Route, Router, Screen, Subscription,
    UiConfig, UnavailableReason, config, connect_to_holochain,
};

use crate::components::{
    DnaDetail, HolochainNotPresent, HomePanel, LoadingPanel, NonexistingDna, NoticeBanner,
    PublishZomePanel,
};
use crate::conductor::{BrowserConnector, UiService};
use crate::convert::js_error_message;
use crate::elements::{BoundElements, ChildNotification};
use crate::history::{BrowserLocation, current_path, listen_popstate};

/// Configuration baked in at build time, keyed by variable name.
const BAKED_ENV: &[(&str, Option<&str>)] = &[
    (config::ADMIN_URL_VAR, option_env!("COMPOSITORY_ADMIN_URL")),
    (config::APP_URL_VAR, option_env!("COMPOSITORY_APP_URL")),
    (config::APP_TIMEOUT_VAR, option_env!("COMPOSITORY_APP_TIMEOUT_MS")),
    (config::DNA_HASH_VAR, option_env!("COMPOSITORY_DNA_HASH")),
    (config::FILE_STORAGE_PROVIDER_VAR, option_env!("FILE_STORAGE_PROVIDER")),
    (config::STATIC_DEMO_VAR, option_env!("GH_PAGES")),
    (config::DOCKER_DESKTOP_URL_VAR, option_env!("DOCKER_DESKTOP_URL")),
    (config::ASSETS_BASE_VAR, option_env!("COMPOSITORY_ASSETS_BASE")),
];

fn build_env(name: &str) -> Option<String> {
    BAKED_ENV
        .iter()
        .find(|(var, _)| *var == name)
        .and_then(|(_, value)| value.map(str::to_string))
}

/// Root view state, updated only through [`AppAction`]s.
#[derive(Clone, PartialEq, Default)]
struct RootState(AppState);

impl Reducible for RootState {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: AppAction) -> Rc<Self> {
        let mut state = self.0.clone();
        state.apply(action);
        Rc::new(RootState(state))
    }
}

struct RouteBinding {
    _subscription: Subscription,
    _popstate: Option<EventListener>,
}

/// Route listeners live here while the root view is mounted. Bootstrap
/// finishes asynchronously, so it checks `mounted` before installing them.
#[derive(Default)]
struct RouteSlot {
    mounted: bool,
    binding: Option<RouteBinding>,
}

impl RouteSlot {
    /// Install `binding` unless the view has already gone away.
    fn install(&mut self, binding: impl FnOnce() -> RouteBinding) -> bool {
        if !self.mounted {
            return false;
        }
        self.binding = Some(binding());
        true
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.binding = None;
    }
}

/// Reduce each navigation into the view state; detail routes also need a
/// fresh cell listing before the view can settle.
fn on_navigation(
    service: UiService,
    dispatcher: UseReducerDispatcher<RootState>,
) -> impl Fn(&Navigation) + 'static {
    move |navigation: &Navigation| {
        dispatcher.dispatch(AppAction::Navigated(navigation.clone()));

        if matches!(navigation.route, Route::Dna { .. }) {
            let service = service.clone();
            let dispatcher = dispatcher.clone();
            let navigation = navigation.clone();
            spawn_local(async move {
                if let Some(action) = service.lookup_detail(&navigation).await {
                    dispatcher.dispatch(action);
                }
            });
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| UiConfig::from_lookup(build_env));
    let router = use_memo((), |_| Router::new(BrowserLocation));
    let state = use_reducer(RootState::default);
    let elements = use_state(|| None::<BoundElements>);
    let slot = use_mut_ref(RouteSlot::default);

    // Connect once, then start routing.
    {
        let config = config.clone();
        let router = router.clone();
        let dispatcher = state.dispatcher();
        let bound = elements.clone();
        use_effect_with((), move |_| {
            slot.borrow_mut().mounted = true;
            {
                let slot = slot.clone();
                spawn_local(async move {
                    let config = match &*config {
                        Ok(config) => config.clone(),
                        Err(e) => {
                            let e = BootstrapError::from(e.clone());
                            tracing::error!(error = %e, "invalid configuration");
                            dispatcher.dispatch(AppAction::BootstrapFailed(e.unavailable_reason()));
                            return;
                        }
                    };

                    let session = match connect_to_holochain(&BrowserConnector, &config).await {
                        Ok(session) => session,
                        Err(e) => {
                            tracing::error!(error = %e, "could not connect to holochain");
                            dispatcher.dispatch(AppAction::BootstrapFailed(e.unavailable_reason()));
                            return;
                        }
                    };

                    let elements = match BoundElements::bind(&session.service) {
                        Ok(elements) => elements,
                        Err(e) => {
                            let message = js_error_message(&e);
                            tracing::error!(error = %message, "could not register compository elements");
                            dispatcher.dispatch(AppAction::BootstrapFailed(
                                UnavailableReason::Misconfigured(format!(
                                    "could not register compository elements: {}",
                                    message
                                )),
                            ));
                            return;
                        }
                    };

                    let router = (*router).clone();
                    let installed = slot.borrow_mut().install(|| RouteBinding {
                        _subscription: router
                            .subscribe(on_navigation(session.service.clone(), dispatcher.clone())),
                        _popstate: listen_popstate(router.clone()),
                    });
                    if !installed {
                        tracing::debug!("root view unmounted before bootstrap finished");
                        return;
                    }
                    bound.set(Some(elements));
                    dispatcher.dispatch(AppAction::BootstrapSucceeded {
                        announcement: session.announcement,
                    });
                    router.resolve(&current_path());
                });
            }
            move || slot.borrow_mut().unmount()
        });
    }

    let go_home = {
        let router = router.clone();
        Callback::from(move |_: ()| {
            router.navigate("/");
        })
    };

    let go_publish = {
        let router = router.clone();
        Callback::from(move |_: ()| {
            router.navigate(&Route::PublishZome.path());
        })
    };

    let on_child = {
        let router = router.clone();
        Callback::from(move |(event, cell_id): ChildNotification| {
            match event.route(cell_id.as_ref()) {
                Some(route) => {
                    router.navigate(&route.path());
                }
                None => tracing::warn!(event = event.name(), "child event without a route"),
            }
        })
    };

    let on_dismiss = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| {
            dispatcher.dispatch(AppAction::DismissNotice);
        })
    };

    let display_config = match &*config {
        Ok(config) => config.clone(),
        Err(_) => UiConfig::new(String::new()),
    };

    let body = match (state.0.screen(display_config.static_demo), (*elements).clone()) {
        (Screen::Loading, _) => html! { <LoadingPanel /> },
        (Screen::HolochainNotPresent { reason }, _) => html! {
            <HolochainNotPresent
                config={display_config.clone()}
                reason={reason.map(|r| r.to_string())}
            />
        },
        (Screen::NonexistingDna(dna), _) => html! {
            <NonexistingDna dna={dna.to_string()} on_back={go_home.clone()} />
        },
        (Screen::Dna(cell_id), Some(elements)) => html! {
            <DnaDetail {elements} cell_id={cell_id.clone()} on_event={on_child.clone()} />
        },
        (Screen::PublishZome, Some(elements)) => html! {
            <PublishZomePanel {elements} on_event={on_child.clone()} on_back={go_home.clone()} />
        },
        (Screen::Home, Some(elements)) => html! {
            <HomePanel {elements} on_event={on_child.clone()} on_publish={go_publish.clone()} />
        },
        // Elements are registered just before the first route resolves.
        (_, None) => html! { <LoadingPanel /> },
    };

    html! {
        <div class="app column fill">
            if let Some(notice) = &state.0.notice {
                <NoticeBanner message={notice.clone()} on_dismiss={on_dismiss} />
            }
            <main class="fill column">
                { body }
            </main>
            <footer class="footer">
                <span class="footer-build">
                    { format!("Build: {} {}", env!("BUILD_COMMIT"), env!("BUILD_TIMESTAMP")) }
                </span>
            </footer>
        </div>
    }
}
