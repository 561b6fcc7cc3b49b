//! UI Components for the compository.

use yew::prelude::*;

use compository::{CellId, ChildView, UiConfig};

use crate::elements::{BoundElements, ChildNotification, CompositoryElement};

const FORUM_URL: &str = "https://forum.holochain.org/t/introducing-the-compository/4486";
const LOCAL_APP_URL: &str = "http://localhost:8888/";
const DOCKER_RUN_COMMAND: &str = "docker run -it --init -v compository7:/database -p 22222:22222 -p 22223:22223 -p 8888:8888 guillemcordoba/compository:0.8";
const DOCKER_CLEANUP_COMMANDS: &[&str] = &[
    "docker rm $(docker ps -a -f status=exited -q)",
    "docker volume rm --force compository7",
];

/// Shown while connecting to the conductor.
#[function_component(LoadingPanel)]
pub fn loading_panel() -> Html {
    html! {
        <div class="fill center-content">
            <div class="spinner" role="progressbar" aria-label="Connecting to Holochain" />
        </div>
    }
}

/// Instructions for getting a conductor with the compository running.
#[derive(Properties, PartialEq)]
pub struct HolochainNotPresentProps {
    pub config: UiConfig,
    /// Why the conductor could not be used; absent on the static demo build.
    #[prop_or_default]
    pub reason: Option<String>,
}

#[function_component(HolochainNotPresent)]
pub fn holochain_not_present(props: &HolochainNotPresentProps) -> Html {
    let config = &props.config;
    let enter_app = html! {
        <strong>
            { "Then open " }
            <a href={LOCAL_APP_URL}>{ LOCAL_APP_URL }</a>
            { " to enter the web app." }
        </strong>
    };

    html! {
        <div class="column fill center-content">
            <div class="card instructions">
                <h1>{ "Compository" }</h1>
                if let Some(reason) = &props.reason {
                    <div class="error">{ reason }</div>
                }
                <p>
                    { "Play with Holochain by generating new DNAs on the fly and composing \
                       UIs to suit your own purposes." }
                </p>
                <p>
                    { "This is an experiment and not ready for production use. The web app \
                       and the compository DNA change quickly, so expect things to break." }
                </p>
                <p>
                    { "Ideas, questions or excitement? Tell us on the " }
                    <a href={FORUM_URL}>{ "Holochain Forum" }</a>
                    { "." }
                </p>

                <hr />

                <h2>{ "Running without a terminal" }</h2>
                <ul>
                    <li>
                        { "Download and install " }
                        <a href={config.docker_desktop_url.clone()}>{ "Docker Desktop" }</a>
                        { "." }
                    </li>
                    <li>
                        { "On Windows, download and run " }
                        <a href={config.asset_url("compository-launch.bat")}>{ "the launch script" }</a>
                        { ". Run " }
                        <a href={config.asset_url("compository-cleanup.bat")}>{ "the cleanup script" }</a>
                        { " to remove the persistent storage." }
                    </li>
                    <li>
                        { "On macOS, download and extract " }
                        <a href={config.asset_url("compository-commands.zip")}>{ "this archive" }</a>
                        { " and run \"compository-launch.command\". \
                           \"compository-cleanup.command\" removes the persistent storage." }
                    </li>
                    <li>{ enter_app.clone() }</li>
                </ul>

                <h2>{ "Running inside a terminal" }</h2>
                <p>{ "With Docker installed, run:" }</p>
                <pre class="command">{ DOCKER_RUN_COMMAND }</pre>
                <p>{ enter_app }</p>
                <p>{ "Remove the persistent storage by deleting the Docker volume:" }</p>
                { for DOCKER_CLEANUP_COMMANDS.iter().map(|command| html! {
                    <pre class="command">{ *command }</pre>
                }) }
            </div>
        </div>
    }
}

/// Shown when a `/dna/:dna` path names a DNA that is not installed.
#[derive(Properties, PartialEq)]
pub struct NonexistingDnaProps {
    pub dna: AttrValue,
    pub on_back: Callback<()>,
}

#[function_component(NonexistingDna)]
pub fn nonexisting_dna(props: &NonexistingDnaProps) -> Html {
    let on_click = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| {
            on_back.emit(());
        })
    };

    html! {
        <div class="fill center-content">
            <div class="card">
                <h2>{ "DNA not found" }</h2>
                <p>
                    { format!("The DNA with hash \"{}\" doesn't seem to exist in the compository.", props.dna) }
                </p>
                <p>{ "Make sure the DNA hash in the URL is correct and try again." }</p>
                <div class="button-row">
                    <button onclick={on_click}>{ "Go back" }</button>
                </div>
            </div>
        </div>
    }
}

/// Detail view of one installed DNA.
#[derive(Properties, PartialEq)]
pub struct DnaDetailProps {
    pub elements: BoundElements,
    pub cell_id: CellId,
    pub on_event: Callback<ChildNotification>,
}

#[function_component(DnaDetail)]
pub fn dna_detail(props: &DnaDetailProps) -> Html {
    html! {
        <CompositoryElement
            view={ChildView::DnaGrapes}
            elements={props.elements.clone()}
            cell_id={Some(props.cell_id.clone())}
            on_event={props.on_event.clone()}
            class="fill"
        />
    }
}

/// The zome publishing workflow.
#[derive(Properties, PartialEq)]
pub struct PublishZomePanelProps {
    pub elements: BoundElements,
    pub on_event: Callback<ChildNotification>,
    pub on_back: Callback<()>,
}

#[function_component(PublishZomePanel)]
pub fn publish_zome_panel(props: &PublishZomePanelProps) -> Html {
    let on_back_click = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| {
            on_back.emit(());
        })
    };

    html! {
        <div class="column fill">
            <header class="top-bar">
                <button class="icon-button" aria-label="Back" onclick={on_back_click}>
                    { "\u{2190}" }
                </button>
                <h1>{ "Publish your own zome" }</h1>
            </header>
            <div class="fill column center-content padded">
                <CompositoryElement
                    view={ChildView::PublishZome}
                    elements={props.elements.clone()}
                    on_event={props.on_event.clone()}
                    class="publish-zome"
                />
            </div>
        </div>
    }
}

/// Home: installed cells, DNA discovery and zome composition.
#[derive(Properties, PartialEq)]
pub struct HomePanelProps {
    pub elements: BoundElements,
    pub on_event: Callback<ChildNotification>,
    pub on_publish: Callback<()>,
}

#[function_component(HomePanel)]
pub fn home_panel(props: &HomePanelProps) -> Html {
    let on_publish_click = {
        let on_publish = props.on_publish.clone();
        Callback::from(move |_: MouseEvent| {
            on_publish.emit(());
        })
    };
    let child = |view: ChildView| {
        html! {
            <CompositoryElement
                {view}
                elements={props.elements.clone()}
                on_event={props.on_event.clone()}
                class="fill padded"
            />
        }
    };

    html! {
        <div class="column fill">
            <header class="top-bar">
                <h1>{ "Compository" }</h1>
                <button class="top-bar-action" onclick={on_publish_click}>
                    { "Publish a zome" }
                </button>
            </header>
            <div class="fill row">
                <div class="column fill">
                    { child(ChildView::InstalledCells) }
                    { child(ChildView::DiscoverDnas) }
                </div>
                { child(ChildView::ComposeZomes) }
            </div>
        </div>
    }
}

/// Non-fatal warning above the active view.
#[derive(Properties, PartialEq)]
pub struct NoticeBannerProps {
    pub message: AttrValue,
    pub on_dismiss: Callback<()>,
}

#[function_component(NoticeBanner)]
pub fn notice_banner(props: &NoticeBannerProps) -> Html {
    let on_click = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| {
            on_dismiss.emit(());
        })
    };

    html! {
        <div class="notice" role="status">
            <span>{ &props.message }</span>
            <button class="notice-dismiss" aria-label="Dismiss" onclick={on_click}>{ "\u{00D7}" }</button>
        </div>
    }
}
