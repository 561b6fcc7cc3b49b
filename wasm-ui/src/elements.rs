//! Compository custom elements, bound to the running service.
//!
//! Element classes come from the compository component libraries. Each one
//! is registered under its tag as a subclass that resolves the service it
//! was bound with: `connectService` for the library elements, a
//! `_compositoryService` getter override for the grapes element. Binding
//! happens once per page, after the conductor connection succeeds, and the
//! resulting [`BoundElements`] is what lets a component mount a child.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Element};
use yew::prelude::*;

use compository::{CellId, ChildEvent, ChildView};

use crate::conductor::{AdminWebsocket, AppWebsocket, UiService};
use crate::convert::{cell_id_from_detail, cell_id_to_js, js_error_message};

#[wasm_bindgen(module = "@compository/lib")]
extern "C" {
    #[wasm_bindgen(js_name = CompositoryService)]
    #[derive(Debug, Clone, PartialEq)]
    pub type JsCompositoryService;

    #[wasm_bindgen(constructor, js_class = "CompositoryService")]
    fn new(
        admin: &AdminWebsocket,
        app: &AppWebsocket,
        cell_id: &JsValue,
    ) -> JsCompositoryService;

    #[wasm_bindgen(js_name = connectService)]
    fn connect_service(class: &JsValue, service: &JsCompositoryService) -> JsValue;

    #[wasm_bindgen(thread_local_v2, js_name = DiscoverDnas)]
    static DISCOVER_DNAS: JsValue;

    #[wasm_bindgen(thread_local_v2, js_name = InstallDnaDialog)]
    static INSTALL_DNA_DIALOG: JsValue;

    #[wasm_bindgen(thread_local_v2, js_name = ComposeZomes)]
    static COMPOSE_ZOMES: JsValue;

    #[wasm_bindgen(thread_local_v2, js_name = InstalledCells)]
    static INSTALLED_CELLS: JsValue;

    #[wasm_bindgen(thread_local_v2, js_name = PublishZome)]
    static PUBLISH_ZOME: JsValue;
}

#[wasm_bindgen(module = "@compository/grapes")]
extern "C" {
    #[wasm_bindgen(thread_local_v2, js_name = DnaGrapes)]
    static DNA_GRAPES: JsValue;
}

// The grapes element is not built on the compository lib's service context;
// it reads its service from its own `_compositoryService` getter.
#[wasm_bindgen(inline_js = "export function withCompositoryService(base, service) {
  return class extends base {
    get _compositoryService() {
      return service;
    }
  };
}")]
extern "C" {
    #[wasm_bindgen(js_name = withCompositoryService)]
    fn with_compository_service(class: &JsValue, service: &JsCompositoryService) -> JsValue;
}

/// The class registered for `view`, resolving `service`.
fn bound_class(view: ChildView, service: &JsCompositoryService) -> JsValue {
    match view {
        ChildView::DnaGrapes => with_compository_service(&element_class(view), service),
        _ => connect_service(&element_class(view), service),
    }
}

fn element_class(view: ChildView) -> JsValue {
    match view {
        ChildView::DnaGrapes => DNA_GRAPES.with(JsValue::clone),
        ChildView::DiscoverDnas => DISCOVER_DNAS.with(JsValue::clone),
        ChildView::InstallDnaDialog => INSTALL_DNA_DIALOG.with(JsValue::clone),
        ChildView::ComposeZomes => COMPOSE_ZOMES.with(JsValue::clone),
        ChildView::InstalledCells => INSTALLED_CELLS.with(JsValue::clone),
        ChildView::PublishZome => PUBLISH_ZOME.with(JsValue::clone),
    }
}

/// Proof that every child element tag is registered against a service.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundElements {
    _service: JsCompositoryService,
}

impl BoundElements {
    /// Register every child tag that is not registered yet.
    pub fn bind(service: &UiService) -> Result<Self, JsValue> {
        let js_service = JsCompositoryService::new(
            service.admin().socket(),
            service.app().socket(),
            &cell_id_to_js(service.cell_id()),
        );
        let registry = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .custom_elements();

        for view in ChildView::ALL {
            if !registry.get(view.tag()).is_undefined() {
                tracing::debug!(tag = view.tag(), "element already registered");
                continue;
            }
            let class = bound_class(view, &js_service);
            let constructor = class.dyn_ref::<Function>().ok_or_else(|| {
                JsValue::from_str(&format!("no element class for <{}>", view.tag()))
            })?;
            registry.define(view.tag(), constructor)?;
        }

        Ok(Self {
            _service: js_service,
        })
    }
}

/// A child element notification: which event, and the cell it names.
pub type ChildNotification = (ChildEvent, Option<CellId>);

#[derive(Properties, PartialEq)]
pub struct CompositoryElementProps {
    pub view: ChildView,
    pub elements: BoundElements,
    #[prop_or_default]
    pub cell_id: Option<CellId>,
    #[prop_or_default]
    pub on_event: Callback<ChildNotification>,
    #[prop_or_default]
    pub class: Classes,
}

/// Hosts one compository element and forwards its events.
#[function_component(CompositoryElement)]
pub fn compository_element(props: &CompositoryElementProps) -> Html {
    let host = use_node_ref();
    let on_event = use_mut_ref(|| props.on_event.clone());
    *on_event.borrow_mut() = props.on_event.clone();

    {
        let host = host.clone();
        use_effect_with(
            (props.view, props.elements.clone(), props.cell_id.clone()),
            move |(view, _, cell_id)| {
                let mounted = mount_child(&host, *view, cell_id.as_ref(), on_event);
                move || drop(mounted)
            },
        );
    }

    html! {
        <div ref={host} class={classes!("compository-element", props.class.clone())} />
    }
}

struct MountedChild {
    element: Element,
    _listeners: Vec<EventListener>,
}

impl Drop for MountedChild {
    fn drop(&mut self) {
        self.element.remove();
    }
}

fn mount_child(
    host: &NodeRef,
    view: ChildView,
    cell_id: Option<&CellId>,
    on_event: Rc<RefCell<Callback<ChildNotification>>>,
) -> Option<MountedChild> {
    let host = host.cast::<Element>()?;
    let document = host.owner_document()?;
    let element = match document.create_element(view.tag()) {
        Ok(element) => element,
        Err(e) => {
            tracing::error!(tag = view.tag(), error = %js_error_message(&e), "could not create element");
            return None;
        }
    };

    if view.takes_cell_id()
        && let Some(cell_id) = cell_id
        && let Err(e) = Reflect::set(&element, &"cellId".into(), &cell_id_to_js(cell_id))
    {
        tracing::warn!(tag = view.tag(), error = %js_error_message(&e), "could not set cellId");
    }

    let listeners = view
        .events()
        .iter()
        .map(|&event| {
            let on_event = on_event.clone();
            EventListener::new(&element, event.name(), move |e| {
                e.stop_propagation();
                let cell_id = e
                    .dyn_ref::<CustomEvent>()
                    .and_then(|custom| cell_id_from_detail(&custom.detail()));
                if event.carries_cell() && cell_id.is_none() {
                    tracing::warn!(event = event.name(), "event detail has no cellId");
                }
                let callback = on_event.borrow().clone();
                callback.emit((event, cell_id));
            })
        })
        .collect();

    if let Err(e) = host.append_child(&element) {
        tracing::error!(tag = view.tag(), error = %js_error_message(&e), "could not mount element");
        return None;
    }

    Some(MountedChild {
        element,
        _listeners: listeners,
    })
}
