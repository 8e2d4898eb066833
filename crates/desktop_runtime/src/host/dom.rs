//! Browser surface host that renders windows as absolutely positioned DOM elements.

use leptos::logging;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use desktop_app_contract::ContentArea;

use super::{PointerCapture, SurfaceHost};
use crate::model::{PointerPosition, WindowId, WindowRecord};

#[derive(Debug, Clone)]
/// Mounts each window as `<section id="window-<id>">` under the desktop root element.
pub struct DomSurfaceHost {
    root_id: String,
}

impl DomSurfaceHost {
    /// Host rendering under the element with id `root_id` (falls back to `<body>`).
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn frame(window_id: &WindowId) -> Option<HtmlElement> {
        Self::document()?
            .get_element_by_id(&frame_element_id(window_id))?
            .dyn_into::<HtmlElement>()
            .ok()
    }
}

fn frame_element_id(window_id: &WindowId) -> String {
    format!("window-{window_id}")
}

impl SurfaceHost for DomSurfaceHost {
    fn mount(&self, record: &WindowRecord) -> ContentArea {
        let content = ContentArea::for_window(&record.id);
        let Some(document) = Self::document() else {
            logging::warn!("no document; window `{}` is not rendered", record.id);
            return content;
        };
        let parent = document
            .get_element_by_id(&self.root_id)
            .or_else(|| document.body().map(Into::into));
        let (Some(parent), Ok(frame), Ok(body)) = (
            parent,
            document.create_element("section"),
            document.create_element("div"),
        ) else {
            logging::warn!("failed to create surface for window `{}`", record.id);
            return content;
        };
        frame.set_id(&frame_element_id(&record.id));
        frame.set_class_name("desktop-window");
        body.set_id(&content.element_id);
        body.set_class_name("desktop-window-body");
        if frame.append_child(&body).is_err() || parent.append_child(&frame).is_err() {
            logging::warn!("failed to attach surface for window `{}`", record.id);
        }
        self.apply(record);
        content
    }

    fn apply(&self, record: &WindowRecord) {
        let Some(frame) = Self::frame(&record.id) else {
            return;
        };
        let style = frame.style();
        let g = record.geometry;
        let display = if record.minimized { "none" } else { "block" };
        let props = [
            ("position", "absolute".to_string()),
            ("left", format!("{}px", g.x)),
            ("top", format!("{}px", g.y)),
            ("width", format!("{}px", g.width)),
            ("height", format!("{}px", g.height)),
            ("z-index", record.z_index.to_string()),
            ("display", display.to_string()),
        ];
        for (name, value) in props {
            if style.set_property(name, &value).is_err() {
                logging::warn!("failed to set `{name}` on window `{}`", record.id);
            }
        }
    }

    fn unmount(&self, window_id: &WindowId) {
        if let Some(frame) = Self::frame(window_id) {
            frame.remove();
        }
    }

    fn capture_pointer(&self, window_id: &WindowId, pointer: PointerPosition) -> PointerCapture {
        let Some(frame) = Self::frame(window_id) else {
            return PointerCapture::noop();
        };
        let pointer_id = pointer.pointer_id;
        if frame.set_pointer_capture(pointer_id).is_err() {
            logging::warn!("pointer {pointer_id} could not be captured for window `{window_id}`");
            return PointerCapture::noop();
        }
        PointerCapture::new(move || {
            // The frame may already be detached (close mid-gesture), which drops capture anyway.
            if frame.has_pointer_capture(pointer_id) {
                let _ = frame.release_pointer_capture(pointer_id);
            }
        })
    }
}
