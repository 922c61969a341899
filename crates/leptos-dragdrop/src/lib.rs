//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events, generic over the
//! payload a drag source carries (`P`) and the key naming a drop target (`K`).
//! Uses movement threshold to distinguish click from drag.
//!
//! Drop targets accept or reject a drag by its item-type tag and carry their
//! own drop handler, so the global mouseup only has to hand the payload to
//! whichever zone is hovered.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Elements matching this selector never start a drag, so their clicks pass through
pub const NO_DRAG_SELECTOR: &str = "button, a, input, select, textarea, [data-no-drag]";

/// Values stored in drag signals
pub trait DndValue: Copy + Send + Sync + 'static {}
impl<T: Copy + Send + Sync + 'static> DndValue for T {}

/// A unit being dragged: item-type tag plus payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragItem<P> {
    pub item_type: &'static str,
    pub payload: P,
}

impl<P> DragItem<P> {
    pub fn new(item_type: &'static str, payload: P) -> Self {
        Self { item_type, payload }
    }
}

/// Drop target registration
pub struct DropZone<K, P: 'static> {
    pub key: K,
    /// Item types this zone accepts
    pub accepts: &'static [&'static str],
    /// Invoked with the payload when an accepted item is released over the zone
    pub on_drop: Callback<P>,
}

impl<K: Clone, P: 'static> Clone for DropZone<K, P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            accepts: self.accepts,
            on_drop: self.on_drop,
        }
    }
}

impl<K: Copy, P: 'static> Copy for DropZone<K, P> {}

impl<K, P: 'static> DropZone<K, P> {
    pub fn accepts_type(&self, item_type: &str) -> bool {
        accepts(self.accepts, item_type)
    }
}

/// Zone currently under the pointer during a drag
pub struct Hover<K, P: 'static> {
    pub zone: DropZone<K, P>,
    pub accepted: bool,
}

impl<K: Clone, P: 'static> Clone for Hover<K, P> {
    fn clone(&self) -> Self {
        Self {
            zone: self.zone.clone(),
            accepted: self.accepted,
        }
    }
}

impl<K: Copy, P: 'static> Copy for Hover<K, P> {}

/// Visual state of a drop target, derived from the drag session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Acceptable,
    Rejected,
}

/// DnD state signals
pub struct DndSignals<P: 'static, K: 'static> {
    pub dragging_read: ReadSignal<Option<DragItem<P>>>,
    pub dragging_write: WriteSignal<Option<DragItem<P>>>,
    pub hover_read: ReadSignal<Option<Hover<K, P>>>,
    pub hover_write: WriteSignal<Option<Hover<K, P>>>,
    /// Pending item (mousedown but not yet dragging)
    pub pending_read: ReadSignal<Option<DragItem<P>>>,
    pub pending_write: WriteSignal<Option<DragItem<P>>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

impl<P: 'static, K: 'static> Clone for DndSignals<P, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: 'static, K: 'static> Copy for DndSignals<P, K> {}

pub fn create_dnd_signals<P: DndValue, K: DndValue>() -> DndSignals<P, K> {
    let (dragging_read, dragging_write) = signal(None::<DragItem<P>>);
    let (hover_read, hover_write) = signal(None::<Hover<K, P>>);
    let (pending_read, pending_write) = signal(None::<DragItem<P>>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_read,
        dragging_write,
        hover_read,
        hover_write,
        pending_read,
        pending_write,
        start_read,
        start_write,
    }
}

/// Whether an item type is in a zone's accept list
pub fn accepts(accepted: &[&str], item_type: &str) -> bool {
    accepted.iter().any(|t| *t == item_type)
}

/// Whether the pointer moved far enough from the press point to start a drag
pub fn exceeds_threshold(start: (i32, i32), current: (i32, i32)) -> bool {
    let dx = (current.0 - start.0).abs();
    let dy = (current.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

/// Hover state of zone `key` given the hovered zone key and its acceptance
pub fn resolve_hover_state<K: PartialEq>(hovered: Option<(K, bool)>, key: &K) -> HoverState {
    match hovered {
        Some((k, true)) if k == *key => HoverState::Acceptable,
        Some((k, false)) if k == *key => HoverState::Rejected,
        _ => HoverState::Idle,
    }
}

/// Tracked hover state for a zone, for class bindings
pub fn hover_state<P: DndValue, K: DndValue + PartialEq>(dnd: DndSignals<P, K>, key: K) -> HoverState {
    let hovered = dnd.hover_read.with(|h| h.as_ref().map(|h| (h.zone.key, h.accepted)));
    resolve_hover_state(hovered, &key)
}

/// End drag operation
pub fn end_drag<P: DndValue, K: DndValue>(dnd: &DndSignals<P, K>) {
    dnd.dragging_write.set(None);
    dnd.hover_write.set(None);
    dnd.pending_write.set(None);
}

/// Create mousedown handler for drag sources
/// Records pending drag with start position
pub fn make_on_mousedown<P: DndValue, K: DndValue>(
    dnd: DndSignals<P, K>,
    item: DragItem<P>,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Presses on interactive children keep their own click behaviour
        if let Some(el) = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok()) {
            if matches!(el.closest(NO_DRAG_SELECTOR), Ok(Some(_))) {
                return;
            }
        }
        dnd.pending_write.set(Some(item));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Bind mousemove on document - starts drag if moved enough
pub fn bind_global_mousemove<P: DndValue, K: DndValue>(dnd: DndSignals<P, K>) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_read.get_untracked();

        if pending.is_some() && dnd.dragging_read.get_untracked().is_none() {
            let start = dnd.start_read.get_untracked();
            if exceeds_threshold(start, (ev.client_x(), ev.client_y())) {
                dnd.dragging_write.set(pending);
            }
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for a drop zone
pub fn make_on_zone_mouseenter<P: DndValue, K: DndValue>(
    dnd: DndSignals<P, K>,
    zone: DropZone<K, P>,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if let Some(item) = dnd.dragging_read.get_untracked() {
            let accepted = zone.accepts_type(item.item_type);
            dnd.hover_write.set(Some(Hover { zone, accepted }));
        }
    }
}

/// Create mouseleave handler for a drop zone
///
/// Only clears the hover if it still belongs to this zone.
pub fn make_on_zone_mouseleave<P: DndValue, K: DndValue + PartialEq>(
    dnd: DndSignals<P, K>,
    key: K,
) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_read.get_untracked().is_none() {
            return;
        }
        let owns_hover = dnd.hover_read.with_untracked(|h| matches!(h, Some(h) if h.zone.key == key));
        if owns_hover {
            dnd.hover_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
///
/// A drop is delivered only when a drag is active and the hovered zone
/// accepted its item type. Anything else discards the payload.
pub fn bind_global_mouseup<P: DndValue, K: DndValue>(dnd: DndSignals<P, K>) {
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging = dnd.dragging_read.get_untracked();
        let hover = dnd.hover_read.get_untracked();

        dnd.pending_write.set(None);

        match (dragging, hover) {
            (Some(item), Some(hover)) if hover.accepted => {
                end_drag(&dnd);
                hover.zone.on_drop.run(item.payload);
            }
            (Some(_), _) => end_drag(&dnd),
            // Not dragging - click event will fire naturally on the element
            (None, _) => {}
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_requires_movement_beyond_limit() {
        assert!(!exceeds_threshold((10, 10), (10, 10)));
        assert!(!exceeds_threshold((10, 10), (15, 15)));
        assert!(exceeds_threshold((10, 10), (16, 10)));
        assert!(exceeds_threshold((10, 10), (10, 4)));
    }

    #[test]
    fn test_accepts_by_item_type() {
        const CARDS: &[&str] = &["opportunity"];
        assert!(accepts(CARDS, "opportunity"));
        assert!(!accepts(CARDS, "contact"));
        assert!(!accepts(&[], "opportunity"));
    }

    #[test]
    fn test_hover_state_only_for_hovered_zone() {
        assert_eq!(resolve_hover_state(Some((1u32, true)), &1), HoverState::Acceptable);
        assert_eq!(resolve_hover_state(Some((1u32, false)), &1), HoverState::Rejected);
        assert_eq!(resolve_hover_state(Some((1u32, true)), &2), HoverState::Idle);
        assert_eq!(resolve_hover_state::<u32>(None, &1), HoverState::Idle);
    }

    #[test]
    fn test_end_drag_clears_session() {
        let owner = Owner::new();
        owner.with(|| {
            let dnd: DndSignals<u32, u32> = create_dnd_signals();
            let item = DragItem::new("opportunity", 7u32);
            let zone = DropZone {
                key: 1u32,
                accepts: &["opportunity"],
                on_drop: Callback::new(|_: u32| {}),
            };
            dnd.pending_write.set(Some(item));
            dnd.dragging_write.set(Some(item));
            dnd.hover_write.set(Some(Hover { zone, accepted: true }));
            assert_eq!(hover_state(dnd, 1), HoverState::Acceptable);

            end_drag(&dnd);
            assert!(dnd.dragging_read.get_untracked().is_none());
            assert!(dnd.pending_read.get_untracked().is_none());
            assert_eq!(hover_state(dnd, 1), HoverState::Idle);
        });
    }

    #[test]
    fn test_drag_item_carries_tag_and_payload() {
        let item = DragItem::new("opportunity", (7u32, 2u32));
        assert_eq!(item.item_type, "opportunity");
        assert_eq!(item.payload, (7, 2));
    }
}
