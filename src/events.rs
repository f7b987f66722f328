use super::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventKind {
    Ready,
    Click,
    Submit,
    Input,
    Change,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Scroll,
}

impl EventKind {
    pub(crate) fn parse(name: &str) -> Result<Self> {
        match name {
            "DOMContentLoaded" => Ok(EventKind::Ready),
            "click" => Ok(EventKind::Click),
            "submit" => Ok(EventKind::Submit),
            "input" => Ok(EventKind::Input),
            "change" => Ok(EventKind::Change),
            "focus" => Ok(EventKind::Focus),
            "blur" => Ok(EventKind::Blur),
            "focusin" => Ok(EventKind::FocusIn),
            "focusout" => Ok(EventKind::FocusOut),
            "scroll" => Ok(EventKind::Scroll),
            other => Err(Error::Runtime(format!("unknown event type: {other}"))),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            EventKind::Ready => "DOMContentLoaded",
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::FocusIn => "focusin",
            EventKind::FocusOut => "focusout",
            EventKind::Scroll => "scroll",
        }
    }
}

#[derive(Debug)]
pub(crate) struct EventState {
    pub(crate) kind: EventKind,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            default_prevented: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    MenuToggle,
    MenuClose,
    FaqToggle,
    ContactSubmit,
    AnchorScroll,
    ScrollSpy,
    PageMatch,
    FieldBlur,
    FieldFocus,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Binding {
    pub(crate) behavior: Behavior,
}

#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<EventKind, Vec<Binding>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, kind: EventKind, behavior: Behavior) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(kind)
            .or_default()
            .push(Binding { behavior });
    }

    pub(crate) fn get(&self, node_id: NodeId, kind: EventKind) -> Vec<Binding> {
        self.map
            .get(&node_id)
            .and_then(|by_kind| by_kind.get(&kind))
            .cloned()
            .unwrap_or_default()
    }
}
