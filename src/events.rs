use super::*;

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Behavior>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, behavior: Behavior) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(behavior);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Behavior> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

/// Modifier snapshot carried by key events. `caps_lock: None` models a
/// platform that cannot report the modifier; readers treat it as off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub caps_lock: Option<bool>,
}

impl KeyModifiers {
    pub fn caps_lock_on(&self) -> bool {
        self.caps_lock.unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) modifiers: KeyModifiers,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
            modifiers: KeyModifiers::default(),
        }
    }

    pub(crate) fn with_modifiers(event_type: &str, target: NodeId, modifiers: KeyModifiers) -> Self {
        let mut event = Self::new(event_type, target);
        event.modifiers = modifiers;
        event
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
