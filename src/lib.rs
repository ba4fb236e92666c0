use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;

mod controller;
mod dom;
mod events;
mod html;
mod rules;
mod selector;
mod validate;


pub use events::KeyModifiers;
pub use rules::{PasswordRules, email_is_valid};
pub use validate::*;

use controller::Behavior;
use dom::{Dom, NodeId};
use events::{EventState, ListenerStore};
use rules::row_matches_query;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    NotAnElement(String),
    Harness(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::NotAnElement(what) => write!(f, "{what} is not an element"),
            Self::Harness(msg) => write!(f, "harness error: {msg}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

/// Outcome of a submit attempt: either native submission proceeded, or a
/// validation gate prevented it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Blocked,
}

/// An in-memory page with the form interaction behaviors wired to it.
///
/// Construction parses the markup, resolves element handles for every
/// behavior present on the page, and clears any restored CAPTCHA value.
/// All input simulation is synchronous: each call runs its handlers to
/// completion before returning.
pub struct Harness {
    dom: Dom,
    listeners: ListenerStore,
    active_element: Option<NodeId>,
    caps_lock: Option<bool>,
    scrolled_into_view: Option<NodeId>,
    submissions: Vec<NodeId>,
    trace: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = html::parse_html(html)?;
        let mut harness = Self {
            dom,
            listeners: ListenerStore::default(),
            active_element: None,
            caps_lock: None,
            scrolled_into_view: None,
            submissions: Vec::new(),
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: false,
        };
        harness.bind_behaviors()?;
        Ok(harness)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Harness(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if !self.trace {
            return;
        }
        if self.trace_to_stderr {
            eprintln!("{line}");
        }
        self.trace_logs.push(line);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }

    /// Sets the platform-reported Caps Lock state carried by subsequent key
    /// events. `None` models a platform that cannot report the modifier.
    pub fn set_caps_lock(&mut self, state: Option<bool>) {
        self.caps_lock = state;
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input", KeyModifiers::default())?;
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, value)?;
        self.dispatch_event(target, "input", KeyModifiers::default())?;
        self.dispatch_event(target, "change", KeyModifiers::default())?;
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let click = self.dispatch_event(target, "click", KeyModifiers::default())?;
        if click.default_prevented {
            return Ok(());
        }

        if self.is_submit_control(target) {
            if let Some(form) = self.dom.find_ancestor_by_tag(target, "form") {
                self.submit_form(form)?;
            }
        }
        Ok(())
    }

    /// One key tap: `keydown` then `keyup`, both carrying the current
    /// modifier snapshot.
    pub fn press_key(&mut self, selector: &str, key: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let modifiers = KeyModifiers {
            caps_lock: self.caps_lock,
        };
        self.trace_line(format!("[key] {key} caps_lock={:?}", self.caps_lock));
        self.dispatch_event(target, "keydown", modifiers)?;
        self.dispatch_event(target, "keyup", modifiers)?;
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)
    }

    pub fn submit(&mut self, selector: &str) -> Result<SubmitOutcome> {
        let target = self.select_one(selector)?;
        let form = if self
            .dom
            .tag_name(target)
            .map(|tag| tag.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            target
        } else {
            self.dom
                .find_ancestor_by_tag(target, "form")
                .ok_or_else(|| Error::TypeMismatch {
                    selector: selector.to_string(),
                    expected: "form or form field".into(),
                    actual: self.dom.tag_name(target).unwrap_or_default().to_string(),
                })?
        };
        self.submit_form(form)
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event, KeyModifiers::default())?;
        Ok(())
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    fn submit_form(&mut self, form: NodeId) -> Result<SubmitOutcome> {
        let event = self.dispatch_event(form, "submit", KeyModifiers::default())?;
        if event.default_prevented {
            Ok(SubmitOutcome::Blocked)
        } else {
            // Native submission proceeds; the harness only records it.
            self.submissions.push(form);
            self.trace_line("[submit] native submission recorded".into());
            Ok(SubmitOutcome::Submitted)
        }
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let Some(element) = self.dom.element(node) else {
            return false;
        };
        if element.tag_name.eq_ignore_ascii_case("button") {
            return element
                .attrs
                .get("type")
                .map(|kind| kind.eq_ignore_ascii_case("submit"))
                .unwrap_or(true);
        }
        if element.tag_name.eq_ignore_ascii_case("input") {
            return element
                .attrs
                .get("type")
                .map(|kind| kind.eq_ignore_ascii_case("submit"))
                .unwrap_or(false);
        }
        false
    }

    // Bubble-phase dispatch along the parent chain; behaviors have no
    // capture listeners.
    pub(crate) fn dispatch_event(
        &mut self,
        target: NodeId,
        event_type: &str,
        modifiers: KeyModifiers,
    ) -> Result<EventState> {
        let mut event = EventState::with_modifiers(event_type, target, modifiers);

        let mut path = vec![target];
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        for node in path {
            event.current_target = node;
            for behavior in self.listeners.get(node, event_type) {
                self.run_behavior(&behavior, &mut event)?;
            }
            if event.propagation_stopped {
                break;
            }
        }

        self.trace_line(format!(
            "[event] {} target={} prevented={}",
            event.event_type,
            self.dom.dump_node(event.target),
            event.default_prevented
        ));
        Ok(event)
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.disabled(node) || self.active_element == Some(node) {
            return Ok(());
        }
        self.active_element = Some(node);
        self.dispatch_event(node, "focus", KeyModifiers::default())?;
        Ok(())
    }

    pub(crate) fn scroll_into_view(&mut self, node: NodeId) {
        self.scrolled_into_view = Some(node);
        let described = self.dom.dump_node(node);
        self.trace_line(format!("[scroll] smooth center target={described}"));
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target).trim().to_string())
    }

    pub fn validation_message(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self
            .dom
            .element(target)
            .map(|element| element.custom_validity_message.clone())
            .unwrap_or_default())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector).map(|_| ())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target).trim().to_string();
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_attr(&self, selector: &str, name: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name).unwrap_or_default();
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.has_class(target, class);
        if actual != expected {
            return Err(self.assertion_failed(
                selector,
                target,
                &format!("class {class}={expected}"),
                &format!("class {class}={actual}"),
            ));
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, prop: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.style_get(target, prop).unwrap_or_default();
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    /// Asserts on the rendered visibility of each element matching
    /// `selector`, in document order.
    pub fn assert_displayed(&self, selector: &str, expected: &[bool]) -> Result<()> {
        let nodes = self.dom.query_selector_all(selector)?;
        let actual = nodes
            .iter()
            .map(|node| self.dom.is_displayed(*node))
            .collect::<Vec<_>>();
        if actual != expected {
            let snippet = nodes
                .first()
                .map(|node| self.dom.dump_node(*node))
                .unwrap_or_default();
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
                dom_snippet: snippet,
            });
        }
        Ok(())
    }

    pub fn assert_validation_message(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self
            .dom
            .element(target)
            .map(|element| element.custom_validity_message.clone())
            .unwrap_or_default();
        if actual != expected {
            return Err(self.assertion_failed(selector, target, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_focused(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.active_element != Some(target) {
            let actual = self
                .active_element
                .map(|node| self.dom.dump_node(node))
                .unwrap_or_else(|| "none".to_string());
            return Err(self.assertion_failed(selector, target, "focused", &actual));
        }
        Ok(())
    }

    pub fn assert_scrolled_into_view(&self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.scrolled_into_view != Some(target) {
            let actual = self
                .scrolled_into_view
                .map(|node| self.dom.dump_node(node))
                .unwrap_or_else(|| "none".to_string());
            return Err(self.assertion_failed(selector, target, "scrolled into view", &actual));
        }
        Ok(())
    }

    fn assertion_failed(
        &self,
        selector: &str,
        target: NodeId,
        expected: &str,
        actual: &str,
    ) -> Error {
        Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            dom_snippet: self.dom.dump_node(target),
        }
    }
}
