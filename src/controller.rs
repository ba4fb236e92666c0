use super::*;

/// A behavior bound to a node for one event type. Element handles are
/// resolved once, when the page is constructed; a handle that cannot be
/// resolved drops the binding instead of probing the document on every
/// event.
#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    ToggleVisibility { target: NodeId },
    CapsIndicator { indicator: NodeId },
    StrengthMeter(StrengthMeterBinding),
    RowFilter { search: NodeId, table: NodeId },
    ClearFieldError,
    ValidateOnSubmit(FormFields),
}

#[derive(Debug, Clone)]
pub(crate) struct StrengthMeterBinding {
    pub(crate) input: NodeId,
    pub(crate) bar: NodeId,
    // Slots in rule order: length, upper, lower, digit, special.
    pub(crate) rule_slots: [Option<NodeId>; 5],
}

/// Field handles for one form's submission pipeline, resolved at bind time.
/// Values are always re-read from the DOM at submit time.
#[derive(Debug, Clone)]
pub(crate) struct FormFields {
    pub(crate) captcha: Option<NodeId>,
    pub(crate) captcha_answer: Option<NodeId>,
    pub(crate) username: Option<NodeId>,
    pub(crate) email: Option<NodeId>,
    pub(crate) login_password: Option<NodeId>,
    pub(crate) reg_password: Option<NodeId>,
    pub(crate) role: Option<NodeId>,
}

const CAPS_WATCH_PAIRS: [(&str, &str); 2] = [
    ("#login-password", "#caps-login"),
    ("#reg-password", "#caps-reg"),
];

const RULE_SLOT_SELECTORS: [&str; 5] = [
    "#rule-length",
    "#rule-upper",
    "#rule-lower",
    "#rule-digit",
    "#rule-special",
];

impl Harness {
    // Wires every behavior whose elements exist on this page. A missing
    // element disables its behavior silently.
    pub(crate) fn bind_behaviors(&mut self) -> Result<()> {
        for toggle in self.dom.query_selector_all(".toggle")? {
            let Some(selector) = self.dom.attr(toggle, "data-toggle") else {
                continue;
            };
            let Some(target) = self.dom.query_selector(&selector)? else {
                continue;
            };
            self.listeners
                .add(toggle, "click", Behavior::ToggleVisibility { target });
            self.trace_bind(format!("toggle -> {selector}"));
        }

        for (input_selector, indicator_selector) in CAPS_WATCH_PAIRS {
            let (Some(input), Some(indicator)) = (
                self.dom.query_selector(input_selector)?,
                self.dom.query_selector(indicator_selector)?,
            ) else {
                continue;
            };
            for event in ["keydown", "keyup"] {
                self.listeners
                    .add(input, event, Behavior::CapsIndicator { indicator });
            }
            self.trace_bind(format!("caps watch {input_selector} -> {indicator_selector}"));
        }

        if let (Some(input), Some(bar)) = (
            self.dom.query_selector("#reg-password")?,
            self.dom.query_selector("#pw-meter-bar")?,
        ) {
            let mut rule_slots = [None; 5];
            for (slot, selector) in rule_slots.iter_mut().zip(RULE_SLOT_SELECTORS) {
                *slot = self.dom.query_selector(selector)?;
            }
            self.listeners.add(
                input,
                "input",
                Behavior::StrengthMeter(StrengthMeterBinding {
                    input,
                    bar,
                    rule_slots,
                }),
            );
            self.trace_bind("strength meter".into());
        }

        if let (Some(search), Some(table)) = (
            self.dom.query_selector("#userSearch")?,
            self.dom.query_selector("#usersTable")?,
        ) {
            self.listeners
                .add(search, "input", Behavior::RowFilter { search, table });
            self.trace_bind("row filter".into());
        }

        // Stale CAPTCHA guesses restored by the browser are cleared up front.
        if let Some(captcha) = self.dom.query_selector("input[name='captcha']")? {
            self.dom.set_value(captcha, "")?;
        }

        for form in self.dom.query_selector_all("form")? {
            let fields = FormFields {
                captcha: self
                    .dom
                    .query_selector_from(form, "input[name='captcha']")?,
                captcha_answer: self
                    .dom
                    .query_selector_from(form, "input[name='captcha_answer']")?,
                username: self
                    .dom
                    .query_selector_from(form, "input[name='username']")?,
                email: self.dom.query_selector_from(form, "input[name='email']")?,
                login_password: self.dom.query_selector_from(form, "#login-password")?,
                reg_password: self.dom.query_selector_from(form, "#reg-password")?,
                role: self.dom.query_selector_from(form, "select[name='role']")?,
            };
            self.listeners.add(form, "input", Behavior::ClearFieldError);
            self.listeners
                .add(form, "submit", Behavior::ValidateOnSubmit(fields));
            self.trace_bind(format!("form validator {}", self.dom.dump_node(form)));
        }

        Ok(())
    }

    pub(crate) fn run_behavior(
        &mut self,
        behavior: &Behavior,
        event: &mut EventState,
    ) -> Result<()> {
        match behavior {
            Behavior::ToggleVisibility { target } => {
                let current = self.dom.attr(*target, "type").unwrap_or_default();
                let next = if current == "password" {
                    "text"
                } else {
                    "password"
                };
                self.dom.set_attr(*target, "type", next)
            }
            Behavior::CapsIndicator { indicator } => {
                let on = event.modifiers.caps_lock_on();
                self.dom
                    .set_text_content(*indicator, if on { "On" } else { "Off" })?;
                self.dom.set_class(*indicator, "caps--on", on)?;
                self.dom.set_class(*indicator, "caps--off", !on)
            }
            Behavior::StrengthMeter(meter) => self.run_strength_meter(meter),
            Behavior::RowFilter { search, table } => self.run_row_filter(*search, *table),
            Behavior::ClearFieldError => {
                if self.dom.is_form_field(event.target) {
                    self.clear_error(event.target)?;
                }
                Ok(())
            }
            Behavior::ValidateOnSubmit(fields) => {
                let fields = fields.clone();
                self.run_submit_pipeline(&fields, event)
            }
        }
    }

    fn run_strength_meter(&mut self, meter: &StrengthMeterBinding) -> Result<()> {
        let value = self.dom.value(meter.input)?;
        let rules = PasswordRules::evaluate(&value);

        for (slot, (_, satisfied)) in meter.rule_slots.iter().zip(rules.by_name()) {
            if let Some(slot) = slot {
                self.dom.set_class(*slot, "valid", satisfied)?;
            }
        }

        let width = rules.score() * 100 / 5;
        self.dom.style_set(meter.bar, "width", &format!("{width}%"))?;

        // Errors on this field only come back at submit time.
        self.clear_error(meter.input)
    }

    fn run_row_filter(&mut self, search: NodeId, table: NodeId) -> Result<()> {
        let query = self.dom.value(search)?;
        for row in self.dom.query_selector_all_from(table, "tbody tr")? {
            let text = self.dom.rendered_text(row);
            let display = if row_matches_query(&text, &query) {
                ""
            } else {
                "none"
            };
            self.dom.style_set(row, "display", display)?;
        }
        Ok(())
    }

    fn run_submit_pipeline(&mut self, fields: &FormFields, event: &mut EventState) -> Result<()> {
        // CAPTCHA gate first; a failure blocks the attempt before any field
        // gate runs.
        if let (Some(captcha), Some(answer)) = (fields.captcha, fields.captcha_answer) {
            let guess = self.dom.value(captcha)?.trim().to_string();
            let truth = self.dom.value(answer)?.trim().to_string();
            if guess.is_empty() {
                event.prevent_default();
                self.set_error(captcha, MSG_CAPTCHA_EMPTY)?;
                self.focus_node(captcha)?;
                self.trace_submit("blocked gate=captcha reason=empty");
                return Ok(());
            }
            if guess != truth {
                event.prevent_default();
                self.set_error(captcha, MSG_CAPTCHA_MISMATCH)?;
                self.focus_node(captcha)?;
                self.trace_submit("blocked gate=captcha reason=mismatch");
                return Ok(());
            }
            self.clear_error(captcha)?;
        }

        // Field gates in fixed encounter order, accumulating the first
        // failure instead of short-circuiting.
        let gates: [(Option<NodeId>, FieldCheck); 5] = [
            (fields.username, check_username),
            (fields.email, check_email),
            (fields.login_password, check_login_password),
            (fields.reg_password, check_registration_password),
            (fields.role, check_role),
        ];

        let mut ok = true;
        let mut first_invalid = None;
        for (node, check) in gates {
            let Some(node) = node else {
                continue;
            };
            let value = self.dom.value(node)?;
            match check(&value) {
                Some(message) => {
                    ok = false;
                    if first_invalid.is_none() {
                        first_invalid = Some(node);
                    }
                    self.set_error(node, message)?;
                }
                None => self.clear_error(node)?,
            }
        }

        if !ok {
            event.prevent_default();
            if let Some(node) = first_invalid {
                self.focus_node(node)?;
                self.scroll_into_view(node);
            }
            self.trace_submit("blocked gate=fields");
        } else {
            self.trace_submit("allowed");
        }
        Ok(())
    }

    /// Writes `message` into the field's adjacent error slot (if its `.field`
    /// group has one), records it as the field's custom validity message, and
    /// reports validity when the message is non-empty.
    pub(crate) fn set_error(&mut self, field: NodeId, message: &str) -> Result<()> {
        let slot = self
            .dom
            .closest_with_class(field, "field")
            .and_then(|group| self.dom.descendant_with_class(group, "error-msg"));
        if let Some(slot) = slot {
            self.dom.set_text_content(slot, message)?;
        }

        if let Some(element) = self.dom.element_mut(field) {
            element.custom_validity_message = message.to_string();
        }

        if !message.is_empty() {
            let described = self.dom.dump_node(field);
            self.trace_line(format!("[validity] report target={described} message={message}"));
        }
        Ok(())
    }

    pub(crate) fn clear_error(&mut self, field: NodeId) -> Result<()> {
        self.set_error(field, "")
    }

    fn trace_bind(&mut self, what: String) {
        self.trace_line(format!("[bind] {what}"));
    }

    fn trace_submit(&mut self, what: &str) {
        self.trace_line(format!("[submit] {what}"));
    }
}
