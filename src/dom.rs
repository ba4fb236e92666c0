use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
    pub(crate) custom_validity_message: String,
    pub(crate) style: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let readonly = attrs.contains_key("readonly");
        let style = attrs
            .get("style")
            .map(|raw| parse_inline_style(raw))
            .unwrap_or_default();
        let element = Element {
            tag_name,
            attrs,
            value,
            disabled,
            readonly,
            custom_validity_message: String::new(),
            style,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.insert(id_attr, id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name).cloned())
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("attribute target".into()))?;
        element.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub(crate) fn is_form_field(&self, node_id: NodeId) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };
        element.tag_name.eq_ignore_ascii_case("input")
            || element.tag_name.eq_ignore_ascii_case("select")
            || element.tag_name.eq_ignore_ascii_case("textarea")
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.readonly).unwrap_or(false)
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::NotAnElement("text content target".into()));
        }
        self.nodes[node_id.0].children.clear();
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    // Descendant text nodes joined with single spaces, the way a row of table
    // cells reads on screen.
    pub(crate) fn rendered_text(&self, node_id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_rendered_text(node_id, &mut parts);
        parts.join(" ")
    }

    fn collect_rendered_text(&self, node_id: NodeId, out: &mut Vec<String>) {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                for child in &self.nodes[node_id.0].children {
                    self.collect_rendered_text(*child, out);
                }
            }
            NodeType::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    out.push(trimmed.to_string());
                }
            }
        }
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::NotAnElement("value target".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self
            .tag_name(node_id)
            .map(|tag| tag.eq_ignore_ascii_case("select"))
            .unwrap_or(false)
        {
            return self.set_select_value(node_id, value);
        }

        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("value target".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn classes(&self, node_id: NodeId) -> Vec<String> {
        self.attr(node_id, "class")
            .map(|raw| {
                raw.split_ascii_whitespace()
                    .map(|class| class.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn has_class(&self, node_id: NodeId, class: &str) -> bool {
        self.classes(node_id).iter().any(|c| c == class)
    }

    pub(crate) fn set_class(&mut self, node_id: NodeId, class: &str, on: bool) -> Result<()> {
        let mut classes = self.classes(node_id);
        let present = classes.iter().position(|c| c == class);
        match (present, on) {
            (None, true) => classes.push(class.to_string()),
            (Some(index), false) => {
                classes.remove(index);
            }
            _ => return Ok(()),
        }
        self.set_attr(node_id, "class", &classes.join(" "))
    }

    pub(crate) fn style_get(&self, node_id: NodeId, prop: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.style.get(prop).cloned())
    }

    pub(crate) fn style_set(&mut self, node_id: NodeId, prop: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement("style target".into()))?;
        if value.is_empty() {
            element.style.remove(prop);
        } else {
            element.style.insert(prop.to_string(), value.to_string());
        }
        Ok(())
    }

    pub(crate) fn is_displayed(&self, node_id: NodeId) -> bool {
        self.style_get(node_id, "display")
            .map(|display| display != "none")
            .unwrap_or(true)
    }

    // closest('.class') semantics: the walk starts at the node itself.
    pub(crate) fn closest_with_class(&self, node_id: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn descendant_with_class(&self, node_id: NodeId, class: &str) -> Option<NodeId> {
        for child in &self.nodes[node_id.0].children {
            if self.has_class(*child, class) {
                return Some(*child);
            }
            if let Some(found) = self.descendant_with_class(*child, class) {
                return Some(found);
            }
        }
        None
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self
                .tag_name(current)
                .map(|t| t.eq_ignore_ascii_case(tag))
                .unwrap_or(false)
            {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.element(*id).is_some())
            .collect()
    }

    pub(crate) fn descendant_elements(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendant_elements(root, &mut out);
        out
    }

    fn collect_descendant_elements(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            if self.element(*child).is_some() {
                out.push(*child);
            }
            self.collect_descendant_elements(*child, out);
        }
    }

    fn collect_select_options(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            if self
                .tag_name(*child)
                .map(|tag| tag.eq_ignore_ascii_case("option"))
                .unwrap_or(false)
            {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    fn option_effective_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(value) => value,
            None => self.text_content(option).trim().to_string(),
        }
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);

        let mut matched = None;
        for option in &options {
            let value = self.option_effective_value(*option);
            if matched.is_none() && value == requested {
                matched = Some((*option, value));
            }
        }

        for option in options {
            let is_match = matched
                .as_ref()
                .map(|(node, _)| *node == option)
                .unwrap_or(false);
            let element = self
                .element_mut(option)
                .ok_or_else(|| Error::NotAnElement("option".into()))?;
            if is_match {
                element.attrs.insert("selected".into(), "true".into());
            } else {
                element.attrs.remove("selected");
            }
        }

        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::NotAnElement("select".into()))?;
        element.value = matched.map(|(_, value)| value).unwrap_or_default();
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);

        let selected = options
            .iter()
            .copied()
            .find(|option| {
                self.element(*option)
                    .map(|element| element.attrs.contains_key("selected"))
                    .unwrap_or(false)
            })
            .or_else(|| options.first().copied());

        let value = selected
            .map(|option| self.option_effective_value(option))
            .unwrap_or_default();
        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::NotAnElement("select".into()))?;
        element.value = value;
        Ok(())
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            let tag = self
                .tag_name(node)
                .map(|tag| tag.to_ascii_lowercase())
                .unwrap_or_default();
            match tag.as_str() {
                "textarea" => {
                    let text = self.text_content(node);
                    let element = self
                        .element_mut(node)
                        .ok_or_else(|| Error::NotAnElement("textarea".into()))?;
                    element.value = text;
                }
                "select" => self.sync_select_value(node)?,
                _ => {}
            }
        }
        Ok(())
    }

    // Rows written directly under <table> get wrapped in an implied tbody so
    // `tbody tr` matches markup that omits it.
    pub(crate) fn normalize_implied_table_bodies(&mut self) {
        for table in self.all_element_nodes() {
            if !self
                .tag_name(table)
                .map(|tag| tag.eq_ignore_ascii_case("table"))
                .unwrap_or(false)
            {
                continue;
            }

            let stray_rows = self.nodes[table.0]
                .children
                .iter()
                .copied()
                .filter(|child| {
                    self.tag_name(*child)
                        .map(|tag| tag.eq_ignore_ascii_case("tr"))
                        .unwrap_or(false)
                })
                .collect::<Vec<_>>();
            if stray_rows.is_empty() {
                continue;
            }

            let tbody = self.create_element(table, "tbody".into(), HashMap::new());
            for row in stray_rows {
                self.nodes[table.0].children.retain(|child| *child != row);
                self.nodes[row.0].parent = Some(tbody);
                self.nodes[tbody.0].children.push(row);
            }
        }
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => "#document".to_string(),
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut out = format!("<{}", element.tag_name);
                let mut keys = element.attrs.keys().collect::<Vec<_>>();
                keys.sort();
                for key in keys {
                    out.push_str(&format!(" {}=\"{}\"", key, element.attrs[key]));
                }
                if !element.value.is_empty() && !element.attrs.contains_key("value") {
                    out.push_str(&format!(" value=\"{}\"", element.value));
                }
                out.push('>');
                out
            }
        }
    }
}

fn parse_inline_style(raw: &str) -> HashMap<String, String> {
    let mut style = HashMap::new();
    for declaration in raw.split(';') {
        let Some((prop, value)) = declaration.split_once(':') else {
            continue;
        };
        let prop = prop.trim();
        let value = value.trim();
        if !prop.is_empty() && !value.is_empty() {
            style.insert(prop.to_string(), value.to_string());
        }
    }
    style
}
