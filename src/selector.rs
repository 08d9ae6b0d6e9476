use crate::GraphStore;
use log::debug;
use ulid::Ulid;

pub const NO_NODES_TEXT: &str = "No nodes available";
pub const SELECT_NODE_TEXT: &str = "Select a node";

/// One entry of an endpoint drop-down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    /// Shape handle, `None` for placeholders
    pub value: Option<Ulid>,
    pub text: String,
    pub disabled: bool,
}

impl SelectorOption {
    fn placeholder(text: &str, disabled: bool) -> Self {
        Self {
            value: None,
            text: text.to_string(),
            disabled,
        }
    }
}

/// Build the option list for one endpoint selector
///
/// Labels are offered alongside nodes.
pub fn endpoint_options(store: &GraphStore) -> Vec<SelectorOption> {
    if store.is_empty() {
        return vec![SelectorOption::placeholder(NO_NODES_TEXT, true)];
    }

    let mut options = Vec::with_capacity(store.shape_count() + 1);
    options.push(SelectorOption::placeholder(SELECT_NODE_TEXT, false));
    options.extend(store.shapes().map(|shape| SelectorOption {
        value: Some(shape.handle),
        text: shape.display_name(),
        disabled: false,
    }));
    options
}

/// Source and target drop-downs of the link form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSelectors {
    source: Vec<SelectorOption>,
    target: Vec<SelectorOption>,
}

impl EndpointSelectors {
    /// Selectors for an empty store
    pub fn new() -> Self {
        Self::from_store(&GraphStore::new())
    }

    pub fn from_store(store: &GraphStore) -> Self {
        let options = endpoint_options(store);
        Self {
            source: options.clone(),
            target: options,
        }
    }

    /// Rebuild both lists from the current store contents
    pub fn refresh(&mut self, store: &GraphStore) {
        *self = Self::from_store(store);
        debug!("Endpoint selectors refreshed: {} options", self.source.len());
    }

    pub fn source_options(&self) -> &[SelectorOption] {
        &self.source
    }

    pub fn target_options(&self) -> &[SelectorOption] {
        &self.target
    }

    /// Text of the option holding `value`, if any
    pub fn option_text(&self, value: Option<Ulid>) -> Option<&str> {
        self.source
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.text.as_str())
    }
}

impl Default for EndpointSelectors {
    fn default() -> Self {
        Self::new()
    }
}
