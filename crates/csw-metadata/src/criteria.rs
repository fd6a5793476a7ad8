//! Search criteria accumulated from form parameters.

use std::collections::BTreeMap;

use serde::Serialize;

/// Receiver of search parameters.
pub trait CriteriaSink {
    /// Add values for `name`. Repeated calls append.
    fn add_param(&mut self, name: &str, values: Vec<String>);
}

/// Ordered parameter map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    params: BTreeMap<String, Vec<String>>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).map(Vec::as_slice)
    }

    pub fn params(&self) -> &BTreeMap<String, Vec<String>> {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl CriteriaSink for SearchCriteria {
    fn add_param(&mut self, name: &str, values: Vec<String>) {
        self.params.entry(name.to_string()).or_default().extend(values);
    }
}
