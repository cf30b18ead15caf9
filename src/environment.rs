use std::collections::HashMap;

/// Variable store for one run. Assignments write it, evaluation only
/// reads it.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    values: HashMap<String, f64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All variables ordered by name.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut vars: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        vars.sort_by_key(|(name, _)| *name);
        vars
    }
}
