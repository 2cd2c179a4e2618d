use crate::stax_vm::error::{RuntimeError, RuntimeResult};
use std::collections::HashMap;

/// The named-variable store used by STORE/LOAD.
///
/// One flat global scope per program run; reset on each fresh execution and
/// never shared across runs.
#[derive(Debug, Default)]
pub struct VarMap {
    vars: HashMap<String, i64>,
}

impl VarMap {
    pub fn new() -> Self {
        VarMap {
            vars: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: i64) {
        self.vars.insert(name.to_owned(), value);
    }

    pub fn get(&self, name: &str) -> RuntimeResult<i64> {
        self.vars
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_owned()))
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::VarMap;
    use crate::stax_vm::error::RuntimeError;

    #[test]
    fn insert_overwrites_previous_value() {
        let mut vars = VarMap::new();
        vars.insert("x", 1);
        vars.insert("x", 2);
        assert_eq!(vars.get("x").unwrap(), 2);
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let vars = VarMap::new();
        match vars.get("missing") {
            Err(RuntimeError::UndefinedVariable(name)) => assert_eq!(name, "missing"),
            other => panic!("expected undefined variable error, got {other:?}"),
        }
    }
}
