use crate::stax_vm::error::{RuntimeError, RuntimeResult};
use std::fmt;

/// The operand stack of the machine.
///
/// A LIFO sequence of signed machine integers, unbounded in depth (limited
/// only by host memory). Underflow is always an error value, never a
/// silently returned default.
#[derive(Debug, Default)]
pub struct Stack {
    values: Vec<i64>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { values: Vec::new() }
    }

    pub fn push(&mut self, val: i64) {
        self.values.push(val);
    }

    pub fn pop(&mut self) -> RuntimeResult<i64> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pops the right operand `b` then the left operand `a`, returning
    /// `(a, b)` so that binary instructions compute `a OP b`.
    pub fn pop_2(&mut self) -> RuntimeResult<(i64, i64)> {
        let b = self.pop()?;
        let a = self.pop()?;
        Ok((a, b))
    }

    pub fn last(&self) -> RuntimeResult<i64> {
        self.values.last().copied().ok_or(RuntimeError::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, val) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{val}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::Stack;
    use crate::stax_vm::error::RuntimeError;

    #[test]
    fn pop_2_returns_left_then_right() {
        let mut stack = Stack::new();
        stack.push(3);
        stack.push(4);
        assert_eq!(stack.pop_2().unwrap(), (3, 4));
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_stack_underflows() {
        let mut stack = Stack::new();
        assert!(matches!(stack.pop(), Err(RuntimeError::StackUnderflow)));
        assert!(matches!(stack.last(), Err(RuntimeError::StackUnderflow)));
    }

    #[test]
    fn last_peeks_without_popping() {
        let mut stack = Stack::new();
        stack.push(7);
        assert_eq!(stack.last().unwrap(), 7);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn display_lists_bottom_to_top() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.to_string(), "[1, 2]");
    }
}
