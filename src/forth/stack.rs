//! Data and control stacks
//!
//! - [`DataStack`]: the operand stack, LIFO, top = last element
//! - [`ControlStack`]: markers tracking nested `IF`/`BEGIN`/`WHILE` state
//!   while a single line executes
//!
//! Neither stack has a size limit. Popping past the bottom of the data stack is
//! reported as [`ForthError::StackUnderflow`] naming the word that asked,
//! never a panic.

use super::errors::ForthError;
use super::value::Value;

/// The operand stack
#[derive(Debug, Clone, Default)]
pub struct DataStack {
    items: Vec<Value>,
}

impl DataStack {
    pub fn new() -> Self {
        DataStack { items: Vec::new() }
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    /// Check that at least `n` items are present before `word` touches them
    pub fn require(&self, n: usize, word: &str) -> Result<(), ForthError> {
        if self.items.len() < n {
            Err(ForthError::StackUnderflow {
                word: word.to_string(),
            })
        } else {
            Ok(())
        }
    }

    pub fn pop(&mut self, word: &str) -> Result<Value, ForthError> {
        self.items.pop().ok_or_else(|| ForthError::StackUnderflow {
            word: word.to_string(),
        })
    }

    /// Item `n` positions below the top (0 = top)
    pub fn peek(&self, n: usize, word: &str) -> Result<&Value, ForthError> {
        self.items
            .len()
            .checked_sub(n + 1)
            .and_then(|index| self.items.get(index))
            .ok_or_else(|| ForthError::StackUnderflow {
                word: word.to_string(),
            })
    }

    /// Remove the item `n` positions below the top (0 = top)
    pub fn remove(&mut self, n: usize, word: &str) -> Result<Value, ForthError> {
        let index = self
            .items
            .len()
            .checked_sub(n + 1)
            .ok_or_else(|| ForthError::StackUnderflow {
                word: word.to_string(),
            })?;
        Ok(self.items.remove(index))
    }

    /// Drop the top `n` items (caller has already checked the depth)
    pub fn discard(&mut self, n: usize) {
        let keep = self.items.len().saturating_sub(n);
        self.items.truncate(keep);
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Bottom-to-top view of the stack (for display)
    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

/// Marker pushed by a control-structure word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMarker {
    IfExec,
    IfSkip,
    Begin,
    WhileExec,
    WhileSkip,
}

impl ControlMarker {
    pub fn is_skip(self) -> bool {
        matches!(self, ControlMarker::IfSkip | ControlMarker::WhileSkip)
    }

    pub fn is_if(self) -> bool {
        matches!(self, ControlMarker::IfExec | ControlMarker::IfSkip)
    }

    pub fn is_while(self) -> bool {
        matches!(self, ControlMarker::WhileExec | ControlMarker::WhileSkip)
    }
}

/// Control stack for one line's nested conditionals and loops
#[derive(Debug, Clone, Default)]
pub struct ControlStack {
    markers: Vec<ControlMarker>,
}

impl ControlStack {
    pub fn new() -> Self {
        ControlStack {
            markers: Vec::new(),
        }
    }

    pub fn push(&mut self, marker: ControlMarker) {
        self.markers.push(marker);
    }

    pub fn pop(&mut self) -> Option<ControlMarker> {
        self.markers.pop()
    }

    pub fn top(&self) -> Option<ControlMarker> {
        self.markers.last().copied()
    }

    pub fn top_mut(&mut self) -> Option<&mut ControlMarker> {
        self.markers.last_mut()
    }

    /// True while any enclosing branch is being skipped
    pub fn is_skipping(&self) -> bool {
        self.markers.iter().any(|m| m.is_skip())
    }

    /// True if some marker below the top one is skipping
    pub fn is_skipping_below_top(&self) -> bool {
        match self.markers.split_last() {
            Some((_, rest)) => rest.iter().any(|m| m.is_skip()),
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[ControlMarker] {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_counts_from_top() {
        let mut stack = DataStack::new();
        stack.push(Value::Int(1));
        stack.push(Value::Int(2));
        assert_eq!(stack.peek(0, "T").unwrap(), &Value::Int(2));
        assert_eq!(stack.peek(1, "T").unwrap(), &Value::Int(1));
        assert!(stack.peek(2, "T").is_err());
    }

    #[test]
    fn test_underflow_names_word() {
        let mut stack = DataStack::new();
        match stack.pop("DROP") {
            Err(ForthError::StackUnderflow { word }) => assert_eq!(word, "DROP"),
            other => panic!("expected underflow, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_detection() {
        let mut control = ControlStack::new();
        control.push(ControlMarker::IfSkip);
        control.push(ControlMarker::IfSkip);
        assert!(control.is_skipping());
        assert!(control.is_skipping_below_top());
        control.pop();
        assert!(!control.is_skipping_below_top());
    }
}
