//! Raw token text accumulation
//!
//! Each lowering step records the tokens it consumes in its own [`TokenText`]
//! and merges the finished text of every child it builds. Nothing is shared
//! between sibling builders.

/// Source-order token text for one expression node
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenText {
    out: String,
}

impl TokenText {
    pub fn new() -> Self {
        TokenText::default()
    }

    /// Append a token, separated from the previous one by a space where SQL needs it
    pub fn push(&mut self, token: &str) {
        if token.is_empty() {
            return;
        }
        if needs_space(&self.out, token) {
            self.out.push(' ');
        }
        self.out.push_str(token);
    }

    /// Append a function name and its opening parenthesis
    pub fn open_call(&mut self, name: &str) {
        self.push(name);
        self.out.push('(');
    }

    /// Append the finished text of a child node
    pub fn merge(&mut self, child: &str) {
        self.push(child);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn needs_space(prev: &str, next: &str) -> bool {
    if prev.is_empty() || prev.ends_with('(') {
        return false;
    }
    !(next.starts_with(')') || next.starts_with(','))
}
