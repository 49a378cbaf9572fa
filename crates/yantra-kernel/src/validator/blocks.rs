//! Open `[ ... ]` block tracking.

/// What opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    If,
    Else,
    Loop,
    /// A statement ending in `[` that did not match any header form.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub open_line: usize,
    pub kind: BlockKind,
    /// Set for the body of a loop whose header was rejected. The loop
    /// variable was never bound, so name lookups inside are unreliable.
    pub unbound: bool,
}

/// Stack of currently open blocks.
#[derive(Debug, Default, Clone)]
pub struct BlockStack {
    open: Vec<Block>,
    /// Number of entries with `unbound` set.
    unbound: usize,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, open_line: usize, kind: BlockKind) {
        self.push_block(Block {
            open_line,
            kind,
            unbound: false,
        });
    }

    /// Open the body of a rejected loop header.
    pub fn push_unbound(&mut self, open_line: usize, kind: BlockKind) {
        self.push_block(Block {
            open_line,
            kind,
            unbound: true,
        });
    }

    fn push_block(&mut self, block: Block) {
        tracing::trace!(line = block.open_line, kind = ?block.kind, depth = self.open.len() + 1, "open block");
        if block.unbound {
            self.unbound += 1;
        }
        self.open.push(block);
    }

    /// Close the innermost block. `None` means there was nothing to close.
    pub fn pop(&mut self) -> Option<Block> {
        let block = self.open.pop()?;
        if block.unbound {
            self.unbound -= 1;
        }
        tracing::trace!(line = block.open_line, kind = ?block.kind, depth = self.open.len(), "close block");
        Some(block)
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Whether any enclosing block is the body of a rejected loop.
    pub fn in_unbound_body(&self) -> bool {
        self.unbound > 0
    }

    /// Remaining open blocks, outermost first.
    pub fn into_open(self) -> Vec<Block> {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_lifo() {
        let mut stack = BlockStack::new();
        stack.push(1, BlockKind::If);
        stack.push(3, BlockKind::Loop);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().map(|b| b.open_line), Some(3));
        assert_eq!(stack.pop().map(|b| b.kind), Some(BlockKind::If));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut stack = BlockStack::new();
        assert!(stack.pop().is_none());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn unbound_tracks_nesting() {
        let mut stack = BlockStack::new();
        stack.push_unbound(1, BlockKind::Loop);
        stack.push(2, BlockKind::If);
        assert!(stack.in_unbound_body());
        stack.pop();
        assert!(stack.in_unbound_body());
        stack.pop();
        assert!(!stack.in_unbound_body());
    }

    #[test]
    fn into_open_outermost_first() {
        let mut stack = BlockStack::new();
        stack.push(2, BlockKind::Loop);
        stack.push(5, BlockKind::Else);
        let lines: Vec<_> = stack.into_open().iter().map(|b| b.open_line).collect();
        assert_eq!(lines, vec![2, 5]);
    }
}
