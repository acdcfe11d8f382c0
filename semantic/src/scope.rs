use ir::Type;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId(usize);

#[derive(Debug, Default)]
struct Frame {
    parent: Option<FrameId>,
    symbols: HashMap<String, Type>,
}

/// Block scopes as an arena of frames. Entering pushes a frame whose parent
/// is the current one; leaving moves the cursor back to the parent. Frames
/// are never copied, and a lookup walks the parent chain.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
    current: Option<FrameId>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(Frame { parent: self.current, symbols: HashMap::new() });
        self.current = Some(id);
        id
    }

    pub fn exit(&mut self) {
        self.current = self.current.and_then(|id| self.frames[id.0].parent);
    }

    /// Bind `name` in the innermost frame. Returns false when the name is
    /// already bound there; outer bindings are shadowed, not reported.
    pub fn declare(&mut self, name: &str, ty: Type) -> bool {
        let Some(id) = self.current else {
            return false;
        };
        let symbols = &mut self.frames[id.0].symbols;
        if symbols.contains_key(name) {
            return false;
        }
        symbols.insert(name.to_string(), ty);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        let mut cursor = self.current;
        while let Some(id) = cursor {
            let frame = &self.frames[id.0];
            if let Some(ty) = frame.symbols.get(name) {
                return Some(ty);
            }
            cursor = frame.parent;
        }
        None
    }

    /// Number of frames between the innermost one and the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.current;
        while let Some(id) = cursor {
            depth += 1;
            cursor = self.frames[id.0].parent;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_frame_shadows_and_restores() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        assert!(scopes.declare("x", Type::Integer));
        scopes.enter();
        assert!(scopes.declare("x", Type::String));
        assert_eq!(scopes.lookup("x"), Some(&Type::String));
        scopes.exit();
        assert_eq!(scopes.lookup("x"), Some(&Type::Integer));
    }

    #[test]
    fn redeclaration_in_same_frame_fails() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        assert!(scopes.declare("x", Type::Integer));
        assert!(!scopes.declare("x", Type::Real));
        assert_eq!(scopes.lookup("x"), Some(&Type::Integer));
    }

    #[test]
    fn names_vanish_after_exit() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        scopes.enter();
        scopes.declare("tmp", Type::Boolean);
        assert_eq!(scopes.depth(), 2);
        scopes.exit();
        assert_eq!(scopes.lookup("tmp"), None);
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn declare_without_frame_is_rejected() {
        let mut scopes = ScopeStack::new();
        assert!(!scopes.declare("x", Type::Integer));
        scopes.exit();
        assert_eq!(scopes.depth(), 0);
    }
}
