use crate::symbols::Symbol;
use std::collections::HashMap;

/// Which of the two variable storage areas a binding lives in.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scope {
    Global,
    Local,
}

/// A resolved variable binding: its storage area and its offset within it.
///
/// `index` is interpreted per [`Scope`]: positive GP-relative (1-based, in
/// declaration order) for globals; negative FP-relative for parameters
/// (counting down from -1 for the last parameter); positive FP-relative
/// (1-based, in declaration order) for locals.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VarEntry {
    pub symbol: Symbol,
    pub scope: Scope,
    pub index: i32,
}

/// The variable environment: a stack of scopes, bottom always global.
///
/// Lookups search from the innermost scope outward; insertion always
/// targets the innermost (top) scope.
pub struct VarEnv {
    frames: Vec<HashMap<Symbol, VarEntry>>,
}

impl VarEnv {
    pub fn new() -> VarEnv {
        VarEnv {
            frames: vec![HashMap::new()],
        }
    }

    /// Pushes a new, empty scope frame (entering a function body).
    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost scope frame. It is a bug to call this with only
    /// the global frame left.
    pub fn leave_scope(&mut self) {
        debug_assert!(self.in_scope(), "cannot leave the global scope");
        self.frames.pop();
    }

    /// Whether a non-global scope is currently active, i.e. whether we are
    /// inside a function body.
    pub fn in_scope(&self) -> bool {
        self.frames.len() > 1
    }

    /// Searches from the innermost scope outward.
    pub fn find(&self, sym: Symbol) -> Option<&VarEntry> {
        self.frames.iter().rev().find_map(|frame| frame.get(&sym))
    }

    /// Looks up `sym` in the top scope only, used to detect redefinition.
    pub fn find_in_top_frame(&self, sym: Symbol) -> Option<&VarEntry> {
        self.frames.last().unwrap().get(&sym)
    }

    /// Whether `sym` is bound in the bottom (global) scope — used to detect
    /// shadowing when inserting into a non-global frame.
    pub fn shadows_global(&self, sym: Symbol) -> bool {
        self.frames.first().unwrap().contains_key(&sym)
    }

    /// Inserts `entry` into the top scope, returning the previous binding for
    /// `sym` in that same scope, if any (a redefinition).
    pub fn insert(&mut self, sym: Symbol, entry: VarEntry) -> Option<VarEntry> {
        self.frames.last_mut().unwrap().insert(sym, entry)
    }
}

/// A function binding: its arity and its code address.
///
/// `address` starts at 0 (unresolved) and is set once the function's body
/// begins emission.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FunEntry {
    pub symbol: Symbol,
    pub param_count: u16,
    pub address: u32,
}

/// The function environment: a single flat scope, program-global.
pub struct FunEnv {
    entries: HashMap<Symbol, FunEntry>,
}

impl FunEnv {
    pub fn new() -> FunEnv {
        FunEnv {
            entries: HashMap::new(),
        }
    }

    /// Inserts `entry`, returning the previous binding for `sym`, if any (a
    /// duplicate function definition).
    pub fn insert(&mut self, sym: Symbol, entry: FunEntry) -> Option<FunEntry> {
        self.entries.insert(sym, entry)
    }

    pub fn find(&self, sym: Symbol) -> Option<&FunEntry> {
        self.entries.get(&sym)
    }

    /// Sets the resolved code address of an already-inserted function.
    pub fn set_address(&mut self, sym: Symbol, addr: u32) {
        self.entries.get_mut(&sym).unwrap().address = addr;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbols::SymbolTable;

    #[test]
    fn lookup_searches_inner_scopes_before_outer_ones() {
        let mut symbols = SymbolTable::new();
        let mut env = VarEnv::new();
        let x = symbols.intern("x");
        env.insert(
            x,
            VarEntry {
                symbol: x,
                scope: Scope::Global,
                index: 1,
            },
        );
        env.enter_scope();
        env.insert(
            x,
            VarEntry {
                symbol: x,
                scope: Scope::Local,
                index: 1,
            },
        );

        assert_eq!(Scope::Local, env.find(x).unwrap().scope);
        env.leave_scope();
        assert_eq!(Scope::Global, env.find(x).unwrap().scope);
    }

    #[test]
    fn shadows_global_detects_a_global_of_the_same_name() {
        let mut symbols = SymbolTable::new();
        let mut env = VarEnv::new();
        let x = symbols.intern("x");
        env.insert(
            x,
            VarEntry {
                symbol: x,
                scope: Scope::Global,
                index: 1,
            },
        );
        env.enter_scope();
        assert!(env.shadows_global(x));
    }

    #[test]
    fn insert_reports_redefinition_in_the_same_frame() {
        let mut symbols = SymbolTable::new();
        let mut env = VarEnv::new();
        let x = symbols.intern("x");
        let entry = VarEntry {
            symbol: x,
            scope: Scope::Global,
            index: 1,
        };
        assert!(env.insert(x, entry).is_none());
        assert!(env.insert(x, entry).is_some());
    }

    #[test]
    fn in_scope_is_false_only_at_the_global_frame() {
        let mut env = VarEnv::new();
        assert!(!env.in_scope());
        env.enter_scope();
        assert!(env.in_scope());
        env.leave_scope();
        assert!(!env.in_scope());
    }

    #[test]
    fn fun_env_set_address_resolves_a_pre_declared_function() {
        let mut symbols = SymbolTable::new();
        let mut funs = FunEnv::new();
        let f = symbols.intern("f");
        funs.insert(
            f,
            FunEntry {
                symbol: f,
                param_count: 2,
                address: 0,
            },
        );
        funs.set_address(f, 42);
        assert_eq!(42, funs.find(f).unwrap().address);
    }
}
