use std::collections::HashMap;

/// An opaque identity token for one interned source-level name. Two symbols
/// compare equal exactly when they were interned from the same spelling.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

/// Interns identifier spellings so the rest of the translator can compare
/// names by a cheap `Copy` token instead of by string.
#[derive(Default)]
pub struct SymbolTable {
    names: Vec<String>,
    ids: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Interns `name`, returning the same `Symbol` on every call with an
    /// equal spelling.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.ids.get(name) {
            return sym;
        }

        let sym = Symbol(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), sym);
        sym
    }

    /// Recovers the spelling a symbol was interned from, for diagnostics.
    pub fn name_of(&self, sym: Symbol) -> &str {
        &self.names[sym.0 as usize]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interning_the_same_spelling_twice_returns_the_same_symbol() {
        let mut table = SymbolTable::new();
        let a = table.intern("x");
        let b = table.intern("x");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_spellings_intern_to_distinct_symbols() {
        let mut table = SymbolTable::new();
        let a = table.intern("x");
        let b = table.intern("y");
        assert_ne!(a, b);
    }

    #[test]
    fn name_of_recovers_the_original_spelling() {
        let mut table = SymbolTable::new();
        let sym = table.intern("turtle");
        assert_eq!("turtle", table.name_of(sym));
    }
}
