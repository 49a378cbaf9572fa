//! Symbol table for validation.
//!
//! Maps variable names to their declared type. Unlike a scope stack there is
//! a single flat table: the language has no block scoping, so a name
//! declared inside a loop body is visible after the loop too.

use std::collections::HashMap;
use std::fmt;

/// Reserved words; none of them may be declared as a variable.
pub const RESERVED_WORDS: [&str; 8] = [
    "PADAM",
    "ANKHE",
    "VARTTAI",
    "ELAITHE",
    "ALAITHE",
    "MALLI-MALLI",
    "CHATIMPU",
    "CHEPPU",
];

/// The two declarable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    /// `ANKHE`
    Number,
    /// `VARTTAI`
    Text,
}

impl VarType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "ANKHE" => Some(VarType::Number),
            "VARTTAI" => Some(VarType::Text),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            VarType::Number => "ANKHE",
            VarType::Text => "VARTTAI",
        }
    }

    /// Word used in diagnostics: `integer` or `string`.
    pub fn describe(self) -> &'static str {
        match self {
            VarType::Number => "integer",
            VarType::Text => "string",
        }
    }

    /// Whether `value` has the literal shape this type's initializer needs.
    pub fn accepts_literal(self, value: &str) -> bool {
        match self {
            VarType::Number => crate::expr::is_integer_literal(value),
            VarType::Text => crate::expr::is_string_literal(value),
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Outcome of [`SymbolTable::declare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declared {
    Inserted,
    Reserved,
    Duplicate,
}

/// Declared variables for one validation run.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    vars: HashMap<String, VarType>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED_WORDS.contains(&name)
    }

    /// Declare `name`. Reserved words and existing names are left untouched.
    pub fn declare(&mut self, name: &str, ty: VarType) -> Declared {
        if Self::is_reserved(name) {
            return Declared::Reserved;
        }
        if self.vars.contains_key(name) {
            return Declared::Duplicate;
        }
        self.vars.insert(name.to_string(), ty);
        Declared::Inserted
    }

    /// Bind `name` regardless of any earlier declaration.
    ///
    /// Only loop headers do this: `MALLI-MALLI (PADAM i:ANKHE = 0; ...)` may
    /// name a variable that was declared before the loop.
    pub fn affirm(&mut self, name: &str, ty: VarType) {
        self.vars.insert(name.to_string(), ty);
    }

    pub fn get(&self, name: &str) -> Option<VarType> {
        self.vars.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn is_type(&self, name: &str, ty: VarType) -> bool {
        self.get(name) == Some(ty)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All declarations, sorted by name.
    pub fn entries(&self) -> Vec<(&str, VarType)> {
        let mut entries: Vec<_> = self.vars.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
