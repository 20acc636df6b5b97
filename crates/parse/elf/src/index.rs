//! Name indices over sections and symbols.
//!
//! The section index is built eagerly when a file is opened. The symbol
//! index is built lazily across symbol lookups:
//!
//! 1. The first lookup scans `.symtab`, answering the query while counting
//!    the named symbols.
//! 2. The second lookup allocates the table at exactly that capacity and
//!    rescans, answering the query while filling the table.
//! 3. Every later lookup is a table hit with no scan.
//!
//! Consumers that never look a symbol up never pay for the table.

use std::collections::HashMap;

use crate::file::ElfFile;
use crate::header::ElfError;
use crate::section::Elf32SectionHeader;
use crate::symbol::Elf32Symbol;

/// A name to header mapping. A later insert under the same name replaces
/// the earlier one.
#[derive(Debug, Clone)]
pub(crate) struct NameIndex<T> {
    entries: HashMap<Box<str>, T>,
}

impl<T: Copy> NameIndex<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: &str, value: T) {
        self.entries.insert(name.into(), value);
    }

    pub(crate) fn get(&self, name: &str) -> Option<T> {
        self.entries.get(name).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Index every section whose name resolves to a non-empty string.
pub(crate) fn build_section_index(elf: &ElfFile<'_>) -> NameIndex<Elf32SectionHeader> {
    let mut index = NameIndex::with_capacity(usize::from(elf.header().e_shnum));
    let Some(names) = elf.section_header_strtab() else {
        return index;
    };
    for shdr in elf.sections() {
        match names.get(shdr.sh_name) {
            Some(name) if !name.is_empty() => index.insert(name, shdr),
            _ => {}
        }
    }
    index
}

/// Construction state of the symbol index.
#[derive(Debug)]
enum Phase {
    /// No scan has happened yet.
    Unbuilt,
    /// One scan has counted this many named symbols.
    Counted(usize),
    /// The table holds every named symbol.
    Built(NameIndex<Elf32Symbol>),
    /// The symbol table has no named symbols; every lookup misses.
    Empty,
}

/// Lazily built name index over one symbol table.
///
/// Not synchronized: callers serialize access (the owner keeps it in a
/// `RefCell`).
#[derive(Debug)]
pub(crate) struct SymbolIndex {
    phase: Phase,
    /// Number of full symbol table scans performed so far.
    #[cfg(test)]
    pub(crate) scans: usize,
}

impl SymbolIndex {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Unbuilt,
            #[cfg(test)]
            scans: 0,
        }
    }

    /// Look `name` up in `symtab`, advancing the construction by at most one
    /// phase.
    ///
    /// When several symbols share a name, the one scanned last wins in
    /// every phase.
    pub(crate) fn lookup(
        &mut self,
        elf: &ElfFile<'_>,
        symtab: &Elf32SectionHeader,
        name: &str,
    ) -> Result<Option<Elf32Symbol>, ElfError> {
        let mut found = None;
        let next = match &self.phase {
            Phase::Built(index) => return Ok(index.get(name)),
            Phase::Empty => return Ok(None),
            Phase::Unbuilt => {
                let mut count = 0;
                for (sym_name, sym) in elf.named_symbols(symtab)? {
                    count += 1;
                    if sym_name == name {
                        found = Some(sym);
                    }
                }
                if count == 0 {
                    Phase::Empty
                } else {
                    Phase::Counted(count)
                }
            }
            Phase::Counted(count) => {
                let mut index = NameIndex::with_capacity(*count);
                for (sym_name, sym) in elf.named_symbols(symtab)? {
                    if sym_name == name {
                        found = Some(sym);
                    }
                    index.insert(sym_name, sym);
                }
                Phase::Built(index)
            }
        };
        #[cfg(test)]
        {
            self.scans += 1;
        }
        self.phase = next;
        Ok(found)
    }

    /// Number of entries in the table, once built.
    pub(crate) fn built_len(&self) -> Option<usize> {
        match &self.phase {
            Phase::Built(index) => Some(index.len()),
            _ => None,
        }
    }
}
