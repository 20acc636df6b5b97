//! ELF32 symbol table entries.

use crate::header::{ELF32_SYM_SIZE, ne_u16, ne_u32};

/// Symbol binding: local.
pub const STB_LOCAL: u8 = 0;

/// Symbol binding: global.
pub const STB_GLOBAL: u8 = 1;

/// Symbol binding: weak (global, lower precedence).
pub const STB_WEAK: u8 = 2;

/// Symbol type: unspecified.
pub const STT_NOTYPE: u8 = 0;

/// Symbol type: data object.
pub const STT_OBJECT: u8 = 1;

/// Symbol type: function.
pub const STT_FUNC: u8 = 2;

/// Symbol type: section.
pub const STT_SECTION: u8 = 3;

/// Symbol type: source file.
pub const STT_FILE: u8 = 4;

/// Parsed ELF32 symbol table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Symbol {
    /// Offset into the linked string table for this symbol's name (0 = unnamed).
    pub st_name: u32,
    /// Symbol value (address for defined symbols).
    pub st_value: u32,
    /// Symbol size in bytes.
    pub st_size: u32,
    /// Symbol type and binding packed into one byte.
    pub st_info: u8,
    /// Reserved.
    pub st_other: u8,
    /// Section index this symbol is defined in.
    pub st_shndx: u16,
}

impl Elf32Symbol {
    /// Parse a symbol entry from raw bytes at the given offset.
    ///
    /// The caller must ensure `offset + ELF32_SYM_SIZE <= data.len()`.
    pub(crate) fn parse(data: &[u8], offset: usize) -> Self {
        let b = &data[offset..offset + ELF32_SYM_SIZE];
        Self {
            st_name: ne_u32(b, 0),
            st_value: ne_u32(b, 4),
            st_size: ne_u32(b, 8),
            st_info: b[12],
            st_other: b[13],
            st_shndx: ne_u16(b, 14),
        }
    }

    /// Returns the symbol binding (upper 4 bits of `st_info`).
    #[must_use]
    pub fn bind(&self) -> u8 {
        self.st_info >> 4
    }

    /// Returns the symbol type (lower 4 bits of `st_info`).
    #[must_use]
    pub fn kind(&self) -> u8 {
        self.st_info & 0xf
    }
}

/// Returns a short human-readable name for a symbol binding.
#[must_use]
pub fn symbol_bind_name(bind: u8) -> &'static str {
    match bind {
        STB_LOCAL => "LOCAL",
        STB_GLOBAL => "GLOBAL",
        STB_WEAK => "WEAK",
        13..=15 => "PROC",
        _ => "UNKNOWN",
    }
}

/// Returns a short human-readable name for a symbol type.
#[must_use]
pub fn symbol_type_name(kind: u8) -> &'static str {
    match kind {
        STT_NOTYPE => "NOTYPE",
        STT_OBJECT => "OBJECT",
        STT_FUNC => "FUNC",
        STT_SECTION => "SECTION",
        STT_FILE => "FILE",
        13..=15 => "PROC",
        _ => "UNKNOWN",
    }
}

/// An iterator over ELF32 symbol table entries.
///
/// Created by [`ElfFile::symbols`](crate::ElfFile::symbols).
#[derive(Debug, Clone)]
pub struct SymbolIter<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) offset: usize,
    pub(crate) end: usize,
}

impl SymbolIter<'_> {
    /// An iterator that yields nothing.
    pub(crate) fn empty() -> Self {
        Self {
            data: &[],
            offset: 0,
            end: 0,
        }
    }
}

impl Iterator for SymbolIter<'_> {
    type Item = Elf32Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset + ELF32_SYM_SIZE > self.end {
            return None;
        }
        let sym = Elf32Symbol::parse(self.data, self.offset);
        self.offset += ELF32_SYM_SIZE;
        Some(sym)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.offset) / ELF32_SYM_SIZE;
        (remaining, Some(remaining))
    }
}
