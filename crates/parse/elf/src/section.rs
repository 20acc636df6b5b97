//! ELF32 section headers and string tables.
//!
//! Section headers are parsed on demand from the section header table; a
//! [`SectionIter`] walks that table by offset and stride without keeping any
//! state outside the iterator itself.

use crate::header::{ELF32_SHDR_SIZE, ne_u32};

/// Section type: inactive header.
pub const SHT_NULL: u32 = 0;

/// Section type: program-defined content.
pub const SHT_PROGBITS: u32 = 1;

/// Section type: symbol table.
pub const SHT_SYMTAB: u32 = 2;

/// Section type: string table.
pub const SHT_STRTAB: u32 = 3;

/// Section type: relocation entries with addends.
pub const SHT_RELA: u32 = 4;

/// Section type: symbol hash table.
pub const SHT_HASH: u32 = 5;

/// Section type: dynamic linking information.
pub const SHT_DYNAMIC: u32 = 6;

/// Section type: note.
pub const SHT_NOTE: u32 = 7;

/// Section type: occupies no file space (`.bss`).
pub const SHT_NOBITS: u32 = 8;

/// Section type: relocation entries without addends.
pub const SHT_REL: u32 = 9;

/// Section type: reserved.
pub const SHT_SHLIB: u32 = 10;

/// Section type: dynamic symbol table.
pub const SHT_DYNSYM: u32 = 11;

/// Lowest processor-specific section type.
pub const SHT_LOPROC: u32 = 0x7000_0000;

/// Lowest application-specific section type.
pub const SHT_LOUSER: u32 = 0x8000_0000;

/// Section flag: writable data.
pub const SHF_WRITE: u32 = 0x1;

/// Section flag: occupies memory during execution.
pub const SHF_ALLOC: u32 = 0x2;

/// Section flag: executable machine instructions.
pub const SHF_EXECINSTR: u32 = 0x4;

/// Section flag mask: processor-specific bits.
pub const SHF_MASKPROC: u32 = 0xf000_0000;

/// Special section index: undefined.
pub const SHN_UNDEF: u16 = 0;

/// Special section index: absolute values.
pub const SHN_ABS: u16 = 0xfff1;

/// Special section index: common symbols.
pub const SHN_COMMON: u16 = 0xfff2;

/// Parsed ELF32 section header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf32SectionHeader {
    /// Position of this entry in the section header table.
    pub index: u16,
    /// Offset into the section header string table for this section's name.
    pub sh_name: u32,
    /// Section type (`SHT_SYMTAB`, `SHT_STRTAB`, etc.).
    pub sh_type: u32,
    /// Section flags.
    pub sh_flags: u32,
    /// Virtual address of the section in memory (0 for non-loaded sections).
    pub sh_addr: u32,
    /// File offset of the section data.
    pub sh_offset: u32,
    /// Size of the section data in bytes.
    pub sh_size: u32,
    /// Associated section index (for symbol tables: their string table).
    pub sh_link: u32,
    /// Extra info (interpretation depends on section type).
    pub sh_info: u32,
    /// Required alignment of the section.
    pub sh_addralign: u32,
    /// Size of each entry (for sections with fixed-size entries).
    pub sh_entsize: u32,
}

impl Elf32SectionHeader {
    /// Parse the section header stored at `file_offset`.
    ///
    /// The caller must ensure `file_offset + ELF32_SHDR_SIZE <= data.len()`.
    pub(crate) fn parse(data: &[u8], file_offset: usize, index: u16) -> Self {
        let b = &data[file_offset..file_offset + ELF32_SHDR_SIZE];
        Self {
            index,
            sh_name: ne_u32(b, 0),
            sh_type: ne_u32(b, 4),
            sh_flags: ne_u32(b, 8),
            sh_addr: ne_u32(b, 12),
            sh_offset: ne_u32(b, 16),
            sh_size: ne_u32(b, 20),
            sh_link: ne_u32(b, 24),
            sh_info: ne_u32(b, 28),
            sh_addralign: ne_u32(b, 32),
            sh_entsize: ne_u32(b, 36),
        }
    }

    /// Returns `true` for `SHT_SYMTAB` and `SHT_DYNSYM` sections.
    #[must_use]
    pub fn is_symbol_table(&self) -> bool {
        matches!(self.sh_type, SHT_SYMTAB | SHT_DYNSYM)
    }
}

/// Returns a short human-readable name for a section type.
#[must_use]
pub fn section_type_name(sh_type: u32) -> &'static str {
    match sh_type {
        SHT_NULL => "NULL",
        SHT_PROGBITS => "PROGBITS",
        SHT_SYMTAB => "SYMTAB",
        SHT_STRTAB => "STRTAB",
        SHT_RELA => "RELA",
        SHT_HASH => "HASH",
        SHT_DYNAMIC => "DYNAMIC",
        SHT_NOTE => "NOTE",
        SHT_NOBITS => "NOBITS",
        SHT_REL => "REL",
        SHT_SHLIB => "SHLIB",
        SHT_DYNSYM => "DYNSYM",
        t if t >= SHT_LOUSER => "USER",
        t if t >= SHT_LOPROC => "PROC",
        _ => "UNKNOWN",
    }
}

/// A zero-copy wrapper around a NUL-terminated string table section.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    data: &'a [u8],
}

impl<'a> StringTable<'a> {
    /// Creates a new string table from the raw section data.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Looks up a NUL-terminated string at the given byte offset.
    ///
    /// Returns `None` if the offset is out of bounds, the string is not
    /// NUL-terminated within the table, or it is not valid UTF-8.
    #[must_use]
    pub fn get(&self, offset: u32) -> Option<&'a str> {
        let remaining = self.data.get(offset as usize..)?;
        let nul_pos = remaining.iter().position(|&b| b == 0)?;
        core::str::from_utf8(&remaining[..nul_pos]).ok()
    }
}

/// An iterator over ELF32 section headers.
///
/// Created by [`ElfFile::sections`](crate::ElfFile::sections).
#[derive(Debug, Clone)]
pub struct SectionIter<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) shoff: usize,
    pub(crate) shentsize: usize,
    pub(crate) index: u16,
    pub(crate) count: u16,
}

impl Iterator for SectionIter<'_> {
    type Item = Elf32SectionHeader;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let offset = self.shoff + usize::from(self.index) * self.shentsize;
        if offset + ELF32_SHDR_SIZE > self.data.len() {
            return None;
        }
        let hdr = Elf32SectionHeader::parse(self.data, offset, self.index);
        self.index += 1;
        Some(hdr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.count.saturating_sub(self.index));
        (remaining, Some(remaining))
    }
}
