//! Zero-copy view over an ELF32 image.
//!
//! [`ElfFile`] borrows the raw bytes and derives every header, name and
//! content slice from them on demand. It carries no index; see
//! [`MappedElf`](crate::MappedElf) for the indexed, file-backed object.

use crate::header::{ELF32_SHDR_SIZE, ELF32_SYM_SIZE, Elf32Header, ElfError, in_bounds};
use crate::section::{Elf32SectionHeader, SHN_UNDEF, SHT_NOBITS, SectionIter, StringTable};
use crate::segment::ProgramHeaderIter;
use crate::symbol::{Elf32Symbol, SymbolIter};

/// A parsed ELF32 image, holding a reference to the raw data and the parsed header.
#[derive(Debug, Clone, Copy)]
pub struct ElfFile<'a> {
    data: &'a [u8],
    header: Elf32Header,
}

impl<'a> ElfFile<'a> {
    /// Parse an ELF32 image from raw bytes.
    ///
    /// # Errors
    ///
    /// See [`Elf32Header::parse`].
    pub fn parse(data: &'a [u8]) -> Result<Self, ElfError> {
        let header = Elf32Header::parse(data)?;
        Ok(Self { data, header })
    }

    /// Rebuild a view from a header previously parsed out of `data`.
    pub(crate) fn from_parts(data: &'a [u8], header: Elf32Header) -> Self {
        Self { data, header }
    }

    /// Returns the parsed file header.
    #[must_use]
    pub fn header(&self) -> &Elf32Header {
        &self.header
    }

    /// Returns the virtual address of the entry point.
    #[must_use]
    pub fn entry_point(&self) -> u32 {
        self.header.e_entry
    }

    /// Returns the underlying raw ELF data.
    #[must_use]
    pub fn raw_data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns an iterator over all section headers, in table order.
    ///
    /// Empty if the file has no sections (`e_shnum == 0`).
    #[must_use]
    pub fn sections(&self) -> SectionIter<'a> {
        SectionIter {
            data: self.data,
            shoff: self.header.e_shoff as usize,
            shentsize: usize::from(self.header.e_shentsize),
            index: 0,
            count: self.header.e_shnum,
        }
    }

    /// Returns the section header at the given index.
    #[must_use]
    pub fn section_by_index(&self, index: usize) -> Option<Elf32SectionHeader> {
        let position = u16::try_from(index).ok()?;
        if position >= self.header.e_shnum {
            return None;
        }
        let offset = self.header.e_shoff as usize + index * usize::from(self.header.e_shentsize);
        if !in_bounds(offset, ELF32_SHDR_SIZE, self.data.len()) {
            return None;
        }
        Some(Elf32SectionHeader::parse(self.data, offset, position))
    }

    /// Finds the first section header with the given type.
    #[must_use]
    pub fn find_section_by_type(&self, sh_type: u32) -> Option<Elf32SectionHeader> {
        self.sections().find(|s| s.sh_type == sh_type)
    }

    /// Returns the section header string table, if the file declares one.
    #[must_use]
    pub fn section_header_strtab(&self) -> Option<StringTable<'a>> {
        if self.header.e_shstrndx == SHN_UNDEF {
            return None;
        }
        let shdr = self.section_by_index(usize::from(self.header.e_shstrndx))?;
        self.section_data(&shdr).ok().map(StringTable::new)
    }

    /// Returns the name of a section.
    ///
    /// `None` if the file has no section name table or the name does not
    /// resolve inside it.
    #[must_use]
    pub fn section_name(&self, shdr: &Elf32SectionHeader) -> Option<&'a str> {
        self.section_header_strtab()?.get(shdr.sh_name)
    }

    /// Returns the file content of a section.
    ///
    /// `SHT_NOBITS` sections have no file content and yield an empty slice.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::MalformedOffset`] if the content lies outside the file.
    pub fn section_data(&self, shdr: &Elf32SectionHeader) -> Result<&'a [u8], ElfError> {
        if shdr.sh_type == SHT_NOBITS {
            return Ok(&[]);
        }
        let start = shdr.sh_offset as usize;
        let size = shdr.sh_size as usize;
        if !in_bounds(start, size, self.data.len()) {
            return Err(ElfError::MalformedOffset);
        }
        Ok(&self.data[start..start + size])
    }

    /// Returns an iterator over the symbols of a section.
    ///
    /// Sections other than `SHT_SYMTAB` and `SHT_DYNSYM` yield no symbols.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::MalformedOffset`] if the symbol table lies outside the file.
    pub fn symbols(&self, shdr: &Elf32SectionHeader) -> Result<SymbolIter<'a>, ElfError> {
        if !shdr.is_symbol_table() {
            return Ok(SymbolIter::empty());
        }
        let table = self.section_data(shdr)?;
        let base = shdr.sh_offset as usize;
        Ok(SymbolIter {
            data: self.data,
            offset: base,
            end: base + table.len() / ELF32_SYM_SIZE * ELF32_SYM_SIZE,
        })
    }

    /// Returns the string table associated with a symbol table section,
    /// i.e. the section its `sh_link` points at.
    #[must_use]
    pub fn linked_strtab(&self, symtab: &Elf32SectionHeader) -> Option<StringTable<'a>> {
        if !symtab.is_symbol_table() {
            return None;
        }
        let strtab = self.section_by_index(symtab.sh_link as usize)?;
        self.section_data(&strtab).ok().map(StringTable::new)
    }

    /// Returns the name of a symbol of the given symbol table section.
    ///
    /// `None` if the section is not a symbol table, the symbol is unnamed
    /// (`st_name == 0`), or the name does not resolve in the linked string
    /// table.
    #[must_use]
    pub fn symbol_name(&self, symtab: &Elf32SectionHeader, sym: &Elf32Symbol) -> Option<&'a str> {
        if sym.st_name == 0 {
            return None;
        }
        self.linked_strtab(symtab)?.get(sym.st_name)
    }

    /// Returns an iterator over the symbols of `symtab` that have a non-empty
    /// name, paired with that name.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::MalformedOffset`] if the symbol table lies outside the file.
    pub fn named_symbols(
        &self,
        symtab: &Elf32SectionHeader,
    ) -> Result<impl Iterator<Item = (&'a str, Elf32Symbol)> + use<'a>, ElfError> {
        let symbols = self.symbols(symtab)?;
        let strtab = self.linked_strtab(symtab);
        Ok(symbols.filter_map(move |sym| {
            if sym.st_name == 0 {
                return None;
            }
            let name = strtab?.get(sym.st_name)?;
            (!name.is_empty()).then_some((name, sym))
        }))
    }

    /// Returns an iterator over the program header entries.
    ///
    /// Returns `None` if the file has no program header table (`e_phnum == 0`).
    #[must_use]
    pub fn program_headers(&self) -> Option<ProgramHeaderIter<'a>> {
        if self.header.e_phnum == 0 {
            return None;
        }
        Some(ProgramHeaderIter {
            data: self.data,
            phoff: self.header.e_phoff as usize,
            phentsize: usize::from(self.header.e_phentsize),
            index: 0,
            count: usize::from(self.header.e_phnum),
        })
    }
}
