//! File-backed, memory-mapped ELF32 object with name indices.

use std::cell::RefCell;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::file::ElfFile;
use crate::header::{ELF_MAGIC, Elf32Header, ElfError};
use crate::index::{NameIndex, SymbolIndex, build_section_index};
use crate::section::{Elf32SectionHeader, SectionIter};
use crate::segment::ProgramHeaderIter;
use crate::symbol::{Elf32Symbol, SymbolIter};

/// Name of the section searched by [`MappedElf::symbol`].
pub const SYMTAB_SECTION: &str = ".symtab";

/// An ELF32 file mapped read-only into memory.
///
/// The section index is built when the file is opened; the `.symtab` index
/// is built over the first two calls to [`symbol`](Self::symbol). Every
/// name and content slice handed out borrows from this object.
///
/// The symbol index is cached in a `RefCell`, so a `MappedElf` is not
/// `Sync`. Wrap it in a `Mutex` to share it between threads.
#[derive(Debug)]
pub struct MappedElf {
    // Field order is drop order: unmap before closing the file.
    map: Mmap,
    file: File,
    header: Elf32Header,
    sections: NameIndex<Elf32SectionHeader>,
    symbols: RefCell<SymbolIndex>,
}

impl MappedElf {
    /// Open and map the ELF file at `path`.
    ///
    /// # Errors
    ///
    /// - [`ElfError::Io`] if the file cannot be opened, inspected or mapped.
    /// - [`ElfError::BadMagic`] if it does not start with `\x7fELF`.
    /// - [`ElfError::Truncated`] / [`ElfError::MalformedOffset`] if the
    ///   header or its tables do not fit in the file.
    ///
    /// Nothing stays open or mapped when an error is returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ElfError> {
        let file = File::open(path.as_ref())?;
        let len = file.metadata()?.len();
        if len < ELF_MAGIC.len() as u64 {
            return Err(ElfError::BadMagic);
        }

        let map = map_file(&file)?;
        let header = Elf32Header::parse(&map)?;
        let sections = build_section_index(&ElfFile::from_parts(&map, header));

        Ok(Self {
            map,
            file,
            header,
            sections,
            symbols: RefCell::new(SymbolIndex::new()),
        })
    }

    /// Release the mapping, the file handle and both indices.
    ///
    /// Equivalent to dropping the object; any views borrowed from it have
    /// already ended by the time this can be called.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::Io`] if the file handle turns out to be unusable
    /// when it is released.
    pub fn close(self) -> Result<(), ElfError> {
        let Self { map, file, .. } = self;
        drop(map);
        // fstat the handle once more so a descriptor invalidated behind our
        // back is reported instead of silently closed.
        file.metadata()?;
        drop(file);
        Ok(())
    }

    /// Returns the zero-copy view over the mapped bytes.
    #[must_use]
    pub fn view(&self) -> ElfFile<'_> {
        ElfFile::from_parts(&self.map, self.header)
    }

    /// Returns the parsed file header.
    #[must_use]
    pub fn header(&self) -> &Elf32Header {
        &self.header
    }

    /// Returns the whole mapped file.
    #[must_use]
    pub fn raw_data(&self) -> &[u8] {
        &self.map
    }

    /// Looks a section up by name.
    ///
    /// If several sections share a name, the last one in the table is returned.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<Elf32SectionHeader> {
        self.sections.get(name)
    }

    /// Number of distinct section names in the section index.
    #[must_use]
    pub fn indexed_sections(&self) -> usize {
        self.sections.len()
    }

    /// Returns the name of a section, see [`ElfFile::section_name`].
    #[must_use]
    pub fn section_name(&self, shdr: &Elf32SectionHeader) -> Option<&str> {
        self.view().section_name(shdr)
    }

    /// Returns the file content of a section, see [`ElfFile::section_data`].
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::MalformedOffset`] if the content lies outside the file.
    pub fn section_data(&self, shdr: &Elf32SectionHeader) -> Result<&[u8], ElfError> {
        self.view().section_data(shdr)
    }

    /// Returns an iterator over all section headers.
    #[must_use]
    pub fn sections(&self) -> SectionIter<'_> {
        self.view().sections()
    }

    /// Returns an iterator over the symbols of a section, see [`ElfFile::symbols`].
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::MalformedOffset`] if the symbol table lies outside the file.
    pub fn symbols(&self, shdr: &Elf32SectionHeader) -> Result<SymbolIter<'_>, ElfError> {
        self.view().symbols(shdr)
    }

    /// Returns the name of a symbol, resolved through the string table
    /// linked from `symtab`.
    #[must_use]
    pub fn symbol_name(&self, symtab: &Elf32SectionHeader, sym: &Elf32Symbol) -> Option<&str> {
        self.view().symbol_name(symtab, sym)
    }

    /// Returns an iterator over the program header entries, or `None` if the
    /// file has none.
    #[must_use]
    pub fn program_headers(&self) -> Option<ProgramHeaderIter<'_>> {
        self.view().program_headers()
    }

    /// Looks a symbol of `.symtab` up by name.
    ///
    /// Returns `Ok(None)` if there is no `.symtab` or no symbol of that name.
    /// The first two calls each scan the symbol table once while the index
    /// is being built; later calls do not scan.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::MalformedOffset`] if `.symtab` lies outside the file.
    pub fn symbol(&self, name: &str) -> Result<Option<Elf32Symbol>, ElfError> {
        let Some(symtab) = self.section(SYMTAB_SECTION) else {
            return Ok(None);
        };
        self.symbols.borrow_mut().lookup(&self.view(), &symtab, name)
    }

    /// Number of entries in the symbol index, once it has been built.
    #[must_use]
    pub fn indexed_symbols(&self) -> Option<usize> {
        self.symbols.borrow().built_len()
    }
}

#[allow(unsafe_code)]
fn map_file(file: &File) -> Result<Mmap, ElfError> {
    // SAFETY: the map is read-only and owned by the `MappedElf` together
    // with the file. Truncating the file from another process while it is
    // mapped is outside what this crate can guard against.
    let map = unsafe { Mmap::map(file)? };
    Ok(map)
}
