//! Read-only inspection of ELF32 object files.
//!
//! [`MappedElf`] maps a file into memory, checks the ELF magic and indexes
//! its sections by name. Symbols of `.symtab` are indexed lazily the first
//! time they are looked up by name. [`ElfFile`] offers the same header,
//! section, symbol and segment queries over any byte slice, without the
//! indices.
//!
//! Fields are read in the host's native byte order. Apart from the magic,
//! the only checks performed keep reads inside the file.
//!
//! # Usage
//!
//! ```no_run
//! use elfsword_elf::MappedElf;
//!
//! fn entry_of_main(path: &str) -> Option<u32> {
//!     let elf = MappedElf::open(path).ok()?;
//!     let main = elf.symbol("main").ok()??;
//!     Some(main.st_value)
//! }
//! ```

#![deny(unsafe_code)]

pub mod file;
pub mod header;
mod index;
pub mod mapped;
pub mod section;
pub mod segment;
pub mod symbol;

#[cfg(test)]
mod fixture;

pub use file::ElfFile;
pub use header::{
    ELF_MAGIC, ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB, ET_CORE, ET_DYN, ET_EXEC,
    ET_NONE, ET_REL, Elf32Header, ElfError,
};
pub use mapped::{MappedElf, SYMTAB_SECTION};
pub use section::{
    Elf32SectionHeader, SHF_ALLOC, SHF_EXECINSTR, SHF_WRITE, SHN_ABS, SHN_COMMON, SHN_UNDEF,
    SHT_DYNSYM, SHT_NOBITS, SHT_NULL, SHT_PROGBITS, SHT_STRTAB, SHT_SYMTAB, SectionIter,
    StringTable, section_type_name,
};
pub use segment::{
    Elf32ProgramHeader, PF_R, PF_W, PF_X, PT_LOAD, ProgramHeaderIter, segment_type_name,
};
pub use symbol::{
    Elf32Symbol, STB_GLOBAL, STB_LOCAL, STB_WEAK, STT_FUNC, STT_OBJECT, SymbolIter,
    symbol_bind_name, symbol_type_name,
};
