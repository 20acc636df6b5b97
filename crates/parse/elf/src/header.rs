//! ELF32 file header parsing.
//!
//! Parses the ELF32 file header from raw bytes in the host's native byte
//! order and checks that the section and program header tables it declares
//! lie inside the data.

use core::fmt;
use std::io;

/// ELF magic bytes: `\x7fELF`.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Length of the `e_ident` identification array.
pub const EI_NIDENT: usize = 16;

/// `e_ident` index of the file class byte.
pub const EI_CLASS: usize = 4;

/// `e_ident` index of the data encoding byte.
pub const EI_DATA: usize = 5;

/// `e_ident` index of the file version byte.
pub const EI_VERSION: usize = 6;

/// ELF class: 32-bit objects.
pub const ELFCLASS32: u8 = 1;

/// ELF class: 64-bit objects.
pub const ELFCLASS64: u8 = 2;

/// Data encoding: two's complement, little-endian.
pub const ELFDATA2LSB: u8 = 1;

/// Data encoding: two's complement, big-endian.
pub const ELFDATA2MSB: u8 = 2;

/// ELF type: no file type.
pub const ET_NONE: u16 = 0;

/// ELF type: relocatable object.
pub const ET_REL: u16 = 1;

/// ELF type: executable.
pub const ET_EXEC: u16 = 2;

/// ELF type: shared object.
pub const ET_DYN: u16 = 3;

/// ELF type: core file.
pub const ET_CORE: u16 = 4;

/// ELF machine: Intel 80386.
pub const EM_386: u16 = 3;

/// ELF machine: MIPS.
pub const EM_MIPS: u16 = 8;

/// ELF machine: ARM.
pub const EM_ARM: u16 = 40;

/// Size of the ELF32 file header (52 bytes).
pub const ELF32_EHDR_SIZE: usize = 52;

/// Size of an ELF32 program header entry (32 bytes).
pub const ELF32_PHDR_SIZE: usize = 32;

/// Size of an ELF32 section header entry (40 bytes).
pub const ELF32_SHDR_SIZE: usize = 40;

/// Size of an ELF32 symbol table entry (16 bytes).
pub const ELF32_SYM_SIZE: usize = 16;

/// Read a native-endian `u16` from `data` at byte offset `off`.
///
/// # Panics
///
/// Panics if `off + 2 > data.len()`. Callers must bounds-check first.
pub(crate) fn ne_u16(data: &[u8], off: usize) -> u16 {
    u16::from_ne_bytes([data[off], data[off + 1]])
}

/// Read a native-endian `u32` from `data` at byte offset `off`.
pub(crate) fn ne_u32(data: &[u8], off: usize) -> u32 {
    u32::from_ne_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

/// Returns `true` if `[offset, offset + len)` lies inside a buffer of `total` bytes.
pub(crate) fn in_bounds(offset: usize, len: usize, total: usize) -> bool {
    offset.checked_add(len).is_some_and(|end| end <= total)
}

/// Errors that can occur when opening or reading an ELF file.
#[derive(Debug)]
pub enum ElfError {
    /// Opening, inspecting or mapping the file failed.
    Io(io::Error),
    /// The file does not start with the ELF magic bytes.
    BadMagic,
    /// The file carries the magic but is too short for an ELF32 header.
    Truncated,
    /// A declared offset or size points outside the file.
    MalformedOffset,
}

impl fmt::Display for ElfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::BadMagic => write!(f, "invalid ELF magic bytes"),
            Self::Truncated => write!(f, "file too short for an ELF32 header"),
            Self::MalformedOffset => write!(f, "offset or size outside the file"),
        }
    }
}

impl std::error::Error for ElfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ElfError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Parsed ELF32 file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf32Header {
    /// Identification bytes (magic, class, encoding, version, padding).
    pub e_ident: [u8; EI_NIDENT],
    /// Object file type.
    pub e_type: u16,
    /// Target machine architecture.
    pub e_machine: u16,
    /// Object file version.
    pub e_version: u32,
    /// Virtual address of the entry point.
    pub e_entry: u32,
    /// Offset of the program header table in the file.
    pub e_phoff: u32,
    /// Offset of the section header table in the file.
    pub e_shoff: u32,
    /// Processor-specific flags.
    pub e_flags: u32,
    /// Size of this header.
    pub e_ehsize: u16,
    /// Size of each program header entry.
    pub e_phentsize: u16,
    /// Number of program header entries.
    pub e_phnum: u16,
    /// Size of each section header entry.
    pub e_shentsize: u16,
    /// Number of section header entries.
    pub e_shnum: u16,
    /// Index of the section holding section names (`SHN_UNDEF` if none).
    pub e_shstrndx: u16,
}

impl Elf32Header {
    /// Parse an ELF32 file header from raw bytes.
    ///
    /// Only the four magic bytes are validated as format. The section and
    /// program header tables are checked to lie within `data` so that later
    /// scans never read past the end.
    ///
    /// # Errors
    ///
    /// Returns [`ElfError::BadMagic`] on a magic mismatch,
    /// [`ElfError::Truncated`] if `data` is shorter than a header, and
    /// [`ElfError::MalformedOffset`] if a header table is out of bounds.
    #[expect(clippy::similar_names, reason = "ELF field names")]
    pub fn parse(data: &[u8]) -> Result<Self, ElfError> {
        if data.len() < ELF_MAGIC.len() || data[..4] != ELF_MAGIC {
            return Err(ElfError::BadMagic);
        }
        if data.len() < ELF32_EHDR_SIZE {
            return Err(ElfError::Truncated);
        }

        let mut e_ident = [0u8; EI_NIDENT];
        e_ident.copy_from_slice(&data[..EI_NIDENT]);

        let header = Self {
            e_ident,
            e_type: ne_u16(data, 16),
            e_machine: ne_u16(data, 18),
            e_version: ne_u32(data, 20),
            e_entry: ne_u32(data, 24),
            e_phoff: ne_u32(data, 28),
            e_shoff: ne_u32(data, 32),
            e_flags: ne_u32(data, 36),
            e_ehsize: ne_u16(data, 40),
            e_phentsize: ne_u16(data, 42),
            e_phnum: ne_u16(data, 44),
            e_shentsize: ne_u16(data, 46),
            e_shnum: ne_u16(data, 48),
            e_shstrndx: ne_u16(data, 50),
        };

        if header.e_shnum > 0 {
            check_table(
                data.len(),
                header.e_shoff,
                header.e_shnum,
                header.e_shentsize,
                ELF32_SHDR_SIZE,
            )?;
        }
        if header.e_phnum > 0 {
            check_table(
                data.len(),
                header.e_phoff,
                header.e_phnum,
                header.e_phentsize,
                ELF32_PHDR_SIZE,
            )?;
        }

        Ok(header)
    }

    /// Returns the file class byte (`ELFCLASS32`, `ELFCLASS64`, ...).
    #[must_use]
    pub fn class(&self) -> u8 {
        self.e_ident[EI_CLASS]
    }

    /// Returns the data encoding byte (`ELFDATA2LSB`, `ELFDATA2MSB`, ...).
    #[must_use]
    pub fn encoding(&self) -> u8 {
        self.e_ident[EI_DATA]
    }
}

/// Check that a table of `count` entries of `entsize` bytes at `offset`
/// fits in `total` bytes and that each entry is at least `min_entsize` long.
fn check_table(
    total: usize,
    offset: u32,
    count: u16,
    entsize: u16,
    min_entsize: usize,
) -> Result<(), ElfError> {
    if usize::from(entsize) < min_entsize {
        return Err(ElfError::MalformedOffset);
    }
    // The last entry only needs `min_entsize` bytes, not a full stride.
    let span = (usize::from(count) - 1) * usize::from(entsize) + min_entsize;
    if !in_bounds(offset as usize, span, total) {
        return Err(ElfError::MalformedOffset);
    }
    Ok(())
}
