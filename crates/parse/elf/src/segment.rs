//! ELF32 program header (segment) entries.

use crate::header::{ELF32_PHDR_SIZE, ne_u32};

/// Program header type: unused entry.
pub const PT_NULL: u32 = 0;

/// Program header type: loadable segment.
pub const PT_LOAD: u32 = 1;

/// Program header type: dynamic linking information.
pub const PT_DYNAMIC: u32 = 2;

/// Program header type: program interpreter path.
pub const PT_INTERP: u32 = 3;

/// Program header type: auxiliary information.
pub const PT_NOTE: u32 = 4;

/// Program header type: reserved.
pub const PT_SHLIB: u32 = 5;

/// Program header type: the program header table itself.
pub const PT_PHDR: u32 = 6;

/// Segment flag: executable.
pub const PF_X: u32 = 0x1;

/// Segment flag: writable.
pub const PF_W: u32 = 0x2;

/// Segment flag: readable.
pub const PF_R: u32 = 0x4;

/// Parsed ELF32 program header entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elf32ProgramHeader {
    /// Segment type.
    pub p_type: u32,
    /// Offset of the segment data in the file.
    pub p_offset: u32,
    /// Virtual address of the segment.
    pub p_vaddr: u32,
    /// Physical address of the segment, where relevant.
    pub p_paddr: u32,
    /// Size of the segment data in the file.
    pub p_filesz: u32,
    /// Size of the segment in memory.
    pub p_memsz: u32,
    /// Segment permission flags (`PF_R`, `PF_W`, `PF_X`).
    pub p_flags: u32,
    /// Segment alignment.
    pub p_align: u32,
}

impl Elf32ProgramHeader {
    /// Parse a program header entry from raw bytes at the given file offset.
    ///
    /// The caller must ensure `file_offset + ELF32_PHDR_SIZE <= data.len()`.
    pub(crate) fn parse(data: &[u8], file_offset: usize) -> Self {
        let b = &data[file_offset..file_offset + ELF32_PHDR_SIZE];
        Self {
            p_type: ne_u32(b, 0),
            p_offset: ne_u32(b, 4),
            p_vaddr: ne_u32(b, 8),
            p_paddr: ne_u32(b, 12),
            p_filesz: ne_u32(b, 16),
            p_memsz: ne_u32(b, 20),
            p_flags: ne_u32(b, 24),
            p_align: ne_u32(b, 28),
        }
    }
}

/// Returns a short human-readable name for a segment type.
#[must_use]
pub fn segment_type_name(p_type: u32) -> &'static str {
    match p_type {
        PT_NULL => "NULL",
        PT_LOAD => "LOAD",
        PT_DYNAMIC => "DYNAMIC",
        PT_INTERP => "INTERP",
        PT_NOTE => "NOTE",
        PT_SHLIB => "SHLIB",
        PT_PHDR => "PHDR",
        0x7000_0000..=0x7fff_ffff => "PROC",
        _ => "UNKNOWN",
    }
}

/// An iterator over ELF32 program header entries.
///
/// Created by [`ElfFile::program_headers`](crate::ElfFile::program_headers).
#[derive(Debug, Clone)]
pub struct ProgramHeaderIter<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) phoff: usize,
    pub(crate) phentsize: usize,
    pub(crate) index: usize,
    pub(crate) count: usize,
}

impl Iterator for ProgramHeaderIter<'_> {
    type Item = Elf32ProgramHeader;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let offset = self.phoff + self.index * self.phentsize;
        if offset + ELF32_PHDR_SIZE > self.data.len() {
            return None;
        }
        self.index += 1;
        Some(Elf32ProgramHeader::parse(self.data, offset))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
