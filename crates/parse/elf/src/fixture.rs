//! Synthetic ELF32 images for tests.
//!
//! Depends on `std` only, so integration tests of this crate and of the CLI
//! pull it in with `#[path]`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

const EHDR_SIZE: usize = 52;
const PHDR_SIZE: usize = 32;
const SHDR_SIZE: usize = 40;

/// Section type values used by fixtures.
pub const SHT_PROGBITS: u32 = 1;
/// Symbol table.
pub const SHT_SYMTAB: u32 = 2;
/// String table.
pub const SHT_STRTAB: u32 = 3;
/// No file content.
pub const SHT_NOBITS: u32 = 8;
/// Dynamic symbol table.
pub const SHT_DYNSYM: u32 = 11;

struct Section {
    name: String,
    sh_type: u32,
    flags: u32,
    addr: u32,
    link: u32,
    info: u32,
    entsize: u32,
    data: Vec<u8>,
    /// Overrides the size written to the header (for `NOBITS` or broken files).
    size: Option<u32>,
    /// Overrides the offset written to the header.
    offset: Option<u32>,
}

/// A symbol to place in a fixture symbol table.
#[derive(Clone, Copy)]
pub struct FixtureSymbol<'a> {
    /// Name, or `""` for an unnamed (`st_name == 0`) symbol.
    pub name: &'a str,
    /// `st_value`.
    pub value: u32,
    /// `st_size`.
    pub size: u32,
    /// `st_info`.
    pub info: u8,
    /// `st_shndx`.
    pub shndx: u16,
}

impl<'a> FixtureSymbol<'a> {
    /// A global function symbol at `value` in section 1.
    pub fn func(name: &'a str, value: u32) -> Self {
        Self {
            name,
            value,
            size: 4,
            info: 0x12,
            shndx: 1,
        }
    }
}

/// Builder for an ELF32 image laid out as
/// header, program headers, section contents, `.shstrtab`, section headers.
pub struct ElfFixture {
    entry: u32,
    sections: Vec<Section>,
    segments: Vec<[u32; 8]>,
    with_shstrtab: bool,
}

impl Default for ElfFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ElfFixture {
    /// An image with only the null section.
    pub fn new() -> Self {
        Self {
            entry: 0x8000,
            sections: vec![Section {
                name: String::new(),
                sh_type: 0,
                flags: 0,
                addr: 0,
                link: 0,
                info: 0,
                entsize: 0,
                data: Vec::new(),
                size: None,
                offset: None,
            }],
            segments: Vec::new(),
            with_shstrtab: true,
        }
    }

    /// Set `e_entry`.
    pub fn entry(&mut self, entry: u32) -> &mut Self {
        self.entry = entry;
        self
    }

    /// Omit `.shstrtab` and leave `e_shstrndx` undefined.
    pub fn without_shstrtab(&mut self) -> &mut Self {
        self.with_shstrtab = false;
        self
    }

    /// Add a section and return its index.
    pub fn section(&mut self, name: &str, sh_type: u32, data: &[u8]) -> u32 {
        self.sections.push(Section {
            name: name.to_owned(),
            sh_type,
            flags: 0,
            addr: 0,
            link: 0,
            info: 0,
            entsize: 0,
            data: data.to_vec(),
            size: None,
            offset: None,
        });
        (self.sections.len() - 1) as u32
    }

    /// Add a `SHT_NOBITS` section of `size` bytes and return its index.
    pub fn nobits(&mut self, name: &str, size: u32) -> u32 {
        let index = self.section(name, SHT_NOBITS, &[]);
        self.sections[index as usize].size = Some(size);
        index
    }

    /// Add a string table holding `names` and return its index together with
    /// the offset of each name.
    pub fn strtab(&mut self, name: &str, names: &[&str]) -> (u32, Vec<u32>) {
        let (data, offsets) = string_table(names);
        (self.section(name, SHT_STRTAB, &data), offsets)
    }

    /// Add a symbol table of type `sh_type` whose names live in a fresh string
    /// table `strtab_name`. Returns `(symtab index, strtab index)`.
    ///
    /// A null symbol is *not* prepended: the entries are exactly `symbols`.
    pub fn symtab(
        &mut self,
        name: &str,
        sh_type: u32,
        strtab_name: &str,
        symbols: &[FixtureSymbol<'_>],
    ) -> (u32, u32) {
        let names: Vec<&str> = symbols.iter().map(|s| s.name).collect();
        let (strtab, offsets) = self.strtab(strtab_name, &names);
        let mut data = Vec::new();
        for (sym, &off) in symbols.iter().zip(&offsets) {
            let st_name = if sym.name.is_empty() { 0 } else { off };
            data.extend_from_slice(&symbol_bytes(
                st_name, sym.value, sym.size, sym.info, sym.shndx,
            ));
        }
        let index = self.section(name, sh_type, &data);
        self.set_link(index, strtab);
        self.sections[index as usize].entsize = 16;
        (index, strtab)
    }

    /// Set `sh_link` of a section.
    pub fn set_link(&mut self, index: u32, link: u32) -> &mut Self {
        self.sections[index as usize].link = link;
        self
    }

    /// Set `sh_flags` and `sh_addr` of a section.
    pub fn set_alloc(&mut self, index: u32, flags: u32, addr: u32) -> &mut Self {
        let section = &mut self.sections[index as usize];
        section.flags = flags;
        section.addr = addr;
        self
    }

    /// Override the `sh_offset`/`sh_size` written for a section.
    pub fn set_extent(&mut self, index: u32, offset: u32, size: u32) -> &mut Self {
        let section = &mut self.sections[index as usize];
        section.offset = Some(offset);
        section.size = Some(size);
        self
    }

    /// Add a program header entry.
    pub fn segment(
        &mut self,
        p_type: u32,
        p_offset: u32,
        p_vaddr: u32,
        p_filesz: u32,
        p_memsz: u32,
        p_flags: u32,
    ) -> &mut Self {
        self.segments
            .push([p_type, p_offset, p_vaddr, p_vaddr, p_filesz, p_memsz, p_flags, 4]);
        self
    }

    /// Returns the file offset at which section `index`'s content will be placed.
    pub fn content_offset(&self, index: u32) -> u32 {
        self.layout().0[index as usize]
    }

    /// Compute content offsets for every section, plus the `.shstrtab`
    /// offset and the section header table offset.
    fn layout(&self) -> (Vec<u32>, usize, usize) {
        let mut cursor = EHDR_SIZE + self.segments.len() * PHDR_SIZE;
        let mut offsets = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            offsets.push(cursor as u32);
            cursor += section.data.len();
        }
        let shstrtab_off = cursor;
        if self.with_shstrtab {
            cursor += self.shstrtab().0.len();
        }
        let shoff = cursor.next_multiple_of(4);
        (offsets, shstrtab_off, shoff)
    }

    fn shstrtab(&self) -> (Vec<u8>, Vec<u32>) {
        let mut names: Vec<&str> = self.sections.iter().map(|s| s.name.as_str()).collect();
        names.push(".shstrtab");
        string_table(&names)
    }

    /// Serialize the image.
    pub fn build(&self) -> Vec<u8> {
        let (offsets, shstrtab_off, shoff) = self.layout();
        let (shstrtab, name_offsets) = self.shstrtab();
        let shnum = self.sections.len() + usize::from(self.with_shstrtab);

        let mut buf = vec![0u8; EHDR_SIZE];
        buf[0..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
        buf[4] = 1;
        buf[5] = if cfg!(target_endian = "little") { 1 } else { 2 };
        buf[6] = 1;
        put16(&mut buf, 16, 2);
        put16(&mut buf, 18, 40);
        put32(&mut buf, 20, 1);
        put32(&mut buf, 24, self.entry);
        put32(&mut buf, 28, if self.segments.is_empty() { 0 } else { EHDR_SIZE as u32 });
        put32(&mut buf, 32, shoff as u32);
        put16(&mut buf, 40, EHDR_SIZE as u16);
        put16(&mut buf, 42, PHDR_SIZE as u16);
        put16(&mut buf, 44, self.segments.len() as u16);
        put16(&mut buf, 46, SHDR_SIZE as u16);
        put16(&mut buf, 48, shnum as u16);
        put16(
            &mut buf,
            50,
            if self.with_shstrtab { self.sections.len() as u16 } else { 0 },
        );

        for segment in &self.segments {
            for field in segment {
                buf.extend_from_slice(&field.to_ne_bytes());
            }
        }
        for section in &self.sections {
            buf.extend_from_slice(&section.data);
        }
        if self.with_shstrtab {
            buf.extend_from_slice(&shstrtab);
        }
        buf.resize(shoff, 0);

        for (i, section) in self.sections.iter().enumerate() {
            let name = if section.name.is_empty() { 0 } else { name_offsets[i] };
            let header = [
                name,
                section.sh_type,
                section.flags,
                section.addr,
                section.offset.unwrap_or(offsets[i]),
                section.size.unwrap_or(section.data.len() as u32),
                section.link,
                section.info,
                1,
                section.entsize,
            ];
            for field in header {
                buf.extend_from_slice(&field.to_ne_bytes());
            }
        }
        if self.with_shstrtab {
            let header = [
                name_offsets[self.sections.len()],
                SHT_STRTAB,
                0,
                0,
                shstrtab_off as u32,
                shstrtab.len() as u32,
                0,
                0,
                1,
                0,
            ];
            for field in header {
                buf.extend_from_slice(&field.to_ne_bytes());
            }
        }
        buf
    }
}

/// Encode a string table; returns the bytes and the offset of each name.
/// Empty names share the leading NUL at offset 0.
pub fn string_table(names: &[&str]) -> (Vec<u8>, Vec<u32>) {
    let mut data = vec![0u8];
    let mut offsets = Vec::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            offsets.push(0);
            continue;
        }
        offsets.push(data.len() as u32);
        data.extend_from_slice(name.as_bytes());
        data.push(0);
    }
    (data, offsets)
}

/// Encode one ELF32 symbol entry.
pub fn symbol_bytes(st_name: u32, value: u32, size: u32, info: u8, shndx: u16) -> [u8; 16] {
    let mut b = [0u8; 16];
    b[0..4].copy_from_slice(&st_name.to_ne_bytes());
    b[4..8].copy_from_slice(&value.to_ne_bytes());
    b[8..12].copy_from_slice(&size.to_ne_bytes());
    b[12] = info;
    b[14..16].copy_from_slice(&shndx.to_ne_bytes());
    b
}

fn put16(buf: &mut [u8], off: usize, value: u16) {
    buf[off..off + 2].copy_from_slice(&value.to_ne_bytes());
}

fn put32(buf: &mut [u8], off: usize, value: u32) {
    buf[off..off + 4].copy_from_slice(&value.to_ne_bytes());
}

/// A file in the system temp directory, removed on drop.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Write `bytes` to a fresh temp file whose name contains `tag`.
    pub fn new(tag: &str, bytes: &[u8]) -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "elfsword-{}-{n}-{tag}.elf",
            std::process::id()
        ));
        std::fs::write(&path, bytes).expect("failed to write temp file");
        Self { path }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
