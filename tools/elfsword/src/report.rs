//! Plain-text rendering of headers, sections, symbols and segments.

use std::fmt::Write as _;

use elfsword_elf::{
    Elf32Header, Elf32ProgramHeader, Elf32SectionHeader, Elf32Symbol, PF_R, PF_W, PF_X,
    SHF_ALLOC, SHF_EXECINSTR, SHF_WRITE, SHN_ABS, SHN_COMMON, SHN_UNDEF, section_type_name,
    segment_type_name, symbol_bind_name, symbol_type_name,
};

/// Render the file header as `field: value` lines.
pub fn header(hdr: &Elf32Header) -> String {
    let magic: Vec<String> = hdr.e_ident.iter().map(|b| format!("{b:02x}")).collect();
    let mut out = String::new();
    let _ = writeln!(out, "Magic:                 {}", magic.join(" "));
    let _ = writeln!(out, "Class:                 {}", class_name(hdr.class()));
    let _ = writeln!(out, "Data:                  {}", encoding_name(hdr.encoding()));
    let _ = writeln!(out, "Type:                  {}", type_name(hdr.e_type));
    let _ = writeln!(out, "Machine:               {}", hdr.e_machine);
    let _ = writeln!(out, "Version:               {}", hdr.e_version);
    let _ = writeln!(out, "Entry point:           {:#x}", hdr.e_entry);
    let _ = writeln!(out, "Program headers:       {} x {} bytes at {:#x}", hdr.e_phnum, hdr.e_phentsize, hdr.e_phoff);
    let _ = writeln!(out, "Section headers:       {} x {} bytes at {:#x}", hdr.e_shnum, hdr.e_shentsize, hdr.e_shoff);
    let _ = writeln!(out, "Flags:                 {:#x}", hdr.e_flags);
    let _ = writeln!(out, "Header size:           {}", hdr.e_ehsize);
    let _ = write!(out, "Section names index:   {}", hdr.e_shstrndx);
    out
}

/// Column headings for [`section_row`].
pub const SECTION_HEADINGS: &str =
    "  [Nr] Name                 Type         Flg  Addr     Off      Size     Lk";

/// Render one section header.
pub fn section_row(shdr: &Elf32SectionHeader, name: Option<&str>) -> String {
    format!(
        "  [{:>2}] {:<20} {:<12} {:<4} {:08x} {:08x} {:08x} {}",
        shdr.index,
        name.unwrap_or("<unnamed>"),
        section_type_name(shdr.sh_type),
        section_flags(shdr.sh_flags),
        shdr.sh_addr,
        shdr.sh_offset,
        shdr.sh_size,
        shdr.sh_link,
    )
}

/// Column headings for [`symbol_row`].
pub const SYMBOL_HEADINGS: &str = "   Num: Value    Size     Type    Bind   Ndx Name";

/// Render one symbol.
pub fn symbol_row(num: usize, sym: &Elf32Symbol, name: Option<&str>) -> String {
    format!(
        "{:>6}: {:08x} {:<8} {:<7} {:<6} {:>3} {}",
        num,
        sym.st_value,
        sym.st_size,
        symbol_type_name(sym.kind()),
        symbol_bind_name(sym.bind()),
        section_index(sym.st_shndx),
        name.unwrap_or(""),
    )
}

/// Column headings for [`segment_row`].
pub const SEGMENT_HEADINGS: &str =
    "  Type     Offset   VirtAddr PhysAddr FileSiz  MemSiz   Flg Align";

/// Render one program header.
pub fn segment_row(phdr: &Elf32ProgramHeader) -> String {
    format!(
        "  {:<8} {:08x} {:08x} {:08x} {:08x} {:08x} {:<3} {:#x}",
        segment_type_name(phdr.p_type),
        phdr.p_offset,
        phdr.p_vaddr,
        phdr.p_paddr,
        phdr.p_filesz,
        phdr.p_memsz,
        segment_flags(phdr.p_flags),
        phdr.p_align,
    )
}

/// Render `SHF_*` flags as letters (`W`, `A`, `X`).
pub fn section_flags(flags: u32) -> String {
    let mut out = String::new();
    for (bit, letter) in [(SHF_WRITE, 'W'), (SHF_ALLOC, 'A'), (SHF_EXECINSTR, 'X')] {
        if flags & bit != 0 {
            out.push(letter);
        }
    }
    out
}

/// Render `PF_*` flags as `RWE`, with spaces for unset bits.
pub fn segment_flags(flags: u32) -> String {
    [(PF_R, 'R'), (PF_W, 'W'), (PF_X, 'E')]
        .iter()
        .map(|&(bit, letter)| if flags & bit != 0 { letter } else { ' ' })
        .collect()
}

fn section_index(shndx: u16) -> String {
    match shndx {
        SHN_UNDEF => "UND".into(),
        SHN_ABS => "ABS".into(),
        SHN_COMMON => "COM".into(),
        n => n.to_string(),
    }
}

fn class_name(class: u8) -> &'static str {
    match class {
        elfsword_elf::ELFCLASS32 => "ELF32",
        elfsword_elf::ELFCLASS64 => "ELF64",
        _ => "unknown",
    }
}

fn encoding_name(encoding: u8) -> &'static str {
    match encoding {
        elfsword_elf::ELFDATA2LSB => "little-endian",
        elfsword_elf::ELFDATA2MSB => "big-endian",
        _ => "unknown",
    }
}

fn type_name(e_type: u16) -> &'static str {
    match e_type {
        elfsword_elf::ET_NONE => "NONE",
        elfsword_elf::ET_REL => "REL (relocatable)",
        elfsword_elf::ET_EXEC => "EXEC (executable)",
        elfsword_elf::ET_DYN => "DYN (shared object)",
        elfsword_elf::ET_CORE => "CORE",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_letters() {
        assert_eq!(section_flags(SHF_ALLOC | SHF_EXECINSTR), "AX");
        assert_eq!(section_flags(0), "");
        assert_eq!(segment_flags(PF_R | PF_X), "R E");
        assert_eq!(segment_flags(PF_R | PF_W | PF_X), "RWE");
    }

    #[test]
    fn special_section_indices() {
        assert_eq!(section_index(SHN_UNDEF), "UND");
        assert_eq!(section_index(SHN_ABS), "ABS");
        assert_eq!(section_index(7), "7");
    }

    #[test]
    fn symbol_row_columns() {
        let sym = Elf32Symbol {
            st_name: 1,
            st_value: 0x8000,
            st_size: 16,
            st_info: 0x12,
            st_other: 0,
            st_shndx: 1,
        };
        let row = symbol_row(3, &sym, Some("main"));
        assert!(row.starts_with("     3: 00008000 16"));
        assert!(row.contains("FUNC"));
        assert!(row.contains("GLOBAL"));
        assert!(row.ends_with("main"));
    }

    #[test]
    fn unnamed_section_row() {
        let shdr = Elf32SectionHeader {
            index: 0,
            sh_name: 0,
            sh_type: 0,
            sh_flags: 0,
            sh_addr: 0,
            sh_offset: 0,
            sh_size: 0,
            sh_link: 0,
            sh_info: 0,
            sh_addralign: 0,
            sh_entsize: 0,
        };
        let row = section_row(&shdr, None);
        assert!(row.contains("<unnamed>"));
        assert!(row.contains("NULL"));
    }
}
