//! elfsword: inspect 32-bit ELF object files.
//!
//! Every subcommand maps the file once through [`elfsword_elf::MappedElf`],
//! prints the requested data to stdout and closes the mapping. Diagnostics
//! go to stderr and follow the `-q` / `-v` flags.

mod cli;
mod report;
mod verbose;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use elfsword_elf::MappedElf;

use crate::verbose::{Timer, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    match cli.command {
        cli::Command::Header(ref args) => cmd_header(&args.file),
        cli::Command::Sections(ref args) => cmd_sections(&args.file),
        cli::Command::Symbols(ref args) => cmd_symbols(&args.file, &args.section),
        cli::Command::Segments(ref args) => cmd_segments(&args.file),
        cli::Command::Lookup(ref args) => cmd_lookup(&args.file, &args.names),
        cli::Command::Dump(ref args) => cmd_dump(args),
    }
}

/// Map `path` and report what was indexed.
fn open(path: &Path) -> Result<MappedElf> {
    let elf = {
        let _t = Timer::start("open");
        MappedElf::open(path).with_context(|| format!("failed to open {}", path.display()))?
    };
    vprintln!(
        "{}: {} bytes mapped, {} named sections",
        path.display(),
        elf.raw_data().len(),
        elf.indexed_sections()
    );
    Ok(elf)
}

fn close(elf: MappedElf, path: &Path) -> Result<()> {
    elf.close()
        .with_context(|| format!("failed to close {}", path.display()))
}

fn cmd_header(path: &Path) -> Result<()> {
    let elf = open(path)?;
    println!("{}", report::header(elf.header()));
    close(elf, path)
}

fn cmd_sections(path: &Path) -> Result<()> {
    let elf = open(path)?;
    println!("{}", report::SECTION_HEADINGS);
    for shdr in elf.sections() {
        println!("{}", report::section_row(&shdr, elf.section_name(&shdr)));
    }
    close(elf, path)
}

fn cmd_symbols(path: &Path, section: &str) -> Result<()> {
    let elf = open(path)?;
    let Some(symtab) = elf.section(section) else {
        bail!("{}: no section named {section}", path.display());
    };
    if !symtab.is_symbol_table() {
        bail!("{}: section {section} is not a symbol table", path.display());
    }

    let symbols = elf
        .symbols(&symtab)
        .with_context(|| format!("{}: failed to read {section}", path.display()))?;
    println!("{}", report::SYMBOL_HEADINGS);
    for (num, sym) in symbols.enumerate() {
        println!("{}", report::symbol_row(num, &sym, elf.symbol_name(&symtab, &sym)));
    }
    close(elf, path)
}

fn cmd_segments(path: &Path) -> Result<()> {
    let elf = open(path)?;
    match elf.program_headers() {
        Some(phdrs) => {
            println!("{}", report::SEGMENT_HEADINGS);
            for phdr in phdrs {
                println!("{}", report::segment_row(&phdr));
            }
        }
        None => dprintln!("{}: no program headers", path.display()),
    }
    close(elf, path)
}

fn cmd_lookup(path: &Path, names: &[String]) -> Result<()> {
    let elf = open(path)?;
    let mut missing = 0usize;
    {
        let _t = Timer::start("lookup");
        for name in names {
            let found = elf
                .symbol(name)
                .with_context(|| format!("{}: failed to read .symtab", path.display()))?;
            match found {
                Some(sym) => println!("{:08x} {name}", sym.st_value),
                None => {
                    dprintln!("{name}: not found");
                    missing += 1;
                }
            }
        }
    }
    if let Some(len) = elf.indexed_symbols() {
        vprintln!("symbol index holds {len} names");
    }
    close(elf, path)?;

    if missing > 0 {
        bail!("{missing} of {} symbols not found", names.len());
    }
    Ok(())
}

fn cmd_dump(args: &cli::DumpArgs) -> Result<()> {
    let path = args.file.as_path();
    let elf = open(path)?;
    let Some(shdr) = elf.section(&args.section) else {
        bail!("{}: no section named {}", path.display(), args.section);
    };
    let data = elf
        .section_data(&shdr)
        .with_context(|| format!("{}: failed to read {}", path.display(), args.section))?;

    match &args.output {
        Some(out) => {
            fs::write(out, data).with_context(|| format!("failed to write {}", out.display()))?;
            dprintln!("wrote {} bytes to {}", data.len(), out.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("failed to write to stdout")?;
            stdout.flush().context("failed to write to stdout")?;
        }
    }
    close(elf, path)
}
