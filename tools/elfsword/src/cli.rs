//! Command-line interface definitions for elfsword.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect 32-bit ELF object files.
#[derive(Parser)]
#[command(name = "elfsword", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Suppress diagnostics; print only the requested data and errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print mapping and index diagnostics with timings.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the ELF file header.
    Header(FileArgs),
    /// List the section headers.
    Sections(FileArgs),
    /// List the entries of a symbol table.
    Symbols(SymbolsArgs),
    /// List the program headers.
    Segments(FileArgs),
    /// Look symbols of `.symtab` up by name.
    Lookup(LookupArgs),
    /// Write the raw content of a section.
    Dump(DumpArgs),
}

/// Arguments shared by every subcommand.
#[derive(Parser)]
pub struct FileArgs {
    /// ELF file to inspect.
    pub file: PathBuf,
}

/// Arguments for the `symbols` subcommand.
#[derive(Parser)]
pub struct SymbolsArgs {
    /// ELF file to inspect.
    pub file: PathBuf,

    /// Symbol table section to list.
    #[arg(long, short = 's', default_value = elfsword_elf::SYMTAB_SECTION)]
    pub section: String,
}

/// Arguments for the `lookup` subcommand.
#[derive(Parser)]
pub struct LookupArgs {
    /// ELF file to inspect.
    pub file: PathBuf,

    /// Symbol names to resolve.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Arguments for the `dump` subcommand.
#[derive(Parser)]
pub struct DumpArgs {
    /// ELF file to inspect.
    pub file: PathBuf,

    /// Name of the section to dump.
    pub section: String,

    /// Write to this file instead of standard output.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}
