//! Reference front-end for the `pgraph` decoder.
//!
//! Reads a message (from stdin or a file), decodes its root struct, and
//! pretty-prints the reachable pointer graph. This binary is a convenience
//! wrapper around the library's `root` and `traversal` modules, not part of
//! the crate's core contract.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pgraph::descriptor::{ElementType, ListDescriptor, StructDescriptor};
use pgraph::pointer::{self, PointerShape};
use pgraph::root::{decode_root, RootObject};

/// Default recursion-depth limit, a conservative default per the traversal
/// driver's own contract.
const DEFAULT_MAX_DEPTH: u32 = 64;

/// Default word budget: the format's hard ceiling on a single message (a
/// 30-bit word offset plus struct/list sub-fields bounds every reachable
/// object well under 2^29 words).
const DEFAULT_MAX_WORDS: u64 = 1 << 29;

#[derive(Parser)]
#[command(name = "pgraph-dump")]
#[command(about = "Decode and pretty-print a pointer-graph message")]
#[command(version)]
struct Cli {
    /// Read the message from this file instead of stdin ("-" means stdin).
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Maximum pointer-chase recursion depth before traversal fails.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Maximum total words visited across the whole message before
    /// traversal fails.
    #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
    max_words: u64,

    /// Count each shared struct or list only once, the first time it is
    /// reached, instead of printing it again at every pointer that targets it.
    #[arg(long)]
    dedupe_shared: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("pgraph-dump: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let bytes = read_input(cli.input.as_deref())?;
    anyhow::ensure!(
        (bytes.len() as u64).div_ceil(pgraph::word::WORD_BYTES as u64) <= cli.max_words,
        "input is {} words, exceeding the word budget of {}",
        (bytes.len() as u64).div_ceil(pgraph::word::WORD_BYTES as u64),
        cli.max_words
    );
    let root = decode_root(&bytes).context("failed to decode root pointer")?;

    let mut printer = Printer {
        root: &root,
        seen: if cli.dedupe_shared {
            Some(std::collections::HashSet::new())
        } else {
            None
        },
        depth_budget: cli.max_depth,
        words_budget: cli.max_words,
        words_spent: 0,
    };
    printer.dump_root()?;
    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        None | Some(_) if path.map(|p| p == std::path::Path::new("-")).unwrap_or(true) => {
            io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read message from stdin")?;
        }
        Some(p) => {
            buf = fs::read(p).with_context(|| format!("failed to read {}", p.display()))?;
        }
    }
    Ok(buf)
}

struct Printer<'a> {
    root: &'a RootObject<'a>,
    seen: Option<std::collections::HashSet<usize>>,
    depth_budget: u32,
    words_budget: u64,
    words_spent: u64,
}

impl Printer<'_> {
    fn dump_root(&mut self) -> Result<()> {
        let desc = self.root.root;
        self.dump_struct(&desc, 0)
    }

    fn charge(&mut self, words: u64) -> Result<()> {
        self.words_spent += words;
        anyhow::ensure!(
            self.words_spent <= self.words_budget,
            "word budget of {} exceeded",
            self.words_budget
        );
        Ok(())
    }

    fn mark_seen(&mut self, key: usize) -> bool {
        match &mut self.seen {
            Some(set) => set.insert(key),
            None => true,
        }
    }

    fn dump_struct(&mut self, desc: &StructDescriptor, depth: u32) -> Result<()> {
        anyhow::ensure!(
            depth <= self.depth_budget,
            "depth limit of {} exceeded",
            self.depth_budget
        );
        let indent = "  ".repeat(depth as usize);
        println!(
            "{indent}STRUCT data_words={} pointers={}",
            desc.n_data_words, desc.n_pointers
        );
        if !self.mark_seen(desc.data_start) {
            println!("{indent}  (already printed)");
            return Ok(());
        }
        self.charge(desc.total_words() as u64)?;

        let buffer = &self.root.buffer;
        for w in 0..desc.n_data_words as usize {
            let word = pgraph::accessor::struct_data_word(buffer, desc, w)
                .context("failed to read struct data word")?;
            println!("{indent}  data[{w}] = {word:016X}");
        }
        for slot in 0..desc.n_pointers as usize {
            let pointer = pgraph::accessor::struct_pointer_slot(buffer, desc, slot)
                .context("failed to read struct pointer slot")?;
            let pointer_index = desc.pointers_start() + slot;
            print!("{indent}  slot[{slot}]: ");
            self.dump_pointer(pointer.shape, pointer_index, depth + 1)?;
        }
        Ok(())
    }

    fn dump_pointer(&mut self, shape: PointerShape, pointer_index: usize, depth: u32) -> Result<()> {
        let buffer = self.root.buffer;
        match shape {
            PointerShape::Null => {
                println!("(null)");
                Ok(())
            }
            PointerShape::Struct { .. } => {
                let raw = buffer
                    .word(pointer_index)
                    .context("pointer word out of range")?;
                let decoded = pointer::decode(raw);
                println!();
                match pgraph::structptr::resolve(&buffer, pointer_index, decoded)? {
                    Some(sub) => self.dump_struct(&sub, depth),
                    None => {
                        println!("{}(null)", "  ".repeat(depth as usize));
                        Ok(())
                    }
                }
            }
            PointerShape::List { .. } => {
                let raw = buffer
                    .word(pointer_index)
                    .context("pointer word out of range")?;
                let decoded = pointer::decode(raw);
                println!();
                match pgraph::listptr::resolve(&buffer, pointer_index, decoded)? {
                    Some(sub) => self.dump_list(&sub, depth),
                    None => {
                        println!("{}(null)", "  ".repeat(depth as usize));
                        Ok(())
                    }
                }
            }
            PointerShape::Far { .. } => {
                println!("(far pointer, not followed)");
                Ok(())
            }
            PointerShape::Other { .. } => {
                println!("(reserved pointer type, not followed)");
                Ok(())
            }
        }
    }

    fn dump_list(&mut self, desc: &ListDescriptor, depth: u32) -> Result<()> {
        anyhow::ensure!(
            depth <= self.depth_budget,
            "depth limit of {} exceeded",
            self.depth_budget
        );
        let indent = "  ".repeat(depth as usize);
        let buffer = self.root.buffer;

        // Void elements occupy no storage, so there is nothing to dedupe.
        if desc.elem_type == ElementType::Void {
            println!("{indent}LIST of {} void elements", desc.n_elements);
            return Ok(());
        }

        if !self.mark_seen(desc.content_start) {
            println!("{indent}LIST (already printed)");
            return Ok(());
        }
        self.charge(desc.total_content_words() as u64)?;

        match desc.elem_type {
            ElementType::Bit => {
                print!("{indent}LIST of {} bits: ", desc.n_elements);
                for i in 0..desc.n_elements as usize {
                    let bit = pgraph::accessor::list_get_bit(&buffer, desc, i)
                        .context("failed to read bit list element")?;
                    print!("{}", if bit { '1' } else { '0' });
                }
                println!();
            }
            ElementType::Byte1 | ElementType::Byte2 | ElementType::Byte4 | ElementType::Byte8 => {
                println!("{indent}LIST of {} data elements", desc.n_elements);
                for i in 0..desc.n_elements as usize {
                    let datum = pgraph::accessor::list_get_datum(&buffer, desc, i)
                        .context("failed to read list element")?;
                    println!("{indent}  [{i}] = {datum:016X}");
                }
            }
            ElementType::Pointer => {
                println!("{indent}LIST of {} pointers", desc.n_elements);
                for i in 0..desc.n_elements as usize {
                    let pointer = pgraph::accessor::list_get_pointer(&buffer, desc, i)
                        .context("failed to read pointer list element")?;
                    let pointer_index = desc.content_start + i;
                    print!("{indent}  [{i}]: ");
                    self.dump_pointer(pointer.shape, pointer_index, depth + 1)?;
                    println!();
                }
            }
            ElementType::Composite { n_data_words, n_pointers } => {
                println!(
                    "{indent}LIST of {} composite elements (data_words={n_data_words}, pointers={n_pointers})",
                    desc.n_elements
                );
                for i in 0..desc.n_elements as usize {
                    let element = pgraph::accessor::list_get_composite_element(desc, i)
                        .context("failed to compute composite element descriptor")?;
                    self.dump_struct(&element, depth + 1)?;
                    println!();
                }
            }
            ElementType::Void => unreachable!("returned early above"),
        }
        Ok(())
    }
}
