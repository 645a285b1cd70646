use clap::Parser;
use rustchip_core::tlv::{count, find, iterate, Tag, TlvReader};
use rustchip_core::DecodeError;
use rustchip_tools::{format_element, parse_hex_bytes, parse_tag};
use std::ops::ControlFlow;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chip-tlvdump")]
struct Args {
    /// TLV document as hex text.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    hex: Option<String>,
    /// File holding the document as hex text; `#` lines are ignored.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Descend into containers.
    #[arg(long)]
    recurse: bool,
    /// Print only the number of visited elements.
    #[arg(long, conflicts_with = "find")]
    count: bool,
    /// Print the first element carrying this tag.
    #[arg(long, value_parser = parse_tag)]
    find: Option<Tag>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let text = match (args.hex, &args.file) {
        (Some(hex), _) => hex,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err("one of --hex or --file is required".into()),
    };
    let bytes = match parse_hex_bytes(&text) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("invalid input: {e}");
            std::process::exit(1);
        }
    };
    log::debug!("decoding {} bytes, recurse={}", bytes.len(), args.recurse);
    let reader = TlvReader::new(&bytes);

    if args.count {
        match count(&reader, args.recurse) {
            Ok(n) => println!("{n}"),
            Err(e) => {
                eprintln!("decode failed: {e}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    if let Some(tag) = args.find {
        match find(&reader, tag, args.recurse) {
            Ok(Some(found)) => println!("{}", format_element(&found.current()?)?),
            Ok(None) => {
                eprintln!("no element tagged {tag}");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("decode failed: {e}");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let mut visitor = |r: &TlvReader<'_>, depth: usize| -> Result<ControlFlow<()>, DecodeError> {
        let line = format_element(&r.current()?)?;
        println!("{:indent$}{line}", "", indent = depth * 2);
        Ok(ControlFlow::Continue(()))
    };
    if let Err(e) = iterate(&reader, &mut visitor, args.recurse) {
        eprintln!("decode failed: {e}");
        std::process::exit(1);
    }
    Ok(())
}
