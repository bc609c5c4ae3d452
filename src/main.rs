use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use cabpatch::Cabinet;
use clap::{command, Arg, ArgAction, ArgGroup};

fn main() -> Result<()> {
    let matches = command!()
        .max_term_width(100)
        .args(&[
            Arg::new("input")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("The input cabinet"),
            Arg::new("output")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .help(
                    "The output file, or - for stdout. Required if any modification is \
                    requested",
                ),
            Arg::new("set-id")
                .long("set-id")
                .value_name("id")
                .value_parser(parse_u16)
                .help("Set the cabinet set ID in the header"),
            Arg::new("zero-checksum")
                .long("zero-checksum")
                .action(ArgAction::SetTrue)
                .help("Clear the data block checksum"),
            Arg::new("coff-cab-start")
                .long("coff-cab-start")
                .value_name("offset")
                .value_parser(parse_u32)
                .help("Set the folder's offset of its first data block"),
            Arg::new("data-blocks")
                .long("data-blocks")
                .value_name("count")
                .value_parser(parse_u16)
                .help("Set the folder's data block count"),
            Arg::new("cb-file")
                .long("cb-file")
                .value_name("size")
                .value_parser(parse_u32)
                .help("Set the file's uncompressed size"),
            Arg::new("read-only")
                .long("read-only")
                .action(ArgAction::SetTrue)
                .help("Set the file's read-only, hidden and system attributes"),
            Arg::new("patch")
                .long("patch")
                .value_name("offset=hex")
                .value_parser(parse_patch)
                .action(ArgAction::Append)
                .help(
                    "Overwrite the serialized cabinet at <offset> with the bytes <hex>, \
                    after any field modifications",
                ),
            Arg::new("dump")
                .long("dump")
                .action(ArgAction::SetTrue)
                .help("Print the fields of the modified cabinet"),
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        ])
        .group(
            ArgGroup::new("output-flags")
                .args([
                    "set-id",
                    "zero-checksum",
                    "coff-cab-start",
                    "data-blocks",
                    "cb-file",
                    "read-only",
                    "patch",
                ])
                .multiple(true)
                .required(false)
                .requires("output"),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::builder()
        .format_target(false)
        .format_level(false)
        .filter_module("cabpatch", level)
        .init();

    let in_path = matches
        .get_one::<PathBuf>("input")
        .ok_or_else(|| anyhow!("No input file given"))?;
    let in_data = fs::read(in_path)
        .with_context(|| format!("Failed to read input file '{}'", in_path.display()))?;
    let mut cabinet = Cabinet::parse(&in_data)
        .with_context(|| format!("Failed to parse input file '{}'", in_path.display()))?;

    let Some(out_path) = matches.get_one::<PathBuf>("output") else {
        print!("{}", cabinet);
        return Ok(());
    };

    if let Some(&set_id) = matches.get_one::<u16>("set-id") {
        cabinet.set_set_id(set_id);
    }
    if matches.get_flag("zero-checksum") {
        cabinet.zero_checksum();
    }
    if let Some(&offset) = matches.get_one::<u32>("coff-cab-start") {
        cabinet.set_coff_cab_start(offset);
    }
    if let Some(&count) = matches.get_one::<u16>("data-blocks") {
        cabinet.set_data_block_count(count);
    }
    if let Some(&size) = matches.get_one::<u32>("cb-file") {
        cabinet.set_cb_file(size);
    }
    if matches.get_flag("read-only") {
        cabinet.mark_read_only();
    }

    let mut out_data = cabinet.to_bytes();
    for (offset, value) in matches
        .get_many::<(usize, Vec<u8>)>("patch")
        .unwrap_or_default()
    {
        out_data = cabpatch::patch_bytes(&out_data, *offset, value.len(), value)
            .with_context(|| format!("Failed to apply patch at offset 0x{:x}", offset))?;
    }

    let to_stdout = out_path == Path::new("-");
    if matches.get_flag("dump") {
        let modified = Cabinet::parse(&out_data)
            .with_context(|| "Modified cabinet can no longer be parsed")?;
        if to_stdout {
            eprint!("{}", modified);
        } else {
            print!("{}", modified);
        }
    }

    if to_stdout {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(&out_data)
            .and_then(|()| stdout.flush())
            .with_context(|| "Failed to write output to stdout")?;
        return Ok(());
    }
    fs::write(out_path, &out_data)
        .with_context(|| format!("Failed to write output file '{}'", out_path.display()))?;
    Ok(())
}

fn parse_number(arg: &str) -> Result<u64, String> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => arg.parse::<u64>(),
    };
    parsed.map_err(|err| format!("`{}` is not a number: {}", arg, err))
}

fn parse_u16(arg: &str) -> Result<u16, String> {
    let value = parse_number(arg)?;
    u16::try_from(value).map_err(|_| format!("`{}` does not fit in 16 bits", arg))
}

fn parse_u32(arg: &str) -> Result<u32, String> {
    let value = parse_number(arg)?;
    u32::try_from(value).map_err(|_| format!("`{}` does not fit in 32 bits", arg))
}

fn parse_patch(arg: &str) -> Result<(usize, Vec<u8>), String> {
    let Some((offset, hex)) = arg.split_once('=') else {
        return Err(format!(
            "Invalid patch: `{}`. --patch expects argument of the form: <offset>=<hex>",
            arg
        ));
    };
    let offset = usize::try_from(parse_number(offset)?)
        .map_err(|_| format!("`{}` is too large an offset", offset))?;
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        return Err(format!("`{}` is not an even number of hex digits", hex));
    }
    let value = (0..hex.len())
        .step_by(2)
        .map(|index| u8::from_str_radix(&hex[index..index + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|err| format!("`{}` is not valid hex: {}", hex, err))?;
    Ok((offset, value))
}
