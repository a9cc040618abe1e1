// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parse annotation strings, one per line, and print what was found.
//!
//!     cargo run --example tags -- annotations.txt
//!     cargo run --example tags -- --positions -a 'k1 k2:"v2"'

use fieldtags::parse::parse_tag_list_with;
use fieldtags::scan::{positions, TagPosition};
use fieldtags::settings::{Format, LENIENT_FORMAT, STRICT_FORMAT};
use clap::Parser as ClapParser;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use anyhow::{Result, Context, bail};
use tracing_subscriber::EnvFilter;


#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Print the raw scanner positions instead of the parsed tags
    #[clap(long, value_parser)]
    positions: bool,
    /// Fail on byte escapes that do not form valid UTF-8
    #[clap(long, value_parser)]
    strict: bool,
    /// Parse this annotation string (can be given multiple times)
    #[clap(short, long, value_parser)]
    annotation: Vec<String>,
    /// Path to a file with one annotation string per line
    #[clap(value_parser)]
    input_path: Option<PathBuf>,
}

fn print_positions(out: &mut impl Write, line: &str) -> Result<()> {
    for p in positions(line) {
        let TagPosition { name, colon, value } = p?;
        match colon {
            Some(colon) => writeln!(out, "  name {:?} colon {} value {:?}  {}={}",
                                    name, colon, value,
                                    &line[name.clone()], &line[value.clone()])?,
            None => writeln!(out, "  name {:?}  {}", name, &line[name.clone()])?,
        }
    }
    Ok(())
}

fn print_tags(out: &mut impl Write, line: &str, format: &Format) -> Result<()> {
    let tags = parse_tag_list_with(line, format)?;
    for tag in &tags {
        writeln!(out, "  {} = {:?}", tag.name(), tag.value())?;
        for p in tag.parameters() {
            writeln!(out, "    {} = {:?}", p.name(), p.value())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let format = if args.strict { &STRICT_FORMAT } else { &LENIENT_FORMAT };

    let mut lines: Vec<(String, String)> = args.annotation.iter().enumerate()
        .map(|(i, a)| (format!("--annotation #{}", i + 1), a.clone()))
        .collect();
    if let Some(path) = &args.input_path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {:?}", path))?;
        for (i, line) in content.lines().enumerate() {
            lines.push((format!("{:?}@{}", path, i + 1), line.to_string()));
        }
    }
    if lines.is_empty() {
        bail!("nothing to parse; give an input file or --annotation")
    }

    let mut out = BufWriter::new(stdout());
    for (location, line) in &lines {
        writeln!(out, "{}: {}", location, line)?;
        let r = if args.positions {
            print_positions(&mut out, line)
        } else {
            print_tags(&mut out, line, format)
        };
        r.with_context(|| format!("in {}", location))?;
    }
    out.flush()?;
    Ok(())
}
