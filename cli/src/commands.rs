use crate::cli::{CompactArgs, ExpandArgs, GroupArgs, LsArgs, PlanArgs};
use eyre::{Result, WrapErr, bail};
use frameseq::{
    DiskSource, Interval, RenumberOptions, Sequence, SequenceGrouper, compact_range, glob,
    group_sequences, plan_renames_with, split_dir,
};
use std::io::{BufRead, Write};
use std::path::Path;

fn print_sequences(sequences: &[Sequence], json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let summaries: Vec<_> = sequences.iter().map(Sequence::summary).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?;
    } else {
        for sequence in sequences {
            writeln!(out, "{sequence}")?;
        }
    }
    Ok(())
}

fn find_sequences(pattern: &str) -> Result<Vec<Sequence>> {
    let source =
        DiskSource::new(pattern).wrap_err_with(|| format!("invalid pattern \"{pattern}\""))?;
    let sequences = glob(&source).wrap_err_with(|| format!("failed to list \"{pattern}\""))?;
    if sequences.is_empty() {
        tracing::warn!("No sequence \"{pattern}\" found.");
    }
    Ok(sequences)
}

pub fn ls(args: &LsArgs, out: &mut impl Write) -> Result<()> {
    let mut found = Vec::new();
    for pattern in &args.patterns {
        found.extend(find_sequences(pattern)?);
    }
    print_sequences(&found, args.json, out)
}

pub fn group(args: &GroupArgs, out: &mut impl Write) -> Result<()> {
    let names = if args.names.is_empty() {
        std::io::stdin()
            .lock()
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .collect::<std::io::Result<Vec<_>>>()
            .wrap_err("failed to read names from stdin")?
    } else {
        args.names.clone()
    };
    tracing::debug!(count = names.len(), "grouping names");

    let sequences = SequenceGrouper::new()
        .assume_file_paths(args.paths)
        .group(&names);
    print_sequences(&sequences, args.json, out)
}

pub fn compact(args: &CompactArgs, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", compact_range(args.values.iter().copied()))?;
    Ok(())
}

pub fn expand(args: &ExpandArgs, out: &mut impl Write) -> Result<()> {
    let limit = match args.limit {
        Some(limit) => limit,
        None if args.range.is_unbounded() => {
            bail!("range \"{}\" has no end, pass --limit", args.range)
        }
        None => usize::MAX,
    };
    for value in args.range.iter().take(limit) {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

pub fn plan(args: &PlanArgs, out: &mut impl Write) -> Result<()> {
    let sequences = find_sequences(&args.source)?;
    let into_dir = Path::new(&args.destination).is_dir();
    // One counter for all sequences so their destinations don't collide.
    let mut frames = args.destination_frames.as_ref().map(Interval::iter);

    let mut table = Vec::new();
    for sequence in &sequences {
        let destination = if into_dir {
            let template = sequence.sequence_name().template;
            let base = split_dir(&template).1;
            Path::new(&args.destination)
                .join(base)
                .to_string_lossy()
                .into_owned()
        } else {
            args.destination.clone()
        };

        let options = RenumberOptions::new(destination).source_frames(args.source_frames.clone());
        let renames = plan_renames_with(sequence, &options, frames.as_mut())
            .wrap_err_with(|| format!("cannot plan renames for \"{sequence}\""))?;

        if !args.json {
            let from = group_sequences(renames.iter().map(|r| &r.source), false);
            let to = group_sequences(renames.iter().map(|r| &r.destination), false);
            if let (Some(from), Some(to)) = (from.first(), to.first()) {
                writeln!(out, "Move: {from} -> {to}")?;
            }
        }
        table.extend(renames);
    }

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&table)?)?;
    } else {
        for rename in table.iter().filter(|r| !r.is_noop()) {
            writeln!(out, "{} -> {}", rename.source, rename.destination)?;
        }
    }
    Ok(())
}
