use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use respack::{
    EmbeddedResource, Manifest, PackOptions, PixelBuffer, ResourceRegistry,
    pack::{PackInput, ResourceKind, sanitize_identifier},
};

#[derive(Parser, Debug)]
#[command(name = "respack", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack images and files into a generated header.
    Pack(PackArgs),
    /// List the resources of a generated header.
    List(ListArgs),
    /// Reconstruct every resource of a generated header.
    Verify(VerifyArgs),
    /// Write one reconstructed resource to disk.
    Unpack(UnpackArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input files. PNGs are decoded to pixels, anything else is packed as-is.
    files: Vec<PathBuf>,

    /// Output header path. Required unless a manifest supplies one.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// JSON batch description.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Compress each payload with zlib.
    #[arg(long)]
    compress: bool,

    /// Base64-encode each payload.
    #[arg(long)]
    encode: bool,

    /// Skip the batch when the output is newer than every input.
    #[arg(long)]
    update_only: bool,

    /// Largest literal in encoded bytes.
    #[arg(long)]
    section_ceiling: Option<usize>,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Generated header.
    header: PathBuf,
}

#[derive(Parser, Debug)]
struct VerifyArgs {
    /// Generated header.
    header: PathBuf,

    /// Directory holding the original inputs; each resource is compared with its source.
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct UnpackArgs {
    /// Generated header.
    header: PathBuf,

    /// Resource name.
    name: String,

    /// Output path. Images are written as PNG.
    #[arg(short, long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::List(args) => cmd_list(args),
        Command::Verify(args) => cmd_verify(args),
        Command::Unpack(args) => cmd_unpack(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let (mut opts, mut inputs, manifest_out) = match &args.manifest {
        Some(path) => {
            let m = Manifest::load(path)
                .with_context(|| format!("load manifest '{}'", path.display()))?;
            (m.options, m.inputs, Some(m.output))
        }
        None => (PackOptions::default(), Vec::new(), None),
    };
    inputs.extend(args.files.iter().map(PackInput::new));

    opts.compress |= args.compress;
    opts.encode |= args.encode;
    opts.update_only |= args.update_only;
    if let Some(ceiling) = args.section_ceiling {
        opts.section_ceiling = ceiling;
    }

    let out = args
        .out
        .or(manifest_out)
        .context("no output path: pass -o or a manifest with \"output\"")?;
    if inputs.is_empty() {
        anyhow::bail!("nothing to pack");
    }

    let report = respack::write_batch(&inputs, &opts, &out)?;
    if report.up_to_date {
        eprintln!("{} is up to date", out.display());
        return Ok(());
    }

    eprintln!(
        "wrote {} ({} resources, {})",
        out.display(),
        report.records.len(),
        opts.stages()
    );
    if !report.is_success() {
        for f in &report.failures {
            eprintln!("  failed {} ({}): {}", f.name, f.path.display(), f.error);
        }
        anyhow::bail!("{} of {} inputs failed", report.failures.len(), inputs.len());
    }
    Ok(())
}

fn read_registry(path: &Path) -> anyhow::Result<ResourceRegistry> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read header '{}'", path.display()))?;
    let registry = ResourceRegistry::from_header(&text)
        .with_context(|| format!("parse header '{}'", path.display()))?;
    Ok(registry)
}

fn describe(res: &EmbeddedResource) -> String {
    match res.kind {
        ResourceKind::Image {
            width,
            height,
            channels,
        } => format!("image {width}x{height}x{channels}"),
        ResourceKind::File { content } => format!("{} file", content.as_str()),
    }
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let registry = read_registry(&args.header)?;
    for res in registry.iter() {
        println!(
            "{}\t{}\t{} -> {} bytes",
            res.name,
            describe(res),
            res.encoded.len(),
            res.raw_length
        );
    }
    Ok(())
}

fn cmd_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let registry = read_registry(&args.header)?;
    let mut bad = 0usize;

    for res in registry.iter() {
        let outcome = res
            .decode()
            .map_err(anyhow::Error::from)
            .and_then(|raw| match &args.input {
                Some(dir) => compare_with_source(dir, res, &raw),
                None => Ok(()),
            });
        match outcome {
            Ok(()) => println!("ok\t{}", res.name),
            Err(err) => {
                bad += 1;
                println!("FAIL\t{}\t{err:#}", res.name);
            }
        }
    }

    if bad > 0 {
        anyhow::bail!("{bad} of {} resources failed verification", registry.len());
    }
    Ok(())
}

fn compare_with_source(dir: &Path, res: &EmbeddedResource, raw: &[u8]) -> anyhow::Result<()> {
    let source = find_source(dir, &res.name)?;
    let expected = match res.kind {
        ResourceKind::Image { .. } => respack::assets::decode(&source)?.into_bytes(),
        ResourceKind::File { .. } => std::fs::read(&source)
            .with_context(|| format!("read source '{}'", source.display()))?,
    };
    if expected != raw {
        anyhow::bail!("content differs from '{}'", source.display());
    }
    Ok(())
}

/// The input whose file stem maps to `name`.
fn find_source(dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read input dir '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let stem = path
            .file_stem()
            .map(|s| sanitize_identifier(&s.to_string_lossy()));
        if path.is_file() && stem.as_deref() == Some(name) {
            return Ok(path);
        }
    }
    anyhow::bail!("no source for '{name}' in '{}'", dir.display())
}

fn cmd_unpack(args: UnpackArgs) -> anyhow::Result<()> {
    let registry = read_registry(&args.header)?;
    let res = registry
        .get(&args.name)
        .with_context(|| format!("no resource named '{}'", args.name))?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    match res.layout() {
        Some(layout) => {
            let buf = PixelBuffer::new(layout.width, layout.height, layout.channels, res.decode()?)?;
            respack::assets::encode(&args.out, &buf)?;
        }
        None => std::fs::write(&args.out, res.decode()?)
            .with_context(|| format!("write '{}'", args.out.display()))?,
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
