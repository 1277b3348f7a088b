//! protoc-gen-tagwire - Generate tagwire message types from .proto files
//!
//! Invoked by `protoc --tagwire_out=DIR`, the plugin reads a
//! `CodeGeneratorRequest` from stdin and answers with a
//! `CodeGeneratorResponse` on stdout. It can also run offline against a
//! descriptor set produced by `protoc --descriptor_set_out`.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tagwire::Message;
use tagwire_codegen::protocol::FileDescriptorSet;
use tagwire_codegen::{generate_files, write_files, GeneratedFile, GeneratorConfig, Plugin};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Generate tagwire message types from Protocol Buffer descriptors
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-tagwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Proto file to generate from the descriptor set (repeatable; default: all)
    #[arg(long = "file", value_name = "NAME", requires = "descriptor_set")]
    files: Vec<String>,

    /// Generator parameter, as passed by `--tagwire_opt`
    #[arg(long, value_name = "STR", default_value = "", requires = "descriptor_set")]
    param: String,

    /// Output directory for generated .rs files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,

    /// Dry run - list the files that would be written
    #[arg(long)]
    dry_run: bool,
}

/// Without either flag the request is read from stdin
#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct InputMode {
    /// Read an encoded CodeGeneratorRequest from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Generate offline from an encoded FileDescriptorSet
    #[arg(long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the plugin response
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Some(ref path) = cli.input.descriptor_set {
        run_offline(&cli, path)
    } else if let Some(ref path) = cli.input.request {
        let request = fs::File::open(path)
            .with_context(|| format!("Failed to open request: {}", path.display()))?;
        run_plugin(request)
    } else {
        run_plugin(io::stdin().lock())
    }
}

/// Answer one request on stdout
fn run_plugin(input: impl io::Read) -> Result<()> {
    Plugin::new()
        .run(input, io::stdout().lock())
        .context("Plugin exchange failed")
}

/// Generate from a descriptor set and write the results under `--output`
fn run_offline(cli: &Cli, path: &Path) -> Result<()> {
    let files = generate_from_descriptor_set(path, &cli.files, &cli.param)?;

    if cli.dry_run {
        for file in &files {
            println!("Would write: {}", cli.output.join(&file.name).display());
        }
        return Ok(());
    }

    let written = write_files(&files, &cli.output, cli.force).with_context(|| {
        format!(
            "Failed to write output to {} (use --force to overwrite)",
            cli.output.display()
        )
    })?;
    for path in &written {
        println!("Wrote {}", path.display());
    }
    info!("Summary: {} file(s) written", written.len());

    Ok(())
}

fn generate_from_descriptor_set(
    path: &Path,
    files: &[String],
    param: &str,
) -> Result<Vec<GeneratedFile>> {
    let data = fs::read(path)
        .with_context(|| format!("Failed to read descriptor set: {}", path.display()))?;
    let set = FileDescriptorSet::decode(&data)
        .with_context(|| format!("Failed to decode descriptor set: {}", path.display()))?;
    debug!("Decoded {} file descriptor(s) from {}", set.file.len(), path.display());

    if set.file.is_empty() {
        bail!("Descriptor set is empty: {}", path.display());
    }

    let targets: Vec<String> = if files.is_empty() {
        set.file.iter().map(|file| file.name.clone()).collect()
    } else {
        files.to_vec()
    };

    let config = GeneratorConfig::parse(param)?;
    let generated = generate_files(&set.file, &targets, &config)
        .with_context(|| format!("Failed to generate code from {}", path.display()))?;
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagwire_codegen::protocol::field_descriptor_proto::{Label, Type};
    use tagwire_codegen::protocol::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
    use tempfile::TempDir;

    fn descriptor_set(dir: &Path) -> PathBuf {
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: "greet/hello.proto".into(),
                package: "greet".into(),
                syntax: "proto3".into(),
                message_type: vec![DescriptorProto {
                    name: "Hello".into(),
                    field: vec![FieldDescriptorProto {
                        name: "name".into(),
                        number: 1,
                        label: Label::Optional as i32,
                        r#type: Type::String as i32,
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        let path = dir.join("set.bin");
        fs::write(&path, set.encode_to_vec()).unwrap();
        path
    }

    #[test]
    fn test_generate_from_descriptor_set() {
        let temp_dir = TempDir::new().unwrap();
        let path = descriptor_set(temp_dir.path());

        let files = generate_from_descriptor_set(&path, &[], "emit_digest=false").unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["greet_hello.rs", "mod.rs"]);
        assert!(files[0].content.contains("pub struct Hello {"));
        assert!(!files[0].content.contains("descriptor digest"));

        let written = write_files(&files, &temp_dir.path().join("out"), false).unwrap();
        assert!(written[0].ends_with("out/greet_hello.rs"));
        assert!(written[1].exists());
    }

    #[test]
    fn test_descriptor_set_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = descriptor_set(temp_dir.path());

        assert!(generate_from_descriptor_set(&path, &["nope.proto".into()], "").is_err());
        assert!(generate_from_descriptor_set(&path, &[], "unknown_key").is_err());
        assert!(generate_from_descriptor_set(&temp_dir.path().join("missing.bin"), &[], "").is_err());

        let empty = temp_dir.path().join("empty.bin");
        fs::write(&empty, b"").unwrap();
        assert!(generate_from_descriptor_set(&empty, &[], "").is_err());
    }

    #[test]
    fn test_input_modes_are_exclusive() {
        assert!(Cli::try_parse_from(["protoc-gen-tagwire"]).is_ok());
        assert!(Cli::try_parse_from(["protoc-gen-tagwire", "--request", "a", "--descriptor-set", "b"]).is_err());
        assert!(Cli::try_parse_from(["protoc-gen-tagwire", "--file", "a.proto"]).is_err());

        let cli = Cli::try_parse_from([
            "protoc-gen-tagwire",
            "--descriptor-set",
            "set.bin",
            "--file",
            "a.proto",
            "--file",
            "b.proto",
            "-o",
            "out",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.files, ["a.proto", "b.proto"]);
        assert_eq!(cli.output, Path::new("out"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
