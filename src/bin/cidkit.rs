//! cidkit command line tool
//!
//! Commands:
//! - cid: Compute the CIDv1 of a file, stdin or text
//! - sha256: Hash a file, stdin or text, optionally a byte range of it
//! - base32: Encode or decode RFC 4648 Base32
//! - stat: Show file metadata
//! - get: Fetch content from an IPFS gateway
//! - upload: Upload a file to a pinning service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use cidkit::config::{parse_log_level, Config, DebugModes};
use cidkit::encoding::base32;
use cidkit::file;
use cidkit::hash;
use cidkit::ipfs::{self, IpfsAddress, IpfsClient};
use cidkit::Cid;

#[derive(Parser)]
#[command(name = "cidkit")]
#[command(about = "IPFS CIDv1 calculation, gateway retrieval and pinning-service upload", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gateway preset name or URL (overrides the configuration file)
    #[arg(long, global = true)]
    gateway: Option<String>,

    /// Pinning service preset name or URL (overrides the configuration file)
    #[arg(long, global = true)]
    pinning_service: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dump HTTP requests and responses (implies --verbose)
    #[arg(long, global = true)]
    trace_http: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the CIDv1 (raw, sha2-256) of content
    Cid {
        #[command(flatten)]
        input: Input,
    },

    /// Compute the SHA-256 digest of content
    Sha256 {
        #[command(flatten)]
        input: Input,

        /// First byte to hash
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Number of bytes to hash (default: to the end)
        #[arg(long, allow_negative_numbers = true)]
        length: Option<i64>,
    },

    /// RFC 4648 Base32
    Base32 {
        #[command(subcommand)]
        command: Base32Command,
    },

    /// Show file or directory metadata
    Stat {
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch content from the gateway
    Get {
        /// CID with optional path (ipfs://CID/path, /ipfs/CID/path or CID/path)
        address: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Create missing parent directories of the output file
        #[arg(long)]
        create_dirs: bool,

        /// Replace an existing output file
        #[arg(long)]
        overwrite: bool,

        /// Check the content against the CID (raw sha2-256 CIDs only)
        #[arg(long)]
        verify: bool,
    },

    /// Upload a file to the pinning service
    Upload {
        file: PathBuf,

        /// Name to store the file under (default: the file name)
        #[arg(long)]
        save_as: Option<String>,

        /// API token for the pinning service
        #[arg(long, env = "CIDKIT_TOKEN", hide_env_values = true)]
        token: String,
    },
}

#[derive(Subcommand)]
enum Base32Command {
    /// Encode text (or stdin) to Base32
    Encode { text: Option<String> },

    /// Decode Base32 to text
    Decode {
        text: String,

        /// Print the decoded bytes as hex
        #[arg(long)]
        hex: bool,
    },
}

#[derive(clap::Args)]
struct Input {
    /// Input file (default: stdin)
    file: Option<PathBuf>,

    /// Use this text as input instead of a file
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,
}

impl Input {
    fn read(&self) -> Result<Vec<u8>> {
        if let Some(text) = &self.text {
            return Ok(text.as_bytes().to_vec());
        }
        match &self.file {
            Some(path) => std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => read_stdin(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(gateway) = &cli.gateway {
        config.client.gateway = gateway.clone();
    }
    if let Some(service) = &cli.pinning_service {
        config.client.pinning_service = service.clone();
    }
    if cli.trace_http {
        config.debug = DebugModes::all();
    }

    let level = if cli.verbose || cli.trace_http {
        log::LevelFilter::Debug
    } else {
        parse_log_level(&config.client.log_level)
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .init();

    match &cli.command {
        Commands::Cid { input } => cmd_cid(input).await,
        Commands::Sha256 {
            input,
            offset,
            length,
        } => cmd_sha256(input, *offset, *length),
        Commands::Base32 { command } => cmd_base32(command),
        Commands::Stat { path, json } => cmd_stat(path, *json),
        Commands::Get {
            address,
            output,
            create_dirs,
            overwrite,
            verify,
        } => {
            let client = IpfsClient::from_config(&config)?;
            cmd_get(&client, address, output.as_deref(), *create_dirs, *overwrite, *verify).await
        }
        Commands::Upload {
            file,
            save_as,
            token,
        } => {
            let client = IpfsClient::from_config(&config)?;
            cmd_upload(&client, file, save_as.as_deref(), token).await
        }
    }
}

async fn cmd_cid(input: &Input) -> Result<()> {
    let cid = match (&input.file, &input.text) {
        (Some(path), None) => ipfs::calculate_cid_from_file(path)
            .await
            .with_context(|| format!("failed to compute CID of {}", path.display()))?,
        _ => ipfs::calculate_cid_from_data(input.read()?).await?,
    };
    println!("{}", cid);
    Ok(())
}

fn cmd_sha256(input: &Input, offset: i64, length: Option<i64>) -> Result<()> {
    let data = input.read()?;
    let length = length.unwrap_or((data.len() as i64).saturating_sub(offset.max(0)));
    println!("{}", hash::hash_range(&data, offset, length));
    Ok(())
}

fn cmd_base32(command: &Base32Command) -> Result<()> {
    match command {
        Base32Command::Encode { text } => {
            let data = match text {
                Some(text) => text.as_bytes().to_vec(),
                None => read_stdin()?,
            };
            println!("{}", base32::encode(&data));
        }
        Base32Command::Decode { text, hex } => {
            let text = text.trim();
            if *hex {
                let bytes = base32::decode(text).context("invalid Base32 input")?;
                println!("{}", ::hex::encode(bytes));
            } else {
                println!("{}", base32::decode_to_string(text).context("invalid Base32 input")?);
            }
        }
    }
    Ok(())
}

fn cmd_stat(path: &Path, json: bool) -> Result<()> {
    let stat = file::stat(path).with_context(|| format!("failed to stat {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stat)?);
        return Ok(());
    }

    let show = |time: Option<chrono::DateTime<chrono::Local>>| {
        time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    println!("{}", path.display());
    println!("  Type:      {}", if stat.is_directory { "directory" } else { "file" });
    println!("  Size:      {} bytes", stat.size);
    println!("  Read-only: {}", stat.is_read_only);
    println!("  Created:   {}", show(stat.creation_time));
    println!("  Accessed:  {}", show(stat.access_time));
    println!("  Modified:  {}", show(stat.modification_time));
    Ok(())
}

async fn cmd_get(
    client: &IpfsClient,
    address: &str,
    output: Option<&Path>,
    create_dirs: bool,
    overwrite: bool,
    verify: bool,
) -> Result<()> {
    let address: IpfsAddress = address.parse()?;
    log::info!("Fetching {} from {}", address, client.gateway());

    if let Some(path) = output {
        if verify {
            anyhow::bail!("--verify cannot be combined with --output");
        }
        let written = client
            .download_file(&address, path, create_dirs, overwrite)
            .await
            .with_context(|| format!("failed to download {}", address))?;
        println!("✓ Saved {} bytes to {}", written, path.display());
        return Ok(());
    }

    let data = if verify {
        if address.path.is_some() {
            anyhow::bail!("--verify needs a bare CID, got {}", address);
        }
        let cid: Cid = address.cid.parse().context("--verify needs a raw sha2-256 CIDv1")?;
        client.get_data_verified(&cid).await?
    } else {
        client.get_data(&address).await?
    };

    std::io::stdout()
        .write_all(&data)
        .context("failed to write to stdout")?;
    Ok(())
}

async fn cmd_upload(
    client: &IpfsClient,
    path: &Path,
    save_as: Option<&str>,
    token: &str,
) -> Result<()> {
    log::info!("Uploading {} to {}", path.display(), client.pinning_service());

    let outcome = client
        .upload_file(token, path, save_as)
        .await
        .with_context(|| format!("failed to upload {}", path.display()))?;

    println!("✓ Uploaded {}", path.display());
    println!("  CID: {}", outcome.cid);
    Ok(())
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut data = Vec::new();
    std::io::stdin()
        .read_to_end(&mut data)
        .context("failed to read stdin")?;
    Ok(data)
}
