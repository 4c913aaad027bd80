mod checksum;
mod cipher;
mod codec;
mod config;
mod fountain;
mod metadata;
mod packet;
mod pixels;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use codec::frames::{DirPngSink, DirPngSource};
use codec::{decode, encode, DecodedFile, EncodeInput};
use config::Config;

/// framevault — encode arbitrary files into fountain-coded video frames for
/// storage on a lossy video host, and decode them back.
#[derive(Parser)]
#[command(name = "framevault", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into a directory of lossless PNG frames.
    Encode {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the rendered frames (stands in for the
        /// video muxer, which is out of scope for this crate)
        #[arg(short, long)]
        output: PathBuf,

        /// Encrypt the file with a password
        #[arg(short, long)]
        password: Option<String>,

        /// Media type to record in the frame-0 metadata
        #[arg(long, default_value = "application/octet-stream")]
        mime: String,
    },

    /// Decode a directory of frames back into the original file.
    Decode {
        /// Input directory of rendered frames
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Decryption password (required if the file was encrypted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            input,
            output,
            password,
            mime,
        } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let name = input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("file.bin")
                .to_string();

            let cfg = Config::default();

            let encode_input = EncodeInput { name, bytes, mime };

            let mut sink = DirPngSink::new(&output, cfg.frame_width, cfg.frame_height)?;
            encode(&encode_input, password.as_deref(), &cfg, &mut sink)?;
            let dir = sink.finish()?;
            info!("encoded frames written to {}", dir.display());
        }

        Commands::Decode {
            input,
            output,
            password,
        } => {
            let cfg = Config::default();
            let mut source = DirPngSource::new(&input, cfg.frame_width, cfg.frame_height)?;
            let DecodedFile { name: _, bytes } = decode(&mut source, password.as_deref(), &cfg)?;

            std::fs::write(&output, &bytes)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("decoded file written to {}", output.display());
        }
    }

    Ok(())
}
