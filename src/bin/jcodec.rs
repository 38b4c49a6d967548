//! jcodec CLI - encode and decode BMP images with the lossy 4:2:0 codec.

use clap::{Parser, Subcommand};
use jcodec::error::{CodecError, Result};
use jcodec::{bmp, codec, quantization};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

/// Lossy BMP image codec: RGB -> YCbCr 4:2:0 -> DCT -> Huffman
#[derive(Parser)]
#[command(name = "jcodec")]
#[command(author = "jcodec contributors")]
#[command(version)]
#[command(about = "Encode and decode images with the lossy 4:2:0 block codec", long_about = None)]
#[command(after_help = "EXAMPLES:
    jcodec encode -i photo.bmp -o photo.jcd -q 85
    jcodec decode -i photo.jcd -o photo.bmp")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a 24-bit BMP into the container format
    #[command(visible_alias = "e")]
    Encode {
        /// Input BMP file
        #[arg(short, long, help = "Path to a 24-bit uncompressed BMP file")]
        input: PathBuf,

        /// Output container file
        #[arg(short, long, help = "Path for the encoded output file")]
        output: PathBuf,

        /// JPEG-style quality factor, 1-100
        #[arg(short, long, default_value_t = 85)]
        quality: u32,
    },

    /// Decode a container file back into a 24-bit BMP
    #[command(visible_alias = "d")]
    Decode {
        /// Input container file produced by `encode`
        #[arg(short, long, help = "Path to the encoded input file")]
        input: PathBuf,

        /// Output BMP file
        #[arg(short, long, help = "Path for the decoded output file")]
        output: PathBuf,
    },
}

const MAGIC: &[u8; 4] = b"JCD1";

fn write_container<W: Write>(writer: &mut W, encoded: &codec::EncodedImage, quality: u32) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_all(&(encoded.width as u32).to_le_bytes())?;
    writer.write_all(&(encoded.height as u32).to_le_bytes())?;
    writer.write_all(&(encoded.chroma_width as u32).to_le_bytes())?;
    writer.write_all(&(encoded.chroma_height as u32).to_le_bytes())?;
    writer.write_all(&quality.to_le_bytes())?;
    writer.write_all(&encoded.bytes)?;
    Ok(())
}

fn read_container<R: Read>(reader: &mut R) -> Result<(codec::EncodedImage, u32)> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(CodecError::BadBitmapMagic);
    }
    let mut buf4 = [0u8; 4];
    reader.read_exact(&mut buf4)?;
    let width = u32::from_le_bytes(buf4) as usize;
    reader.read_exact(&mut buf4)?;
    let height = u32::from_le_bytes(buf4) as usize;
    reader.read_exact(&mut buf4)?;
    let chroma_width = u32::from_le_bytes(buf4) as usize;
    reader.read_exact(&mut buf4)?;
    let chroma_height = u32::from_le_bytes(buf4) as usize;
    reader.read_exact(&mut buf4)?;
    let quality = u32::from_le_bytes(buf4);

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    Ok((
        codec::EncodedImage {
            width,
            height,
            chroma_width,
            chroma_height,
            bytes,
        },
        quality,
    ))
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Encode { input, output, quality } => {
            if quality == 0 || quality > 100 {
                return Err(CodecError::InvalidQuality(quality as f64));
            }
            let mut reader = BufReader::new(File::open(&input)?);
            let bmp = bmp::read_bmp(&mut reader)?;
            let encoded = codec::encode(&bmp.image, quantization::quality_factor(quality));
            let mut writer = BufWriter::new(File::create(&output)?);
            write_container(&mut writer, &encoded, quality)?;
            writer.flush()?;
        }
        Commands::Decode { input, output } => {
            let mut reader = BufReader::new(File::open(&input)?);
            let (encoded, quality) = read_container(&mut reader)?;
            let image = codec::decode(&encoded, quantization::quality_factor(quality))?;
            let mut writer = BufWriter::new(File::create(&output)?);
            bmp::write_bmp(&mut writer, &bmp::BmpImage::from_image(image))?;
            writer.flush()?;
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("jcodec: {err}");
        std::process::exit(1);
    }
}
