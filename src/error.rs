use thiserror::Error;

/// Channel active when a decode-stream error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    Luminance,
    ChromaBlue,
    ChromaRed,
}

impl std::fmt::Display for ChannelPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChannelPhase::Luminance => "Y",
            ChannelPhase::ChromaBlue => "Cb",
            ChannelPhase::ChromaRed => "Cr",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("file I/O error: {0}")]
    FileIoError(#[from] std::io::Error),

    #[error("unsupported bitmap: compression field must be 0 (BI_RGB), got {0}")]
    UnsupportedBitmap(u32),

    #[error("not a 24-bit bitmap: expected BitCount 24, got {0}")]
    UnsupportedBitDepth(u16),

    #[error("not a BMP file: bad magic bytes")]
    BadBitmapMagic,

    #[error("unexpected end of entropy stream at bit offset {bit_offset} during {phase} phase")]
    UnexpectedEof {
        bit_offset: usize,
        phase: ChannelPhase,
    },

    #[error("no matching DC prefix found within 10 bits at bit offset {bit_offset} during {phase} phase")]
    BadPrefix {
        bit_offset: usize,
        phase: ChannelPhase,
    },

    #[error("AC symbol placement overflowed block position (p={p}) during {phase} phase")]
    OverflowPosition { p: usize, phase: ChannelPhase },

    #[error("invalid image dimensions: width and height must both be non-zero")]
    InvalidDimensions,

    #[error("invalid quality factor: must be > 0, got {0}")]
    InvalidQuality(f64),
}

pub type Result<T> = std::result::Result<T, CodecError>;
