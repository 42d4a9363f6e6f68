use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Result;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, warn};

use crate::gateway::{GatewayError, SpeechGateway};

pub const SAMPLE_RATE: u32 = 24_000;

/// Pronunciations already fetched, stored as WAV files keyed by term.
pub struct AudioCache {
    base_dir: PathBuf,
}

impl AudioCache {
    pub fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, term: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.wav", Self::sanitize_key(&term.to_lowercase())))
    }

    pub fn get(&self, term: &str) -> Option<PathBuf> {
        let path = self.path_for(term);
        path.exists().then_some(path)
    }

    pub fn put(&self, term: &str, pcm: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(term);
        fs::write(&path, wav_from_pcm(pcm, SAMPLE_RATE)?)?;
        Ok(path)
    }

    fn sanitize_key(key: &str) -> String {
        key.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

/// Wrap 16-bit mono little-endian PCM in a WAV container. A trailing odd
/// byte is dropped.
pub fn wav_from_pcm(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.len()));
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for chunk in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([chunk[0], chunk[1]]))?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Fetch (or reuse) the pronunciation of `term` and return the WAV path.
pub fn pronounce(
    gateway: &dyn SpeechGateway,
    cache: &AudioCache,
    term: &str,
) -> Result<PathBuf, GatewayError> {
    if let Some(path) = cache.get(term) {
        debug!(term, "pronunciation served from cache");
        return Ok(path);
    }
    let pcm = gateway.synthesize(term)?;
    if pcm.is_empty() {
        return Err(GatewayError::EmptyResponse("audio samples"));
    }
    cache
        .put(term, &pcm)
        .map_err(|e| GatewayError::Cache(e.to_string()))
}

/// Run the external player on `path` and wait for it to exit. Blocks for
/// the length of the clip, so call it off the UI thread. Returns true when
/// the player ran and exited successfully.
pub fn play(player: &str, path: &Path) -> bool {
    let player = player.trim();
    if player.is_empty() {
        return false;
    }
    let status = Command::new(player)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => true,
        Ok(status) => {
            debug!(player, %status, "audio player exited with failure");
            false
        }
        Err(e) => {
            warn!(player, error = %e, "audio player could not be started");
            false
        }
    }
}
