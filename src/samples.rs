use crate::encoder::{FeatureVector, PACKED_PLANES};
use anyhow::{bail, Context, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Training pair: game result from white's point of view (-1, 0, +1) and the
/// encoded position.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSample {
    pub result: i8,
    pub features: FeatureVector,
}

impl LabeledSample {
    pub fn new(result: i8, features: FeatureVector) -> Self { Self { result, features } }

    pub fn target(&self) -> f32 { self.result as f32 }
}

pub const SHARD_MAGIC: &[u8; 8] = b"VNSMP001";
// result (i8), side to move (u8), packed plane bits
pub const RECORD_SIZE: usize = 1 + 1 + PACKED_PLANES;

pub fn write_shards<P: AsRef<Path>>(samples: &[LabeledSample], out_dir: P, max_records_per_shard: usize) -> Result<Vec<PathBuf>> {
    let out_dir = out_dir.as_ref();
    create_dir_all(out_dir).with_context(|| format!("create shard dir: {}", out_dir.display()))?;
    let first_index = next_shard_index(out_dir)?;
    let per_shard = max_records_per_shard.max(1);
    let mut out_paths = Vec::new();
    for (i, chunk) in samples.chunks(per_shard).enumerate() {
        let path = out_dir.join(format!("shard_{:06}.bin", first_index + i));
        let mut w = BufWriter::new(File::create(&path).with_context(|| format!("create shard: {}", path.display()))?);
        w.write_all(SHARD_MAGIC)?;
        for s in chunk {
            let (bits, side) = s.features.to_bits();
            let mut buf = [0u8; RECORD_SIZE];
            buf[0] = s.result as u8;
            buf[1] = side;
            buf[2..].copy_from_slice(&bits);
            w.write_all(&buf)?;
        }
        w.flush()?;
        out_paths.push(path);
    }
    Ok(out_paths)
}

pub fn read_shard<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledSample>> {
    let path = path.as_ref();
    let mut f = BufReader::new(File::open(path).with_context(|| format!("open shard: {}", path.display()))?);
    let mut magic = [0u8; 8];
    f.read_exact(&mut magic).context("read shard magic")?;
    if &magic != SHARD_MAGIC { bail!("bad shard magic in {}", path.display()); }
    let mut body = Vec::new();
    f.read_to_end(&mut body).with_context(|| format!("read shard: {}", path.display()))?;
    if body.len() % RECORD_SIZE != 0 {
        bail!("truncated shard {}: {} trailing bytes after {} records", path.display(), body.len() % RECORD_SIZE, body.len() / RECORD_SIZE);
    }
    let mut recs = Vec::with_capacity(body.len() / RECORD_SIZE);
    for rec in body.chunks_exact(RECORD_SIZE) {
        let mut bits = [0u8; PACKED_PLANES];
        bits.copy_from_slice(&rec[2..]);
        recs.push(LabeledSample::new(rec[0] as i8, FeatureVector::from_bits(&bits, rec[1])));
    }
    Ok(recs)
}

/// Shard files of `dir` in name order.
pub fn shard_paths<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("list shard dir: {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.file_name().and_then(|n| n.to_str()).map_or(false, |n| n.starts_with("shard_") && n.ends_with(".bin")))
        .collect();
    paths.sort();
    Ok(paths)
}

pub fn read_shards_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<LabeledSample>> {
    let mut all = Vec::new();
    for p in shard_paths(dir)? { all.extend(read_shard(&p)?); }
    Ok(all)
}

// Continue numbering after existing shards so repeated dumps do not overwrite.
fn next_shard_index(dir: &Path) -> Result<usize> {
    let next = shard_paths(dir)?.iter()
        .filter_map(|p| p.file_stem()?.to_str()?.strip_prefix("shard_")?.parse::<usize>().ok())
        .max()
        .map_or(0, |i| i + 1);
    Ok(next)
}
