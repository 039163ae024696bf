use crate::eval::network::{Linear, ValueNet};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub const CHECKPOINT_MAGIC: &[u8; 8] = b"VNETCKP1";
pub const CHECKPOINT_VERSION: u32 = 1;
// Guards allocation when a header is corrupt.
const MAX_LAYER_PARAMS: usize = 1 << 26;

// Format:
// magic: 8 bytes b"VNETCKP1"
// u32 version (LE), u32 layer count
// per layer: u32 in_dim, u32 out_dim, f32 weights[out_dim * in_dim], f32 bias[out_dim]
pub fn save<P: AsRef<Path>>(net: &ValueNet, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("create checkpoint dir: {}", dir.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create checkpoint: {}", path.display()))?;
    let mut w = BufWriter::new(f);
    w.write_all(CHECKPOINT_MAGIC)?;
    w.write_all(&CHECKPOINT_VERSION.to_le_bytes())?;
    w.write_all(&(net.layers().len() as u32).to_le_bytes())?;
    for layer in net.layers() {
        w.write_all(&(layer.in_dim as u32).to_le_bytes())?;
        w.write_all(&(layer.out_dim as u32).to_le_bytes())?;
        for v in layer.weights.iter().chain(&layer.bias) { w.write_all(&v.to_le_bytes())?; }
    }
    w.flush().with_context(|| format!("write checkpoint: {}", path.display()))?;
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<ValueNet> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open checkpoint: {}", path.display()))?;
    let mut r = BufReader::new(f);
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic).context("read magic")?;
    if &magic != CHECKPOINT_MAGIC {
        bail!("bad checkpoint magic in {}", path.display());
    }
    let version = read_u32(&mut r).context("read version")?;
    if version != CHECKPOINT_VERSION {
        bail!("unsupported checkpoint version {version}");
    }
    let count = read_u32(&mut r).context("read layer count")? as usize;
    let mut layers = Vec::with_capacity(count.min(64));
    for i in 0..count {
        let in_dim = read_u32(&mut r).with_context(|| format!("read layer {i} in_dim"))? as usize;
        let out_dim = read_u32(&mut r).with_context(|| format!("read layer {i} out_dim"))? as usize;
        if in_dim.saturating_mul(out_dim) > MAX_LAYER_PARAMS {
            bail!("layer {i} too large: {in_dim}x{out_dim}");
        }
        let weights = read_f32s(&mut r, in_dim * out_dim).with_context(|| format!("read layer {i} weights"))?;
        let bias = read_f32s(&mut r, out_dim).with_context(|| format!("read layer {i} bias"))?;
        layers.push(Linear { in_dim, out_dim, weights, bias });
    }
    let net = ValueNet::from_layers(layers).with_context(|| format!("invalid network in {}", path.display()))?;
    net.check_features().with_context(|| format!("incompatible network in {}", path.display()))?;
    Ok(net)
}

fn read_u32<R: Read>(r: &mut R) -> std::io::Result<u32> {
    let mut buf4 = [0u8; 4];
    r.read_exact(&mut buf4)?;
    Ok(u32::from_le_bytes(buf4))
}

fn read_f32s<R: Read>(r: &mut R, n: usize) -> std::io::Result<Vec<f32>> {
    let mut buf = vec![0u8; n * 4];
    r.read_exact(&mut buf)?;
    Ok(buf.chunks_exact(4).map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])).collect())
}
