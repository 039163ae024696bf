//! Plain-text weight export consumed by the engine-side evaluator.
//!
//! Per layer: an `in,out` line, a line of every weight (row-major, output
//! neuron by output neuron) each followed by a comma, then a line of every
//! bias each followed by a comma. The file ends with one blank line.

use crate::eval::{Linear, ShapeError, ValueNet};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_PRECISION: usize = 8;

#[derive(Debug, Error)]
pub enum WeightsFormatError {
    #[error("line {line}: expected `in,out` header, found {found:?}")]
    Header { line: usize, found: String },
    #[error("line {line}: expected {expected} values, found {found}")]
    Count { line: usize, expected: usize, found: usize },
    #[error("line {line}: bad number {token:?}")]
    Number { line: usize, token: String },
    #[error("line {line}: file ends inside a layer")]
    Truncated { line: usize },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Rounds to `precision` decimal places, half-to-even on the exact binary value.
pub fn round_to(x: f64, precision: usize) -> f64 {
    if !x.is_finite() { return x; }
    format!("{:.*}", precision, x).parse().unwrap_or(x)
}

/// Shortest round-trip text of `x`, laid out the way Python's `repr(float)` does.
pub fn py_float_repr(x: f64) -> String {
    if x.is_nan() { return "nan".into(); }
    if x.is_infinite() { return if x > 0.0 { "inf".into() } else { "-inf".into() }; }
    if x == 0.0 { return if x.is_sign_negative() { "-0.0".into() } else { "0.0".into() }; }

    // `{:e}` yields the shortest digits: "-1.2345e-5".
    let sci = format!("{:e}", x);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| c.is_ascii_digit()).collect();

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        let body = if point <= 0 {
            format!("0.{}{}", "0".repeat((-point) as usize), digits)
        } else if point as usize >= digits.len() {
            format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
        } else {
            let (int, frac) = digits.split_at(point as usize);
            format!("{}.{}", int, frac)
        };
        format!("{}{}", sign, body)
    } else {
        let (lead, rest) = digits.split_at(1);
        let mant = if rest.is_empty() { lead.to_string() } else { format!("{}.{}", lead, rest) };
        let esign = if exp < 0 { '-' } else { '+' };
        format!("{}{}e{}{:02}", sign, mant, esign, exp.abs())
    }
}

fn value_line(values: &[f32], precision: usize) -> String {
    let mut line = String::with_capacity(values.len() * 12);
    for &v in values {
        line.push_str(&py_float_repr(round_to(v as f64, precision)));
        line.push(',');
    }
    line
}

pub fn write_weights_text<W: Write>(net: &ValueNet, out: &mut W, precision: usize) -> std::io::Result<()> {
    for layer in net.layers() {
        writeln!(out, "{},{}", layer.in_dim, layer.out_dim)?;
        writeln!(out, "{}", value_line(&layer.weights, precision))?;
        writeln!(out, "{}", value_line(&layer.bias, precision))?;
    }
    writeln!(out)
}

pub fn export_weights<P: AsRef<Path>>(net: &ValueNet, path: P, precision: usize) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create dir: {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create weights file: {}", path.display()))?;
    let mut w = BufWriter::new(f);
    write_weights_text(net, &mut w, precision).with_context(|| format!("write weights: {}", path.display()))?;
    w.flush()?;
    Ok(())
}

fn parse_values(line: &str, line_no: usize, expected: usize) -> Result<Vec<f32>, WeightsFormatError> {
    let values = line
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f32>().map_err(|_| WeightsFormatError::Number { line: line_no, token: t.to_string() }))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != expected {
        return Err(WeightsFormatError::Count { line: line_no, expected, found: values.len() });
    }
    Ok(values)
}

/// Parses text written by [`write_weights_text`] back into a network that
/// reads encoder feature vectors.
pub fn read_weights_text(text: &str) -> Result<ValueNet, WeightsFormatError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let mut layers = Vec::new();
    while let Some((line_no, header)) = lines.next() {
        if header.trim().is_empty() { continue; }
        let dims = header
            .split_once(',')
            .and_then(|(a, b)| Some((a.trim().parse::<usize>().ok()?, b.trim().parse::<usize>().ok()?)));
        let Some((in_dim, out_dim)) = dims else {
            return Err(WeightsFormatError::Header { line: line_no, found: header.to_string() });
        };
        let (wl, weights) = lines.next().ok_or(WeightsFormatError::Truncated { line: line_no })?;
        let weights = parse_values(weights, wl, in_dim * out_dim)?;
        let (bl, bias) = lines.next().ok_or(WeightsFormatError::Truncated { line: wl })?;
        let bias = parse_values(bias, bl, out_dim)?;
        layers.push(Linear { in_dim, out_dim, weights, bias });
    }
    let net = ValueNet::from_layers(layers)?;
    net.check_features()?;
    Ok(net)
}

pub fn import_weights<P: AsRef<Path>>(path: P) -> Result<ValueNet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read weights file: {}", path.display()))?;
    read_weights_text(&text).with_context(|| format!("parse weights file: {}", path.display()))
}
