// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SHA-256 helpers for plugin content hashes.

use std::io::Read;
use std::path::Path;

use keyhold_core::KeyholdError;
use ring::digest::{Context, SHA256, SHA256_OUTPUT_LEN};

/// Digest of a file's contents, streamed in fixed-size chunks.
pub fn sha256_file(path: &Path) -> Result<Vec<u8>, KeyholdError> {
    let io_err = |source| KeyholdError::PathResolution {
        path: path.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut context = Context::new(&SHA256);
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(io_err)?;
        if n == 0 {
            break;
        }
        context.update(&buf[..n]);
    }
    Ok(context.finish().as_ref().to_vec())
}

/// Decode a hex-encoded SHA-256 digest, checking its length.
pub fn parse_sha256_hex(value: &str) -> Result<Vec<u8>, KeyholdError> {
    let bytes = hex::decode(value.trim()).map_err(|e| KeyholdError::InvalidInput {
        field: "sha256".to_string(),
        reason: e.to_string(),
    })?;
    if bytes.len() != SHA256_OUTPUT_LEN {
        return Err(KeyholdError::InvalidInput {
            field: "sha256".to_string(),
            reason: format!("expected {SHA256_OUTPUT_LEN} bytes, got {}", bytes.len()),
        });
    }
    Ok(bytes)
}
