use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use md5::{Digest, Md5};
use sha2::Sha512;

///
/// Get a reader for either a gzip'd or non-gzip'd file
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Compute the md5 checksum of a file's raw bytes (compressed bytes for `.gz` files).
///
/// # Returns
/// - lowercase hex digest
pub fn md5_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file for md5: {:?}", path))?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let n = file
            .read(&mut buffer)
            .with_context(|| format!("Failed to read file for md5: {:?}", path))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Base64url encoding of the first 24 bytes of a SHA-512 digest (the refget `sha512t24u`).
pub fn sha512t24u<T: AsRef<[u8]>>(bytes: T) -> String {
    let mut hasher = Sha512::new();
    hasher.update(bytes.as_ref());
    let hash = hasher.finalize();
    base64_url::encode(&hash[0..24])
}
