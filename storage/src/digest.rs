/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Fixed read size for the digest pass.
pub const DIGEST_BUF_SIZE: usize = 1024;

/// The three digests computed over a finished artifact. MD5 doubles as the
/// blob's storage name; SHA-256 and SHA-512 are kept for integrity checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigests {
    pub md5: String,
    pub sha256: String,
    pub sha512: String,
}

/// Streams the file once through all three hash states.
pub async fn digest_file(path: &Path) -> std::io::Result<FileDigests> {
    let mut file = fs::File::open(path).await?;

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut sha512 = Sha512::new();

    let mut buf = [0u8; DIGEST_BUF_SIZE];
    loop {
        let read = file.read(&mut buf).await?;
        if read == 0 {
            break;
        }

        md5.update(&buf[..read]);
        sha256.update(&buf[..read]);
        sha512.update(&buf[..read]);
    }

    Ok(FileDigests {
        md5: hex::encode(md5.finalize()),
        sha256: hex::encode(sha256.finalize()),
        sha512: hex::encode(sha512.finalize()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn known_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact");
        fs::write(&path, b"ABCD").await.unwrap();

        let digests = digest_file(&path).await.unwrap();

        assert_eq!(digests.md5, "cb08ca4a7bb5f9683c19133a84872ca7");
        assert_eq!(
            digests.sha256,
            "e12e115acf4552b2568b55e93cbd39394c4ef81c82447fafc997882a02d23677"
        );
        assert_eq!(
            digests.sha512,
            "49ec55bd83fcd67838e3d385ce831669e3f815a7f44b7aa5f8d52b5d42354c46d89c8b9d06e47a797ae4fbd22291be15bcc35b07735c4a6f92357f93d5a33d9b"
        );
    }

    #[tokio::test]
    async fn matches_one_shot_hash_across_buffer_boundaries() {
        // 3000 bytes forces a full chunk, a full chunk, and a partial tail.
        let data: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact");
        fs::write(&path, &data).await.unwrap();

        let digests = digest_file(&path).await.unwrap();

        assert_eq!(digests.md5, hex::encode(Md5::digest(&data)));
        assert_eq!(digests.sha256, hex::encode(Sha256::digest(&data)));
        assert_eq!(digests.sha512, hex::encode(Sha512::digest(&data)));
    }

    #[tokio::test]
    async fn empty_file_digests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, b"").await.unwrap();

        let digests = digest_file(&path).await.unwrap();

        assert_eq!(digests.md5, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = digest_file(&dir.path().join("absent")).await;
        assert!(result.is_err());
    }
}
