/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use tokio_util::sync::CancellationToken;

/// Fixed read size for the transfer loop.
pub const CHUNK_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Read(#[from] std::io::Error),
    #[error("client disconnected")]
    Disconnected,
    #[error("blob length changed during transfer: sent {sent} of {expected} bytes")]
    LengthMismatch { sent: u64, expected: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Every byte up to the announced length was accepted by the sink.
    Completed,
    /// The receiver went away; the transfer stopped without further writes.
    Aborted,
}

/// Receiving side of a blob transfer.
///
/// Invariant: the offset reported by `writable` must equal the total number
/// of bytes the sink has taken through `try_write`; the transfer loop uses
/// it to slice the unacknowledged remainder of its in-memory chunk.
#[async_trait]
pub trait ChunkSink {
    /// Offers bytes to the sink; returns how many were taken, which may be
    /// zero or a partial count when the sink's buffer is full.
    async fn try_write(&mut self, chunk: &[u8]) -> Result<usize, TransferError>;

    /// Suspends until the sink can take more bytes; returns the sink's total
    /// acknowledged offset.
    async fn writable(&mut self) -> Result<u64, TransferError>;
}

/// Pumps a blob through a sink with cooperative flow control.
///
/// The loop reads fixed-size chunks and offers each to the sink. When the
/// sink stalls, the file position after the current chunk is recorded and no
/// further reads happen until the sink reports progress; the unacknowledged
/// slice of the in-memory chunk is then re-offered, so every byte is sent
/// exactly once and in order across any number of pause/resume cycles.
/// Cancellation is checked before every read and before every wait.
pub async fn send_blob<R, S>(
    reader: &mut R,
    total: u64,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Result<TransferOutcome, TransferError>
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
    S: ChunkSink + Send,
{
    let mut buf = [0u8; CHUNK_SIZE];
    let mut transmitted: u64 = 0;

    loop {
        if cancel.is_cancelled() {
            return Ok(TransferOutcome::Aborted);
        }

        let read = reader.read(&mut buf).await?;
        if read == 0 {
            if transmitted == total {
                return Ok(TransferOutcome::Completed);
            }

            return Err(TransferError::LengthMismatch {
                sent: transmitted,
                expected: total,
            });
        }

        let resume_position = reader.stream_position().await?;
        let chunk_start = transmitted;
        let mut offset = 0usize;

        while offset < read {
            let accepted = match sink.try_write(&buf[offset..read]).await {
                Ok(accepted) => accepted,
                Err(TransferError::Disconnected) => return Ok(TransferOutcome::Aborted),
                Err(e) => return Err(e),
            };
            transmitted += accepted as u64;
            offset += accepted;

            if offset == read {
                break;
            }

            if cancel.is_cancelled() {
                return Ok(TransferOutcome::Aborted);
            }

            let acknowledged = match sink.writable().await {
                Ok(acknowledged) => acknowledged,
                Err(TransferError::Disconnected) => return Ok(TransferOutcome::Aborted),
                Err(e) => return Err(e),
            };

            offset = usize::try_from(acknowledged.saturating_sub(chunk_start))
                .unwrap_or(read)
                .min(read);
            transmitted = chunk_start + offset as u64;
        }

        if transmitted == total {
            return Ok(TransferOutcome::Completed);
        }

        if transmitted > total {
            return Err(TransferError::LengthMismatch {
                sent: transmitted,
                expected: total,
            });
        }

        reader.seek(std::io::SeekFrom::Start(resume_position)).await?;
    }
}
