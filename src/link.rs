use core::{
    fmt::Debug,
    sync::atomic::{AtomicBool, Ordering},
};

use crc::{Crc, CRC_32_ISCSI};
use embassy_time::Timer;
use embedded_io_async::Write;
use log::{info, warn};

use crate::sch1::{conversion::Sch1Result, LINK_READY, SAMPLES};

/// the last blob went out without a write error
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

const LINK_RETRY_MS: u64 = 100;

static CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// 13 f32 values followed by the CRC-32
pub const RESULT_BLOB_LEN: usize = 13 * 4 + 4;

#[derive(Debug)]
pub enum LinkError<E> {
    Encode(postcard::Error),
    Write(E),
}

/// Serializes `result` into `buffer`, returns the used part.
pub fn encode_result<'b>(result: &Sch1Result, buffer: &'b mut [u8]) -> Result<&'b mut [u8], postcard::Error> {
    postcard::to_slice_crc32(result, buffer, CRC.digest())
}

pub fn decode_result(blob: &[u8]) -> Result<Sch1Result, postcard::Error> {
    postcard::from_bytes_crc32(blob, CRC.digest())
}

async fn send_result<W: Write>(
    writer: &mut W,
    buffer: &mut [u8],
    result: &Sch1Result,
) -> Result<(), LinkError<W::Error>> {
    let blob = encode_result(result, buffer).map_err(LinkError::Encode)?;
    writer.write_all(blob).await.map_err(LinkError::Write)
}

/// Sends every sample the acquisition produces to `writer`.
///
/// A failed write drops that sample and clears [`LINK_UP`], the link then
/// backs off and offers itself to the acquisition again.
pub async fn run_link<W: Write>(writer: &mut W)
where
    W::Error: Debug,
{
    let mut buffer = [0u8; RESULT_BLOB_LEN];
    info!("result link started");
    LINK_UP.store(true, Ordering::SeqCst);

    loop {
        LINK_READY.signal(());
        let result = SAMPLES.wait().await;

        match send_result(writer, &mut buffer, &result).await {
            Ok(()) => {
                if !LINK_UP.swap(true, Ordering::SeqCst) {
                    info!("result link recovered");
                }
            }
            Err(LinkError::Encode(e)) => warn!("could not encode result: {e:?}"),
            Err(LinkError::Write(e)) => {
                LINK_UP.store(false, Ordering::SeqCst);
                warn!("result link write failed: {e:?}");
                Timer::after_millis(LINK_RETRY_MS).await;
            }
        }
    }
}
