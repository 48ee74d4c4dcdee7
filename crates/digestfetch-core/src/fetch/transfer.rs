//! Single-stream GET of a dependency archive via libcurl.
//!
//! Body bytes go to the staging file and the SHA-256 stream in the same
//! callback, so the digest covers exactly what was written.

use super::classify;
use super::error::FetchError;
use super::FetchOptions;
use crate::digest::Sha256Stream;
use crate::storage::StagingFile;
use curl::easy::Easy;
use std::io;

const MAX_REDIRECTS: u32 = 10;

fn configure(easy: &mut Easy, url: &str, options: &FetchOptions) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.connect_timeout(options.connect_timeout)?;
    easy.timeout(options.transfer_timeout)?;
    easy.low_speed_limit(options.low_speed_limit)?;
    easy.low_speed_time(options.low_speed_time)?;
    easy.useragent(concat!("digestfetch/", env!("CARGO_PKG_VERSION")))?;
    // Needed for the progress callback, which is where cancellation is polled.
    easy.progress(true)?;
    Ok(())
}

/// Downloads `url` into `staging`, feeding every chunk to `hasher`.
/// Returns the number of body bytes received.
///
/// Blocks the current thread; run on a blocking pool from async code.
pub(crate) fn download(
    url: &str,
    options: &FetchOptions,
    staging: &mut StagingFile,
    hasher: &mut Sha256Stream,
) -> Result<u64, FetchError> {
    let mut easy = Easy::new();
    configure(&mut easy, url, options).map_err(|e| classify::from_curl(url, &e))?;

    let cancel = options.cancel.clone();
    let mut write_error: Option<io::Error> = None;

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match staging.write_chunk(data) {
                Ok(()) => {
                    hasher.update(data);
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // short write aborts the transfer
                }
            })
            .map_err(|e| classify::from_curl(url, &e))?;
        transfer
            .progress_function(|_, _, _, _| !cancel.as_ref().is_some_and(|c| c.is_cancelled()))
            .map_err(|e| classify::from_curl(url, &e))?;
        transfer.perform()
    };

    if let Err(e) = performed {
        if cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            return Err(FetchError::Cancelled);
        }
        if let Some(source) = write_error {
            return Err(FetchError::io(staging.path(), source));
        }
        return Err(classify::from_curl(url, &e).into());
    }

    // file:// transfers have no status line and report 0.
    let code = easy
        .response_code()
        .map_err(|e| classify::from_curl(url, &e))?;
    if code != 0 && !(200..300).contains(&code) {
        return Err(classify::from_status(url, code).into());
    }

    Ok(staging.bytes_written())
}
