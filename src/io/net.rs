use crate::{error::Result, io::progress::emit_download_progress};
use anyhow::Context;
use reqwest::blocking::Client;
use std::{
    fs,
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
    time::Duration,
};

pub fn http_client(connect_timeout_secs: u64, request_timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(request_timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("reqwest client build failed")?;
    Ok(client)
}

/// Path the body is streamed into before it replaces `dest`.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// GETs `url` into `dest` and returns the byte count.
///
/// `dest` is only touched once the whole body is on disk; on any failure the
/// staging file is removed and `dest` is left as it was.
pub fn fetch_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let tmp = part_path(dest);
    let res = stream_into(client, url, &tmp);

    match res {
        Ok(n) => {
            // rename replaces an existing file atomically except on Windows.
            #[cfg(windows)]
            if dest.exists() {
                fs::remove_file(dest).ok();
            }
            if let Err(e) = fs::rename(&tmp, dest) {
                fs::remove_file(&tmp).ok();
                return Err(e.into());
            }
            Ok(n)
        }
        Err(e) => {
            fs::remove_file(&tmp).ok();
            Err(e)
        }
    }
}

fn stream_into(client: &Client, url: &str, tmp: &Path) -> Result<u64> {
    tracing::debug!(url, "GET");
    let mut resp = client.get(url).send()?.error_for_status()?;

    let total = resp.content_length().unwrap_or(0);

    emit_download_progress(0, total);

    let mut file = File::create(tmp)?;
    let mut downloaded: u64 = 0;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = resp.read(&mut buf)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])?;
        downloaded += n as u64;
        emit_download_progress(downloaded, total);
    }
    file.flush()?;

    emit_download_progress(total.max(downloaded), total.max(downloaded));

    Ok(downloaded)
}
