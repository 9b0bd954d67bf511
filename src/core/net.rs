// src/core/net.rs
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::{Error, Result};

pub fn client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// GET `url` with the given Accept header; non-2xx is an error.
pub fn http_get(client: &Client, url: &str, accept: &str) -> Result<String> {
    logd!("HTTP GET {url}");
    let resp = client.get(url).header(ACCEPT, accept).send()?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::Status { status: status.as_u16(), url: s!(url) });
    }
    Ok(resp.text()?)
}
