//! Background update polling
//!
//! A detached thread asks the release endpoint for a newer build every ten
//! minutes and forwards hits to the event loop, which owns the consent
//! dialog. Debug builds never poll.

use std::thread;
use std::time::Duration;

use dockpane_core::{DockpaneError, DockpaneResult};
use log::{debug, info, warn};
use serde::Deserialize;
use tao::event_loop::EventLoopProxy;

use crate::UserEvent;

const UPDATE_ENDPOINT: &str = "https://releases.dockpane.app/update";
const POLL_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// A newer build advertised by the release endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInfo {
    pub name: String,
    pub url: String,
}

pub fn spawn(proxy: EventLoopProxy<UserEvent>) {
    if cfg!(debug_assertions) {
        debug!("Update polling disabled in debug builds");
        return;
    }

    thread::Builder::new()
        .name("update-poll".into())
        .spawn(move || poll_loop(proxy))
        .map(|_| ())
        .unwrap_or_else(|e| warn!("Update thread failed to start: {}", e));
}

fn poll_loop(proxy: EventLoopProxy<UserEvent>) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Update client unavailable: {}", e);
            return;
        }
    };

    loop {
        match check(&client) {
            Ok(Some(info)) => {
                info!("Update available: {}", info.name);
                if proxy.send_event(UserEvent::UpdateAvailable(info)).is_err() {
                    // Event loop is gone, stop polling
                    return;
                }
            }
            Ok(None) => debug!("No update available"),
            Err(e) => warn!("Update check failed: {}", e),
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn check(client: &reqwest::blocking::Client) -> DockpaneResult<Option<UpdateInfo>> {
    let url = format!(
        "{}/{}/{}",
        UPDATE_ENDPOINT,
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    let response = client
        .get(&url)
        .send()
        .map_err(|e| DockpaneError::update(e.to_string()))?;

    match response.status().as_u16() {
        204 => Ok(None),
        200 => response
            .json::<UpdateInfo>()
            .map(Some)
            .map_err(|e| DockpaneError::update(format!("Malformed update response: {}", e))),
        status => Err(DockpaneError::update(format!(
            "Unexpected status {} from {}",
            status, url
        ))),
    }
}
