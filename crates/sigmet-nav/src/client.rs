//! HTTP client for the image index and neighbouring volumes

use crate::{parse_index_xml, NavConfig, NavError, NavResult};
use gloo_net::http::{Request, Response};
use sigmet_core::{DataType, ImageIndex};
use sigmet_state::VolumeState;
use wasm_bindgen_futures::spawn_local;

// ============================================================================
// NAVIGATION CLIENT
// ============================================================================

/// Client keeping the image index of the viewer state current
#[derive(Clone)]
pub struct NavClient {
    config: NavConfig,
    state: VolumeState,
}

impl NavClient {
    pub fn new(state: VolumeState) -> Self {
        Self {
            config: NavConfig::default(),
            state,
        }
    }

    pub fn with_config(state: VolumeState, config: NavConfig) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Request the index for `data_type`
    pub async fn fetch_index(&self, data_type: &DataType) -> NavResult<ImageIndex> {
        tracing::debug!("Fetching image index for {}", data_type);
        let response = Request::get(&self.config.index_url)
            .query([("data_type", data_type.as_str())])
            .send()
            .await?;
        let xml = checked(response, &self.config.index_url)?.text().await?;
        parse_index_xml(&xml, &self.config.image_root)
    }

    /// Request the SVG source of the volume at `url`
    pub async fn fetch_volume(&self, url: &str) -> NavResult<String> {
        tracing::debug!("Fetching volume {}", url);
        let response = Request::get(url).send().await?;
        Ok(checked(response, url)?.text().await?)
    }

    /// Refresh the index in the background. Failures keep the previous index.
    pub fn refresh_index(&self) {
        let Some(name) = self.state.image_name() else {
            tracing::debug!("Current URL names no data type, navigation disabled");
            return;
        };

        let client = self.clone();
        spawn_local(async move {
            match client.fetch_index(&name.data_type).await {
                Ok(index) => client.state.set_index(index),
                Err(e) => tracing::warn!("Image index refresh failed: {}", e),
            }
        });
    }
}

fn checked(response: Response, url: &str) -> NavResult<Response> {
    if response.ok() {
        Ok(response)
    } else {
        Err(NavError::Status {
            url: url.to_string(),
            status: response.status(),
        })
    }
}
