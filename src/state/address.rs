use std::fmt::Display;

use color_eyre::eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use reqwest::Url;

use crate::util;

const PAGE_PARAM: &str = "page";
const CAMERA_PARAM: &str = "camera";

static BASE_ADDRESS: Lazy<Url> =
    Lazy::new(|| Url::parse("http://localhost/").expect("static base address is valid"));

/// The navigable address of the wall. Its query carries `page` and `camera`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    url: Url,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            url: BASE_ADDRESS.clone(),
        }
    }
}

impl Address {
    /// Accepts a full URL or a bare `?page=..&camera=..` query.
    pub fn parse(input: &str) -> Result<Self> {
        let url = BASE_ADDRESS
            .join(input.trim())
            .wrap_err_with(|| format!("'{input}' is not a valid address"))?;

        Ok(Self { url })
    }

    fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// `page` as a positive integer, if present and valid.
    pub fn page(&self) -> Option<usize> {
        self.param(PAGE_PARAM)
            .as_deref()
            .and_then(util::parse_positive)
    }

    /// `camera` as a positive integer, if present and valid.
    pub fn camera(&self) -> Option<usize> {
        self.param(CAMERA_PARAM)
            .as_deref()
            .and_then(util::parse_positive)
    }

    /// Replaces the query with the given view, keeping scheme, host and path.
    pub fn push(&mut self, page: usize, camera: usize) {
        self.url
            .query_pairs_mut()
            .clear()
            .append_pair(PAGE_PARAM, &page.to_string())
            .append_pair(CAMERA_PARAM, &camera.to_string());
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}
