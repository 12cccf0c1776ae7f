//! Deep links: `?step=<index>&live=<index>`.
//!
//! Parsing never fails. Anything that is not a plain non-negative integer is
//! treated as absent, which makes the session start at the root without a
//! recording.

use reqwest::Url;
use std::borrow::Cow;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeepLink {
    /// Preorder index of the starting step.
    pub step: Option<usize>,
    /// Index into the manifest's recording list.
    pub live: Option<usize>,
}

impl DeepLink {
    /// Parse a full viewer URL or just its query (`?step=3`).
    ///
    /// ```rust
    /// use slidecast::sync::DeepLink;
    ///
    /// let link = DeepLink::parse("http://localhost:8080/index.html?step=4&live=x");
    /// assert_eq!(link.step, Some(4));
    /// assert_eq!(link.live, None);
    ///
    /// assert_eq!(DeepLink::parse("?step=-1"), DeepLink::default());
    /// ```
    pub fn parse(input: &str) -> Self {
        let url = Url::parse(input).or_else(|_| {
            let relative = input.trim_start_matches('/');
            Url::parse(&format!("http://localhost/{relative}"))
        });
        match url {
            Ok(url) => Self::from_pairs(url.query_pairs()),
            Err(e) => {
                debug!(input, error = %e, "unparseable deep link, using defaults");
                Self::default()
            }
        }
    }

    /// Parse a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        Self::parse(&format!("?{}", query.trim_start_matches('?')))
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>) -> Self {
        let mut link = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "step" => link.step = parse_index("step", &value),
                "live" => link.live = parse_index("live", &value),
                _ => {}
            }
        }
        link
    }

    /// Build from individual parameter values, e.g. command-line flags.
    pub fn from_params(step: Option<&str>, live: Option<&str>) -> Self {
        Self {
            step: step.and_then(|v| parse_index("step", v)),
            live: live.and_then(|v| parse_index("live", v)),
        }
    }

    /// Query string that reproduces this link, empty when nothing is set.
    pub fn to_query(&self) -> String {
        let params: Vec<String> = [("step", self.step), ("live", self.live)]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| format!("{k}={v}")))
            .collect();
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

fn parse_index(name: &str, value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(index) => Some(index),
        Err(_) => {
            debug!(parameter = name, value, "ignoring malformed deep-link parameter");
            None
        }
    }
}
