//! Blocking HTTP client for an INSPIRE-style key registry
//!
//! One GET per query, `recjson`-shaped response: a JSON array of matched
//! records, each carrying `system_control_number` entries whose
//! `SPIRESTeX`/`INSPIRETeX` value is the canonical citation key. More than
//! one matched record is reported as ambiguous, never resolved by picking
//! one.

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::resolve::{KeyLookup, LookupOutcome, LookupQuery};

/// Default registry endpoint
pub const DEFAULT_REGISTRY_URL: &str = "http://old.inspirehep.net/search";

const KEY_TAG: &str = "system_control_number";
const KEY_INSTITUTES: [&str; 2] = ["SPIRESTeX", "INSPIRETeX"];

/// A canonical-key registry reached over HTTP
#[derive(Debug)]
pub struct HttpRegistry {
    base: Url,
    client: reqwest::blocking::Client,
}

impl HttpRegistry {
    /// Create a client for the given registry endpoint
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| Error::Registry(e.to_string()))?;
        Ok(Self {
            base,
            client: reqwest::blocking::Client::new(),
        })
    }

    fn query(&self, pattern: &str) -> Result<Vec<RegistryRecord>> {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("p", pattern)
            .append_pair("of", "recjson")
            .append_pair("ot", KEY_TAG);

        self.client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| Error::Registry(e.to_string()))?
            .json()
            .map_err(|e| Error::Registry(e.to_string()))
    }
}

impl KeyLookup for HttpRegistry {
    fn lookup(&self, query: &LookupQuery) -> Result<LookupOutcome> {
        let matches = self.query(&search_pattern(query))?;
        if matches.len() > 1 {
            return Ok(LookupOutcome::Ambiguous);
        }
        let Some(record) = matches.first() else {
            return Ok(LookupOutcome::NotFound);
        };
        Ok(record
            .citation_key()
            .map_or(LookupOutcome::NotFound, LookupOutcome::Unique))
    }
}

/// Registry search syntax for each query kind
fn search_pattern(query: &LookupQuery) -> String {
    match query {
        LookupQuery::Doi(doi) => format!("find doi \"{doi}\""),
        LookupQuery::Eprint(eprint) => format!("find eprint \"{eprint}\""),
        LookupQuery::Title(title) => format!("find title \"{title}\""),
        LookupQuery::Author(author) => format!("find author \"{author}\""),
    }
}

/// One matched registry record
#[derive(Debug, Deserialize)]
struct RegistryRecord {
    #[serde(rename = "system_control_number", default)]
    control_numbers: OneOrMany,
}

impl RegistryRecord {
    /// The first control number issued by a TeX-key institute
    fn citation_key(&self) -> Option<String> {
        self.control_numbers
            .as_slice()
            .iter()
            .find(|cn| KEY_INSTITUTES.contains(&cn.institute.as_str()))
            .map(|cn| cn.value.clone())
    }
}

/// A record holds either one control number or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(ControlNumber),
    Many(Vec<ControlNumber>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl OneOrMany {
    fn as_slice(&self) -> &[ControlNumber] {
        match self {
            Self::One(cn) => std::slice::from_ref(cn),
            Self::Many(cns) => cns,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ControlNumber {
    #[serde(default)]
    institute: String,
    #[serde(default)]
    value: String,
}
