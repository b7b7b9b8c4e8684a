//! Geocoding collaborator.
//!
//! Resolves a postal code or street address to coordinates through a
//! Nominatim-style HTTP search endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// A resolved geographic location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

/// Geocoding backend trait.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-form query (address or postal code) to a
    /// location. `Ok(None)` means the provider found no match.
    async fn geocode(&self, query: &str) -> Result<Option<GeoLocation>>;
}

/// One result row from a Nominatim-style search response.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: Option<SearchAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

/// HTTP geocoder against a configured base URL.
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpGeocoder {
    /// Create a new HTTP geocoder.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url).context("invalid geocoder base URL")?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("campdex/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build geocoder HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = self
            .base_url
            .join("search")
            .context("failed to build geocoder search URL")?;

        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("addressdetails", "1")
            .append_pair("limit", "1");

        if let Some(ref key) = self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }

        Ok(url)
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoLocation>> {
        let url = self.search_url(query)?;

        let results: Vec<SearchResult> = self
            .client
            .get(url)
            .send()
            .await
            .context("geocoder request failed")?
            .error_for_status()
            .context("geocoder returned an error status")?
            .json()
            .await
            .context("failed to parse geocoder response")?;

        let Some(result) = results.into_iter().next() else {
            return Ok(None);
        };

        let latitude = result
            .lat
            .parse::<f64>()
            .context("geocoder returned a non-numeric latitude")?;
        let longitude = result
            .lon
            .parse::<f64>()
            .context("geocoder returned a non-numeric longitude")?;

        let address = result.address.unwrap_or_default();

        Ok(Some(GeoLocation {
            latitude: Some(latitude),
            longitude: Some(longitude),
            formatted_address: result.display_name,
            city: address.city.or(address.town).or(address.village),
            state: address.state,
            zipcode: address.postcode,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_query_and_format() {
        let geocoder = HttpGeocoder::new("https://nominatim.example.org", None).unwrap();
        let url = geocoder.search_url("02118").unwrap();

        assert_eq!(url.path(), "/search");
        let query = url.query().unwrap();
        assert!(query.contains("q=02118"));
        assert!(query.contains("format=json"));
        assert!(!query.contains("key="));
    }

    #[test]
    fn search_url_appends_api_key_when_configured() {
        let geocoder =
            HttpGeocoder::new("https://geo.example.org", Some("abc123".to_string())).unwrap();
        let url = geocoder.search_url("02118").unwrap();

        assert!(url.query().unwrap().contains("key=abc123"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(HttpGeocoder::new("not a url", None).is_err());
    }

    #[test]
    fn search_result_parses_nominatim_shape() {
        let body = r#"[{
            "lat": "42.3396",
            "lon": "-71.0707",
            "display_name": "Boston, Suffolk County, Massachusetts, 02118, United States",
            "address": {"city": "Boston", "state": "Massachusetts", "postcode": "02118"}
        }]"#;

        let results: Vec<SearchResult> = serde_json::from_str(body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, "42.3396");
        let address = results[0].address.as_ref().unwrap();
        assert_eq!(address.city.as_deref(), Some("Boston"));
    }
}
