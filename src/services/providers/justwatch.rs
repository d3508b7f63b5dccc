/// JustWatch GraphQL catalog client
///
/// Single endpoint, three request shapes: a ranked single-result title
/// search, a "set seen" mutation, and a "set in watchlist" mutation. All
/// requests carry a fixed header set built once at construction, including
/// the bearer credential and a locale-derived referer.
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, ORIGIN, REFERER,
    USER_AGENT,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    config::Config,
    error::{CatalogError, CatalogResult, ImportError},
    models::{
        CatalogMatch, GraphqlResponse, ObjectType, SearchData, SetInSeenlistData,
        SetInWatchlistData,
    },
    services::providers::CatalogClient,
};

const SEARCH_QUERY: &str = include_str!("queries/get_search_titles.graphql");
const SET_IN_WATCHLIST_MUTATION: &str = include_str!("queries/set_in_watchlist.graphql");
const SET_IN_SEENLIST_MUTATION: &str = include_str!("queries/set_in_seenlist.graphql");

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/51.0.2704.106 Safari/537.36 OPR/38.0.2220.41";

#[derive(Debug)]
pub struct JustWatchClient {
    http_client: HttpClient,
    api_url: String,
    country: String,
    language: String,
    headers: HeaderMap,
}

impl JustWatchClient {
    /// Creates a client for one import run.
    ///
    /// Fails fast on an absent credential; a token without the transport's
    /// `Bearer ` prefix is normalized here so the config can hold either
    /// form.
    pub fn new(config: &Config) -> Result<Self, ImportError> {
        let token = config.justwatch_auth_token.trim();
        if token.is_empty() {
            return Err(ImportError::Config(
                "Authorization token not found. Please set JUSTWATCH_AUTH_TOKEN.".to_string(),
            ));
        }

        let authorization = if token.starts_with("Bearer ") {
            token.to_string()
        } else {
            format!("Bearer {token}")
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authority"),
            HeaderValue::from_static("apis.justwatch.com"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ORIGIN, HeaderValue::from_static("https://www.justwatch.com"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US"));
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization).map_err(|_| {
                ImportError::Config(
                    "Authorization token contains characters not valid in a header".to_string(),
                )
            })?,
        );

        let referer = format!(
            "https://www.justwatch.com/{}/watchlist",
            config.country.to_lowercase()
        );
        let referer = HeaderValue::from_str(&referer)
            .map_err(|_| ImportError::Config(format!("Invalid country code '{}'", config.country)))?;
        headers.insert(REFERER, referer);

        Ok(Self {
            http_client: HttpClient::new(),
            api_url: config.justwatch_api_url.clone(),
            country: config.country.clone(),
            language: config.language.clone(),
            headers,
        })
    }

    /// Posts one GraphQL document and returns the raw response body.
    ///
    /// Transport failures and non-2xx statuses are the only errors raised
    /// here; decoding is left to the caller so failure logs can include the
    /// body.
    async fn execute(&self, document: &str, variables: Value) -> CatalogResult<String> {
        let payload = json!({
            "query": document,
            "variables": variables,
        });

        let response = self
            .http_client
            .post(&self.api_url)
            .headers(self.headers.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(%status, body = %body, "Catalog request failed");
            return Err(CatalogError::Status { status, body });
        }

        Ok(body)
    }

    /// Variables for the `GetSearchTitles` document.
    ///
    /// The search context expects the short language code (`en`, not
    /// `en-US`); the year bound is exact (min = max) when present.
    fn search_variables(
        &self,
        name: &str,
        object_type: ObjectType,
        release_year: Option<i32>,
    ) -> Value {
        let mut filter = json!({
            "objectTypes": [object_type],
            "excludeIrrelevantTitles": false,
            "includeTitlesWithoutUrl": true,
            "searchQuery": name,
        });
        if let Some(year) = release_year {
            filter["releaseYear"] = json!({ "min": year, "max": year });
        }

        let short_language = self.language.split('-').next().unwrap_or(&self.language);

        json!({
            "searchTitlesSortBy": "POPULAR",
            "searchTitlesFilter": filter,
            "language": short_language,
            "country": self.country,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> CatalogResult<T> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        source,
        body: body.to_string(),
    })
}

#[async_trait::async_trait]
impl CatalogClient for JustWatchClient {
    async fn resolve(
        &self,
        name: &str,
        object_type: ObjectType,
        release_year: Option<i32>,
    ) -> CatalogResult<Option<CatalogMatch>> {
        tracing::info!(
            title = %name,
            object_type = %object_type,
            year = ?release_year,
            "Searching catalog"
        );

        let variables = self.search_variables(name, object_type, release_year);
        let body = self.execute(SEARCH_QUERY, variables).await?;
        let response: GraphqlResponse<SearchData> = decode(&body)?;

        let edges = response
            .data
            .and_then(|data| data.popular_titles)
            .map(|titles| titles.edges)
            .unwrap_or_default();

        match edges.into_iter().next() {
            Some(edge) => {
                let matched = CatalogMatch::from(edge.node);
                tracing::info!(
                    title = %matched.title,
                    object_type = ?matched.object_type,
                    year = ?matched.release_year,
                    id = %matched.id,
                    "Found catalog match"
                );
                Ok(Some(matched))
            }
            None => {
                tracing::warn!(title = %name, object_type = %object_type, "No catalog results");
                Ok(None)
            }
        }
    }

    async fn mark_seen(&self, title_id: &str) -> CatalogResult<()> {
        tracing::info!(id = %title_id, "Adding title to seenlist");

        let variables = json!({
            "platform": "WEB",
            "input": {
                "id": title_id,
                "state": true,
                "country": self.country,
            },
            "country": self.country,
            // The seenlist mutation expects the full language tag
            "language": self.language,
            "watchNowFilter": {},
            "includeUnreleasedEpisodes": false,
        });

        let body = self.execute(SET_IN_SEENLIST_MUTATION, variables).await?;
        let response: GraphqlResponse<SetInSeenlistData> = decode(&body)?;

        if response
            .data
            .as_ref()
            .and_then(SetInSeenlistData::acknowledged_title)
            .is_some()
        {
            tracing::info!(id = %title_id, "Title added to seenlist");
            Ok(())
        } else {
            tracing::error!(id = %title_id, body = %body, "Seenlist mutation not acknowledged");
            Err(CatalogError::Rejected { body })
        }
    }

    async fn mark_watchlist(&self, title_id: &str) -> CatalogResult<()> {
        tracing::info!(id = %title_id, "Adding title to watchlist");

        let variables = json!({
            "input": {
                "id": title_id,
                "state": true,
            },
        });

        let body = self.execute(SET_IN_WATCHLIST_MUTATION, variables).await?;
        let response: GraphqlResponse<SetInWatchlistData> = decode(&body)?;

        if response
            .data
            .as_ref()
            .and_then(SetInWatchlistData::acknowledged_title)
            .is_some()
        {
            tracing::info!(id = %title_id, "Title added to watchlist");
            Ok(())
        } else {
            tracing::error!(id = %title_id, body = %body, "Watchlist mutation not acknowledged");
            Err(CatalogError::Rejected { body })
        }
    }
}
