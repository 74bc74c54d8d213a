//! Jira REST Client
//!
//! `IssueStore` implementation over the Jira Cloud REST API v2. Every request
//! carries basic auth (account email + API token). Non-success statuses are
//! mapped to `StoreError` variants; a search with no matches is `Ok(vec![])`.

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use jira_assistant_core::{
    CreatedIssue, CurrentUser, FieldDefinition, IssueRecord, IssueStore, NewIssue, PriorityLevel,
    StoreError, StoreResult,
};

use crate::config::JiraConfig;

const USER_AGENT: &str = concat!("jira-assistant/", env!("CARGO_PKG_VERSION"));

/// Ask search for every navigable field so custom fields such as story
/// points come back alongside the system fields.
const SEARCH_FIELDS: &[&str] = &["*navigable"];

pub struct JiraClient {
    http: reqwest::Client,
    api_base: String,
    email: String,
    api_token: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    max_results: Option<u32>,
    #[serde(default)]
    total: Option<u32>,
    #[serde(default)]
    issues: Vec<IssueRecord>,
}

impl JiraClient {
    pub fn new(config: &JiraConfig) -> StoreResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.api_base(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            page_size: config.page_size.max(1),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .basic_auth(&self.email, Some(&self.api_token))
    }

    /// Request against `/issue/{key}` plus `tail` segments. The key is
    /// percent-encoded as a single path segment.
    fn issue_request(&self, method: Method, key: &str, tail: &[&str]) -> StoreResult<RequestBuilder> {
        let url = issue_url(&self.api_base, key, tail)?;
        Ok(self
            .http
            .request(method, url)
            .basic_auth(&self.email, Some(&self.api_token)))
    }

    /// Send a request and turn transport failures and non-success statuses
    /// into `StoreError`.
    async fn send(&self, action: &str, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::network(format!("{}: {}", action, e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(action, status = status.as_u16(), body = %body, "jira request failed");
        Err(StoreError::from_status(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        action: &str,
        request: RequestBuilder,
    ) -> StoreResult<T> {
        let response = self.send(action, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::parse(format!("{}: {}", action, e)))
    }

    async fn search_page(&self, filter: &str, start_at: u32) -> StoreResult<SearchPage> {
        let body = json!({
            "jql": filter,
            "startAt": start_at,
            "maxResults": self.page_size,
            "fields": SEARCH_FIELDS,
        });
        self.send_json("search issues", self.request(Method::POST, "/search").json(&body))
            .await
    }
}

fn issue_url(api_base: &str, key: &str, tail: &[&str]) -> StoreResult<Url> {
    let mut url = Url::parse(api_base)
        .map_err(|e| StoreError::network(format!("invalid Jira URL {}: {}", api_base, e)))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::network(format!("invalid Jira URL {}", api_base)))?
        .pop_if_empty()
        .push("issue")
        .push(key)
        .extend(tail);
    Ok(url)
}

#[async_trait]
impl IssueStore for JiraClient {
    async fn search(&self, filter: &str) -> StoreResult<Vec<IssueRecord>> {
        let mut start_at = 0_u32;
        let mut issues = Vec::new();

        loop {
            let page = self.search_page(filter, start_at).await?;
            let page_len = page.issues.len() as u32;
            issues.extend(page.issues);
            start_at = start_at.saturating_add(page_len);

            debug!(page_len, fetched = issues.len(), total = ?page.total, "search page");

            // The server may cap maxResults below what was asked for, so a
            // short page only ends the search when no total was reported.
            if page_len == 0 {
                break;
            }
            match page.total {
                Some(total) if start_at >= total => break,
                Some(_) => {}
                None if page_len < page.max_results.unwrap_or(self.page_size) => break,
                None => {}
            }
        }

        info!(count = issues.len(), "search complete");
        Ok(issues)
    }

    async fn get_issue(&self, key: &str) -> StoreResult<IssueRecord> {
        self.send_json("get issue", self.issue_request(Method::GET, key, &[])?)
            .await
    }

    async fn get_schema_fields(&self) -> StoreResult<Vec<FieldDefinition>> {
        self.send_json("list fields", self.request(Method::GET, "/field"))
            .await
    }

    async fn get_priority_levels(&self) -> StoreResult<Vec<PriorityLevel>> {
        self.send_json("list priorities", self.request(Method::GET, "/priority"))
            .await
    }

    async fn create_issue(&self, issue: &NewIssue) -> StoreResult<CreatedIssue> {
        let body = json!({
            "fields": {
                "project": { "key": issue.project },
                "summary": issue.summary,
                "description": issue.description,
                "issuetype": { "name": issue.issue_type },
            }
        });
        let created: CreatedIssue = self
            .send_json("create issue", self.request(Method::POST, "/issue").json(&body))
            .await?;
        info!(key = %created.key, "issue created");
        Ok(created)
    }

    async fn update_issue_fields(&self, key: &str, fields: Map<String, Value>) -> StoreResult<()> {
        let body = json!({ "fields": fields });
        self.send(
            "update issue",
            self.issue_request(Method::PUT, key, &[])?.json(&body),
        )
        .await
        .map(|_| ())
    }

    async fn set_assignee(&self, key: &str, account_id: &str) -> StoreResult<()> {
        let body = json!({ "accountId": account_id });
        self.send(
            "assign issue",
            self.issue_request(Method::PUT, key, &["assignee"])?
                .json(&body),
        )
        .await
        .map(|_| ())
    }

    async fn get_current_user(&self) -> StoreResult<CurrentUser> {
        self.send_json("current user", self.request(Method::GET, "/myself"))
            .await
    }
}
