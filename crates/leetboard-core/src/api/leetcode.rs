//! LeetCode catalog client (GraphQL, consumed only)
//!
//! Every operation goes through one executor that posts `{query, variables}`
//! and unwraps the GraphQL envelope. The catalog exposes the same question
//! under several response shapes with inconsistent field names, so raw rows
//! deserialize into an all-optional schema and pass through [`normalize`],
//! which owns the precedence rules.

use super::{bad_body, bad_status, connectivity};
use crate::error::CoreError;
use crate::models::{Difficulty, ProblemDraft};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Public GraphQL endpoint; override via config for mirrors/proxies
pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://leetcode.com/graphql";

const SERVICE: &str = "catalog";

/// Page size for keyword search
const SEARCH_LIMIT: u32 = 50;

const QUESTION_QUERY: &str = r#"
query questionDetail($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    questionFrontendId
    title
    titleSlug
    difficulty
    topicTags { name }
  }
}"#;

const SEARCH_QUERY: &str = r#"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList(categorySlug: $categorySlug, limit: $limit, skip: $skip, filters: $filters) {
    questions: data {
      frontendQuestionId
      title
      titleSlug
      difficulty
      topicTags { name }
    }
  }
}"#;

const DAILY_QUERY: &str = r#"
query questionOfToday {
  activeDailyCodingChallengeQuestion {
    date
    question {
      questionFrontendId
      title
      titleSlug
      difficulty
      topicTags { name }
    }
  }
}"#;

const RANDOM_QUERY: &str = r#"
query randomQuestion($categorySlug: String, $filters: QuestionListFilterInput) {
  randomQuestion(categorySlug: $categorySlug, filters: $filters) {
    titleSlug
  }
}"#;

/// One catalog problem after normalization
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProblem {
    pub leetcode_id: u32,
    pub title: String,
    pub title_slug: Option<String>,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
}

impl CatalogProblem {
    /// Draft for importing this catalog problem into the store
    pub fn into_draft(self) -> ProblemDraft {
        ProblemDraft {
            leetcode_id: Some(self.leetcode_id),
            title: Some(self.title),
            title_slug: self.title_slug,
            difficulty: Some(self.difficulty),
            tags: (!self.tags.is_empty()).then_some(self.tags),
            ..Default::default()
        }
    }
}

/// Raw question row; every field optional because the shapes differ per query
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawQuestion {
    question_id: Option<String>,
    question_frontend_id: Option<String>,
    frontend_question_id: Option<String>,
    title: Option<String>,
    title_slug: Option<String>,
    difficulty: Option<String>,
    topic_tags: Option<Vec<RawTopicTag>>,
}

#[derive(Debug, Deserialize)]
struct RawTopicTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    problemset_question_list: Option<QuestionPage>,
}

#[derive(Debug, Deserialize)]
struct QuestionPage {
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyData {
    active_daily_coding_challenge_question: Option<DailyChallenge>,
}

#[derive(Debug, Deserialize)]
struct DailyChallenge {
    question: Option<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RandomData {
    random_question: Option<RandomQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RandomQuestion {
    title_slug: Option<String>,
}

/// GraphQL client for the problem catalog
pub struct CatalogClient {
    endpoint: String,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Full question record by slug
    pub async fn by_slug(&self, slug: &str) -> Result<CatalogProblem, CoreError> {
        let data = self
            .execute(QUESTION_QUERY, json!({ "titleSlug": slug }))
            .await?;
        parse_question(data, slug)
    }

    /// Question by numeric catalog id.
    ///
    /// The catalog has no id lookup, so this searches with the id as keyword
    /// and keeps the row whose normalized id matches exactly.
    pub async fn by_id(&self, id: u32) -> Result<CatalogProblem, CoreError> {
        let found = self.search(&id.to_string(), None, &[]).await?;

        found
            .into_iter()
            .find(|p| p.leetcode_id == id)
            .ok_or_else(|| CoreError::ExternalApi {
                service: SERVICE,
                message: format!("No catalog problem with id {}", id),
            })
    }

    /// Today's daily challenge
    pub async fn daily(&self) -> Result<CatalogProblem, CoreError> {
        let data = self.execute(DAILY_QUERY, json!({})).await?;

        let parsed: DailyData = serde_json::from_value(data).map_err(|e| bad_body(SERVICE, e))?;
        parsed
            .active_daily_coding_challenge_question
            .and_then(|c| c.question)
            .and_then(normalize)
            .ok_or_else(|| CoreError::ExternalApi {
                service: SERVICE,
                message: "No daily challenge in response".to_string(),
            })
    }

    /// Keyword search with optional difficulty/tag filters
    pub async fn search(
        &self,
        keyword: &str,
        difficulty: Option<Difficulty>,
        tags: &[String],
    ) -> Result<Vec<CatalogProblem>, CoreError> {
        let variables = json!({
            "categorySlug": "",
            "limit": SEARCH_LIMIT,
            "skip": 0,
            "filters": filters(Some(keyword), difficulty, tags),
        });

        let data = self.execute(SEARCH_QUERY, variables).await?;
        parse_search(data)
    }

    /// Random problem, optionally constrained by difficulty/tags.
    /// The random endpoint only yields a slug; the full record needs a
    /// second fetch.
    pub async fn random(
        &self,
        difficulty: Option<Difficulty>,
        tags: &[String],
    ) -> Result<CatalogProblem, CoreError> {
        let variables = json!({
            "categorySlug": "",
            "filters": filters(None, difficulty, tags),
        });

        let data = self.execute(RANDOM_QUERY, variables).await?;
        let parsed: RandomData = serde_json::from_value(data).map_err(|e| bad_body(SERVICE, e))?;

        let slug = parsed
            .random_question
            .and_then(|q| q.title_slug)
            .ok_or_else(|| CoreError::ExternalApi {
                service: SERVICE,
                message: "Random pick returned no slug".to_string(),
            })?;

        self.by_slug(&slug).await
    }

    /// Post one GraphQL operation and unwrap the envelope
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, CoreError> {
        debug!(endpoint = %self.endpoint, "Catalog query");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| connectivity(SERVICE, &self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(bad_status(SERVICE, status));
        }

        let envelope: Envelope = response.json().await.map_err(|e| bad_body(SERVICE, e))?;

        if let Some(errors) = envelope.errors {
            if !errors.is_empty() {
                let joined = errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(CoreError::ExternalApi {
                    service: SERVICE,
                    message: joined,
                });
            }
        }

        envelope.data.ok_or_else(|| CoreError::ExternalApi {
            service: SERVICE,
            message: "Empty response".to_string(),
        })
    }
}

fn filters(keyword: Option<&str>, difficulty: Option<Difficulty>, tags: &[String]) -> Value {
    let mut f = serde_json::Map::new();
    if let Some(k) = keyword {
        f.insert("searchKeywords".to_string(), json!(k));
    }
    if let Some(d) = difficulty {
        // The filter input wants the difficulty uppercased
        f.insert("difficulty".to_string(), json!(d.as_str().to_uppercase()));
    }
    if !tags.is_empty() {
        f.insert("tags".to_string(), json!(tags));
    }
    Value::Object(f)
}

fn parse_question(data: Value, slug: &str) -> Result<CatalogProblem, CoreError> {
    let parsed: QuestionData = serde_json::from_value(data).map_err(|e| bad_body(SERVICE, e))?;

    parsed
        .question
        .and_then(normalize)
        .ok_or_else(|| CoreError::ExternalApi {
            service: SERVICE,
            message: format!("No catalog problem with slug '{}'", slug),
        })
}

fn parse_search(data: Value) -> Result<Vec<CatalogProblem>, CoreError> {
    let parsed: SearchData = serde_json::from_value(data).map_err(|e| bad_body(SERVICE, e))?;

    Ok(parsed
        .problemset_question_list
        .map(|page| page.questions.into_iter().filter_map(normalize).collect())
        .unwrap_or_default())
}

/// Collapse a raw row into a [`CatalogProblem`].
///
/// Precedence per field:
/// - id: first numeric parse among `questionFrontendId`,
///   `frontendQuestionId`, `questionId`, in that order; 0 when none parse.
/// - difficulty: parsed case-insensitively, anything unknown is `Medium`.
/// - title is required; a row without one is dropped.
fn normalize(raw: RawQuestion) -> Option<CatalogProblem> {
    let title = raw.title.filter(|t| !t.is_empty())?;

    let leetcode_id = [
        raw.question_frontend_id,
        raw.frontend_question_id,
        raw.question_id,
    ]
    .into_iter()
    .flatten()
    .find_map(|s| s.parse::<u32>().ok())
    .unwrap_or(0);

    let difficulty = raw
        .difficulty
        .and_then(|d| d.parse::<Difficulty>().ok())
        .unwrap_or_default();

    let tags = raw
        .topic_tags
        .map(|tags| tags.into_iter().map(|t| t.name).collect())
        .unwrap_or_default();

    Some(CatalogProblem {
        leetcode_id,
        title,
        title_slug: raw.title_slug,
        difficulty,
        tags,
    })
}
