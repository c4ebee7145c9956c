pub mod parse;
pub mod prompts;

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use crate::llm::TextCompletion;
use crate::models::{PredictionRecord, ScoutList};
use crate::search::WebSearch;
use crate::session::SessionState;

/// Substituted in-band for a failed search; retrieval never aborts the run.
pub const SEARCH_FAILURE_MARKER: &str = "[web search unavailable for this query]";

const PLANNER_TEMPERATURE: f32 = 0.0;
const SINGLE_TEMPERATURE: f32 = 0.1;
const LIST_TEMPERATURE: f32 = 0.2;

/// Snippets fetched per planned query.
const SINGLE_RESULTS_PER_QUERY: usize = 3;
const LIST_RESULTS_PER_QUERY: usize = 10;

#[derive(Debug, Clone, Copy)]
enum Mode {
    Single,
    List,
}

/// The plan → retrieve → generate pipeline. Holds the two tool boundaries;
/// every run goes to completion sequentially, no spawning, no retries.
pub struct MatchAgent {
    llm: Arc<dyn TextCompletion>,
    search: Arc<dyn WebSearch>,
    planned_queries: usize,
    min_scout_entries: usize,
}

impl MatchAgent {
    pub fn new(llm: Arc<dyn TextCompletion>, search: Arc<dyn WebSearch>) -> Self {
        Self {
            llm,
            search,
            planned_queries: 2,
            min_scout_entries: 5,
        }
    }

    /// Turn the request into exactly `planned_queries` search queries.
    ///
    /// The model is told to return a comma-separated list and nothing else,
    /// but its output is taken as-is: elements are trimmed, empties kept,
    /// extras dropped, shortfall padded with empty strings. A degenerate
    /// plan just means weaker retrieval downstream, never a hard error.
    async fn plan(&self, mode: Mode, query: &str, date: &str) -> Result<Vec<String>> {
        let prompt = match mode {
            Mode::Single => prompts::planner_single(query, date, self.planned_queries),
            Mode::List => prompts::planner_list(date, self.planned_queries),
        };
        let raw = self.llm.complete(&prompt, PLANNER_TEMPERATURE).await?;

        let mut queries: Vec<String> = raw
            .split(',')
            .map(|q| q.trim().to_string())
            .collect();
        if queries.len() != self.planned_queries {
            warn!(
                got = queries.len(),
                expected = self.planned_queries,
                "Planner produced a malformed list, normalizing"
            );
        }
        queries.truncate(self.planned_queries);
        queries.resize(self.planned_queries, String::new());
        Ok(queries)
    }

    /// Run every planned query and concatenate the labeled results, in
    /// planning order. A failed search contributes the failure marker
    /// instead of snippets; the pipeline always reaches the generator.
    async fn gather_context(&self, queries: &[String], results_per_query: usize) -> String {
        let mut context = String::new();
        for query in queries {
            info!(query = %query, "Searching the web");
            let block = match self.search.search(query, results_per_query, None).await {
                Ok(snippets) if snippets.is_empty() => "[no results]".to_string(),
                Ok(snippets) => snippets.join("\n"),
                Err(err) => {
                    warn!(query = %query, %err, "Search failed, continuing with marker");
                    SEARCH_FAILURE_MARKER.to_string()
                }
            };
            context.push_str(&format!("\n--- Results for '{}' ---\n{}\n", query, block));
        }
        context
    }

    /// Single-match pipeline. `Ok(None)` means the model produced nothing
    /// renderable (unrecoverable or invalid record); `Err` only for a
    /// propagated generation-tool failure.
    pub async fn analyze(&self, query: &str, date: &str) -> Result<Option<PredictionRecord>> {
        info!(query, "Planning search queries");
        let queries = self.plan(Mode::Single, query, date).await?;

        let context = self
            .gather_context(&queries, SINGLE_RESULTS_PER_QUERY)
            .await;

        info!("Generating prediction");
        let raw = self
            .llm
            .complete(
                &prompts::generate_single(query, date, &context),
                SINGLE_TEMPERATURE,
            )
            .await?;

        let Some(record) = parse::decode::<PredictionRecord>(&raw) else {
            warn!("No structured prediction in model output");
            return Ok(None);
        };
        if let Err(err) = record.validate() {
            warn!(%err, "Rejecting implausible prediction");
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Scouting pipeline: today's board, list mode, post-generation filter.
    pub async fn scout(&self, date: &str) -> Result<Option<ScoutList>> {
        info!("Planning scouting queries");
        let queries = self.plan(Mode::List, "", date).await?;

        let context = self.gather_context(&queries, LIST_RESULTS_PER_QUERY).await;

        info!("Generating scouting list");
        let raw = self
            .llm
            .complete(
                &prompts::generate_list(date, &context, self.min_scout_entries),
                LIST_TEMPERATURE,
            )
            .await?;

        let Some(mut list) = parse::decode::<ScoutList>(&raw) else {
            warn!("No structured scouting list in model output");
            return Ok(None);
        };
        let dropped = list.retain_valid();
        if dropped > 0 {
            info!(dropped, kept = list.matches.len(), "Filtered scouting list");
        }
        if list.is_empty() {
            return Ok(None);
        }
        Ok(Some(list))
    }

    /// Cache protocol for the scouting slot: return the cached list when
    /// present, otherwise run exactly one population cycle and fill the
    /// slot on success. Clearing happens only via an explicit refresh on
    /// the session itself.
    pub async fn scout_list<'a>(
        &self,
        session: &'a mut SessionState,
        date: &str,
    ) -> Result<Option<&'a ScoutList>> {
        if session.scouting().is_none() {
            if let Some(list) = self.scout(date).await? {
                session.set_scouting(list);
            }
        }
        Ok(session.scouting())
    }
}
