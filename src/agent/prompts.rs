//! Prompt templates for every pipeline stage. The structured-output prompts
//! spell out the exact JSON contract; recovery from sloppy output is the
//! parser's job, not the prompt's.

/// Planner, single-match mode: exactly N comma-separated queries, nothing else.
pub fn planner_single(query: &str, date: &str, count: usize) -> String {
    format!(
        r#"You are a search planner for a tennis analyst. Today is {date}.
The user asks: "{query}"

Identify exactly {count} distinct web search queries to find:
1. Recent results and current form of the players involved.
2. Head-to-head record and tournament surface.

Return ONLY the search queries separated by commas, with no other text."#
    )
}

/// Planner, scouting mode: schedule-oriented angles.
pub fn planner_list(date: &str, count: usize) -> String {
    format!(
        r#"You are a search planner for a tennis analyst. Today is {date}.

Identify exactly {count} distinct web search queries to find today's
scheduled professional tennis matches (ATP and WTA) together with
bookmaker odds for them.

Return ONLY the search queries separated by commas, with no other text."#
    )
}

/// Single-match generation: strict one-object contract.
pub fn generate_single(query: &str, date: &str, context: &str) -> String {
    format!(
        r#"You are an expert tennis analyst.

TODAY'S DATE: {date}

RETRIEVED WEB CONTEXT:
{context}

USER QUESTION: {query}

Weigh recent form, head-to-head record, and surface adaptability.
Estimate each player's winning probability as an integer percentage;
the two percentages must sum to 100.

Respond ONLY with one JSON object in exactly this shape, and nothing else:
{{"p1_name": "...", "p1_score": 0-100, "p2_name": "...", "p2_score": 0-100, "reason": "..."}}

Do not answer any question that is not a tennis match prediction."#
    )
}

/// Scouting-list generation: tennis only, explicit leakage guard, minimum size.
pub fn generate_list(date: &str, context: &str, min_entries: usize) -> String {
    format!(
        r#"You are an expert tennis betting scout.

TODAY'S DATE: {date}

RETRIEVED WEB CONTEXT:
{context}

From the context, list professional tennis matches scheduled today with a
value assessment for each. Include at least {min_entries} matches when the
context allows. ONLY tennis: the context may mention football/soccer or
other sports — NEVER include those fixtures. `bet_on` must be one of the
two players of that entry and `odd_value` is the decimal odds (>= 1.0).

Respond ONLY with one JSON object in exactly this shape, and nothing else:
{{"matches": [{{"p1": "...", "p2": "...", "p1_perc": 0-100, "p2_perc": 0-100,
"bet_on": "...", "odd_value": 1.0, "reason": "...", "match_time": "HH:MM"}}]}}"#
    )
}

/// Advisor persona. The trailing-question rule is also enforced in code
/// after generation; the prompt is the first line of defense.
pub fn advisor_turn(
    scout_context: &str,
    profile: &str,
    transcript: &str,
    user_text: &str,
) -> String {
    format!(
        r#"You are a conversational tennis betting advisor inside an ongoing chat.

TODAY'S BOARD:
{scout_context}

USER RISK PROFILE: {profile}

RECENT CONVERSATION:
{transcript}

USER SAYS: {user_text}

Reply as the advisor: concise, concrete, referencing the board when relevant.
You MUST end your reply with exactly one open question that narrows the
user's risk appetite or betting style. Never say goodbye or close the
conversation."#
    )
}

/// One-shot corrective re-prompt when a reply broke the trailing-question rule.
pub fn advisor_fixup(previous_reply: &str) -> String {
    format!(
        r#"Your previous reply did not end with a question:

{previous_reply}

Rewrite it so it keeps the same content but ends with exactly one open
question about the user's risk appetite or betting style. Output only the
rewritten reply."#
    )
}

/// Placed in the advisor prompt when the scout cache is empty.
pub const NO_BOARD_MARKER: &str = "(no scouting list available yet)";

/// Appended when even the corrective re-prompt fails the trailing-question rule.
pub const FALLBACK_QUESTION: &str =
    "By the way, would you describe yourself as more of a cautious bettor or one who chases long odds?";

/// Profile judgement over a single user message; one word back.
pub fn judge_profile(user_text: &str) -> String {
    format!(
        r#"A betting advisor is profiling a user's risk appetite.
The user just said: "{user_text}"

If this clearly indicates a cautious, low-risk attitude answer: prudent
If this clearly indicates a risk-seeking, high-odds attitude answer: bold
If it does not clearly indicate either, answer: unknown

Answer with that single word only."#
    )
}
