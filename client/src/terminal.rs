//! Line-oriented front-end: command parsing and plain-text rendering.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use common::{
    search_const::{MAX_BODY_LENGTH, MAX_CODE_LENGTH, MAX_TITLE_LENGTH},
    search_query::{SearchField, SearchMethod, SearchSortBy},
    search_result::{MoreLikeThisArticleInfo, SearchedArticleInfo, TopArticleInfo},
    text_highlight::{HighlightTextSpan, Snippet},
};

use crate::{
    api::SearchBackend,
    data_definitions::loading_state::LoadingState,
    pagination::LoadOutcome,
    session::SearchSession,
};

pub const HELP: &str = "\
Type to edit the query; hints appear after a short pause.
  :search                 run the current query
  :more                   load the next page of results
  :like <n>               load documents similar to result <n>
  :sort time|hot|relevance
  :field title|code|all
  :method naive|complex|regex
  :top                    show today's top articles
  :help                   show this help
  :quit                   exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(String),
    Search,
    More,
    Like(usize),
    Sort(SearchSortBy),
    Field(SearchField),
    Method(SearchMethod),
    Top,
    Help,
    Quit,
}

impl Command {
    /// Lines starting with `:` are commands, anything else is query text.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.trim().strip_prefix(':') else {
            return Ok(Command::Edit(line.trim_end_matches(['\r', '\n']).to_string()));
        };
        let (name, arg) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let arg = arg.trim();
        let bad_arg = || format!("invalid argument for :{name}: `{arg}`");
        match name {
            "search" | "s" => Ok(Command::Search),
            "more" | "m" => Ok(Command::More),
            "like" => arg.parse::<usize>().ok().filter(|n| *n > 0).map(Command::Like).ok_or_else(bad_arg),
            "sort" => SearchSortBy::from_label(arg).map(Command::Sort).ok_or_else(bad_arg),
            "field" => SearchField::from_label(arg).map(Command::Field).ok_or_else(bad_arg),
            "method" => SearchMethod::from_label(arg).map(Command::Method).ok_or_else(bad_arg),
            "top" => Ok(Command::Top),
            "help" | "h" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            _ => Err(format!("unknown command :{name}, try :help")),
        }
    }
}

/// Highlighted spans are wrapped in brackets.
pub fn render_spans(spans: &[HighlightTextSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        if span.is_highlighted {
            out.push('[');
            out.push_str(&span.text);
            out.push(']');
        } else {
            out.push_str(&span.text);
        }
    }
    out
}

/// Like [`render_spans`], cut to `max_chars` characters of text plus `...`.
pub fn render_spans_truncated(spans: &[HighlightTextSpan], max_chars: usize) -> String {
    let total: usize = spans.iter().map(|span| span.text.chars().count()).sum();
    if total <= max_chars {
        return render_spans(spans);
    }
    let mut budget = max_chars.saturating_sub(3);
    let mut kept = Vec::new();
    for span in spans {
        if budget == 0 {
            break;
        }
        let text: String = span.text.chars().take(budget).collect();
        budget -= text.chars().count();
        kept.push(HighlightTextSpan { text, is_highlighted: span.is_highlighted, index: span.index });
    }
    render_spans(&kept) + "..."
}

pub fn ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        kept + "..."
    } else {
        text.to_string()
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

fn render_snippet<B: SearchBackend + 'static>(session: &SearchSession<B>, snippet: &Snippet) -> String {
    match session.highlight(snippet) {
        Some(spans) => render_spans(&spans),
        None => snippet.fragments.clone(),
    }
}

pub fn render_article<B: SearchBackend + 'static>(session: &SearchSession<B>, n: usize, article: &SearchedArticleInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{n:>3}. {}  ({} likes, {})",
        render_snippet(session, &article.title_snippet),
        article.likes,
        format_time(article.time)
    );
    if !article.body_snippet.is_empty() {
        let _ = writeln!(out, "     {}", render_snippet(session, &article.body_snippet));
    }
    if let Some(code) = &article.code_snippet {
        let code = match session.highlight(code) {
            Some(spans) => render_spans_truncated(&spans, MAX_CODE_LENGTH),
            None => ellipsis(&code.fragments, MAX_CODE_LENGTH),
        };
        let _ = writeln!(out, "     code: {code}");
    }
    let _ = write!(out, "     {}", article.url);
    out
}

pub fn render_similar(article: &MoreLikeThisArticleInfo) -> String {
    format!(
        "       ~ {}  ({} likes, {})\n         {}\n         {}",
        ellipsis(&article.title, MAX_TITLE_LENGTH),
        article.likes,
        format_time(article.time),
        ellipsis(&article.body, MAX_BODY_LENGTH),
        article.url
    )
}

pub fn render_top(n: usize, article: &TopArticleInfo) -> String {
    format!("{n:>3}. {}  ({} likes)  {}", ellipsis(&article.title, MAX_TITLE_LENGTH), article.likes, article.url)
}

pub fn describe_outcome(outcome: &LoadOutcome, state: LoadingState) -> String {
    let more = match state {
        LoadingState::ReadyToLoad => "  (:more for more)",
        _ => "",
    };
    match outcome {
        LoadOutcome::Skipped => "nothing to load".to_string(),
        LoadOutcome::Appended(count) => format!("{count} more{more}"),
        LoadOutcome::Exhausted => "no more results".to_string(),
        LoadOutcome::Failed(_) => "loading failed, try again".to_string(),
    }
}
