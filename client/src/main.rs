//! Terminal client entry point.

use std::rc::Rc;

use clap::Parser;
use client::{
    api::{HttpSearchBackend, SearchBackend},
    config::{API_URL_VAR, ClientConfig},
    session::{SearchSession, SessionParts},
    terminal::{self, Command},
};
use common::search_const::TOP_ARTICLE_INFOS_COUNT;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::LocalSet,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(about = "Terminal client for the UDIAB article search service")]
struct Args {
    /// Origin serving the search API
    #[arg(long, env = API_URL_VAR)]
    api_url: Option<String>,
    /// Articles per page
    #[arg(long)]
    page_size: Option<u64>,
    /// Quiet period before key hints are requested, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
    /// Give up on a request after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Submit this query right away
    query: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(page_size) = args.page_size.filter(|n| *n > 0) {
        config.page_size = page_size;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        config.key_hints_debounce = std::time::Duration::from_millis(debounce_ms);
    }
    if let Some(timeout_ms) = args.timeout_ms.filter(|n| *n > 0) {
        config.request_timeout = std::time::Duration::from_millis(timeout_ms);
    }
    tracing::info!(api_url = %config.api_url, page_size = config.page_size, "starting search client");

    LocalSet::new().run_until(repl(config, args.query)).await
}

async fn repl(config: ClientConfig, initial_query: Option<String>) -> anyhow::Result<()> {
    let backend = Rc::new(HttpSearchBackend::from_config(&config)?);
    let SessionParts { mut session, pipeline, mut notifications } = SearchSession::new(backend, &config);
    tokio::task::spawn_local(pipeline.run());
    let mut hints = session.suggestions().subscribe();

    println!("{}", terminal::HELP);
    if let Some(query) = initial_query {
        session.edit_query(query);
        execute(&mut session, Command::Search).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(&mut session, command).await,
                    Err(message) => println!("{message}"),
                }
            }
            Ok(()) = hints.changed() => {
                let current = hints.borrow_and_update().to_vec();
                for hint in current {
                    match session.highlight(&hint) {
                        Some(spans) => println!("  hint: {}", terminal::render_spans(&spans)),
                        None => println!("  hint: {}", hint.fragments),
                    }
                }
            }
            Some(notification) = notifications.recv() => {
                println!("! {}", notification.message);
            }
        }
    }
    Ok(())
}

async fn execute<B: SearchBackend + 'static>(session: &mut SearchSession<B>, command: Command) {
    match command {
        Command::Edit(text) => session.edit_query(text),
        Command::Search => {
            let Some(outcome) = session.submit().await else {
                println!("type a query first");
                return;
            };
            print_results(session, 0);
            if let Some(results) = session.results() {
                println!("{}", terminal::describe_outcome(&outcome, results.state()));
            }
        }
        Command::More => {
            let shown = session.results().map(|r| r.items().len()).unwrap_or(0);
            let outcome = session.load_more().await;
            print_results(session, shown);
            if let Some(results) = session.results() {
                println!("{}", terminal::describe_outcome(&outcome, results.state()));
            }
        }
        Command::Like(n) => {
            let address = session.results().and_then(|r| r.items().get(n - 1)).map(|a| a.address);
            let Some(address) = address else {
                println!("no result #{n}");
                return;
            };
            let shown = session.more_like_this(address).map(|l| l.items().len()).unwrap_or(0);
            let outcome = session.load_more_like_this(address).await;
            if let Some(list) = session.more_like_this(address) {
                for article in &list.items()[shown..] {
                    println!("{}", terminal::render_similar(article));
                }
                println!("{}", terminal::describe_outcome(&outcome, list.state()));
            }
        }
        Command::Sort(sort_by) => {
            session.update_options(|o| o.with_sort_by(sort_by));
        }
        Command::Field(field) => {
            session.update_options(|o| o.with_search_field(field));
        }
        Command::Method(method) => {
            session.update_options(|o| o.with_search_method(method));
        }
        Command::Top => {
            if let Some(top) = session.top_articles().await {
                for (i, article) in top.iter().take(TOP_ARTICLE_INFOS_COUNT).enumerate() {
                    println!("{}", terminal::render_top(i + 1, article));
                }
            }
        }
        Command::Help => println!("{}", terminal::HELP),
        Command::Quit => {}
    }
}

fn print_results<B: SearchBackend + 'static>(session: &SearchSession<B>, from: usize) {
    let Some(results) = session.results() else { return };
    for (i, article) in results.items().iter().enumerate().skip(from) {
        println!("{}", terminal::render_article(session, i + 1, article));
    }
}
