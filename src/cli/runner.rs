//! CLI runner - executes commands

use crate::analytics::{
    CollectorSink, ConsentContext, EventDispatcher, EventParams, FileConsentStore,
    PerformanceMarkSink,
};
use crate::cli::commands::{Cli, Commands, WalkArgs};
use crate::cli::server::{serve, AppState};
use crate::config::Settings;
use crate::contact::ContactService;
use crate::content::{BlogPost, ContentItem, ContentSources, WorkItem};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::pagination::{DEFAULT_POSTS_PAGE_SIZE, DEFAULT_WORKS_PAGE_SIZE};
use crate::scroll::{ApiFetcher, LoadOutcome, PagingSession, SessionStatus, SharedSession};
use crate::types::ContentKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Event emitted for every page a walker loads
pub const LOAD_MORE_EVENT: &str = "load_more";

/// CLI runner
#[derive(Debug)]
pub struct Runner {
    cli: Cli,
    settings: Settings,
}

impl Runner {
    /// Resolve settings (file, environment, flags) for `cli`
    pub fn new(cli: Cli) -> Result<Self> {
        let settings = Settings::load(cli.config.as_deref())?;
        Self::with_settings(cli, settings)
    }

    /// Apply `cli` flags over already loaded settings, then validate
    pub fn with_settings(cli: Cli, mut settings: Settings) -> Result<Self> {
        apply_flags(&cli, &mut settings);
        settings.validate()?;
        Ok(Self { cli, settings })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Level for the log subscriber when `RUST_LOG` is unset
    pub fn log_level(&self) -> tracing::Level {
        if self.cli.verbose {
            tracing::Level::DEBUG
        } else {
            self.settings.log_level.into()
        }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Serve { .. } => self.serve().await,
            Commands::Posts(args) => {
                self.walk::<BlogPost>(ContentKind::Posts, DEFAULT_POSTS_PAGE_SIZE, args)
                    .await
            }
            Commands::Works(args) => {
                self.walk::<WorkItem>(ContentKind::Works, DEFAULT_WORKS_PAGE_SIZE, args)
                    .await
            }
            Commands::Consent { accept, decline } => self.consent(*accept, *decline).await,
            Commands::CheckConfig => self.check_config(),
        }
    }

    async fn serve(&self) -> Result<()> {
        let sources = ContentSources::from_settings(&self.settings.content, &self.settings.http)
            .context("Failed to set up content sources")?;
        let (contact, worker) =
            ContactService::from_settings(&self.settings.contact, &self.settings.http)
                .context("Failed to set up contact pipeline")?;

        serve(AppState::new(sources, contact), &self.settings.server).await?;

        // The router owned the queue sender; the worker drains what is left
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!("notification worker ended abnormally: {e}");
            }
        }
        Ok(())
    }

    /// Walk a listing through a paging session and print what was loaded
    async fn walk<T>(&self, kind: ContentKind, default_first: usize, args: &WalkArgs) -> Result<()>
    where
        T: ContentItem + Serialize + DeserializeOwned,
    {
        let http = Arc::new(
            HttpClient::with_config(self.settings.http.client_config())
                .context("Failed to build HTTP client")?,
        );
        let fetcher = ApiFetcher::<T>::new(http.clone(), &args.base_url, kind);
        let dispatcher = self.dispatcher(&http);
        let consent = ConsentContext::init(Arc::new(FileConsentStore::new(
            &self.settings.analytics.consent_path,
        )))
        .await;

        let mut session = PagingSession::new(args.first.unwrap_or(default_first));
        session.reset(args.filter.clone());
        let session = SharedSession::new(session);

        info!(url = fetcher.url(), filter = ?args.filter, "walking {kind}");
        let start = Instant::now();
        let mut pages = 0usize;
        let mut printed = 0usize;

        while args.max_pages.map_or(true, |max| pages < max) {
            let Some(outcome) = session.load_more(&fetcher).await else {
                break;
            };
            let LoadOutcome::Appended(added) = outcome else {
                break;
            };
            pages += 1;

            let mut params = EventParams::new();
            params.insert("listing".to_string(), kind.to_string().into());
            params.insert("page".to_string(), pages.into());
            params.insert("items".to_string(), added.into());
            dispatcher.track(LOAD_MORE_EVENT, params, &consent).await;

            if args.stream {
                for item in session.items().await.iter().skip(printed) {
                    println!("{}", serde_json::to_string(item)?);
                }
                printed += added;
            }
        }

        if let SessionStatus::Error(message) = session.status().await {
            return Err(Error::Other(format!("loading {kind} failed: {message}")));
        }

        let items = session.items().await;
        info!(
            pages,
            items = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "walk finished"
        );

        if !args.stream {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Ok(())
    }

    fn dispatcher(&self, http: &Arc<HttpClient>) -> EventDispatcher {
        let dispatcher = EventDispatcher::new().with_sink(Arc::new(PerformanceMarkSink));
        match &self.settings.analytics.collector_url {
            Some(url) => dispatcher.with_sink(Arc::new(CollectorSink::new(http.clone(), url))),
            None => dispatcher,
        }
    }

    async fn consent(&self, accept: bool, decline: bool) -> Result<()> {
        let path = &self.settings.analytics.consent_path;
        let consent = ConsentContext::init(Arc::new(FileConsentStore::new(path))).await;

        if accept {
            consent.accept_all().await?;
        } else if decline {
            consent.set_analytics(false).await?;
        }

        let output = json!({
            "path": path.display().to_string(),
            "chosen": consent.has_chosen().await,
            "analytics": consent.analytics_enabled().await,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn check_config(&self) -> Result<()> {
        let mut effective = self.settings.clone();
        if effective.content.auth_token.is_some() {
            effective.content.auth_token = Some("***".to_string());
        }

        println!("{}", serde_yaml::to_string(&effective)?);
        if self.settings.uses_cms() {
            eprintln!("✓ Content served from WordPress, degrading per collection on failure");
        } else {
            eprintln!("✓ Content served from the embedded collections");
        }
        Ok(())
    }
}

/// Command line flags win over file and environment
fn apply_flags(cli: &Cli, settings: &mut Settings) {
    if let Some(url) = &cli.graphql_url {
        settings.content.graphql_url = Some(url.clone());
    }
    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_serve_flags_override_settings() {
        let cli = parse(&[
            "sabako-site",
            "--graphql-url",
            "https://cms.example.com/graphql",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ]);
        let mut settings = Settings::default();
        apply_flags(&cli, &mut settings);

        assert_eq!(settings.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(
            settings.content.graphql_url.as_deref(),
            Some("https://cms.example.com/graphql")
        );
    }

    #[test]
    fn test_flag_replaces_invalid_env_value() {
        let env_settings = || {
            let mut settings = Settings::default();
            settings.apply_env(|key| {
                (key == "SABAKO_GRAPHQL_URL").then(|| "ftp://bad.example".to_string())
            });
            settings
        };

        let cli = parse(&[
            "sabako-site",
            "--graphql-url",
            "https://ok.example/graphql",
            "check-config",
        ]);
        let runner = Runner::with_settings(cli, env_settings()).unwrap();
        assert_eq!(
            runner.settings().content.graphql_url.as_deref(),
            Some("https://ok.example/graphql")
        );

        let err = Runner::with_settings(parse(&["sabako-site", "check-config"]), env_settings())
            .unwrap_err();
        assert!(err.to_string().contains("content.graphql_url"));
    }

    #[test]
    fn test_walk_args() {
        let cli = parse(&[
            "sabako-site",
            "works",
            "--first",
            "3",
            "--filter",
            "iot",
            "--max-pages",
            "2",
        ]);
        let Commands::Works(args) = cli.command else {
            panic!("expected works command");
        };
        assert_eq!(args.base_url, "http://127.0.0.1:3000");
        assert_eq!(args.first, Some(3));
        assert_eq!(args.filter.as_deref(), Some("iot"));
        assert_eq!(args.max_pages, Some(2));
        assert!(!args.stream);
    }

    #[test]
    fn test_consent_flags_conflict() {
        assert!(Cli::try_parse_from(["sabako-site", "consent", "--accept", "--decline"]).is_err());
    }

    #[test]
    fn test_verbose_raises_log_level() {
        let runner = Runner {
            cli: parse(&["sabako-site", "-v", "check-config"]),
            settings: Settings::default(),
        };
        assert_eq!(runner.log_level(), tracing::Level::DEBUG);

        let runner = Runner {
            cli: parse(&["sabako-site", "check-config"]),
            settings: Settings::default(),
        };
        assert_eq!(runner.log_level(), tracing::Level::INFO);
    }

    #[tokio::test]
    async fn test_consent_command_persists_choice() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.analytics.consent_path = dir.path().join("consent.json");
        let runner = Runner {
            cli: parse(&["sabako-site", "consent", "--decline"]),
            settings,
        };

        runner.run().await.unwrap();

        let stored = std::fs::read_to_string(dir.path().join("consent.json")).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&stored).unwrap(),
            json!({ "analytics": false })
        );
    }
}
