//! One interactive pass: resolve suggestions from cache or network, resolve
//! per-word details from cache or a background job, and assemble the feedback
//! document. Each pass is a pure function of current cache contents, so the
//! host can re-run it until every detail fetch has landed.

use std::path::PathBuf;

use palabra_cache::{CacheError, CacheStore};
use palabra_config::Config;
use palabra_fetch::{FetchError, SuggestSource, url_for_word};
use palabra_jobs::{JobDispatch, JobError, JobSpec};
use palabra_types::{Article, Feedback, Icon, Item, ItemText};

use crate::keys;
use crate::query::valid_query;
use crate::render;

const LOADING_PREVIEW: &str = "Loading details... ";
const SEARCH_ICON: &str = "icon-search.png";

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("suggestion fetch failed: {0}")]
    Suggest(#[from] FetchError),

    #[error(transparent)]
    Jobs(#[from] JobError),
}

/// Command template for the detail-fetch worker. The word is appended as the
/// final argument; the launched process fetches that word's articles, writes
/// them to the cache, and exits.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl WorkerCommand {
    fn spec_for(&self, word: &str) -> JobSpec {
        let mut args = self.args.clone();
        args.push(word.to_string());
        JobSpec {
            id: keys::job_id(word),
            program: self.program.clone(),
            args,
        }
    }
}

pub struct Assembler {
    cache: CacheStore,
    suggest: Box<dyn SuggestSource>,
    jobs: Box<dyn JobDispatch>,
    worker: WorkerCommand,
    search_url: String,
    refresh_rate: f64,
    display_details: bool,
}

impl Assembler {
    pub fn new(
        cache: CacheStore,
        suggest: Box<dyn SuggestSource>,
        jobs: Box<dyn JobDispatch>,
        worker: WorkerCommand,
        config: &Config,
    ) -> Self {
        Self {
            cache,
            suggest,
            jobs,
            worker,
            search_url: config.network.search_url.clone(),
            refresh_rate: config.refresh_rate,
            display_details: config.display_details,
        }
    }

    /// Run one pass for a raw query and return the feedback document.
    pub async fn respond(&self, raw: &str) -> Result<Feedback, AssembleError> {
        let mut feedback = Feedback::new();

        let Some(query) = valid_query(raw) else {
            feedback.add_item(invalid_args_item());
            return Ok(feedback);
        };

        let suggestions = self.suggestions(query).await?;
        tracing::debug!("assembling {} suggestion(s) for '{query}'", suggestions.len());

        let mut awaiting_details = false;
        for word in &suggestions {
            let item = if self.display_details {
                match self.cache.read::<Vec<Article>>(&keys::details_key(word))? {
                    Some(articles) => self.detailed_item(word, &articles),
                    None => {
                        self.jobs.start_if_not_running(&self.worker.spec_for(word))?;
                        awaiting_details = true;
                        loading_item(word)
                    }
                }
            } else {
                Item::new(word.clone())
            };
            feedback.add_item(item);
        }

        feedback.add_item(self.fallback_item(query));

        if awaiting_details {
            feedback.request_rerun(self.refresh_rate);
        }
        Ok(feedback)
    }

    /// Suggestion list for the query, from cache or the remote endpoint.
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, AssembleError> {
        if let Some(words) = self.cache.read::<Vec<String>>(query)? {
            return Ok(words);
        }

        let words = self.suggest.suggestions(query).await?;
        self.cache.write(query, &words)?;
        Ok(words)
    }

    fn detailed_item(&self, word: &str, articles: &[Article]) -> Item {
        let full = render::full_text(articles);
        let can_autocomplete = !render::is_effectively_empty(articles);

        Item {
            title: word.to_string(),
            subtitle: Some(render::preview(articles)),
            autocomplete: can_autocomplete.then(|| format!("{word} ")),
            quicklookurl: can_autocomplete.then(|| url_for_word(&self.search_url, word)),
            text: Some(ItemText {
                copy: Some(full.clone()),
                largetype: Some(full),
            }),
            ..Item::default()
        }
    }

    /// Always appended, whatever the cache and network produced.
    fn fallback_item(&self, query: &str) -> Item {
        Item {
            title: "Search on web".to_string(),
            subtitle: Some(format!("Open search RAE for {query}")),
            arg: Some(url_for_word(&self.search_url, query)),
            valid: true,
            icon: Some(Icon {
                path: SEARCH_ICON.to_string(),
            }),
            ..Item::default()
        }
    }
}

fn loading_item(word: &str) -> Item {
    Item {
        title: word.to_string(),
        subtitle: Some(LOADING_PREVIEW.to_string()),
        ..Item::default()
    }
}

fn invalid_args_item() -> Item {
    Item {
        title: "Invalid arguments.".to_string(),
        subtitle: Some(
            "Type just one word. Insert space or select one to see definitions.".to_string(),
        ),
        ..Item::default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Suggest source that must not be reached.
    struct NoNetwork;

    #[async_trait::async_trait]
    impl SuggestSource for NoNetwork {
        async fn suggestions(&self, query: &str) -> Result<Vec<String>, FetchError> {
            panic!("unexpected suggestion fetch for '{query}'");
        }
    }

    /// Suggest source returning a fixed list, counting calls through a
    /// handle the test keeps.
    struct FixedSource {
        words: Vec<String>,
        calls: Arc<Mutex<usize>>,
    }

    impl FixedSource {
        fn new(words: &[&str]) -> (Self, Arc<Mutex<usize>>) {
            let calls = Arc::new(Mutex::new(0));
            let source = Self {
                words: words.iter().map(|w| w.to_string()).collect(),
                calls: Arc::clone(&calls),
            };
            (source, calls)
        }
    }

    #[async_trait::async_trait]
    impl SuggestSource for FixedSource {
        async fn suggestions(&self, _query: &str) -> Result<Vec<String>, FetchError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.words.clone())
        }
    }

    /// Dispatcher that records launches instead of spawning processes.
    #[derive(Default, Clone)]
    struct RecordingDispatch {
        launched: Arc<Mutex<Vec<String>>>,
    }

    impl JobDispatch for RecordingDispatch {
        fn start_if_not_running(&self, spec: &JobSpec) -> Result<bool, JobError> {
            let mut launched = self.launched.lock().unwrap();
            if launched.contains(&spec.id) {
                return Ok(false);
            }
            launched.push(spec.id.clone());
            Ok(true)
        }

        fn is_running(&self, id: &str) -> bool {
            self.launched.lock().unwrap().iter().any(|l| l == id)
        }
    }

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::new();
        config.cache.dir = dir.to_path_buf();
        config.network.search_url = "https://dle.rae.es/".to_string();
        config.refresh_rate = 1.2;
        config.display_details = true;
        config
    }

    fn assembler(dir: &std::path::Path, suggest: Box<dyn SuggestSource>) -> Assembler {
        let config = test_config(dir);
        Assembler::new(
            CacheStore::open(dir).unwrap(),
            suggest,
            Box::new(RecordingDispatch::default()),
            WorkerCommand {
                program: PathBuf::from("/bin/true"),
                args: vec!["update-details".to_string()],
            },
            &config,
        )
    }

    fn seed_suggestions(dir: &std::path::Path, query: &str, words: &[&str]) {
        let store = CacheStore::open(dir).unwrap();
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        store.write(query, &words).unwrap();
    }

    fn seed_details(dir: &std::path::Path, word: &str, articles: &[Article]) {
        let store = CacheStore::open(dir).unwrap();
        store
            .write(&keys::details_key(word), &articles.to_vec())
            .unwrap();
    }

    fn casa_article() -> Article {
        Article {
            title: Some("casa".into()),
            etymology: Some("Del lat. casa 'choza'.".into()),
            meanings: vec!["1. f. Edificio para habitar.".into()],
        }
    }

    #[tokio::test]
    async fn multi_word_query_yields_only_the_invalid_item() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let feedback = assembler.respond("casa blanca").await.unwrap();

        assert_eq!(feedback.items.len(), 1);
        assert_eq!(feedback.items[0].title, "Invalid arguments.");
        assert!(!feedback.items[0].valid);
        assert_eq!(feedback.rerun, None);
    }

    #[tokio::test]
    async fn first_pass_emits_placeholders_and_requests_rerun() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa", "caso"]);
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let feedback = assembler.respond("cas").await.unwrap();

        assert_eq!(feedback.items.len(), 3);
        for item in &feedback.items[..2] {
            assert_eq!(item.subtitle.as_deref(), Some("Loading details... "));
            assert_eq!(item.autocomplete, None);
            assert_eq!(item.text, None);
        }
        assert_eq!(feedback.items[2].title, "Search on web");
        assert_eq!(feedback.rerun, Some(1.2));
    }

    #[tokio::test]
    async fn passes_are_idempotent_while_the_cache_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa", "caso"]);
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let first = assembler.respond("cas").await.unwrap();
        let second = assembler.respond("cas").await.unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(second.rerun, Some(1.2));
    }

    #[tokio::test]
    async fn completed_job_upgrades_its_word_on_the_next_pass() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa", "caso"]);
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let first = assembler.respond("cas").await.unwrap();
        assert_eq!(first.items[0].subtitle.as_deref(), Some("Loading details... "));

        // The background job lands casa's articles in the cache.
        seed_details(dir.path(), "casa", &[casa_article()]);

        let second = assembler.respond("cas").await.unwrap();
        let casa = &second.items[0];
        assert_eq!(
            casa.subtitle.as_deref(),
            Some("Del lat. casa 'choza'. 1. f. Edificio para habitar.")
        );
        assert_eq!(casa.autocomplete.as_deref(), Some("casa "));
        assert_eq!(casa.quicklookurl.as_deref(), Some("https://dle.rae.es/casa"));
        let text = casa.text.as_ref().unwrap();
        assert!(text.copy.as_deref().unwrap().starts_with("casa\n-\n"));

        // caso is still in flight.
        assert_eq!(second.items[1].subtitle.as_deref(), Some("Loading details... "));
        assert_eq!(second.rerun, Some(1.2));
    }

    #[tokio::test]
    async fn rerun_stops_once_every_word_has_details() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa"]);
        seed_details(dir.path(), "casa", &[casa_article()]);
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let feedback = assembler.respond("cas").await.unwrap();
        assert_eq!(feedback.rerun, None);
    }

    #[tokio::test]
    async fn suggestion_fetch_happens_once_then_serves_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (source, calls) = FixedSource::new(&["casa", "caso"]);
        let assembler = assembler(dir.path(), Box::new(source));

        assembler.respond("cas").await.unwrap();
        assembler.respond("cas").await.unwrap();

        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn one_job_is_dispatched_per_missing_word_across_passes() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa", "caso"]);

        let jobs = RecordingDispatch::default();
        let config = test_config(dir.path());
        let assembler = Assembler::new(
            CacheStore::open(dir.path()).unwrap(),
            Box::new(NoNetwork),
            Box::new(jobs.clone()),
            WorkerCommand {
                program: PathBuf::from("/bin/true"),
                args: vec!["update-details".to_string()],
            },
            &config,
        );

        assembler.respond("cas").await.unwrap();
        assembler.respond("cas").await.unwrap();

        let launched = jobs.launched.lock().unwrap().clone();
        assert_eq!(launched, vec!["update_details_casa", "update_details_caso"]);
    }

    #[tokio::test]
    async fn thin_details_suppress_autocomplete_but_keep_the_item() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa"]);
        seed_details(
            dir.path(),
            "casa",
            &[Article {
                etymology: Some(String::new()),
                ..Article::default()
            }],
        );
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let feedback = assembler.respond("cas").await.unwrap();
        let casa = &feedback.items[0];
        assert_eq!(casa.title, "casa");
        assert_eq!(casa.subtitle.as_deref(), Some(""));
        assert_eq!(casa.autocomplete, None);
        assert_eq!(casa.quicklookurl, None);
    }

    #[tokio::test]
    async fn fallback_is_always_present_and_actionable() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "zzzz", &[]);
        let assembler = assembler(dir.path(), Box::new(NoNetwork));

        let feedback = assembler.respond("zzzz").await.unwrap();

        assert_eq!(feedback.items.len(), 1);
        let fallback = &feedback.items[0];
        assert_eq!(fallback.title, "Search on web");
        assert!(fallback.valid);
        assert_eq!(fallback.arg.as_deref(), Some("https://dle.rae.es/zzzz"));
        assert_eq!(feedback.rerun, None);
    }

    #[tokio::test]
    async fn details_display_can_be_switched_off() {
        let dir = tempfile::tempdir().unwrap();
        seed_suggestions(dir.path(), "cas", &["casa"]);

        let mut config = test_config(dir.path());
        config.display_details = false;
        let assembler = Assembler::new(
            CacheStore::open(dir.path()).unwrap(),
            Box::new(NoNetwork),
            Box::new(RecordingDispatch::default()),
            WorkerCommand {
                program: PathBuf::from("/bin/true"),
                args: vec!["update-details".to_string()],
            },
            &config,
        );

        let feedback = assembler.respond("cas").await.unwrap();
        assert_eq!(feedback.items[0].subtitle, None);
        assert_eq!(feedback.rerun, None);
    }
}
