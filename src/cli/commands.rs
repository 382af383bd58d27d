//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;

/// Commands for the Darija translator
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a single text
    Translate {
        /// Text to translate
        #[arg(short, long)]
        text: String,

        /// Source language tag (default: en)
        #[arg(long, default_value = "en")]
        source_lang: String,

        /// Target language tag (default: ary)
        #[arg(short = 'l', long, default_value = "ary")]
        target_lang: String,

        /// Provider tag (default: first built-in)
        #[arg(short, long)]
        provider: Option<String>,
    },

    /// Interactive translation session
    Repl {
        /// Provider tag to start with
        #[arg(short, long)]
        provider: Option<String>,

        /// Source language tag (default: en)
        #[arg(long, default_value = "en")]
        source_lang: String,

        /// Target language tag (default: ary)
        #[arg(short = 'l', long, default_value = "ary")]
        target_lang: String,
    },

    /// Load a dataset, clean it and print a report
    Dataset {
        /// Dataset name in the remote catalog
        #[arg(short, long)]
        name: String,

        /// Cache directory override
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Skip the cleaning pass
        #[arg(long)]
        no_clean: bool,
    },

    /// List built-in providers
    Providers,

    /// Start HTTP API server
    Serve {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },

    /// Validate the deployment environment; exits 1 on failure
    Doctor,
}

/// Handle one-shot translation
pub async fn handle_translate(
    text: String,
    source_lang: String,
    target_lang: String,
    provider: Option<String>,
) -> anyhow::Result<()> {
    use crate::core::client::ProviderRegistry;
    use crate::core::models::{display_outcome, TranslationRequest};
    use std::time::Instant;
    use tracing::info;

    let registry = ProviderRegistry::from_env()?;
    let tag = provider
        .or_else(|| registry.default_tag().map(|t| t.to_string()))
        .unwrap_or_default();
    let client = registry.client(&tag)?;

    info!(
        "Translating {} -> {} via {}",
        source_lang,
        target_lang,
        client.provider().tag
    );

    let start_time = Instant::now();
    let request = TranslationRequest::new(text, source_lang, target_lang);
    let outcome = client.translate(&request).await;

    println!("{}", display_outcome(&client.provider().tag, &outcome));
    info!("Done in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

/// Handle the interactive session
pub async fn handle_repl(
    provider: Option<String>,
    mut source_lang: String,
    mut target_lang: String,
) -> anyhow::Result<()> {
    use crate::core::client::ProviderRegistry;
    use crate::core::session::SessionContext;
    use std::io::{self, BufRead, Write};

    let registry = ProviderRegistry::from_env()?;
    let mut session = SessionContext::new(registry);
    if let Some(name) = provider {
        session.select_provider(&name)?;
    }

    println!(
        "Session started: {} -> {} via {}. Type :help for commands.",
        source_lang,
        target_lang,
        session.selected_provider()
    );

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) | (":q", _) => break,
            (":help", _) => {
                println!(":provider NAME | :device cpu|cuda | :swap | :history | :clear | :quit");
            }
            (":provider", name) => match session.select_provider(name.trim()) {
                Ok(()) => println!("provider: {}", session.selected_provider()),
                Err(e) => println!("{}", e),
            },
            (":device", device) => match device.trim().parse() {
                Ok(device) => {
                    session.set_device(device);
                    println!("device: {}", session.device());
                }
                Err(e) => println!("{}", e),
            },
            (":swap", _) => {
                std::mem::swap(&mut source_lang, &mut target_lang);
                println!("direction: {} -> {}", source_lang, target_lang);
            }
            (":history", _) => {
                for entry in session.history() {
                    println!(
                        "[{}] {} -> {} | {} => {}",
                        entry.at.format("%H:%M:%S"),
                        entry.source_lang,
                        entry.target_lang,
                        entry.input,
                        entry.output
                    );
                }
            }
            (":clear", _) => {
                session.clear_history();
                println!("history cleared");
            }
            _ => {
                let shown = session.translate(line, &source_lang, &target_lang).await;
                println!("{}", shown);
            }
        }
    }

    Ok(())
}

/// Handle dataset load + clean + report
pub async fn handle_dataset(
    name: String,
    cache_dir: Option<PathBuf>,
    no_clean: bool,
) -> anyhow::Result<()> {
    use crate::core::config::TranslatorConfig;
    use crate::datasets::adapter::DatasetAdapter;
    use crate::datasets::cleaner::clean;
    use crate::datasets::convert::{detect_arabizi, table_to_unified};
    use indicatif::{ProgressBar, ProgressStyle};
    use tracing::info;

    let mut config = TranslatorConfig::default();
    if let Some(dir) = cache_dir {
        config.cache_dir = dir;
    }

    let adapter = DatasetAdapter::from_config(&config)?;
    info!("Loading dataset {} into {}", name, adapter.cache_dir().display());

    let Some(dataset) = adapter.load(&name).await else {
        anyhow::bail!("dataset {} could not be loaded", name);
    };

    let dataset = if no_clean { dataset } else { clean(dataset) };

    for (label, table) in dataset.tables() {
        let subset = if label.is_empty() {
            None
        } else {
            Some(label.clone())
        };
        let split_name = subset.as_deref().unwrap_or("all");

        let pb = ProgressBar::new(table.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
                .progress_chars("##-"),
        );
        pb.set_message(format!("converting {}", split_name));

        let unified = table_to_unified(&name, subset, table);
        let mut arabizi = 0usize;
        for sample in unified.iter() {
            if sample
                .includes_arabizi
                .unwrap_or_else(|| detect_arabizi(&sample.darija))
            {
                arabizi += 1;
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        println!(
            "split {}: {} samples, {} columns, {} with arabizi",
            split_name,
            unified.len(),
            table.columns.len(),
            arabizi
        );
        for sample in unified.iter().take(2) {
            println!("  en: {} | ary: {}", sample.english, sample.darija);
        }
    }

    Ok(())
}

/// Handle provider listing
pub async fn handle_providers() -> anyhow::Result<()> {
    use crate::core::providers::builtin_providers;

    for provider in builtin_providers() {
        let pairs = match &provider.pairs {
            None => "any pair".to_string(),
            Some(pairs) => pairs
                .iter()
                .map(|(s, t)| format!("{}->{}", s, t))
                .collect::<Vec<_>>()
                .join(", "),
        };
        println!("{:10} {} ({})", provider.tag, provider.model_id, pairs);
    }

    Ok(())
}

/// Handle server startup
pub async fn handle_serve(host: String, port: u16) -> anyhow::Result<()> {
    crate::server::api::run_server(host, port).await
}

/// Handle deployment validation. Returns an error (exit code 1) when any
/// check fails.
pub async fn handle_doctor() -> anyhow::Result<()> {
    use crate::core::config::TranslatorConfig;
    use crate::core::providers::builtin_providers;
    use std::collections::HashSet;

    let mut failures: Vec<String> = Vec::new();

    match std::env::var("HF_API_TOKEN") {
        Ok(token) if !token.is_empty() => println!("ok: HF_API_TOKEN is set"),
        _ => {
            println!("FAIL: HF_API_TOKEN is not set");
            failures.push("HF_API_TOKEN".to_string());
        }
    }

    let config = TranslatorConfig::default();
    match config.validate() {
        Ok(()) => println!("ok: configuration is valid"),
        Err(e) => {
            println!("FAIL: {}", e);
            failures.push("configuration".to_string());
        }
    }

    match probe_cache_dir(&config.cache_dir) {
        Ok(()) => println!("ok: cache directory {} is writable", config.cache_dir.display()),
        Err(e) => {
            println!(
                "FAIL: cache directory {} is not writable: {}",
                config.cache_dir.display(),
                e
            );
            failures.push("cache directory".to_string());
        }
    }

    let providers = builtin_providers();
    let tags: HashSet<String> = providers.iter().map(|p| p.tag.to_lowercase()).collect();
    if providers.is_empty() {
        println!("FAIL: provider table is empty");
        failures.push("providers".to_string());
    } else if tags.len() != providers.len() {
        println!("FAIL: provider tags are not unique");
        failures.push("providers".to_string());
    } else {
        println!("ok: {} providers registered", providers.len());
    }

    let cached = walkdir::WalkDir::new(&config.cache_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count();
    println!("info: {} cached dataset files", cached);

    if failures.is_empty() {
        println!("All checks passed");
        Ok(())
    } else {
        anyhow::bail!("{} check(s) failed: {}", failures.len(), failures.join(", "))
    }
}

fn probe_cache_dir(dir: &std::path::Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let probe = dir.join(".doctor_probe");
    std::fs::write(&probe, b"probe")?;
    std::fs::remove_file(&probe)?;
    Ok(())
}
