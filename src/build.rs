use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use crate::cli::{AlignArgs, BuildArgs, ClassifierEngine};
use crate::config::ChannelConfig;
use crate::export;
use crate::pipeline;
use crate::sentiment::{CommandClassifier, Emotion, FixedClassifier, SentimentClassifier};
use crate::source::{self, ParserRegistry};

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let out_dir = PathBuf::from(&args.out);
    if out_dir.exists() {
        anyhow::bail!("sheet output directory already exists: {}", out_dir.display());
    }

    let config = match args.config.as_deref() {
        Some(path) => ChannelConfig::load(Path::new(path))?,
        None => ChannelConfig::default(),
    };
    let site = args.site.as_deref().unwrap_or(&config.site);
    let registry = ParserRegistry::builtin();
    let parser = registry.resolve(site)?;

    let inputs = collect_inputs(Path::new(&args.input))?;
    if inputs.is_empty() {
        anyhow::bail!("no article files found: {}", args.input);
    }

    let classifier = classifier(&args)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create sheet output dir: {}", out_dir.display()))?;

    tracing::info!(
        channel = %config.channel_name,
        site = parser.name(),
        articles = inputs.len(),
        out = %out_dir.display(),
        "build sheets"
    );

    let mut written = 0usize;
    let mut skipped = 0usize;
    for input in &inputs {
        let built = source::read_article(parser, input).and_then(|article| {
            let (id, sheet) =
                pipeline::build_sheet(&article, &config, &*classifier, &mut rng)?;
            Ok((article, id, sheet))
        });
        let (article, id, sheet) = match built {
            Ok(built) => built,
            Err(err) => {
                let error = format!("{err:#}");
                tracing::warn!(input = %input.display(), error = %error, "skip article");
                skipped += 1;
                continue;
            }
        };

        let document = export::sheet_document(&id, &article.url, &sheet);
        if let Err(err) = export::write_sheet(&out_dir, &document, args.format) {
            let error = format!("{err:#}");
            tracing::warn!(input = %input.display(), article = %id, error = %error, "skip article");
            skipped += 1;
            continue;
        }
        written += 1;
    }

    tracing::info!(written, skipped, "build complete");
    if written == 0 {
        anyhow::bail!("no sheet was built ({skipped} article(s) skipped)");
    }
    Ok(())
}

pub fn align(args: AlignArgs) -> anyhow::Result<()> {
    let registry = ParserRegistry::builtin();
    let parser = registry.resolve(&args.site)?;
    let article = source::read_article(parser, Path::new(&args.input))?;
    let alignment = pipeline::align_article(&article)?;

    let json = serde_json::to_string_pretty(&alignment).context("serialize alignment")?;
    println!("{json}");
    Ok(())
}

fn classifier(args: &BuildArgs) -> anyhow::Result<Box<dyn SentimentClassifier>> {
    match args.classifier {
        ClassifierEngine::Fixed => {
            let emotion = args.emotion.parse::<Emotion>()?;
            Ok(Box::new(FixedClassifier::new(emotion)))
        }
        ClassifierEngine::Command => {
            let program = args
                .classifier_command
                .clone()
                .context("--classifier command requires --classifier-command")?;
            Ok(Box::new(CommandClassifier {
                program,
                args: args.classifier_args.clone(),
            }))
        }
    }
}

fn collect_inputs(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let entries = std::fs::read_dir(input)
        .with_context(|| format!("read input dir: {}", input.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read input dir: {}", input.display()))?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
