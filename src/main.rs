use clap::Parser;
use plant_id::core::render::{JsonRenderer, TextRenderer};
use plant_id::core::{ImageSource, Renderer};
use plant_id::utils::error::ErrorCategory;
use plant_id::utils::{logger, validation::Validate};
use plant_id::{CliArgs, IdentifyEngine, IdentifyError, LocalImageSource, OutputFormat, PresentationModel};

fn exit_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Validation | ErrorCategory::Decode => 1,
        ErrorCategory::Transport => 2,
        ErrorCategory::Configuration | ErrorCategory::System => 3,
    }
}

fn fail(e: &IdentifyError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e.category()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting plant-id");

    let (config, file) = match args.resolve() {
        Ok(resolved) => resolved,
        Err(e) => fail(&e),
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let credentials = match args.credentials(file.as_ref(), std::io::stdin().lock()) {
        Ok(credentials) => credentials,
        Err(e) => fail(&e),
    };

    let location = args.image.to_string_lossy().into_owned();
    let upload = match LocalImageSource::new().load(&location).await {
        Ok(upload) => upload,
        Err(e) => fail(&e),
    };

    let engine = match IdentifyEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => fail(&e),
    };
    let model = engine.identify(upload, &credentials).await;

    let stdout = std::io::stdout().lock();
    let rendered = match args.format {
        OutputFormat::Text => TextRenderer::new(stdout).render(&model),
        OutputFormat::Json => JsonRenderer::new(stdout).render(&model),
    };
    rendered?;

    if matches!(model, PresentationModel::Failed { .. }) {
        std::process::exit(2);
    }

    Ok(())
}
