use std::error::Error;
use std::io;

use ortho_config::OrthoConfig;
use text_classification::{
    InferenceService, Mode, Pipeline, Settings, TextclsArgs, entrypoint, logging,
};
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    let args = TextclsArgs::load()?;
    logging::init(args.log_level.as_deref());
    let settings = args.settings()?;
    info!(mode = %settings.mode, task = %settings.task, "starting textcls");

    match settings.mode {
        Mode::Local => run_local(&settings),
        Mode::Remote => run_remote(&settings),
        Mode::Serve => serve(&settings),
    }
}

fn run_local(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let pipeline = Pipeline::from_config(&settings.provider)?;
    let mut service = InferenceService::with_task(pipeline, settings.task);
    entrypoint::run(&mut service, &settings.text, &mut io::stdout().lock())?;
    Ok(())
}

#[cfg(feature = "remote")]
fn run_remote(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let url = settings
        .remote_url
        .as_deref()
        .ok_or("remote mode requires --remote-url")?;
    let mut function = text_classification::RemoteFunction::new(url)?;
    entrypoint::run(&mut function, &settings.text, &mut io::stdout().lock())?;
    Ok(())
}

#[cfg(feature = "remote")]
fn serve(settings: &Settings) -> Result<(), Box<dyn Error>> {
    use std::sync::Arc;

    let pipeline = Pipeline::from_config(&settings.provider)?;
    let mut service = InferenceService::with_task(pipeline, settings.task);
    service.load()?;
    let service = Arc::new(service);

    let runtime = tokio::runtime::Runtime::new()?;
    // The service stays owned here so blocking HTTP clients inside it are
    // dropped outside the runtime.
    runtime.block_on(text_classification::remote::serve(
        Arc::clone(&service),
        settings.bind,
    ))?;
    Ok(())
}

#[cfg(not(feature = "remote"))]
fn run_remote(_settings: &Settings) -> Result<(), Box<dyn Error>> {
    Err(text_classification::ConfigError::FeatureDisabled("remote").into())
}

#[cfg(not(feature = "remote"))]
fn serve(_settings: &Settings) -> Result<(), Box<dyn Error>> {
    Err(text_classification::ConfigError::FeatureDisabled("remote").into())
}
