use drone_gcr::{launch, metadata, resolve};
use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    };
}

async fn run() -> drone_gcr::Result<()> {
    let input = resolve::PluginInput::from_env();
    let client = metadata::Client::configure().build()?;
    let (creds, target) = resolve::resolve(input, &client).await?;
    launch::run(launch::PUBLISH_TOOL, &launch::child_env(&creds, &target))
}
