// This main function is the entry point when running `cargo run -p web-server`.
// It serves with settings from `config.toml` and the environment; the root
// `fitness-center` binary offers the full command line.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_settings(None)?;
    let _guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(settings).await
}
