use storefront_server::{start_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("storefront_server=info".parse()?)
                .add_directive("storefront_core=info".parse()?),
        )
        .init();

    start_server(ServerConfig::load()).await
}
