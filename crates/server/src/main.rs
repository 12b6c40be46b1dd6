#[tokio::main]
async fn main() -> anyhow::Result<()> {
    batepapo_server::run().await
}
